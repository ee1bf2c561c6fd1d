//! Contactbook CLI - interactive contact table and one-shot commands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use contactbook::config::{self, ContactbookConfig};
use contactbook::controller::Controller;
use contactbook::shell::{self, ConsoleView};
use contactbook::ui::{self, Icons, ImportProgress};
use contactbook::{transfer, ContactDraft, ContactReport, ContactStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(version)]
#[command(about = "Contact manager - SQLite-backed contact table with search and CSV import/export")]
#[command(long_about = r#"
Contactbook keeps personal and professional contacts in a local SQLite file.

Run without a subcommand for the interactive table, or use one-shot commands:
  contactbook add --name "Ana" --phone "555-1111" --category Work
  contactbook search work
  contactbook export contacts.csv
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file (overrides CONTACTBOOK_DB and the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format for list, search and report
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive contact table (default)
    Shell,

    /// List all contacts
    List,

    /// Show contacts whose name, phone or category contain a keyword
    Search {
        /// Keyword (case-insensitive)
        keyword: String,
    },

    /// Add a contact
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        phone: String,

        /// Family, Friends, Work, Other or anything else
        #[arg(short = 'k', long, default_value = "Other")]
        category: String,
    },

    /// Change a contact; omitted fields keep their value
    Update {
        id: i64,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        phone: Option<String>,

        #[arg(short = 'k', long)]
        category: Option<String>,
    },

    /// Delete a contact
    Delete {
        id: i64,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Write all contacts to a CSV file
    Export {
        path: PathBuf,
    },

    /// Add contacts from a CSV file (ID,Name,Phone,Category; ids are ignored)
    Import {
        path: PathBuf,
    },

    /// Summary statistics over all contacts
    Report,

    /// Write a config file pointing at the current database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let loaded = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database_path(
        cli.database.as_deref(),
        std::env::var(config::DATABASE_ENV).ok(),
        loaded.as_ref(),
    );
    tracing::debug!(database = %database.display(), "resolved database path");

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let open = || open_store(&database);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Init { force } => {
            init_config(&config_path, &database, force)?;
            ui::success(&format!("Wrote {}", config_path.display()));
        }

        Commands::Shell => {
            let mut controller = Controller::new(open()?, ConsoleView::new())?;
            let result = shell::run(&mut controller);
            controller.into_store().close()?;
            result?;
        }

        Commands::List => {
            let store = open()?;
            let contacts = store.fetch(None)?;
            print_contacts(&contacts, cli.format)?;
            store.close()?;
        }

        Commands::Search { keyword } => {
            let store = open()?;
            let contacts = store.fetch(Some(keyword.trim()))?;
            if cli.format == OutputFormat::Text {
                println!("{} Searching for: '{}'", Icons::SEARCH, keyword.trim());
            }
            print_contacts(&contacts, cli.format)?;
            store.close()?;
        }

        Commands::Add { name, phone, category } => {
            let store = open()?;
            let draft = ContactDraft::new(name, phone, category).validate()?;
            let id = store.create(&draft.name, &draft.phone, &draft.category)?;
            ui::success(&format!("Added {} (#{})", draft.name, id));
            store.close()?;
        }

        Commands::Update { id, name, phone, category } => {
            let store = open()?;
            let current = store
                .get(id)?
                .ok_or(contactbook::Error::NotFound(id))?;
            let draft = ContactDraft::new(
                name.unwrap_or(current.name),
                phone.unwrap_or(current.phone),
                category.unwrap_or(current.category),
            )
            .validate()?;
            store.update(id, &draft.name, &draft.phone, &draft.category)?;
            ui::success(&format!("Updated {} (#{})", draft.name, id));
            store.close()?;
        }

        Commands::Delete { id, yes } => {
            let store = open()?;
            let current = store
                .get(id)?
                .ok_or(contactbook::Error::NotFound(id))?;
            if !yes && !confirm(&format!("Delete contact '{}'?", current.name))? {
                ui::warn("Cancelled");
            } else {
                store.delete(id)?;
                ui::success(&format!("Deleted {}", current.name));
            }
            store.close()?;
        }

        Commands::Export { path } => {
            let store = open()?;
            let written = transfer::export_csv(&store, &path)?;
            ui::success(&format!("Exported {} contact(s) to {}", written, path.display()));
            store.close()?;
        }

        Commands::Import { path } => {
            let store = open()?;
            let progress = ImportProgress::new(&path.display().to_string());
            let result = transfer::import_csv(&store, &path, |line| progress.row_imported(line));
            progress.finish();
            let created = result?;
            ui::success(&format!("Imported {} contact(s) from {}", created, path.display()));
            store.close()?;
        }

        Commands::Report => {
            let store = open()?;
            let report = ContactReport::from_contacts(&store.fetch(None)?);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    ui::section(&format!("{} Contact report ({})", Icons::STATS, database.display()));
                    println!("{}", ui::stats_table(&report.rows()));
                }
            }
            store.close()?;
        }
    }

    Ok(())
}

/// Open the store; failure here is fatal for every command and is reported
/// once, by `main`'s error return
fn open_store(database: &Path) -> anyhow::Result<ContactStore> {
    config::ensure_db_dir(database)?;
    Ok(ContactStore::open(database)?)
}

/// Write a config file pointing at `database` without touching the database
fn init_config(config_path: &Path, database: &Path, force: bool) -> anyhow::Result<()> {
    let contents = ContactbookConfig {
        database: Some(database.display().to_string()),
    };
    config::write_config(config_path, &contents, force)?;
    Ok(())
}

fn print_contacts(contacts: &[contactbook::Contact], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(contacts)?),
        OutputFormat::Text => {
            if contacts.is_empty() {
                println!("{} No contacts found.", Icons::CROSS);
            } else {
                println!("{}", ui::contacts_table(contacts, None));
                ui::info("Contacts", &contacts.len().to_string());
            }
        }
    }
    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let term = console::Term::stdout();
    term.write_str(&format!("{} {} [y/N] ", Icons::WARN, question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
