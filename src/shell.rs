//! Interactive shell
//!
//! Reads one command per line, turns it into an [`Action`] and hands it to
//! the [`Controller`]. [`ConsoleView`] is the terminal implementation of
//! [`View`]; when stdin is not a terminal it reads plain lines so scripts
//! can be piped in.

use std::io::{self, BufRead, IsTerminal, Write};
use console::Term;
use crate::analysis::ContactReport;
use crate::contact::Contact;
use crate::controller::{Action, Controller, Notice, View};
use crate::ui::{self, ImportProgress, Icons};
use crate::Result;

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add` fills the input fields first, then saves
    Add,
    Run(Action),
    Quit,
    Empty,
}

/// Parse one input line
pub fn parse_command(line: &str) -> std::result::Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Empty);
    };
    let rest: Vec<&str> = words.collect();

    let command = match head.to_lowercase().as_str() {
        "add" | "new" => Command::Add,
        "update" | "edit" => Command::Run(Action::Update),
        "delete" | "del" | "rm" => Command::Run(Action::Delete),
        "search" | "find" => Command::Run(Action::Search),
        "all" | "list" | "ls" | "refresh" => Command::Run(Action::ShowAll),
        "export" => Command::Run(Action::Export),
        "import" => Command::Run(Action::Import),
        "report" | "stats" => Command::Run(Action::Report),
        "help" | "?" => Command::Run(Action::Help),
        "quit" | "exit" | "q" => Command::Quit,
        "select" | "sel" => {
            let id = rest
                .first()
                .ok_or_else(|| "usage: select <id>".to_string())?;
            let id = id
                .trim_start_matches('#')
                .parse::<i64>()
                .map_err(|_| format!("not a contact id: {}", id))?;
            return Ok(Command::Run(Action::Select(id)));
        }
        other => return Err(format!("unknown command '{}' (try 'help')", other)),
    };

    if !rest.is_empty() {
        return Err(format!("'{}' takes no arguments", head));
    }
    Ok(command)
}

/// Terminal implementation of [`View`]
pub struct ConsoleView {
    term: Term,
    interactive: bool,
    progress: Option<ImportProgress>,
}

impl ConsoleView {
    pub fn new() -> Self {
        let term = Term::stdout();
        let interactive = term.is_term() && io::stdin().is_terminal();
        Self {
            term,
            interactive,
            progress: None,
        }
    }

    /// Read one line after `label`. `None` on end of input or a read error.
    fn read_line(&mut self, label: &str, initial: Option<&str>) -> Option<String> {
        if self.interactive {
            self.term.write_str(label).ok()?;
            let line = match initial {
                Some(initial) => self.term.read_line_initial_text(initial),
                None => self.term.read_line(),
            };
            return line.ok();
        }

        let suffix = initial.map(|i| format!("[{}] ", i)).unwrap_or_default();
        print!("{}{}", label, suffix);
        io::stdout().flush().ok()?;

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let line = line.trim_end_matches(['\r', '\n']).to_string();
                match initial {
                    Some(initial) if line.is_empty() => Some(initial.to_string()),
                    _ => Some(line),
                }
            }
        }
    }

    /// Read the next shell command
    pub fn read_command(&mut self) -> Option<String> {
        self.read_line(&format!("{} ", Icons::BOOK), None)
    }

    fn finish_progress(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.finish();
        }
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ConsoleView {
    fn render(&mut self, contacts: &[Contact], selected: Option<i64>) {
        self.finish_progress();
        println!();
        if contacts.is_empty() {
            println!("{}", ui::muted("No contacts."));
            return;
        }
        println!("{}", ui::contacts_table(contacts, selected));
        println!("{}", ui::muted(&format!("{} contact(s)", contacts.len())));
    }

    fn prompt(&mut self, label: &str, initial: Option<&str>) -> Option<String> {
        self.read_line(&format!("{}: ", label), initial)
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.read_line(&format!("{} {} [y/N] ", Icons::WARN, question), None)
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn notify(&mut self, notice: Notice) {
        self.finish_progress();
        match notice {
            Notice::Info(message) => ui::success(&message),
            Notice::Warning(message) => ui::warn(&message),
            Notice::Error(message) => ui::error(&message),
        }
    }

    fn show_report(&mut self, report: &ContactReport) {
        ui::section(&format!("{} Contact report", Icons::STATS));
        println!("{}", ui::stats_table(&report.rows()));
    }

    fn import_progress(&mut self, line: u64) {
        self.progress
            .get_or_insert_with(|| ImportProgress::new("CSV"))
            .row_imported(line);
    }
}

/// Run the shell until `quit` or end of input
pub fn run(controller: &mut Controller<ConsoleView>) -> Result<()> {
    ui::header("Contactbook");
    ui::summary_row("Type", "'help' for the list of commands");

    loop {
        let Some(line) = controller.view_mut().read_command() else {
            break;
        };

        match parse_command(&line) {
            Ok(Command::Empty) => {}
            Ok(Command::Quit) => break,
            Ok(Command::Add) => {
                controller.edit_draft();
                controller.dispatch(Action::Add);
            }
            Ok(Command::Run(action)) => controller.dispatch(action),
            Err(message) => ui::warn(&message),
        }
    }

    tracing::debug!("shell finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("add").unwrap(), Command::Add);
        assert_eq!(parse_command("  Edit ").unwrap(), Command::Run(Action::Update));
        assert_eq!(parse_command("rm").unwrap(), Command::Run(Action::Delete));
        assert_eq!(parse_command("find").unwrap(), Command::Run(Action::Search));
        assert_eq!(parse_command("ls").unwrap(), Command::Run(Action::ShowAll));
        assert_eq!(parse_command("stats").unwrap(), Command::Run(Action::Report));
        assert_eq!(parse_command("?").unwrap(), Command::Run(Action::Help));
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
        assert_eq!(parse_command("   ").unwrap(), Command::Empty);
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(parse_command("select 3").unwrap(), Command::Run(Action::Select(3)));
        assert_eq!(parse_command("sel #12").unwrap(), Command::Run(Action::Select(12)));
        assert!(parse_command("select").is_err());
        assert!(parse_command("select ana").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_and_extra_arguments() {
        let err = parse_command("frobnicate").unwrap_err();
        assert!(err.contains("frobnicate"));
        assert!(parse_command("delete 3").is_err());
    }
}
