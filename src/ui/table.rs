use crate::contact::Contact;
use crate::ui::Icons;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// One rendered line of the contact table
#[derive(Tabled)]
struct ContactRow<'a> {
    #[tabled(rename = " ")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Phone")]
    phone: &'a str,
    #[tabled(rename = "Category")]
    category: &'a str,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(String, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Render contacts as a table, marking the selected row
pub fn contacts_table(contacts: &[Contact], selected: Option<i64>) -> String {
    let rows: Vec<ContactRow<'_>> = contacts
        .iter()
        .map(|c| ContactRow {
            marker: if Some(c.id) == selected { Icons::SELECTED } else { "" },
            id: c.id,
            name: &c.name,
            phone: &c.phone,
            category: &c.category,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}
