//! Database schema definitions

/// SQL to create the contacts table
///
/// `AUTOINCREMENT` keeps ids of deleted rows from being handed out again.
pub const CREATE_CONTACTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT NOT NULL,
    category TEXT NOT NULL DEFAULT 'Other'
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_contacts_name ON contacts(name)",
    "CREATE INDEX IF NOT EXISTS idx_contacts_category ON contacts(category)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_CONTACTS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
