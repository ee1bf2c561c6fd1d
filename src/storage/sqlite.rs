//! SQLite storage implementation

use std::path::Path;
use std::time::Instant;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, params, OptionalExtension};
use crate::{Result, Error};
use crate::contact::Contact;
use super::schema;

const CONTACT_SELECT_SQL: &str = "SELECT id, name, phone, category FROM contacts";

/// SQL function lowercasing text with Unicode rules; `lower()` only folds ASCII
const UNICODE_LOWER_FN: &str = "unicode_lower";

/// SQLite-backed storage for contacts
pub struct ContactStore {
    conn: Connection,
}

impl ContactStore {
    /// Open a database file (creates if doesn't exist)
    ///
    /// Any failure here, including a file that is not a database, is
    /// reported as [`Error::Connection`].
    pub fn open(path: &Path) -> Result<Self> {
        let started_at = Instant::now();
        let connection_error = |source| Error::Connection {
            path: path.display().to_string(),
            source,
        };

        let conn = Connection::open(path).map_err(connection_error)?;
        let store = Self { conn };
        store.initialize_schema().map_err(|e| match e {
            Error::Operation(source) => connection_error(source),
            other => other,
        })?;

        tracing::info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "opened contact database"
        );
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::Connection {
            path: ":memory:".to_string(),
            source,
        })?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Register SQL functions and initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.conn.create_scalar_function(
            UNICODE_LOWER_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
        )?;

        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Release the connection.
    ///
    /// Consumes the store, so nothing can use it afterwards.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Operation(e))?;
        tracing::info!("closed contact database");
        Ok(())
    }

    // ========== Contact Operations ==========

    /// Fetch contacts, optionally filtered.
    ///
    /// With a filter, only rows whose name, phone or category contain it
    /// (case-insensitive, Unicode-aware) are returned. Rows come back in id
    /// order.
    pub fn fetch(&self, filter: Option<&str>) -> Result<Vec<Contact>> {
        let contacts = match filter {
            None => {
                let mut stmt = self.conn.prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id"))?;
                let rows = stmt
                    .query_map([], row_to_contact)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            Some(keyword) => {
                let needle = keyword.to_lowercase();
                let mut stmt = self.conn.prepare(&format!(
                    "{CONTACT_SELECT_SQL}
                     WHERE instr({UNICODE_LOWER_FN}(name), ?1) > 0
                        OR instr({UNICODE_LOWER_FN}(phone), ?1) > 0
                        OR instr({UNICODE_LOWER_FN}(category), ?1) > 0
                     ORDER BY id"
                ))?;
                let rows = stmt
                    .query_map([needle], row_to_contact)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        tracing::debug!(filter = ?filter, rows = contacts.len(), "fetched contacts");
        Ok(contacts)
    }

    /// Get a contact by id
    pub fn get(&self, id: i64) -> Result<Option<Contact>> {
        self.conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE id = ?1"),
                [id],
                row_to_contact,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert a contact and return the id assigned to it
    pub fn create(&self, name: &str, phone: &str, category: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO contacts (name, phone, category) VALUES (?1, ?2, ?3)",
            params![name, phone, category],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "created contact");
        Ok(id)
    }

    /// Replace name, phone and category of the row with `id`.
    ///
    /// A missing id is not an error; nothing changes and `false` is returned.
    pub fn update(&self, id: i64, name: &str, phone: &str, category: &str) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE contacts SET name = ?1, phone = ?2, category = ?3 WHERE id = ?4",
            params![name, phone, category, id],
        )?;
        tracing::debug!(id, changed, "updated contact");
        Ok(changed > 0)
    }

    /// Delete the row with `id`. Same missing-id policy as [`Self::update`].
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM contacts WHERE id = ?1", [id])?;
        tracing::debug!(id, changed, "deleted contact");
        Ok(changed > 0)
    }

    /// Count all contacts
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Helper to convert a row to a Contact
fn row_to_contact(row: &rusqlite::Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        category: row.get(3)?,
    })
}
