//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite table:
//! - contacts(id, name, phone, category)
//!
//! The store owns the only connection for the process lifetime. There is no
//! caching and no transaction spanning more than one operation.

pub mod schema;
pub mod sqlite;

pub use sqlite::ContactStore;
