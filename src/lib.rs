//! # Contactbook - local contact manager
//!
//! A tabular contact list backed by SQLite.
//!
//! Contactbook provides:
//! - `Contact` records with store-assigned ids
//! - SQLite-backed storage with substring search
//! - A presentation controller that re-renders after every action
//! - CSV import/export
//! - A summary report over the contact set

pub mod contact;
pub mod storage;
pub mod controller;
pub mod transfer;
pub mod analysis;
pub mod shell;
pub mod ui;
pub mod output;
pub mod config;

// Re-exports for convenient access
pub use contact::{Category, Contact, ContactDraft};
pub use storage::ContactStore;
pub use controller::{Action, Controller, Notice, View};
pub use analysis::ContactReport;

/// Result type alias for Contactbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Contactbook operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open contact database {path}: {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Storage error: {0}")]
    Operation(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import stopped at line {line}: {reason}")]
    ImportRow { line: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(#[from] contact::ValidationError),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Contact not found: {0}")]
    NotFound(i64),
}
