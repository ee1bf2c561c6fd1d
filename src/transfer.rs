//! CSV import/export
//!
//! Export writes `ID,Name,Phone,Category` followed by one row per contact.
//! Import reads the same layout but ignores the id column, so every imported
//! row gets a fresh store-assigned id.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use crate::contact::{Category, ContactDraft};
use crate::storage::ContactStore;
use crate::{Error, Result};

/// Header row written on export
pub const CSV_HEADER: [&str; 4] = ["ID", "Name", "Phone", "Category"];

/// Export all contacts to a CSV file, returning the number of rows written
pub fn export_csv(store: &ContactStore, path: &Path) -> Result<usize> {
    let file = File::create(path)?;
    let written = export_writer(store, file)?;
    tracing::info!(path = %path.display(), rows = written, "exported contacts");
    Ok(written)
}

/// Export all contacts as CSV into any writer
pub fn export_writer<W: Write>(store: &ContactStore, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    let contacts = store.fetch(None)?;
    for contact in &contacts {
        wtr.write_record([
            contact.id.to_string().as_str(),
            contact.name.as_str(),
            contact.phone.as_str(),
            contact.category.as_str(),
        ])?;
    }
    wtr.flush()?;

    Ok(contacts.len())
}

/// Import contacts from a CSV file, returning the number of rows created
pub fn import_csv(store: &ContactStore, path: &Path, on_row: impl FnMut(u64)) -> Result<usize> {
    let file = File::open(path)?;
    let created = import_reader(store, file, on_row)?;
    tracing::info!(path = %path.display(), rows = created, "imported contacts");
    Ok(created)
}

/// Import contacts from any CSV reader.
///
/// The first record is always treated as a header. Records with fewer than
/// three columns are skipped; a missing fourth column means `Other`. Values
/// are stored exactly as read, but an empty name or phone fails the record.
/// The first failing record stops the import, leaving earlier rows in place.
/// `on_row` is called with the line number of every record inserted.
pub fn import_reader<R: Read>(
    store: &ContactStore,
    reader: R,
    mut on_row: impl FnMut(u64),
) -> Result<usize> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut created = 0;
    for record in rdr.records() {
        let record = record.map_err(|e| Error::ImportRow {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let Some(draft) = draft_from_record(&record) else {
            tracing::debug!(line, columns = record.len(), "skipping short record");
            continue;
        };

        draft.ensure_present().map_err(|e| Error::ImportRow {
            line,
            reason: e.to_string(),
        })?;
        store
            .create(&draft.name, &draft.phone, &draft.category)
            .map_err(|e| Error::ImportRow {
                line,
                reason: e.to_string(),
            })?;

        created += 1;
        on_row(line);
    }

    Ok(created)
}

/// Map the positional columns `id, name, phone[, category]` onto a draft
fn draft_from_record(record: &csv::StringRecord) -> Option<ContactDraft> {
    if record.len() < 3 {
        return None;
    }
    let category = record.get(3).unwrap_or(Category::Other.as_str());
    Some(ContactDraft::new(&record[1], &record[2], category))
}
