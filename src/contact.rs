//! Contact types
//!
//! A contact is a named entry with a phone number and a category:
//! - `Contact`: a persisted row, identified by a store-assigned id
//! - `ContactDraft`: the unsaved (name, phone, category) triple
//! - `Category`: the suggested categories offered by the interface

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categories suggested by the interface.
///
/// The store does not enforce these; any string persists as a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    Family,
    Friends,
    Work,
    #[default]
    Other,
}

impl Category {
    /// Get the string representation of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Family => "Family",
            Category::Friends => "Friends",
            Category::Work => "Work",
            Category::Other => "Other",
        }
    }

    /// Get all suggested categories
    pub fn all() -> &'static [Category] {
        &[
            Category::Family,
            Category::Friends,
            Category::Work,
            Category::Other,
        ]
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "family" => Ok(Category::Family),
            "friends" | "friend" => Ok(Category::Friends),
            "work" => Ok(Category::Work),
            "other" => Ok(Category::Other),
            _ => Err(Error::UnknownCategory(s.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A contact row as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned surrogate key, never reused
    pub id: i64,
    pub name: String,
    pub phone: String,
    /// Free-form; usually one of [`Category::all`]
    pub category: String,
}

impl Contact {
    /// The mutable part of this contact as a draft
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            category: self.category.clone(),
        }
    }
}

/// Field that failed draft validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Phone,
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftField::Name => write!(f, "name"),
            DraftField::Phone => write!(f, "phone"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Contact {0} must not be empty")]
pub struct ValidationError(pub DraftField);

/// User input for a new or edited contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub phone: String,
    pub category: String,
}

impl ContactDraft {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            category: category.into(),
        }
    }

    /// Trim all fields and reject an empty name or phone.
    ///
    /// The category is kept as typed; only an empty one falls back to
    /// [`Category::Other`].
    pub fn validate(&self) -> std::result::Result<ContactDraft, ValidationError> {
        let category = match self.category.trim() {
            "" => Category::default().as_str(),
            category => category,
        };
        let draft = ContactDraft::new(self.name.trim(), self.phone.trim(), category);
        draft.ensure_present()?;
        Ok(draft)
    }

    /// Reject an empty name or phone, leaving every value untouched
    pub fn ensure_present(&self) -> std::result::Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError(DraftField::Name));
        }
        if self.phone.is_empty() {
            return Err(ValidationError(DraftField::Phone));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.phone.clear();
        self.category.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("work".parse::<Category>().unwrap(), Category::Work);
        assert_eq!(" FAMILY ".parse::<Category>().unwrap(), Category::Family);
        assert_eq!("friend".parse::<Category>().unwrap(), Category::Friends);
        assert!("colleagues".parse::<Category>().is_err());
    }

    #[test]
    fn test_validate_trims_fields() {
        let draft = ContactDraft::new("  Ana ", " 555-1111 ", " Work ");
        let valid = draft.validate().unwrap();
        assert_eq!(valid, ContactDraft::new("Ana", "555-1111", "Work"));

        let valid = ContactDraft::new("Bo", "1", " friends ").validate().unwrap();
        assert_eq!(valid.category, "friends");
    }

    #[test]
    fn test_validate_rejects_blank_name_or_phone() {
        let err = ContactDraft::new("   ", "555", "Work").validate().unwrap_err();
        assert_eq!(err.0, DraftField::Name);

        let err = ContactDraft::new("Ana", "\t", "Work").validate().unwrap_err();
        assert_eq!(err.0, DraftField::Phone);
        assert_eq!(err.to_string(), "Contact phone must not be empty");
    }

    #[test]
    fn test_empty_category_defaults_to_other() {
        let valid = ContactDraft::new("Ana", "555", "  ").validate().unwrap();
        assert_eq!(valid.category, "Other");
    }

    #[test]
    fn test_ensure_present_does_not_trim() {
        assert!(ContactDraft::new("Bo ", " 555", "").ensure_present().is_ok());
        let err = ContactDraft::new("", "555", "Work").ensure_present().unwrap_err();
        assert_eq!(err.0, DraftField::Name);
        let err = ContactDraft::new("Ana", "", "Work").ensure_present().unwrap_err();
        assert_eq!(err.0, DraftField::Phone);
    }

    #[test]
    fn test_unknown_category_is_kept() {
        let valid = ContactDraft::new("Ana", "555", "Gym").validate().unwrap();
        assert_eq!(valid.category, "Gym");
    }
}
