//! Summary report over the contact set
//!
//! Read-only; computed from whatever `fetch` returns, so a filtered
//! table yields a report over just those rows.

use std::collections::HashMap;
use std::sync::OnceLock;
use regex::Regex;
use serde::Serialize;
use crate::contact::{Category, Contact};

/// Phone numbers with more digits than this count as international
const LOCAL_DIGIT_LIMIT: usize = 10;

/// Area codes listed in the human-readable table
const TOP_AREA_CODES: usize = 5;

fn title_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(Dr|Mr|Mrs|Ms|Prof|Eng|Sir|Lady)\b\.?").expect("valid title regex")
    })
}

fn company_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(Inc|Ltd|Corp|LLC|GmbH|Company)\b|\bCo\.").expect("valid company regex")
    })
}

fn extension_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)x|ext|#").expect("valid extension regex"))
}

/// Number of contacts in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Number of phone numbers sharing a leading three-digit area code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaCodeCount {
    pub area_code: String,
    pub count: usize,
}

/// Aggregate statistics for a set of contacts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactReport {
    pub total: usize,
    pub unique_categories: usize,
    /// Sorted by count descending, then category name
    pub categories: Vec<CategoryCount>,
    pub international_numbers: usize,
    pub numbers_with_extension: usize,
    /// Only numbers with at least ten digits have an area code.
    /// Sorted by count descending, then code.
    pub area_codes: Vec<AreaCodeCount>,
    pub titled_names: usize,
    pub company_names: usize,
    /// In characters
    pub average_name_length: f64,
    pub longest_name: usize,
    pub average_name_words: f64,
}

impl ContactReport {
    pub fn from_contacts(contacts: &[Contact]) -> Self {
        let mut by_category: HashMap<String, usize> = HashMap::new();
        let mut by_area_code: HashMap<String, usize> = HashMap::new();
        let mut name_chars = 0;
        let mut name_words = 0;
        let mut report = ContactReport {
            total: contacts.len(),
            ..Default::default()
        };

        for contact in contacts {
            let category = contact.category.trim();
            let category = if category.is_empty() {
                Category::Other.as_str()
            } else {
                category
            };
            *by_category.entry(category.to_string()).or_default() += 1;

            let digits = phone_digits(&contact.phone);
            if digits.len() > LOCAL_DIGIT_LIMIT {
                report.international_numbers += 1;
            }
            if digits.len() >= LOCAL_DIGIT_LIMIT {
                *by_area_code.entry(digits[..3].to_string()).or_default() += 1;
            }
            if extension_pattern().is_match(&contact.phone) {
                report.numbers_with_extension += 1;
            }
            if title_pattern().is_match(&contact.name) {
                report.titled_names += 1;
            }
            if company_pattern().is_match(&contact.name) {
                report.company_names += 1;
            }

            let length = contact.name.chars().count();
            name_chars += length;
            name_words += contact.name.split_whitespace().count();
            report.longest_name = report.longest_name.max(length);
        }

        if !contacts.is_empty() {
            report.average_name_length = name_chars as f64 / contacts.len() as f64;
            report.average_name_words = name_words as f64 / contacts.len() as f64;
        }

        let mut area_codes: Vec<AreaCodeCount> = by_area_code
            .into_iter()
            .map(|(area_code, count)| AreaCodeCount { area_code, count })
            .collect();
        area_codes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.area_code.cmp(&b.area_code)));
        report.area_codes = area_codes;

        let mut categories: Vec<CategoryCount> = by_category
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

        report.unique_categories = categories.len();
        report.categories = categories;
        report
    }

    /// Label/value pairs for the human-readable table
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Total contacts".to_string(), self.total.to_string()),
            ("Unique categories".to_string(), self.unique_categories.to_string()),
        ];
        for entry in &self.categories {
            rows.push((format!("  {}", entry.category), entry.count.to_string()));
        }
        rows.push(("International numbers".to_string(), self.international_numbers.to_string()));
        rows.push(("Numbers with extension".to_string(), self.numbers_with_extension.to_string()));
        if !self.area_codes.is_empty() {
            rows.push(("Top area codes".to_string(), String::new()));
            for entry in self.area_codes.iter().take(TOP_AREA_CODES) {
                rows.push((format!("  {}", entry.area_code), entry.count.to_string()));
            }
        }
        rows.push(("Names with a title".to_string(), self.titled_names.to_string()));
        rows.push(("Company names".to_string(), self.company_names.to_string()));
        rows.push(("Average name length".to_string(), format!("{:.1}", self.average_name_length)));
        rows.push(("Longest name".to_string(), self.longest_name.to_string()));
        rows.push(("Average words per name".to_string(), format!("{:.1}", self.average_name_words)));
        rows
    }
}

fn phone_digits(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}
