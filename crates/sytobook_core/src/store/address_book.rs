//! Keyed contact store with fuzzy identity resolution and birthday projection.
//!
//! # Responsibility
//! - Map derived keys (`"name surname"`, lowercase) to contact records.
//! - Resolve free-text queries to candidate keys without guessing.
//! - Project recurring birthdays onto the calendar.
//!
//! # Invariants
//! - Every stored key is non-empty.
//! - A key is the canonical key of its record at the time of the last write;
//!   keys are not rewritten when a record changes afterwards.
//! - `add_record` is an upsert: it overwrites, it never merges.

use crate::model::contact::Contact;
use crate::store::{BookError, BookResult};
use chrono::{Datelike, Local, NaiveDate};
use std::collections::BTreeMap;

/// Outcome of resolving a free-text query against stored keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unique(String),
    /// Two or more keys matched, sorted ascending.
    Ambiguous(Vec<String>),
    NotFound,
}

/// Next birthday occurrence within a projection window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpcomingBirthday {
    /// Calendar date the birthday falls on (Feb 28 for Feb 29 in common years).
    pub date: NaiveDate,
    /// Age the person turns on `date`.
    pub age_turning: i32,
}

/// Contact collection keyed by derived key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    records: BTreeMap<String, Contact>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Contact)> {
        self.records.iter().map(|(key, contact)| (key.as_str(), contact))
    }

    pub fn get(&self, key: &str) -> Option<&Contact> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Contact> {
        self.records.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Inserts or overwrites the record at its derived key.
    ///
    /// Returns the derived key and the record it replaced, if any.
    pub fn add_record(&mut self, contact: Contact) -> (String, Option<Contact>) {
        let key = contact.key();
        let previous = self.records.insert(key.clone(), contact);
        (key, previous)
    }

    /// Restores a persisted record under its stored key.
    pub(crate) fn insert_with_key(&mut self, key: String, contact: Contact) {
        self.records.insert(key, contact);
    }

    /// Returns every key containing all whitespace-separated query parts.
    ///
    /// Matching is case-insensitive, order-independent substring matching.
    /// A blank query matches nothing.
    pub fn find_candidates(&self, query: &str) -> Vec<String> {
        let parts: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if parts.is_empty() {
            return Vec::new();
        }

        self.records
            .keys()
            .filter(|key| parts.iter().all(|part| key.contains(part.as_str())))
            .cloned()
            .collect()
    }

    pub fn resolve(&self, query: &str) -> Resolution {
        let mut candidates = self.find_candidates(query);
        match candidates.len() {
            0 => Resolution::NotFound,
            1 => Resolution::Unique(candidates.remove(0)),
            _ => Resolution::Ambiguous(candidates),
        }
    }

    /// Resolves `query` to exactly one key or fails.
    pub fn find_key(&self, query: &str) -> BookResult<String> {
        match self.resolve(query) {
            Resolution::Unique(key) => Ok(key),
            Resolution::Ambiguous(candidates) => Err(BookError::Ambiguous(candidates)),
            Resolution::NotFound => Err(BookError::NotFound(query.to_string())),
        }
    }

    pub fn find(&self, query: &str) -> BookResult<&Contact> {
        let key = self.find_key(query)?;
        self.records
            .get(&key)
            .ok_or(BookError::NotFound(key))
    }

    pub fn find_mut(&mut self, query: &str) -> BookResult<&mut Contact> {
        let key = self.find_key(query)?;
        self.records
            .get_mut(&key)
            .ok_or(BookError::NotFound(key))
    }

    /// Deletes the single record resolved by `query`.
    ///
    /// Ambiguous queries delete nothing.
    pub fn delete(&mut self, query: &str) -> BookResult<(String, Contact)> {
        let key = self.find_key(query)?;
        self.remove(&key)
    }

    /// Deletes the record stored under an exact key.
    pub fn remove(&mut self, key: &str) -> BookResult<(String, Contact)> {
        self.records
            .remove_entry(key)
            .ok_or_else(|| BookError::NotFound(key.to_string()))
    }

    /// Contacts whose name, surname, e-mail or notes contain `query`
    /// (case-insensitive), or whose phone contains it verbatim.
    pub fn search(&self, query: &str) -> Vec<&Contact> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let raw = query.trim();

        self.records
            .values()
            .filter(|contact| {
                contact.name().as_str().to_lowercase().contains(&needle)
                    || contact.surname().as_str().to_lowercase().contains(&needle)
                    || contact.email().as_str().to_lowercase().contains(&needle)
                    || contact.phones().iter().any(|phone| phone.as_str().contains(raw))
                    || contact
                        .notes()
                        .iter()
                        .any(|note| note.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Contacts whose name, surname or full key equals `query`
    /// (case-insensitive).
    pub fn find_exact_name(&self, query: &str) -> Vec<&Contact> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .filter(|(key, contact)| {
                key.as_str() == needle
                    || contact.name().as_str().to_lowercase() == needle
                    || contact.surname().as_str().to_lowercase() == needle
            })
            .map(|(_, contact)| contact)
            .collect()
    }

    /// Birthdays falling within `days_ahead` days of the local date.
    pub fn upcoming(&self, days_ahead: u32) -> BTreeMap<String, UpcomingBirthday> {
        self.upcoming_on(Local::now().date_naive(), days_ahead)
    }

    /// Birthdays with `0 <= next_occurrence - today <= days_ahead`.
    pub fn upcoming_on(
        &self,
        today: NaiveDate,
        days_ahead: u32,
    ) -> BTreeMap<String, UpcomingBirthday> {
        let mut result = BTreeMap::new();

        for (key, contact) in &self.records {
            let Some(birthday) = contact.birthday() else {
                continue;
            };
            let born = birthday.date();
            let Some(date) = next_occurrence(born, today) else {
                continue;
            };

            let delta = (date - today).num_days();
            if (0..=i64::from(days_ahead)).contains(&delta) {
                result.insert(
                    key.clone(),
                    UpcomingBirthday {
                        date,
                        age_turning: date.year() - born.year(),
                    },
                );
            }
        }

        result
    }
}

/// Picks one key from `candidates` using a one-based `selector`.
pub fn disambiguate(candidates: &[String], selector: &str) -> Option<String> {
    let position: usize = selector.trim().parse().ok()?;
    if position == 0 {
        return None;
    }
    candidates.get(position - 1).cloned()
}

/// Next date (today included) on which `born`'s month/day recurs.
fn next_occurrence(born: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = occurrence_in(today.year(), born.month(), born.day())?;
    if this_year >= today {
        return Some(this_year);
    }
    occurrence_in(today.year() + 1, born.month(), born.day())
}

/// Concrete date for a month/day in `year`; Feb 29 falls back to Feb 28.
fn occurrence_in(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month == 2 && day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_with(people: &[(&str, &str, Option<&str>)]) -> AddressBook {
        let mut book = AddressBook::new();
        for (name, surname, birthday) in people {
            let mut contact = Contact::parse(name, surname).unwrap();
            if let Some(raw) = birthday {
                contact.set_birthday_on(raw, day(2030, 1, 1)).unwrap();
            }
            book.add_record(contact);
        }
        book
    }

    #[test]
    fn occurrence_substitutes_feb_28_in_common_years() {
        assert_eq!(occurrence_in(2023, 2, 29), Some(day(2023, 2, 28)));
        assert_eq!(occurrence_in(2024, 2, 29), Some(day(2024, 2, 29)));
    }

    #[test]
    fn next_occurrence_rolls_over_after_passing() {
        let born = day(1990, 3, 10);
        assert_eq!(next_occurrence(born, day(2024, 3, 10)), Some(day(2024, 3, 10)));
        assert_eq!(next_occurrence(born, day(2024, 3, 11)), Some(day(2025, 3, 10)));
    }

    #[test]
    fn candidates_require_every_part() {
        let book = book_with(&[("John", "Smith", None), ("John", "Doe", None)]);
        assert_eq!(book.find_candidates("smi jo"), vec!["john smith".to_string()]);
        assert_eq!(book.find_candidates("JOHN").len(), 2);
        assert!(book.find_candidates("   ").is_empty());
    }

    #[test]
    fn disambiguate_uses_one_based_positions() {
        let candidates = vec!["a".to_string(), "b".to_string()];
        assert_eq!(disambiguate(&candidates, "2"), Some("b".to_string()));
        assert_eq!(disambiguate(&candidates, "0"), None);
        assert_eq!(disambiguate(&candidates, "3"), None);
        assert_eq!(disambiguate(&candidates, "x"), None);
    }

    #[test]
    fn find_exact_name_matches_whole_fields_only() {
        let book = book_with(&[("John", "Smith", None), ("Johnny", "Cash", None)]);
        let hits = book.find_exact_name("john");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key(), "john smith");
        assert_eq!(book.find_exact_name("johnny cash").len(), 1);
    }

    #[test]
    fn upcoming_window_is_inclusive() {
        let book = book_with(&[
            ("A", "", Some("15.05.2000")),
            ("B", "", Some("20.05.2000")),
            ("C", "", Some("21.05.2000")),
        ]);
        let hits = book.upcoming_on(day(2024, 5, 15), 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits["a"].age_turning, 24);
        assert_eq!(hits["b"].date, day(2024, 5, 20));
        assert!(!hits.contains_key("c"));
    }
}
