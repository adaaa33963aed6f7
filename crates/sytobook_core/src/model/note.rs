//! General (contact-independent) note.
//!
//! # Invariants
//! - `text` is trimmed, non-empty and never changes after construction.
//! - `tags` behaves like an ordered set: re-adding an existing tag is a no-op.

use crate::model::field::ValidationError;
use chrono::{Local, NaiveDate};
use std::fmt::{Display, Formatter};

/// Free-text note with a creation date and tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralNote {
    text: String,
    tags: Vec<String>,
    created_at: NaiveDate,
}

impl GeneralNote {
    /// Creates a note stamped with today's local date.
    pub fn new(text: &str, tags: Vec<String>) -> Result<Self, ValidationError> {
        Self::with_date(text, tags, Local::now().date_naive())
    }

    /// Creates a note with an explicit creation date.
    pub fn with_date(
        text: &str,
        tags: Vec<String>,
        created_at: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyNote);
        }
        let mut note = Self {
            text: trimmed.to_string(),
            tags: Vec::new(),
            created_at,
        };
        note.add_tags(tags);
        Ok(note)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Appends tags that are not already present; blank values are skipped.
    pub fn add_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.has_tag(tag) {
                self.tags.push(tag.to_string());
            }
        }
    }
}

impl Display for GeneralNote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tags = if self.tags.is_empty() {
            "—".to_string()
        } else {
            self.tags.join(", ")
        };
        write!(f, "{}   [{}]   {}", self.created_at, tags, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn tags_behave_like_an_ordered_set() {
        let mut note =
            GeneralNote::with_date(" buy milk ", vec!["home".into(), "home".into()], day())
                .unwrap();
        note.add_tags(["urgent", " ", "home", "Home"]);
        assert_eq!(note.text(), "buy milk");
        assert_eq!(note.tags(), ["home", "urgent", "Home"]);
    }

    #[test]
    fn display_shows_date_tags_and_text() {
        let note = GeneralNote::with_date("call bank", Vec::new(), day()).unwrap();
        assert_eq!(note.to_string(), "2024-03-05   [—]   call bank");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(
            GeneralNote::with_date("  ", Vec::new(), day()).unwrap_err(),
            ValidationError::EmptyNote
        );
    }
}
