//! Ordered note store with tag and keyword retrieval.
//!
//! # Responsibility
//! - Append notes and extend their tags by one-based position.
//! - Exact tag lookup, tag grouping and two-phase (keyword, then semantic)
//!   search.
//!
//! # Invariants
//! - Store order is insertion order; it is the only ranking for keyword hits.
//! - Semantic ranking is best-effort: failures degrade to no matches.

use crate::assist::SemanticRanker;
use crate::model::note::GeneralNote;
use crate::store::{BookError, BookResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));
static TAG_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,]+").expect("valid tag split regex"));

/// Group key for [`NoteBook::group_by_tag`]. Untagged sorts last.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TagGroup {
    /// Lowercased tag name.
    Tag(String),
    Untagged,
}

impl TagGroup {
    pub fn label(&self) -> &str {
        match self {
            Self::Tag(tag) => tag.as_str(),
            Self::Untagged => "untagged",
        }
    }
}

/// Result of [`NoteBook::search_note`]; indices are zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteSearch {
    Keyword(Vec<usize>),
    Semantic(Vec<usize>),
    NoMatches,
}

/// Ordered collection of general notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteBook {
    notes: Vec<GeneralNote>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[GeneralNote] {
        &self.notes
    }

    /// Appends a note stamped today; returns its one-based position.
    pub fn add_note(&mut self, text: &str, tags: Vec<String>) -> BookResult<usize> {
        let note = GeneralNote::new(text, tags)?;
        Ok(self.push(note))
    }

    /// Appends an already-built note; returns its one-based position.
    pub fn push(&mut self, note: GeneralNote) -> usize {
        self.notes.push(note);
        self.notes.len()
    }

    /// Adds tags to the note at one-based `position`.
    pub fn add_tags(&mut self, position: usize, tags: &[String]) -> BookResult<()> {
        let len = self.notes.len();
        let note = position
            .checked_sub(1)
            .and_then(|index| self.notes.get_mut(index))
            .ok_or(BookError::NoteIndexOutOfRange {
                index: position,
                len,
            })?;
        note.add_tags(tags);
        Ok(())
    }

    /// Notes carrying exactly `tag` (case-sensitive), with zero-based indices.
    pub fn search_by_tag(&self, tag: &str) -> Vec<(usize, &GeneralNote)> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| note.has_tag(tag))
            .collect()
    }

    /// Groups notes by lowercased tag, sorted by tag name.
    ///
    /// A note with several tags is listed in each group; notes without tags
    /// land in [`TagGroup::Untagged`].
    pub fn group_by_tag(&self) -> BTreeMap<TagGroup, Vec<&GeneralNote>> {
        let mut groups: BTreeMap<TagGroup, Vec<&GeneralNote>> = BTreeMap::new();
        for note in &self.notes {
            if note.tags().is_empty() {
                groups.entry(TagGroup::Untagged).or_default().push(note);
                continue;
            }
            for tag in note.tags() {
                let bucket = groups.entry(TagGroup::Tag(tag.to_lowercase())).or_default();
                if !bucket.iter().any(|existing| std::ptr::eq(*existing, note)) {
                    bucket.push(note);
                }
            }
        }
        groups
    }

    /// Zero-based indices of notes matching every query word.
    pub fn keyword_search(&self, query: &str) -> Vec<usize> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, note)| keyword_match(query, note))
            .map(|(index, _)| index)
            .collect()
    }

    /// Keyword search first; semantic ranking only when nothing matched.
    ///
    /// Blank queries and empty stores return [`NoteSearch::NoMatches`]
    /// without consulting the ranker.
    pub fn search_note<R>(&self, query: &str, ranker: &R) -> NoteSearch
    where
        R: SemanticRanker + ?Sized,
    {
        if query.trim().is_empty() || self.notes.is_empty() {
            return NoteSearch::NoMatches;
        }

        let hits = self.keyword_search(query);
        if !hits.is_empty() {
            debug!("event=note_search module=store phase=keyword hits={}", hits.len());
            return NoteSearch::Keyword(hits);
        }

        let mut ranked = Vec::new();
        for index in ranker.rank(query, &self.notes) {
            if index < self.notes.len() && !ranked.contains(&index) {
                ranked.push(index);
            }
        }
        debug!("event=note_search module=store phase=semantic hits={}", ranked.len());
        if ranked.is_empty() {
            NoteSearch::NoMatches
        } else {
            NoteSearch::Semantic(ranked)
        }
    }
}

/// True when every lowercase query word is a substring of the note text or
/// of its space-joined tags.
pub fn keyword_match(query: &str, note: &GeneralNote) -> bool {
    let text = note.text().to_lowercase();
    let tags = note.tags().join(" ").to_lowercase();
    WORD_RE.find_iter(query).all(|word| {
        let word = word.as_str().to_lowercase();
        text.contains(&word) || tags.contains(&word)
    })
}

/// Splits operator tag input on whitespace and commas.
pub fn split_tags(raw: &str) -> Vec<String> {
    TAG_SPLIT_RE
        .split(raw)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn note(text: &str, tags: &[&str]) -> GeneralNote {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        GeneralNote::with_date(text, tags.iter().map(|t| t.to_string()).collect(), day).unwrap()
    }

    #[test]
    fn keyword_match_requires_all_words_in_text_or_tags() {
        let n = note("Alpha release plan", &["beta-team"]);
        assert!(keyword_match("alpha beta", &n));
        assert!(keyword_match("ALPH plan", &n));
        assert!(!keyword_match("alpha gamma", &n));
    }

    #[test]
    fn split_tags_accepts_commas_and_spaces() {
        assert_eq!(split_tags("work, urgent  home,"), ["work", "urgent", "home"]);
        assert!(split_tags(" , ").is_empty());
    }

    #[test]
    fn tag_groups_sort_by_name_with_untagged_last() {
        let mut book = NoteBook::new();
        book.push(note("one", &["Work", "urgent"]));
        book.push(note("two", &[]));
        let keys: Vec<_> = book.group_by_tag().into_keys().collect();
        assert_eq!(
            keys,
            vec![
                TagGroup::Tag("urgent".into()),
                TagGroup::Tag("work".into()),
                TagGroup::Untagged
            ]
        );
    }

    #[test]
    fn add_tags_rejects_positions_outside_the_store() {
        let mut book = NoteBook::new();
        book.push(note("one", &[]));
        assert_eq!(
            book.add_tags(0, &["x".into()]).unwrap_err(),
            BookError::NoteIndexOutOfRange { index: 0, len: 1 }
        );
        assert!(book.add_tags(2, &["x".into()]).is_err());
        book.add_tags(1, &["x".into()]).unwrap();
        assert_eq!(book.notes()[0].tags(), ["x"]);
    }
}
