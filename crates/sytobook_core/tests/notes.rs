use chrono::NaiveDate;
use std::cell::RefCell;
use sytobook_core::assist::{Corrector, DisabledAssistant, SemanticRanker};
use sytobook_core::store::{keyword_match, BookError, NoteBook, NoteSearch, TagGroup};
use sytobook_core::GeneralNote;

fn note(text: &str, tags: &[&str]) -> GeneralNote {
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    GeneralNote::with_date(text, tags.iter().map(|tag| tag.to_string()).collect(), day).unwrap()
}

fn book(notes: &[(&str, &[&str])]) -> NoteBook {
    let mut book = NoteBook::new();
    for (text, tags) in notes {
        book.push(note(text, tags));
    }
    book
}

/// Ranker returning fixed indices and recording the queries it saw.
struct FixedRanker {
    reply: Vec<usize>,
    queries: RefCell<Vec<String>>,
}

impl FixedRanker {
    fn new(reply: Vec<usize>) -> Self {
        Self {
            reply,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl SemanticRanker for FixedRanker {
    fn rank(&self, query: &str, _notes: &[GeneralNote]) -> Vec<usize> {
        self.queries.borrow_mut().push(query.to_string());
        self.reply.clone()
    }
}

#[test]
fn keyword_match_needs_every_word() {
    let n = note("Alpha rollout", &["beta"]);
    assert!(keyword_match("alpha beta", &n));
    assert!(!keyword_match("alpha gamma", &n));
    assert!(!keyword_match("delta beta", &n));
}

#[test]
fn group_by_tag_lists_note_under_each_tag() {
    let notes = book(&[("Ship it", &["work", "urgent"]), ("Groceries", &[])]);
    let groups = notes.group_by_tag();

    let labels: Vec<&str> = groups.keys().map(TagGroup::label).collect();
    assert_eq!(labels, ["urgent", "work", "untagged"]);
    assert_eq!(groups[&TagGroup::Tag("work".into())][0].text(), "Ship it");
    assert_eq!(groups[&TagGroup::Tag("urgent".into())][0].text(), "Ship it");
    assert_eq!(groups[&TagGroup::Untagged].len(), 1);
    assert_eq!(groups[&TagGroup::Untagged][0].text(), "Groceries");
}

#[test]
fn group_by_tag_folds_case() {
    let notes = book(&[("One", &["Work"]), ("Two", &["work"])]);
    let groups = notes.group_by_tag();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[&TagGroup::Tag("work".into())].len(), 2);
}

#[test]
fn add_tags_checks_one_based_position() {
    let mut notes = book(&[("One", &[])]);
    notes.add_tags(1, &["a".to_string(), "a".to_string()]).unwrap();
    assert_eq!(notes.notes()[0].tags(), ["a"]);

    assert_eq!(
        notes.add_tags(0, &["b".to_string()]),
        Err(BookError::NoteIndexOutOfRange { index: 0, len: 1 })
    );
    assert_eq!(
        notes.add_tags(2, &["b".to_string()]),
        Err(BookError::NoteIndexOutOfRange { index: 2, len: 1 })
    );
}

#[test]
fn empty_note_text_is_rejected() {
    let mut notes = NoteBook::new();
    assert!(notes.add_note("   ", Vec::new()).is_err());
    assert!(notes.is_empty());
    assert_eq!(notes.add_note("Hello", Vec::new()).unwrap(), 1);
}

#[test]
fn search_by_tag_is_exact() {
    let notes = book(&[("One", &["work"]), ("Two", &["Work"]), ("Three", &["workshop"])]);
    let hits: Vec<usize> = notes
        .search_by_tag("work")
        .into_iter()
        .map(|(index, _)| index)
        .collect();
    assert_eq!(hits, [0]);
}

#[test]
fn keyword_hits_skip_the_ranker() {
    let notes = book(&[("Buy milk", &[]), ("Call mom", &["family"])]);
    let ranker = FixedRanker::new(vec![0]);

    assert_eq!(notes.search_note("family", &ranker), NoteSearch::Keyword(vec![1]));
    assert!(ranker.queries.borrow().is_empty());
}

#[test]
fn ranker_indices_are_filtered_and_deduplicated() {
    let notes = book(&[("Buy milk", &[]), ("Call mom", &[])]);
    let ranker = FixedRanker::new(vec![1, 7, 1, 0]);

    assert_eq!(
        notes.search_note("dairy", &ranker),
        NoteSearch::Semantic(vec![1, 0])
    );
    assert_eq!(ranker.queries.borrow().as_slice(), ["dairy"]);
}

#[test]
fn disabled_assistant_yields_no_matches() {
    let notes = book(&[("Buy milk", &[])]);
    assert_eq!(
        notes.search_note("dairy", &DisabledAssistant),
        NoteSearch::NoMatches
    );
    assert_eq!(
        notes.search_note("  ", &FixedRanker::new(vec![0])),
        NoteSearch::NoMatches
    );
}

#[test]
fn disabled_corrector_never_suggests() {
    let vocabulary = ["add", "exit"];
    for raw in ["", "ad", "add", "please exit"] {
        assert_eq!(DisabledAssistant.suggest(raw, &vocabulary), None);
    }
}
