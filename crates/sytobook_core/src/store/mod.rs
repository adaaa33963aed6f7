//! In-memory stores operated on by the shell.
//!
//! # Responsibility
//! - Own the keyed contact collection and the ordered note collection.
//! - Keep every store operation synchronous and free of terminal I/O.
//!
//! # Invariants
//! - Resolution never guesses: multiple matches surface as
//!   [`BookError::Ambiguous`] or [`Resolution::Ambiguous`].

use crate::model::contact::ContactError;
use crate::model::field::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod address_book;
pub mod note_book;

pub use address_book::{disambiguate, AddressBook, Resolution, UpcomingBirthday};
pub use note_book::{keyword_match, split_tags, NoteBook, NoteSearch, TagGroup};

pub type BookResult<T> = Result<T, BookError>;

/// Store-level failure for contact and note operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// No contact matched the query.
    NotFound(String),
    /// More than one contact key matched; candidates are sorted.
    Ambiguous(Vec<String>),
    Contact(ContactError),
    /// One-based note position outside the store.
    NoteIndexOutOfRange { index: usize, len: usize },
    /// Note position was not a positive integer.
    InvalidNoteIndex(String),
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(_) => write!(f, "Contact not found."),
            Self::Ambiguous(candidates) => {
                write!(f, "Multiple contacts match: {}.", candidates.join(", "))
            }
            Self::Contact(err) => write!(f, "{err}"),
            Self::NoteIndexOutOfRange { index, len } => {
                write!(f, "Note #{index} does not exist (there are {len} notes).")
            }
            Self::InvalidNoteIndex(value) => {
                write!(f, "Note index must be a positive number, got `{value}`.")
            }
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contact(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactError> for BookError {
    fn from(value: ContactError) -> Self {
        Self::Contact(value)
    }
}

impl From<ValidationError> for BookError {
    fn from(value: ValidationError) -> Self {
        Self::Contact(ContactError::Validation(value))
    }
}
