//! Persistence of per-user stores and local accounts.
//!
//! # Responsibility
//! - Load and save address/note books scoped by owner.
//! - Register and verify local user accounts.
//!
//! # Invariants
//! - Loading never fails: unreadable state yields empty stores.
//! - Saving replaces an owner's snapshot atomically (one transaction).
//! - Persisted values re-enter the domain through the field validators.

use crate::db::DbError;
use crate::store::{AddressBook, NoteBook};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod book_repo;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A persisted row failed domain validation.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Flush target called by the shell when a session ends.
pub trait Persist {
    fn persist(&mut self, book: &AddressBook, notes: &NoteBook) -> RepoResult<()>;
}
