//! Local user accounts.
//!
//! # Invariants
//! - Usernames are stored trimmed and lowercase, without whitespace.
//! - Passwords are never stored; only `sha256(salt || password)` is.

use crate::repo::RepoError;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum AccountError {
    InvalidUsername(String),
    EmptyPassword,
    AlreadyExists(String),
    Repo(RepoError),
}

impl Display for AccountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(value) => write!(
                f,
                "Login `{value}` is invalid: use a non-empty name without spaces."
            ),
            Self::EmptyPassword => write!(f, "Password cannot be empty."),
            Self::AlreadyExists(value) => write!(f, "User {value} already registered."),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AccountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AccountError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

/// Normalizes a login to its stored form.
pub fn normalize_username(raw: &str) -> Result<String, AccountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(AccountError::InvalidUsername(trimmed.to_string()));
    }
    Ok(trimmed.to_lowercase())
}

/// Account storage over the shared SYTObook connection.
pub struct AccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> AccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn exists(&self, username: &str) -> Result<bool, AccountError> {
        let username = normalize_username(username)?;
        let found: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1);",
            [username.as_str()],
            |row| row.get(0),
        )?;
        Ok(found == 1)
    }

    /// Creates an account and returns the normalized username.
    pub fn register(&self, username: &str, password: &str) -> Result<String, AccountError> {
        let username = normalize_username(username)?;
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }
        if self.exists(&username)? {
            return Err(AccountError::AlreadyExists(username));
        }

        let salt = Uuid::new_v4().simple().to_string();
        self.conn.execute(
            "INSERT INTO users (username, password_salt, password_hash) VALUES (?1, ?2, ?3);",
            params![username, salt, hash_password(&salt, password)],
        )?;
        info!("event=account_register module=repo status=ok");
        Ok(username)
    }

    /// Checks credentials; returns the normalized username on success.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<String>, AccountError> {
        let Ok(username) = normalize_username(username) else {
            return Ok(None);
        };
        let stored: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT password_salt, password_hash FROM users WHERE username = ?1;",
                [username.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let verified = stored
            .map(|(salt, hash)| hash_password(&salt, password) == hash)
            .unwrap_or(false);
        if verified {
            info!("event=account_login module=repo status=ok");
            Ok(Some(username))
        } else {
            warn!("event=account_login module=repo status=rejected");
            Ok(None)
        }
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    hex::encode(
        Sha256::new()
            .chain_update(salt.as_bytes())
            .chain_update(password.as_bytes())
            .finalize(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_trimmed_lowercased_and_spaceless() {
        assert_eq!(normalize_username("  Alice ").unwrap(), "alice");
        assert!(normalize_username("   ").is_err());
        assert!(normalize_username("al ice").is_err());
    }

    #[test]
    fn hash_depends_on_salt() {
        assert_ne!(hash_password("a", "pw"), hash_password("b", "pw"));
        assert_eq!(hash_password("a", "pw").len(), 64);
    }
}
