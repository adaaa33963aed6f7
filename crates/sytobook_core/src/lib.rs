//! Core domain logic for SYTObook.
//! This crate is the single source of truth for contact, note and session
//! invariants.

pub mod assist;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod shell;
pub mod store;

pub use assist::{
    Assistant, ChatAssistant, Corrector, DisabledAssistant, OpenAiChatClient, SemanticRanker,
};
pub use config::{AppConfig, AssistantSettings, ConfigError, ConfigOverrides};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{make_key, Contact, ContactError};
pub use model::field::ValidationError;
pub use model::note::GeneralNote;
pub use repo::account_repo::{AccountError, AccountRepository};
pub use repo::book_repo::UserStore;
pub use repo::{Persist, RepoError, RepoResult};
pub use shell::{ExitReason, PromptInput, Prompter, Session};
pub use store::{AddressBook, BookError, NoteBook, Resolution};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
