//! Optional text-service capabilities: command correction and semantic
//! note ranking.
//!
//! # Responsibility
//! - Define the [`Corrector`] and [`SemanticRanker`] seams used by the shell
//!   and the note store.
//! - Provide a disabled implementation and a chat-completion backed one.
//!
//! # Invariants
//! - Neither capability ever returns an error to its caller; service
//!   failures degrade to "no suggestion" / "no matches".
//! - A correction is always one of the supplied identifiers, verbatim.

use crate::model::note::GeneralNote;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod chat;
pub mod chat_assistant;

pub use chat::{ChatClient, ChatRequest, OpenAiChatClient};
pub use chat_assistant::ChatAssistant;

/// Failure of the external text service. Logged, never shown verbatim.
#[derive(Debug)]
pub enum AssistError {
    /// The service is not configured.
    Disabled,
    Transport(String),
    Status(u16),
    InvalidResponse(String),
}

impl Display for AssistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disabled => write!(f, "text service disabled"),
            Self::Transport(message) => write!(f, "text service transport error: {message}"),
            Self::Status(code) => write!(f, "text service returned HTTP {code}"),
            Self::InvalidResponse(message) => {
                write!(f, "text service returned an invalid response: {message}")
            }
        }
    }
}

impl Error for AssistError {}

/// Maps unrecognized input onto one command of a closed vocabulary.
pub trait Corrector {
    /// Returns one of `valid_commands` verbatim, or `None`.
    fn suggest(&self, raw_input: &str, valid_commands: &[&str]) -> Option<String>;
}

/// Ranks notes by relevance to a query.
pub trait SemanticRanker {
    /// Returns zero-based note indices, best first. May be empty.
    fn rank(&self, query: &str, notes: &[GeneralNote]) -> Vec<usize>;
}

/// Both capabilities plus an availability flag, as injected into the shell.
pub trait Assistant: Corrector + SemanticRanker {
    fn is_enabled(&self) -> bool;
}

/// Assistant used when no text service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledAssistant;

impl Corrector for DisabledAssistant {
    fn suggest(&self, _raw_input: &str, _valid_commands: &[&str]) -> Option<String> {
        None
    }
}

impl SemanticRanker for DisabledAssistant {
    fn rank(&self, _query: &str, _notes: &[GeneralNote]) -> Vec<usize> {
        Vec::new()
    }
}

impl Assistant for DisabledAssistant {
    fn is_enabled(&self) -> bool {
        false
    }
}
