//! Interactive command shell.
//!
//! # Responsibility
//! - Own the command vocabulary, argument completion, rendering and the
//!   per-turn session state machine.
//! - Keep terminal I/O behind [`Prompter`] so sessions are scriptable.

pub mod command;
pub mod render;
pub mod session;

pub use command::{complete_args, ArgCompletion, Command, Mode, Param};
pub use session::{ExitReason, PromptInput, Prompter, Session, ShellError, ShellMode, Turn};
