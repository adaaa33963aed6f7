//! Domain model for contacts and notes.
//!
//! # Responsibility
//! - Define validated field wrappers that gate every value entering a record.
//! - Define the contact record and the free-text general note.
//!
//! # Invariants
//! - Stored fields are only ever built through their validating constructors.
//! - Field values are immutable; replacement builds a new field.

pub mod contact;
pub mod field;
pub mod note;
