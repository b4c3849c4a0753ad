//! Blocking prompt toolkit for line-oriented terminal clients.
//!
//! `console_prompt` asks questions the way classic interactive CLIs do: a
//! prefixed question, then a line of input. It covers free-text questions,
//! masked secret entry, and numbered choice lists.
//!
//! # Public API Overview
//! - Ask questions through the [`PromptProvider`] trait so flows can be
//!   driven by scripted answers in tests.
//! - Use [`ProcessPrompter`] to bind the trait to the process terminal; it
//!   handles echo suppression for secrets via termios.
//! - Build choice lists from [`Choice`] value/label pairs.

pub mod platform;
pub mod prompt;

/// Prompt contract and its building blocks.
pub use crate::prompt::{Choice, PromptError, PromptProvider};

/// Process-backed implementation and the question marker it prints.
pub use crate::platform::process_prompter::{ProcessPrompter, PROMPT_PREFIX};
