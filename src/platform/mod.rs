//! Platform-specific terminal integrations.

pub mod process_prompter;

pub use process_prompter::{ProcessPrompter, PROMPT_PREFIX};
