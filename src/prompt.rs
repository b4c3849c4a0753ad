//! Prompt contract shared by interactive flows and their test doubles.

use std::fmt;
use std::io;

/// One selectable entry of a choice prompt.
///
/// `label` is what the user sees in the numbered list; `value` is what the
/// asking code gets back when the entry is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Failure raised while asking a question.
#[derive(Debug)]
pub enum PromptError {
    /// The input stream ended before an answer was read.
    Closed,
    /// A choice prompt was asked without any entries.
    NoChoices,
    Io(io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => f.write_str("input closed before an answer was read"),
            Self::NoChoices => f.write_str("choice prompt has no entries"),
            Self::Io(source) => write!(f, "prompt I/O failed: {source}"),
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for PromptError {
    fn from(source: io::Error) -> Self {
        Self::Io(source)
    }
}

/// Blocking question-and-answer surface.
///
/// Every question blocks until a full line of input arrives. Implementations
/// own how the question is presented; callers only see the entered answer.
pub trait PromptProvider {
    /// Asks a free-text question and returns the entered line.
    fn ask_text(&mut self, label: &str) -> Result<String, PromptError>;

    /// Asks for a secret. The entered characters are not echoed back.
    fn ask_masked_text(&mut self, label: &str) -> Result<String, PromptError>;

    /// Presents a numbered list and returns the `value` of the chosen entry.
    ///
    /// Out-of-range or non-numeric answers re-ask; the call only returns with
    /// one of the given values. Asking with no entries is an error.
    fn ask_choice(&mut self, label: &str, choices: &[Choice]) -> Result<String, PromptError>;
}
