use std::collections::VecDeque;

use console_prompt::{Choice, PromptError, PromptProvider};

/// One question asked through the scripted prompter, in ask order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    Text { label: String },
    MaskedText { label: String },
    Choice { label: String, options: Vec<String> },
}

/// Prompt double answering from a fixed script.
///
/// Asking with an exhausted script fails with [`PromptError::Closed`], which
/// doubles as proof that a flow stopped reading input.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub events: Vec<PromptEvent>,
}

impl ScriptedPrompter {
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            events: Vec::new(),
        }
    }

    fn next_answer(&mut self) -> Result<String, PromptError> {
        self.answers.pop_front().ok_or(PromptError::Closed)
    }
}

impl PromptProvider for ScriptedPrompter {
    fn ask_text(&mut self, label: &str) -> Result<String, PromptError> {
        self.events.push(PromptEvent::Text {
            label: label.to_string(),
        });
        self.next_answer()
    }

    fn ask_masked_text(&mut self, label: &str) -> Result<String, PromptError> {
        self.events.push(PromptEvent::MaskedText {
            label: label.to_string(),
        });
        self.next_answer()
    }

    fn ask_choice(&mut self, label: &str, choices: &[Choice]) -> Result<String, PromptError> {
        self.events.push(PromptEvent::Choice {
            label: label.to_string(),
            options: choices.iter().map(|choice| choice.label.clone()).collect(),
        });

        let answer = self.next_answer()?;
        // The real prompter only ever returns one of the offered values;
        // hold scripts to the same guarantee.
        assert!(
            choices.iter().any(|choice| choice.value == answer),
            "scripted answer {answer:?} is not among the offered choices"
        );
        Ok(answer)
    }
}
