// debsolve-core/src/interaction/mod.rs
//! Questions put to the operator while resolving.
//!
//! The resolver only talks to a [`Prompt`]; the terminal implementation
//! lives in [`terminal`], non-interactive and scripted answers in
//! [`scripted`].
use std::fmt;

use debsolve_common::error::{DebsolveError, Result};

pub mod scripted;
pub mod terminal;

pub use scripted::{DefaultPrompt, ScriptedPrompt};
pub use terminal::TerminalPrompt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    YesNo {
        text: String,
        default: bool,
    },
    Choice {
        text: String,
        choices: Vec<String>,
        default: usize,
    },
    Text {
        text: String,
        default: Option<String>,
    },
    /// Free text over several lines, ended by an empty line.
    MultiLine { text: String },
}

impl Question {
    pub fn text(&self) -> &str {
        match self {
            Question::YesNo { text, .. }
            | Question::Choice { text, .. }
            | Question::Text { text, .. }
            | Question::MultiLine { text } => text,
        }
    }

    /// The answer given when nobody is there to ask.
    pub fn default_answer(&self) -> Answer {
        match self {
            Question::YesNo { default, .. } => Answer::YesNo(*default),
            Question::Choice { default, .. } => Answer::Choice(*default),
            Question::Text { default, .. } => Answer::Text(default.clone().unwrap_or_default()),
            Question::MultiLine { .. } => Answer::Text(String::new()),
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    YesNo(bool),
    Choice(usize),
    Text(String),
}

fn mismatch(question: &Question, answer: &Answer) -> DebsolveError {
    DebsolveError::Prompt(format!(
        "answer {answer:?} does not fit question '{}'",
        question.text()
    ))
}

pub trait Prompt {
    fn ask(&mut self, question: &Question) -> Result<Answer>;

    fn confirm(&mut self, text: &str, default: bool) -> Result<bool> {
        let question = Question::YesNo {
            text: text.to_string(),
            default,
        };
        match self.ask(&question)? {
            Answer::YesNo(yes) => Ok(yes),
            other => Err(mismatch(&question, &other)),
        }
    }

    fn choose(&mut self, text: &str, choices: Vec<String>, default: usize) -> Result<usize> {
        let count = choices.len();
        let question = Question::Choice {
            text: text.to_string(),
            choices,
            default,
        };
        match self.ask(&question)? {
            Answer::Choice(index) if index < count => Ok(index),
            other => Err(mismatch(&question, &other)),
        }
    }

    /// Trimmed text; an empty answer falls back to `default` when given.
    fn input(&mut self, text: &str, default: Option<&str>) -> Result<String> {
        let question = Question::Text {
            text: text.to_string(),
            default: default.map(str::to_string),
        };
        match self.ask(&question)? {
            Answer::Text(value) => {
                let value = value.trim();
                match (value.is_empty(), default) {
                    (true, Some(default)) => Ok(default.to_string()),
                    _ => Ok(value.to_string()),
                }
            }
            other => Err(mismatch(&question, &other)),
        }
    }

    fn input_lines(&mut self, text: &str) -> Result<String> {
        let question = Question::MultiLine {
            text: text.to_string(),
        };
        match self.ask(&question)? {
            Answer::Text(value) => Ok(value.trim().to_string()),
            other => Err(mismatch(&question, &other)),
        }
    }
}
