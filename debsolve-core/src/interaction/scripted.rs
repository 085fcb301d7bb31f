// debsolve-core/src/interaction/scripted.rs
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use debsolve_common::error::{DebsolveError, Result};
use tracing::debug;

use super::{Answer, Prompt, Question};

/// Answers every question with its default. Used in non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrompt;

impl Prompt for DefaultPrompt {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        let answer = question.default_answer();
        debug!("Answering '{}' with {:?}", question.text(), answer);
        Ok(answer)
    }
}

/// Replays a queue of answers and records every question asked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<Answer>,
    asked: Rc<RefCell<Vec<Question>>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Rc::default(),
        }
    }

    /// Shared view of the questions, still readable after the prompt is boxed.
    pub fn transcript(&self) -> Rc<RefCell<Vec<Question>>> {
        Rc::clone(&self.asked)
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        self.asked.borrow_mut().push(question.clone());
        self.answers.pop_front().ok_or_else(|| {
            DebsolveError::Prompt(format!("no answer left for '{}'", question.text()))
        })
    }
}
