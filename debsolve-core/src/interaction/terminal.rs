// debsolve-core/src/interaction/terminal.rs
use colored::Colorize;
use debsolve_common::error::{DebsolveError, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use super::{Answer, Prompt, Question};

/// Asks on the controlling terminal.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn read_line(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string()).show_default(true);
        }
        input.interact_text().map_err(prompt_error)
    }
}

fn prompt_error(e: dialoguer::Error) -> DebsolveError {
    DebsolveError::Prompt(e.to_string())
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &Question) -> Result<Answer> {
        println!();
        match question {
            Question::YesNo { text, default } => Confirm::with_theme(&self.theme)
                .with_prompt(text)
                .default(*default)
                .interact()
                .map(Answer::YesNo)
                .map_err(prompt_error),
            Question::Choice {
                text,
                choices,
                default,
            } => Select::with_theme(&self.theme)
                .with_prompt(text)
                .items(choices)
                .default(*default)
                .interact()
                .map(Answer::Choice)
                .map_err(prompt_error),
            Question::Text { text, default } => {
                self.read_line(text, default.as_deref()).map(Answer::Text)
            }
            Question::MultiLine { text } => {
                println!("{}", text);
                println!("{}", "(finish with an empty line)".dimmed());
                let mut lines = Vec::new();
                loop {
                    let line = self.read_line(">", None)?;
                    if line.trim().is_empty() {
                        break;
                    }
                    lines.push(line);
                }
                Ok(Answer::Text(lines.join("\n")))
            }
        }
    }
}
