use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use super::command::COMMANDS;

/// First-argument values offered after a command.
fn argument_values(command: &str) -> &'static [&'static str] {
    match command {
        "/set" => &["news", "personal", "controversial", "projects"],
        "/dictate" => &["personal", "project", "provoking", "stop", "cancel"],
        "/regenerate" => &["OpenAI", "Claude", "OpenRouter"],
        "/date" => &["clear"],
        _ => &[],
    }
}

/// Completion, highlighting and hints for slash commands and their first argument.
#[derive(Clone, Default)]
pub struct ReplHelper;

impl ReplHelper {
    pub fn new() -> Self {
        Self
    }

    /// Returns where the completed word starts and its candidates.
    fn candidates(&self, line: &str) -> (usize, Vec<&'static str>) {
        match line.split_once(' ') {
            None => (
                0,
                COMMANDS
                    .iter()
                    .copied()
                    .filter(|cmd| cmd.starts_with(line))
                    .collect(),
            ),
            Some((command, arg)) if !arg.contains(' ') => (
                command.len() + 1,
                argument_values(command)
                    .iter()
                    .copied()
                    .filter(|value| value.starts_with(arg))
                    .collect(),
            ),
            Some(_) => (line.len(), Vec::new()),
        }
    }
}

impl Helper for ReplHelper {}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.to_string(),
                replacement: candidate.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for ReplHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        match line.split_once(' ') {
            Some((command, rest)) if line.starts_with('/') => {
                Owned(format!("{} {}", command.bright_cyan(), rest))
            }
            None if line.starts_with('/') => Owned(line.bright_cyan().to_string()),
            _ => Borrowed(line),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return None;
        }
        let (start, candidates) = self.candidates(line);
        let typed = &line[start..];
        candidates
            .into_iter()
            .find(|candidate| candidate.len() > typed.len())
            .map(|candidate| candidate[typed.len()..].to_string())
    }
}

impl Validator for ReplHelper {}
