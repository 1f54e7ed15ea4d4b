//! The questions the core needs answered by a human.
//!
//! The resolver and the organizer never read from a terminal. They ask a
//! [`Prompter`], which the binary implements with interactive menus and tests
//! implement with [`ScriptedPrompter`].

use crate::error::{MovierError, Result};
use crate::model::MovieDetails;
use std::collections::VecDeque;
use std::path::PathBuf;

/// Answer to "which of these movies is it?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Index into the presented candidates.
    Pick(usize),
    /// Use this external id directly.
    ExternalId(String),
    /// Search again with these keywords.
    Research(String),
    /// Leave this file alone.
    Skip,
}

pub trait Prompter {
    /// Pick among ranked candidates (best first).
    fn choose_movie(&mut self, candidates: &[MovieDetails]) -> Result<Choice>;

    /// Keywords or an external id to search with. Empty means give up.
    fn ask_keywords(&mut self) -> Result<String>;

    fn ask_language(&mut self, default: &str) -> Result<String>;

    /// An existing directory.
    fn ask_directory(&mut self, message: &str) -> Result<PathBuf>;
}

/// Prompter that replays queued answers.
///
/// When a queue runs dry it declines: `Skip` for choices, an empty answer for
/// keywords, the default for languages, and an error for directories.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    choices: VecDeque<Choice>,
    keywords: VecDeque<String>,
    languages: VecDeque<String>,
    directory: Option<PathBuf>,
    /// Number of candidates shown at each `choose_movie` call.
    pub presented: Vec<usize>,
    pub keyword_prompts: usize,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose(mut self, choice: Choice) -> Self {
        self.choices.push_back(choice);
        self
    }

    pub fn answer_keywords(mut self, answer: &str) -> Self {
        self.keywords.push_back(answer.to_string());
        self
    }

    pub fn answer_language(mut self, answer: &str) -> Self {
        self.languages.push_back(answer.to_string());
        self
    }

    pub fn answer_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.directory = Some(dir.into());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn choose_movie(&mut self, candidates: &[MovieDetails]) -> Result<Choice> {
        self.presented.push(candidates.len());
        Ok(self.choices.pop_front().unwrap_or(Choice::Skip))
    }

    fn ask_keywords(&mut self) -> Result<String> {
        self.keyword_prompts += 1;
        Ok(self.keywords.pop_front().unwrap_or_default())
    }

    fn ask_language(&mut self, default: &str) -> Result<String> {
        Ok(self
            .languages
            .pop_front()
            .unwrap_or_else(|| default.to_string()))
    }

    fn ask_directory(&mut self, _message: &str) -> Result<PathBuf> {
        self.directory
            .clone()
            .ok_or_else(|| MovierError::Prompt("no directory scripted".to_string()))
    }
}
