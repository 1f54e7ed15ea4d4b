//! Terminal side of the prompter port: dialoguer menus drawn on stderr.

use console::Term;
use dialoguer::{Confirm, Input, Select};
use movier::error::{MovierError, Result};
use movier::model::MovieDetails;
use movier::prompt::{Choice, Prompter};
use std::path::PathBuf;

const USE_ID: &str = "[ Use IMDB ID ]";
const RESEARCH: &str = "[ Use another keyword ]";
const IGNORE: &str = "[ Ignore ]";

pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn input(&self, prompt: &str, allow_empty: bool) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text_on(&self.term)?;
        Ok(answer.trim().to_string())
    }
}

pub fn candidate_label(details: &MovieDetails) -> String {
    format!(
        "{} at {} points with {} votes",
        details.nice_name(),
        details.raw_rating,
        details.raw_votes
    )
}

impl Prompter for TerminalPrompter {
    fn choose_movie(&mut self, candidates: &[MovieDetails]) -> Result<Choice> {
        let mut labels: Vec<String> = candidates.iter().map(candidate_label).collect();
        labels.extend([USE_ID, RESEARCH, IGNORE].map(str::to_string));

        let picked = Select::new()
            .with_prompt("Which movie is this?")
            .items(&labels)
            .default(0)
            .interact_on(&self.term)?;

        if picked < candidates.len() {
            return Ok(Choice::Pick(picked));
        }
        match labels[picked].as_str() {
            USE_ID => {
                let id = self.input("IMDB ID", false)?;
                Ok(Choice::ExternalId(id))
            }
            RESEARCH => {
                let keywords = self.input("Keywords to search with", true)?;
                if keywords.is_empty() {
                    Ok(Choice::Skip)
                } else {
                    Ok(Choice::Research(keywords))
                }
            }
            _ => Ok(Choice::Skip),
        }
    }

    fn ask_keywords(&mut self) -> Result<String> {
        self.input("Please, provide keywords/IMDB ID to search with", true)
    }

    fn ask_language(&mut self, default: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt("Language of this movie")
            .default(default.to_string())
            .interact_text_on(&self.term)?;
        Ok(answer.trim().to_string())
    }

    fn ask_directory(&mut self, message: &str) -> Result<PathBuf> {
        loop {
            let answer = self.input(message, false)?;
            let dir = PathBuf::from(&answer);
            if dir.is_dir() {
                return Ok(dir);
            }
            self.term
                .write_line(&format!("{} is not an existing directory.", answer))?;
        }
    }
}

/// What to do after a `find` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayAnswer {
    /// 1-based number from the listing.
    Play(usize),
    /// Draw another random movie.
    Another,
    Quit,
}

pub fn ask_play(count: usize, shuffle: bool) -> Result<PlayAnswer> {
    let term = Term::stderr();
    if shuffle {
        let play = Confirm::new()
            .with_prompt("Play this movie?")
            .default(true)
            .interact_on(&term)?;
        return Ok(if play {
            PlayAnswer::Play(1)
        } else {
            PlayAnswer::Another
        });
    }

    let answer: String = Input::new()
        .with_prompt(format!("Play which movie? (1-{}, blank to quit)", count))
        .allow_empty(true)
        .interact_text_on(&term)?;
    parse_play_answer(&answer, count)
}

fn parse_play_answer(answer: &str, count: usize) -> Result<PlayAnswer> {
    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
        return Ok(PlayAnswer::Quit);
    }
    answer
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(PlayAnswer::Play)
        .ok_or_else(|| MovierError::Prompt(format!("Not a movie number: {}", answer)))
}
