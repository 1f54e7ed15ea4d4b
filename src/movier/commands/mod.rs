//! # Command Layer
//!
//! The business logic of movier. Each command lives in its own submodule and
//! works on catalog handles, providers and prompters passed in by the caller.
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal output**: no stdout or stderr. Progress goes through `tracing`,
//!   results come back as data.
//! - **Argument parsing**: that's the CLI layer's job.
//! - **Exit codes**: return `Result`, let the caller decide.
//!
//! Questions that need a human (which movie is it, what language) go through
//! the [`crate::prompt::Prompter`] port, never straight to a terminal.
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`]:
//! - `movies`: catalog movies to display, in order
//! - `lookups`: provider records to display (for `info`)
//! - `organized`: files filed away by `organize`
//! - `genres`: the genre vocabulary
//! - `config`: configuration data (for `config`)
//! - `messages`: structured messages with levels (info, success, warning, error)
//!
//! ## Command Modules
//!
//! - [`organize`]: identify media files and file them into a library tree
//! - [`add`]: add an organized directory (a box) to the catalog
//! - [`find`]: query the catalog, tag the results, play a movie
//! - [`update`]: rebuild the catalog from its boxes
//! - [`info`]: look a title up on the provider
//! - [`genres`]: list the genre vocabulary
//! - [`tag`]: tag movies by id
//! - [`config`]: show or change settings

use crate::config::MovierConfig;
use crate::model::{CatalogMovie, MovieDetails};
use serde::Serialize;
use std::path::PathBuf;

pub mod add;
pub mod config;
pub mod find;
pub mod genres;
pub mod info;
pub mod organize;
pub mod tag;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A provider record as shown by `info`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub details: MovieDetails,
    /// Already in the local catalog.
    pub available: bool,
}

/// A media file that `organize` filed away.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizedMovie {
    pub details: MovieDetails,
    pub guessed: bool,
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub movies: Vec<CatalogMovie>,
    pub lookups: Vec<Lookup>,
    pub organized: Vec<OrganizedMovie>,
    pub genres: Vec<String>,
    pub config: Option<MovierConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_movies(mut self, movies: Vec<CatalogMovie>) -> Self {
        self.movies = movies;
        self
    }

    pub fn with_lookups(mut self, lookups: Vec<Lookup>) -> Self {
        self.lookups = lookups;
        self
    }

    pub fn with_config(mut self, config: MovierConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}
