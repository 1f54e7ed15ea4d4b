//! # API Facade
//!
//! A **thin facade** over the command layer and the single entry point for
//! every movier operation, whatever the UI.
//!
//! The facade dispatches to `commands/*.rs`, fills in settings from
//! [`MovierConfig`] and returns `Result<CmdResult>`. It holds no business logic
//! and does no terminal I/O.
//!
//! ## Generic Over Store and Provider
//!
//! `MovierApi<S: CatalogStore, P: MetadataProvider>`:
//! - Production: `MovierApi<FileStore, OmdbProvider>`
//! - Testing: `MovierApi<InMemoryStore, ScriptedProvider>`
//!
//! Interactive questions and side effects (prompter, poster fetcher, player)
//! are passed per call, since only some commands need them.

use crate::catalog::{LocalCatalog, QueryFilter};
use crate::commands;
use crate::commands::config::ConfigAction;
use crate::commands::info::InfoOptions;
use crate::commands::organize::OrganizeOptions;
use crate::config::MovierConfig;
use crate::error::Result;
use crate::media::{FileFetcher, MediaLauncher};
use crate::model::CatalogMovie;
use crate::prompt::Prompter;
use crate::provider::MetadataProvider;
use crate::store::CatalogStore;
use rand::Rng;
use std::path::{Path, PathBuf};

/// What `organize` needs from the caller.
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub language: Option<String>,
    pub no_guess: bool,
}

pub struct MovierApi<S: CatalogStore, P: MetadataProvider> {
    catalog: LocalCatalog<S>,
    provider: P,
    config: MovierConfig,
    home: PathBuf,
}

impl<S: CatalogStore, P: MetadataProvider> MovierApi<S, P> {
    pub fn new(store: S, provider: P, config: MovierConfig, home: PathBuf) -> Result<Self> {
        Ok(Self {
            catalog: LocalCatalog::open(store)?,
            provider,
            config,
            home,
        })
    }

    pub fn config(&self) -> &MovierConfig {
        &self.config
    }

    pub fn catalog(&self) -> &LocalCatalog<S> {
        &self.catalog
    }

    pub fn organize<Q: Prompter, F: FileFetcher>(
        &mut self,
        request: OrganizeRequest,
        prompter: &mut Q,
        fetcher: &F,
    ) -> Result<commands::CmdResult> {
        let options = OrganizeOptions {
            source: request.source,
            target: request.target,
            language: request.language,
            default_language: self.config.language.clone(),
            auto_guess: self.config.auto_guess && !request.no_guess,
            min_size: self.config.min_file_size(),
            limits: self.config.limits(),
        };
        commands::organize::run(&self.provider, prompter, fetcher, &options)
    }

    pub fn add(&mut self, dir: &Path) -> Result<commands::CmdResult> {
        commands::add::run(&mut self.catalog, dir)
    }

    pub fn find<R: Rng + ?Sized>(
        &mut self,
        filter: &QueryFilter,
        add_tags: &[String],
        rng: &mut R,
    ) -> Result<commands::CmdResult> {
        commands::find::run(&mut self.catalog, filter, add_tags, rng)
    }

    pub fn play<L: MediaLauncher>(
        &self,
        movie: &CatalogMovie,
        launcher: &L,
    ) -> Result<commands::CmdResult> {
        commands::find::play(movie, self.config.min_file_size(), launcher)
    }

    pub fn update(&mut self) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.catalog)
    }

    pub fn info(&self, keyword: &str, options: &InfoOptions) -> Result<commands::CmdResult> {
        commands::info::run(&self.provider, &self.catalog, keyword, options)
    }

    pub fn genres(&self) -> commands::CmdResult {
        commands::genres::run()
    }

    pub fn tag(&mut self, ids: &[String], tags: &[String]) -> Result<commands::CmdResult> {
        commands::tag::run(&mut self.catalog, ids, tags)
    }

    pub fn configure(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let result = commands::config::run(&self.home, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }
}
