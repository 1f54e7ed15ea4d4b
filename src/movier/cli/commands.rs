//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Uses `std::process::exit` (through `main.rs`)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Logging**: Install the `tracing` subscriber (stderr, `RUST_LOG` aware)
//! 3. **Context Setup**: Build `AppContext` with the API and the real adapters
//! 4. **API Dispatch**: Call the appropriate `MovierApi` method
//! 5. **Output Formatting**: Convert `CmdResult` into terminal output
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Builds `AppContext` with API and configuration
//! - `handle_*()`: Per-command handlers that call API and format output

use super::prompt::{ask_play, PlayAnswer, TerminalPrompter};
use super::render::{
    print_messages, render_config, render_genres, render_lookups, render_movie_list,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use movier::api::{MovierApi, OrganizeRequest};
use movier::catalog::QueryFilter;
use movier::commands::config::ConfigAction;
use movier::commands::info::InfoOptions;
use movier::commands::tag::parse_tags;
use movier::config::{home_dir, MovierConfig, API_KEY_ENV};
use movier::error::{MovierError, Result};
use movier::media::{CommandLauncher, HttpFetcher};
use movier::provider::omdb::OmdbProvider;
use movier::store::fs::FileStore;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: MovierApi<FileStore, OmdbProvider>,
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Organize {
            source,
            dir,
            lang,
            no_guess,
        } => handle_organize(&mut ctx, source, dir, lang, no_guess),
        Commands::Add { dir } => handle_add(&mut ctx, dir),
        Commands::Find {
            keywords,
            directors,
            writers,
            actors,
            genre,
            tags,
            exclude_tags,
            rated,
            points,
            limit,
            shuffle,
            add_tags,
            no_play,
        } => {
            let keywords = if keywords.is_empty() {
                None
            } else {
                Some(keywords.join(" "))
            };
            let filter = QueryFilter {
                keywords,
                directors,
                writers,
                actors,
                genre,
                tags,
                exclude_tags,
                rated,
                points,
                limit,
                shuffle,
            };
            let add_tags = add_tags.as_deref().map(parse_tags).unwrap_or_default();
            handle_find(&mut ctx, filter, add_tags, no_play)
        }
        Commands::Update => handle_update(&mut ctx),
        Commands::Info {
            keyword,
            year,
            detailed,
            all,
        } => handle_info(&ctx, keyword.join(" "), InfoOptions { year, all }, detailed),
        Commands::Genres => handle_genres(&ctx),
        Commands::Tag { ids, tags } => handle_tag(&mut ctx, ids, tags),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "movier=debug" } else { "movier=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = home_dir()?;
    let config = MovierConfig::load(&home)?;
    debug!(home = %home.display(), "using movier home");

    let provider = OmdbProvider::new(
        config.resolved_api_key().unwrap_or_default(),
        config.timeout(),
    )?
    .with_api_url(&config.api_url)
    .with_retries(config.retries);

    let store = FileStore::new(&home);
    let api = MovierApi::new(store, provider, config, home)?;

    Ok(AppContext {
        api,
        verbose: cli.verbose,
    })
}

fn require_api_key(ctx: &AppContext) -> Result<()> {
    if ctx.api.config().resolved_api_key().is_some() {
        return Ok(());
    }
    Err(MovierError::Config(format!(
        "An OMDb API key is required. Set {} or run `movier config api_key <KEY>`.",
        API_KEY_ENV
    )))
}

fn handle_organize(
    ctx: &mut AppContext,
    source: Option<PathBuf>,
    target: Option<PathBuf>,
    language: Option<String>,
    no_guess: bool,
) -> Result<()> {
    require_api_key(ctx)?;
    let source = match source {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let fetcher = HttpFetcher::new(ctx.api.config().timeout())?;
    let mut prompter = TerminalPrompter::new();

    let request = OrganizeRequest {
        source,
        target,
        language,
        no_guess,
    };
    let result = ctx.api.organize(request, &mut prompter, &fetcher)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, dir: PathBuf) -> Result<()> {
    let result = ctx.api.add(&dir)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_find(
    ctx: &mut AppContext,
    filter: QueryFilter,
    add_tags: Vec<String>,
    no_play: bool,
) -> Result<()> {
    let verbose = ctx.verbose || filter.shuffle;
    let interactive = !no_play && std::io::stdin().is_terminal();
    let launcher = CommandLauncher::new(ctx.api.config().player.as_deref());
    let mut rng = rand::thread_rng();

    loop {
        let result = ctx.api.find(&filter, &add_tags, &mut rng)?;
        print!("{}", render_movie_list(&result.movies, verbose));
        print_messages(&result.messages);

        if !interactive || result.movies.is_empty() {
            return Ok(());
        }

        match ask_play(result.movies.len(), filter.shuffle)? {
            PlayAnswer::Play(number) => {
                let played = ctx.api.play(&result.movies[number - 1], &launcher)?;
                print_messages(&played.messages);
                return Ok(());
            }
            PlayAnswer::Another => println!(),
            PlayAnswer::Quit => return Ok(()),
        }
    }
}

fn handle_update(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.update()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_info(
    ctx: &AppContext,
    keyword: String,
    options: InfoOptions,
    detailed: bool,
) -> Result<()> {
    require_api_key(ctx)?;
    let result = ctx.api.info(&keyword, &options)?;
    print!("{}", render_lookups(&result.lookups, detailed || ctx.verbose));
    print_messages(&result.messages);
    Ok(())
}

fn handle_genres(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.genres();
    print_messages(&result.messages);
    print!("{}", render_genres(&result.genres));
    Ok(())
}

fn handle_tag(ctx: &mut AppContext, ids: Vec<String>, tags: String) -> Result<()> {
    let result = ctx.api.tag(&ids, &parse_tags(&tags))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.configure(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
