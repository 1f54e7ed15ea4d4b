//! # CLI Behavior
//!
//! This is **one possible UI client** for movier, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! For the overall architecture, see the crate-level documentation of the
//! `movier` library.
//!
//! ## Interactive Only When It Can Be
//!
//! `organize` asks questions (which movie is it, what language, where to put
//! it) through menus on stderr. `find` offers to play a result only when
//! stdin is a terminal and `--no-play` is absent, so piping the listing
//! never blocks.
//!
//! ## Credentials
//!
//! `organize` and `info` talk to OMDb and need an API key, from
//! `OMDB_API_KEY` or `movier config api_key <KEY>`. Every other command works
//! offline against the local catalog.
//!
//! ## Module Structure
//!
//! - `commands`: Per-command handlers that call the API and print results
//! - `prompt`: Terminal implementation of the prompter port
//! - `render`: Output formatting (colors, columns, wrapping)
//! - `setup`: Argument parsing via clap

mod commands;
mod prompt;
mod render;
pub mod setup;

pub use commands::run;
