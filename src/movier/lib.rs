//! # Movier Architecture
//!
//! Movier identifies movie files against IMDb data (through the OMDb API),
//! files them into a tidy library tree, and keeps a local catalog of what it
//! filed so the collection can be searched, tagged and played.
//!
//! It is a library first. The `movier` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders output, runs terminal prompts  │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, fills in configuration        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - organize, add, find, update, info, genres, tag, config   │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core                                                       │
//! │  - parser → resolver (uses provider + prompt) → normalize   │
//! │  - catalog over store (FileStore / InMemoryStore)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! `organize`: file scan → [`parser`] → [`resolver`] (asks the
//! [`provider`], and the [`prompt`] port when unsure) → file moved and an
//! `imdb.txt` marker written next to it.
//!
//! `add`: marker files → [`normalize`] → [`catalog`] → `data.yaml`.
//!
//! `find`: [`catalog::LocalCatalog::query`] → rendered list → optional play.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout or stderr, never exits the
//! process and never reads from a terminal. Human decisions go through the
//! [`prompt::Prompter`] trait, network through [`provider::MetadataProvider`],
//! downloads and playback through [`media::FileFetcher`] and
//! [`media::MediaLauncher`]. Each has an in-memory double, so every command is
//! tested without a network or a terminal.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`parser`]: Title and year from a file name
//! - [`resolver`]: File name to provider record, with the auto-pick heuristic
//! - [`provider`]: Metadata provider trait, OMDb client, scripted double
//! - [`prompt`]: Questions for a human, as a trait
//! - [`normalize`]: Provider record to catalog record
//! - [`catalog`]: The local catalog and its query engine
//! - [`store`]: Catalog persistence
//! - [`media`]: Poster downloads, file moves, player launch
//! - [`model`]: Core data types
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing, rendering and prompts for the binary (not part of the lib API)

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod media;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod resolver;
pub mod store;
