//! # Movier CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, while this file
//! only invokes `cli::run()` and handles process termination. Everything the
//! CLI does goes through [`movier::api::MovierApi`].
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/movier/cli/)                                │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + per-command handlers (commands.rs)      │
//! │  - Terminal rendering with colored (render.rs)              │
//! │  - Interactive menus with dialoguer (prompt.rs)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (src/movier/api.rs)                              │
//! │  - Fills in configuration, dispatches to commands           │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr through `tracing`, listings go to stdout, so
//! `movier find --no-play | less` only pages the results.
//!
//! ## Testing Approach
//!
//! - **Commands and core**: unit tests against in-memory stores, a scripted
//!   provider and a scripted prompter.
//! - **CLI**: argument parsing and layout helpers are unit tested here;
//!   `tests/cli.rs` drives the real binary with `MOVIER_HOME` in a temp dir.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
