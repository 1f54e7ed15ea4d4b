use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "movier",
    bin_name = "movier",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Identify, organize and browse a collection of movie files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logs, detailed listings)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Identify movie files and file them into a library tree
    #[command(alias = "o", display_order = 1)]
    Organize {
        /// Directory to scan for movie files (defaults to the current directory)
        source: Option<PathBuf>,

        /// Library directory to file movies into
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Language of every movie in this run (asked per movie if omitted)
        #[arg(short, long)]
        lang: Option<String>,

        /// Always show the choice menu, even for clear winners
        #[arg(long)]
        no_guess: bool,
    },

    /// Add an organized directory to the local catalog
    #[command(display_order = 2)]
    Add {
        /// Directory containing imdb.txt marker files
        dir: PathBuf,
    },

    /// Search the local catalog
    #[command(alias = "f", display_order = 3)]
    Find {
        /// Words to look for in titles (or "watched")
        #[arg(num_args = 0..)]
        keywords: Vec<String>,

        /// Comma separated directors
        #[arg(long)]
        directors: Option<String>,

        /// Comma separated writers
        #[arg(long)]
        writers: Option<String>,

        /// Comma separated actors
        #[arg(long)]
        actors: Option<String>,

        /// Comma separated genres (see `movier genres`)
        #[arg(short, long)]
        genre: Option<String>,

        /// Comma separated tags that must all be present
        #[arg(short, long)]
        tags: Option<String>,

        /// Comma separated tags that must all be absent
        #[arg(short = 'x', long)]
        exclude_tags: Option<String>,

        /// Comma separated content ratings (e.g. PG-13,R)
        #[arg(long)]
        rated: Option<String>,

        /// Minimum IMDb rating
        #[arg(short, long)]
        points: Option<f64>,

        /// Show at most this many movies
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Pick one movie at random (implies --verbose)
        #[arg(short, long)]
        shuffle: bool,

        /// Comma separated tags to add to every listed movie
        #[arg(long)]
        add_tags: Option<String>,

        /// List only, never ask to play
        #[arg(long)]
        no_play: bool,
    },

    /// Rebuild the catalog from its directories
    #[command(display_order = 4)]
    Update,

    /// Look a title up on IMDb
    #[command(alias = "i", display_order = 5)]
    Info {
        /// Title to search for
        #[arg(required = true, num_args = 1..)]
        keyword: Vec<String>,

        /// Release year
        #[arg(short, long)]
        year: Option<String>,

        /// Show plot, cast and crew
        #[arg(short, long)]
        detailed: bool,

        /// Include series, episodes and titles with few votes
        #[arg(short, long)]
        all: bool,
    },

    /// List IMDb genres
    #[command(display_order = 6)]
    Genres,

    /// Tag movies by IMDb id
    #[command(display_order = 7)]
    Tag {
        /// IMDb ids (e.g. tt0113277)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Comma separated tags
        #[arg(short, long, required = true)]
        tags: String,
    },

    /// Get or set configuration
    #[command(display_order = 8)]
    Config {
        /// Configuration key (e.g., api_key)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
