//! # Rendering Module
//!
//! Styled terminal output with `colored`. Render functions build strings and
//! handlers print them, so layout can be checked in tests without a
//! terminal.
//!
//! Layout is a two column affair: a status column padded to [`STATUS_WIDTH`]
//! display columns (Unicode aware), then the message. Long values wrap every
//! [`WORDS_PER_LINE`] words and continuation lines are indented to line up
//! with the message column.

use colored::{ColoredString, Colorize};
use movier::commands::{CmdMessage, Lookup, MessageLevel};
use movier::config::{MovierConfig, KEYS};
use movier::model::{CatalogMovie, MovieDetails};
use unicode_width::UnicodeWidthStr;

pub const STATUS_WIDTH: usize = 20;
pub const INDEX_WIDTH: usize = 5;
pub const WORDS_PER_LINE: usize = 10;
const GENRES_PER_ROW: usize = 6;
const GENRE_WIDTH: usize = 14;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// Red below 6, bold yellow from 6, bold green from 8.
pub fn rated(text: &str, rating: f64) -> ColoredString {
    if rating >= 8.0 {
        text.green().bold()
    } else if rating >= 6.0 {
        text.yellow().bold()
    } else {
        text.red()
    }
}

/// Pads `text` with spaces to `width` display columns.
pub fn pad_to(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(padding))
}

/// Breaks `text` every `per_line` words, indenting continuation lines.
pub fn wrap_words(text: &str, per_line: usize, indent: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return String::new();
    }
    let separator = format!("\n{}", " ".repeat(indent));
    words
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join(&separator)
}

/// One status line, e.g. `Available Movie     Heat [1995]`.
fn status_line(status: ColoredString, message: &str) -> String {
    let padding = STATUS_WIDTH.saturating_sub(status.input.width());
    format!("{}{}{}\n", status, " ".repeat(padding), message)
}

/// An indented `label  value` row under a movie header.
fn field_line(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    let indent = INDEX_WIDTH + STATUS_WIDTH;
    format!(
        "{}{}{}\n",
        " ".repeat(INDEX_WIDTH),
        pad_to(label, STATUS_WIDTH).dimmed(),
        wrap_words(value, WORDS_PER_LINE, indent)
    )
}

fn index_label(position: usize) -> String {
    pad_to(&format!("{:03})", position), INDEX_WIDTH)
}

pub fn render_movie_list(movies: &[CatalogMovie], verbose: bool) -> String {
    let mut output = String::new();
    for (i, movie) in movies.iter().enumerate() {
        let points = format!("{:.1}", movie.rating);
        output.push_str(&format!(
            "{}{} {}\n",
            index_label(i + 1),
            rated(&points, movie.rating),
            rated(&movie.nice_name(), movie.rating)
        ));
        if verbose {
            output.push_str(&movie_details(movie));
            output.push('\n');
        }
    }
    output
}

fn movie_details(movie: &CatalogMovie) -> String {
    [
        field_line("Path:", &movie.path.display().to_string()),
        field_line("Votes:", &movie.votes.to_string()),
        field_line("Rated:", &movie.rated),
        field_line("Genre:", &movie.genre.join(", ")),
        field_line("Runtime:", &movie.runtime),
        field_line("Directors:", &movie.directors.join(", ")),
        field_line("Actors:", &movie.actors.join(", ")),
        field_line("Plot:", &movie.plot),
        field_line("Tags:", &movie.tags.join(", ")),
    ]
    .concat()
}

pub fn render_lookups(lookups: &[Lookup], detailed: bool) -> String {
    let mut output = String::new();
    for lookup in lookups {
        let details = &lookup.details;
        let status = if lookup.available {
            "Available Movie".green().bold()
        } else {
            rated("Movie", details.rating)
        };
        let message = format!(
            "{} at {} points with {} votes",
            details.nice_name(),
            details.raw_rating,
            details.raw_votes
        );
        output.push_str(&status_line(status, &message));
        if detailed {
            output.push_str(&lookup_details(details));
            output.push('\n');
        }
    }
    output
}

fn lookup_details(details: &MovieDetails) -> String {
    [
        field_line("IMDB ID:", &details.external_id),
        field_line("Type:", &details.media_type),
        field_line("Rated:", &details.rated),
        field_line("Released:", &details.released),
        field_line("Genre:", &details.genre),
        field_line("Runtime:", &details.runtime),
        field_line("Director:", &details.director),
        field_line("Writer:", &details.writer),
        field_line("Actors:", &details.actors),
        field_line("Plot:", &details.plot),
    ]
    .concat()
}

pub fn render_genres(genres: &[String]) -> String {
    let mut output = String::new();
    for row in genres.chunks(GENRES_PER_ROW) {
        let line: String = row.iter().map(|g| pad_to(g, GENRE_WIDTH)).collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

pub fn render_config(config: &MovierConfig) -> String {
    let mut output = String::new();
    for key in KEYS {
        let value = config.get(key).unwrap_or_default();
        let shown = if key == "api_key" && !value.is_empty() {
            mask(&value)
        } else {
            value
        };
        output.push_str(&format!("{} = {}\n", key, shown));
    }
    output
}

fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn movie(title: &str, rating: f64) -> CatalogMovie {
        CatalogMovie {
            id: "tt0000001".to_string(),
            hash: "abcdef12".to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            rated: "R".to_string(),
            released: String::new(),
            runtime: "136 min".to_string(),
            genre: vec!["Action".to_string(), "Sci-Fi".to_string()],
            directors: vec!["Lana Wachowski".to_string()],
            writers: vec![],
            actors: vec!["Keanu Reeves".to_string()],
            plot: "one two three four five six seven eight nine ten eleven".to_string(),
            poster: String::new(),
            poster_local_path: PathBuf::new(),
            rating,
            votes: 1000,
            weight: (rating * 1000.0) as u64,
            kind: "movie".to_string(),
            tags: vec![],
            box_dir: PathBuf::from("/movies"),
            path: PathBuf::from("/movies/The Matrix (1999)"),
        }
    }

    #[test]
    fn pad_to_counts_display_columns() {
        assert_eq!(pad_to("abc", 6), "abc   ");
        assert_eq!(pad_to("日本", 6), "日本  ");
        assert_eq!(pad_to("too long", 3), "too long");
    }

    #[test]
    fn wrap_words_breaks_every_n_words() {
        let text = "a b c d e";
        assert_eq!(wrap_words(text, 2, 3), "a b\n   c d\n   e");
        assert_eq!(wrap_words("   ", 2, 3), "");
    }

    #[test]
    fn brief_list_is_numbered() {
        colored::control::set_override(false);
        let output = render_movie_list(&[movie("The Matrix", 8.7), movie("Other", 5.0)], false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "001) 8.7 The Matrix [1999]");
        assert_eq!(lines[1], "002) 5.0 Other [1999]");
    }

    #[test]
    fn verbose_list_shows_details_and_skips_empty_fields() {
        colored::control::set_override(false);
        let output = render_movie_list(&[movie("The Matrix", 8.7)], true);
        assert!(output.contains("Path:"));
        assert!(output.contains("Keanu Reeves"));
        assert!(!output.contains("Tags:"));
        // eleven words wrap onto a second, indented line
        assert!(output.contains(&format!("ten\n{}eleven", " ".repeat(25))));
    }

    #[test]
    fn genres_come_in_rows_of_six() {
        let genres: Vec<String> = (1..=8).map(|i| format!("G{}", i)).collect();
        let output = render_genres(&genres);
        assert_eq!(output.lines().count(), 2);
        assert!(output.lines().next().unwrap().starts_with("G1"));
    }

    #[test]
    fn config_masks_the_api_key() {
        let mut config = MovierConfig::default();
        config.api_key = Some("abcdef123".to_string());
        let output = render_config(&config);
        assert!(output.contains("api_key = abcd****"));
        assert!(output.contains("retries = 2"));
    }
}
