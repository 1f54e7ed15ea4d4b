//! Best-effort extraction of a title and year from a media file path.
//!
//! Release names are messy (`Heat.1995.DVDRip.XviD.avi`, `Alien [1979].mkv`,
//! `up (2009) 720p.mp4`), so the parser only commits to the part in front of
//! the year marker and leaves the cleanup to [`clean_name`].
//!
//! Patterns are tried in order of confidence and the first match wins:
//!
//! | tier | shape                    |
//! |------|--------------------------|
//! | 1    | `name [YYYY] anything`   |
//! | 2    | `name (YYYY) anything`   |
//! | 3    | `name YYYY anything`     |
//! | 0    | no year at all           |

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static BRACKETED_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)\[(\d{4})\]").expect("valid bracketed year pattern"));

static PARENTHESIZED_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)\((\d{4})\)").expect("valid parenthesized year pattern"));

// A bare year standing on its own between separators, so `1080p` or `x2642`
// are not mistaken for one.
static DELIMITED_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*[^0-9A-Za-z]|)(\d{4})(?:[^0-9A-Za-z]|$)").expect("valid delimited year pattern")
});

static BARE_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)(\d{4})").expect("valid bare year pattern"));

// `DVDRip`, `BRRip`, `WEBRip` and friends, only as a whole token so titles
// like `Ripley` survive.
static RIP_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|[^a-z0-9])(?:[a-z]{2,4})?rip([^a-z0-9]|$)").expect("valid rip tag pattern")
});

static DIVX_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)divx").expect("valid divx pattern"));

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[._\-]+").expect("valid separators"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace"));

/// What could be read from a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub year: Option<String>,
    /// 1 for `[YYYY]`, 2 for `(YYYY)`, 3 for a bare year, 0 when no year was found.
    pub tier: u8,
}

/// Splits a path into a raw title and an optional year.
///
/// For tiers 1 to 3 `name` is the untouched text before the year marker. For
/// tier 0 it is already cleaned, since there is no marker to cut at.
pub fn parse(path: &Path) -> ParsedName {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_text(&stem)
}

/// Same as [`parse`] for text that is not a path, such as typed keywords.
pub fn parse_text(stem: &str) -> ParsedName {
    let patterns: [(u8, &Regex); 3] = [
        (1, &*BRACKETED_YEAR),
        (2, &*PARENTHESIZED_YEAR),
        (3, &*DELIMITED_YEAR),
    ];
    for (tier, pattern) in patterns {
        if let Some(parsed) = capture(pattern, stem, tier) {
            return parsed;
        }
    }
    if let Some(parsed) = capture(&BARE_YEAR, stem, 3) {
        return parsed;
    }

    ParsedName {
        name: clean_name(stem),
        year: None,
        tier: 0,
    }
}

fn capture(pattern: &Regex, stem: &str, tier: u8) -> Option<ParsedName> {
    let caps = pattern.captures(stem)?;
    Some(ParsedName {
        name: caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string(),
        year: caps.get(2).map(|m| m.as_str().to_string()),
        tier,
    })
}

/// Removes rip/encoding tags and turns `.`, `_` and `-` into single spaces.
pub fn clean_name(raw: &str) -> String {
    let name = RIP_TAGS.replace_all(raw, "${1}${2}");
    let name = DIVX_TAG.replace_all(&name, "");
    let name = SEPARATORS.replace_all(&name, " ");
    WHITESPACE.replace_all(name.trim(), " ").into_owned()
}

/// The first two words of a search phrase, used as a looser retry.
pub fn first_two_words(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}
