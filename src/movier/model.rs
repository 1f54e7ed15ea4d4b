use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Placeholder the provider uses for missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// One row of a provider search. Discarded once a title is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "imdbID")]
    pub external_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub media_type: String,
    #[serde(rename = "imdbRating", default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "imdbVotes", default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<String>,
}

impl SearchHit {
    /// A hit that carries nothing but an id, used when the user types one in.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            external_id: id.into(),
            title: String::new(),
            year: String::new(),
            media_type: String::new(),
            rating: None,
            votes: None,
        }
    }
}

/// Full provider record for one title.
///
/// Serialized in the provider's own field naming, so a marker file keeps the
/// response as it was received. `rating` and `votes` are derived from the raw
/// strings on every deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProviderRecord", into = "ProviderRecord")]
pub struct MovieDetails {
    pub external_id: String,
    pub title: String,
    pub year: String,
    pub media_type: String,
    pub rated: String,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub poster: String,
    pub raw_rating: String,
    pub raw_votes: String,
    pub rating: f64,
    pub votes: u64,
    /// Fields this crate does not interpret, kept for the marker file.
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MovieDetails {
    /// Popularity scalar used for ranking and auto-picking.
    pub fn weight(&self) -> f64 {
        self.rating * self.votes as f64
    }

    pub fn nice_name(&self) -> String {
        format!("{} [{}]", self.title, self.year)
    }

    pub fn has_poster(&self) -> bool {
        !self.poster.trim().is_empty() && self.poster != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProviderRecord {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Type", default)]
    kind: String,
    #[serde(rename = "Rated", default)]
    rated: String,
    #[serde(rename = "Released", default)]
    released: String,
    #[serde(rename = "Runtime", default)]
    runtime: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Director", default)]
    director: String,
    #[serde(rename = "Writer", default)]
    writer: String,
    #[serde(rename = "Actors", default)]
    actors: String,
    #[serde(rename = "Plot", default)]
    plot: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    imdb_votes: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl From<ProviderRecord> for MovieDetails {
    fn from(raw: ProviderRecord) -> Self {
        Self {
            rating: parse_rating(&raw.imdb_rating),
            votes: parse_votes(&raw.imdb_votes),
            external_id: raw.imdb_id,
            title: raw.title,
            year: raw.year,
            media_type: raw.kind,
            rated: raw.rated,
            released: raw.released,
            runtime: raw.runtime,
            genre: raw.genre,
            director: raw.director,
            writer: raw.writer,
            actors: raw.actors,
            plot: raw.plot,
            poster: raw.poster,
            raw_rating: raw.imdb_rating,
            raw_votes: raw.imdb_votes,
            extra: raw.extra,
        }
    }
}

impl From<MovieDetails> for ProviderRecord {
    fn from(details: MovieDetails) -> Self {
        Self {
            imdb_id: details.external_id,
            title: details.title,
            year: details.year,
            kind: details.media_type,
            rated: details.rated,
            released: details.released,
            runtime: details.runtime,
            genre: details.genre,
            director: details.director,
            writer: details.writer,
            actors: details.actors,
            plot: details.plot,
            poster: details.poster,
            imdb_rating: details.raw_rating,
            imdb_votes: details.raw_votes,
            extra: details.extra,
        }
    }
}

/// Parses a rating such as `"7.9"`. Anything unusable becomes `0.0`.
pub fn parse_rating(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, 10.0),
        _ => 0.0,
    }
}

/// Parses a vote count such as `"12,345"`. Anything unusable becomes `0`.
pub fn parse_votes(raw: &str) -> u64 {
    raw.trim().replace(',', "").parse().unwrap_or(0)
}

/// A YAML scalar that should be read as text, e.g. a bare `1995`.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(x) => x.to_string(),
        }
    }
}

/// Null or missing becomes the empty string, numbers become their text.
fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}

/// Null becomes the default value.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A movie as persisted in the local catalog.
///
/// The `:name` aliases read catalogs written by older movier releases, which
/// stored symbol keys. Saving always writes the plain names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    #[serde(alias = ":id")]
    pub id: String,
    #[serde(alias = ":hash", deserialize_with = "text")]
    pub hash: String,
    #[serde(alias = ":title")]
    pub title: String,
    #[serde(alias = ":year", deserialize_with = "text")]
    pub year: String,
    #[serde(default, alias = ":rated", deserialize_with = "text")]
    pub rated: String,
    #[serde(default, alias = ":released", deserialize_with = "text")]
    pub released: String,
    #[serde(default, alias = ":runtime", deserialize_with = "text")]
    pub runtime: String,
    #[serde(default, alias = ":genre", deserialize_with = "or_default")]
    pub genre: Vec<String>,
    #[serde(default, alias = ":directors", deserialize_with = "or_default")]
    pub directors: Vec<String>,
    #[serde(default, alias = ":writers", deserialize_with = "or_default")]
    pub writers: Vec<String>,
    #[serde(default, alias = ":actors", deserialize_with = "or_default")]
    pub actors: Vec<String>,
    #[serde(default, alias = ":plot", deserialize_with = "text")]
    pub plot: String,
    #[serde(default, alias = ":poster", deserialize_with = "text")]
    pub poster: String,
    #[serde(
        default,
        alias = "_poster",
        alias = ":_poster",
        alias = "posterLocalPath",
        deserialize_with = "or_default"
    )]
    pub poster_local_path: PathBuf,
    #[serde(default, alias = ":rating", deserialize_with = "or_default")]
    pub rating: f64,
    #[serde(default, alias = ":votes", deserialize_with = "or_default")]
    pub votes: u64,
    #[serde(default, alias = ":weight", deserialize_with = "or_default")]
    pub weight: u64,
    #[serde(rename = "type", alias = ":type", default, deserialize_with = "text")]
    pub kind: String,
    #[serde(default, alias = ":tags", deserialize_with = "or_default")]
    pub tags: Vec<String>,
    #[serde(rename = "box", alias = ":box")]
    pub box_dir: PathBuf,
    #[serde(alias = ":path")]
    pub path: PathBuf,
}

impl CatalogMovie {
    pub fn nice_name(&self) -> String {
        format!("{} [{}]", self.title, self.year)
    }
}

/// The whole persisted catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, alias = ":boxes", deserialize_with = "or_default")]
    pub boxes: Vec<PathBuf>,
    #[serde(default, alias = ":movies", deserialize_with = "or_default")]
    pub movies: Vec<CatalogMovie>,
}

impl Catalog {
    pub fn contains(&self, id: &str) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }
}

/// Where a media file came from before it was organized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default, deserialize_with = "text")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_text"
    )]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub tier: u8,
    #[serde(default, deserialize_with = "text")]
    pub parent: String,
}

/// Contents of the `imdb.txt` sidecar written next to every organized movie.
///
/// Markers from older movier releases keep the source keys (`path`, `name`,
/// `year`, `parent`, and `type` for the tier) at the top level instead of
/// under `source`. Both shapes are read, the nested one is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "MarkerFile")]
pub struct MovieMarker {
    pub source: SourceFile,
    #[serde(default)]
    pub guessed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organized_at: Option<DateTime<Utc>>,
    pub imdb: MovieDetails,
}

#[derive(Deserialize)]
struct MarkerFile {
    #[serde(default)]
    source: Option<SourceFile>,
    #[serde(default, deserialize_with = "or_default")]
    guessed: bool,
    #[serde(default)]
    organized_at: Option<DateTime<Utc>>,
    imdb: MovieDetails,
    #[serde(default)]
    path: PathBuf,
    #[serde(default, deserialize_with = "text")]
    name: String,
    #[serde(default, deserialize_with = "optional_text")]
    year: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    tier: u8,
    #[serde(default, deserialize_with = "text")]
    parent: String,
}

impl From<MarkerFile> for MovieMarker {
    fn from(file: MarkerFile) -> Self {
        let source = file.source.unwrap_or(SourceFile {
            path: file.path,
            name: file.name,
            year: file.year,
            tier: file.tier,
            parent: file.parent,
        });
        Self {
            source,
            guessed: file.guessed,
            organized_at: file.organized_at,
            imdb: file.imdb,
        }
    }
}
