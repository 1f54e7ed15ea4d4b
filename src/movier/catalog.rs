//! # Local Movie Catalog
//!
//! [`LocalCatalog`] owns the persisted [`Catalog`]: the list of boxes (source
//! directories) and the movies found in them. It is an explicit handle over a
//! [`CatalogStore`]; nothing is cached between handles.
//!
//! Every mutating operation saves and then reloads, so the in-memory copy never
//! drifts from what is on disk for longer than one operation.
//!
//! ## Querying
//!
//! [`LocalCatalog::query`] applies a [`QueryFilter`] in a fixed order:
//!
//! 1. keyword substring on the title
//! 2. directors, writers, actors, genre, tags: every comma separated term must
//!    appear in the joined field
//! 3. exact certificate (`rated`)
//! 4. minimum rating
//! 5. excluded tags
//! 6. movies tagged `watched` are hidden unless the tag filter asks for them
//! 7. sort by weight, highest first
//! 8. limit
//! 9. shuffle down to one random movie

use crate::error::{MovierError, Result};
use crate::model::{Catalog, CatalogMovie, MovieMarker};
use crate::normalize::normalize;
use crate::store::CatalogStore;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File written next to every organized movie.
pub const MARKER_FILENAME: &str = "imdb.txt";

/// Tag that hides a movie from default queries.
pub const WATCHED_TAG: &str = "watched";

/// The genre vocabulary used by IMDb.
pub const GENRES: [&str; 26] = [
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "Game-Show",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "News",
    "Reality-TV",
    "Romance",
    "Sci-Fi",
    "Sport",
    "Talk-Show",
    "Thriller",
    "War",
    "Western",
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word pattern"));

/// Predicates for [`LocalCatalog::query`]. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilter {
    pub keywords: Option<String>,
    pub directors: Option<String>,
    pub writers: Option<String>,
    pub actors: Option<String>,
    pub genre: Option<String>,
    pub tags: Option<String>,
    pub exclude_tags: Option<String>,
    pub rated: Option<String>,
    pub points: Option<f64>,
    pub limit: Option<usize>,
    pub shuffle: bool,
}

impl QueryFilter {
    fn shows_watched(&self) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.to_lowercase().contains(WATCHED_TAG))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
}

/// What adding a directory did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryReport {
    pub dir: PathBuf,
    pub added: usize,
    /// Titles skipped because their id was already cataloged.
    pub duplicates: Vec<String>,
    /// Marker files that could not be read.
    pub unreadable: Vec<PathBuf>,
}

pub struct LocalCatalog<S: CatalogStore> {
    store: S,
    data: Catalog,
}

impl<S: CatalogStore> LocalCatalog<S> {
    /// Loads the catalog, creating the backing store on first use.
    pub fn open(mut store: S) -> Result<Self> {
        let data = store.load()?;
        Ok(Self { store, data })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn movies(&self) -> &[CatalogMovie] {
        &self.data.movies
    }

    pub fn boxes(&self) -> &[PathBuf] {
        &self.data.boxes
    }

    pub fn is_empty(&self) -> bool {
        self.data.movies.is_empty()
    }

    pub fn reload(&mut self) -> Result<()> {
        self.data = self.store.load()?;
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.data)?;
        self.reload()
    }

    pub fn lookup(&self, id: &str) -> Option<&CatalogMovie> {
        self.data.movies.iter().find(|m| m.id == id)
    }

    /// Adds a movie unless its id is already cataloged.
    pub fn add(&mut self, movie: CatalogMovie) -> Result<AddOutcome> {
        let outcome = self.insert(movie);
        if outcome == AddOutcome::Added {
            self.persist()?;
        }
        Ok(outcome)
    }

    fn insert(&mut self, movie: CatalogMovie) -> AddOutcome {
        if self.data.contains(&movie.id) {
            warn!(
                id = %movie.id,
                title = %movie.nice_name(),
                rating = movie.rating,
                "already exists in the catalog"
            );
            return AddOutcome::Duplicate;
        }
        self.data.movies.push(movie);
        AddOutcome::Added
    }

    /// Remembers a box. Returns false when it was already known.
    pub fn add_box(&mut self, dir: &Path) -> Result<bool> {
        if self.data.boxes.iter().any(|b| b == dir) {
            return Ok(false);
        }
        self.data.boxes.push(dir.to_path_buf());
        self.persist()?;
        Ok(true)
    }

    /// Runs the query pipeline over the current movies.
    pub fn query<R: Rng + ?Sized>(&self, filter: &QueryFilter, rng: &mut R) -> Vec<CatalogMovie> {
        let mut movies: Vec<CatalogMovie> = self.data.movies.clone();

        if let Some(keywords) = filter.keywords.as_deref() {
            let keywords = keywords.to_lowercase();
            movies.retain(|m| m.title.to_lowercase().contains(&keywords));
        }

        let field_filters: [(&Option<String>, fn(&CatalogMovie) -> &[String]); 5] = [
            (&filter.directors, |m| m.directors.as_slice()),
            (&filter.writers, |m| m.writers.as_slice()),
            (&filter.actors, |m| m.actors.as_slice()),
            (&filter.genre, |m| m.genre.as_slice()),
            (&filter.tags, |m| m.tags.as_slice()),
        ];
        for (terms, field) in field_filters {
            if let Some(terms) = terms.as_deref() {
                for term in split_terms(terms) {
                    movies.retain(|m| joined(field(m)).contains(&term));
                }
            }
        }

        if let Some(rated) = filter.rated.as_deref() {
            movies.retain(|m| m.rated == rated);
        }

        if let Some(points) = filter.points {
            movies.retain(|m| m.rating >= points);
        }

        if let Some(excluded) = filter.exclude_tags.as_deref() {
            for tag in split_terms(excluded) {
                movies.retain(|m| !joined(&m.tags).contains(&tag));
            }
        }

        if !filter.shows_watched() {
            movies.retain(|m| !joined(&m.tags).contains(WATCHED_TAG));
        }

        movies.sort_by(|a, b| b.weight.cmp(&a.weight));

        if let Some(limit) = filter.limit.filter(|l| *l > 0) {
            movies.truncate(limit);
        }

        if filter.shuffle {
            movies = movies.choose(rng).cloned().into_iter().collect();
        }

        debug!(count = movies.len(), "query matched");
        movies
    }

    /// Unions `tags` into every movie in `ids`. Returns the updated movies.
    ///
    /// Tags are trimmed and title-cased. The catalog is reloaded first so edits
    /// made earlier in the same run are not lost.
    pub fn add_tags(&mut self, ids: &[String], tags: &[String]) -> Result<Vec<CatalogMovie>> {
        let tags: Vec<String> = tags
            .iter()
            .map(|t| titleize(t.trim()))
            .filter(|t| !t.is_empty())
            .collect();

        self.reload()?;
        let mut touched = Vec::new();
        for movie in self.data.movies.iter_mut().filter(|m| ids.contains(&m.id)) {
            for tag in &tags {
                if !movie.tags.contains(tag) {
                    movie.tags.push(tag.clone());
                }
            }
            touched.push(movie.id.clone());
        }
        self.persist()?;

        Ok(self
            .data
            .movies
            .iter()
            .filter(|m| touched.contains(&m.id))
            .cloned()
            .collect())
    }

    /// Adds every organized movie below `dir` and remembers `dir` as a box.
    pub fn add_directory(&mut self, dir: &Path) -> Result<DirectoryReport> {
        if !dir.is_dir() {
            return Err(MovierError::NotFound(format!(
                "No such directory: {}",
                dir.display()
            )));
        }
        let dir = dir.canonicalize()?;

        let markers = find_markers(&dir);
        if markers.is_empty() {
            return Err(MovierError::Api(format!(
                "No organized movies in {}. You should first run `movier organize` on this directory!",
                dir.display()
            )));
        }

        let mut report = DirectoryReport {
            dir: dir.clone(),
            ..Default::default()
        };
        for marker_path in markers {
            let marker = match read_marker(&marker_path) {
                Ok(marker) => marker,
                Err(e) => {
                    warn!(path = %marker_path.display(), error = %e, "unreadable marker file");
                    report.unreadable.push(marker_path);
                    continue;
                }
            };
            let movie = normalize(&marker.imdb, &dir, &marker_path);
            let title = movie.nice_name();
            match self.insert(movie) {
                AddOutcome::Added => report.added += 1,
                AddOutcome::Duplicate => report.duplicates.push(title),
            }
        }

        if !self.data.boxes.contains(&dir) {
            self.data.boxes.push(dir.clone());
        }
        self.persist()?;

        info!(dir = %dir.display(), added = report.added, "box added");
        Ok(report)
    }

    /// Forgets every movie and re-adds all known boxes.
    pub fn rebuild(&mut self) -> Result<Vec<DirectoryReport>> {
        if self.data.boxes.is_empty() {
            return Err(MovierError::Api(
                "Found no movie box in the local database. Please, run `movier add` to add some movie boxes, before updating me!"
                    .to_string(),
            ));
        }

        self.data.movies.clear();
        self.persist()?;

        let boxes = self.data.boxes.clone();
        let mut reports = Vec::new();
        for dir in boxes {
            match self.add_directory(&dir) {
                Ok(report) => reports.push(report),
                Err(e) if e.is_persistence() => return Err(e),
                Err(e) => warn!(dir = %dir.display(), error = %e, "skipping box"),
            }
        }
        Ok(reports)
    }
}

/// Capitalizes every word: `sci fi` becomes `Sci Fi`.
pub fn titleize(text: &str) -> String {
    WORD.replace_all(text, |caps: &regex::Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Every marker file below `dir`, in a stable order.
pub fn find_markers(dir: &Path) -> Vec<PathBuf> {
    let mut markers: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == MARKER_FILENAME)
        .map(|e| e.into_path())
        .collect();
    markers.sort();
    markers
}

pub fn read_marker(path: &Path) -> Result<MovieMarker> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn joined(values: &[String]) -> String {
    values.join(", ").to_lowercase()
}
