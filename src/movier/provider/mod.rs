//! # Metadata Providers
//!
//! The resolver never talks HTTP itself. It goes through [`MetadataProvider`],
//! which has two implementations:
//!
//! - [`omdb::OmdbProvider`]: the OMDb web API (IMDb data), used by the binary.
//! - [`memory::ScriptedProvider`]: canned answers for tests and offline runs.
//!
//! Both apply [`SearchQuery::matches`] to raw search rows, so media-type and
//! year filtering behave the same everywhere.

use crate::error::Result;
use crate::model::{MovieDetails, SearchHit};

pub mod memory;
pub mod omdb;

/// Which kinds of titles a search should keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Movie,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: String,
    pub year: Option<String>,
    pub kind: MediaKind,
}

impl SearchQuery {
    pub fn movie(keyword: impl Into<String>, year: Option<String>) -> Self {
        Self {
            keyword: keyword.into(),
            year,
            kind: MediaKind::Movie,
        }
    }

    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether a raw search row survives the type and year filters.
    pub fn matches(&self, hit: &SearchHit) -> bool {
        let kind_ok = match self.kind {
            MediaKind::All => true,
            MediaKind::Movie => hit.media_type.eq_ignore_ascii_case("movie"),
        };
        let year_ok = self.year.as_deref().is_none_or(|year| hit.year == year);
        kind_ok && year_ok
    }
}

/// A source of movie metadata.
pub trait MetadataProvider {
    /// Search titles by keyword. An unknown title is an empty list, not an error.
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>>;

    /// Full record for one external id.
    fn fetch_details(&self, id: &str) -> Result<MovieDetails>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        (**self).search(query)
    }

    fn fetch_details(&self, id: &str) -> Result<MovieDetails> {
        (**self).fetch_details(id)
    }
}
