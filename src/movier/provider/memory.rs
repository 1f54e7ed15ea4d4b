use super::{MetadataProvider, SearchQuery};
use crate::error::{MovierError, Result};
use crate::model::{MovieDetails, SearchHit};
use std::cell::RefCell;
use std::collections::HashMap;

/// Provider answering from canned data. Does NOT touch the network.
///
/// Search results are keyed by lower-cased keyword. Every call is recorded so
/// tests can assert on the retry sequence.
#[derive(Default)]
pub struct ScriptedProvider {
    searches: HashMap<String, Vec<SearchHit>>,
    details: HashMap<String, MovieDetails>,
    failing_keywords: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a movie: its details, and a search row under `keyword`.
    pub fn with_movie(mut self, keyword: &str, details: MovieDetails) -> Self {
        let hit = SearchHit {
            external_id: details.external_id.clone(),
            title: details.title.clone(),
            year: details.year.clone(),
            media_type: details.media_type.clone(),
            rating: Some(details.raw_rating.clone()),
            votes: Some(details.raw_votes.clone()),
        };
        self.searches
            .entry(keyword.to_lowercase())
            .or_default()
            .push(hit);
        self.details.insert(details.external_id.clone(), details);
        self
    }

    /// Registers details that are reachable by id only.
    pub fn with_details(mut self, details: MovieDetails) -> Self {
        self.details.insert(details.external_id.clone(), details);
        self
    }

    /// Makes searches for `keyword` fail like a broken upstream.
    pub fn failing_on(mut self, keyword: &str) -> Self {
        self.failing_keywords.push(keyword.to_lowercase());
        self
    }

    /// Every search keyword and detail id requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl MetadataProvider for ScriptedProvider {
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        let key = query.keyword.to_lowercase();
        self.calls.borrow_mut().push(format!("search:{}", query.keyword));
        if self.failing_keywords.contains(&key) {
            return Err(MovierError::Provider(format!(
                "scripted failure for '{}'",
                query.keyword
            )));
        }
        Ok(self
            .searches
            .get(&key)
            .map(|hits| hits.iter().filter(|h| query.matches(h)).cloned().collect())
            .unwrap_or_default())
    }

    fn fetch_details(&self, id: &str) -> Result<MovieDetails> {
        self.calls.borrow_mut().push(format!("details:{}", id));
        self.details
            .get(id)
            .cloned()
            .ok_or_else(|| MovierError::Provider(format!("Incorrect IMDb ID: {}", id)))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use crate::model::MovieDetails;
    use std::collections::BTreeMap;

    /// Builds provider details the way OMDb would report them.
    pub fn details(id: &str, title: &str, year: &str, rating: &str, votes: &str) -> MovieDetails {
        MovieDetails {
            external_id: id.to_string(),
            title: title.to_string(),
            year: year.to_string(),
            media_type: "movie".to_string(),
            rated: "PG-13".to_string(),
            released: format!("01 Jan {}", year),
            runtime: "120 min".to_string(),
            genre: "Drama".to_string(),
            director: "Jane Doe".to_string(),
            writer: "John Roe".to_string(),
            actors: "Tom Hanks, Meg Ryan".to_string(),
            plot: format!("The story of {}.", title),
            poster: format!("https://img.example/{}.jpg", id),
            raw_rating: rating.to_string(),
            raw_votes: votes.to_string(),
            rating: crate::model::parse_rating(rating),
            votes: crate::model::parse_votes(votes),
            extra: BTreeMap::new(),
        }
    }
}
