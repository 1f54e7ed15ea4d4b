use super::CatalogStore;
use crate::error::Result;
use crate::model::Catalog;
use std::path::PathBuf;

/// Catalog store that keeps everything in memory. Counts writes for tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    catalog: Catalog,
    pub saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self { catalog, saves: 0 }
    }

    /// The catalog as last saved.
    pub fn snapshot(&self) -> &Catalog {
        &self.catalog
    }
}

impl CatalogStore for InMemoryStore {
    fn load(&mut self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        self.catalog = catalog.clone();
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::CatalogMovie;

    /// A catalog movie with sensible defaults. Weight follows rating and votes.
    pub fn movie(id: &str, title: &str, rating: f64, votes: u64) -> CatalogMovie {
        CatalogMovie {
            id: id.to_string(),
            hash: crate::normalize::fingerprint(&format!("{} [2000]", title)),
            title: title.to_string(),
            year: "2000".to_string(),
            rated: "PG-13".to_string(),
            released: "01 Jan 2000".to_string(),
            runtime: "120 min".to_string(),
            genre: vec!["Drama".to_string()],
            directors: vec!["Jane Doe".to_string()],
            writers: vec!["John Roe".to_string()],
            actors: vec!["Tom Hanks".to_string(), "Meg Ryan".to_string()],
            plot: format!("The story of {}.", title),
            poster: String::new(),
            poster_local_path: PathBuf::new(),
            rating,
            votes,
            weight: (rating * votes as f64) as u64,
            kind: "movie".to_string(),
            tags: Vec::new(),
            box_dir: PathBuf::from("/movies"),
            path: PathBuf::from(format!("/movies/{}", title)),
        }
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_box(mut self, dir: &str) -> Self {
            self.store.catalog.boxes.push(PathBuf::from(dir));
            self
        }

        pub fn with_movie(mut self, movie: CatalogMovie) -> Self {
            self.store.catalog.movies.push(movie);
            self
        }

        pub fn with_tagged_movie(self, id: &str, title: &str, tags: &[&str]) -> Self {
            let mut m = movie(id, title, 7.0, 10_000);
            m.tags = tags.iter().map(|t| t.to_string()).collect();
            self.with_movie(m)
        }
    }
}
