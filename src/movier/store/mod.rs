//! # Storage Layer
//!
//! The catalog is persisted through the [`CatalogStore`] trait, so the catalog
//! logic can be tested without a filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - The whole catalog lives in one YAML file, `data.yaml`
//!   - Writes go to a temp file that is renamed over the old one
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Storage Format
//!
//! ```text
//! ~/.movier/
//! ├── data.yaml      # {boxes: [...], movies: [...]}
//! └── config.json    # settings
//! ```
//!
//! There is no locking. One process at a time is expected to touch the store;
//! two processes racing a read-modify-write will lose one of the writes.

use crate::error::Result;
use crate::model::Catalog;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

pub trait CatalogStore {
    /// Reads the catalog, creating an empty one on first use.
    fn load(&mut self) -> Result<Catalog>;

    /// Replaces the persisted catalog.
    fn save(&mut self, catalog: &Catalog) -> Result<()>;

    /// Where the data lives, for messages.
    fn location(&self) -> PathBuf;
}
