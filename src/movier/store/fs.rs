use super::CatalogStore;
use crate::error::{MovierError, Result};
use crate::model::Catalog;
use serde_yaml::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const DATA_FILENAME: &str = "data.yaml";

/// Top-level keys of the catalog file, plain and in the older symbol form.
const KNOWN_KEYS: [&str; 4] = ["boxes", "movies", ":boxes", ":movies"];

/// YAML-file backed catalog store rooted at the movier home directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)
                .map_err(|e| MovierError::persistence(&self.root, e))?;
        }
        Ok(())
    }
}

impl CatalogStore for FileStore {
    fn load(&mut self) -> Result<Catalog> {
        let data_file = self.data_file();
        if !data_file.exists() {
            debug!(path = %data_file.display(), "creating empty catalog");
            let catalog = Catalog::default();
            self.save(&catalog)?;
            return Ok(catalog);
        }

        let content =
            fs::read_to_string(&data_file).map_err(|e| MovierError::persistence(&data_file, e))?;
        if content.trim().is_empty() {
            return Ok(Catalog::default());
        }
        let catalog: Catalog = serde_yaml::from_str(&content)
            .map_err(|e| MovierError::corrupt_store(&data_file, e))?;
        if catalog.boxes.is_empty() && catalog.movies.is_empty() {
            reject_unknown_keys(&content, &data_file)?;
        }
        Ok(catalog)
    }

    fn save(&mut self, catalog: &Catalog) -> Result<()> {
        self.ensure_dir()?;

        let data_file = self.data_file();
        let content = serde_yaml::to_string(catalog).map_err(|e| {
            MovierError::persistence(&data_file, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        // Atomic write
        let tmp_file = self.root.join(format!(".data-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(|e| MovierError::persistence(&tmp_file, e))?;
        fs::rename(&tmp_file, &data_file).map_err(|e| MovierError::persistence(&data_file, e))?;

        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.data_file()
    }
}

/// An empty parse of a file with foreign keys would be saved over and lost.
fn reject_unknown_keys(content: &str, path: &Path) -> Result<()> {
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| MovierError::corrupt_store(path, e))?;
    let map = match value {
        Value::Null => return Ok(()),
        Value::Mapping(map) => map,
        _ => return Err(MovierError::corrupt_store(path, "expected a mapping")),
    };
    let unknown: Vec<String> = map
        .keys()
        .map(|key| key.as_str().map(str::to_string).unwrap_or_else(|| format!("{:?}", key)))
        .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(MovierError::corrupt_store(
        path,
        format!("unexpected keys {}", unknown.join(", ")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogMovie;
    use crate::store::memory::fixtures::movie;
    use tempfile::tempdir;

    #[test]
    fn first_load_creates_the_data_file() {
        let temp = tempdir().unwrap();
        let root = temp.path().join("home");
        let mut store = FileStore::new(&root);

        let catalog = store.load().unwrap();

        assert!(catalog.boxes.is_empty());
        assert!(catalog.movies.is_empty());
        assert!(root.join(DATA_FILENAME).exists());
    }

    #[test]
    fn empty_file_loads_as_empty_catalog() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DATA_FILENAME), "").unwrap();
        let mut store = FileStore::new(temp.path());
        assert_eq!(store.load().unwrap(), Catalog::default());
    }

    #[test]
    fn catalog_survives_a_save_and_reload() {
        let temp = tempdir().unwrap();
        let mut store = FileStore::new(temp.path());

        let mut tagged: CatalogMovie = movie("tt0133093", "The Matrix", 8.7, 1_500_000);
        tagged.tags = vec!["Favorite".to_string()];
        let catalog = Catalog {
            boxes: vec![PathBuf::from("/movies")],
            movies: vec![tagged, movie("tt0113277", "Heat", 8.3, 700_000)],
        };
        store.save(&catalog).unwrap();

        let mut reopened = FileStore::new(temp.path());
        assert_eq!(reopened.load().unwrap(), catalog);
    }

    #[test]
    fn no_temp_files_are_left_behind() {
        let temp = tempdir().unwrap();
        let mut store = FileStore::new(temp.path());
        store.save(&Catalog::default()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn legacy_poster_key_is_accepted() {
        let temp = tempdir().unwrap();
        let yaml = r#"
boxes:
  - /movies
movies:
  - id: tt0113277
    hash: abcdef12
    title: Heat
    year: "1995"
    _poster: /movies/Heat (1995)/poster.jpg
    rating: 8.3
    votes: 700000
    weight: 5810000
    type: movie
    box: /movies
    path: /movies/Heat (1995)
"#;
        fs::write(temp.path().join(DATA_FILENAME), yaml).unwrap();
        let mut store = FileStore::new(temp.path());

        let catalog = store.load().unwrap();

        assert_eq!(catalog.movies.len(), 1);
        assert_eq!(
            catalog.movies[0].poster_local_path,
            PathBuf::from("/movies/Heat (1995)/poster.jpg")
        );
        assert!(catalog.movies[0].tags.is_empty());
    }

    #[test]
    fn unreadable_store_is_a_persistence_error() {
        let temp = tempdir().unwrap();
        // A directory where the data file should be makes the read fail.
        fs::create_dir_all(temp.path().join(DATA_FILENAME)).unwrap();
        let mut store = FileStore::new(temp.path());

        match store.load() {
            Err(MovierError::Persistence { path, .. }) => {
                assert_eq!(path, temp.path().join(DATA_FILENAME))
            }
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    const SYMBOL_KEYED_CATALOG: &str = r#"---
:boxes:
- "/movies"
:movies:
- :title: Heat
  :year: '1995'
  :rated:
  :released: 15 Dec 1995
  :runtime: 170 min
  :genre:
  - Crime
  - Drama
  :directors:
  - Michael Mann
  :writers:
  - Michael Mann
  :actors:
  - Al Pacino
  - Robert De Niro
  :plot: A group of professional bank robbers start to feel the heat.
  :poster: http://ia.media-imdb.com/images/M/heat.jpg
  :_poster: "/movies/Heat [1995]/poster.jpg"
  :rating: 8.2
  :votes: 350000
  :type: movie
  :id: tt0113277
  :hash: 2a3b4c5d
  :tags:
  - Favorite
  :box: "/movies"
  :path: "/movies/English/8+/Heat (1995)"
  :weight: 2870000
"#;

    #[test]
    fn symbol_keyed_catalog_is_read() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DATA_FILENAME), SYMBOL_KEYED_CATALOG).unwrap();
        let mut store = FileStore::new(temp.path());

        let catalog = store.load().unwrap();

        assert_eq!(catalog.boxes, vec![PathBuf::from("/movies")]);
        assert_eq!(catalog.movies.len(), 1);
        let heat = &catalog.movies[0];
        assert_eq!(heat.id, "tt0113277");
        assert_eq!(heat.year, "1995");
        assert_eq!(heat.rated, "");
        assert_eq!(heat.actors, vec!["Al Pacino", "Robert De Niro"]);
        assert_eq!(heat.votes, 350_000);
        assert_eq!(heat.weight, 2_870_000);
        assert_eq!(heat.kind, "movie");
        assert_eq!(heat.tags, vec!["Favorite"]);
        assert_eq!(heat.box_dir, PathBuf::from("/movies"));
        assert_eq!(
            heat.poster_local_path,
            PathBuf::from("/movies/Heat [1995]/poster.jpg")
        );
    }

    #[test]
    fn symbol_keyed_catalog_is_rewritten_with_plain_keys() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DATA_FILENAME), SYMBOL_KEYED_CATALOG).unwrap();
        let mut store = FileStore::new(temp.path());

        let mut catalog = store.load().unwrap();
        catalog.boxes.push(PathBuf::from("/more"));
        store.save(&catalog).unwrap();

        let written = fs::read_to_string(temp.path().join(DATA_FILENAME)).unwrap();
        assert!(!written.contains(":boxes"));
        let reloaded = FileStore::new(temp.path()).load().unwrap();
        assert_eq!(reloaded, catalog);
        assert_eq!(reloaded.movies[0].title, "Heat");
    }

    #[test]
    fn foreign_catalog_is_refused_instead_of_emptied() {
        let temp = tempdir().unwrap();
        let data_file = temp.path().join(DATA_FILENAME);
        fs::write(&data_file, "library:\n- /movies\nfilms: []\n").unwrap();
        let mut store = FileStore::new(temp.path());

        match store.load() {
            Err(MovierError::CorruptStore { path, reason }) => {
                assert_eq!(path, data_file);
                assert!(reason.contains("library"));
            }
            other => panic!("expected corrupt store error, got {:?}", other),
        }
        assert_eq!(
            fs::read_to_string(&data_file).unwrap(),
            "library:\n- /movies\nfilms: []\n"
        );
    }

    #[test]
    fn broken_yaml_names_the_file_and_a_way_out() {
        let temp = tempdir().unwrap();
        let data_file = temp.path().join(DATA_FILENAME);
        fs::write(&data_file, "boxes: [unclosed\n").unwrap();
        let mut store = FileStore::new(temp.path());

        let err = store.load().unwrap_err();

        assert!(err.is_persistence());
        assert!(matches!(err, MovierError::CorruptStore { ref path, .. } if *path == data_file));
        let message = err.to_string();
        assert!(message.contains(&data_file.display().to_string()));
        assert!(message.contains("move aside"));
    }
}
