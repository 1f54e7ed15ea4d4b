use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MovierError {
    /// The metadata provider failed or answered with an error payload.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("No movie found for: {0}")]
    NotFound(String),

    /// The catalog store could not be read or written. Fatal for the operation.
    #[error("Cannot access the movie database at {}: {source}. Check that the directory exists and is writable.", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog store exists but its content cannot be used.
    #[error("The movie database at {} cannot be read: {reason}. Fix or move aside {}, then re-add your movie directories with `movier add`.", .path.display(), .path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

impl MovierError {
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MovierError::Persistence {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt_store(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MovierError::CorruptStore {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Store failures that must stop the whole operation.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            MovierError::Persistence { .. } | MovierError::CorruptStore { .. }
        )
    }
}

impl From<dialoguer::Error> for MovierError {
    fn from(err: dialoguer::Error) -> Self {
        MovierError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MovierError>;
