use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data under key '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("backup failed for {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            context: context.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("Duration must be a positive whole number of minutes, got '{0}'")]
    InvalidDuration(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("Select a category before starting")]
    NoCategory,

    #[error("The timer must be idle to {0}")]
    Busy(&'static str),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Session could not be saved: {0}")]
    Storage(#[from] StorageError),
}
