use thiserror::Error;

/// Errors raised between the finder and its collaborators
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Application registry error: {0}")]
    Registry(String),

    #[error("Language backend error: {0}")]
    Backend(String),

    #[error("Interpretation error: {0}")]
    Interpretation(String),

    #[error("Category catalog error: {0}")]
    Catalog(String),
}

/// Result type alias for finder operations
pub type FinderResult<T> = Result<T, FinderError>;

impl From<std::io::Error> for FinderError {
    fn from(err: std::io::Error) -> Self {
        FinderError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for FinderError {
    fn from(err: toml::de::Error) -> Self {
        FinderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FinderError {
    fn from(err: serde_json::Error) -> Self {
        FinderError::Interpretation(err.to_string())
    }
}
