use thiserror::Error;
use xlseek::{
    LibraryReadingError,
    RankingError,
    XlSeekError,
};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: Option<String>,
    },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error interpreting the config: {0}")]
    Config(String),

    #[error("Error reading data: {0}")]
    DataReading(#[from] LibraryReadingError),

    #[error(transparent)]
    Ranking(#[from] RankingError),

    #[error(transparent)]
    XlSeek(#[from] XlSeekError),
}

impl From<std::io::Error> for CliError {
    fn from(source: std::io::Error) -> Self {
        CliError::Io { source, path: None }
    }
}

impl CliError {
    pub fn io_at(source: std::io::Error, path: &std::path::Path) -> Self {
        CliError::Io {
            source,
            path: Some(path.to_string_lossy().to_string()),
        }
    }
}
