use crate::models::ScoreKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataProcessingError {
    #[error("Expected non-empty data ({context})")]
    ExpectedNonEmptyData { context: String },
    #[error("Expected finite, non-NaN data ({context})")]
    ExpectedFiniteNonNanData { context: String },
    #[error("Unknown residue '{residue}' ({context})")]
    UnknownResidue { residue: char, context: String },
    #[error("Invalid range [{start}, {end}] ({context})")]
    InvalidRange {
        start: f64,
        end: f64,
        context: String,
    },
    #[error("Could not parse '{value}' as {expected} ({context})")]
    Unparseable {
        value: String,
        expected: &'static str,
        context: String,
    },
}

impl DataProcessingError {
    pub fn append_to_context(mut self, extra: &str) -> Self {
        match &mut self {
            DataProcessingError::ExpectedNonEmptyData { context }
            | DataProcessingError::ExpectedFiniteNonNanData { context }
            | DataProcessingError::UnknownResidue { context, .. }
            | DataProcessingError::InvalidRange { context, .. }
            | DataProcessingError::Unparseable { context, .. } => {
                context.push_str(extra);
            }
        }
        self
    }
}

/// Reading a score that was never set for a candidate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScoreAccessError {
    #[error("Score '{kind}' was never computed for this candidate")]
    NotScored { kind: ScoreKind },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankingError {
    #[error("Sort mode '{0}' is not implemented")]
    UnimplementedSortMode(&'static str),
    #[error("Unknown sort mode '{0}'")]
    UnknownSortMode(String),
}

#[derive(Debug, Error)]
pub enum LibraryReadingError {
    #[error("Error parsing {context}: {source}")]
    JsonParsing {
        source: serde_json::Error,
        context: String,
    },
    #[error("Error reading {context} from {path:?}: {source}")]
    FileReading {
        source: std::io::Error,
        context: &'static str,
        path: PathBuf,
    },
    #[error("Malformed tab-delimited record: {source}")]
    TabParsing {
        #[from]
        source: csv::Error,
    },
    #[error("Missing column '{0}' in result header")]
    MissingColumn(&'static str),
}

#[derive(Debug, Error)]
pub enum XlSeekError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error: {msg}")]
    ParseError { msg: String },
    #[error(transparent)]
    DataProcessing(#[from] DataProcessingError),
    #[error(transparent)]
    LibraryReading(#[from] LibraryReadingError),
    #[error(transparent)]
    ScoreAccess(#[from] ScoreAccessError),
    #[error(transparent)]
    Ranking(#[from] RankingError),
}

pub type Result<T> = std::result::Result<T, XlSeekError>;

impl From<std::io::Error> for XlSeekError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}

impl From<csv::Error> for XlSeekError {
    fn from(x: csv::Error) -> Self {
        Self::LibraryReading(LibraryReadingError::TabParsing { source: x })
    }
}

impl From<serde_json::Error> for XlSeekError {
    fn from(val: serde_json::Error) -> Self {
        XlSeekError::ParseError {
            msg: val.to_string(),
        }
    }
}
