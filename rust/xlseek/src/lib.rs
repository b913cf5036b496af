pub mod chemistry;
pub mod data_sources;
pub mod decoy;
pub mod errors;
pub mod models;
pub mod output;
pub mod ranking;
pub mod search;
pub mod traits;
pub mod utils;
pub mod xlink;

pub use errors::{
    DataProcessingError,
    LibraryReadingError,
    RankingError,
    Result,
    ScoreAccessError,
    XlSeekError,
};
pub use models::{
    Candidate,
    CandidateCollection,
    CandidateHypothesis,
    DecoyMarking,
    Peptide,
    ScoreDirection,
    ScoreKind,
    ScoreTable,
    SpectrumInfo,
};
pub use traits::{
    PeptideSource,
    ScoreProvider,
};
