mod candidate;
mod collection;
mod decoy;
mod digest;
mod peptide;
mod score_kind;
mod score_table;
mod spectrum;

pub use candidate::{
    Candidate,
    CandidateHypothesis,
    IonMatchCounts,
};
pub use collection::CandidateCollection;
pub use decoy::DecoyMarking;
pub use digest::{
    DigestSlice,
    DigestionParameters,
    FixedModification,
};
pub use peptide::{
    Peptide,
    ProteinLocus,
};
pub use score_kind::{
    ScoreDirection,
    ScoreKind,
};
pub use score_table::{
    ScoreTable,
    ScoredKinds,
};
pub use spectrum::SpectrumInfo;
