//! Seams to the parts of a search that live outside this crate: where
//! peptides come from and how candidates are scored against a spectrum.

use crate::models::{
    Candidate,
    IonMatchCounts,
    Peptide,
    ScoreKind,
    SpectrumInfo,
};
use crate::utils::MassWindow;
use std::sync::Arc;

/// A mass-indexed source of candidate peptides.
///
/// Peptides are yielded lazily; implementations are shared across worker
/// threads.
pub trait PeptideSource: Sync {
    fn peptides_in_window<'a>(
        &'a self,
        window: &MassWindow,
    ) -> Box<dyn Iterator<Item = &'a Arc<Peptide>> + 'a>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Computes raw score values for a candidate against its spectrum.
///
/// Returning `None` leaves the candidate unscored for that kind, which the
/// ranking engine places after every scored candidate.
pub trait ScoreProvider: Sync {
    fn score(
        &self,
        spectrum: &SpectrumInfo,
        candidate: &Candidate,
        kind: ScoreKind,
    ) -> Option<f32>;

    fn ion_matches(
        &self,
        _spectrum: &SpectrumInfo,
        _candidate: &Candidate,
    ) -> Option<IonMatchCounts> {
        None
    }
}
