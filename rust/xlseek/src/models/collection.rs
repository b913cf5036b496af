use super::candidate::Candidate;
use super::decoy::DecoyMarking;
use super::score_kind::{
    ScoreDirection,
    ScoreKind,
};
use super::score_table::ScoredKinds;
use super::spectrum::SpectrumInfo;
use crate::ranking;
use std::sync::Arc;

/// All candidates of one spectrum at one charge state for one target or
/// decoy set. The collection owns its candidates.
#[derive(Debug, Clone)]
pub struct CandidateCollection {
    spectrum: Arc<SpectrumInfo>,
    charge: u8,
    decoy: DecoyMarking,
    candidates: Vec<Candidate>,
    scored: ScoredKinds,
    experiment_size: usize,
}

impl CandidateCollection {
    pub fn new(
        spectrum: Arc<SpectrumInfo>,
        charge: u8,
        decoy: DecoyMarking,
        candidates: Vec<Candidate>,
    ) -> Self {
        let experiment_size = candidates.len();
        Self {
            spectrum,
            charge,
            decoy,
            candidates,
            scored: ScoredKinds::default(),
            experiment_size,
        }
    }

    pub fn spectrum(&self) -> &SpectrumInfo {
        &self.spectrum
    }

    pub fn charge(&self) -> u8 {
        self.charge
    }

    pub fn decoy(&self) -> DecoyMarking {
        self.decoy
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn candidates_mut(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    /// Number of candidates considered before any truncation.
    pub fn experiment_size(&self) -> usize {
        self.experiment_size
    }

    pub fn ln_experiment_size(&self) -> f64 {
        if self.experiment_size == 0 {
            0.0
        } else {
            (self.experiment_size as f64).ln()
        }
    }

    pub fn scored_kinds(&self) -> ScoredKinds {
        self.scored
    }

    pub fn is_scored(&self, kind: ScoreKind) -> bool {
        self.scored.contains(kind)
    }

    /// Sets `kind` on every candidate for which `scorer` returns a value and
    /// records that the kind was computed for this collection.
    pub fn score_with(
        &mut self,
        kind: ScoreKind,
        mut scorer: impl FnMut(&Candidate) -> Option<f32>,
    ) {
        for c in self.candidates.iter_mut() {
            if let Some(v) = scorer(c) {
                c.scores.set(kind, v);
            }
        }
        self.scored.mark(kind);
    }

    pub fn rank_by(&mut self, kind: ScoreKind) -> usize {
        self.scored.mark(kind);
        ranking::rank_by(&mut self.candidates, kind)
    }

    pub fn truncate(&mut self, kind: ScoreKind, max_rank: u32) {
        ranking::truncate(&mut self.candidates, kind, max_rank);
    }

    /// Normalized difference to the best score of `kind`:
    /// `(best - s) / best`, with 0 for the best candidate itself.
    ///
    /// Lower-is-better kinds use `(s - best) / best`. A non-positive best
    /// score leaves every candidate at 0. NaN scores count as unscored, as
    /// they do for ranking.
    pub fn compute_delta_cn(&mut self, kind: ScoreKind) {
        let direction = kind.direction();
        let score_of = |c: &Candidate| c.scores.try_get(kind).filter(|x| !x.is_nan());
        let best = self
            .candidates
            .iter()
            .filter_map(score_of)
            .reduce(|a, b| match direction {
                ScoreDirection::HigherIsBetter => a.max(b),
                ScoreDirection::LowerIsBetter => a.min(b),
            });
        for c in self.candidates.iter_mut() {
            c.delta_cn = match (best, score_of(&*c)) {
                (Some(best), Some(s)) if best > 0.0 => {
                    let diff = match direction {
                        ScoreDirection::HigherIsBetter => best - s,
                        ScoreDirection::LowerIsBetter => s - best,
                    };
                    Some(diff / best)
                }
                (Some(_), Some(_)) => Some(0.0),
                _ => None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CandidateHypothesis,
        Peptide,
    };

    fn collection(xcorrs: &[Option<f32>]) -> CandidateCollection {
        let spectrum = Arc::new(SpectrumInfo::new(5, 600.0, vec![2]));
        let candidates = xcorrs
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let seq = format!("PEPTIDE{}K", "G".repeat(i));
                let pep = Arc::new(Peptide::new(&seq, vec![], b'R', b'A').unwrap());
                let mut c = Candidate::new(spectrum.clone(), CandidateHypothesis::Linear(pep), 2);
                if let Some(x) = x {
                    c.scores.set(ScoreKind::XCorr, *x);
                }
                c
            })
            .collect();
        CandidateCollection::new(spectrum, 2, DecoyMarking::Target, candidates)
    }

    #[test]
    fn test_delta_cn() {
        let mut col = collection(&[Some(2.0), Some(4.0), None]);
        col.rank_by(ScoreKind::XCorr);
        col.compute_delta_cn(ScoreKind::XCorr);
        let dcn: Vec<Option<f32>> = col.candidates().iter().map(|c| c.delta_cn).collect();
        assert_eq!(dcn, vec![Some(0.0), Some(0.5), None]);
    }

    #[test]
    fn test_delta_cn_nan_is_unscored() {
        let mut col = collection(&[Some(2.0), Some(f32::NAN)]);
        col.rank_by(ScoreKind::XCorr);
        col.compute_delta_cn(ScoreKind::XCorr);
        let ranks: Vec<Option<u32>> = col
            .candidates()
            .iter()
            .map(|c| c.scores.rank(ScoreKind::XCorr))
            .collect();
        let dcn: Vec<Option<f32>> = col.candidates().iter().map(|c| c.delta_cn).collect();
        assert_eq!(ranks, vec![Some(1), None]);
        assert_eq!(dcn, vec![Some(0.0), None]);
    }

    #[test]
    fn test_delta_cn_non_positive_best() {
        let mut col = collection(&[Some(-1.0), Some(-2.0)]);
        col.compute_delta_cn(ScoreKind::XCorr);
        assert!(col.candidates().iter().all(|c| c.delta_cn == Some(0.0)));
    }

    #[test]
    fn test_experiment_size_survives_truncation() {
        let mut col = collection(&[Some(1.0), Some(3.0), Some(2.0), None]);
        assert!(!col.is_scored(ScoreKind::XCorr));
        col.rank_by(ScoreKind::XCorr);
        col.truncate(ScoreKind::XCorr, 2);
        assert_eq!(col.len(), 2);
        assert_eq!(col.experiment_size(), 4);
        assert!(col.is_scored(ScoreKind::XCorr));
        assert!((col.ln_experiment_size() - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_score_with_marks_kind() {
        let mut col = collection(&[None, None]);
        col.score_with(ScoreKind::Sp, |c| Some(c.hypothesis().residue_count() as f32));
        assert!(col.is_scored(ScoreKind::Sp));
        assert_eq!(col.candidates()[1].scores.try_get(ScoreKind::Sp), Some(9.0));
    }
}
