use super::decoy::DecoyMarking;
use super::peptide::Peptide;
use super::score_table::ScoreTable;
use super::spectrum::SpectrumInfo;
use crate::chemistry::{
    Enzyme,
    Termini,
};
use crate::decoy::{
    DecoyShuffleConfig,
    ShuffleStream,
    shuffled_order,
};
use crate::xlink::CandidatePair;
use std::sync::Arc;

/// What a candidate claims produced the spectrum.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateHypothesis {
    Linear(Arc<Peptide>),
    CrossLinked(CandidatePair),
}

impl CandidateHypothesis {
    pub fn mass(&self) -> f64 {
        match self {
            CandidateHypothesis::Linear(p) => p.mass(),
            CandidateHypothesis::CrossLinked(pair) => pair.mass(),
        }
    }

    pub fn residue_count(&self) -> usize {
        match self {
            CandidateHypothesis::Linear(p) => p.len(),
            CandidateHypothesis::CrossLinked(pair) => pair.residue_count(),
        }
    }

    pub fn sequence_string(&self) -> String {
        match self {
            CandidateHypothesis::Linear(p) => p.modified_sequence(),
            CandidateHypothesis::CrossLinked(pair) => pair.sequence_string(),
        }
    }

    /// Unique protein ids in order of first appearance.
    pub fn protein_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for p in self.peptides() {
            for id in p.protein_ids() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    pub fn peptides(&self) -> Vec<&Peptide> {
        match self {
            CandidateHypothesis::Linear(p) => vec![p.as_ref()],
            CandidateHypothesis::CrossLinked(pair) => {
                vec![pair.first().peptide(), pair.second().peptide()]
            }
        }
    }

    /// Residues before and after the peptide, comma separated per half.
    pub fn flanking(&self) -> String {
        let flank = |p: &Peptide| format!("{}{}", p.n_flank() as char, p.c_flank() as char);
        match self {
            CandidateHypothesis::Linear(p) => flank(p),
            CandidateHypothesis::CrossLinked(pair) => format!(
                "{},{}",
                flank(pair.first().peptide()),
                flank(pair.second().peptide())
            ),
        }
    }

    pub fn missed_cleavages(&self, enzyme: Enzyme) -> usize {
        match self {
            CandidateHypothesis::Linear(p) => p.missed_cleavages(enzyme, &[]),
            CandidateHypothesis::CrossLinked(pair) => pair.missed_cleavages(enzyme),
        }
    }

    /// For pairs, the less specific of the two halves.
    pub fn termini(&self, enzyme: Enzyme) -> Termini {
        match self {
            CandidateHypothesis::Linear(p) => p.termini(enzyme),
            CandidateHypothesis::CrossLinked(pair) => {
                let a = pair.first().peptide().termini(enzyme);
                let b = pair.second().peptide().termini(enzyme);
                match (a, b) {
                    (Termini::Non, _) | (_, Termini::Non) => Termini::Non,
                    (Termini::Semi, _) | (_, Termini::Semi) => Termini::Semi,
                    _ => Termini::Full,
                }
            }
        }
    }

    pub fn shuffled(&self, config: &DecoyShuffleConfig, stream: &mut ShuffleStream) -> Self {
        match self {
            CandidateHypothesis::Linear(p) => {
                let order = shuffled_order(p.len(), config, stream);
                CandidateHypothesis::Linear(Arc::new(p.permuted(&order)))
            }
            CandidateHypothesis::CrossLinked(pair) => {
                CandidateHypothesis::CrossLinked(pair.shuffled(config, stream))
            }
        }
    }
}

/// Matched/total fragment ion counts reported by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IonMatchCounts {
    pub matched: u32,
    pub total: u32,
}

/// A scored hypothesis for one spectrum at one charge state.
#[derive(Debug, Clone)]
pub struct Candidate {
    spectrum: Arc<SpectrumInfo>,
    hypothesis: CandidateHypothesis,
    charge: u8,
    decoy: DecoyMarking,
    unshuffled_sequence: Option<String>,
    pub scores: ScoreTable,
    pub ion_matches: Option<IonMatchCounts>,
    pub delta_cn: Option<f32>,
}

impl Candidate {
    pub fn new(spectrum: Arc<SpectrumInfo>, hypothesis: CandidateHypothesis, charge: u8) -> Self {
        Self {
            spectrum,
            hypothesis,
            charge,
            decoy: DecoyMarking::Target,
            unshuffled_sequence: None,
            scores: ScoreTable::new(),
            ion_matches: None,
            delta_cn: None,
        }
    }

    /// The shuffled null counterpart for `decoy_set`. Scores are not carried
    /// over.
    pub fn to_decoy(
        &self,
        decoy_set: u16,
        config: &DecoyShuffleConfig,
        stream: &mut ShuffleStream,
    ) -> Self {
        Self {
            spectrum: self.spectrum.clone(),
            hypothesis: self.hypothesis.shuffled(config, stream),
            charge: self.charge,
            decoy: DecoyMarking::for_set(decoy_set.max(1)),
            unshuffled_sequence: Some(self.hypothesis.sequence_string()),
            scores: ScoreTable::new(),
            ion_matches: None,
            delta_cn: None,
        }
    }

    pub fn spectrum(&self) -> &SpectrumInfo {
        &self.spectrum
    }

    pub fn hypothesis(&self) -> &CandidateHypothesis {
        &self.hypothesis
    }

    pub fn charge(&self) -> u8 {
        self.charge
    }

    pub fn scan(&self) -> u32 {
        self.spectrum.scan
    }

    pub fn decoy(&self) -> DecoyMarking {
        self.decoy
    }

    pub fn is_decoy(&self) -> bool {
        self.decoy.is_decoy()
    }

    pub fn unshuffled_sequence(&self) -> Option<&str> {
        self.unshuffled_sequence.as_deref()
    }

    pub fn mass(&self) -> f64 {
        self.hypothesis.mass()
    }

    /// Counts from the scorer, or the theoretical b/y total when none were
    /// reported.
    pub fn by_ions_total(&self) -> u32 {
        match self.ion_matches {
            Some(x) => x.total,
            None => {
                let factor = if self.charge == 3 { 2 } else { 1 };
                let len = self.hypothesis.residue_count().saturating_sub(1) as u32;
                len * 2 * factor
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProteinLocus;

    fn linear(seq: &str, charge: u8) -> Candidate {
        let pep = Peptide::new(
            seq,
            vec![ProteinLocus {
                protein_id: "sp|P1".into(),
                start: 3,
            }],
            b'K',
            b'A',
        )
        .unwrap();
        let spectrum = Arc::new(SpectrumInfo::new(7, 500.0, vec![charge]));
        Candidate::new(spectrum, CandidateHypothesis::Linear(Arc::new(pep)), charge)
    }

    #[test]
    fn test_decoy_keeps_context() {
        let mut target = linear("PEPTIDEWITHK", 2);
        target.scores.set(crate::models::ScoreKind::XCorr, 2.0);
        let mut stream = ShuffleStream::from_seed(3);
        let decoy = target.to_decoy(1, &DecoyShuffleConfig::default(), &mut stream);
        assert!(decoy.is_decoy());
        assert!(!target.is_decoy());
        assert_eq!(decoy.unshuffled_sequence(), Some("PEPTIDEWITHK"));
        assert_eq!(decoy.mass(), target.mass());
        assert_eq!(decoy.scan(), 7);
        assert!(decoy.scores.try_get(crate::models::ScoreKind::XCorr).is_none());
        assert!(decoy.hypothesis().sequence_string().ends_with('K'));
        assert_eq!(decoy.hypothesis().protein_ids(), vec!["sp|P1"]);
    }

    #[test]
    fn test_by_ions_total_fallback() {
        let c2 = linear("PEPTIDEK", 2);
        assert_eq!(c2.by_ions_total(), 14);
        let c3 = linear("PEPTIDEK", 3);
        assert_eq!(c3.by_ions_total(), 28);
        let mut with_counts = linear("PEPTIDEK", 2);
        with_counts.ion_matches = Some(IonMatchCounts {
            matched: 3,
            total: 10,
        });
        assert_eq!(with_counts.by_ions_total(), 10);
    }

    #[test]
    fn test_flanking_and_termini() {
        let c = linear("PEPTIDEK", 2);
        assert_eq!(c.hypothesis().flanking(), "KA");
        assert_eq!(c.hypothesis().termini(Enzyme::Trypsin), Termini::Full);
    }
}
