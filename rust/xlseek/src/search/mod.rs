//! Per-spectrum candidate generation, scoring and ranking.
//!
//! For every spectrum and charge state, the target set and each decoy set
//! are processed independently:
//!
//! 1. Candidates whose mass is compatible with the precursor are listed
//!    (peptides for linear search, linked pairs for cross-link search).
//! 2. Decoy sets replace every candidate with its shuffled counterpart, using
//!    a shuffle stream derived from the session seed and the task.
//! 3. The preliminary score is computed, ranked and used to keep the top
//!    `max_rank_preliminary` candidates.
//! 4. The primary score is computed and ranked, delta Cn is derived from it,
//!    and the top `max_rank_result` candidates are retained.
//!
//! Malformed spectra are logged and skipped.

pub mod features;
mod parameters;

pub use parameters::{
    ChargeFilter,
    ChargeKeyword,
    SearchParameters,
};

use crate::decoy::ShuffleStream;
use crate::errors::DataProcessingError;
use crate::models::{
    Candidate,
    CandidateCollection,
    CandidateHypothesis,
    DecoyMarking,
    SpectrumInfo,
};
use crate::traits::{
    PeptideSource,
    ScoreProvider,
};
use crate::xlink::{
    LinkOracle,
    LinkablePool,
    PairEnumerator,
};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{
    debug,
    info,
    warn,
};

/// Where candidates for a precursor mass come from.
#[derive(Clone, Copy)]
pub enum CandidateSource<'a> {
    Linear(&'a dyn PeptideSource),
    CrossLinked {
        pool: &'a LinkablePool,
        oracle: &'a dyn LinkOracle,
        linker_mass: f64,
    },
}

pub struct Searcher<'a> {
    source: CandidateSource<'a>,
    params: &'a SearchParameters,
    seed: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(source: CandidateSource<'a>, params: &'a SearchParameters) -> Self {
        let seed = params.seed.resolve();
        Self {
            source,
            params,
            seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn params(&self) -> &SearchParameters {
        self.params
    }

    fn task_id(spectrum_idx: usize, charge: u8, decoy_set: u16) -> u64 {
        ((spectrum_idx as u64) << 24) | ((charge as u64) << 16) | decoy_set as u64
    }

    fn hypotheses(&self, spectrum: &SpectrumInfo, charge: u8) -> Vec<CandidateHypothesis> {
        let neutral_mass = spectrum.neutral_mass(charge);
        let Some(window) = self.params.precursor_tolerance.window(neutral_mass) else {
            warn!(
                "Invalid precursor window for scan {} at charge {}",
                spectrum.scan, charge
            );
            return Vec::new();
        };
        match self.source {
            CandidateSource::Linear(db) => db
                .peptides_in_window(&window)
                .map(|p| CandidateHypothesis::Linear(p.clone()))
                .collect(),
            CandidateSource::CrossLinked {
                pool,
                oracle,
                linker_mass,
            } => {
                let pairs = PairEnumerator::new(pool, oracle, linker_mass)
                    .with_enzyme(self.params.enzyme)
                    .with_max_missed_cleavages(self.params.max_missed_cleavages)
                    .enumerate(&window);
                debug!(
                    "Scan {} charge {}: {} pairs, {} intra-protein, {} inter-protein",
                    spectrum.scan,
                    charge,
                    pairs.len(),
                    pairs.iter().filter(|p| p.is_intra()).count(),
                    pairs.iter().filter(|p| p.is_inter()).count()
                );
                pairs
                    .into_iter()
                    .map(CandidateHypothesis::CrossLinked)
                    .collect()
            }
        }
    }

    /// Unscored candidates of one spectrum, charge and set (0 is the target
    /// set).
    pub fn generate(
        &self,
        spectrum: &Arc<SpectrumInfo>,
        spectrum_idx: usize,
        charge: u8,
        decoy_set: u16,
    ) -> CandidateCollection {
        let targets = self
            .hypotheses(spectrum, charge)
            .into_iter()
            .map(|h| Candidate::new(spectrum.clone(), h, charge));
        let candidates: Vec<Candidate> = if decoy_set == 0 {
            targets.collect()
        } else {
            let mut stream =
                ShuffleStream::for_task(self.seed, Self::task_id(spectrum_idx, charge, decoy_set));
            targets
                .map(|c| c.to_decoy(decoy_set, &self.params.decoy_shuffle, &mut stream))
                .collect()
        };
        CandidateCollection::new(
            spectrum.clone(),
            charge,
            DecoyMarking::for_set(decoy_set),
            candidates,
        )
    }

    pub fn score_and_rank(&self, collection: &mut CandidateCollection, scorer: &dyn ScoreProvider) {
        let spectrum = collection.spectrum().clone();
        let prelim = self.params.preliminary_score;
        let primary = self.params.primary_score;

        if prelim != primary {
            collection.score_with(prelim, |c| scorer.score(&spectrum, c, prelim));
            collection.rank_by(prelim);
            collection.truncate(prelim, self.params.max_rank_preliminary);
        }

        collection.score_with(primary, |c| scorer.score(&spectrum, c, primary));
        for c in collection.candidates_mut() {
            c.ion_matches = scorer.ion_matches(&spectrum, c);
        }
        collection.rank_by(primary);
        collection.compute_delta_cn(primary);
        collection.truncate(primary, self.params.max_rank_result);
    }

    /// Every collection produced for one spectrum, scored when a scorer is
    /// given.
    pub fn search_spectrum(
        &self,
        spectrum: &Arc<SpectrumInfo>,
        spectrum_idx: usize,
        scorer: Option<&dyn ScoreProvider>,
    ) -> Result<Vec<CandidateCollection>, DataProcessingError> {
        spectrum.validate()?;
        let in_range = spectrum.precursor_mz >= self.params.min_precursor_mz
            && spectrum.precursor_mz <= self.params.max_precursor_mz;
        if !in_range {
            debug!("Scan {} outside the precursor m/z range", spectrum.scan);
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for &charge in spectrum
            .charges
            .iter()
            .filter(|z| self.params.charges.accepts(**z))
        {
            for decoy_set in 0..=self.params.num_decoy_sets {
                let mut collection = self.generate(spectrum, spectrum_idx, charge, decoy_set);
                if let Some(scorer) = scorer {
                    self.score_and_rank(&mut collection, scorer);
                }
                out.push(collection);
            }
        }
        Ok(out)
    }

    /// Processes a batch of spectra in parallel. `first_idx` is the position
    /// of the batch's first spectrum in the whole run, so decoys do not
    /// depend on how the run is split into batches. Spectra that fail
    /// validation are logged and skipped.
    pub fn search_all(
        &self,
        spectra: &[Arc<SpectrumInfo>],
        first_idx: usize,
        scorer: Option<&dyn ScoreProvider>,
    ) -> Vec<CandidateCollection> {
        let start = Instant::now();
        let out: Vec<CandidateCollection> = spectra
            .par_iter()
            .enumerate()
            .flat_map_iter(|(i, spectrum)| {
                match self.search_spectrum(spectrum, first_idx + i, scorer) {
                    Ok(x) => x,
                    Err(e) => {
                        warn!("Skipping scan {}: {}", spectrum.scan, e);
                        Vec::new()
                    }
                }
            })
            .collect();

        let elapsed = start.elapsed();
        let num_candidates: usize = out.iter().map(|c| c.len()).sum();
        let throughput = spectra.len() as f64 / elapsed.as_secs_f64().max(1e-9);
        info!(
            "Searched {} spectra into {} collections ({} candidates) in {:?}, throughput: {:#.1}/s",
            spectra.len(),
            out.len(),
            num_candidates,
            elapsed,
            throughput
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::PROTON_MASS;
    use crate::data_sources::PeptideDatabase;
    use crate::decoy::SeedConfig;
    use crate::models::{
        Peptide,
        ScoreKind,
    };
    use crate::utils::MassTolerance;
    use crate::xlink::{
        ApproveAll,
        BondMap,
    };

    /// Scores by alanine content so results are predictable. XCorr is left
    /// unset for sequences starting with glycine.
    struct ResidueCountScorer;

    impl ScoreProvider for ResidueCountScorer {
        fn score(&self, _: &SpectrumInfo, candidate: &Candidate, kind: ScoreKind) -> Option<f32> {
            let seq = candidate.hypothesis().sequence_string();
            let alanines = seq.bytes().filter(|b| *b == b'A').count() as f32;
            match kind {
                ScoreKind::Sp => Some(alanines + 0.5),
                ScoreKind::XCorr if seq.starts_with('G') => None,
                ScoreKind::XCorr => Some(alanines),
                _ => None,
            }
        }
    }

    fn db() -> PeptideDatabase {
        PeptideDatabase::new(
            ["AAAAK", "AAGAK", "GAAAK", "AGAGK", "WWWWWWK"]
                .iter()
                .map(|s| Peptide::new(s, vec![], b'R', b'-').unwrap())
                .collect(),
        )
    }

    fn params() -> SearchParameters {
        SearchParameters {
            precursor_tolerance: MassTolerance::Absolute((60.0, 60.0)),
            max_rank_preliminary: 3,
            max_rank_result: 2,
            num_decoy_sets: 2,
            seed: SeedConfig::Fixed(7),
            ..Default::default()
        }
    }

    fn spectrum_for(mass: f64, charge: u8) -> Arc<SpectrumInfo> {
        Arc::new(SpectrumInfo::new(
            42,
            mass / charge as f64 + PROTON_MASS,
            vec![charge],
        ))
    }

    #[test]
    fn test_linear_search_pipeline() {
        let db = db();
        let params = params();
        let searcher = Searcher::new(CandidateSource::Linear(&db), &params);
        let aaaak = Peptide::new("AAAAK", vec![], b'-', b'-').unwrap().mass();
        let spectrum = spectrum_for(aaaak, 2);
        let collections = searcher
            .search_spectrum(&spectrum, 0, Some(&ResidueCountScorer))
            .unwrap();
        // One target set and two decoy sets.
        assert_eq!(collections.len(), 3);
        let target = &collections[0];
        assert!(target.decoy().is_target());
        assert_eq!(target.experiment_size(), 4);
        assert!(target.len() <= 2);
        let top = &target.candidates()[0];
        assert_eq!(top.hypothesis().sequence_string(), "AAAAK");
        assert_eq!(top.scores.rank(ScoreKind::XCorr), Some(1));
        assert_eq!(top.delta_cn, Some(0.0));
        assert!(target.is_scored(ScoreKind::Sp));

        for decoys in &collections[1..] {
            assert!(decoys.decoy().is_decoy());
            assert!(decoys.candidates().iter().all(|c| c.is_decoy()));
            assert!(decoys
                .candidates()
                .iter()
                .all(|c| c.hypothesis().sequence_string().ends_with('K')));
        }
    }

    #[test]
    fn test_decoys_reproducible_per_seed() {
        let db = db();
        let params = params();
        let spectrum = spectrum_for(Peptide::new("AAAAK", vec![], b'-', b'-').unwrap().mass(), 2);
        let run = |seed: u64| -> Vec<String> {
            let searcher = Searcher::new(CandidateSource::Linear(&db), &params).with_seed(seed);
            searcher
                .generate(&spectrum, 3, 2, 1)
                .candidates()
                .iter()
                .map(|c| c.hypothesis().sequence_string())
                .collect()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_cross_link_generation() {
        let bonds: BondMap = "K:K".parse().unwrap();
        let peptides: Vec<Arc<Peptide>> = ["AKAAR", "GGKGR", "WKWR"]
            .iter()
            .map(|s| Arc::new(Peptide::new(s, vec![], b'R', b'A').unwrap()))
            .collect();
        let pool = LinkablePool::from_peptides(&peptides, &bonds, Default::default());
        let linker = 138.068;
        let target_mass = peptides[0].mass() + peptides[1].mass() + linker;
        let params = SearchParameters {
            precursor_tolerance: MassTolerance::Absolute((0.5, 0.5)),
            ..params()
        };
        let searcher = Searcher::new(
            CandidateSource::CrossLinked {
                pool: &pool,
                oracle: &ApproveAll,
                linker_mass: linker,
            },
            &params,
        );
        let spectrum = spectrum_for(target_mass, 3);
        let collections = searcher.search_spectrum(&spectrum, 0, None).unwrap();
        let target = &collections[0];
        assert_eq!(target.len(), 1);
        let seq = target.candidates()[0].hypothesis().sequence_string();
        assert!(seq == "AKAAR,GGKGR (2,3)" || seq == "GGKGR,AKAAR (3,2)");
        assert!(target.candidates()[0].scores.try_get(ScoreKind::XCorr).is_none());
    }

    #[test]
    fn test_malformed_spectra_skipped() {
        let db = db();
        let params = params();
        let searcher = Searcher::new(CandidateSource::Linear(&db), &params);
        let bad = Arc::new(SpectrumInfo::new(1, f64::NAN, vec![2]));
        assert!(searcher.search_spectrum(&bad, 0, None).is_err());
        let good = spectrum_for(600.0, 2);
        let out = searcher.search_all(&[bad, good], 0, Some(&ResidueCountScorer));
        assert_eq!(out.len(), 3);
    }
}
