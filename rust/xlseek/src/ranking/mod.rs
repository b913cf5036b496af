//! Ordering, ranking and rank-limited retention of candidates that share a
//! spectrum.

mod comparators;
mod qvalues;
mod rank;

pub use comparators::{
    SortMode,
    by_candidate_set,
    by_scan_then_charge,
    by_score,
    by_spectrum_then_score,
    compare_scores,
    sort_candidates,
};
pub use qvalues::assign_decoy_qvalues;
pub use rank::{
    rank_by,
    truncate,
};

use crate::models::{
    DecoyMarking,
    ScoreTable,
};

/// Anything the ranking engine can order: in-memory candidates and result
/// records read back from disk.
pub trait RankedCandidate {
    fn scan(&self) -> u32;
    fn charge(&self) -> u8;
    fn decoy(&self) -> DecoyMarking;
    fn is_decoy(&self) -> bool {
        self.decoy().is_decoy()
    }
    fn scores(&self) -> &ScoreTable;
    fn scores_mut(&mut self) -> &mut ScoreTable;
}

impl RankedCandidate for crate::models::Candidate {
    fn scan(&self) -> u32 {
        crate::models::Candidate::scan(self)
    }

    fn charge(&self) -> u8 {
        crate::models::Candidate::charge(self)
    }

    fn decoy(&self) -> DecoyMarking {
        crate::models::Candidate::decoy(self)
    }

    fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut ScoreTable {
        &mut self.scores
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::RankedCandidate;
    use crate::models::{
        DecoyMarking,
        ScoreKind,
        ScoreTable,
    };

    #[derive(Debug, Clone)]
    pub struct Mock {
        pub id: usize,
        pub scan: u32,
        pub charge: u8,
        pub decoy: bool,
        pub scores: ScoreTable,
    }

    impl Mock {
        pub fn new(id: usize, scan: u32, charge: u8) -> Self {
            Self {
                id,
                scan,
                charge,
                decoy: false,
                scores: ScoreTable::new(),
            }
        }

        pub fn scored(mut self, kind: ScoreKind, value: f32) -> Self {
            self.scores.set(kind, value);
            self
        }
    }

    impl RankedCandidate for Mock {
        fn scan(&self) -> u32 {
            self.scan
        }
        fn charge(&self) -> u8 {
            self.charge
        }
        fn decoy(&self) -> DecoyMarking {
            DecoyMarking::for_set(self.decoy.into())
        }
        fn scores(&self) -> &ScoreTable {
            &self.scores
        }
        fn scores_mut(&mut self) -> &mut ScoreTable {
            &mut self.scores
        }
    }
}
