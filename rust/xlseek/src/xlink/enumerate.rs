use super::bond_map::LinkOracle;
use super::linkable::{
    LinkablePool,
    LinkableUnit,
};
use super::pair::CandidatePair;
use crate::chemistry::Enzyme;
use crate::utils::MassWindow;
use std::sync::Arc;
use tracing::debug;

/// Enumerates linked pairs whose combined mass falls in a window.
///
/// The pool is sorted by mass, so for each lighter unit `i` the partner
/// index `j` is walked down from the heaviest unit: first past everything
/// too heavy, then through the in-window partners until the combined mass
/// drops under the window. The cost is proportional to the number of
/// partners inspected rather than the square of the pool size. The outer
/// index stops at the second-to-last unit, so the two heaviest units are
/// never paired with each other.
#[derive(Debug, Clone, Copy)]
pub struct PairEnumerator<'a, O: LinkOracle + ?Sized> {
    pool: &'a LinkablePool,
    oracle: &'a O,
    linker_mass: f64,
    max_missed_cleavages: usize,
    enzyme: Enzyme,
}

impl<'a, O: LinkOracle + ?Sized> PairEnumerator<'a, O> {
    pub fn new(pool: &'a LinkablePool, oracle: &'a O, linker_mass: f64) -> Self {
        Self {
            pool,
            oracle,
            linker_mass,
            max_missed_cleavages: usize::MAX,
            enzyme: Enzyme::default(),
        }
    }

    pub fn with_max_missed_cleavages(mut self, max_missed_cleavages: usize) -> Self {
        self.max_missed_cleavages = max_missed_cleavages;
        self
    }

    pub fn with_enzyme(mut self, enzyme: Enzyme) -> Self {
        self.enzyme = enzyme;
        self
    }

    pub fn linker_mass(&self) -> f64 {
        self.linker_mass
    }

    pub fn enumerate(&self, window: &MassWindow) -> Vec<CandidatePair> {
        let units = self.pool.units();
        let n = units.len();
        let mut out = Vec::new();
        let mut inspected = 0usize;

        let mut i = 0;
        while i + 2 < n {
            let first = &units[i];
            let base = first.mass() + self.linker_mass;

            let mut j = n - 1;
            while i < j && base + units[j].mass() > window.end() {
                j -= 1;
            }
            // Heavier first units only push the sum up.
            if i >= j {
                break;
            }

            while i < j && base + units[j].mass() >= window.start() {
                let second = &units[j];
                inspected += 1;
                if first.sequence() != second.sequence() {
                    self.push_linked(first, second, &mut out);
                }
                j -= 1;
            }
            i += 1;
        }

        debug!(
            "Enumerated {} pairs from {} partners in [{:.4}, {:.4}]",
            out.len(),
            inspected,
            window.start(),
            window.end()
        );
        out
    }

    fn push_linked(
        &self,
        first: &Arc<LinkableUnit>,
        second: &Arc<LinkableUnit>,
        out: &mut Vec<CandidatePair>,
    ) {
        for site_a in 0..first.sites().len() {
            for site_b in 0..second.sites().len() {
                if !self.oracle.can_link(first, site_a, second, site_b) {
                    continue;
                }
                let pair = CandidatePair::new(
                    first.clone(),
                    site_a,
                    second.clone(),
                    site_b,
                    self.linker_mass,
                );
                if pair.missed_cleavages(self.enzyme) <= self.max_missed_cleavages {
                    out.push(pair);
                }
            }
        }
    }
}
