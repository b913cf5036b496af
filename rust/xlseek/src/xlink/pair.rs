use super::linkable::LinkableUnit;
use crate::chemistry::Enzyme;
use crate::decoy::{
    DecoyShuffleConfig,
    ShuffleStream,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Two linkable units joined through one site of each.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePair {
    first: Arc<LinkableUnit>,
    second: Arc<LinkableUnit>,
    first_site: usize,
    second_site: usize,
    linker_mass: f64,
}

impl CandidatePair {
    pub fn new(
        first: Arc<LinkableUnit>,
        first_site: usize,
        second: Arc<LinkableUnit>,
        second_site: usize,
        linker_mass: f64,
    ) -> Self {
        Self {
            first,
            second,
            first_site,
            second_site,
            linker_mass,
        }
    }

    pub fn first(&self) -> &LinkableUnit {
        &self.first
    }

    pub fn second(&self) -> &LinkableUnit {
        &self.second
    }

    pub fn linker_mass(&self) -> f64 {
        self.linker_mass
    }

    pub fn mass(&self) -> f64 {
        self.first.mass() + self.second.mass() + self.linker_mass
    }

    /// Zero-based residue positions carrying the link in each half.
    pub fn link_positions(&self) -> (usize, usize) {
        (
            self.first.sites()[self.first_site].position,
            self.second.sites()[self.second_site].position,
        )
    }

    pub fn residue_count(&self) -> usize {
        self.first.peptide().len() + self.second.peptide().len()
    }

    /// The worse of the two halves.
    pub fn missed_cleavages(&self, enzyme: Enzyme) -> usize {
        self.first
            .missed_cleavages(enzyme, self.first_site)
            .max(self.second.missed_cleavages(enzyme, self.second_site))
    }

    /// `SEQA,SEQB (pa,pb)` with one-based link positions.
    pub fn sequence_string(&self) -> String {
        let (pa, pb) = self.link_positions();
        format!(
            "{},{} ({},{})",
            self.first.peptide().modified_sequence(),
            self.second.peptide().modified_sequence(),
            pa + 1,
            pb + 1
        )
    }

    fn protein_sets(&self) -> (HashSet<&str>, HashSet<&str>) {
        (
            self.first.peptide().protein_ids().collect(),
            self.second.peptide().protein_ids().collect(),
        )
    }

    /// Both halves can come from one protein.
    pub fn is_intra(&self) -> bool {
        let (a, b) = self.protein_sets();
        !a.is_disjoint(&b)
    }

    /// The halves can come from two different proteins. A pair with shared
    /// and unshared loci is both intra and inter.
    pub fn is_inter(&self) -> bool {
        let (a, b) = self.protein_sets();
        a.iter().any(|x| b.iter().any(|y| x != y))
    }

    /// Each half shuffled independently with its link site following the
    /// linked residue.
    pub fn shuffled(&self, config: &DecoyShuffleConfig, stream: &mut ShuffleStream) -> Self {
        Self {
            first: Arc::new(self.first.shuffled(config, stream)),
            second: Arc::new(self.second.shuffled(config, stream)),
            first_site: self.first_site,
            second_site: self.second_site,
            linker_mass: self.linker_mass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Peptide,
        ProteinLocus,
    };
    use crate::xlink::BondMap;

    fn unit(seq: &str, proteins: &[&str]) -> Arc<LinkableUnit> {
        let bonds: BondMap = "K:K".parse().unwrap();
        let loci = proteins
            .iter()
            .map(|p| ProteinLocus {
                protein_id: (*p).into(),
                start: 0,
            })
            .collect();
        let pep = Arc::new(Peptide::new(seq, loci, b'R', b'A').unwrap());
        Arc::new(LinkableUnit::from_bond_map(pep, &bonds, Enzyme::Trypsin).unwrap())
    }

    #[test]
    fn test_pair_descriptors() {
        let a = unit("AKAR", &["P1"]);
        let b = unit("GGKGGR", &["P2"]);
        let pair = CandidatePair::new(a.clone(), 0, b.clone(), 0, 138.068);
        assert_eq!(pair.sequence_string(), "AKAR,GGKGGR (2,3)");
        assert!((pair.mass() - (a.mass() + b.mass() + 138.068)).abs() < 1e-9);
        assert!(pair.is_inter());
        assert!(!pair.is_intra());
        assert_eq!(pair.residue_count(), 10);
    }

    #[test]
    fn test_intra_pair() {
        let a = unit("AKAR", &["P1"]);
        let b = unit("GGKGGR", &["P1", "P3"]);
        let pair = CandidatePair::new(a, 0, b, 0, 0.0);
        assert!(pair.is_intra());
        assert!(pair.is_inter());

        let a = unit("AKAR", &["P1"]);
        let b = unit("GGKGGR", &["P1"]);
        let pair = CandidatePair::new(a, 0, b, 0, 0.0);
        assert!(pair.is_intra());
        assert!(!pair.is_inter());
    }

    #[test]
    fn test_shuffled_pair_keeps_mass_and_links() {
        let a = unit("ACDKEFGR", &["P1"]);
        let b = unit("WWKYYHHR", &["P2"]);
        let pair = CandidatePair::new(a, 0, b, 0, 100.0);
        let mut stream = ShuffleStream::from_seed(17);
        let decoy = pair.shuffled(&DecoyShuffleConfig::default(), &mut stream);
        assert_eq!(decoy.mass(), pair.mass());
        let (pa, pb) = decoy.link_positions();
        assert_eq!(decoy.first().peptide().residues()[pa], b'K');
        assert_eq!(decoy.second().peptide().residues()[pb], b'K');
    }
}
