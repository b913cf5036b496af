use crate::models::{
    DigestionParameters,
    Peptide,
};
use crate::traits::PeptideSource;
use crate::utils::MassWindow;
use crate::utils::ranges::sorted_range_by_mass;
use std::sync::Arc;
use tracing::info;

/// In-memory peptide index sorted by neutral mass.
#[derive(Debug, Clone, Default)]
pub struct PeptideDatabase {
    peptides: Vec<Arc<Peptide>>,
}

impl PeptideDatabase {
    pub fn new(mut peptides: Vec<Peptide>) -> Self {
        peptides.sort_by(|a, b| a.mass().total_cmp(&b.mass()));
        Self {
            peptides: peptides.into_iter().map(Arc::new).collect(),
        }
    }

    /// Digests every protein and merges identical peptides.
    pub fn from_proteins(proteins: &[(Arc<str>, Arc<str>)], digestion: &DigestionParameters) -> Self {
        let digests = digestion.digest_multiple(proteins);
        let num_digests = digests.len();
        let peptides = digestion.into_peptides(digests);
        info!(
            "Digested {} proteins into {} peptides ({} digests)",
            proteins.len(),
            peptides.len(),
            num_digests
        );
        Self::new(peptides)
    }

    pub fn peptides(&self) -> &[Arc<Peptide>] {
        &self.peptides
    }
}

impl PeptideSource for PeptideDatabase {
    fn peptides_in_window<'a>(
        &'a self,
        window: &MassWindow,
    ) -> Box<dyn Iterator<Item = &'a Arc<Peptide>> + 'a> {
        let range = sorted_range_by_mass(&self.peptides, window, |p| p.mass());
        Box::new(self.peptides[range].iter())
    }

    fn len(&self) -> usize {
        self.peptides.len()
    }
}
