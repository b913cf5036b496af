use super::bond_map::{
    BondMap,
    LinkAnchor,
    LinkSite,
};
use crate::chemistry::Enzyme;
use crate::decoy::{
    DecoyShuffleConfig,
    ShuffleStream,
    shuffled_order,
};
use crate::models::Peptide;
use std::sync::Arc;
use tracing::info;

/// A peptide that can take part in a cross-link, with its mass and the
/// positions eligible to carry the link. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkableUnit {
    peptide: Arc<Peptide>,
    mass: f64,
    sites: Box<[LinkSite]>,
}

impl LinkableUnit {
    pub fn new(peptide: Arc<Peptide>, sites: Vec<LinkSite>) -> Self {
        let mass = peptide.mass();
        Self {
            peptide,
            mass,
            sites: sites.into_boxed_slice(),
        }
    }

    /// A unit whose mass differs from the bare peptide mass, e.g. one
    /// already carrying a dead-end linker.
    pub fn with_mass(peptide: Arc<Peptide>, mass: f64, sites: Vec<LinkSite>) -> Self {
        Self {
            peptide,
            mass,
            sites: sites.into_boxed_slice(),
        }
    }

    /// Returns `None` when the peptide has no linkable position.
    pub fn from_bond_map(peptide: Arc<Peptide>, bonds: &BondMap, enzyme: Enzyme) -> Option<Self> {
        let sites = bonds.link_sites(&peptide, enzyme);
        if sites.is_empty() {
            return None;
        }
        Some(Self::new(peptide, sites))
    }

    pub fn peptide(&self) -> &Peptide {
        &self.peptide
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn sites(&self) -> &[LinkSite] {
        &self.sites
    }

    pub fn sequence(&self) -> &str {
        self.peptide.sequence()
    }

    /// Missed cleavages with the residue carrying `site_idx` discounted when
    /// the enzyme would otherwise cut after it.
    pub fn missed_cleavages(&self, enzyme: Enzyme, site_idx: usize) -> usize {
        let excluded: Vec<usize> = match self.sites.get(site_idx) {
            Some(LinkSite {
                position,
                anchor: LinkAnchor::Residue(r),
            }) if enzyme.is_cleavage_residue(*r) => vec![*position],
            _ => vec![],
        };
        self.peptide.missed_cleavages(enzyme, &excluded)
    }

    /// Shuffled copy; every residue link site follows its residue to the new
    /// position. Protein N-terminal sites stay on the first position.
    pub fn shuffled(&self, config: &DecoyShuffleConfig, stream: &mut ShuffleStream) -> Self {
        let order = shuffled_order(self.peptide.len(), config, stream);
        let mut new_position = vec![0; order.len()];
        for (new, &old) in order.iter().enumerate() {
            new_position[old] = new;
        }
        let sites = self
            .sites
            .iter()
            .map(|s| LinkSite {
                position: match s.anchor {
                    LinkAnchor::ProteinNTerm => 0,
                    LinkAnchor::Residue(_) => new_position[s.position],
                },
                anchor: s.anchor,
            })
            .collect();
        Self {
            peptide: Arc::new(self.peptide.permuted(&order)),
            mass: self.mass,
            sites,
        }
    }
}

/// Linkable units sorted by ascending mass, shared read-only by every
/// enumeration.
#[derive(Debug, Clone, Default)]
pub struct LinkablePool {
    units: Vec<Arc<LinkableUnit>>,
}

impl LinkablePool {
    pub fn new(mut units: Vec<LinkableUnit>) -> Self {
        units.sort_by(|a, b| a.mass.total_cmp(&b.mass));
        Self {
            units: units.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_peptides<'a>(
        peptides: impl IntoIterator<Item = &'a Arc<Peptide>>,
        bonds: &BondMap,
        enzyme: Enzyme,
    ) -> Self {
        let mut total = 0;
        let units: Vec<LinkableUnit> = peptides
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|p| LinkableUnit::from_bond_map(p.clone(), bonds, enzyme))
            .collect();
        info!(
            "Built linkable pool: {} of {} peptides carry a link site",
            units.len(),
            total
        );
        Self::new(units)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Arc<LinkableUnit>] {
        &self.units
    }

    pub fn get(&self, idx: usize) -> Option<&Arc<LinkableUnit>> {
        self.units.get(idx)
    }
}
