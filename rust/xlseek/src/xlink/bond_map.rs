use super::linkable::LinkableUnit;
use crate::chemistry::Enzyme;
use crate::errors::DataProcessingError;
use crate::models::Peptide;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

/// What a cross-linker attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkAnchor {
    Residue(u8),
    ProteinNTerm,
}

impl Display for LinkAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkAnchor::Residue(r) => write!(f, "{}", *r as char),
            LinkAnchor::ProteinNTerm => write!(f, "nterm"),
        }
    }
}

impl FromStr for LinkAnchor {
    type Err = DataProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("nterm") {
            return Ok(LinkAnchor::ProteinNTerm);
        }
        match s.as_bytes() {
            [r] if r.is_ascii_alphabetic() => Ok(LinkAnchor::Residue(r.to_ascii_uppercase())),
            _ => Err(DataProcessingError::Unparseable {
                value: s.to_string(),
                expected: "link anchor (residue letter or 'nterm')",
                context: "bond map".to_string(),
            }),
        }
    }
}

/// A residue position of a peptide that may carry one end of a cross-link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSite {
    pub position: usize,
    pub anchor: LinkAnchor,
}

/// Decides whether two link sites may be joined by the cross-linker.
///
/// Implementations are shared across worker threads.
pub trait LinkOracle: Sync {
    fn can_link(
        &self,
        first: &LinkableUnit,
        first_site: usize,
        second: &LinkableUnit,
        second_site: usize,
    ) -> bool;
}

/// Approves every site combination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

impl LinkOracle for ApproveAll {
    fn can_link(&self, _: &LinkableUnit, _: usize, _: &LinkableUnit, _: usize) -> bool {
        true
    }
}

/// The set of anchor pairs a cross-linker can bridge, parsed from
/// specifications such as `K:K,K:nterm,K:S`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BondMap {
    bonds: BTreeSet<(LinkAnchor, LinkAnchor)>,
}

impl BondMap {
    pub fn new(pairs: impl IntoIterator<Item = (LinkAnchor, LinkAnchor)>) -> Self {
        let bonds = pairs
            .into_iter()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect();
        Self { bonds }
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn can_bond(&self, a: LinkAnchor, b: LinkAnchor) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.bonds.contains(&key)
    }

    fn accepts(&self, anchor: LinkAnchor) -> bool {
        self.bonds.iter().any(|(a, b)| *a == anchor || *b == anchor)
    }

    /// Positions of `peptide` that can carry a link.
    ///
    /// A cleavage-prone residue at the peptide C-terminus is excluded unless
    /// the peptide ends the protein, since a linked residue is not cleaved.
    pub fn link_sites(&self, peptide: &Peptide, enzyme: Enzyme) -> Vec<LinkSite> {
        let residues = peptide.residues();
        let mut sites = Vec::new();
        if peptide.is_protein_n_term() && self.accepts(LinkAnchor::ProteinNTerm) {
            sites.push(LinkSite {
                position: 0,
                anchor: LinkAnchor::ProteinNTerm,
            });
        }
        for (position, &r) in residues.iter().enumerate() {
            let anchor = LinkAnchor::Residue(r);
            if !self.accepts(anchor) {
                continue;
            }
            let is_last = position + 1 == residues.len();
            if is_last && enzyme.is_cleavage_residue(r) && !peptide.is_protein_c_term() {
                continue;
            }
            sites.push(LinkSite { position, anchor });
        }
        sites
    }
}

impl FromStr for BondMap {
    type Err = DataProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        for item in s.split(',').map(str::trim).filter(|x| !x.is_empty()) {
            let Some((a, b)) = item.split_once(':') else {
                return Err(DataProcessingError::Unparseable {
                    value: item.to_string(),
                    expected: "anchor pair 'A:B'",
                    context: "bond map".to_string(),
                });
            };
            pairs.push((a.parse()?, b.parse()?));
        }
        if pairs.is_empty() {
            return Err(DataProcessingError::ExpectedNonEmptyData {
                context: "bond map".to_string(),
            });
        }
        Ok(Self::new(pairs))
    }
}

impl LinkOracle for BondMap {
    fn can_link(
        &self,
        first: &LinkableUnit,
        first_site: usize,
        second: &LinkableUnit,
        second_site: usize,
    ) -> bool {
        match (first.sites().get(first_site), second.sites().get(second_site)) {
            (Some(a), Some(b)) => self.can_bond(a.anchor, b.anchor),
            _ => false,
        }
    }
}
