//! Cross-linked peptide pairs: link-site rules, the mass-sorted pool of
//! linkable peptides and the enumeration of mass-compatible pairs.

mod bond_map;
mod enumerate;
mod linkable;
mod pair;

pub use bond_map::{
    ApproveAll,
    BondMap,
    LinkAnchor,
    LinkOracle,
    LinkSite,
};
pub use enumerate::PairEnumerator;
pub use linkable::{
    LinkablePool,
    LinkableUnit,
};
pub use pair::CandidatePair;
