use crate::chemistry::Enzyme;
use crate::decoy::{
    DecoyShuffleConfig,
    SeedConfig,
};
use crate::models::ScoreKind;
use crate::utils::MassTolerance;
use serde::{
    Deserialize,
    Serialize,
};

/// Which precursor charge states of a spectrum are searched.
///
/// Written as `"all"` or as a single charge in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChargeFilter {
    Keyword(ChargeKeyword),
    Only(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKeyword {
    All,
}

impl ChargeFilter {
    pub const ALL: ChargeFilter = ChargeFilter::Keyword(ChargeKeyword::All);

    pub fn accepts(&self, charge: u8) -> bool {
        match self {
            ChargeFilter::Keyword(ChargeKeyword::All) => true,
            ChargeFilter::Only(z) => *z == charge,
        }
    }
}

impl Default for ChargeFilter {
    fn default() -> Self {
        ChargeFilter::ALL
    }
}

impl std::str::FromStr for ChargeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ChargeFilter::ALL);
        }
        s.parse::<u8>()
            .map(ChargeFilter::Only)
            .map_err(|_| format!("Invalid charge filter: '{}'. Expected 'all' or a charge", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchParameters {
    pub precursor_tolerance: MassTolerance,
    /// Cheap score used to thin the candidate list before the primary score.
    pub preliminary_score: ScoreKind,
    pub primary_score: ScoreKind,
    pub max_rank_preliminary: u32,
    pub max_rank_result: u32,
    pub num_decoy_sets: u16,
    pub decoy_shuffle: DecoyShuffleConfig,
    pub seed: SeedConfig,
    pub enzyme: Enzyme,
    /// Applied to cross-linked pairs; linear peptides are limited at
    /// digestion time.
    pub max_missed_cleavages: usize,
    pub min_precursor_mz: f64,
    pub max_precursor_mz: f64,
    pub charges: ChargeFilter,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            precursor_tolerance: MassTolerance::default(),
            preliminary_score: ScoreKind::Sp,
            primary_score: ScoreKind::XCorr,
            max_rank_preliminary: 500,
            max_rank_result: 5,
            num_decoy_sets: 1,
            decoy_shuffle: DecoyShuffleConfig::default(),
            seed: SeedConfig::default(),
            enzyme: Enzyme::Trypsin,
            max_missed_cleavages: 2,
            min_precursor_mz: 0.0,
            max_precursor_mz: 1e9,
            charges: ChargeFilter::ALL,
        }
    }
}
