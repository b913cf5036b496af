use crate::chemistry::Enzyme;
use crate::models::{
    Candidate,
    CandidateCollection,
    Peptide,
    ScoreKind,
};
use tracing::warn;

pub const NUM_FEATURES: usize = 20;

const FEATURE_LIMIT: f64 = 1e9;

pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "XCorr",
    "DeltCN",
    "DeltLCN",
    "Sp",
    "lnrSp",
    "dM",
    "absdM",
    "Mass",
    "ionFrac",
    "lnSM",
    "enzN",
    "enzC",
    "enzInt",
    "pepLen",
    "charge1",
    "charge2",
    "charge3",
    "numPep",
    "numProt",
    "pepSite",
];

fn n_term_specific(peptide: &Peptide, enzyme: Enzyme) -> bool {
    match peptide.residues().first() {
        Some(&first) => {
            peptide.is_protein_n_term() || enzyme.cleaves_between(peptide.n_flank(), first)
        }
        None => false,
    }
}

fn c_term_specific(peptide: &Peptide, enzyme: Enzyme) -> bool {
    match peptide.residues().last() {
        Some(&last) => {
            peptide.is_protein_c_term() || enzyme.cleaves_between(last, peptide.c_flank())
        }
        None => false,
    }
}

fn flag(x: bool) -> f64 {
    if x { 1.0 } else { 0.0 }
}

/// Feature vector of one candidate for rescoring with percolator.
///
/// Unscored sp contributes 0 for both the score and its log rank. The last
/// three features depend on the whole run and are always 0 here. Values
/// beyond +/-1e9 are clamped.
pub fn percolator_features(
    candidate: &Candidate,
    collection: &CandidateCollection,
    enzyme: Enzyme,
) -> [f64; NUM_FEATURES] {
    let mut features = [0.0f64; NUM_FEATURES];
    let neutral_mass = candidate.spectrum().neutral_mass(candidate.charge());
    let mass_diff = candidate.mass() - neutral_mass;
    let delta_cn = candidate.delta_cn.unwrap_or(0.0) as f64;

    features[0] = candidate
        .scores
        .try_get(ScoreKind::XCorr)
        .unwrap_or(0.0) as f64;
    features[1] = delta_cn;
    features[2] = if delta_cn > 0.0 { delta_cn.ln() } else { 0.0 };
    if let (Some(sp), Some(rank)) = (
        candidate.scores.try_get(ScoreKind::Sp),
        candidate.scores.rank(ScoreKind::Sp),
    ) {
        features[3] = sp as f64;
        features[4] = (rank as f64).ln();
    }
    features[5] = mass_diff;
    features[6] = mass_diff.abs();
    features[7] = neutral_mass;
    features[8] = match candidate.ion_matches {
        Some(x) if x.total > 0 => x.matched as f64 / x.total as f64,
        _ => 0.0,
    };
    features[9] = collection.ln_experiment_size();

    let peptides = candidate.hypothesis().peptides();
    features[10] = flag(peptides.iter().all(|p| n_term_specific(p, enzyme)));
    features[11] = flag(peptides.iter().all(|p| c_term_specific(p, enzyme)));
    features[12] = candidate.hypothesis().missed_cleavages(enzyme) as f64;
    features[13] = candidate.hypothesis().residue_count() as f64;
    match candidate.charge() {
        1 => features[14] = 1.0,
        2 => features[15] = 1.0,
        3 => features[16] = 1.0,
        _ => {}
    }

    for (i, f) in features.iter_mut().enumerate() {
        if !f.is_finite() || f.abs() >= FEATURE_LIMIT {
            warn!(
                "Percolator feature {} out of bounds for scan {}: {:.2}. Clamping.",
                FEATURE_NAMES[i],
                candidate.scan(),
                f
            );
            *f = if *f < 0.0 { -FEATURE_LIMIT } else { FEATURE_LIMIT };
        }
    }
    features
}
