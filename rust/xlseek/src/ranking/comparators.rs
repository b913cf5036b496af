use super::RankedCandidate;
use crate::errors::RankingError;
use crate::models::{
    ScoreDirection,
    ScoreKind,
};
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

/// Orders two optional scores so that the better one comes first.
///
/// Missing and NaN values are treated alike and sort after every real
/// value, which keeps the relation a total preorder.
pub fn compare_scores(a: Option<f32>, b: Option<f32>, direction: ScoreDirection) -> Ordering {
    let a = a.filter(|x| !x.is_nan());
    let b = b.filter(|x| !x.is_nan());
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            ScoreDirection::HigherIsBetter => b.total_cmp(&a),
            ScoreDirection::LowerIsBetter => a.total_cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ascending scan number, then ascending charge.
pub fn by_scan_then_charge<T: RankedCandidate>(a: &T, b: &T) -> Ordering {
    a.scan()
        .cmp(&b.scan())
        .then_with(|| a.charge().cmp(&b.charge()))
}

/// Scan, charge, then target before decoy sets in set order. Candidates
/// that compare equal belong to the same candidate set and are ranked
/// together.
pub fn by_candidate_set<T: RankedCandidate>(a: &T, b: &T) -> Ordering {
    by_scan_then_charge(a, b).then_with(|| a.decoy().cmp(&b.decoy()))
}

pub fn by_score<T: RankedCandidate>(kind: ScoreKind) -> impl Fn(&T, &T) -> Ordering {
    let direction = kind.direction();
    move |a: &T, b: &T| {
        compare_scores(a.scores().try_get(kind), b.scores().try_get(kind), direction)
    }
}

/// Spectrum key first; the score only breaks ties within a spectrum.
pub fn by_spectrum_then_score<T: RankedCandidate>(
    kind: ScoreKind,
) -> impl Fn(&T, &T) -> Ordering {
    let score_cmp = by_score::<T>(kind);
    move |a: &T, b: &T| by_scan_then_charge(a, b).then_with(|| score_cmp(a, b))
}

/// Named orderings for whole result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Spectrum,
    SpectrumThen(ScoreKind),
    DecoyXcorrQvalue,
    DecoyPvalueQvalue,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Spectrum => "spectrum",
            SortMode::SpectrumThen(kind) => match kind {
                ScoreKind::Sp => "sp",
                ScoreKind::XCorr => "xcorr",
                ScoreKind::LogPBonfWeibullXcorr => "p-value",
                ScoreKind::LogPQvalueWeibullXcorr => "weibull-qvalue",
                ScoreKind::PercolatorScore => "percolator-score",
                ScoreKind::PercolatorQvalue => "percolator-qvalue",
                ScoreKind::QrankerScore => "qranker-score",
                ScoreKind::QrankerQvalue => "qranker-qvalue",
                ScoreKind::DecoyXcorrQvalue => "decoy-xcorr-qvalue",
                ScoreKind::DecoyPvalueQvalue => "decoy-pvalue-qvalue",
            },
            SortMode::DecoyXcorrQvalue => "decoy-xcorr-qvalue",
            SortMode::DecoyPvalueQvalue => "decoy-pvalue-qvalue",
        }
    }

    pub fn comparator<T: RankedCandidate + 'static>(
        self,
    ) -> Result<Box<dyn Fn(&T, &T) -> Ordering>, RankingError> {
        match self {
            SortMode::Spectrum => Ok(Box::new(by_scan_then_charge::<T>)),
            SortMode::SpectrumThen(kind) => Ok(Box::new(by_spectrum_then_score::<T>(kind))),
            SortMode::DecoyXcorrQvalue | SortMode::DecoyPvalueQvalue => {
                Err(RankingError::UnimplementedSortMode(self.as_str()))
            }
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.to_lowercase().replace('_', "-").as_str() {
            "spectrum" => SortMode::Spectrum,
            "sp" => SortMode::SpectrumThen(ScoreKind::Sp),
            "xcorr" => SortMode::SpectrumThen(ScoreKind::XCorr),
            "p-value" | "pvalue" => SortMode::SpectrumThen(ScoreKind::LogPBonfWeibullXcorr),
            "weibull-qvalue" => SortMode::SpectrumThen(ScoreKind::LogPQvalueWeibullXcorr),
            "percolator-score" => SortMode::SpectrumThen(ScoreKind::PercolatorScore),
            "percolator-qvalue" => SortMode::SpectrumThen(ScoreKind::PercolatorQvalue),
            "qranker-score" => SortMode::SpectrumThen(ScoreKind::QrankerScore),
            "qranker-qvalue" => SortMode::SpectrumThen(ScoreKind::QrankerQvalue),
            "decoy-xcorr-qvalue" => SortMode::DecoyXcorrQvalue,
            "decoy-pvalue-qvalue" => SortMode::DecoyPvalueQvalue,
            _ => return Err(RankingError::UnknownSortMode(s.to_string())),
        };
        Ok(mode)
    }
}

/// Stable sort of a whole result set.
pub fn sort_candidates<T: RankedCandidate + 'static>(
    items: &mut [T],
    mode: SortMode,
) -> Result<(), RankingError> {
    let cmp = mode.comparator::<T>()?;
    items.sort_by(|a, b| cmp(a, b));
    Ok(())
}
