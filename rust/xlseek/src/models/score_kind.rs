use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

/// Whether larger or smaller values of a score denote a better match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// The closed set of scoring functions a candidate can carry a value for.
///
/// The ordering convention of every kind is declared once, in
/// [`ScoreKind::direction`]. Probability-like kinds produced by calibration
/// (`LogPBonfWeibullXcorr`, `LogPQvalueWeibullXcorr`) are stored as `-ln(p)`,
/// so larger is better, while the q-value kinds are stored raw and smaller is
/// better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreKind {
    Sp,
    #[serde(rename = "xcorr")]
    XCorr,
    #[serde(rename = "logp_bonf_weibull_xcorr")]
    LogPBonfWeibullXcorr,
    #[serde(rename = "logp_qvalue_weibull_xcorr")]
    LogPQvalueWeibullXcorr,
    DecoyXcorrQvalue,
    DecoyPvalueQvalue,
    PercolatorScore,
    PercolatorQvalue,
    QrankerScore,
    QrankerQvalue,
}

impl ScoreKind {
    pub const COUNT: usize = 10;

    pub const ALL: [ScoreKind; ScoreKind::COUNT] = [
        ScoreKind::Sp,
        ScoreKind::XCorr,
        ScoreKind::LogPBonfWeibullXcorr,
        ScoreKind::LogPQvalueWeibullXcorr,
        ScoreKind::DecoyXcorrQvalue,
        ScoreKind::DecoyPvalueQvalue,
        ScoreKind::PercolatorScore,
        ScoreKind::PercolatorQvalue,
        ScoreKind::QrankerScore,
        ScoreKind::QrankerQvalue,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn direction(self) -> ScoreDirection {
        match self {
            ScoreKind::Sp
            | ScoreKind::XCorr
            | ScoreKind::LogPBonfWeibullXcorr
            | ScoreKind::LogPQvalueWeibullXcorr
            | ScoreKind::PercolatorScore
            | ScoreKind::QrankerScore => ScoreDirection::HigherIsBetter,
            ScoreKind::DecoyXcorrQvalue
            | ScoreKind::DecoyPvalueQvalue
            | ScoreKind::PercolatorQvalue
            | ScoreKind::QrankerQvalue => ScoreDirection::LowerIsBetter,
        }
    }

    /// Kinds stored as `-ln(x)` but reported as `x`.
    pub fn is_negative_log(self) -> bool {
        matches!(
            self,
            ScoreKind::LogPBonfWeibullXcorr | ScoreKind::LogPQvalueWeibullXcorr
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreKind::Sp => "sp",
            ScoreKind::XCorr => "xcorr",
            ScoreKind::LogPBonfWeibullXcorr => "logp_bonf_weibull_xcorr",
            ScoreKind::LogPQvalueWeibullXcorr => "logp_qvalue_weibull_xcorr",
            ScoreKind::DecoyXcorrQvalue => "decoy_xcorr_qvalue",
            ScoreKind::DecoyPvalueQvalue => "decoy_pvalue_qvalue",
            ScoreKind::PercolatorScore => "percolator_score",
            ScoreKind::PercolatorQvalue => "percolator_qvalue",
            ScoreKind::QrankerScore => "qranker_score",
            ScoreKind::QrankerQvalue => "qranker_qvalue",
        }
    }
}

impl Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        ScoreKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .or(match normalized.as_str() {
                "p_value" | "pvalue" => Some(ScoreKind::LogPBonfWeibullXcorr),
                _ => None,
            })
            .ok_or_else(|| format!("Invalid score kind: '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_position() {
        for (i, kind) in ScoreKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_directions() {
        assert_eq!(ScoreKind::XCorr.direction(), ScoreDirection::HigherIsBetter);
        assert_eq!(ScoreKind::Sp.direction(), ScoreDirection::HigherIsBetter);
        assert_eq!(
            ScoreKind::LogPBonfWeibullXcorr.direction(),
            ScoreDirection::HigherIsBetter
        );
        assert_eq!(
            ScoreKind::PercolatorQvalue.direction(),
            ScoreDirection::LowerIsBetter
        );
        assert_eq!(
            ScoreKind::QrankerQvalue.direction(),
            ScoreDirection::LowerIsBetter
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        for kind in ScoreKind::ALL {
            assert_eq!(kind.as_str().parse::<ScoreKind>().unwrap(), kind);
        }
        assert_eq!(
            "p-value".parse::<ScoreKind>().unwrap(),
            ScoreKind::LogPBonfWeibullXcorr
        );
        assert!("hyperscore".parse::<ScoreKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ScoreKind::XCorr).unwrap();
        assert_eq!(json, "\"xcorr\"");
        let kind: ScoreKind = serde_json::from_str("\"percolator_qvalue\"").unwrap();
        assert_eq!(kind, ScoreKind::PercolatorQvalue);
    }
}
