use super::ranges::MassWindow;
use serde::{
    Deserialize,
    Serialize,
};

/// Precursor mass tolerance.
///
/// Ranges are given as positive values on both sides: `(1, 1)` around `10`
/// is `[9, 11]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum MassTolerance {
    #[serde(rename = "da")]
    Absolute((f64, f64)),
    #[serde(rename = "ppm")]
    Ppm((f64, f64)),
}

impl Default for MassTolerance {
    fn default() -> Self {
        MassTolerance::Absolute((3.0, 3.0))
    }
}

impl MassTolerance {
    /// Window of candidate masses compatible with an observed neutral mass.
    pub fn window(&self, mass: f64) -> Option<MassWindow> {
        let (low, high) = match self {
            MassTolerance::Absolute((low, high)) => (*low, *high),
            MassTolerance::Ppm((low, high)) => (mass * low / 1e6, mass * high / 1e6),
        };
        MassWindow::try_new(mass - low, mass + high).ok()
    }
}
