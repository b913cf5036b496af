use crate::chemistry::mz_to_neutral_mass;
use crate::errors::DataProcessingError;
use serde::{
    Deserialize,
    Serialize,
};

/// The precursor-level view of an observed spectrum.
///
/// Peak data is owned by whatever scores candidates; the ranking engine only
/// needs the scan number, the candidate charge states and the precursor m/z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumInfo {
    pub scan: u32,
    pub precursor_mz: f64,
    #[serde(default)]
    pub charges: Vec<u8>,
}

impl SpectrumInfo {
    pub fn new(scan: u32, precursor_mz: f64, charges: Vec<u8>) -> Self {
        Self {
            scan,
            precursor_mz,
            charges,
        }
    }

    pub fn neutral_mass(&self, charge: u8) -> f64 {
        mz_to_neutral_mass(self.precursor_mz, charge)
    }

    /// Rejects records the search cannot make sense of.
    pub fn validate(&self) -> Result<(), DataProcessingError> {
        if !self.precursor_mz.is_finite() || self.precursor_mz <= 0.0 {
            return Err(DataProcessingError::ExpectedFiniteNonNanData {
                context: format!("precursor m/z of scan {}", self.scan),
            });
        }
        if self.charges.is_empty() || self.charges.contains(&0) {
            return Err(DataProcessingError::ExpectedNonEmptyData {
                context: format!("non-zero charge states of scan {}", self.scan),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::PROTON_MASS;

    #[test]
    fn test_neutral_mass() {
        let spec = SpectrumInfo::new(10, 500.0 + PROTON_MASS, vec![2, 3]);
        assert!((spec.neutral_mass(2) - 1000.0).abs() < 1e-9);
        assert!((spec.neutral_mass(3) - 1500.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate() {
        assert!(SpectrumInfo::new(1, 500.0, vec![2]).validate().is_ok());
        assert!(SpectrumInfo::new(1, 500.0, vec![]).validate().is_err());
        assert!(SpectrumInfo::new(1, f64::NAN, vec![2]).validate().is_err());
        assert!(SpectrumInfo::new(1, -1.0, vec![2]).validate().is_err());
    }
}
