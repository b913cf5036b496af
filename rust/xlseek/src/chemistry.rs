//! Monoisotopic masses and proteolytic cleavage rules.

use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

pub const PROTON_MASS: f64 = 1.007_276_466_88;
pub const WATER_MASS: f64 = 18.010_564_683_7;

/// Monoisotopic residue mass of a standard amino acid.
///
/// Returns `None` for anything that is not an upper case residue letter
/// with a defined composition (e.g. `B`, `X`, `Z`).
pub fn residue_mass(residue: u8) -> Option<f64> {
    let mass = match residue {
        b'G' => 57.021_463_72,
        b'A' => 71.037_113_78,
        b'S' => 87.032_028_41,
        b'P' => 97.052_763_85,
        b'V' => 99.068_413_91,
        b'T' => 101.047_678_47,
        b'C' => 103.009_184_48,
        b'L' => 113.084_064_04,
        b'I' => 113.084_064_04,
        b'N' => 114.042_927_44,
        b'D' => 115.026_943_03,
        b'Q' => 128.058_577_51,
        b'K' => 128.094_963_01,
        b'E' => 129.042_593_14,
        b'M' => 131.040_484_64,
        b'H' => 137.058_911_86,
        b'F' => 147.068_413_91,
        b'U' => 150.953_633_41,
        b'R' => 156.101_111_03,
        b'Y' => 163.063_328_53,
        b'W' => 186.079_312_98,
        b'O' => 237.147_726_93,
        _ => return None,
    };
    Some(mass)
}

/// Neutral monoisotopic mass of an unmodified residue string.
pub fn unmodified_mass(sequence: &str) -> Option<f64> {
    sequence
        .bytes()
        .try_fold(WATER_MASS, |acc, r| residue_mass(r).map(|m| acc + m))
}

pub fn mz_to_neutral_mass(mz: f64, charge: u8) -> f64 {
    (mz - PROTON_MASS) * charge as f64
}

/// Proteolytic enzyme used to produce (or to judge) peptide termini.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Enzyme {
    /// C-terminal to K/R, not before P.
    #[default]
    Trypsin,
    /// C-terminal to K/R, ignoring the proline rule.
    TrypsinP,
    /// C-terminal to K, not before P.
    LysC,
    /// Every peptide bond is a valid terminus; no missed cleavages exist.
    NoEnzyme,
}

impl Enzyme {
    /// Whether the bond between `residue` and `next` is a cleavage site.
    pub fn cleaves_between(&self, residue: u8, next: u8) -> bool {
        match self {
            Enzyme::Trypsin => matches!(residue, b'K' | b'R') && next != b'P',
            Enzyme::TrypsinP => matches!(residue, b'K' | b'R'),
            Enzyme::LysC => residue == b'K' && next != b'P',
            Enzyme::NoEnzyme => true,
        }
    }

    /// Residues the enzyme can cut after, regardless of context.
    pub fn is_cleavage_residue(&self, residue: u8) -> bool {
        match self {
            Enzyme::Trypsin | Enzyme::TrypsinP => matches!(residue, b'K' | b'R'),
            Enzyme::LysC => residue == b'K',
            Enzyme::NoEnzyme => false,
        }
    }

    /// Counts internal cleavage sites in `sequence`, skipping any position in
    /// `excluded` (used to discount a residue that carries a cross-link).
    pub fn missed_cleavages(&self, sequence: &[u8], excluded: &[usize]) -> usize {
        if matches!(self, Enzyme::NoEnzyme) {
            return 0;
        }
        sequence
            .windows(2)
            .enumerate()
            .filter(|(i, w)| self.cleaves_between(w[0], w[1]) && !excluded.contains(i))
            .count()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Enzyme::Trypsin => "trypsin",
            Enzyme::TrypsinP => "trypsin/p",
            Enzyme::LysC => "lys-c",
            Enzyme::NoEnzyme => "no-enzyme",
        }
    }
}

impl Display for Enzyme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Enzyme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trypsin" => Ok(Enzyme::Trypsin),
            "trypsin/p" | "trypsin_p" => Ok(Enzyme::TrypsinP),
            "lys-c" | "lys_c" | "lysc" => Ok(Enzyme::LysC),
            "no-enzyme" | "no_enzyme" | "none" => Ok(Enzyme::NoEnzyme),
            _ => Err(format!(
                "Invalid enzyme: '{}'. Valid options: trypsin, trypsin/p, lys-c, no-enzyme",
                s
            )),
        }
    }
}

/// How well a peptide's termini agree with the enzyme, reported as the
/// "cleavage type" of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termini {
    Full,
    Semi,
    Non,
}

impl Termini {
    /// Judge termini from the flanking residues; `-` marks a protein terminus.
    pub fn classify(enzyme: Enzyme, n_flank: u8, sequence: &[u8], c_flank: u8) -> Self {
        let (Some(&first), Some(&last)) = (sequence.first(), sequence.last()) else {
            return Termini::Non;
        };
        let n_ok = n_flank == b'-' || enzyme.cleaves_between(n_flank, first);
        let c_ok = c_flank == b'-' || enzyme.cleaves_between(last, c_flank);
        match (n_ok, c_ok) {
            (true, true) => Termini::Full,
            (false, false) => Termini::Non,
            _ => Termini::Semi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Termini::Full => "full",
            Termini::Semi => "semi",
            Termini::Non => "non",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmodified_mass() {
        // GG: 2 * 57.02146 + water
        let mass = unmodified_mass("GG").unwrap();
        assert!((mass - 132.053_492).abs() < 1e-5);
        assert!(unmodified_mass("PEPTIDEX").is_none());
    }

    #[test]
    fn test_trypsin_missed_cleavages() {
        let enz = Enzyme::Trypsin;
        assert_eq!(enz.missed_cleavages(b"PEPTIDEK", &[]), 0);
        assert_eq!(enz.missed_cleavages(b"PEPKTIDEK", &[]), 1);
        assert_eq!(enz.missed_cleavages(b"PEPKPTIDEK", &[]), 0);
        assert_eq!(enz.missed_cleavages(b"PEPKTIRDEK", &[]), 2);
        assert_eq!(enz.missed_cleavages(b"PEPKTIRDEK", &[3]), 1);
        assert_eq!(Enzyme::TrypsinP.missed_cleavages(b"PEPKPTIDEK", &[]), 1);
        assert_eq!(Enzyme::NoEnzyme.missed_cleavages(b"PEPKPTIDEK", &[]), 0);
    }

    #[test]
    fn test_termini() {
        let enz = Enzyme::Trypsin;
        assert_eq!(Termini::classify(enz, b'K', b"PEPTIDEK", b'A'), Termini::Full);
        assert_eq!(Termini::classify(enz, b'-', b"PEPTIDEK", b'-'), Termini::Full);
        assert_eq!(Termini::classify(enz, b'A', b"PEPTIDEK", b'A'), Termini::Semi);
        assert_eq!(Termini::classify(enz, b'A', b"PEPTIDEA", b'A'), Termini::Non);
    }

    #[test]
    fn test_enzyme_from_str() {
        assert_eq!("Trypsin".parse::<Enzyme>().unwrap(), Enzyme::Trypsin);
        assert_eq!("lys-c".parse::<Enzyme>().unwrap(), Enzyme::LysC);
        assert!("pepsin".parse::<Enzyme>().is_err());
    }
}
