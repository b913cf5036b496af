use crate::chemistry::{
    Enzyme,
    Termini,
    WATER_MASS,
    residue_mass,
};
use crate::errors::DataProcessingError;
use regex::Regex;
use std::fmt::Write as _;
use std::sync::{
    Arc,
    OnceLock,
};

/// Where in a protein a peptide sequence was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinLocus {
    pub protein_id: Arc<str>,
    /// Zero-based offset of the first residue in the protein.
    pub start: usize,
}

/// A (possibly modified) peptide with its monoisotopic neutral mass and every
/// protein locus it maps to.
#[derive(Debug, Clone, PartialEq)]
pub struct Peptide {
    sequence: Arc<str>,
    // One delta per residue, empty when unmodified.
    mod_masses: Box<[f64]>,
    mass: f64,
    loci: Vec<ProteinLocus>,
    n_flank: u8,
    c_flank: u8,
}

fn mod_regex() -> &'static Regex {
    static MOD_RE: OnceLock<Regex> = OnceLock::new();
    MOD_RE.get_or_init(|| {
        Regex::new(r"([A-Z])(?:\[([+-]?\d+(?:\.\d+)?)\])?").expect("static regex is valid")
    })
}

impl Peptide {
    pub fn new(
        sequence: &str,
        loci: Vec<ProteinLocus>,
        n_flank: u8,
        c_flank: u8,
    ) -> Result<Self, DataProcessingError> {
        if sequence.is_empty() {
            return Err(DataProcessingError::ExpectedNonEmptyData {
                context: "peptide sequence".to_string(),
            });
        }
        let mut mass = WATER_MASS;
        for r in sequence.bytes() {
            mass += residue_mass(r).ok_or_else(|| DataProcessingError::UnknownResidue {
                residue: r as char,
                context: format!("in peptide {}", sequence),
            })?;
        }
        Ok(Self {
            sequence: sequence.into(),
            mod_masses: Box::new([]),
            mass,
            loci,
            n_flank,
            c_flank,
        })
    }

    /// Parses `PEP[79.9663]TIDE`-style annotated sequences.
    pub fn from_modified_sequence(
        annotated: &str,
        loci: Vec<ProteinLocus>,
        n_flank: u8,
        c_flank: u8,
    ) -> Result<Self, DataProcessingError> {
        let mut bare = String::with_capacity(annotated.len());
        let mut mods = Vec::new();
        let mut consumed = 0;
        for cap in mod_regex().captures_iter(annotated) {
            let Some(whole) = cap.get(0) else { break };
            if whole.start() != consumed {
                break;
            }
            consumed = whole.end();
            bare.push_str(&cap[1]);
            if let Some(delta) = cap.get(2) {
                let delta: f64 =
                    delta
                        .as_str()
                        .parse()
                        .map_err(|_| DataProcessingError::Unparseable {
                            value: delta.as_str().to_string(),
                            expected: "modification mass",
                            context: annotated.to_string(),
                        })?;
                mods.push((bare.len() - 1, delta));
            }
        }
        if consumed != annotated.len() {
            return Err(DataProcessingError::Unparseable {
                value: annotated.to_string(),
                expected: "modified peptide sequence",
                context: format!("unexpected content at offset {}", consumed),
            });
        }
        Self::new(&bare, loci, n_flank, c_flank)?.with_mods(&mods)
    }

    /// Adds a mass delta at each `(position, delta)`; deltas on one residue
    /// accumulate.
    pub fn with_mods(mut self, mods: &[(usize, f64)]) -> Result<Self, DataProcessingError> {
        if mods.is_empty() {
            return Ok(self);
        }
        let mut deltas = if self.mod_masses.is_empty() {
            vec![0.0; self.len()]
        } else {
            self.mod_masses.to_vec()
        };
        for &(pos, delta) in mods {
            let slot = deltas
                .get_mut(pos)
                .ok_or_else(|| DataProcessingError::InvalidRange {
                    start: pos as f64,
                    end: self.len() as f64,
                    context: format!("modification position in {}", self.sequence),
                })?;
            *slot += delta;
            self.mass += delta;
        }
        self.mod_masses = deltas.into_boxed_slice();
        Ok(self)
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn residues(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn mod_mass_at(&self, pos: usize) -> f64 {
        self.mod_masses.get(pos).copied().unwrap_or(0.0)
    }

    pub fn loci(&self) -> &[ProteinLocus] {
        &self.loci
    }

    pub fn add_locus(&mut self, locus: ProteinLocus) {
        if !self.loci.contains(&locus) {
            self.loci.push(locus);
        }
    }

    pub fn protein_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.loci.iter().map(|l| l.protein_id.as_ref())
    }

    pub fn n_flank(&self) -> u8 {
        self.n_flank
    }

    pub fn c_flank(&self) -> u8 {
        self.c_flank
    }

    pub fn is_protein_n_term(&self) -> bool {
        self.n_flank == b'-'
    }

    pub fn is_protein_c_term(&self) -> bool {
        self.c_flank == b'-'
    }

    pub fn missed_cleavages(&self, enzyme: Enzyme, excluded: &[usize]) -> usize {
        enzyme.missed_cleavages(self.residues(), excluded)
    }

    pub fn termini(&self, enzyme: Enzyme) -> Termini {
        Termini::classify(enzyme, self.n_flank, self.residues(), self.c_flank)
    }

    /// Sequence with modification masses in brackets, e.g. `PEPT[79.9663]IDE`.
    pub fn modified_sequence(&self) -> String {
        if self.mod_masses.iter().all(|m| *m == 0.0) {
            return self.sequence.to_string();
        }
        let mut out = String::with_capacity(self.len() + 10 * self.mod_masses.len());
        for (r, delta) in self.sequence.chars().zip(self.mod_masses.iter()) {
            out.push(r);
            if *delta != 0.0 {
                // Writing into a String cannot fail.
                let _ = write!(out, "[{:.4}]", delta);
            }
        }
        out
    }

    /// Rearranges residues so that new position `i` holds old residue
    /// `order[i]`. Modifications travel with their residue; the mass and
    /// protein loci are kept.
    pub fn permuted(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.len());
        let residues = self.residues();
        let sequence: String = order.iter().map(|&i| residues[i] as char).collect();
        let mod_masses = if self.mod_masses.is_empty() {
            Box::new([]) as Box<[f64]>
        } else {
            order.iter().map(|&i| self.mod_masses[i]).collect()
        };
        Self {
            sequence: sequence.into(),
            mod_masses,
            mass: self.mass,
            loci: self.loci.clone(),
            n_flank: self.n_flank,
            c_flank: self.c_flank,
        }
    }
}
