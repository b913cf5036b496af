use super::peptide::{
    Peptide,
    ProteinLocus,
};
use crate::chemistry::Enzyme;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use tracing::warn;

/// A stretch of a protein sequence produced by digestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSlice {
    protein_id: Arc<str>,
    ref_seq: Arc<str>,
    range: Range<usize>,
}

impl DigestSlice {
    pub fn new(protein_id: Arc<str>, ref_seq: Arc<str>, range: Range<usize>) -> Self {
        Self {
            protein_id,
            ref_seq,
            range,
        }
    }

    pub fn sequence(&self) -> &str {
        &self.ref_seq.as_ref()[self.range.clone()]
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn n_flank(&self) -> u8 {
        match self.range.start {
            0 => b'-',
            i => self.ref_seq.as_bytes()[i - 1],
        }
    }

    pub fn c_flank(&self) -> u8 {
        self.ref_seq
            .as_bytes()
            .get(self.range.end)
            .copied()
            .unwrap_or(b'-')
    }

    pub fn locus(&self) -> ProteinLocus {
        ProteinLocus {
            protein_id: self.protein_id.clone(),
            start: self.range.start,
        }
    }
}

/// A fixed (static) modification applied to every occurrence of a residue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FixedModification {
    pub residue: char,
    pub mass_delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DigestionParameters {
    pub min_length: usize,
    pub max_length: usize,
    pub max_missed_cleavages: usize,
    pub enzyme: Enzyme,
    pub fixed_modifications: Vec<FixedModification>,
}

impl Default for DigestionParameters {
    fn default() -> Self {
        Self {
            min_length: 7,
            max_length: 30,
            max_missed_cleavages: 2,
            enzyme: Enzyme::Trypsin,
            fixed_modifications: vec![FixedModification {
                residue: 'C',
                mass_delta: 57.021_464,
            }],
        }
    }
}

impl DigestionParameters {
    /// Cleavage points of `sequence`, including both protein ends.
    fn cut_points(&self, sequence: &[u8]) -> Vec<usize> {
        let mut cuts = vec![0];
        cuts.extend(
            sequence
                .windows(2)
                .enumerate()
                .filter(|(_, w)| self.enzyme.cleaves_between(w[0], w[1]))
                .map(|(i, _)| i + 1),
        );
        cuts.push(sequence.len());
        cuts.dedup();
        cuts
    }

    pub fn digest(&self, protein_id: Arc<str>, sequence: Arc<str>) -> Vec<DigestSlice> {
        let cuts = self.cut_points(sequence.as_bytes());
        let mut out = Vec::new();
        for (i, &start) in cuts.iter().enumerate() {
            for &end in cuts
                .iter()
                .skip(i + 1)
                .take(self.max_missed_cleavages.saturating_add(1))
            {
                let len = end - start;
                if len > self.max_length {
                    break;
                }
                if len >= self.min_length {
                    out.push(DigestSlice::new(protein_id.clone(), sequence.clone(), start..end));
                }
            }
        }
        out
    }

    pub fn digest_multiple(&self, proteins: &[(Arc<str>, Arc<str>)]) -> Vec<DigestSlice> {
        proteins
            .iter()
            .flat_map(|(id, seq)| self.digest(id.clone(), seq.clone()))
            .collect()
    }

    fn fixed_mods_for(&self, sequence: &str) -> Vec<(usize, f64)> {
        sequence
            .chars()
            .enumerate()
            .flat_map(|(i, r)| {
                self.fixed_modifications
                    .iter()
                    .filter(move |m| m.residue == r)
                    .map(move |m| (i, m.mass_delta))
            })
            .collect()
    }

    /// Turns digests into peptides, merging identical sequences so that every
    /// protein locus is kept on one peptide. Digests with residues without a
    /// defined mass are dropped with a warning.
    pub fn into_peptides(&self, digests: Vec<DigestSlice>) -> Vec<Peptide> {
        let mut by_sequence: HashMap<String, usize> = HashMap::new();
        let mut peptides: Vec<Peptide> = Vec::new();
        for d in digests {
            if let Some(&idx) = by_sequence.get(d.sequence()) {
                peptides[idx].add_locus(d.locus());
                continue;
            }
            let peptide = Peptide::new(d.sequence(), vec![d.locus()], d.n_flank(), d.c_flank())
                .and_then(|p| p.with_mods(&self.fixed_mods_for(d.sequence())));
            match peptide {
                Ok(p) => {
                    by_sequence.insert(d.sequence().to_string(), peptides.len());
                    peptides.push(p);
                }
                Err(e) => warn!("Skipping digest {}: {}", d.sequence(), e),
            }
        }
        peptides
    }
}
