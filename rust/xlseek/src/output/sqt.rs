use super::format::format_float;
use super::tab::ResultRecord;
use crate::chemistry::PROTON_MASS;
use crate::models::ScoreKind;
use crate::ranking::{
    RankedCandidate,
    by_candidate_set,
};
use std::io::Write;

/// Writes matches in SQT format: one `S` line per spectrum and charge, an
/// `M` line per match and one `L` line per protein of the match. Decoy
/// proteins are prefixed with `rand_`.
pub struct SqtWriter<W: Write> {
    inner: W,
    precision: usize,
}

impl<W: Write> SqtWriter<W> {
    pub fn new(inner: W, precision: usize) -> Self {
        Self { inner, precision }
    }

    /// `records` must all belong to the same scan and charge, in output
    /// order. Nothing is written for an empty slice.
    pub fn write_spectrum(&mut self, records: &[ResultRecord]) -> std::io::Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        let lowest_sp = records
            .iter()
            .filter_map(|r| r.scores.try_get(ScoreKind::Sp))
            .reduce(f32::min)
            .unwrap_or(0.0);
        writeln!(
            self.inner,
            "S\t{}\t{}\t{}\t0.0\txlseek\t{:.2}\t0.00\t{:.2}\t{}",
            first.scan,
            first.scan,
            first.charge,
            first.neutral_mass + PROTON_MASS,
            lowest_sp,
            first.matches_per_spectrum
        )?;
        for record in records {
            self.write_match(record)?;
        }
        Ok(())
    }

    fn write_match(&mut self, record: &ResultRecord) -> std::io::Result<()> {
        let score = |kind| {
            format_float(
                record.scores.try_get(kind).unwrap_or(0.0) as f64,
                self.precision,
            )
        };
        let rank = |kind| record.scores.rank(kind).unwrap_or(0);
        writeln!(
            self.inner,
            "M\t{}\t{}\t{:.4}\t{:.2}\t{}\t{}\t{}\t{}\t{}\tU",
            rank(ScoreKind::XCorr),
            rank(ScoreKind::Sp),
            record.peptide_mass,
            record.delta_cn.unwrap_or(0.0).abs(),
            score(ScoreKind::XCorr),
            score(ScoreKind::Sp),
            record.by_ions_matched.unwrap_or(0),
            record.by_ions_total,
            sqt_sequence(&record.sequence, &record.flanking),
        )?;
        let prefix = if record.is_decoy() { "rand_" } else { "" };
        for protein in record.proteins() {
            writeln!(self.inner, "L\t{}{}", prefix, protein)?;
        }
        Ok(())
    }

    /// Groups consecutive records of one candidate set and writes each group.
    pub fn write_all(&mut self, records: &[ResultRecord]) -> std::io::Result<()> {
        for group in records.chunk_by(|a, b| by_candidate_set(a, b).is_eq()) {
            self.write_spectrum(group)?;
        }
        Ok(())
    }

    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// `N.SEQUENCE.C` with the flanking residues; `-` when they are unknown or
/// when the match spans two peptides.
pub(super) fn sqt_sequence(sequence: &str, flanking: &str) -> String {
    let flanks: Vec<char> = flanking.chars().collect();
    match flanks.as_slice() {
        [n, c] => format!("{}.{}.{}", n, sequence, c),
        _ => format!("-.{}.-", sequence),
    }
}
