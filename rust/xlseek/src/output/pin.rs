use super::format::format_float;
use super::sqt::sqt_sequence;
use crate::chemistry::Enzyme;
use crate::models::{
    CandidateCollection,
    ScoreKind,
};
use crate::search::features::{
    FEATURE_NAMES,
    NUM_FEATURES,
    percolator_features,
};
use std::io::Write;

/// Writes candidates as percolator input: an id, the `1`/`-1` label, the
/// scan, the feature vector, the peptide and one trailing field per
/// protein.
pub struct PinWriter<W: Write> {
    inner: csv::Writer<W>,
    enzyme: Enzyme,
    precision: usize,
    num_written: usize,
}

impl<W: Write> PinWriter<W> {
    /// Wraps `writer` and writes the header line.
    pub fn new(writer: W, enzyme: Enzyme, precision: usize) -> Result<Self, csv::Error> {
        let mut inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_writer(writer);
        inner.write_record(
            ["SpecId", "Label", "ScanNr"]
                .into_iter()
                .chain(FEATURE_NAMES)
                .chain(["Peptide", "Proteins"]),
        )?;
        Ok(Self {
            inner,
            enzyme,
            precision,
            num_written: 0,
        })
    }

    pub fn write_collection(&mut self, collection: &CandidateCollection) -> Result<(), csv::Error> {
        let decoy = collection.decoy();
        let (label, prefix) = if decoy.is_decoy() {
            ("-1", "rand_")
        } else {
            ("1", "")
        };
        for (i, candidate) in collection.candidates().iter().enumerate() {
            let rank = candidate
                .scores
                .rank(ScoreKind::XCorr)
                .map_or(i + 1, |r| r as usize);
            let hypothesis = candidate.hypothesis();
            let mut row: Vec<String> = Vec::with_capacity(NUM_FEATURES + 6);
            row.push(format!(
                "{}_{}_{}_{}_{}",
                decoy.as_str(),
                decoy.set_index(),
                candidate.scan(),
                candidate.charge(),
                rank
            ));
            row.push(label.to_string());
            row.push(candidate.scan().to_string());
            row.extend(
                percolator_features(candidate, collection, self.enzyme)
                    .iter()
                    .map(|f| format_float(*f, self.precision)),
            );
            row.push(sqt_sequence(
                &hypothesis.sequence_string(),
                &hypothesis.flanking(),
            ));
            row.extend(
                hypothesis
                    .protein_ids()
                    .iter()
                    .map(|id| format!("{}{}", prefix, id)),
            );
            self.inner.write_record(&row)?;
            self.num_written += 1;
        }
        Ok(())
    }

    pub fn num_written(&self) -> usize {
        self.num_written
    }

    pub fn into_inner(mut self) -> Result<W, csv::Error> {
        self.inner.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::PROTON_MASS;
    use crate::decoy::{
        DecoyShuffleConfig,
        ShuffleStream,
    };
    use crate::models::{
        Candidate,
        CandidateHypothesis,
        DecoyMarking,
        Peptide,
        ProteinLocus,
        SpectrumInfo,
    };
    use std::sync::Arc;

    fn target_collection() -> CandidateCollection {
        let peptide = Arc::new(
            Peptide::new(
                "AEPKTIDEK",
                vec![
                    ProteinLocus {
                        protein_id: "P1".into(),
                        start: 12,
                    },
                    ProteinLocus {
                        protein_id: "P2".into(),
                        start: 40,
                    },
                ],
                b'R',
                b'A',
            )
            .unwrap(),
        );
        let mz = peptide.mass() / 2.0 + PROTON_MASS;
        let spectrum = Arc::new(SpectrumInfo::new(42, mz, vec![2]));
        let mut candidate = Candidate::new(spectrum.clone(), CandidateHypothesis::Linear(peptide), 2);
        candidate.scores.set(ScoreKind::XCorr, 2.5);
        let mut col = CandidateCollection::new(spectrum, 2, DecoyMarking::Target, vec![candidate]);
        col.rank_by(ScoreKind::XCorr);
        col.compute_delta_cn(ScoreKind::XCorr);
        col
    }

    fn written(collections: &[CandidateCollection]) -> Vec<Vec<String>> {
        let mut writer = PinWriter::new(Vec::new(), Enzyme::Trypsin, 6).unwrap();
        for col in collections {
            writer.write_collection(col).unwrap();
        }
        assert_eq!(
            writer.num_written(),
            collections.iter().map(|c| c.len()).sum::<usize>()
        );
        String::from_utf8(writer.into_inner().unwrap())
            .unwrap()
            .lines()
            .map(|l| l.split('\t').map(String::from).collect())
            .collect()
    }

    #[test]
    fn test_target_row() {
        let rows = written(&[target_collection()]);
        assert_eq!(rows[0].len(), 3 + NUM_FEATURES + 2);
        assert_eq!(rows[0][3], "XCorr");
        assert_eq!(rows[0][NUM_FEATURES + 3], "Peptide");

        let row = &rows[1];
        assert_eq!(row[0], "Target_0_42_2_1");
        assert_eq!(row[1], "1");
        assert_eq!(row[2], "42");
        assert_eq!(row[3], "2.5");
        assert_eq!(row[NUM_FEATURES + 3], "R.AEPKTIDEK.A");
        // One trailing field per protein.
        assert_eq!(&row[NUM_FEATURES + 4..], &["P1".to_string(), "P2".to_string()]);
    }

    #[test]
    fn test_decoy_rows_are_labelled() {
        let target = target_collection();
        let mut stream = ShuffleStream::from_seed(9);
        let decoy = target.candidates()[0].to_decoy(3, &DecoyShuffleConfig::default(), &mut stream);
        let spectrum = Arc::new(target.spectrum().clone());
        let decoys = CandidateCollection::new(spectrum, 2, DecoyMarking::for_set(3), vec![decoy]);
        let rows = written(&[decoys]);
        let row = &rows[1];
        assert_eq!(row[0], "Decoy_3_42_2_1");
        assert_eq!(row[1], "-1");
        assert_eq!(&row[NUM_FEATURES + 4..], &["rand_P1".to_string(), "rand_P2".to_string()]);
    }
}
