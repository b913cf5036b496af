use super::format::format_float;
use crate::chemistry::Enzyme;
use crate::errors::{
    DataProcessingError,
    LibraryReadingError,
};
use crate::models::{
    Candidate,
    CandidateCollection,
    DecoyMarking,
    ScoreKind,
    ScoreTable,
};
use crate::ranking::RankedCandidate;
use std::io::{
    Read,
    Write,
};
use std::path::Path;
use std::str::FromStr;
use tracing::{
    info,
    warn,
};

/// Significant digits used for score fields unless configured otherwise.
pub const DEFAULT_PRECISION: usize = 8;

/// Columns of the tab-delimited result file, in file order.
///
/// `DecoySet` trails the classic columns and may be absent from older
/// files; every other column is required when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabColumn {
    Scan,
    Charge,
    PrecursorMz,
    NeutralMass,
    PeptideMass,
    DeltaCn,
    SpScore,
    SpRank,
    XcorrScore,
    XcorrRank,
    PValue,
    WeibullQvalue,
    DecoyXcorrQvalue,
    PercolatorScore,
    PercolatorRank,
    PercolatorQvalue,
    QrankerScore,
    QrankerQvalue,
    ByIonsMatched,
    ByIonsTotal,
    MatchesPerSpectrum,
    Sequence,
    CleavageType,
    ProteinId,
    FlankingAa,
    UnshuffledSequence,
    DecoySet,
}

impl TabColumn {
    pub const ALL: [TabColumn; 27] = [
        TabColumn::Scan,
        TabColumn::Charge,
        TabColumn::PrecursorMz,
        TabColumn::NeutralMass,
        TabColumn::PeptideMass,
        TabColumn::DeltaCn,
        TabColumn::SpScore,
        TabColumn::SpRank,
        TabColumn::XcorrScore,
        TabColumn::XcorrRank,
        TabColumn::PValue,
        TabColumn::WeibullQvalue,
        TabColumn::DecoyXcorrQvalue,
        TabColumn::PercolatorScore,
        TabColumn::PercolatorRank,
        TabColumn::PercolatorQvalue,
        TabColumn::QrankerScore,
        TabColumn::QrankerQvalue,
        TabColumn::ByIonsMatched,
        TabColumn::ByIonsTotal,
        TabColumn::MatchesPerSpectrum,
        TabColumn::Sequence,
        TabColumn::CleavageType,
        TabColumn::ProteinId,
        TabColumn::FlankingAa,
        TabColumn::UnshuffledSequence,
        TabColumn::DecoySet,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            TabColumn::Scan => "scan",
            TabColumn::Charge => "charge",
            TabColumn::PrecursorMz => "spectrum precursor m/z",
            TabColumn::NeutralMass => "spectrum neutral mass",
            TabColumn::PeptideMass => "peptide mass",
            TabColumn::DeltaCn => "delta_cn",
            TabColumn::SpScore => "sp score",
            TabColumn::SpRank => "sp rank",
            TabColumn::XcorrScore => "xcorr score",
            TabColumn::XcorrRank => "xcorr rank",
            TabColumn::PValue => "p-value",
            TabColumn::WeibullQvalue => "Weibull est. q-value",
            TabColumn::DecoyXcorrQvalue => "decoy q-value (xcorr)",
            TabColumn::PercolatorScore => "percolator score",
            TabColumn::PercolatorRank => "percolator rank",
            TabColumn::PercolatorQvalue => "percolator q-value",
            TabColumn::QrankerScore => "q-ranker score",
            TabColumn::QrankerQvalue => "q-ranker q-value",
            TabColumn::ByIonsMatched => "b/y ions matched",
            TabColumn::ByIonsTotal => "b/y ions total",
            TabColumn::MatchesPerSpectrum => "matches/spectrum",
            TabColumn::Sequence => "sequence",
            TabColumn::CleavageType => "cleavage type",
            TabColumn::ProteinId => "protein id",
            TabColumn::FlankingAa => "flanking aa",
            TabColumn::UnshuffledSequence => "unshuffled sequence",
            TabColumn::DecoySet => "decoy set",
        }
    }

    fn is_required(&self) -> bool {
        !matches!(self, TabColumn::DecoySet)
    }

    /// The score stored in this column, if it holds one.
    fn score_kind(&self) -> Option<ScoreKind> {
        match self {
            TabColumn::SpScore => Some(ScoreKind::Sp),
            TabColumn::XcorrScore => Some(ScoreKind::XCorr),
            TabColumn::PValue => Some(ScoreKind::LogPBonfWeibullXcorr),
            TabColumn::WeibullQvalue => Some(ScoreKind::LogPQvalueWeibullXcorr),
            TabColumn::DecoyXcorrQvalue => Some(ScoreKind::DecoyXcorrQvalue),
            TabColumn::PercolatorScore => Some(ScoreKind::PercolatorScore),
            TabColumn::PercolatorQvalue => Some(ScoreKind::PercolatorQvalue),
            TabColumn::QrankerScore => Some(ScoreKind::QrankerScore),
            TabColumn::QrankerQvalue => Some(ScoreKind::QrankerQvalue),
            _ => None,
        }
    }

    /// The score whose rank is stored in this column, if it holds one.
    fn rank_kind(&self) -> Option<ScoreKind> {
        match self {
            TabColumn::SpRank => Some(ScoreKind::Sp),
            TabColumn::XcorrRank => Some(ScoreKind::XCorr),
            TabColumn::PercolatorRank => Some(ScoreKind::PercolatorScore),
            _ => None,
        }
    }
}

/// One line of a result file. Carries everything needed to rank, filter and
/// re-emit a match without the spectrum or the peptide database.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub scan: u32,
    pub charge: u8,
    pub precursor_mz: f64,
    pub neutral_mass: f64,
    pub peptide_mass: f64,
    pub delta_cn: Option<f32>,
    pub scores: ScoreTable,
    pub by_ions_matched: Option<u32>,
    pub by_ions_total: u32,
    pub matches_per_spectrum: usize,
    pub sequence: String,
    pub cleavage_type: String,
    pub protein_ids: String,
    pub flanking: String,
    pub unshuffled_sequence: Option<String>,
    pub decoy: DecoyMarking,
}

impl ResultRecord {
    /// Snapshot of a candidate. Only the kinds computed for its collection
    /// are kept.
    pub fn from_candidate(
        candidate: &Candidate,
        collection: &CandidateCollection,
        enzyme: Enzyme,
    ) -> Self {
        let mut scores = ScoreTable::new();
        for kind in collection.scored_kinds().iter() {
            if let Some(v) = candidate.scores.try_get(kind) {
                scores.set(kind, v);
            }
            if let Some(r) = candidate.scores.rank(kind) {
                scores.set_rank(kind, r);
            }
        }

        let hypothesis = candidate.hypothesis();
        let mut loci: Vec<String> = Vec::new();
        for peptide in hypothesis.peptides() {
            for locus in peptide.loci() {
                let s = format!("{}({})", locus.protein_id, locus.start + 1);
                if !loci.contains(&s) {
                    loci.push(s);
                }
            }
        }

        Self {
            scan: candidate.scan(),
            charge: candidate.charge(),
            precursor_mz: candidate.spectrum().precursor_mz,
            neutral_mass: candidate.spectrum().neutral_mass(candidate.charge()),
            peptide_mass: candidate.mass(),
            delta_cn: candidate.delta_cn,
            scores,
            by_ions_matched: candidate.ion_matches.map(|x| x.matched),
            by_ions_total: candidate.by_ions_total(),
            matches_per_spectrum: collection.experiment_size(),
            sequence: hypothesis.sequence_string(),
            cleavage_type: format!("{}-{}", enzyme, hypothesis.termini(enzyme).as_str()),
            protein_ids: loci.join(","),
            flanking: hypothesis.flanking(),
            unshuffled_sequence: candidate.unshuffled_sequence().map(|s| s.to_string()),
            decoy: candidate.decoy(),
        }
    }

    pub fn from_collection(collection: &CandidateCollection, enzyme: Enzyme) -> Vec<Self> {
        collection
            .candidates()
            .iter()
            .map(|c| Self::from_candidate(c, collection, enzyme))
            .collect()
    }

    /// Protein ids with the location suffix removed.
    pub fn proteins(&self) -> Vec<&str> {
        self.protein_ids
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| match (s.rfind('('), s.ends_with(')')) {
                (Some(i), true) => &s[..i],
                _ => s,
            })
            .collect()
    }

    fn field(&self, column: TabColumn, precision: usize) -> String {
        if let Some(kind) = column.score_kind() {
            if column == TabColumn::DecoyXcorrQvalue && self.is_decoy() {
                return String::new();
            }
            return match self.scores.try_get(kind) {
                Some(v) if kind.is_negative_log() => format_float((-v as f64).exp(), precision),
                Some(v) => format_float(v as f64, precision),
                None => String::new(),
            };
        }
        if let Some(kind) = column.rank_kind() {
            return self
                .scores
                .rank(kind)
                .map(|r| r.to_string())
                .unwrap_or_default();
        }
        match column {
            TabColumn::Scan => self.scan.to_string(),
            TabColumn::Charge => self.charge.to_string(),
            TabColumn::PrecursorMz => format!("{:.4}", self.precursor_mz),
            TabColumn::NeutralMass => format!("{:.4}", self.neutral_mass),
            TabColumn::PeptideMass => format!("{:.6}", self.peptide_mass),
            TabColumn::DeltaCn => self
                .delta_cn
                .map(|x| format_float(x as f64, precision))
                .unwrap_or_default(),
            TabColumn::ByIonsMatched => self
                .by_ions_matched
                .map(|x| x.to_string())
                .unwrap_or_default(),
            TabColumn::ByIonsTotal => self.by_ions_total.to_string(),
            TabColumn::MatchesPerSpectrum => self.matches_per_spectrum.to_string(),
            TabColumn::Sequence => self.sequence.clone(),
            TabColumn::CleavageType => self.cleavage_type.clone(),
            TabColumn::ProteinId => self.protein_ids.clone(),
            TabColumn::FlankingAa => self.flanking.clone(),
            TabColumn::UnshuffledSequence => self.unshuffled_sequence.clone().unwrap_or_default(),
            TabColumn::DecoySet => self.decoy.set_index().to_string(),
            _ => String::new(),
        }
    }
}

impl RankedCandidate for ResultRecord {
    fn scan(&self) -> u32 {
        self.scan
    }

    fn charge(&self) -> u8 {
        self.charge
    }

    fn decoy(&self) -> DecoyMarking {
        self.decoy
    }

    fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    fn scores_mut(&mut self) -> &mut ScoreTable {
        &mut self.scores
    }
}

pub struct TabWriter<W: Write> {
    inner: csv::Writer<W>,
    precision: usize,
    num_written: usize,
}

impl TabWriter<std::fs::File> {
    pub fn from_path(path: impl AsRef<Path>, precision: usize) -> Result<Self, csv::Error> {
        let file = std::fs::File::create(path.as_ref())?;
        Self::new(file, precision)
    }
}

impl<W: Write> TabWriter<W> {
    /// Wraps `writer` and writes the header line.
    pub fn new(writer: W, precision: usize) -> Result<Self, csv::Error> {
        let mut inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);
        inner.write_record(TabColumn::ALL.iter().map(|c| c.header()))?;
        Ok(Self {
            inner,
            precision,
            num_written: 0,
        })
    }

    pub fn write_record(&mut self, record: &ResultRecord) -> Result<(), csv::Error> {
        self.inner.write_record(
            TabColumn::ALL
                .iter()
                .map(|c| record.field(*c, self.precision)),
        )?;
        self.num_written += 1;
        Ok(())
    }

    pub fn write_collection(
        &mut self,
        collection: &CandidateCollection,
        enzyme: Enzyme,
    ) -> Result<(), csv::Error> {
        for record in ResultRecord::from_collection(collection, enzyme) {
            self.write_record(&record)?;
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

    pub fn flush(&mut self) -> Result<(), csv::Error> {
        self.inner.flush()?;
        Ok(())
    }
}

fn parse_field<T: FromStr>(
    value: &str,
    column: TabColumn,
    expected: &'static str,
) -> Result<T, DataProcessingError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| DataProcessingError::Unparseable {
            value: value.to_string(),
            expected,
            context: format!("column '{}'", column.header()),
        })
}

fn parse_optional<T: FromStr>(
    value: &str,
    column: TabColumn,
    expected: &'static str,
) -> Result<Option<T>, DataProcessingError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_field(value, column, expected).map(Some)
    }
}

fn parse_row(
    row: &csv::StringRecord,
    positions: &[Option<usize>; 27],
) -> Result<ResultRecord, DataProcessingError> {
    // Columns are declared in file order.
    let get = |column: TabColumn| {
        positions[column as usize]
            .and_then(|p| row.get(p))
            .unwrap_or("")
    };

    let mut scores = ScoreTable::new();
    for column in TabColumn::ALL {
        if let Some(kind) = column.score_kind() {
            if let Some(v) = parse_optional::<f32>(get(column), column, "float")? {
                let stored = if kind.is_negative_log() { -v.ln() } else { v };
                scores.set(kind, stored);
            }
        }
    }
    for column in TabColumn::ALL {
        if let Some(kind) = column.rank_kind() {
            if let Some(r) = parse_optional::<u32>(get(column), column, "rank")? {
                if r > 0 {
                    scores.set_rank(kind, r);
                }
            }
        }
    }

    let non_empty = |column: TabColumn| Some(get(column)).filter(|v| !v.is_empty()).map(String::from);

    let sequence = get(TabColumn::Sequence);
    if sequence.is_empty() {
        return Err(DataProcessingError::ExpectedNonEmptyData {
            context: "sequence column".to_string(),
        });
    }

    let unshuffled_sequence = non_empty(TabColumn::UnshuffledSequence);
    // Files without a decoy set column hold at most one decoy set.
    let decoy_set =
        parse_optional::<u16>(get(TabColumn::DecoySet), TabColumn::DecoySet, "decoy set")?;
    let decoy = match decoy_set {
        Some(set) => DecoyMarking::for_set(set),
        None if unshuffled_sequence.is_some() => DecoyMarking::for_set(1),
        None => DecoyMarking::Target,
    };

    Ok(ResultRecord {
        scan: parse_field(get(TabColumn::Scan), TabColumn::Scan, "scan number")?,
        charge: parse_field(get(TabColumn::Charge), TabColumn::Charge, "charge")?,
        precursor_mz: parse_field(get(TabColumn::PrecursorMz), TabColumn::PrecursorMz, "float")?,
        neutral_mass: parse_field(get(TabColumn::NeutralMass), TabColumn::NeutralMass, "float")?,
        peptide_mass: parse_field(get(TabColumn::PeptideMass), TabColumn::PeptideMass, "float")?,
        delta_cn: parse_optional(get(TabColumn::DeltaCn), TabColumn::DeltaCn, "float")?,
        scores,
        by_ions_matched: parse_optional(
            get(TabColumn::ByIonsMatched),
            TabColumn::ByIonsMatched,
            "count",
        )?,
        by_ions_total: parse_optional(
            get(TabColumn::ByIonsTotal),
            TabColumn::ByIonsTotal,
            "count",
        )?
        .unwrap_or(0),
        matches_per_spectrum: parse_optional(
            get(TabColumn::MatchesPerSpectrum),
            TabColumn::MatchesPerSpectrum,
            "count",
        )?
        .unwrap_or(0),
        sequence: sequence.to_string(),
        cleavage_type: get(TabColumn::CleavageType).to_string(),
        protein_ids: get(TabColumn::ProteinId).to_string(),
        flanking: get(TabColumn::FlankingAa).to_string(),
        unshuffled_sequence,
        decoy,
    })
}

/// Reads result records back from a tab-delimited file.
///
/// A header missing any required column is an error. Rows that fail to
/// parse are logged and skipped.
pub fn read_results<R: Read>(reader: R) -> Result<Vec<ResultRecord>, LibraryReadingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut positions = [None; 27];
    for (slot, column) in positions.iter_mut().zip(TabColumn::ALL.iter()) {
        *slot = headers.iter().position(|h| h.trim() == column.header());
        if slot.is_none() && column.is_required() {
            return Err(LibraryReadingError::MissingColumn(column.header()));
        }
    }

    let mut out = Vec::new();
    let mut skipped = 0;
    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        match parse_row(&row, &positions) {
            Ok(record) => out.push(record),
            Err(e) => {
                skipped += 1;
                warn!(
                    "Skipping result line {}: {}",
                    i + 2,
                    e.append_to_context(" while reading results")
                );
            }
        }
    }
    info!("Read {} result records ({} skipped)", out.len(), skipped);
    Ok(out)
}

pub fn read_results_file(path: impl AsRef<Path>) -> Result<Vec<ResultRecord>, LibraryReadingError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| LibraryReadingError::FileReading {
        source: e,
        context: "tab-delimited results",
        path: path.to_path_buf(),
    })?;
    read_results(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoy::{
        DecoyShuffleConfig,
        ShuffleStream,
    };
    use crate::models::{
        CandidateHypothesis,
        DecoyMarking,
        IonMatchCounts,
        Peptide,
        ProteinLocus,
        SpectrumInfo,
    };
    use std::sync::Arc;

    fn scored_collection() -> CandidateCollection {
        let spectrum = Arc::new(SpectrumInfo::new(1201, 523.774_12, vec![2]));
        let make = |seq: &str, start: usize| {
            Arc::new(
                Peptide::new(
                    seq,
                    vec![ProteinLocus {
                        protein_id: "sp|P02769|ALBU_BOVIN".into(),
                        start,
                    }],
                    b'K',
                    b'A',
                )
                .unwrap(),
            )
        };
        let mut candidates = vec![
            Candidate::new(
                spectrum.clone(),
                CandidateHypothesis::Linear(make("LVNELTEFAK", 65)),
                2,
            ),
            Candidate::new(
                spectrum.clone(),
                CandidateHypothesis::Linear(make("AEFVEVTK", 248)),
                2,
            ),
        ];
        candidates[0].scores.set(ScoreKind::Sp, 312.25);
        candidates[0].scores.set(ScoreKind::XCorr, 3.141_592_7);
        candidates[0].scores.set(ScoreKind::LogPBonfWeibullXcorr, 4.5);
        candidates[0].ion_matches = Some(IonMatchCounts {
            matched: 11,
            total: 18,
        });
        candidates[1].scores.set(ScoreKind::Sp, 150.0);
        candidates[1].scores.set(ScoreKind::XCorr, 1.234_567_8);
        candidates[1].scores.set(ScoreKind::LogPBonfWeibullXcorr, 0.75);
        // Set but never computed for the collection, so it is not written.
        candidates[1].scores.set(ScoreKind::QrankerScore, 9.0);

        let mut col = CandidateCollection::new(spectrum, 2, DecoyMarking::Target, candidates);
        col.rank_by(ScoreKind::Sp);
        col.rank_by(ScoreKind::XCorr);
        col.rank_by(ScoreKind::LogPBonfWeibullXcorr);
        col.compute_delta_cn(ScoreKind::XCorr);
        col
    }

    fn write_all(records: &[ResultRecord]) -> String {
        let mut writer = TabWriter::new(Vec::new(), DEFAULT_PRECISION).unwrap();
        for r in records {
            writer.write_record(r).unwrap();
        }
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    fn close(a: Option<f32>, b: Option<f32>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => (a - b).abs() <= 1e-6 * a.abs().max(1.0),
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_round_trip_preserves_scores_and_ranks() {
        let col = scored_collection();
        let records = ResultRecord::from_collection(&col, Enzyme::Trypsin);
        assert!(records[1].scores.try_get(ScoreKind::QrankerScore).is_none());

        let text = write_all(&records);
        let parsed = read_results(text.as_bytes()).unwrap();
        assert_eq!(parsed.len(), records.len());
        for (a, b) in records.iter().zip(parsed.iter()) {
            assert_eq!(a.scan, b.scan);
            assert_eq!(a.charge, b.charge);
            assert_eq!(a.sequence, b.sequence);
            assert_eq!(a.protein_ids, b.protein_ids);
            assert_eq!(a.unshuffled_sequence, b.unshuffled_sequence);
            assert!(close(a.delta_cn, b.delta_cn));
            for kind in ScoreKind::ALL {
                assert!(
                    close(a.scores.try_get(kind), b.scores.try_get(kind)),
                    "{} differs",
                    kind
                );
            }
            for kind in [ScoreKind::Sp, ScoreKind::XCorr] {
                assert_eq!(a.scores.rank(kind), b.scores.rank(kind));
            }
        }
    }

    #[test]
    fn test_written_fields() {
        let col = scored_collection();
        let records = ResultRecord::from_collection(&col, Enzyme::Trypsin);
        let text = write_all(&records);
        let mut lines = text.lines();
        let header: Vec<&str> = lines.next().unwrap().split('\t').collect();
        assert_eq!(header.len(), 27);
        assert_eq!(header[0], "scan");
        assert_eq!(header[25], "unshuffled sequence");
        assert_eq!(header[26], "decoy set");

        let first: Vec<&str> = lines.next().unwrap().split('\t').collect();
        assert_eq!(first[0], "1201");
        assert_eq!(first[5], "0");
        assert_eq!(first[6], "312.25");
        assert_eq!(first[7], "1");
        // p-value column holds exp(-score)
        assert_eq!(first[10], format_float((-4.5f64).exp(), DEFAULT_PRECISION));
        assert_eq!(first[16], "");
        assert_eq!(first[18], "11");
        assert_eq!(first[19], "18");
        assert_eq!(first[20], "2");
        assert_eq!(first[21], "LVNELTEFAK");
        assert_eq!(first[22], "trypsin-full");
        assert_eq!(first[23], "sp|P02769|ALBU_BOVIN(66)");
        assert_eq!(first[24], "KA");
        assert_eq!(first[25], "");
        assert_eq!(first[26], "0");
        assert_eq!(records[0].proteins(), vec!["sp|P02769|ALBU_BOVIN"]);
    }

    #[test]
    fn test_decoys_marked_by_unshuffled_sequence() {
        let col = scored_collection();
        let mut stream = ShuffleStream::from_seed(5);
        let decoy = col.candidates()[0].to_decoy(1, &DecoyShuffleConfig::default(), &mut stream);
        let record = ResultRecord::from_candidate(&decoy, &col, Enzyme::Trypsin);
        assert!(record.is_decoy());
        assert_eq!(record.unshuffled_sequence.as_deref(), Some("LVNELTEFAK"));
        let parsed = read_results(write_all(&[record]).as_bytes()).unwrap();
        assert!(parsed[0].is_decoy());
        assert_eq!(parsed[0].decoy, DecoyMarking::for_set(1));
    }

    #[test]
    fn test_decoy_sets_survive_round_trip() {
        use crate::ranking::{
            by_candidate_set,
            rank_by,
        };

        let col = scored_collection();
        let mut records = Vec::new();
        for set in [1, 2] {
            let mut stream = ShuffleStream::from_seed(set as u64);
            let decoy =
                col.candidates()[0].to_decoy(set, &DecoyShuffleConfig::default(), &mut stream);
            let spectrum = Arc::new(SpectrumInfo::new(1201, 523.774_12, vec![2]));
            let mut decoy_col =
                CandidateCollection::new(spectrum, 2, DecoyMarking::for_set(set), vec![decoy]);
            decoy_col.score_with(ScoreKind::XCorr, |_| Some(1.5));
            decoy_col.rank_by(ScoreKind::XCorr);
            records.extend(ResultRecord::from_collection(&decoy_col, Enzyme::Trypsin));
        }

        let mut parsed = read_results(write_all(&records).as_bytes()).unwrap();
        let sets: Vec<u16> = parsed.iter().map(|r| r.decoy.set_index()).collect();
        assert_eq!(sets, vec![1, 2]);

        parsed.sort_by(by_candidate_set);
        for group in parsed.chunk_by_mut(|a, b| by_candidate_set(a, b).is_eq()) {
            rank_by(group, ScoreKind::XCorr);
        }
        let ranks: Vec<Option<u32>> = parsed
            .iter()
            .map(|r| r.scores.rank(ScoreKind::XCorr))
            .collect();
        assert_eq!(ranks, vec![Some(1), Some(1)]);
    }

    #[test]
    fn test_files_without_decoy_set_column() {
        let col = scored_collection();
        let records = ResultRecord::from_collection(&col, Enzyme::Trypsin);
        let text: String = write_all(&records)
            .lines()
            .map(|line| {
                let mut fields: Vec<&str> = line.split('\t').collect();
                fields.pop();
                fields.join("\t") + "\n"
            })
            .collect();
        let parsed = read_results(text.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|r| r.decoy == DecoyMarking::Target));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let text = "scan\tcharge\n1\t2\n";
        let err = read_results(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LibraryReadingError::MissingColumn("spectrum precursor m/z")
        ));
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let col = scored_collection();
        let records = ResultRecord::from_collection(&col, Enzyme::Trypsin);
        let text = write_all(&records);
        let mut lines: Vec<String> = text.lines().map(|s| s.to_string()).collect();
        lines[1] = lines[1].replacen("1201", "scan?", 1);
        let parsed = read_results(lines.join("\n").as_bytes()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].sequence, "AEFVEVTK");
    }
}
