use crate::errors::LibraryReadingError;
use crate::models::{
    Peptide,
    ProteinLocus,
    SpectrumInfo,
};
use serde::de::DeserializeOwned;
use serde::{
    Deserialize,
    Serialize,
};
use std::io::{
    BufRead,
    BufReader,
};
use std::marker::PhantomData;
use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    info,
    warn,
};

/// Streams one JSON document per line, skipping blank lines.
pub struct NdJsonReader<R: BufRead, T> {
    reader: R,
    line_number: usize,
    _marker: PhantomData<T>,
}

impl<R: BufRead, T: DeserializeOwned> NdJsonReader<R, T> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            _marker: PhantomData,
        }
    }
}

impl<R: BufRead, T: DeserializeOwned> Iterator for NdJsonReader<R, T> {
    type Item = Result<T, LibraryReadingError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            self.line_number += 1;
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    return Some(serde_json::from_str(&line).map_err(|e| {
                        LibraryReadingError::JsonParsing {
                            source: e,
                            context: format!("NDJSON line {}", self.line_number),
                        }
                    }));
                }
                Err(e) => {
                    return Some(Err(LibraryReadingError::FileReading {
                        source: e,
                        context: "Error reading line",
                        path: PathBuf::new(),
                    }));
                }
            }
        }
    }
}

fn open(path: &Path, context: &'static str) -> Result<BufReader<std::fs::File>, LibraryReadingError> {
    let file = std::fs::File::open(path).map_err(|e| LibraryReadingError::FileReading {
        source: e,
        context,
        path: PathBuf::from(path),
    })?;
    Ok(BufReader::new(file))
}

/// Reads spectra, skipping (and logging) records that fail to parse or are
/// malformed.
pub fn read_spectra(path: &Path) -> Result<Vec<SpectrumInfo>, LibraryReadingError> {
    let reader = open(path, "spectra")?;
    Ok(collect_spectra(reader))
}

pub(crate) fn collect_spectra<R: BufRead>(reader: R) -> Vec<SpectrumInfo> {
    let mut skipped = 0;
    let spectra: Vec<SpectrumInfo> = NdJsonReader::<_, SpectrumInfo>::new(reader)
        .filter_map(|x| match x.map(|s| s.validate().map(|_| s)) {
            Ok(Ok(s)) => Some(s),
            Ok(Err(e)) => {
                warn!("Skipping malformed spectrum: {}", e);
                skipped += 1;
                None
            }
            Err(e) => {
                warn!("Skipping unreadable spectrum record: {}", e);
                skipped += 1;
                None
            }
        })
        .collect();
    info!("Read {} spectra ({} skipped)", spectra.len(), skipped);
    spectra
}

/// One peptide of a pre-digested peptide list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeptideEntry {
    /// Sequence, optionally with bracketed modification masses.
    pub sequence: String,
    #[serde(default)]
    pub proteins: Vec<String>,
    #[serde(default = "terminal_flank")]
    pub n_flank: char,
    #[serde(default = "terminal_flank")]
    pub c_flank: char,
}

fn terminal_flank() -> char {
    '-'
}

impl PeptideEntry {
    pub fn sample() -> Self {
        Self {
            sequence: "PEPT[79.9663]IDEK".to_string(),
            proteins: vec!["sp|P00001|EXAMPLE".to_string()],
            n_flank: 'K',
            c_flank: 'A',
        }
    }

    pub fn into_peptide(self) -> Result<Peptide, crate::errors::DataProcessingError> {
        let loci = self
            .proteins
            .iter()
            .map(|p| ProteinLocus {
                protein_id: p.as_str().into(),
                start: 0,
            })
            .collect();
        Peptide::from_modified_sequence(
            &self.sequence,
            loci,
            self.n_flank as u8,
            self.c_flank as u8,
        )
    }
}

pub fn read_peptide_list(path: &Path) -> Result<Vec<Peptide>, LibraryReadingError> {
    let reader = open(path, "peptide list")?;
    Ok(collect_peptides(reader))
}

pub(crate) fn collect_peptides<R: BufRead>(reader: R) -> Vec<Peptide> {
    let mut skipped = 0;
    let peptides: Vec<Peptide> = NdJsonReader::<_, PeptideEntry>::new(reader)
        .filter_map(|x| {
            let parsed = match x {
                Ok(entry) => entry.into_peptide().map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            parsed
                .inspect_err(|e| {
                    warn!("Skipping peptide entry: {}", e);
                    skipped += 1;
                })
                .ok()
        })
        .collect();
    info!("Read {} peptides ({} skipped)", peptides.len(), skipped);
    peptides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_spectra_skips_malformed() {
        let data = r#"{"scan": 1, "precursor_mz": 500.5, "charges": [2, 3]}

{"scan": 2, "precursor_mz": 400.0, "charges": []}
not json
{"scan": 3, "precursor_mz": 650.25, "charges": [2]}
"#;
        let spectra = collect_spectra(data.as_bytes());
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].scan, 1);
        assert_eq!(spectra[0].charges, vec![2, 3]);
        assert_eq!(spectra[1].scan, 3);
    }

    #[test]
    fn test_collect_peptides() {
        let sample = serde_json::to_string(&PeptideEntry::sample()).unwrap();
        let data = format!("{}\n{{\"sequence\": \"PEPXIDE\"}}\n{{\"sequence\": \"AAK\"}}\n", sample);
        let peptides = collect_peptides(data.as_bytes());
        assert_eq!(peptides.len(), 2);
        assert_eq!(peptides[0].sequence(), "PEPTIDEK");
        assert_eq!(peptides[0].protein_ids().collect::<Vec<_>>(), vec!["sp|P00001|EXAMPLE"]);
        assert!(peptides[1].is_protein_n_term());
    }
}
