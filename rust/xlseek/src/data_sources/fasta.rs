use std::io::{
    BufRead,
    BufReader,
};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinSequence {
    /// First whitespace-delimited token of the header line.
    pub id: Arc<str>,
    pub description: String,
    pub sequence: Arc<str>,
}

#[derive(Debug, Clone, Default)]
pub struct ProteinSequenceCollection {
    pub sequences: Vec<ProteinSequence>,
}

impl ProteinSequenceCollection {
    pub fn from_fasta_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut sequences = Vec::new();
        let mut header: Option<(String, String)> = None;
        let mut residues = String::new();

        let mut flush = |header: Option<(String, String)>, residues: &mut String| {
            if let Some((id, description)) = header {
                if !residues.is_empty() {
                    sequences.push(ProteinSequence {
                        id: id.into(),
                        description,
                        sequence: residues.as_str().into(),
                    });
                }
            }
            residues.clear();
        };

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if let Some(rest) = line.strip_prefix('>') {
                flush(header.take(), &mut residues);
                let (id, description) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                header = Some((id.to_string(), description.trim().to_string()));
            } else if !line.starts_with(';') {
                residues.extend(
                    line.chars()
                        .filter(|c| c.is_ascii_alphabetic())
                        .map(|c| c.to_ascii_uppercase()),
                );
            }
        }
        flush(header.take(), &mut residues);
        Ok(Self { sequences })
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn id_sequence_pairs(&self) -> Vec<(Arc<str>, Arc<str>)> {
        self.sequences
            .iter()
            .map(|p| (p.id.clone(), p.sequence.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fasta() {
        let data = ">sp|P1|ONE first protein\nMAAK\nggr\n;comment\n>sp|P2|TWO\nPEPTIDEK\n>empty\n";
        let proteins = ProteinSequenceCollection::from_reader(data.as_bytes()).unwrap();
        assert_eq!(proteins.len(), 2);
        assert_eq!(proteins.sequences[0].id.as_ref(), "sp|P1|ONE");
        assert_eq!(proteins.sequences[0].description, "first protein");
        assert_eq!(proteins.sequences[0].sequence.as_ref(), "MAAKGGR");
        assert_eq!(proteins.sequences[1].sequence.as_ref(), "PEPTIDEK");
    }
}
