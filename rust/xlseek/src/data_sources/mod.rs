pub mod fasta;
pub mod ndjson;
pub mod peptide_db;

pub use fasta::{
    ProteinSequence,
    ProteinSequenceCollection,
};
pub use ndjson::{
    NdJsonReader,
    PeptideEntry,
    read_peptide_list,
    read_spectra,
};
pub use peptide_db::PeptideDatabase;
