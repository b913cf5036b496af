use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{
    info,
    instrument,
};

use xlseek::chemistry::Enzyme;
use xlseek::data_sources::{
    PeptideDatabase,
    ProteinSequenceCollection,
    read_peptide_list,
    read_spectra,
};
use xlseek::output::{
    PinWriter,
    ResultRecord,
    SqtWriter,
    TabWriter,
    read_results_file,
};
use xlseek::ranking::{
    RankedCandidate,
    assign_decoy_qvalues,
    by_candidate_set,
    rank_by,
    sort_candidates,
    truncate,
};
use xlseek::search::{
    CandidateSource,
    Searcher,
};
use xlseek::xlink::{
    BondMap,
    LinkablePool,
};
use xlseek::{
    CandidateCollection,
    ScoreKind,
    SpectrumInfo,
    XlSeekError,
};

use crate::cli::{
    EnumerateArgs,
    RerankArgs,
    WriteTemplateArgs,
};
use crate::config::{
    Config,
    InputConfig,
    OutputConfig,
};
use crate::errors::CliError;

/// Tab plus optional SQT and percolator sinks for one of the target or
/// decoy outputs.
struct ResultSink {
    tab: TabWriter<BufWriter<File>>,
    sqt: Option<SqtWriter<BufWriter<File>>>,
    pin: Option<PinWriter<BufWriter<File>>>,
}

impl ResultSink {
    fn create(dir: &Path, stem: &str, output: &OutputConfig) -> Result<Self, CliError> {
        let tab_path = dir.join(format!("{}.txt", stem));
        let tab_file = File::create(&tab_path).map_err(|e| CliError::io_at(e, &tab_path))?;
        let tab = TabWriter::new(BufWriter::new(tab_file), output.precision)
            .map_err(XlSeekError::from)?;
        let sqt = if output.sqt {
            let sqt_path = dir.join(format!("{}.sqt", stem));
            let sqt_file = File::create(&sqt_path).map_err(|e| CliError::io_at(e, &sqt_path))?;
            Some(SqtWriter::new(BufWriter::new(sqt_file), output.precision))
        } else {
            None
        };
        Ok(Self {
            tab,
            sqt,
            pin: None,
        })
    }

    fn with_pin(
        mut self,
        dir: &Path,
        stem: &str,
        enzyme: Enzyme,
        precision: usize,
    ) -> Result<Self, CliError> {
        let pin_path = dir.join(format!("{}.pin", stem));
        let pin_file = File::create(&pin_path).map_err(|e| CliError::io_at(e, &pin_path))?;
        let pin = PinWriter::new(BufWriter::new(pin_file), enzyme, precision)
            .map_err(XlSeekError::from)?;
        self.pin = Some(pin);
        Ok(self)
    }

    fn write_collection(
        &mut self,
        collection: &CandidateCollection,
        enzyme: Enzyme,
    ) -> Result<(), CliError> {
        self.write_group(&ResultRecord::from_collection(collection, enzyme))?;
        if let Some(pin) = self.pin.as_mut() {
            pin.write_collection(collection).map_err(XlSeekError::from)?;
        }
        Ok(())
    }

    fn write_group(&mut self, records: &[ResultRecord]) -> Result<(), CliError> {
        for record in records {
            self.tab.write_record(record).map_err(XlSeekError::from)?;
        }
        if let Some(sqt) = self.sqt.as_mut() {
            sqt.write_spectrum(records)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<usize, CliError> {
        let n = self.tab.num_written();
        self.tab.into_inner().map_err(XlSeekError::from)?;
        if let Some(sqt) = self.sqt {
            sqt.into_inner()?;
        }
        if let Some(pin) = self.pin {
            pin.into_inner().map_err(XlSeekError::from)?;
        }
        Ok(n)
    }
}

fn load_peptides(input: &InputConfig) -> Result<(PeptideDatabase, Enzyme), CliError> {
    match input {
        InputConfig::Fasta { path, digestion } => {
            info!("Digesting proteins from {}", path.display());
            let proteins = ProteinSequenceCollection::from_fasta_file(path)
                .map_err(|e| CliError::io_at(e, path))?;
            let db = PeptideDatabase::from_proteins(&proteins.id_sequence_pairs(), digestion);
            Ok((db, digestion.enzyme))
        }
        InputConfig::Peptides { path } => {
            info!("Reading peptide list from {}", path.display());
            let peptides = read_peptide_list(path)?;
            Ok((PeptideDatabase::new(peptides), Enzyme::default()))
        }
    }
}

/// Main function for the 'enumerate' subcommand.
#[instrument(skip_all)]
pub fn main_enumerate(args: EnumerateArgs) -> Result<(), CliError> {
    let config = Config::from_file(&args.config)?.with_cli_args(&args)?;
    info!("Parsed configuration: {:#?}", config);
    let (Some(input), Some(spectra_path), Some(output)) = (
        config.input.as_ref(),
        config.analysis.spectra.as_ref(),
        config.output.as_ref(),
    ) else {
        return Err(CliError::Config("Incomplete configuration".to_string()));
    };
    std::fs::create_dir_all(&output.directory)
        .map_err(|e| CliError::io_at(e, &output.directory))?;

    let params = &config.analysis.search;
    let (db, digestion_enzyme) = load_peptides(input)?;
    if digestion_enzyme != params.enzyme {
        info!(
            "Digestion used {} while candidates are judged with {}",
            digestion_enzyme, params.enzyme
        );
    }

    let bonds_and_pool = match &config.analysis.cross_link {
        Some(xl) => {
            let bonds: BondMap = xl
                .bonds
                .parse()
                .map_err(|e| CliError::Config(format!("Invalid bonds '{}': {}", xl.bonds, e)))?;
            let pool = LinkablePool::from_peptides(db.peptides(), &bonds, params.enzyme);
            Some((bonds, pool, xl.linker_mass))
        }
        None => None,
    };
    let source = match &bonds_and_pool {
        Some((bonds, pool, linker_mass)) => CandidateSource::CrossLinked {
            pool,
            oracle: bonds,
            linker_mass: *linker_mass,
        },
        None => CandidateSource::Linear(&db),
    };
    let searcher = Searcher::new(source, params);

    let spectra: Vec<Arc<SpectrumInfo>> = read_spectra(spectra_path)?
        .into_iter()
        .map(Arc::new)
        .collect();

    let mut targets = ResultSink::create(&output.directory, "candidates.target", output)?;
    let mut decoys = ResultSink::create(&output.directory, "candidates.decoy", output)?;
    if output.percolator {
        targets = targets.with_pin(
            &output.directory,
            "candidates.target",
            params.enzyme,
            output.precision,
        )?;
        decoys = decoys.with_pin(
            &output.directory,
            "candidates.decoy",
            params.enzyme,
            output.precision,
        )?;
    }

    let start = Instant::now();
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map_err(|e| CliError::Config(e.to_string()))?;
    let chunk_size = config.analysis.chunk_size;
    for (chunk_idx, chunk) in spectra
        .chunks(chunk_size)
        .enumerate()
        .progress_with_style(style)
    {
        let collections = searcher.search_all(chunk, chunk_idx * chunk_size, None);
        for collection in &collections {
            if collection.decoy().is_decoy() {
                decoys.write_collection(collection, params.enzyme)?;
            } else {
                targets.write_collection(collection, params.enzyme)?;
            }
        }
    }

    let n_targets = targets.finish()?;
    let n_decoys = decoys.finish()?;
    info!(
        "Wrote {} target and {} decoy candidates for {} spectra in {:?}",
        n_targets,
        n_decoys,
        spectra.len(),
        start.elapsed()
    );
    Ok(())
}

fn qvalue_kind_for(kind: ScoreKind) -> Result<ScoreKind, CliError> {
    match kind {
        ScoreKind::XCorr => Ok(ScoreKind::DecoyXcorrQvalue),
        ScoreKind::LogPBonfWeibullXcorr => Ok(ScoreKind::DecoyPvalueQvalue),
        other => Err(CliError::Config(format!(
            "Decoy q-values need ranking by xcorr or p-value, not {}",
            other
        ))),
    }
}

/// Main function for the 'rerank' subcommand.
#[instrument(skip_all)]
pub fn main_rerank(args: RerankArgs) -> Result<(), CliError> {
    // Unimplemented sort modes fail before any work is done.
    args.sort_mode.comparator::<ResultRecord>()?;
    let qvalue_kind = if args.assign_qvalues {
        Some(qvalue_kind_for(args.rank_by)?)
    } else {
        None
    };

    let mut records = read_results_file(&args.input)?;
    let n_read = records.len();

    // Targets and each decoy set of a spectrum are ranked separately.
    records.sort_by(by_candidate_set);
    let mut n_groups = 0;
    for group in records.chunk_by_mut(|a, b| by_candidate_set(a, b).is_eq()) {
        rank_by(group, args.rank_by);
        n_groups += 1;
    }
    truncate(&mut records, args.rank_by, args.max_rank);
    info!(
        "Kept {} of {} records over {} groups at {} rank {}",
        records.len(),
        n_read,
        n_groups,
        args.rank_by,
        args.max_rank
    );

    if let Some(qvalue_kind) = qvalue_kind {
        assign_decoy_qvalues(&mut records, args.rank_by, qvalue_kind);
    }
    sort_candidates(&mut records, args.sort_mode)?;

    std::fs::create_dir_all(&args.output_dir).map_err(|e| CliError::io_at(e, &args.output_dir))?;
    let output = OutputConfig {
        directory: args.output_dir.clone(),
        sqt: true,
        percolator: false,
        precision: args.precision,
    };
    let mut targets = ResultSink::create(&output.directory, "rerank.target", &output)?;
    let mut decoys = ResultSink::create(&output.directory, "rerank.decoy", &output)?;
    let (mut decoy_records, target_records): (Vec<_>, Vec<_>) =
        records.into_iter().partition(|r| r.is_decoy());
    // Stable, so the requested order holds within each decoy set.
    decoy_records.sort_by(by_candidate_set);
    for group in target_records.chunk_by(|a, b| by_candidate_set(a, b).is_eq()) {
        targets.write_group(group)?;
    }
    for group in decoy_records.chunk_by(|a, b| by_candidate_set(a, b).is_eq()) {
        decoys.write_group(group)?;
    }
    let n_targets = targets.finish()?;
    let n_decoys = decoys.finish()?;
    info!(
        "Wrote {} target and {} decoy records to {}",
        n_targets,
        n_decoys,
        output.directory.display()
    );
    Ok(())
}

/// Main function for the 'write-template' subcommand.
pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let output_path = args.output_path;
    std::fs::create_dir_all(&output_path).map_err(|e| CliError::io_at(e, &output_path))?;
    let template = Config::template();
    let config_path = output_path.join("xlseek_config.json");
    let file = File::create(&config_path).map_err(|e| CliError::io_at(e, &config_path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &template)?;
    info!("Wrote template config to {}", config_path.display());
    Ok(())
}
