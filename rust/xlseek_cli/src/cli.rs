use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;
use xlseek::ScoreKind;
use xlseek::ranking::SortMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate target and decoy candidates for every spectrum.
    Enumerate(EnumerateArgs),
    /// Re-rank, truncate and sort a tab-delimited result file.
    Rerank(RerankArgs),
    /// Write template configuration files.
    WriteTemplate(WriteTemplateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct EnumerateArgs {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Path to the ndjson spectra file (will over-write the config file)
    #[arg(short, long)]
    pub spectra: Option<PathBuf>,

    /// Path to the output directory (will over-write the config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct RerankArgs {
    /// Tab-delimited result file to re-rank.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Score used to rank candidates within each spectrum.
    #[arg(long, default_value = "xcorr")]
    pub rank_by: ScoreKind,

    /// Keep only candidates ranked at or above this rank.
    #[arg(long, default_value_t = 5)]
    pub max_rank: u32,

    /// Order of the written results.
    #[arg(long, default_value = "xcorr")]
    pub sort_mode: SortMode,

    /// Estimate target-decoy q-values from the best match of each spectrum.
    #[arg(long)]
    pub assign_qvalues: bool,

    /// Significant digits of score fields.
    #[arg(long, default_value_t = xlseek::output::DEFAULT_PRECISION)]
    pub precision: usize,

    /// Path to the output directory.
    #[arg(short, long)]
    pub output_dir: PathBuf,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output files.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
