use serde::{
    Deserialize,
    Serialize,
};
use std::path::PathBuf;
use xlseek::models::DigestionParameters;
use xlseek::output::DEFAULT_PRECISION;
use xlseek::search::SearchParameters;

use crate::cli::EnumerateArgs;
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    pub analysis: AnalysisConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum InputConfig {
    #[serde(rename = "fasta")]
    Fasta {
        path: PathBuf,
        #[serde(default)]
        digestion: DigestionParameters,
    },
    /// ndjson list of pre-digested peptides.
    #[serde(rename = "peptides")]
    Peptides { path: PathBuf },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub spectra: Option<PathBuf>,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub search: SearchParameters,
    /// Cross-linked search when present, linear search otherwise.
    #[serde(default)]
    pub cross_link: Option<CrossLinkConfig>,
}

fn default_chunk_size() -> usize {
    1000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CrossLinkConfig {
    /// Bondable residue pairs, e.g. `"K:K,K:nterm"`.
    pub bonds: String,
    pub linker_mass: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
    #[serde(default)]
    pub sqt: bool,
    /// Also write percolator input next to the tab files.
    #[serde(default)]
    pub percolator: bool,
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

impl Config {
    pub fn template() -> Self {
        Self {
            input: Some(InputConfig::Fasta {
                path: PathBuf::from("proteins.fasta"),
                digestion: DigestionParameters::default(),
            }),
            analysis: AnalysisConfig {
                spectra: Some(PathBuf::from("spectra.ndjson")),
                chunk_size: default_chunk_size(),
                search: SearchParameters::default(),
                cross_link: Some(CrossLinkConfig {
                    bonds: "K:K,K:nterm".to_string(),
                    linker_mass: 138.068_08,
                }),
            },
            output: Some(OutputConfig {
                directory: PathBuf::from("xlseek_results"),
                sqt: true,
                percolator: true,
                precision: DEFAULT_PRECISION,
            }),
        }
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|e| CliError::io_at(e, path))?;
        let config: Config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Command line values take precedence over the file. Fails when the
    /// merged configuration lacks an input, spectra or output directory.
    pub fn with_cli_args(mut self, args: &EnumerateArgs) -> Result<Self, CliError> {
        if let Some(spectra) = &args.spectra {
            self.analysis.spectra = Some(spectra.clone());
        }
        if let Some(output_dir) = &args.output_dir {
            match self.output.as_mut() {
                Some(out) => out.directory = output_dir.clone(),
                None => {
                    self.output = Some(OutputConfig {
                        directory: output_dir.clone(),
                        sqt: false,
                        percolator: false,
                        precision: DEFAULT_PRECISION,
                    })
                }
            }
        }
        if self.input.is_none() {
            return Err(CliError::Config(
                "No input provided, please provide one in the config file".to_string(),
            ));
        }
        if self.analysis.spectra.is_none() {
            return Err(CliError::Config(
                "No spectra provided, please provide them in either the config file or with the --spectra flag".to_string(),
            ));
        }
        if self.output.is_none() {
            return Err(CliError::Config(
                "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
            ));
        }
        if self.analysis.chunk_size == 0 {
            return Err(CliError::Config("chunk_size must be positive".to_string()));
        }
        Ok(self)
    }
}
