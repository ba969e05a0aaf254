use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ScoutError, ScoutResult};
use crate::search::SearchCriteria;

/// Default number of pages per segment
pub const DEFAULT_PAGES_PER_SPLIT: usize = 10;
/// Default size of the matching worker pool
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Configuration for one split/search/filter run.
///
/// # Configuration Locations
///
/// Values are read from the following files, later ones taking precedence:
/// 1. Global `$HOME/.config/pagescout/config.yaml`
/// 2. Local `.pagescout.yaml` in the current directory
/// 3. Custom config file specified via `--config`
///
/// Command-line values are applied on top with [`ScoutConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Source document
/// input_path: "rolls/ward-12.pdf"
///
/// # Where part_<n>.pdf files are written
/// output_dir: "output"
///
/// # Strings that must all appear on one line
/// criteria:
///   - "JOHN SMITH"
///   - "MARY"
///
/// # Uppercase the criteria before searching
/// uppercase: true
///
/// pages_per_split: 10
/// worker_count: 4
/// report_path: "output.txt"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoutConfig {
    /// The PDF to split
    #[serde(default)]
    pub input_path: PathBuf,

    /// Directory that receives the segment files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Search strings; empty entries are ignored
    #[serde(default)]
    pub criteria: Vec<String>,

    /// Convert the criteria to uppercase before matching
    #[serde(default)]
    pub uppercase: bool,

    /// Maximum number of pages in a segment
    #[serde(default = "default_pages_per_split")]
    pub pages_per_split: NonZeroUsize,

    /// Number of segments searched concurrently
    #[serde(default = "default_worker_count")]
    pub worker_count: NonZeroUsize,

    /// The match report, truncated at the start of every run
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values supplied on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub criteria: Vec<String>,
    pub uppercase: bool,
    pub pages_per_split: Option<NonZeroUsize>,
    pub worker_count: Option<NonZeroUsize>,
    pub report_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_pages_per_split() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PAGES_PER_SPLIT).unwrap_or(NonZeroUsize::MIN)
}

fn default_worker_count() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_WORKER_COUNT).unwrap_or(NonZeroUsize::MIN)
}

fn default_report_path() -> PathBuf {
    PathBuf::from("output.txt")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_dir: default_output_dir(),
            criteria: Vec::new(),
            uppercase: false,
            pages_per_split: default_pages_per_split(),
            worker_count: default_worker_count(),
            report_path: default_report_path(),
            log_level: default_log_level(),
        }
    }
}

impl ScoutConfig {
    /// Creates a configuration with defaults for everything but the inputs
    pub fn new(input_path: impl Into<PathBuf>, criteria: Vec<String>) -> Self {
        Self {
            input_path: input_path.into(),
            criteria,
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations, plus `config_path`
    /// when given
    pub fn load_from(config_path: Option<&Path>) -> ScoutResult<Self> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ScoutError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }

        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("pagescout/config.yaml")),
            // Local config
            Some(PathBuf::from(".pagescout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                debug!("Reading config file {}", path.display());
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| ScoutError::config_error(e.to_string()))
    }

    /// Merges command-line values over file values
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if let Some(input_path) = cli.input_path {
            self.input_path = input_path;
        }
        if let Some(output_dir) = cli.output_dir {
            self.output_dir = output_dir;
        }
        if !cli.criteria.is_empty() {
            self.criteria = cli.criteria;
        }
        if cli.uppercase {
            self.uppercase = true;
        }
        if let Some(pages) = cli.pages_per_split {
            self.pages_per_split = pages;
        }
        if let Some(workers) = cli.worker_count {
            self.worker_count = workers;
        }
        if let Some(report_path) = cli.report_path {
            self.report_path = report_path;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Builds the search criteria, uppercasing first when configured
    pub fn search_criteria(&self) -> ScoutResult<SearchCriteria> {
        if self.uppercase {
            SearchCriteria::new(self.criteria.iter().map(|c| c.to_uppercase()))
        } else {
            SearchCriteria::new(self.criteria.iter().cloned())
        }
    }

    /// Checks everything that can be checked before the run touches disk
    pub fn validate(&self) -> ScoutResult<SearchCriteria> {
        if self.input_path.as_os_str().is_empty() || !self.input_path.is_file() {
            return Err(ScoutError::input_not_found(&self.input_path));
        }

        let criteria = self.search_criteria()?;

        let cpus = num_cpus::get();
        if self.worker_count.get() > cpus {
            warn!(
                "worker_count {} exceeds the {} available CPUs",
                self.worker_count, cpus
            );
        }
        Ok(criteria)
    }
}
