use clap::Parser;
use colored::Colorize;
use pagescout::{
    config::ConfigOverrides, results::RunSummary, run, splitter::Segment, ScoutConfig,
    ScoutError, StatusReporter,
};
use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ScoutError>;

/// Split a PDF into page-range segments and keep only the segments with a
/// line containing every search text
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The PDF file to split
    input: Option<PathBuf>,

    /// Text that must appear on the matching line (can be specified multiple times)
    #[arg(short = 't', long = "text")]
    texts: Vec<String>,

    /// Directory for the part_<n>.pdf segments
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Number of pages per segment
    #[arg(short = 'n', long = "pages")]
    pages_per_split: Option<NonZeroUsize>,

    /// Number of segments searched in parallel
    #[arg(short = 'j', long = "workers")]
    workers: Option<NonZeroUsize>,

    /// File that receives the matching lines
    #[arg(long)]
    report: Option<PathBuf>,

    /// Uppercase every search text before matching
    #[arg(short = 'U', long)]
    uppercase: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            input_path: self.input,
            output_dir: self.output,
            criteria: self.texts,
            uppercase: self.uppercase,
            pages_per_split: self.pages_per_split,
            worker_count: self.workers,
            report_path: self.report,
            log_level: self.log_level,
        }
    }
}

/// Prints one coloured status line per segment
struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn segment_found(&self, segment: &Segment, _matches: usize) {
        println!(
            "{}",
            format!("found in {}", segment.file_name()).green().bold()
        );
    }

    fn segment_deleted(&self, segment: &Segment) {
        println!(
            "{}",
            format!("Not found in {}. Deleted.", segment.file_name())
                .red()
                .bold()
        );
    }
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.to_string().red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();

    let config = ScoutConfig::load_from(config_path.as_deref())?.merge_with_cli(cli.overrides());
    init_logging(&config.log_level);

    let summary = run(&config, &ConsoleReporter)?;
    print_summary(&summary, &config);
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(summary: &RunSummary, config: &ScoutConfig) {
    println!(
        "\nKept {} of {} segments in {}",
        summary.segments_kept,
        summary.segments_processed(),
        config.output_dir.display().to_string().blue()
    );
    if summary.total_matches > 0 {
        println!(
            "{} matching lines written to {}",
            summary.total_matches,
            config.report_path.display().to_string().blue()
        );
    }
}
