//! dm-analyzer: S1000D data module analyzer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dm_analyzer::analyzer::engine::exceeds;
use dm_analyzer::analyzer::AnalysisEngine;
use dm_analyzer::config::{build_ignore_set, is_ignored, load_config, starter_config, CONFIG_FILENAME};
use dm_analyzer::reporter::{ConsoleReporter, FileReport, JsonReporter};
use dm_analyzer::{AnalysisResult, AnalyzeError, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

/// dm-analyzer: classify S1000D data modules and flag structural quality problems
#[derive(Parser, Debug)]
#[command(name = "dm-analyzer")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Data module XML file or directory to analyze (omit when using a subcommand)
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (one line per file)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (rule ids, severities, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .dmrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Step count above which a procedure is flagged as oversized
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Exit 1 if any flag has at least this severity
    #[arg(long, value_enum, value_name = "SEVERITY")]
    fail_on: Option<FailOn>,

    /// Run analysis in parallel (default for directories with many files)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .dmrc.json with sensible defaults
    Init {
        /// Step threshold to write (default: 20)
        #[arg(long)]
        max_steps: Option<usize>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FailOn {
    Error,
    Warning,
    Info,
}

impl From<FailOn> for Severity {
    fn from(level: FailOn) -> Self {
        match level {
            FailOn::Error => Severity::Error,
            FailOn::Warning => Severity::Warning,
            FailOn::Info => Severity::Info,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Some(Commands::Init { max_steps, dir }) = args.command {
        return run_init(max_steps, dir.as_deref());
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("a path is required when not using a subcommand");
    };

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?
        .merge_with_cli(args.max_steps, args.fail_on.map(Severity::from));

    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let files = collect_dm_files(&path, ignore_set.as_ref())?;
    if files.is_empty() {
        eprintln!("{}: No data module files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let fail_on = config.fail_on;
    let engine = AnalysisEngine::with_config(config);

    let use_parallel = args.parallel || args.jobs.is_some() || files.len() > 10;
    let outcomes = if use_parallel {
        analyze_files_parallel(&engine, &files)
    } else {
        analyze_files_sequential(&engine, &files)
    };

    let mut reports = Vec::with_capacity(outcomes.len());
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Ok(result) => reports.push(FileReport {
                path: path.clone(),
                result,
            }),
            Err(e) => report_failure(path, &e),
        }
    }

    if reports.is_empty() {
        return Ok(ExitCode::from(2));
    }

    let results: Vec<AnalysisResult> = reports.iter().map(|r| r.result.clone()).collect();
    let stats = AnalysisEngine::aggregate_stats(&results);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 && files.len() == 1 {
            println!("{}", reporter.report_file(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        for report in &reports {
            reporter.report_quiet(report);
        }
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    if let Some(level) = fail_on {
        if exceeds(&results, level) {
            if !args.quiet {
                eprintln!(
                    "{}: flags at or above '{}' severity found",
                    "Failed".red().bold(),
                    level
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn report_failure(path: &Path, err: &AnalyzeError) {
    let label = if err.is_invalid_input() {
        "Invalid input".red().bold()
    } else {
        "Error".red()
    };
    eprintln!("{}: {}: {}", label, path.display(), err);
}

fn run_init(max_steps: Option<usize>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let max_steps = max_steps.unwrap_or(dm_analyzer::analyzer::rules::MAX_STEPS);
    std::fs::write(&config_path, starter_config(max_steps))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}

fn is_xml_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

fn collect_dm_files(path: &Path, ignore_set: Option<&globset::GlobSet>) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        // An explicitly named file is analyzed whatever its extension
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !is_xml_file(file_path) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn analyze_files_sequential(
    engine: &AnalysisEngine,
    files: &[PathBuf],
) -> Vec<Result<AnalysisResult, AnalyzeError>> {
    files.iter().map(|file| engine.analyze_file(file)).collect()
}

fn analyze_files_parallel(
    engine: &AnalysisEngine,
    files: &[PathBuf],
) -> Vec<Result<AnalysisResult, AnalyzeError>> {
    use rayon::prelude::*;

    // par_iter().map().collect() keeps input order
    files.par_iter().map(|file| engine.analyze_file(file)).collect()
}
