use crate::{
    config::Config,
    counter::DocumentCounter,
    estimate::{FileCategory, RateTable},
    report::append_to_file,
    scan::{ScanOptions, scan_directory},
    util::ensure_dir,
    xml,
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "loc-tally")]
#[command(about = "DTP labor estimator and XML checker for localization hand-off batches")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./loc-tally.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count pages/slides under a directory and estimate DTP hours.
    Estimate {
        #[arg(long)]
        input: PathBuf,
        /// Recurse into subdirectories.
        #[arg(long)]
        recursive: bool,
        /// Append the report to this file instead of the configured log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Override a per-unit rate, e.g. --rate word=6.5 (repeatable).
        #[arg(long = "rate", value_name = "CATEGORY=MINUTES")]
        rates: Vec<String>,
    },
    /// Check every XML file in a directory for well-formedness.
    CheckXml {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Validate every XML file in a directory against a DTD.
    ValidateDtd {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        dtd: PathBuf,
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Estimate {
            input,
            recursive,
            log,
            rates,
        } => estimate(&cfg, input, *recursive, log.as_deref(), rates),
        Command::CheckXml { input, log } => check_xml(&cfg, input, log.as_deref()),
        Command::ValidateDtd { input, dtd, log } => {
            validate_dtd(&cfg, input, dtd, log.as_deref())
        }
    }
}

fn load_config(user: Option<&Path>) -> Result<Config> {
    if let Some(p) = user {
        return Config::load(p);
    }
    let default = Path::new("loc-tally.toml");
    if default.exists() {
        Config::load(default)
    } else {
        Ok(Config::default())
    }
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn estimate(
    cfg: &Config,
    input: &Path,
    recursive: bool,
    log: Option<&Path>,
    rate_overrides: &[String],
) -> Result<()> {
    let mut rates = cfg.rates;
    rates.validate().context("invalid [rates] in config")?;
    for spec in rate_overrides {
        apply_rate_override(&mut rates, spec)?;
    }

    let options = ScanOptions {
        recursive: recursive || cfg.scan.recursive,
        exclude: compile_excludes(&cfg.scan.exclude_patterns)?,
    };
    let counter = DocumentCounter::new();
    let report = scan_directory(input, &rates, &counter, &options)?;
    emit(cfg, &report.render(), &report, log)
}

fn check_xml(cfg: &Config, input: &Path, log: Option<&Path>) -> Result<()> {
    let report = xml::check_directory(input)?;
    emit(cfg, &report.render(), &report, log)
}

fn validate_dtd(cfg: &Config, input: &Path, dtd: &Path, log: Option<&Path>) -> Result<()> {
    let report = xml::validate_directory(input, dtd)?;
    emit(cfg, &report.render(), &report, log)
}

fn apply_rate_override(rates: &mut RateTable, spec: &str) -> Result<()> {
    let (category, minutes) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("expected CATEGORY=MINUTES, got '{spec}'"))?;
    let category: FileCategory = category.parse()?;
    let minutes: f64 = minutes
        .trim()
        .parse()
        .with_context(|| format!("parsing minutes in '{spec}'"))?;
    rates.set(category, minutes)?;
    Ok(())
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid exclude pattern '{p}'")))
        .collect()
}

/// Render once, then deliver: stdout, the append-mode log, and optionally a
/// JSON copy. A failed write never discards the in-memory report.
fn emit<T: Serialize>(cfg: &Config, text: &str, report: &T, log_override: Option<&Path>) -> Result<()> {
    if cfg.output.print_report {
        print!("{text}");
    }

    let log_path = match log_override {
        Some(p) => Some(p.to_path_buf()),
        None if cfg.output.write_log && !cfg.output.log_path.is_empty() => {
            Some(PathBuf::from(&cfg.output.log_path))
        }
        None => None,
    };
    if let Some(path) = log_path {
        append_to_file(&path, text)?;
        info!("report appended to {}", path.display());
    }

    if cfg.output.write_report_json && !cfg.output.report_json_path.is_empty() {
        let json = serde_json::to_string_pretty(report).context("serializing report to JSON")?;
        std::fs::write(&cfg.output.report_json_path, json)
            .with_context(|| format!("writing {}", cfg.output.report_json_path))?;
        info!("JSON report written to {}", cfg.output.report_json_path);
    }

    Ok(())
}
