use crate::estimate::RateTable;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rates: RateTable,
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    pub recursive: bool,
    /// File-name regexes to skip while scanning.
    pub exclude_patterns: Vec<String>,
}
impl Default for Scan {
    fn default() -> Self {
        Self {
            recursive: false,
            // Office owner-lock files appear next to any document someone
            // still has open.
            exclude_patterns: vec!["^~\\$".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub print_report: bool,
    pub write_log: bool,
    pub log_path: String,
    pub write_report_json: bool,
    pub report_json_path: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            print_report: true,
            write_log: true,
            log_path: "loc-tally-log.txt".into(),
            write_report_json: false,
            report_json_path: "loc-tally-report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
