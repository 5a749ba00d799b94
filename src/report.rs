use crate::estimate::FileCategory;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SECTION_RULE: &str = "==================================================";
pub const ENTRY_RULE: &str = "--------------------------------------------------";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("writing report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One scanned file, in the order files were encountered.
#[derive(Debug, Clone, Serialize)]
pub enum FileOutcome {
    Counted {
        name: String,
        category: FileCategory,
        units: u64,
    },
    Failed {
        name: String,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub units: u64,
    pub hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanTotals {
    pub word: CategoryTotal,
    pub ppt: CategoryTotal,
    pub pdf: CategoryTotal,
    pub grand_total_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub directory: String,
    pub generated_on: String,
    pub entries: Vec<FileOutcome>,
    pub totals: ScanTotals,
}

impl ScanReport {
    /// Line-oriented text form: header, per-file blocks, totals. The totals
    /// block is replaced by a notice when nothing was counted.
    pub fn render(&self) -> String {
        let mut lines = header_lines(&self.directory, &self.generated_on);

        if self.entries.is_empty() {
            lines.push("No supported files found in the directory.".to_string());
            return finish(lines);
        }

        for entry in &self.entries {
            match entry {
                FileOutcome::Counted {
                    name,
                    category,
                    units,
                } => lines.push(format!("File '{name}': {units} {}", category.unit_noun())),
                FileOutcome::Failed { name, error } => lines.push(format!(
                    "The following error occurred while parsing file '{name}': {error}"
                )),
            }
            lines.push(ENTRY_RULE.to_string());
        }

        lines.push(format!("Total Word pages: {}", self.totals.word.units));
        lines.push(format!("Total PowerPoint slides: {}", self.totals.ppt.units));
        lines.push(format!("Total PDF pages: {}", self.totals.pdf.units));
        lines.push(format!(
            "DTP time for Word documents (hours): {:.2}",
            self.totals.word.hours
        ));
        lines.push(format!(
            "DTP time for PowerPoint presentations (hours): {:.2}",
            self.totals.ppt.hours
        ));
        lines.push(format!(
            "DTP time for PDF files (hours): {:.2}",
            self.totals.pdf.hours
        ));
        lines.push(format!(
            "Total DTP time (hours): {:.2}",
            self.totals.grand_total_hours
        ));
        finish(lines)
    }
}

/// Outcome of checking one XML file, well-formedness or DTD validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub file_name: String,
    pub is_valid: bool,
    pub detail: String,
}

impl ValidationOutcome {
    pub fn success(file_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            is_valid: true,
            detail: detail.into(),
        }
    }

    pub fn failure(file_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            is_valid: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct XmlReport {
    pub directory: String,
    pub generated_on: String,
    pub outcomes: Vec<ValidationOutcome>,
}

impl XmlReport {
    pub fn render(&self) -> String {
        let mut lines = header_lines(&self.directory, &self.generated_on);

        if self.outcomes.is_empty() {
            lines.push("No XML files found in the directory.".to_string());
            return finish(lines);
        }

        for outcome in &self.outcomes {
            lines.push(format!("Validated file: {}", outcome.file_name));
            lines.push(format!(
                "Result: {}",
                if outcome.is_valid { "Success" } else { "Failure" }
            ));
            lines.push(format!("Message: {}", outcome.detail));
            lines.push(ENTRY_RULE.to_string());
        }
        finish(lines)
    }
}

fn header_lines(directory: &str, generated_on: &str) -> Vec<String> {
    vec![
        SECTION_RULE.to_string(),
        format!("Results for files in directory: {directory}"),
        format!("Log generated on: {generated_on}"),
        ENTRY_RULE.to_string(),
    ]
}

fn finish(mut lines: Vec<String>) -> String {
    lines.push(String::new());
    lines.join("\n")
}

/// Reports append to the log so successive runs accumulate, as the log
/// readers expect. The rendered text survives in memory if the write fails.
pub fn append_to_file(path: &Path, text: &str) -> Result<(), ReportError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    file.write_all(text.as_bytes())
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
