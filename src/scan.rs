use crate::counter::UnitCounter;
use crate::estimate::{EstimateError, FileCategory, RateTable, estimate_hours};
use crate::report::{CategoryTotal, FileOutcome, ScanReport, ScanTotals};
use crate::util::now_rfc3339;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Estimate(#[from] EstimateError),
}

#[derive(Debug, Default)]
pub struct ScanOptions {
    pub recursive: bool,
    /// File-name patterns to skip, e.g. Office owner-lock files (`~$x.docx`).
    pub exclude: Vec<Regex>,
}

impl ScanOptions {
    fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|r| r.is_match(name))
    }
}

/// Walk `dir`, count units per supported file through `counter`, and fold
/// the results into a report. A file that fails to parse becomes an error
/// entry and the scan moves on; hours are computed once per category from
/// the summed unit counts, never per file.
pub fn scan_directory(
    dir: &Path,
    rates: &RateTable,
    counter: &dyn UnitCounter,
    options: &ScanOptions,
) -> Result<ScanReport, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    let (mut word_units, mut ppt_units, mut pdf_units) = (0u64, 0u64, 0u64);

    for path in collect_files(dir, options.recursive)? {
        let Some(category) = FileCategory::from_path(&path) else {
            continue;
        };
        let name = display_name(&path);
        if options.is_excluded(&name) {
            debug!("skipping excluded file {name}");
            continue;
        }
        match counter.count_units(&path, category) {
            Ok(units) => {
                debug!("{name}: {units} {} [{category}]", category.unit_noun());
                match category {
                    FileCategory::Word => word_units += units,
                    FileCategory::PowerPoint => ppt_units += units,
                    FileCategory::Pdf => pdf_units += units,
                }
                entries.push(FileOutcome::Counted {
                    name,
                    category,
                    units,
                });
            }
            Err(err) => {
                warn!("{name}: {err}");
                entries.push(FileOutcome::Failed {
                    name,
                    error: err.to_string(),
                });
            }
        }
    }

    let word = CategoryTotal {
        units: word_units,
        hours: estimate_hours(word_units, rates.word)?,
    };
    let ppt = CategoryTotal {
        units: ppt_units,
        hours: estimate_hours(ppt_units, rates.ppt)?,
    };
    let pdf = CategoryTotal {
        units: pdf_units,
        hours: estimate_hours(pdf_units, rates.pdf)?,
    };
    let grand_total_hours = word.hours + ppt.hours + pdf.hours;

    info!(
        "scanned {} supported file(s) under {} ({grand_total_hours:.2} h total)",
        entries.len(),
        dir.display()
    );

    Ok(ScanReport {
        directory: dir.display().to_string(),
        generated_on: now_rfc3339(),
        entries,
        totals: ScanTotals {
            word,
            ppt,
            pdf,
            grand_total_hours,
        },
    })
}

fn collect_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let read_dir_err = |source: std::io::Error| ScanError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    if recursive {
        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = entry.map_err(|e| read_dir_err(e.into()))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    } else {
        for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
    }
    // Report order must be deterministic regardless of readdir order.
    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
