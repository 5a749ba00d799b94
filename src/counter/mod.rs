pub mod office;

use crate::estimate::FileCategory;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use office::DocumentCounter;

/// A single file could not be opened or inspected. Recorded per file in the
/// scan report; never aborts the run.
#[derive(Debug, Error)]
pub enum CountError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {detail}")]
    Parse { path: PathBuf, detail: String },
}

/// Document-inspection boundary injected into the scanner. Production code
/// uses [`DocumentCounter`]; tests substitute stubs.
pub trait UnitCounter {
    /// Units are pages for Word and PDF files, slides for PowerPoint.
    fn count_units(&self, path: &Path, category: FileCategory) -> Result<u64, CountError>;
}
