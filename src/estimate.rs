use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// The file classes the estimator knows how to price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Word,
    PowerPoint,
    Pdf,
}

impl FileCategory {
    /// Classify a path by its extension. Returns `None` for anything the
    /// scanner should skip.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "doc" | "docx" | "docm" => Some(Self::Word),
            "ppt" | "pptx" | "pptm" => Some(Self::PowerPoint),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn unit_noun(self) -> &'static str {
        match self {
            Self::Word | Self::Pdf => "page(s)",
            Self::PowerPoint => "slide(s)",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Word => "Word",
            Self::PowerPoint => "PowerPoint",
            Self::Pdf => "PDF",
        };
        f.write_str(s)
    }
}

impl FromStr for FileCategory {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "ppt" => Ok(Self::PowerPoint),
            "pdf" => Ok(Self::Pdf),
            other => Err(EstimateError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("minutes-per-unit must be a positive number, got {0}")]
    InvalidRate(f64),
    #[error("unknown file category '{0}' (expected word, ppt, or pdf)")]
    UnknownCategory(String),
}

/// Minutes of DTP labor per unit (page or slide), one rate per category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default = "default_word_minutes")]
    pub word: f64,
    #[serde(default = "default_ppt_minutes")]
    pub ppt: f64,
    #[serde(default = "default_pdf_minutes")]
    pub pdf: f64,
}

fn default_word_minutes() -> f64 {
    5.0
}
fn default_ppt_minutes() -> f64 {
    7.0
}
fn default_pdf_minutes() -> f64 {
    15.0
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            word: default_word_minutes(),
            ppt: default_ppt_minutes(),
            pdf: default_pdf_minutes(),
        }
    }
}

impl RateTable {
    pub fn minutes_for(&self, category: FileCategory) -> f64 {
        match category {
            FileCategory::Word => self.word,
            FileCategory::PowerPoint => self.ppt,
            FileCategory::Pdf => self.pdf,
        }
    }

    pub fn set(&mut self, category: FileCategory, minutes: f64) -> Result<(), EstimateError> {
        check_rate(minutes)?;
        match category {
            FileCategory::Word => self.word = minutes,
            FileCategory::PowerPoint => self.ppt = minutes,
            FileCategory::Pdf => self.pdf = minutes,
        }
        Ok(())
    }

    /// Reject non-positive or non-finite rates up front instead of letting
    /// them leak into a scan.
    pub fn validate(&self) -> Result<(), EstimateError> {
        for minutes in [self.word, self.ppt, self.pdf] {
            check_rate(minutes)?;
        }
        Ok(())
    }
}

fn check_rate(minutes: f64) -> Result<(), EstimateError> {
    if minutes.is_finite() && minutes > 0.0 {
        Ok(())
    } else {
        Err(EstimateError::InvalidRate(minutes))
    }
}

/// Convert a unit count into DTP hours, rounded up to the nearest quarter
/// hour. Billing rounds once over the aggregated count per category, not
/// per file.
pub fn estimate_hours(unit_count: u64, minutes_per_unit: f64) -> Result<f64, EstimateError> {
    check_rate(minutes_per_unit)?;
    let raw_hours = unit_count as f64 * minutes_per_unit / 60.0;
    Ok((raw_hours * 4.0).ceil() / 4.0)
}
