//! Well-formedness and DTD checks. Both are pass-throughs to XML libraries
//! (`roxmltree` and libxml2); this module only maps errors to uniform
//! messages and aggregates outcomes over a directory.

pub mod dtd;

use crate::report::{ValidationOutcome, XmlReport};
use crate::util::now_rfc3339;
use dtd::{DtdError, DtdValidator};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum XmlCheckError {
    #[error("not a directory: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("reading directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Dtd(#[from] DtdError),
}

/// Parse one file and report whether it is syntactically valid XML.
pub fn check_well_formed(path: &Path) -> ValidationOutcome {
    let name = file_name(path);
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => return ValidationOutcome::failure(name, read_failure(path, &err)),
    };
    // Localization XML routinely carries a DOCTYPE; parsing must tolerate it.
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    match roxmltree::Document::parse_with_options(&text, options) {
        Ok(_) => {
            let detail = format!("The XML file '{name}' is well-formed.");
            ValidationOutcome::success(name, detail)
        }
        Err(err) => {
            let detail = format!("XML parsing error in file '{name}': {err}");
            ValidationOutcome::failure(name, detail)
        }
    }
}

/// Validate one file against a DTD. Convenience wrapper around
/// [`DtdValidator`] for single-file callers; directory runs load the DTD
/// once instead.
pub fn validate_against_dtd(path: &Path, dtd_path: &Path) -> ValidationOutcome {
    match DtdValidator::load(dtd_path) {
        Ok(validator) => validator.validate(path),
        Err(err) => ValidationOutcome::failure(file_name(path), err.to_string()),
    }
}

/// Check every `.xml` file directly under `dir` for well-formedness. A bad
/// file becomes a failure outcome; the run always covers the whole
/// directory.
pub fn check_directory(dir: &Path) -> Result<XmlReport, XmlCheckError> {
    let files = list_xml_files(dir)?;
    let outcomes: Vec<_> = files.iter().map(|p| check_well_formed(p)).collect();
    info!("checked {} XML file(s) under {}", outcomes.len(), dir.display());
    Ok(report_for(dir, outcomes))
}

/// Validate every `.xml` file directly under `dir` against one DTD. The DTD
/// is parsed once up front; an unreadable DTD aborts the run.
pub fn validate_directory(dir: &Path, dtd_path: &Path) -> Result<XmlReport, XmlCheckError> {
    let files = list_xml_files(dir)?;
    let validator = DtdValidator::load(dtd_path)?;
    let outcomes: Vec<_> = files.iter().map(|p| validator.validate(p)).collect();
    info!(
        "validated {} XML file(s) under {} against {}",
        outcomes.len(),
        dir.display(),
        dtd_path.display()
    );
    Ok(report_for(dir, outcomes))
}

fn report_for(dir: &Path, outcomes: Vec<ValidationOutcome>) -> XmlReport {
    XmlReport {
        directory: dir.display().to_string(),
        generated_on: now_rfc3339(),
        outcomes,
    }
}

fn list_xml_files(dir: &Path) -> Result<Vec<PathBuf>, XmlCheckError> {
    if !dir.is_dir() {
        return Err(XmlCheckError::DirectoryNotFound(dir.to_path_buf()));
    }
    let read_dir_err = |source: std::io::Error| XmlCheckError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
        if path.is_file() && is_xml {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn read_failure(path: &Path, err: &std::io::Error) -> String {
    match err.kind() {
        ErrorKind::NotFound => format!("File not found: {}", path.display()),
        ErrorKind::PermissionDenied => {
            format!("Permission denied while accessing the file: {}", path.display())
        }
        _ => format!(
            "An unknown error occurred while reading '{}': {err}",
            file_name(path)
        ),
    }
}
