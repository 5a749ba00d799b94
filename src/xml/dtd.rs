//! DTD validation through libxml2, the same delegation the pack's XML
//! validators use. The wrapper owns the parsed DTD for the lifetime of a
//! directory run and frees it on drop; no validation rules live here.

use crate::report::ValidationOutcome;
use libxml::bindings;
use libxml::parser::Parser;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DtdError {
    #[error("DTD file not found: {0}")]
    NotFound(PathBuf),
    #[error("DTD path is not usable: {0}")]
    BadPath(PathBuf),
    #[error("parsing DTD failed: {0}")]
    Parse(PathBuf),
}

pub struct DtdValidator {
    dtd: bindings::xmlDtdPtr,
    parser: Parser,
}

impl DtdValidator {
    /// Parse the DTD once; reused for every file in a directory run.
    pub fn load(dtd_path: &Path) -> Result<Self, DtdError> {
        if !dtd_path.is_file() {
            return Err(DtdError::NotFound(dtd_path.to_path_buf()));
        }
        let c_path = CString::new(dtd_path.to_string_lossy().as_bytes())
            .map_err(|_| DtdError::BadPath(dtd_path.to_path_buf()))?;
        let dtd = unsafe {
            bindings::xmlParseDTD(
                std::ptr::null(),
                c_path.as_ptr() as *const bindings::xmlChar,
            )
        };
        if dtd.is_null() {
            return Err(DtdError::Parse(dtd_path.to_path_buf()));
        }
        Ok(Self {
            dtd,
            parser: Parser::default(),
        })
    }

    pub fn validate(&self, path: &Path) -> ValidationOutcome {
        let name = super::file_name(path);
        if let Err(err) = std::fs::metadata(path) {
            let detail = super::read_failure(path, &err);
            return ValidationOutcome::failure(name, detail);
        }
        let doc = match self.parser.parse_file(&path.to_string_lossy()) {
            Ok(doc) => doc,
            Err(err) => {
                let detail =
                    format!("The following error occurred while parsing file '{name}': {err:?}");
                return ValidationOutcome::failure(name, detail);
            }
        };
        let valid = unsafe {
            let ctxt = bindings::xmlNewValidCtxt();
            if ctxt.is_null() {
                return ValidationOutcome::failure(
                    name,
                    "could not allocate a libxml2 validation context".to_string(),
                );
            }
            let rc = bindings::xmlValidateDtd(ctxt, doc.doc_ptr(), self.dtd);
            bindings::xmlFreeValidCtxt(ctxt);
            rc == 1
        };
        if valid {
            let detail = format!("The XML file '{name}' is valid.");
            ValidationOutcome::success(name, detail)
        } else {
            let detail = format!(
                "The XML file '{name}' is not valid: the document does not conform to the DTD."
            );
            ValidationOutcome::failure(name, detail)
        }
    }
}

impl std::fmt::Debug for DtdValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtdValidator").finish_non_exhaustive()
    }
}

impl Drop for DtdValidator {
    fn drop(&mut self) {
        unsafe { bindings::xmlFreeDtd(self.dtd) }
    }
}
