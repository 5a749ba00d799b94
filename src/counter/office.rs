use super::{CountError, UnitCounter};
use crate::estimate::FileCategory;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Counts units by opening the documents themselves: OOXML containers via
/// `zip` + `quick-xml`, PDFs via `lopdf`. Legacy binary `.doc`/`.ppt` files
/// are not ZIP containers and surface as per-file parse errors.
pub struct DocumentCounter;

impl DocumentCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocumentCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitCounter for DocumentCounter {
    fn count_units(&self, path: &Path, category: FileCategory) -> Result<u64, CountError> {
        match category {
            FileCategory::Word => count_docx_paragraphs(path),
            FileCategory::PowerPoint => count_pptx_slides(path),
            FileCategory::Pdf => count_pdf_pages(path),
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>, CountError> {
    let file = File::open(path).map_err(|source| CountError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ZipArchive::new(file).map_err(|e| CountError::Parse {
        path: path.to_path_buf(),
        detail: format!("not an OOXML (ZIP) container: {e}"),
    })
}

/// Paragraph count of `word/document.xml`, the unit python-docx reports as
/// well. Word does not store a page count in the package.
fn count_docx_paragraphs(path: &Path) -> Result<u64, CountError> {
    let mut archive = open_archive(path)?;
    let xml_content = {
        let mut part = archive
            .by_name("word/document.xml")
            .map_err(|e| CountError::Parse {
                path: path.to_path_buf(),
                detail: format!("missing word/document.xml: {e}"),
            })?;
        let mut content = String::new();
        part.read_to_string(&mut content)
            .map_err(|source| CountError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        content
    };

    let mut reader = Reader::from_str(&xml_content);
    let mut buf = Vec::new();
    let mut paragraphs = 0u64;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e) | Event::Empty(e)) if e.local_name().as_ref() == b"p" => {
                paragraphs += 1;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(CountError::Parse {
                    path: path.to_path_buf(),
                    detail: format!("invalid XML in word/document.xml: {e}"),
                });
            }
        }
        buf.clear();
    }
    Ok(paragraphs)
}

/// Slides are the `ppt/slides/slideN.xml` entries of the package; counting
/// the entry names is enough, their content never needs parsing.
fn count_pptx_slides(path: &Path) -> Result<u64, CountError> {
    let archive = open_archive(path)?;
    let slides = archive.file_names().filter(|n| is_slide_entry(n)).count();
    Ok(slides as u64)
}

fn is_slide_entry(name: &str) -> bool {
    name.strip_prefix("ppt/slides/slide")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn count_pdf_pages(path: &Path) -> Result<u64, CountError> {
    let doc = lopdf::Document::load(path).map_err(|e| CountError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(doc.get_pages().len() as u64)
}
