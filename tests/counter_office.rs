use loc_tally::counter::{CountError, DocumentCounter, UnitCounter};
use loc_tally::estimate::FileCategory;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_docx(path: &Path, paragraphs: usize) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let opts = SimpleFileOptions::default();

    zip.start_file("word/document.xml", opts).unwrap();
    let mut body = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for i in 0..paragraphs {
        if i % 2 == 0 {
            body.push_str("<w:p><w:r><w:t>text</w:t></w:r></w:p>");
        } else {
            // Empty paragraphs are self-closing in real documents.
            body.push_str("<w:p/>");
        }
    }
    body.push_str("<w:sectPr/></w:body></w:document>");
    zip.write_all(body.as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn write_pptx(path: &Path, slides: usize) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let opts = SimpleFileOptions::default();

    // Entries that must NOT be counted as slides.
    for decoy in [
        "[Content_Types].xml",
        "ppt/presentation.xml",
        "ppt/slides/_rels/slide1.xml.rels",
        "ppt/notesSlides/notesSlide1.xml",
        "ppt/slides/slideExtra.xml",
    ] {
        zip.start_file(decoy, opts).unwrap();
        zip.write_all(b"<decoy/>").unwrap();
    }
    for i in 1..=slides {
        zip.start_file(format!("ppt/slides/slide{i}.xml"), opts)
            .unwrap();
        zip.write_all(
            br#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#,
        )
        .unwrap();
    }
    zip.finish().unwrap();
}

fn write_pdf(path: &Path, pages: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..pages {
        let content = Content { operations: vec![] };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn docx_paragraph_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.docx");
    write_docx(&path, 5);

    let counter = DocumentCounter::new();
    let units = counter.count_units(&path, FileCategory::Word).unwrap();
    assert_eq!(units, 5);
}

#[test]
fn pptx_slide_count_ignores_non_slide_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    write_pptx(&path, 4);

    let counter = DocumentCounter::new();
    let units = counter
        .count_units(&path, FileCategory::PowerPoint)
        .unwrap();
    assert_eq!(units, 4);
}

#[test]
fn pdf_page_count() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan.pdf");
    write_pdf(&path, 2);

    let counter = DocumentCounter::new();
    let units = counter.count_units(&path, FileCategory::Pdf).unwrap();
    assert_eq!(units, 2);
}

#[test]
fn non_zip_docx_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.docx");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let counter = DocumentCounter::new();
    let err = counter.count_units(&path, FileCategory::Word).unwrap_err();
    assert!(matches!(err, CountError::Parse { .. }));
}

#[test]
fn legacy_binary_doc_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.doc");
    // OLE2 compound-file magic, what a real Word 97 file starts with.
    fs::write(&path, [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]).unwrap();

    let counter = DocumentCounter::new();
    let err = counter.count_units(&path, FileCategory::Word).unwrap_err();
    assert!(matches!(err, CountError::Parse { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone.pptx");

    let counter = DocumentCounter::new();
    let err = counter
        .count_units(&path, FileCategory::PowerPoint)
        .unwrap_err();
    assert!(matches!(err, CountError::Io { .. }));
}

#[test]
fn zip_without_document_part_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hollow.docx");
    let file = File::create(&path).unwrap();
    let mut zip = ZipWriter::new(file);
    zip.start_file("unrelated.txt", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"nothing here").unwrap();
    zip.finish().unwrap();

    let counter = DocumentCounter::new();
    let err = counter.count_units(&path, FileCategory::Word).unwrap_err();
    match err {
        CountError::Parse { detail, .. } => assert!(detail.contains("word/document.xml")),
        other => panic!("expected parse error, got {other:?}"),
    }
}
