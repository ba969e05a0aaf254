//! Thin layer over `lopdf`: loading, per-page text extraction and page-range
//! extraction. Nothing outside this module touches `lopdf` types directly
//! except the error variant that wraps them.
//!
//! Page text is rebuilt from the content stream rather than taken from
//! `Document::extract_text`, which only breaks lines at the end of a text
//! object. Here a line ends wherever the text position moves to a new
//! baseline:
//!
//! | Operator | Breaks the line |
//! |---|---|
//! | `ET`, `T*`, `'`, `"` | always |
//! | `Td`, `TD` | when the vertical offset is non-zero |
//! | `Tm` | when the baseline differs from the current one |
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Encoding, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, trace};

use crate::errors::{ScoutError, ScoutResult};
use crate::splitter::PageRange;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Loads a PDF document
pub fn load_document(path: &Path) -> ScoutResult<Document> {
    let doc = Document::load(path).map_err(|e| match e {
        lopdf::Error::IO(io) => ScoutError::from_io(path, io),
        other => ScoutError::pdf(path, other),
    })?;
    debug!("Loaded {} ({} pages)", path.display(), page_count(&doc));
    Ok(doc)
}

/// Number of pages in the document
pub fn page_count(doc: &Document) -> u32 {
    doc.get_pages().len() as u32
}

/// Extracts the plain text of every page, in page order, one `'\n'`
/// terminated line per visual line
pub fn page_texts(doc: &Document, path: &Path) -> ScoutResult<Vec<String>> {
    doc.get_pages()
        .into_iter()
        .map(|(page_number, page_id)| {
            trace!("Extracting text from page {} of {}", page_number, path.display());
            page_text(doc, page_id).map_err(|e| ScoutError::pdf(path, e))
        })
        .collect()
}

#[derive(Default)]
struct PageText {
    text: String,
    baseline: Option<f32>,
}

impl PageText {
    fn break_line(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    /// Absolute move; an unknown current baseline counts as a different one
    fn move_to(&mut self, y: Option<f32>) {
        let Some(y) = y else {
            return;
        };
        match self.baseline {
            Some(current) if (current - y).abs() <= f32::EPSILON => {}
            _ => self.break_line(),
        }
        self.baseline = Some(y);
    }

    fn show(&mut self, encoding: Option<&Encoding>, operands: &[Object]) -> lopdf::Result<()> {
        let Some(encoding) = encoding else {
            trace!("Skipping text shown before a font was selected");
            return Ok(());
        };
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    self.text.push_str(&Document::decode_text(encoding, bytes)?);
                }
                Object::Array(items) => {
                    self.show(Some(encoding), items)?;
                    self.text.push(' ');
                }
                Object::Integer(_) | Object::Real(_) => {
                    // Large negative kerning inside TJ stands in for a space
                    if operand.as_float().is_ok_and(|kern| kern < -100.0) {
                        self.text.push(' ');
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn operand_float(operands: &[Object], index: usize) -> Option<f32> {
    operands.get(index).and_then(|o| o.as_float().ok())
}

fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .map(|(name, font)| font.get_font_encoding(doc).map(|encoding| (name, encoding)))
        .collect::<lopdf::Result<BTreeMap<Vec<u8>, Encoding>>>()?;
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut page = PageText::default();
    let mut encoding = None;
    for operation in &content.operations {
        let operands = operation.operands.as_slice();
        match operation.operator.as_str() {
            "BT" => page.baseline = Some(0.0),
            "ET" => page.break_line(),
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| encodings.get(name));
            }
            "Tm" => page.move_to(operand_float(operands, 5)),
            "Td" | "TD" => {
                let dy = operand_float(operands, 1).unwrap_or(0.0);
                if dy != 0.0 {
                    page.break_line();
                    page.baseline = page.baseline.map(|y| y + dy);
                }
            }
            "T*" => {
                page.break_line();
                page.baseline = None;
            }
            "Tj" | "TJ" => page.show(encoding, operands)?,
            "'" => {
                page.break_line();
                page.baseline = None;
                page.show(encoding, operands)?;
            }
            "\"" => {
                page.break_line();
                page.baseline = None;
                page.show(encoding, operands.get(2..).unwrap_or(&[]))?;
            }
            _ => {}
        }
    }
    Ok(page.text)
}

/// Builds a standalone document holding only the pages in `range`.
///
/// Only the objects reachable from those pages are copied, so the cost is
/// proportional to the part rather than to the whole source.
pub fn extract_range(source: &Document, range: PageRange) -> lopdf::Result<Document> {
    let mut part = Document::with_version(source.version.clone());
    part.max_id = source.max_id;
    let pages_id = part.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(range.len());
    let mut pending = Vec::new();
    for (_, &page_id) in source.get_pages().range(range.start..=range.end) {
        let mut page = source.get_dictionary(page_id)?.clone();
        for key in INHERITED_KEYS {
            if !page.has(key) {
                if let Some(value) = inherited(source, &page, key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        page.set("Parent", pages_id);
        collect_dictionary_references(&page, &mut pending);
        part.objects.insert(page_id, Object::Dictionary(page));
        kids.push(page_id.into());
    }
    copy_referenced(source, &mut part, pending);

    let count = kids.len() as i64;
    part.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = part.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    part.trailer.set("Root", catalog_id);

    trace!(
        "Extracted pages {}-{} ({} objects)",
        range.start,
        range.end,
        part.objects.len()
    );
    Ok(part)
}

fn inherited<'a>(source: &'a Document, page: &Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut seen = BTreeSet::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(id) = parent {
        if !seen.insert(id) {
            break;
        }
        let node = source.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn copy_referenced(source: &Document, part: &mut Document, mut pending: Vec<ObjectId>) {
    while let Some(id) = pending.pop() {
        if part.objects.contains_key(&id) {
            continue;
        }
        // Dangling references stay dangling; readers treat them as null
        let Some(object) = source.objects.get(&id) else {
            continue;
        };
        collect_references(object, &mut pending);
        part.objects.insert(id, object.clone());
    }
}

fn collect_references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => items.iter().for_each(|item| collect_references(item, out)),
        Object::Dictionary(dict) => collect_dictionary_references(dict, out),
        Object::Stream(stream) => collect_dictionary_references(&stream.dict, out),
        _ => {}
    }
}

// `Parent` links lead back up the source page tree and from there to every page
fn collect_dictionary_references(dict: &Dictionary, out: &mut Vec<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            collect_references(value, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;
    use pagescout_fixtures::{write_content_pdf, write_text_block_pdf, write_text_pdf};
    use tempfile::tempdir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn text(s: &str) -> Object {
        Object::string_literal(s)
    }

    fn texts_of(path: &Path) -> Vec<String> {
        let doc = load_document(path).unwrap();
        page_texts(&doc, path).unwrap()
    }

    #[test]
    fn test_one_text_object_per_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        write_text_pdf(&path, &[lines(&["JOHN SMITH", "MARY DOE"]), lines(&["PAGE TWO"])]);

        assert_eq!(texts_of(&path), vec!["JOHN SMITH\nMARY DOE\n", "PAGE TWO\n"]);
    }

    #[test]
    fn test_next_line_inside_one_text_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        write_text_block_pdf(&path, &[lines(&["JOHN SMITH", "MARY DOE", "AGE 34"])]);

        assert_eq!(texts_of(&path), vec!["JOHN SMITH\nMARY DOE\nAGE 34\n"]);
    }

    #[test]
    fn test_line_advancing_operators() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        write_content_pdf(
            &path,
            vec![vec![
                op("BT", vec![]),
                op("Tf", vec!["F1".into(), 10.into()]),
                op("TL", vec![12.into()]),
                op("Td", vec![50.into(), 700.into()]),
                op("Tj", vec![text("SERIAL 1")]),
                // Horizontal move stays on the same line
                op("Td", vec![80.into(), 0.into()]),
                op("Tj", vec![text(" JOHN")]),
                op("Td", vec![(-80).into(), (-12).into()]),
                op("Tj", vec![text("SERIAL 2")]),
                op("'", vec![text("SERIAL 3")]),
                op("\"", vec![0.into(), 0.into(), text("SERIAL 4")]),
                op("TD", vec![0.into(), (-12).into()]),
                op("TJ", vec![vec![text("MARY"), (-250).into(), text("DOE")].into()]),
                op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 500.into()]),
                op("Tj", vec![text("AGE")]),
                op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 90.into(), 500.into()]),
                op("Tj", vec![text(" 34")]),
                op("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), 50.into(), 488.into()]),
                op("Tj", vec![text("END")]),
                op("ET", vec![]),
            ]],
        );

        let texts = texts_of(&path);
        let page: Vec<&str> = texts[0].lines().collect();
        assert_eq!(
            page,
            vec![
                "SERIAL 1 JOHN",
                "SERIAL 2",
                "SERIAL 3",
                "SERIAL 4",
                "MARY DOE ",
                "AGE 34",
                "END"
            ]
        );
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        write_content_pdf(
            &path,
            vec![vec![
                op("BT", vec![]),
                op("Tj", vec![text("INVISIBLE")]),
                op("ET", vec![]),
            ]],
        );

        assert_eq!(texts_of(&path), vec![""]);
    }

    #[test]
    fn test_extract_range_copies_only_part_pages() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        let pages: Vec<Vec<String>> = (1..=4).map(|p| vec![format!("PAGE {}", p)]).collect();
        write_text_pdf(&path, &pages);
        let source = load_document(&path).unwrap();

        let part = extract_range(&source, PageRange { start: 2, end: 3 }).unwrap();
        assert_eq!(page_count(&part), 2);
        assert!(part.objects.len() < source.objects.len());
        assert_eq!(page_texts(&part, &path).unwrap(), vec!["PAGE 2\n", "PAGE 3\n"]);

        // MediaBox lives on the source page tree root and is copied onto each page
        for page_id in part.get_pages().values() {
            assert!(part.get_dictionary(*page_id).unwrap().has(b"MediaBox"));
        }
    }

    #[test]
    fn test_extracted_part_survives_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roll.pdf");
        let pages: Vec<Vec<String>> = (1..=3).map(|p| vec![format!("PAGE {}", p)]).collect();
        write_text_pdf(&path, &pages);
        let source = load_document(&path).unwrap();

        let mut part = extract_range(&source, PageRange { start: 3, end: 3 }).unwrap();
        let part_path = dir.path().join("part_1.pdf");
        part.save(&part_path).unwrap();

        assert_eq!(texts_of(&part_path), vec!["PAGE 3\n"]);
    }

    #[test]
    fn test_load_missing_segment_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("part_9.pdf");

        let err = load_document(&path).unwrap_err();
        assert!(matches!(err, ScoutError::Io { .. }));
        assert!(!err.is_input_error());
    }
}
