//! Generated PDFs for the pagescout test suites.
//!
//! Every page uses a single Courier font registered as `F1`, so hand-written
//! content streams passed to [`write_content_pdf`] can select it with
//! `Tf F1 <size>`.
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

const LEADING: i64 = 14;
const TOP: i64 = 800;

/// Writes a PDF where each line is its own text object
pub fn write_text_pdf(path: &Path, pages: &[Vec<String>]) {
    let pages = pages
        .iter()
        .map(|lines| {
            lines
                .iter()
                .enumerate()
                .flat_map(|(i, line)| {
                    vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 10.into()]),
                        Operation::new("Td", vec![50.into(), (TOP - LEADING * i as i64).into()]),
                        Operation::new("Tj", vec![Object::string_literal(line.as_str())]),
                        Operation::new("ET", vec![]),
                    ]
                })
                .collect()
        })
        .collect();
    write_content_pdf(path, pages);
}

/// Writes a PDF where all lines of a page share one text object and are
/// separated by `T*`
pub fn write_text_block_pdf(path: &Path, pages: &[Vec<String>]) {
    let pages = pages
        .iter()
        .map(|lines| {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("TL", vec![LEADING.into()]),
                Operation::new("Td", vec![50.into(), TOP.into()]),
            ];
            for (i, line) in lines.iter().enumerate() {
                if i > 0 {
                    operations.push(Operation::new("T*", vec![]));
                }
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(line.as_str())],
                ));
            }
            operations.push(Operation::new("ET", vec![]));
            operations
        })
        .collect();
    write_content_pdf(path, pages);
}

/// Writes a PDF with one page per operation list
pub fn write_content_pdf(path: &Path, pages: Vec<Vec<Operation>>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
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
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Builds `count` roll pages, each with a header line and a few filler lines
pub fn numbered_pages(count: usize) -> Vec<Vec<String>> {
    (1..=count)
        .map(|page| {
            vec![
                format!("ELECTORAL ROLL PAGE {}", page),
                format!("SERIAL {} HOUSE {}", page * 3, page),
                "NAME / RELATION / AGE".to_string(),
            ]
        })
        .collect()
}
