//! Helpers for synthesizing small PDFs with lopdf.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const REGULAR: &str = "F1";
pub const BOLD: &str = "F2";
pub const ITALIC: &str = "F3";

/// One line of text placed with an absolute baseline position.
pub struct Text {
    pub font: &'static str,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub fn text(font: &'static str, size: f32, x: f32, y: f32, text: &str) -> Text {
    Text {
        font,
        size,
        x,
        y,
        text: text.to_string(),
    }
}

/// Body paragraph: `lines` lines of 11pt regular text, 14pt apart, starting
/// at baseline `top`.
pub fn paragraph(top: f32, lines: usize) -> Vec<Text> {
    (0..lines)
        .map(|i| {
            text(
                REGULAR,
                11.0,
                72.0,
                top - 14.0 * i as f32,
                "the quick brown fox jumps over the lazy dog again and again",
            )
        })
        .collect()
}

/// Build an A4 PDF. The media box sits on the page tree root and is
/// inherited by every page.
pub fn build_pdf(pages: &[Vec<Text>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let italic = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Italic",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular,
            BOLD => bold,
            ITALIC => italic,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for line in lines {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![line.font.into(), Object::Real(line.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Real(line.x), Object::Real(line.y)],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text.as_str())],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
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
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// A two-page report with a title, numbered and unnumbered headings.
pub fn sample_report() -> Vec<u8> {
    let mut first = vec![
        text(BOLD, 24.0, 72.0, 760.0, "Annual Report"),
        text(BOLD, 16.0, 72.0, 650.0, "1. Introduction"),
    ];
    first.extend(paragraph(620.0, 4));

    let mut second = vec![text(BOLD, 14.0, 72.0, 760.0, "Background")];
    second.extend(paragraph(730.0, 4));

    build_pdf(&[first, second])
}

/// A document with `count` pages of body text.
pub fn many_pages(count: usize) -> Vec<u8> {
    let pages: Vec<Vec<Text>> = (0..count).map(|_| paragraph(700.0, 2)).collect();
    build_pdf(&pages)
}
