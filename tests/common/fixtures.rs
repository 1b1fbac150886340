#![allow(dead_code)]

use folio::component::builders::*;
use folio::{ComponentTree, Node};
use std::io::Cursor;

/// A document whose content is the given nodes, in Helvetica.
pub fn doc_with(children: Vec<Node>) -> ComponentTree {
    document()
        .prop("defaultStyle", serde_json::json!({"font": "Helvetica"}))
        .child(content().children(children))
        .into_tree()
}

/// A one-paragraph document.
pub fn hello_document(message: &str) -> ComponentTree {
    doc_with(vec![text(message).into()])
}

/// `count` paragraphs long enough to wrap onto several lines each.
pub fn long_paragraphs(count: usize) -> Vec<Node> {
    (1..=count)
        .map(|i| {
            text(format!(
                "Paragraph {} with enough words to wrap across the width of the page \
                 several times, so that a handful of them fill a page and the rest \
                 spill over onto the pages that follow.",
                i
            ))
            .into()
        })
        .collect()
}

/// A table with one header row and `rows` body rows of two cells.
pub fn two_column_table(rows: usize) -> Node {
    table()
        .prop("widths", serde_json::json!(["*", 100]))
        .prop("headerRows", 1)
        .child(row().child(cell().child("Name")).child(cell().child("Value")))
        .children((1..=rows).map(|i| {
            row()
                .child(cell().child(format!("Item {}", i)))
                .child(cell().child(format!("{}", i * 10)))
        }))
        .into()
}

/// A small RGB JPEG.
pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 60, 90]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .expect("encode test jpeg");
    bytes
}
