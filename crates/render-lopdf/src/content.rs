//! Turns a laid-out page into a PDF content stream.

use folio_layout::{ElementKind, FontKey, LaidOutPage, PositionedElement, TextFragment, encoding};
use folio_model::Color;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use std::collections::BTreeMap;

/// Resource names assigned to the document's fonts and images.
#[derive(Debug, Default)]
pub struct ResourceNames {
    pub fonts: BTreeMap<FontKey, String>,
    pub images: BTreeMap<String, String>,
}

#[derive(Default, PartialEq)]
struct PageRenderState {
    font: Option<(String, f32)>,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

struct PageContext<'a> {
    page_height: f32,
    names: &'a ResourceNames,
    content: Content,
    state: PageRenderState,
}

/// Draws every element of `page`. Elements that reference an unknown font or
/// image are skipped with a warning.
pub fn render_page(page: &LaidOutPage, page_height: f32, names: &ResourceNames) -> Content {
    let mut ctx = PageContext {
        page_height,
        names,
        content: Content { operations: Vec::new() },
        state: PageRenderState::default(),
    };
    for element in &page.elements {
        ctx.draw_element(element);
    }
    ctx.content
}

fn rgb(color: Color) -> Vec<Object> {
    color.to_unit().into_iter().map(Object::from).collect()
}

impl PageContext<'_> {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn draw_element(&mut self, el: &PositionedElement) {
        match &el.kind {
            ElementKind::Text(text) => self.draw_text(text, el),
            ElementKind::Line { color, thickness } => self.draw_line(*color, *thickness, el),
            ElementKind::Image { src } => self.draw_image(src, el),
        }
    }

    fn set_font(&mut self, name: &str, size: f32) {
        let wanted = (name.to_string(), size);
        if self.state.font.as_ref() != Some(&wanted) {
            self.push("Tf", vec![Object::Name(name.as_bytes().to_vec()), size.into()]);
            self.state.font = Some(wanted);
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            self.push("rg", rgb(color));
            self.state.fill_color = Some(color);
        }
    }

    fn draw_text(&mut self, text: &TextFragment, el: &PositionedElement) {
        if text.text.trim().is_empty() {
            return;
        }
        let Some(font_name) = self.names.fonts.get(&text.font) else {
            log::warn!("No font resource for {:?}, skipping text", text.font);
            return;
        };
        let font_name = font_name.clone();

        self.push("BT", vec![]);
        // Tf state does not survive ET.
        self.state.font = None;
        self.set_font(&font_name, text.size);
        self.set_fill_color(text.color);
        let pdf_y = self.page_height - (el.y + text.baseline);
        self.push("Td", vec![el.x.into(), pdf_y.into()]);
        self.push(
            "Tj",
            vec![Object::String(encoding::encode(&text.text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    fn draw_line(&mut self, color: Color, thickness: f32, el: &PositionedElement) {
        if self.state.line_width != Some(thickness) {
            self.push("w", vec![thickness.into()]);
            self.state.line_width = Some(thickness);
        }
        if self.state.stroke_color != Some(color) {
            self.push("RG", rgb(color));
            self.state.stroke_color = Some(color);
        }
        let y1 = self.page_height - el.y;
        let y2 = self.page_height - (el.y + el.height);
        self.push("m", vec![el.x.into(), y1.into()]);
        self.push("l", vec![(el.x + el.width).into(), y2.into()]);
        self.push("S", vec![]);
    }

    fn draw_image(&mut self, src: &str, el: &PositionedElement) {
        let Some(name) = self.names.images.get(src) else {
            log::warn!("Image resource not found in document, skipping render: {}", src);
            return;
        };
        let name = name.clone();
        let y = self.page_height - (el.y + el.height);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                el.width.into(),
                0.0.into(),
                0.0.into(),
                el.height.into(),
                el.x.into(),
                y.into(),
            ],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
    }
}
