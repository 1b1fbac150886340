//! The bundled example document written by the `folio` binary.

use crate::component::builders::*;
use crate::component::{ComponentTree, Context, Node, Props};
use crate::config::Config;
use crate::renderer::RenderError;
use folio_layout::FontDescriptor;
use serde_json::json;
use std::path::Path;

/// Font family the sample uses unless the config sets `font`.
pub const SAMPLE_FONT: &str = "OpenSans";

/// Standard family the sample switches to when [`SAMPLE_FONT`] is not installed.
pub const FALLBACK_FONT: &str = "Helvetica";

/// Font files for [`SAMPLE_FONT`], relative to the font directory.
pub fn open_sans() -> FontDescriptor {
    FontDescriptor::new("OpenSans-Regular.ttf")
        .with_bold("OpenSans-Bold.ttf")
        .with_italics("OpenSans-Italic.ttf")
        .with_bolditalics("OpenSans-BoldItalic.ttf")
}

/// [`open_sans`] if its regular face is present in `font_dir`.
pub fn installed_fonts(font_dir: &Path) -> Option<FontDescriptor> {
    let fonts = open_sans();
    font_dir.join(&fonts.normal).is_file().then_some(fonts)
}

/// Builds the example document. The footer shows `copyrightYear` from the config.
pub fn sample_document(config: &Config) -> ComponentTree {
    let font = config
        .get("font")
        .and_then(|v| v.as_str())
        .unwrap_or(SAMPLE_FONT);

    document()
        .prop("pageSize", "A4")
        .prop("pageMargins", json!([40, 60, 40, 60]))
        .prop("info", json!({"title": "folio example", "author": "folio"}))
        .prop("defaultStyle", json!({"font": font, "fontSize": 11, "lineHeight": 1.2}))
        .prop(
            "styles",
            json!({
                "title": {"fontSize": 22, "bold": true, "margin": [0, 0, 0, 12]},
                "heading": {"fontSize": 14, "bold": true, "margin": [0, 14, 0, 6]},
                "muted": {"color": "#777777", "fontSize": 9}
            }),
        )
        .child(header().child(text("folio example").style("muted").alignment("right")))
        .child(content().child(component(body)))
        .child(footer().child(
            text("© {{copyrightYear}} folio. Page {{currentPage}} of {{pageCount}}")
                .style("muted")
                .alignment("center"),
        ))
        .into_tree()
}

fn body(_: &Props, _: Vec<Node>, ctx: &mut Context) -> Result<Node, RenderError> {
    ctx.set("product", "folio");
    Ok(stack()
        .child(text("Generating PDFs from components").style("title"))
        .child(
            text(
                "This document was described as a tree of components, rendered to a \
                 document model and serialized to PDF by {{product}}. Text is wrapped \
                 and paginated using the metrics of the embedded fonts.",
            )
            .alignment("justify"),
        )
        .child(text("Features").style("heading"))
        .child(
            ul().child("Styles by name, merged with inline props")
                .child(
                    rich_text()
                        .child("Inline runs in ")
                        .child(text("bold").bold())
                        .child(" and ")
                        .child(text("italics").italics()),
                )
                .child("Page headers and footers with page numbers"),
        )
        .child(text("Columns").style("heading"))
        .child(
            columns()
                .child(text("A fixed-width column on the left.").width(150))
                .child(text(
                    "A column that takes the remaining space and wraps its text \
                     across several lines when it does not fit.",
                )),
        )
        .child(text("Table").style("heading"))
        .child(
            table()
                .prop("widths", json!(["*", 60, 80]))
                .prop("headerRows", 1)
                .prop("layout", "lightHorizontalLines")
                .child(
                    row()
                        .child(cell().child(text("Item").bold()))
                        .child(cell().child(text("Qty").bold().alignment("right")))
                        .child(cell().child(text("Price").bold().alignment("right"))),
                )
                .children(
                    [("Paper", 2, "4.00"), ("Ink", 1, "12.50"), ("Binding", 3, "7.25")]
                        .into_iter()
                        .map(|(item, qty, price)| {
                            row()
                                .child(cell().child(item))
                                .child(cell().child(text(qty.to_string()).alignment("right")))
                                .child(cell().child(text(price).alignment("right")))
                        }),
                ),
        )
        .into())
}
