//! Turns a [`ComponentTree`] into a [`DocumentModel`].
//!
//! Rendering runs in two passes. Expansion calls every component, flattens
//! fragments and interpolates body text against the context. Conversion then
//! checks the expanded element tree and maps each element to model blocks.

mod error;
mod props;

pub use error::RenderError;

use crate::component::{Component, ComponentRegistry, ComponentTree, Context, Node, Props, Tag};
use crate::config::Config;
use folio_model::{
    Block, BlockKind, Column, Columns, DocumentModel, Image, List, Margins, PageRegion,
    SizeSpec, Table, TextRun, TextStyle,
};
use handlebars::Handlebars;
use itertools::Itertools;
use props::PropReader;
use serde_json::Value;
use std::collections::BTreeMap;

/// How many components may expand inside one another before rendering gives up.
pub const MAX_COMPONENT_DEPTH: usize = 256;

const DEFAULT_COLUMN_GAP: f32 = 10.0;

/// Renders component trees using the built-in elements plus the components
/// of a [`ComponentRegistry`].
#[derive(Debug, Clone, Default)]
pub struct JsxRenderer {
    registry: ComponentRegistry,
}

impl JsxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: ComponentRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn render(&self, tree: ComponentTree, config: &Config) -> Result<DocumentModel, RenderError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        let expander = Expander {
            registry: &self.registry,
            handlebars,
        };
        let mut roots = Vec::new();
        expander.expand(tree.into_root(), &Context::from(config), 0, Scope::Body, &mut roots)?;

        let model = ModelBuilder::default().document(roots)?;
        log::debug!(
            "Rendered document model with {} content blocks",
            model.content.len()
        );
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{}", serde_json::to_string(&model).unwrap_or_default());
        }
        Ok(model)
    }
}

/// A node after component expansion: only elements and text remain.
#[derive(Debug)]
enum Resolved {
    Element(ResolvedElement),
    /// Text with the context it was produced under, kept only for page
    /// region text whose context differs from the region's.
    Text(String, Option<Value>),
}

impl Resolved {
    fn is_blank(&self) -> bool {
        matches!(self, Resolved::Text(t, _) if t.trim().is_empty())
    }
}

/// Where expanded text ends up.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    /// Interpolated once, against the current context.
    Body,
    /// Interpolated per page by the layout engine, against the region's data.
    Region(&'a Value),
}

#[derive(Debug)]
struct ResolvedElement {
    tag: Tag,
    props: Props,
    children: Vec<Resolved>,
    /// Context captured for page regions, whose text is interpolated per page.
    data: Option<Value>,
}

struct Expander<'a> {
    registry: &'a ComponentRegistry,
    handlebars: Handlebars<'static>,
}

impl Expander<'_> {
    fn expand(
        &self,
        node: Node,
        ctx: &Context,
        depth: usize,
        scope: Scope<'_>,
        out: &mut Vec<Resolved>,
    ) -> Result<(), RenderError> {
        match node {
            Node::Empty => Ok(()),
            Node::Text(text) => {
                let resolved = match scope {
                    Scope::Body => Resolved::Text(self.interpolate(text, ctx)?, None),
                    Scope::Region(region) if text.contains("{{") => {
                        let own = ctx.to_value();
                        let own = (own != *region).then_some(own);
                        Resolved::Text(text, own)
                    }
                    Scope::Region(_) => Resolved::Text(text, None),
                };
                out.push(resolved);
                Ok(())
            }
            Node::Fragment(nodes) => nodes
                .into_iter()
                .try_for_each(|node| self.expand(node, ctx, depth, scope, out)),
            Node::Element {
                tag,
                props,
                children,
            } => {
                let data = matches!(tag, Tag::Header | Tag::Footer).then(|| ctx.to_value());
                let inner = data.as_ref().map_or(scope, Scope::Region);
                let mut resolved = Vec::with_capacity(children.len());
                for child in children {
                    self.expand(child, ctx, depth, inner, &mut resolved)?;
                }
                out.push(Resolved::Element(ResolvedElement {
                    tag,
                    props,
                    children: resolved,
                    data,
                }));
                Ok(())
            }
            Node::Component {
                component,
                props,
                children,
            } => self.render_component(component.as_ref(), &props, children, ctx, depth, scope, out),
            Node::Named {
                name,
                props,
                children,
            } => {
                let Some(component) = self.registry.get(&name) else {
                    log::debug!(
                        "Registered components: [{}]",
                        self.registry.names().join(", ")
                    );
                    return Err(RenderError::UnknownComponent(name));
                };
                self.render_component(component.as_ref(), &props, children, ctx, depth, scope, out)
            }
        }
    }

    /// Calls `component` under a copy of `ctx` and expands what it returns.
    #[allow(clippy::too_many_arguments)]
    fn render_component(
        &self,
        component: &dyn Component,
        props: &Props,
        children: Vec<Node>,
        ctx: &Context,
        depth: usize,
        scope: Scope<'_>,
        out: &mut Vec<Resolved>,
    ) -> Result<(), RenderError> {
        let depth = Self::descend(depth)?;
        let mut scoped = ctx.clone();
        let rendered = component.render(props, children, &mut scoped)?;
        self.expand(rendered, &scoped, depth, scope, out)
    }

    fn descend(depth: usize) -> Result<usize, RenderError> {
        if depth >= MAX_COMPONENT_DEPTH {
            return Err(RenderError::RecursionLimit(MAX_COMPONENT_DEPTH));
        }
        Ok(depth + 1)
    }

    fn interpolate(&self, text: String, ctx: &Context) -> Result<String, RenderError> {
        if !text.contains("{{") {
            return Ok(text);
        }
        self.handlebars
            .render_template(&text, &ctx.to_value())
            .map_err(|e| RenderError::Template {
                text,
                message: e.to_string(),
            })
    }
}

/// A named style from the document's `styles` prop.
#[derive(Debug, Clone, Default)]
struct NamedStyle {
    text: TextStyle,
    margin: Option<Margins>,
}

#[derive(Default)]
struct ModelBuilder {
    styles: BTreeMap<String, NamedStyle>,
}

impl ModelBuilder {
    fn document(mut self, roots: Vec<Resolved>) -> Result<DocumentModel, RenderError> {
        let mut elements = roots.into_iter().filter(|r| !r.is_blank());
        let root = match (elements.next(), elements.next()) {
            (Some(Resolved::Element(root)), None) if root.tag == Tag::Document => root,
            (Some(Resolved::Element(other)), None) => {
                return Err(RenderError::Malformed(format!(
                    "the root must be a <document> element, found <{}>",
                    other.tag
                )));
            }
            (None, _) => {
                return Err(RenderError::Malformed("the tree rendered nothing".into()));
            }
            _ => {
                return Err(RenderError::Malformed(
                    "the tree must render exactly one <document> element".into(),
                ));
            }
        };

        let reader = PropReader::new(Tag::Document, &root.props);
        let mut model = DocumentModel::default();
        if let Some(size) = reader.page_size("pageSize")? {
            model.page_size = size;
        }
        if let Some(orientation) = reader.orientation("pageOrientation")? {
            model.page_size = model.page_size.oriented(orientation);
        }
        if let Some(margins) = reader.margins("pageMargins")? {
            model.page_margins = margins;
        }
        model.info = reader.info("info")?;
        if let Some(value) = reader.get("defaultStyle") {
            model.default_style = style_object(value, "defaultStyle")?.text;
        }
        if let Some(value) = reader.get("styles") {
            let styles = value
                .as_object()
                .ok_or_else(|| RenderError::invalid_prop("document", "styles", "an object"))?;
            for (name, style) in styles {
                self.styles.insert(name.clone(), style_object(style, "styles")?);
            }
        }

        let mut content = None;
        for child in root.children {
            let element = match child {
                Resolved::Element(element) => element,
                text if text.is_blank() => continue,
                Resolved::Text(..) => return Err(RenderError::misplaced("text", "document")),
            };
            let slot = match element.tag {
                Tag::Header => model.header.is_some(),
                Tag::Footer => model.footer.is_some(),
                Tag::Content => content.is_some(),
                other => return Err(RenderError::misplaced(other.name(), "document")),
            };
            if slot {
                return Err(RenderError::Malformed(format!(
                    "<document> has more than one <{}>",
                    element.tag
                )));
            }
            match element.tag {
                Tag::Header => model.header = Some(self.region(element)?),
                Tag::Footer => model.footer = Some(self.region(element)?),
                _ => content = Some(self.region_blocks(element)?),
            }
        }
        model.content = content
            .ok_or_else(|| RenderError::Malformed("<document> requires a <content> element".into()))?;
        Ok(model)
    }

    fn region(&self, element: ResolvedElement) -> Result<PageRegion, RenderError> {
        let data = element.data.clone().unwrap_or(Value::Null);
        Ok(PageRegion {
            blocks: self.region_blocks(element)?,
            data,
        })
    }

    /// Blocks of a header, footer or content element. The element's own
    /// style only costs a wrapping stack when it sets something.
    fn region_blocks(&self, element: ResolvedElement) -> Result<Vec<Block>, RenderError> {
        let block = self.block(element)?;
        match block {
            Block {
                kind: BlockKind::Stack(children),
                style,
                margin,
                page_break: None,
            } if style.is_empty() && margin == Margins::default() => Ok(children),
            wrapped => Ok(vec![wrapped]),
        }
    }

    /// Named styles from `style`, then inline props on top.
    fn element_style(
        &self,
        reader: &PropReader<'_>,
        tag: Tag,
    ) -> Result<(TextStyle, Option<Margins>), RenderError> {
        let mut style = TextStyle::default();
        let mut margin = None;
        for name in reader.style_names("style")? {
            match self.styles.get(name) {
                Some(named) => {
                    style = style.merge(&named.text);
                    margin = named.margin.or(margin);
                }
                None => log::warn!("Unknown style '{}' on <{}>, ignoring", name, tag),
            }
        }
        style = style.merge(&reader.text_style()?);
        Ok((style, reader.margins("margin")?.or(margin)))
    }

    fn block(&self, element: ResolvedElement) -> Result<Block, RenderError> {
        let reader = PropReader::new(element.tag, &element.props);
        let (style, margin) = self.element_style(&reader, element.tag)?;
        let page_break = reader.page_break("pageBreak")?;

        let kind = match element.tag {
            Tag::Text => BlockKind::Paragraph(self.runs(element.children, &TextStyle::default())?),
            Tag::Stack | Tag::Content | Tag::Header | Tag::Footer | Tag::Cell => {
                BlockKind::Stack(self.blocks(element.children, element.tag)?)
            }
            Tag::Columns => {
                let gap = reader.non_negative("columnGap")?.unwrap_or(DEFAULT_COLUMN_GAP);
                BlockKind::Columns(Columns {
                    columns: self.columns(element.children)?,
                    gap,
                })
            }
            Tag::Table => BlockKind::Table(self.table(&reader, element.children)?),
            Tag::Image => {
                if element.children.iter().any(|c| !c.is_blank()) {
                    return Err(RenderError::Malformed("<image> cannot have children".into()));
                }
                let src = reader
                    .string("src")?
                    .ok_or_else(|| RenderError::invalid_prop("image", "src", "a resource path"))?;
                BlockKind::Image(Image {
                    src: src.to_string(),
                    width: reader.positive("width")?,
                    height: reader.positive("height")?,
                })
            }
            Tag::Ol | Tag::Ul => BlockKind::List(List {
                ordered: element.tag == Tag::Ol,
                items: self.blocks(element.children, element.tag)?,
            }),
            Tag::Document | Tag::Row => {
                return Err(RenderError::misplaced(element.tag.name(), "a block container"));
            }
        };

        Ok(Block {
            kind,
            style,
            margin: margin.unwrap_or_default(),
            page_break,
        })
    }

    /// Children of a block container. Bare strings become paragraphs.
    fn blocks(&self, children: Vec<Resolved>, parent: Tag) -> Result<Vec<Block>, RenderError> {
        let mut blocks = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Resolved::Text(text, _) if text.trim().is_empty() => {}
                Resolved::Text(text, data) => blocks.push(paragraph(text, data)),
                Resolved::Element(element) => {
                    if matches!(
                        element.tag,
                        Tag::Document | Tag::Header | Tag::Content | Tag::Footer | Tag::Row | Tag::Cell
                    ) {
                        return Err(RenderError::misplaced(element.tag.name(), parent.name()));
                    }
                    blocks.push(self.block(element)?);
                }
            }
        }
        Ok(blocks)
    }

    /// Inline runs of a `text` element. Nested `text` elements layer their
    /// style over the enclosing run's style.
    fn runs(&self, children: Vec<Resolved>, inherited: &TextStyle) -> Result<Vec<TextRun>, RenderError> {
        let mut runs = Vec::new();
        for child in children {
            match child {
                Resolved::Text(text, _) if text.is_empty() => {}
                Resolved::Text(text, data) => runs.push(TextRun {
                    text,
                    style: inherited.clone(),
                    data,
                }),
                Resolved::Element(element) if element.tag == Tag::Text => {
                    let reader = PropReader::new(Tag::Text, &element.props);
                    let (style, _) = self.element_style(&reader, Tag::Text)?;
                    runs.extend(self.runs(element.children, &inherited.merge(&style))?);
                }
                Resolved::Element(element) => {
                    return Err(RenderError::misplaced(element.tag.name(), "text"));
                }
            }
        }
        Ok(runs)
    }

    fn columns(&self, children: Vec<Resolved>) -> Result<Vec<Column>, RenderError> {
        let mut columns = Vec::with_capacity(children.len());
        for child in children {
            let column = match child {
                Resolved::Text(text, _) if text.trim().is_empty() => continue,
                Resolved::Text(text, data) => Column {
                    width: SizeSpec::Star,
                    block: paragraph(text, data),
                },
                Resolved::Element(element) => {
                    if matches!(
                        element.tag,
                        Tag::Document | Tag::Header | Tag::Content | Tag::Footer | Tag::Row | Tag::Cell
                    ) {
                        return Err(RenderError::misplaced(element.tag.name(), "columns"));
                    }
                    let width = PropReader::new(element.tag, &element.props)
                        .size_spec("width")?
                        .unwrap_or(SizeSpec::Star);
                    Column {
                        width,
                        block: self.block(element)?,
                    }
                }
            };
            columns.push(column);
        }
        Ok(columns)
    }

    fn table(&self, reader: &PropReader<'_>, children: Vec<Resolved>) -> Result<Table, RenderError> {
        let mut rows = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Resolved::Text(text, _) if text.trim().is_empty() => {}
                Resolved::Text(..) => return Err(RenderError::misplaced("text", "table")),
                Resolved::Element(row) if row.tag == Tag::Row => rows.push(self.row(row)?),
                Resolved::Element(other) => {
                    return Err(RenderError::misplaced(other.tag.name(), "table"));
                }
            }
        }

        let cells = rows.first().map(Vec::len).unwrap_or(0);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cells) {
            return Err(RenderError::Malformed(format!(
                "table row {} has {} cells, expected {}",
                i + 1,
                row.len(),
                cells
            )));
        }

        let widths = reader.size_specs("widths")?.unwrap_or_default();
        if !rows.is_empty() && !widths.is_empty() && widths.len() != cells {
            return Err(RenderError::Malformed(format!(
                "table declares {} widths but its rows have {} cells",
                widths.len(),
                cells
            )));
        }
        let header_rows = reader.count("headerRows")?.unwrap_or(0);
        if header_rows > rows.len() {
            return Err(RenderError::invalid_prop(
                "table",
                "headerRows",
                "at most the number of rows",
            ));
        }

        Ok(Table {
            widths,
            header_rows,
            layout: reader.table_layout("layout")?.unwrap_or_default(),
            rows,
        })
    }

    fn row(&self, row: ResolvedElement) -> Result<Vec<Block>, RenderError> {
        let mut cells = Vec::with_capacity(row.children.len());
        for child in row.children {
            match child {
                Resolved::Text(text, _) if text.trim().is_empty() => {}
                Resolved::Text(text, data) => cells.push(paragraph(text, data)),
                Resolved::Element(cell) if cell.tag == Tag::Cell => cells.push(self.block(cell)?),
                Resolved::Element(other) => {
                    return Err(RenderError::misplaced(other.tag.name(), "row"));
                }
            }
        }
        Ok(cells)
    }
}

/// A bare string as a paragraph of one run.
fn paragraph(text: String, data: Option<Value>) -> Block {
    let run = TextRun::plain(text);
    Block::new(BlockKind::Paragraph(vec![match data {
        Some(data) => run.with_data(data),
        None => run,
    }]))
}

/// Parses a style object such as an entry of `styles` or `defaultStyle`.
fn style_object(value: &Value, prop: &str) -> Result<NamedStyle, RenderError> {
    let props: Props = value
        .as_object()
        .ok_or_else(|| RenderError::invalid_prop("document", prop, "an object of style props"))?
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let reader = PropReader::new(Tag::Document, &props);
    Ok(NamedStyle {
        text: reader.text_style()?,
        margin: reader.margins("margin")?,
    })
}
