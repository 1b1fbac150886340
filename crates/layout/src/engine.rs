//! Block layout and pagination.
//!
//! Blocks are first turned into a stream of [`Flow`] items (unbreakable
//! fragments, vertical spacing, forced breaks and table boundaries). The
//! [`Paginator`] then places that stream onto pages. Containers whose
//! children must stay side by side (columns, table cells, page regions)
//! collapse their children's flows into a single fragment.

use crate::elements::{ElementKind, LaidOutDocument, LaidOutPage, PositionedElement, TextFragment};
use crate::fonts::{FontKey, FontRegistry, LoadedFont};
use crate::image::ImageData;
use crate::text::{self, MeasuredRun};
use crate::LayoutError;
use folio_model::{
    Block, BlockKind, Color, Columns, DocumentModel, List, PageBreak, PageRegion, SizeSpec, Table,
    TableLayout, TextRun, TextStyle,
};
use folio_traits::ResourceProvider;
use handlebars::Handlebars;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

const EPSILON: f32 = 0.01;
const CELL_PADDING_X: f32 = 4.0;
const CELL_PADDING_Y: f32 = 2.0;
const LIST_INDENT_EMS: f32 = 1.5;
const GRID_LINE: f32 = 1.0;
const LIGHT_LINE: f32 = 0.5;
const LIGHT_LINE_COLOR: Color = Color::gray(170);

/// Lays out [`DocumentModel`]s with the fonts of one registry.
pub struct LayoutEngine<'a> {
    fonts: &'a FontRegistry,
    resources: &'a dyn ResourceProvider,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(fonts: &'a FontRegistry, resources: &'a dyn ResourceProvider) -> Self {
        Self { fonts, resources }
    }

    pub fn layout(&self, model: &DocumentModel) -> Result<LaidOutDocument, LayoutError> {
        self.fonts.check(model.referenced_fonts().iter())?;

        let mut pass = LayoutPass {
            fonts: self.fonts,
            resources: self.resources,
            used_fonts: BTreeMap::new(),
            images: BTreeMap::new(),
        };

        let margins = model.page_margins;
        let content_width = (model.page_size.width - margins.horizontal()).max(0.0);
        let content_height = (model.page_size.height - margins.vertical()).max(0.0);

        let mut flows = Vec::new();
        for block in &model.content {
            flows.extend(pass.layout_block(block, &model.default_style, margins.left, content_width)?);
        }

        let mut paginator = Paginator::new(margins.top, content_height);
        for flow in flows {
            paginator.push(flow);
        }
        let mut pages = paginator.finish();

        let page_count = pages.len();
        let page_templates = PageTemplates::new();
        for page in &mut pages {
            if let Some(header) = &model.header {
                let fragment = pass.layout_region(
                    header,
                    &page_templates,
                    page.number,
                    page_count,
                    &model.default_style,
                    margins.left,
                    content_width,
                )?;
                let y = ((margins.top - fragment.height) / 2.0).max(0.0);
                page.elements.extend(fragment.into_elements(0.0, y));
            }
            if let Some(footer) = &model.footer {
                let fragment = pass.layout_region(
                    footer,
                    &page_templates,
                    page.number,
                    page_count,
                    &model.default_style,
                    margins.left,
                    content_width,
                )?;
                let top = model.page_size.height - margins.bottom;
                let y = top + ((margins.bottom - fragment.height) / 2.0).max(0.0);
                page.elements.extend(fragment.into_elements(0.0, y));
            }
        }

        log::debug!(
            "Laid out {} pages using {} font faces and {} images",
            page_count,
            pass.used_fonts.len(),
            pass.images.len()
        );

        Ok(LaidOutDocument {
            page_size: model.page_size,
            pages,
            fonts: pass.used_fonts,
            images: pass.images,
        })
    }
}

/// A piece of content that cannot be split. Element `y` is relative to the
/// fragment's top; `x` is absolute.
#[derive(Debug, Clone, Default)]
struct Fragment {
    height: f32,
    elements: Vec<PositionedElement>,
}

impl Fragment {
    fn into_elements(self, dx: f32, dy: f32) -> impl Iterator<Item = PositionedElement> {
        self.elements.into_iter().map(move |mut e| {
            e.translate(dx, dy);
            e
        })
    }

    /// Baseline of the topmost text, relative to the fragment's top.
    fn first_baseline(&self) -> Option<f32> {
        self.elements
            .iter()
            .filter_map(|e| match &e.kind {
                ElementKind::Text(t) => Some(e.y + t.baseline),
                _ => None,
            })
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[derive(Debug, Clone)]
enum Flow {
    Box(Fragment),
    Space(f32),
    Break,
    /// Start of a table; its header rows repeat on every page the table spans.
    TableStart(Vec<Fragment>),
    TableEnd,
}

/// Collapses a flow stream into one fragment, ignoring forced breaks.
fn stack_flows(flows: Vec<Flow>) -> Fragment {
    let mut stacked = Fragment::default();
    for flow in flows {
        match flow {
            Flow::Box(fragment) => {
                let y = stacked.height;
                stacked.height += fragment.height;
                stacked.elements.extend(fragment.into_elements(0.0, y));
            }
            Flow::Space(space) => stacked.height += space,
            Flow::TableStart(headers) => {
                for fragment in headers {
                    let y = stacked.height;
                    stacked.height += fragment.height;
                    stacked.elements.extend(fragment.into_elements(0.0, y));
                }
            }
            Flow::Break => log::debug!("Ignoring page break inside a nested container"),
            Flow::TableEnd => {}
        }
    }
    stacked
}

struct LayoutPass<'a> {
    fonts: &'a FontRegistry,
    resources: &'a dyn ResourceProvider,
    used_fonts: BTreeMap<FontKey, Arc<LoadedFont>>,
    images: BTreeMap<String, Arc<ImageData>>,
}

impl LayoutPass<'_> {
    fn measured_run(&mut self, text: &str, style: &TextStyle) -> Result<MeasuredRun, LayoutError> {
        let resolved = style.resolve();
        let (key, font) = self.fonts.resolve(&resolved.font, resolved.bold, resolved.italics)?;
        self.used_fonts.entry(key.clone()).or_insert_with(|| font.clone());
        Ok(MeasuredRun::new(
            text,
            key,
            font,
            resolved.font_size,
            resolved.line_height,
            resolved.color,
        ))
    }

    fn layout_block(
        &mut self,
        block: &Block,
        inherited: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Vec<Flow>, LayoutError> {
        let style = inherited.merge(&block.style);
        let margin = block.margin;
        let inner_x = x + margin.left;
        let inner_width = (width - margin.horizontal()).max(0.0);

        let mut flows = Vec::new();
        if block.page_break == Some(PageBreak::Before) {
            flows.push(Flow::Break);
        }
        if margin.top > 0.0 {
            flows.push(Flow::Space(margin.top));
        }

        match &block.kind {
            BlockKind::Paragraph(runs) => {
                flows.extend(self.layout_paragraph(runs, &style, inner_x, inner_width)?)
            }
            BlockKind::Stack(children) => {
                for child in children {
                    flows.extend(self.layout_block(child, &style, inner_x, inner_width)?);
                }
            }
            BlockKind::Columns(columns) => {
                flows.push(Flow::Box(self.layout_columns(columns, &style, inner_x, inner_width)?))
            }
            BlockKind::Table(table) => {
                flows.extend(self.layout_table(table, &style, inner_x, inner_width)?)
            }
            BlockKind::Image(image) => {
                let data = self.load_image(&image.src)?;
                let (mut w, mut h) = data.scaled_size(image.width, image.height);
                if w > inner_width && w > 0.0 {
                    h *= inner_width / w;
                    w = inner_width;
                }
                flows.push(Flow::Box(Fragment {
                    height: h,
                    elements: vec![PositionedElement {
                        x: inner_x,
                        y: 0.0,
                        width: w,
                        height: h,
                        kind: ElementKind::Image {
                            src: image.src.clone(),
                        },
                    }],
                }));
            }
            BlockKind::List(list) => {
                flows.extend(self.layout_list(list, &style, inner_x, inner_width)?)
            }
        }

        if margin.bottom > 0.0 {
            flows.push(Flow::Space(margin.bottom));
        }
        if block.page_break == Some(PageBreak::After) {
            flows.push(Flow::Break);
        }
        Ok(flows)
    }

    fn layout_paragraph(
        &mut self,
        runs: &[TextRun],
        style: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Vec<Flow>, LayoutError> {
        let measured = runs
            .iter()
            .map(|run| self.measured_run(&run.text, &style.merge(&run.style)))
            .collect::<Result<Vec<_>, _>>()?;

        let lines = text::break_lines(&measured, width, style.resolve().alignment);
        if lines.is_empty() {
            // Blank paragraphs still occupy one line.
            let height = measured.first().map(|r| r.line_height).unwrap_or(0.0);
            return Ok(vec![Flow::Box(Fragment {
                height,
                elements: Vec::new(),
            })]);
        }

        let flows = lines
            .into_iter()
            .map(|line| {
                let elements = line
                    .items
                    .iter()
                    .filter(|item| !item.is_space)
                    .map(|item| {
                        let run = &measured[item.run_index];
                        PositionedElement {
                            x: x + item.x,
                            y: 0.0,
                            width: item.width,
                            height: line.height,
                            kind: ElementKind::Text(TextFragment {
                                text: item.text.clone(),
                                font: run.font_key.clone(),
                                size: run.size,
                                color: run.color,
                                baseline: line.baseline,
                            }),
                        }
                    })
                    .collect();
                Flow::Box(Fragment {
                    height: line.height,
                    elements,
                })
            })
            .collect();
        Ok(flows)
    }

    fn layout_columns(
        &mut self,
        columns: &Columns,
        style: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Fragment, LayoutError> {
        let count = columns.columns.len();
        let gaps = columns.gap * count.saturating_sub(1) as f32;
        let specs: Vec<SizeSpec> = columns.columns.iter().map(|c| c.width).collect();
        let mut intrinsic = Vec::with_capacity(count);
        for column in &columns.columns {
            intrinsic.push(self.max_content_width(&column.block, style)?);
        }
        let widths = resolve_widths(&specs, (width - gaps).max(0.0), |i| intrinsic[i]);

        let mut row = Fragment::default();
        let mut column_x = x;
        for (column, column_width) in columns.columns.iter().zip(&widths) {
            let fragment = stack_flows(self.layout_block(&column.block, style, column_x, *column_width)?);
            row.height = row.height.max(fragment.height);
            row.elements.extend(fragment.elements);
            column_x += column_width + columns.gap;
        }
        Ok(row)
    }

    fn layout_table(
        &mut self,
        table: &Table,
        style: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Vec<Flow>, LayoutError> {
        let column_count = table.column_count();
        if column_count == 0 || table.rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut specs = table.widths.clone();
        specs.resize(column_count, SizeSpec::Star);

        let mut intrinsic: Vec<Option<f32>> = vec![Some(0.0); column_count];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate().take(column_count) {
                let measured = self.max_content_width(cell, style)?;
                intrinsic[i] = match (intrinsic[i], measured) {
                    (Some(a), Some(b)) => Some(a.max(b + 2.0 * CELL_PADDING_X)),
                    _ => None,
                };
            }
        }
        let widths = resolve_widths(&specs, width, |i| intrinsic[i]);
        let table_width: f32 = widths.iter().sum();
        let header_rows = table.header_rows.min(table.rows.len());
        let last_row = table.rows.len() - 1;

        let mut headers = Vec::with_capacity(header_rows);
        let mut body = Vec::with_capacity(table.rows.len() - header_rows);
        for (row_index, row) in table.rows.iter().enumerate() {
            let mut fragment = Fragment::default();
            let mut cell_x = x;
            let mut content_height: f32 = 0.0;
            for (cell, cell_width) in row.iter().zip(&widths) {
                let inner = (cell_width - 2.0 * CELL_PADDING_X).max(0.0);
                let cell_fragment =
                    stack_flows(self.layout_block(cell, style, cell_x + CELL_PADDING_X, inner)?);
                content_height = content_height.max(cell_fragment.height);
                fragment
                    .elements
                    .extend(cell_fragment.into_elements(0.0, CELL_PADDING_Y));
                cell_x += cell_width;
            }
            fragment.height = content_height + 2.0 * CELL_PADDING_Y;

            let is_last_header = header_rows > 0 && row_index + 1 == header_rows;
            draw_row_borders(
                &mut fragment,
                table.layout,
                x,
                &widths,
                table_width,
                is_last_header,
                row_index == last_row,
            );

            if row_index < header_rows {
                headers.push(fragment);
            } else {
                body.push(Flow::Box(fragment));
            }
        }

        let mut flows = Vec::with_capacity(body.len() + 2);
        flows.push(Flow::TableStart(headers));
        flows.extend(body);
        flows.push(Flow::TableEnd);
        Ok(flows)
    }

    fn layout_list(
        &mut self,
        list: &List,
        style: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Vec<Flow>, LayoutError> {
        let resolved = style.resolve();
        let indent = resolved.font_size * LIST_INDENT_EMS;
        let mut flows = Vec::new();

        for (index, item) in list.items.iter().enumerate() {
            let marker_text = if list.ordered {
                format!("{}.", index + 1)
            } else {
                "\u{2022}".to_string()
            };
            let marker_run = self.measured_run(&marker_text, style)?;
            let marker_width = marker_run.font.metrics.text_width(&marker_text, marker_run.size);

            let mut item_flows =
                self.layout_block(item, style, x + indent, (width - indent).max(0.0))?;
            let first_box = item_flows.iter_mut().find_map(|flow| match flow {
                Flow::Box(fragment) => Some(fragment),
                _ => None,
            });
            let marker_top = first_box
                .as_ref()
                .and_then(|fragment| fragment.first_baseline())
                .map(|baseline| baseline - marker_run.baseline_offset)
                .unwrap_or(0.0);
            let marker = PositionedElement {
                x,
                y: marker_top,
                width: marker_width,
                height: marker_run.line_height,
                kind: ElementKind::Text(TextFragment {
                    text: marker_text,
                    font: marker_run.font_key.clone(),
                    size: marker_run.size,
                    color: marker_run.color,
                    baseline: marker_run.baseline_offset,
                }),
            };

            match first_box {
                Some(fragment) => {
                    fragment.height = fragment.height.max(marker_top + marker_run.line_height);
                    fragment.elements.push(marker);
                }
                None => item_flows.push(Flow::Box(Fragment {
                    height: marker_run.line_height,
                    elements: vec![marker],
                })),
            }
            flows.extend(item_flows);
        }
        Ok(flows)
    }

    /// Widest unbroken content of a block, or `None` when it has no natural
    /// width and should share remaining space.
    fn max_content_width(
        &mut self,
        block: &Block,
        inherited: &TextStyle,
    ) -> Result<Option<f32>, LayoutError> {
        let style = inherited.merge(&block.style);
        let content = match &block.kind {
            BlockKind::Paragraph(runs) => {
                let measured = runs
                    .iter()
                    .map(|run| self.measured_run(&run.text, &style.merge(&run.style)))
                    .collect::<Result<Vec<_>, _>>()?;
                Some(text::max_content_width(&measured))
            }
            BlockKind::Stack(children) => {
                let mut widest: Option<f32> = Some(0.0);
                for child in children {
                    widest = match (widest, self.max_content_width(child, &style)?) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        _ => None,
                    };
                }
                widest
            }
            BlockKind::Image(image) => {
                let data = self.load_image(&image.src)?;
                Some(data.scaled_size(image.width, image.height).0)
            }
            BlockKind::Columns(_) | BlockKind::Table(_) | BlockKind::List(_) => None,
        };
        Ok(content.map(|w| w + block.margin.horizontal()))
    }

    fn load_image(&mut self, src: &str) -> Result<Arc<ImageData>, LayoutError> {
        if let Some(cached) = self.images.get(src) {
            return Ok(cached.clone());
        }
        let bytes = self
            .resources
            .load(src)
            .map_err(|source| LayoutError::ImageResource {
                src: src.to_string(),
                source,
            })?;
        let data = ImageData::probe_jpeg(bytes).map_err(|reason| LayoutError::UnsupportedImage {
            src: src.to_string(),
            reason,
        })?;
        log::debug!(
            "Loaded image '{}' ({}x{})",
            src,
            data.width_px,
            data.height_px
        );
        let data = Arc::new(data);
        self.images.insert(src.to_string(), data.clone());
        Ok(data)
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_region(
        &mut self,
        region: &PageRegion,
        templates: &PageTemplates,
        page_number: usize,
        page_count: usize,
        style: &TextStyle,
        x: f32,
        width: f32,
    ) -> Result<Fragment, LayoutError> {
        let data = templates.page_data(&region.data, page_number, page_count);
        let mut flows = Vec::new();
        for block in &region.blocks {
            let block = templates.interpolate_block(block, &data)?;
            flows.extend(self.layout_block(&block, style, x, width)?);
        }
        Ok(stack_flows(flows))
    }
}

fn draw_row_borders(
    fragment: &mut Fragment,
    layout: TableLayout,
    x: f32,
    widths: &[f32],
    table_width: f32,
    is_last_header: bool,
    is_last_row: bool,
) {
    let height = fragment.height;
    let mut line = |x: f32, y: f32, width: f32, height: f32, color: Color, thickness: f32| {
        fragment.elements.push(PositionedElement {
            x,
            y,
            width,
            height,
            kind: ElementKind::Line { color, thickness },
        });
    };

    match layout {
        TableLayout::NoBorders => {}
        TableLayout::Grid => {
            line(x, 0.0, table_width, 0.0, Color::BLACK, GRID_LINE);
            line(x, height, table_width, 0.0, Color::BLACK, GRID_LINE);
            let mut edge = x;
            line(edge, 0.0, 0.0, height, Color::BLACK, GRID_LINE);
            for width in widths {
                edge += width;
                line(edge, 0.0, 0.0, height, Color::BLACK, GRID_LINE);
            }
        }
        TableLayout::LightHorizontalLines => {
            if is_last_header {
                line(x, height, table_width, 0.0, Color::BLACK, GRID_LINE);
            } else if !is_last_row {
                line(x, height, table_width, 0.0, LIGHT_LINE_COLOR, LIGHT_LINE);
            }
        }
    }
}

/// Distributes `available` width over column specs.
///
/// Fixed and percentage columns take their size first, auto columns take
/// their measured content width (bounded by what is left), and star columns
/// split the remainder equally. Auto columns without a measurement behave
/// like star columns.
pub fn resolve_widths(
    specs: &[SizeSpec],
    available: f32,
    measure: impl Fn(usize) -> Option<f32>,
) -> Vec<f32> {
    let mut widths = vec![0.0; specs.len()];
    let mut remaining = available;
    let mut stars = Vec::new();
    let mut autos = Vec::new();

    for (i, spec) in specs.iter().enumerate() {
        match spec {
            SizeSpec::Fixed(w) => {
                widths[i] = w.max(0.0);
                remaining -= widths[i];
            }
            SizeSpec::Percent(p) => {
                widths[i] = (available * p / 100.0).max(0.0);
                remaining -= widths[i];
            }
            SizeSpec::Auto => autos.push(i),
            SizeSpec::Star => stars.push(i),
        }
    }

    for i in autos {
        match measure(i) {
            Some(content) => {
                widths[i] = content.min(remaining.max(0.0));
                remaining -= widths[i];
            }
            None => stars.push(i),
        }
    }

    if !stars.is_empty() {
        let share = remaining.max(0.0) / stars.len() as f32;
        for i in stars {
            widths[i] = share;
        }
    }
    widths
}

struct Paginator {
    content_top: f32,
    content_height: f32,
    pages: Vec<Vec<PositionedElement>>,
    current: Vec<PositionedElement>,
    cursor: f32,
    after_break: bool,
    table_headers: Option<Vec<Fragment>>,
}

impl Paginator {
    fn new(content_top: f32, content_height: f32) -> Self {
        Self {
            content_top,
            content_height,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
            after_break: false,
            table_headers: None,
        }
    }

    fn is_page_empty(&self) -> bool {
        self.cursor <= EPSILON && self.current.is_empty()
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
        self.after_break = true;
        if let Some(headers) = self.table_headers.clone() {
            for fragment in headers {
                self.put(fragment);
            }
        }
    }

    fn put(&mut self, fragment: Fragment) {
        let y = self.content_top + self.cursor;
        self.cursor += fragment.height;
        self.current.extend(fragment.into_elements(0.0, y));
    }

    fn place(&mut self, fragment: Fragment) {
        if self.cursor + fragment.height > self.content_height + EPSILON && !self.is_page_empty() {
            self.new_page();
        }
        if fragment.height > self.content_height + EPSILON {
            log::warn!(
                "Content of height {:.1}pt exceeds the page content height {:.1}pt and will be clipped",
                fragment.height,
                self.content_height
            );
        }
        self.put(fragment);
        self.after_break = false;
    }

    fn push(&mut self, flow: Flow) {
        match flow {
            Flow::Box(fragment) => self.place(fragment),
            Flow::Space(space) => {
                if !self.after_break {
                    self.cursor += space;
                }
            }
            Flow::Break => {
                if !self.is_page_empty() {
                    self.new_page();
                }
            }
            Flow::TableStart(headers) => {
                for fragment in &headers {
                    self.place(fragment.clone());
                }
                self.table_headers = Some(headers).filter(|h| !h.is_empty());
            }
            Flow::TableEnd => self.table_headers = None,
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.pages
            .into_iter()
            .enumerate()
            .map(|(i, elements)| LaidOutPage {
                number: i + 1,
                elements,
            })
            .collect()
    }
}

/// Evaluates header and footer text against per-page data.
struct PageTemplates {
    registry: Handlebars<'static>,
}

impl PageTemplates {
    fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    fn page_data(&self, data: &Value, page_number: usize, page_count: usize) -> Value {
        let mut map = match data {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        map.insert("currentPage".to_string(), Value::from(page_number));
        map.insert("pageCount".to_string(), Value::from(page_count));
        Value::Object(map)
    }

    /// `scope` with the page variables of already built page data.
    fn rescope(&self, scope: &Value, page_data: &Value) -> Value {
        let mut map = match scope {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for key in ["currentPage", "pageCount"] {
            if let Some(value) = page_data.get(key) {
                map.insert(key.to_string(), value.clone());
            }
        }
        Value::Object(map)
    }

    fn render(&self, text: &str, data: &Value) -> Result<String, LayoutError> {
        if !text.contains("{{") {
            return Ok(text.to_string());
        }
        self.registry
            .render_template(text, data)
            .map_err(|e| LayoutError::Template(e.to_string()))
    }

    fn interpolate_block(&self, block: &Block, data: &Value) -> Result<Block, LayoutError> {
        let kind = match &block.kind {
            BlockKind::Paragraph(runs) => BlockKind::Paragraph(
                runs.iter()
                    .map(|run| {
                        let text = match &run.data {
                            Some(scope) => self.render(&run.text, &self.rescope(scope, data))?,
                            None => self.render(&run.text, data)?,
                        };
                        Ok(TextRun {
                            text,
                            style: run.style.clone(),
                            data: None,
                        })
                    })
                    .collect::<Result<_, LayoutError>>()?,
            ),
            BlockKind::Stack(children) => BlockKind::Stack(self.interpolate_all(children, data)?),
            BlockKind::Columns(columns) => {
                let mut columns = columns.clone();
                for column in &mut columns.columns {
                    column.block = self.interpolate_block(&column.block, data)?;
                }
                BlockKind::Columns(columns)
            }
            BlockKind::Table(table) => {
                let mut table = table.clone();
                for row in &mut table.rows {
                    *row = self.interpolate_all(row, data)?;
                }
                BlockKind::Table(table)
            }
            BlockKind::List(list) => BlockKind::List(List {
                ordered: list.ordered,
                items: self.interpolate_all(&list.items, data)?,
            }),
            BlockKind::Image(image) => BlockKind::Image(image.clone()),
        };
        Ok(Block {
            kind,
            ..block.clone()
        })
    }

    fn interpolate_all(&self, blocks: &[Block], data: &Value) -> Result<Vec<Block>, LayoutError> {
        blocks.iter().map(|b| self.interpolate_block(b, data)).collect()
    }
}
