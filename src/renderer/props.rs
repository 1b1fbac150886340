//! Coercion of loosely typed props into model values.

use super::RenderError;
use crate::component::{Props, Tag};
use chrono::{DateTime, Utc};
use folio_model::{
    Alignment, Color, DocumentInfo, Margins, Orientation, PageBreak, PageSize, SizeSpec,
    TableLayout, TextStyle,
};
use serde_json::Value;

/// Typed access to one element's props. Errors name the element and prop.
pub(crate) struct PropReader<'a> {
    tag: Tag,
    props: &'a Props,
}

impl<'a> PropReader<'a> {
    pub fn new(tag: Tag, props: &'a Props) -> Self {
        Self { tag, props }
    }

    fn error(&self, prop: &str, expected: &'static str) -> RenderError {
        RenderError::invalid_prop(self.tag.name(), prop, expected)
    }

    /// The prop's value, treating an explicit `null` as absent.
    pub fn get(&self, prop: &str) -> Option<&'a Value> {
        self.props.get(prop).filter(|v| !v.is_null())
    }

    /// A number that fits an `f32` and passes `accept`.
    fn bounded(
        &self,
        prop: &str,
        expected: &'static str,
        accept: impl Fn(f32) -> bool,
    ) -> Result<Option<f32>, RenderError> {
        self.get(prop)
            .map(|v| {
                v.as_f64()
                    .and_then(finite)
                    .filter(|n| accept(*n))
                    .ok_or_else(|| self.error(prop, expected))
            })
            .transpose()
    }

    pub fn number(&self, prop: &str) -> Result<Option<f32>, RenderError> {
        self.bounded(prop, "a number", |_| true)
    }

    pub fn non_negative(&self, prop: &str) -> Result<Option<f32>, RenderError> {
        self.bounded(prop, "a non-negative number", |n| n >= 0.0)
    }

    pub fn positive(&self, prop: &str) -> Result<Option<f32>, RenderError> {
        self.bounded(prop, "a positive number", |n| n > 0.0)
    }

    pub fn count(&self, prop: &str) -> Result<Option<usize>, RenderError> {
        self.get(prop)
            .map(|v| {
                v.as_u64()
                    .map(|n| n as usize)
                    .ok_or_else(|| self.error(prop, "a non-negative integer"))
            })
            .transpose()
    }

    pub fn boolean(&self, prop: &str) -> Result<Option<bool>, RenderError> {
        self.get(prop)
            .map(|v| v.as_bool().ok_or_else(|| self.error(prop, "true or false")))
            .transpose()
    }

    pub fn string(&self, prop: &str) -> Result<Option<&'a str>, RenderError> {
        self.get(prop)
            .map(|v| v.as_str().ok_or_else(|| self.error(prop, "a string")))
            .transpose()
    }

    pub fn color(&self, prop: &str) -> Result<Option<Color>, RenderError> {
        self.string(prop)?
            .map(|s| s.parse().map_err(|_| self.error(prop, "a #rrggbb color or color name")))
            .transpose()
    }

    pub fn alignment(&self, prop: &str) -> Result<Option<Alignment>, RenderError> {
        self.string(prop)?
            .map(|s| match s {
                "left" => Ok(Alignment::Left),
                "center" => Ok(Alignment::Center),
                "right" => Ok(Alignment::Right),
                "justify" => Ok(Alignment::Justify),
                _ => Err(self.error(prop, "left, center, right or justify")),
            })
            .transpose()
    }

    /// A single number, `[horizontal, vertical]` or `[left, top, right, bottom]`.
    pub fn margins(&self, prop: &str) -> Result<Option<Margins>, RenderError> {
        let Some(value) = self.get(prop) else {
            return Ok(None);
        };
        let expected = "a number or an array of 2 or 4 numbers";
        if value.is_number() {
            return value
                .as_f64()
                .and_then(finite)
                .map(|n| Some(Margins::all(n)))
                .ok_or_else(|| self.error(prop, expected));
        }
        let numbers = value
            .as_array()
            .and_then(|items| {
                items
                    .iter()
                    .map(|v| v.as_f64().and_then(finite))
                    .collect::<Option<Vec<_>>>()
            })
            .ok_or_else(|| self.error(prop, expected))?;
        match numbers[..] {
            [h, v] => Ok(Some(Margins::symmetric(h, v))),
            [l, t, r, b] => Ok(Some(Margins::new(l, t, r, b))),
            _ => Err(self.error(prop, expected)),
        }
    }

    pub fn page_break(&self, prop: &str) -> Result<Option<PageBreak>, RenderError> {
        self.string(prop)?
            .map(|s| match s {
                "before" => Ok(PageBreak::Before),
                "after" => Ok(PageBreak::After),
                _ => Err(self.error(prop, "before or after")),
            })
            .transpose()
    }

    pub fn size_spec(&self, prop: &str) -> Result<Option<SizeSpec>, RenderError> {
        self.get(prop)
            .map(|v| size_spec(v).ok_or_else(|| self.error(prop, "a number, a percentage, \"*\" or \"auto\"")))
            .transpose()
    }

    pub fn size_specs(&self, prop: &str) -> Result<Option<Vec<SizeSpec>>, RenderError> {
        let expected = "an array of widths";
        self.get(prop)
            .map(|v| {
                v.as_array()
                    .and_then(|items| items.iter().map(size_spec).collect::<Option<Vec<_>>>())
                    .ok_or_else(|| self.error(prop, expected))
            })
            .transpose()
    }

    /// A named size such as `A4`, or `{"width": .., "height": ..}` in points.
    pub fn page_size(&self, prop: &str) -> Result<Option<PageSize>, RenderError> {
        let expected = "a page size name or {width, height}";
        self.get(prop)
            .map(|v| match v {
                Value::String(name) => {
                    PageSize::from_name(name).ok_or_else(|| self.error(prop, expected))
                }
                Value::Object(map) => {
                    let side = |key: &str| {
                        map.get(key)
                            .and_then(Value::as_f64)
                            .and_then(finite)
                            .filter(|n| *n > 0.0)
                    };
                    match (side("width"), side("height")) {
                        (Some(w), Some(h)) => Ok(PageSize::new(w, h)),
                        _ => Err(self.error(prop, expected)),
                    }
                }
                _ => Err(self.error(prop, expected)),
            })
            .transpose()
    }

    pub fn orientation(&self, prop: &str) -> Result<Option<Orientation>, RenderError> {
        self.string(prop)?
            .map(|s| match s {
                "portrait" => Ok(Orientation::Portrait),
                "landscape" => Ok(Orientation::Landscape),
                _ => Err(self.error(prop, "portrait or landscape")),
            })
            .transpose()
    }

    pub fn table_layout(&self, prop: &str) -> Result<Option<TableLayout>, RenderError> {
        self.string(prop)?
            .map(|s| match s {
                "grid" => Ok(TableLayout::Grid),
                "noBorders" => Ok(TableLayout::NoBorders),
                "lightHorizontalLines" => Ok(TableLayout::LightHorizontalLines),
                _ => Err(self.error(prop, "grid, noBorders or lightHorizontalLines")),
            })
            .transpose()
    }

    /// Document metadata. `creationDate` must be RFC 3339.
    pub fn info(&self, prop: &str) -> Result<DocumentInfo, RenderError> {
        let Some(value) = self.get(prop) else {
            return Ok(DocumentInfo::default());
        };
        let map = value
            .as_object()
            .ok_or_else(|| self.error(prop, "an object"))?;
        let field = |key: &str| -> Result<Option<String>, RenderError> {
            match map.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(_) => Err(self.error(prop, "string metadata fields")),
            }
        };
        let creation_date = field("creationDate")?
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|d| d.with_timezone(&Utc))
                    .map_err(|_| self.error(prop, "an RFC 3339 creationDate"))
            })
            .transpose()?;
        Ok(DocumentInfo {
            title: field("title")?,
            author: field("author")?,
            subject: field("subject")?,
            keywords: field("keywords")?,
            creator: field("creator")?,
            producer: field("producer")?,
            creation_date,
        })
    }

    /// Names listed in the `style` prop, in application order.
    pub fn style_names(&self, prop: &str) -> Result<Vec<&'a str>, RenderError> {
        let expected = "a style name or an array of names";
        match self.get(prop) {
            None => Ok(Vec::new()),
            Some(Value::String(name)) => Ok(vec![name.as_str()]),
            Some(Value::Array(names)) => names
                .iter()
                .map(|v| v.as_str().ok_or_else(|| self.error(prop, expected)))
                .collect(),
            Some(_) => Err(self.error(prop, expected)),
        }
    }

    /// The inline text style props of this element.
    pub fn text_style(&self) -> Result<TextStyle, RenderError> {
        Ok(TextStyle {
            font: self.string("font")?.map(str::to_string),
            font_size: self.positive("fontSize")?,
            bold: self.boolean("bold")?,
            italics: self.boolean("italics")?,
            color: self.color("color")?,
            alignment: self.alignment("alignment")?,
            line_height: self.positive("lineHeight")?,
        })
    }
}

/// `n` as an `f32`, unless it is NaN or overflows to infinity.
fn finite(n: f64) -> Option<f32> {
    Some(n as f32).filter(|n| n.is_finite())
}

fn size_spec(value: &Value) -> Option<SizeSpec> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(finite)
            .filter(|n| *n >= 0.0)
            .map(SizeSpec::Fixed),
        Value::String(s) => match s.trim() {
            "*" => Some(SizeSpec::Star),
            "auto" => Some(SizeSpec::Auto),
            s => match s.strip_suffix('%') {
                Some(pct) => pct
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|p| p.is_finite() && (0.0..=100.0).contains(p))
                    .map(SizeSpec::Percent),
                None => s
                    .parse::<f32>()
                    .ok()
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(SizeSpec::Fixed),
            },
        },
        _ => None,
    }
}
