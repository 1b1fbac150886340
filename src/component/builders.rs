//! Fluent construction of component trees.
//!
//! ```
//! use folio::component::builders::*;
//!
//! let tree = document()
//!     .prop("pageSize", "A4")
//!     .child(content().child(text("Hello {{name}}").bold().font_size(18.0)))
//!     .child(footer().child(text("Page {{currentPage}} of {{pageCount}}")))
//!     .into_tree();
//! # let _ = tree;
//! ```

use super::{Component, ComponentTree, Node, Props, Tag};
use serde_json::{Value, json};
use std::sync::Arc;

/// Style props shared by every element and component builder.
pub trait StyledElement: Sized {
    fn props_mut(&mut self) -> &mut Props;

    /// Sets any prop by name.
    fn prop(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props_mut().insert(name.to_string(), value.into());
        self
    }

    fn font(self, family: &str) -> Self {
        self.prop("font", family)
    }

    fn font_size(self, size: f32) -> Self {
        self.prop("fontSize", size)
    }

    fn bold(self) -> Self {
        self.prop("bold", true)
    }

    fn italics(self) -> Self {
        self.prop("italics", true)
    }

    /// A `#rrggbb` color or a color name.
    fn color(self, color: &str) -> Self {
        self.prop("color", color)
    }

    /// One of `left`, `center`, `right` or `justify`.
    fn alignment(self, alignment: &str) -> Self {
        self.prop("alignment", alignment)
    }

    fn line_height(self, factor: f32) -> Self {
        self.prop("lineHeight", factor)
    }

    /// Applies a named style from the document's `styles` prop. Repeated
    /// calls apply the styles in order.
    fn style(mut self, name: &str) -> Self {
        let props = self.props_mut();
        let names = match props.remove("style") {
            Some(Value::Array(mut names)) => {
                names.push(name.into());
                Value::Array(names)
            }
            Some(Value::String(first)) => json!([first, name]),
            _ => Value::String(name.to_string()),
        };
        props.insert("style".to_string(), names);
        self
    }

    /// Margins in points as `[left, top, right, bottom]`.
    fn margin(self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        self.prop("margin", json!([left, top, right, bottom]))
    }

    /// `before` or `after`.
    fn page_break(self, position: &str) -> Self {
        self.prop("pageBreak", position)
    }

    /// Width inside `columns`: a number, a percentage such as `"50%"`,
    /// `"*"` or `"auto"`.
    fn width(self, width: impl Into<Value>) -> Self {
        self.prop("width", width)
    }
}

/// Builder for a built-in element.
#[derive(Debug, Clone)]
pub struct Element {
    tag: Tag,
    props: Props,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Wraps this element in a tree. Only meaningful for `document`.
    pub fn into_tree(self) -> ComponentTree {
        ComponentTree::new(self)
    }
}

impl StyledElement for Element {
    fn props_mut(&mut self) -> &mut Props {
        &mut self.props
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element {
            tag: element.tag,
            props: element.props,
            children: element.children,
        }
    }
}

/// Builder for a user component, either inline or registered by name.
#[derive(Clone)]
pub struct ComponentBuilder {
    target: ComponentTarget,
    props: Props,
    children: Vec<Node>,
}

#[derive(Clone)]
enum ComponentTarget {
    Inline(Arc<dyn Component>),
    Named(String),
}

impl ComponentBuilder {
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl StyledElement for ComponentBuilder {
    fn props_mut(&mut self) -> &mut Props {
        &mut self.props
    }
}

impl From<ComponentBuilder> for Node {
    fn from(builder: ComponentBuilder) -> Self {
        match builder.target {
            ComponentTarget::Inline(component) => Node::Component {
                component,
                props: builder.props,
                children: builder.children,
            },
            ComponentTarget::Named(name) => Node::Named {
                name,
                props: builder.props,
                children: builder.children,
            },
        }
    }
}

pub fn document() -> Element {
    Element::new(Tag::Document)
}

pub fn header() -> Element {
    Element::new(Tag::Header)
}

pub fn content() -> Element {
    Element::new(Tag::Content)
}

pub fn footer() -> Element {
    Element::new(Tag::Footer)
}

/// A text element holding one string.
pub fn text(value: impl Into<String>) -> Element {
    Element::new(Tag::Text).child(Node::Text(value.into()))
}

/// A text element built from several runs, for mixed inline styles.
pub fn rich_text() -> Element {
    Element::new(Tag::Text)
}

pub fn stack() -> Element {
    Element::new(Tag::Stack)
}

pub fn columns() -> Element {
    Element::new(Tag::Columns)
}

pub fn table() -> Element {
    Element::new(Tag::Table)
}

pub fn row() -> Element {
    Element::new(Tag::Row)
}

pub fn cell() -> Element {
    Element::new(Tag::Cell)
}

pub fn image(src: &str) -> Element {
    Element::new(Tag::Image).prop("src", src)
}

pub fn ol() -> Element {
    Element::new(Tag::Ol)
}

pub fn ul() -> Element {
    Element::new(Tag::Ul)
}

pub fn component(component: impl Component + 'static) -> ComponentBuilder {
    ComponentBuilder {
        target: ComponentTarget::Inline(Arc::new(component)),
        props: Props::new(),
        children: Vec::new(),
    }
}

pub fn named(name: &str) -> ComponentBuilder {
    ComponentBuilder {
        target: ComponentTarget::Named(name.to_string()),
        props: Props::new(),
        children: Vec::new(),
    }
}
