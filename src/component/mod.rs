//! The declarative component tree.
//!
//! A [`ComponentTree`] describes a document the way JSX does: elements with
//! props and children, plain strings, and user components that expand into
//! more nodes when rendered. Trees are built in code with the functions in
//! [`builders`] or parsed from JSON with [`ComponentTree::from_json`].

pub mod builders;
mod json;
mod registry;

pub use registry::ComponentRegistry;

use crate::config::Config;
use crate::renderer::RenderError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Props of an element or component, sorted by name.
pub type Props = BTreeMap<String, Value>;

/// The built-in element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Document,
    Header,
    Content,
    Footer,
    Text,
    Stack,
    Columns,
    Table,
    Row,
    Cell,
    Image,
    Ol,
    Ul,
}

impl Tag {
    pub const ALL: [Tag; 13] = [
        Tag::Document,
        Tag::Header,
        Tag::Content,
        Tag::Footer,
        Tag::Text,
        Tag::Stack,
        Tag::Columns,
        Tag::Table,
        Tag::Row,
        Tag::Cell,
        Tag::Image,
        Tag::Ol,
        Tag::Ul,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tag::Document => "document",
            Tag::Header => "header",
            Tag::Content => "content",
            Tag::Footer => "footer",
            Tag::Text => "text",
            Tag::Stack => "stack",
            Tag::Columns => "columns",
            Tag::Table => "table",
            Tag::Row => "row",
            Tag::Cell => "cell",
            Tag::Image => "image",
            Tag::Ol => "ol",
            Tag::Ul => "ul",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| RenderError::UnknownTag(s.to_string()))
    }
}

/// A user-defined component: a function from props and children to nodes.
///
/// Any `Fn(&Props, Vec<Node>, &mut Context) -> Result<Node, RenderError>`
/// closure is a component.
pub trait Component: Send + Sync {
    fn render(&self, props: &Props, children: Vec<Node>, ctx: &mut Context)
    -> Result<Node, RenderError>;
}

impl<F> Component for F
where
    F: Fn(&Props, Vec<Node>, &mut Context) -> Result<Node, RenderError> + Send + Sync,
{
    fn render(
        &self,
        props: &Props,
        children: Vec<Node>,
        ctx: &mut Context,
    ) -> Result<Node, RenderError> {
        self(props, children, ctx)
    }
}

/// One node of a component tree.
#[derive(Clone)]
pub enum Node {
    Element {
        tag: Tag,
        props: Props,
        children: Vec<Node>,
    },
    Text(String),
    Component {
        component: Arc<dyn Component>,
        props: Props,
        children: Vec<Node>,
    },
    /// A component looked up by name in the renderer's registry.
    Named {
        name: String,
        props: Props,
        children: Vec<Node>,
    },
    Fragment(Vec<Node>),
    Empty,
}

impl Node {
    pub fn component(component: impl Component + 'static, props: Props) -> Self {
        Node::Component {
            component: Arc::new(component),
            props,
            children: Vec::new(),
        }
    }

    pub fn named(name: impl Into<String>, props: Props) -> Self {
        Node::Named {
            name: name.into(),
            props,
            children: Vec::new(),
        }
    }

    /// Appends a child to an element or component. Other nodes are returned unchanged.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        match &mut self {
            Node::Element { children, .. }
            | Node::Component { children, .. }
            | Node::Named { children, .. } => children.push(child.into()),
            Node::Fragment(nodes) => nodes.push(child.into()),
            Node::Text(_) | Node::Empty => {}
        }
        self
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Element {
                tag,
                props,
                children,
            } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("props", props)
                .field("children", children)
                .finish(),
            Node::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Node::Component {
                props, children, ..
            } => f
                .debug_struct("Component")
                .field("props", props)
                .field("children", children)
                .finish_non_exhaustive(),
            Node::Named {
                name,
                props,
                children,
            } => f
                .debug_struct("Named")
                .field("name", name)
                .field("props", props)
                .field("children", children)
                .finish(),
            Node::Fragment(nodes) => f.debug_tuple("Fragment").field(nodes).finish(),
            Node::Empty => f.write_str("Empty"),
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(node: Option<T>) -> Self {
        node.map_or(Node::Empty, Into::into)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Self {
        Node::Fragment(nodes)
    }
}

/// Values visible to text interpolation and to components while rendering.
///
/// The root context holds the config. A component receives its own copy, so
/// values it sets are only seen by the subtree it returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

impl From<&Config> for Context {
    fn from(config: &Config) -> Self {
        Self {
            values: config.values().clone(),
        }
    }
}

/// A document described as a tree of nodes. The root must render to a
/// `document` element.
#[derive(Debug, Clone)]
pub struct ComponentTree {
    root: Node,
}

impl ComponentTree {
    pub fn new(root: impl Into<Node>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}
