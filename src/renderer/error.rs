use thiserror::Error;

/// Why a component tree could not be turned into a document model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Invalid value for '{prop}' on <{tag}>: expected {expected}")]
    InvalidProp {
        tag: String,
        prop: String,
        expected: &'static str,
    },

    #[error("Unknown element type '{0}'")]
    UnknownTag(String),

    #[error("No component registered under the name '{0}'")]
    UnknownComponent(String),

    #[error("<{child}> is not allowed inside <{parent}>")]
    MisplacedElement { child: String, parent: String },

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("Component nesting exceeds {0} levels")]
    RecursionLimit(usize),

    #[error("Failed to interpolate '{text}': {message}")]
    Template { text: String, message: String },

    #[error("Invalid component tree JSON: {0}")]
    Json(String),

    #[error("Component failed: {0}")]
    Component(String),
}

impl RenderError {
    pub(crate) fn invalid_prop(tag: &str, prop: &str, expected: &'static str) -> Self {
        RenderError::InvalidProp {
            tag: tag.to_string(),
            prop: prop.to_string(),
            expected,
        }
    }

    pub(crate) fn misplaced(child: impl Into<String>, parent: impl Into<String>) -> Self {
        RenderError::MisplacedElement {
            child: child.into(),
            parent: parent.into(),
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Json(e.to_string())
    }
}
