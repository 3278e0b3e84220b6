//! HTTP binding facts attached to methods.
//!
//! The http aspect fills these in during merging; the scoper reads them to
//! check that every bound field is visible.

use smol_str::SmolStr;

use super::{AttributeKey, FieldSelector};

/// HTTP method of a binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Custom(SmolStr),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Custom(kind) => kind,
        }
    }

    /// Methods whose requests carry no body.
    pub fn forbids_body(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

/// One segment of a parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    /// `*`
    Wildcard,
    /// `**`
    PathWildcard,
    /// `{field.path=sub/template}`; a bare `{field}` has a single wildcard
    /// as sub-template.
    Variable {
        field_path: String,
        template: Vec<PathSegment>,
    },
}

/// A single HTTP binding of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBinding {
    pub method: HttpMethod,
    /// The template as written.
    pub path: String,
    pub segments: Vec<PathSegment>,
    pub custom_verb: Option<String>,
    /// Fields bound by path variables.
    pub path_selectors: Vec<FieldSelector>,
    /// The body selector as written; `*` captures every unbound field.
    pub body: Option<String>,
    /// Fields bound by the body.
    pub body_selectors: Vec<FieldSelector>,
    /// Whether this is the primary binding, not an additional one.
    pub primary: bool,
}

impl HttpBinding {
    pub fn body_captures_unbound_fields(&self) -> bool {
        self.body.as_deref() == Some("*")
    }

    /// Selectors the scoper requires to be visible.
    pub fn required_selectors(&self) -> impl Iterator<Item = &FieldSelector> {
        let body: &[FieldSelector] = if self.body_captures_unbound_fields() {
            &[]
        } else {
            &self.body_selectors
        };
        self.path_selectors.iter().chain(body)
    }
}

/// Attribute key: all HTTP bindings of a method, primary first.
pub struct HttpAttribute;

impl AttributeKey for HttpAttribute {
    type Value = Vec<HttpBinding>;
    const NAME: &'static str = "http.bindings";
}
