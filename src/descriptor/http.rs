use serde::{Deserialize, Serialize};

/// An HTTP mapping for a method, in the shape of `google.api.HttpRule`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRule {
    /// Methods the rule applies to. Ignored for inline annotations.
    pub selector: String,
    pub get: Option<String>,
    pub put: Option<String>,
    pub post: Option<String>,
    pub delete: Option<String>,
    pub patch: Option<String>,
    pub custom: Option<CustomHttpPattern>,
    /// `*` maps every field not bound by the path, a field path maps that
    /// field, empty means no body.
    pub body: String,
    pub additional_bindings: Vec<HttpRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomHttpPattern {
    pub kind: String,
    pub path: String,
}

impl HttpRule {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            get: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            post: Some(path.into()),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The verb and path template of this rule, if it declares one.
    pub fn pattern(&self) -> Option<(&str, &str)> {
        if let Some(path) = &self.get {
            return Some(("GET", path));
        }
        if let Some(path) = &self.put {
            return Some(("PUT", path));
        }
        if let Some(path) = &self.post {
            return Some(("POST", path));
        }
        if let Some(path) = &self.delete {
            return Some(("DELETE", path));
        }
        if let Some(path) = &self.patch {
            return Some(("PATCH", path));
        }
        self.custom
            .as_ref()
            .map(|custom| (custom.kind.as_str(), custom.path.as_str()))
    }
}
