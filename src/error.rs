//! Error types for fatal and API-level failures.
//!
//! Domain violations found during analysis are reported as diagnostics, not
//! through these types.

use thiserror::Error;

/// Fatal errors. A model is not trusted after one of these.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The descriptor set could not be decoded.
    #[error("Malformed descriptor set: {0}")]
    Descriptor(#[from] serde_json::Error),

    /// The descriptor set names the same file twice.
    #[error("Duplicate file in descriptor set: {0}")]
    DuplicateFile(String),

    /// A file declares a syntax the analysis does not understand.
    #[error("Illegal proto syntax for file {file}: {syntax}")]
    UnsupportedSyntax { file: String, syntax: String },

    /// A stage was requested but no processor establishes it.
    #[error("No processor registered for stage '{0}'")]
    MissingProcessor(&'static str),

    /// Stage dependencies form a cycle.
    #[error("Cyclic stage dependency: {}", .0.join(" -> "))]
    StageCycle(Vec<&'static str>),
}

/// Errors decoding a service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML decode error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON decode error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors resolving a dotted field path against a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The path is empty.
    #[error("empty field path")]
    Empty,

    /// A path segment does not name a field of the current message.
    #[error("'{segment}' is not a field of message '{message}'")]
    UnknownField { segment: String, message: String },

    /// An intermediate segment is not of message type.
    #[error("field '{segment}' is not a message and cannot be traversed")]
    NotAMessage { segment: String },
}
