use std::fmt;

use smol_str::SmolStr;

use super::Span;

/// Where a diagnostic points.
///
/// Elements resolve to `Source` when their descriptor carries source info for
/// the element's structural path, and fall back to `File` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Global to the analysis (e.g. pipeline configuration problems).
    TopLevel,
    /// No location is known.
    Unknown,
    /// A whole file.
    File(SmolStr),
    /// A span inside a file.
    Source { file: SmolStr, span: Span },
    /// A named place outside descriptor sources, such as a service config entry.
    Named(SmolStr),
}

impl Location {
    pub fn file(name: impl Into<SmolStr>) -> Self {
        Location::File(name.into())
    }

    pub fn source(file: impl Into<SmolStr>, span: Span) -> Self {
        Location::Source {
            file: file.into(),
            span,
        }
    }

    pub fn named(name: impl Into<SmolStr>) -> Self {
        Location::Named(name.into())
    }

    /// The file this location belongs to, if any.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Location::File(file) | Location::Source { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Location::Source { span, .. } => Some(*span),
            _ => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::TopLevel => f.write_str("toplevel"),
            Location::Unknown => f.write_str("<unknown>"),
            Location::File(file) => f.write_str(file),
            // Lines and columns are displayed 1-based.
            Location::Source { file, span } => write!(
                f,
                "{}:{}:{}",
                file,
                span.start.line + 1,
                span.start.column + 1
            ),
            Location::Named(name) => f.write_str(name),
        }
    }
}
