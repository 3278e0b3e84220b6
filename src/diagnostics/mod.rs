//! Typed error, warning and hint reporting.
//!
//! Every component reports domain violations through a shared
//! [`DiagCollector`] instead of returning errors. The collector keeps the
//! report order, counts errors monotonically, and drops warnings matched by a
//! suppression directive registered before the report.

mod collector;
mod suppression;

use std::fmt;

use smol_str::SmolStr;

use crate::base::{ElementId, Location};

pub use collector::DiagCollector;
pub use suppression::{Suppression, SuppressionSet};

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Hint,
}

impl Severity {
    pub fn display(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Hint => "HINT",
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Where the problem is.
    pub location: Location,
    /// The diagnostic message.
    pub message: String,
    /// Error/warning code (e.g., "E0010").
    pub code: Option<&'static str>,
    /// Name of the lint rule which produced this diagnostic, if any.
    pub rule: Option<SmolStr>,
    /// The element the diagnostic is about. Used for suppression lookups.
    pub element: Option<ElementId>,
}

impl Diagnostic {
    fn new(severity: Severity, location: Location, message: impl Into<String>) -> Self {
        Self {
            severity,
            location,
            message: message.into(),
            code: None,
            rule: None,
            element: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, location, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, location, message)
    }

    /// Create a new hint diagnostic.
    pub fn hint(location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Hint, location, message)
    }

    /// Set the error code.
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the lint rule name.
    pub fn with_rule(mut self, rule: impl Into<SmolStr>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Attach the subject element.
    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: ", self.severity.display(), self.location)?;
        if let Some(code) = self.code {
            write!(f, "[{code}] ")?;
        }
        f.write_str(&self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Standard diagnostic codes.
///
/// ## Code Ranges
///
/// - **E0001-E0009**: Resolution errors
/// - **E0010-E0019**: Visibility / scoping errors
/// - **E0020-E0029**: Config aspect errors
/// - **E0090-E0099**: Pipeline and internal errors
/// - **W0001-W0099**: Warnings
pub mod codes {
    // ========================================================================
    // RESOLUTION (E0001-E0009)
    // ========================================================================

    /// Type name does not resolve to a message or enum.
    pub const UNRESOLVED_TYPE: &str = "E0001";
    /// Two elements share a full name.
    pub const DUPLICATE_DEFINITION: &str = "E0002";
    /// Type name resolves to an element of the wrong kind.
    pub const WRONG_TYPE_KIND: &str = "E0003";

    // ========================================================================
    // VISIBILITY (E0010-E0019)
    // ========================================================================

    /// An element is hidden but required by a visible one.
    pub const HIDDEN_BUT_REQUIRED: &str = "E0010";
    /// A required field is hidden.
    pub const REQUIRED_FIELD_HIDDEN: &str = "E0011";
    /// The default value of an enum is hidden.
    pub const DEFAULT_VALUE_HIDDEN: &str = "E0012";
    /// The parent of a visible element is hidden.
    pub const HIDDEN_PARENT: &str = "E0013";
    /// A field used by an HTTP binding is hidden.
    pub const HTTP_FIELD_HIDDEN: &str = "E0014";

    // ========================================================================
    // CONFIG ASPECTS (E0020-E0029)
    // ========================================================================

    /// Malformed HTTP path template.
    pub const INVALID_HTTP_TEMPLATE: &str = "E0020";
    /// A field path does not resolve.
    pub const UNRESOLVED_FIELD_PATH: &str = "E0021";
    /// A config rule selector matches no element.
    pub const UNMATCHED_SELECTOR: &str = "E0022";
    /// Unsupported service config version.
    pub const INVALID_CONFIG_VERSION: &str = "E0023";
    /// A configured API name does not resolve to an interface.
    pub const UNRESOLVED_API: &str = "E0024";
    /// Malformed or misplaced documentation instruction.
    pub const INVALID_DOC_INSTRUCTION: &str = "E0025";
    /// Conflicting HTTP bindings.
    pub const HTTP_BINDING_CONFLICT: &str = "E0026";
    /// A body is declared for a method that takes none.
    pub const HTTP_BODY_NOT_ALLOWED: &str = "E0027";

    // ========================================================================
    // PIPELINE / INTERNAL (E0090-E0099)
    // ========================================================================

    /// Stage dependencies form a cycle.
    pub const STAGE_CYCLE: &str = "E0090";
    /// No processor establishes a requested stage.
    pub const MISSING_PROCESSOR: &str = "E0091";
    /// An internal invariant did not hold. Never a user error.
    pub const INTERNAL: &str = "E0099";

    // ========================================================================
    // WARNINGS (W0001-W0099)
    // ========================================================================

    /// Import names a file absent from the descriptor set.
    pub const UNRESOLVED_IMPORT: &str = "W0001";
    /// Version gated rule violated before its enforcement version.
    pub const VERSION_GATED: &str = "W0002";
    /// Lint rule finding.
    pub const LINT: &str = "W0003";
}
