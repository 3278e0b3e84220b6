use crate::base::{ElementId, Location};

use super::{Diagnostic, Severity, Suppression, SuppressionSet};

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during analysis.
///
/// The log is append-only: diagnostics are kept in report order and the error
/// count never decreases within a run.
#[derive(Clone, Debug, Default)]
pub struct DiagCollector {
    diagnostics: Vec<Diagnostic>,
    error_count: usize,
    suppressed_count: usize,
    suppressions: SuppressionSet,
}

impl DiagCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a diagnostic.
    ///
    /// `scope` is the subject element followed by its ancestors; suppression
    /// directives registered so far are matched against it. Returns whether the
    /// diagnostic was recorded.
    pub fn report(&mut self, diagnostic: Diagnostic, scope: &[ElementId]) -> bool {
        if self.suppressions.is_suppressed(&diagnostic, scope) {
            tracing::trace!("suppressed diagnostic: {}", diagnostic);
            self.suppressed_count += 1;
            return false;
        }
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    /// Report an error without element context.
    pub fn error(&mut self, location: Location, message: impl Into<String>) {
        self.report(Diagnostic::error(location, message), &[]);
    }

    /// Report a warning without element context.
    pub fn warning(&mut self, location: Location, message: impl Into<String>) {
        self.report(Diagnostic::warning(location, message), &[]);
    }

    /// Register a suppression directive for subsequent reports.
    pub fn add_suppression(&mut self, suppression: Suppression) {
        self.suppressions.add(suppression);
    }

    pub fn suppressions(&self) -> &SuppressionSet {
        &self.suppressions
    }

    /// All recorded diagnostics, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get diagnostics about a specific element.
    pub fn diagnostics_for(&self, element: ElementId) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.element == Some(element))
            .collect()
    }

    /// Get the number of errors.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Get the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Number of reports dropped by suppression directives.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed_count
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Errors only, in report order.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Warnings only, in report order.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
