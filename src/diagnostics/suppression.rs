use smol_str::SmolStr;

use crate::base::ElementId;

use super::{Diagnostic, Severity};

/// A directive dropping matching warnings at or below an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    /// Subtree root. `None` applies to the whole model.
    pub element: Option<ElementId>,
    /// Rule name, code, or a `prefix-*` pattern.
    pub pattern: SmolStr,
}

impl Suppression {
    pub fn new(element: Option<ElementId>, pattern: impl Into<SmolStr>) -> Self {
        Self {
            element,
            pattern: pattern.into(),
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        if self.pattern == "*" {
            return true;
        }
        match self.pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => self.pattern == name,
        }
    }

    /// Check whether the directive covers a diagnostic reported against an
    /// element whose ancestry (self first, then parents) is `scope`.
    pub fn covers(&self, diagnostic: &Diagnostic, scope: &[ElementId]) -> bool {
        let in_subtree = match self.element {
            None => true,
            Some(root) => scope.contains(&root),
        };
        if !in_subtree {
            return false;
        }
        diagnostic
            .rule
            .as_deref()
            .is_some_and(|rule| self.matches_name(rule))
            || diagnostic.code.is_some_and(|code| self.matches_name(code))
    }
}

/// Registered suppression directives.
#[derive(Debug, Clone, Default)]
pub struct SuppressionSet {
    directives: Vec<Suppression>,
}

impl SuppressionSet {
    pub fn add(&mut self, directive: Suppression) {
        if !self.directives.contains(&directive) {
            self.directives.push(directive);
        }
    }

    /// Whether the report should be dropped. Errors are never suppressed.
    pub fn is_suppressed(&self, diagnostic: &Diagnostic, scope: &[ElementId]) -> bool {
        if diagnostic.severity == Severity::Error {
            return false;
        }
        self.directives.iter().any(|d| d.covers(diagnostic, scope))
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
