//! Config aspects, lint rules and validators.
//!
//! Aspects plug one configuration concern into the standard stages: they are
//! called while merging and normalizing, and contribute lint rules (run by
//! the Linter) and validators (run after the pipeline, read-only).

use crate::base::{ElementId, ElementKind};
use crate::diagnostics::Diagnostic;

use super::Model;

/// One configuration concern (HTTP, visibility, documentation, ...).
///
/// Every hook defaults to doing nothing.
pub trait ConfigAspect {
    fn name(&self) -> &'static str;

    /// Lint rules to register with the model, collected at registration.
    fn lint_rules(&self) -> Vec<Box<dyn LintRule>> {
        Vec::new()
    }

    /// Validators to register with the model, collected at registration.
    fn validators(&self) -> Vec<Box<dyn Validator>> {
        Vec::new()
    }

    fn start_merging(&mut self, _model: &mut Model) {}

    /// Called for every element of the source files.
    fn merge(&mut self, _model: &mut Model, _element: ElementId) {}

    fn end_merging(&mut self, _model: &mut Model) {}

    fn start_normalization(&mut self, _model: &mut Model) {}

    /// Called for every reachable element.
    fn normalize(&mut self, _model: &mut Model, _element: ElementId) {}

    fn end_normalization(&mut self, _model: &mut Model) {}
}

/// A style check run during the lint stage.
///
/// Rules only read the model; the Linter reports what they return, tagged
/// with the rule name so documentation instructions can suppress it.
pub trait LintRule {
    /// Rule name, e.g. `naming-identifier`.
    fn name(&self) -> &'static str;

    fn applies_to(&self, _kind: ElementKind) -> bool {
        false
    }

    /// Check a reachable element of a kind this rule applies to.
    fn lint(&self, _model: &Model, _element: ElementId) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check the model as a whole, once per lint run.
    fn lint_model(&self, _model: &Model) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// A read-only check over the fully processed model.
pub trait Validator {
    fn name(&self) -> &'static str;

    fn validate(&self, model: &Model) -> Vec<Diagnostic>;
}
