//! Lint stage.

use crate::diagnostics::codes;
use crate::model::{Model, Processor, StageId};

use super::{Linted, Normalized};

/// Establishes [`Linted`] by running every registered lint rule.
///
/// Model-level checks run once; element checks run on each reachable element
/// of a kind the rule applies to. Findings are tagged with the rule name.
#[derive(Debug, Default)]
pub struct Linter;

impl Processor for Linter {
    fn requires(&self) -> Vec<StageId> {
        vec![StageId::of::<Normalized>()]
    }

    fn establishes(&self) -> StageId {
        StageId::of::<Linted>()
    }

    fn run(&mut self, model: &mut Model) -> bool {
        let elements = model.reachable_elements();
        let mut findings = Vec::new();
        for rule in model.lint_rules() {
            let name = rule.name();
            findings.extend(rule.lint_model(model).into_iter().map(|d| (name, d)));
            for &element in &elements {
                if rule.applies_to(element.kind()) {
                    findings.extend(rule.lint(model, element).into_iter().map(|d| (name, d)));
                }
            }
        }
        tracing::debug!("lint: {} finding(s)", findings.len());
        for (rule, diagnostic) in findings {
            let code = diagnostic.code.unwrap_or(codes::LINT);
            model.report(diagnostic.with_rule(rule).with_code(code));
        }
        true
    }
}
