//! Visibility aspect.
//!
//! `visibility.rules` restrict elements to labels. When the analysis runs
//! with visibility labels, elements restricted to none of them are hidden
//! from the model scoper; [`scoper_for_labels`] computes other views on
//! demand.

use std::rc::Rc;

use crate::base::{ElementId, Location};
use crate::config::Selector;
use crate::diagnostics::{Diagnostic, codes};
use crate::graph::{AttributeKey, Graph};
use crate::model::{ConfigAspect, Model};
use crate::scoper::{ScopePredicate, Scoper};

/// Labels an element is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    /// The restriction as written in the config.
    pub restriction: String,
    pub labels: Vec<String>,
}

impl Visibility {
    pub fn parse(restriction: &str) -> Self {
        let labels = restriction
            .split(',')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            restriction: restriction.trim().to_string(),
            labels,
        }
    }

    pub fn allows_any(&self, labels: &[String]) -> bool {
        self.labels.iter().any(|l| labels.contains(l))
    }
}

pub struct VisibilityAttribute;

impl AttributeKey for VisibilityAttribute {
    type Value = Visibility;
    const NAME: &'static str = "visibility";
}

/// Hides elements restricted to labels disjoint from the enabled ones.
/// Unrestricted elements are always in scope.
#[derive(Debug, Clone)]
pub struct LabelPredicate {
    labels: Vec<String>,
}

impl LabelPredicate {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }
}

impl ScopePredicate for LabelPredicate {
    fn in_scope(&self, graph: &Graph, element: ElementId) -> bool {
        graph
            .attr::<VisibilityAttribute>(element)
            .is_none_or(|v| v.allows_any(&self.labels))
    }

    fn reason_for_unreachable(&self, graph: &Graph, element: ElementId) -> Option<String> {
        let visibility = graph.attr::<VisibilityAttribute>(element)?;
        Some(format!(
            "'{}' is restricted to '{}'",
            graph.full_name(element),
            visibility.restriction
        ))
    }
}

struct ConfiguredRule {
    selector: Selector,
    raw_selector: String,
    visibility: Visibility,
    matched: bool,
}

/// The `visibility` config aspect.
#[derive(Default)]
pub struct VisibilityConfigAspect {
    rules: Vec<ConfiguredRule>,
}

impl VisibilityConfigAspect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigAspect for VisibilityConfigAspect {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn start_merging(&mut self, model: &mut Model) {
        self.rules = model
            .service_config()
            .map(|config| {
                config
                    .visibility
                    .rules
                    .iter()
                    .map(|rule| ConfiguredRule {
                        selector: Selector::parse(&rule.selector),
                        raw_selector: rule.selector.clone(),
                        visibility: Visibility::parse(&rule.restriction),
                        matched: false,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let labels = model.options().visibility_labels.clone();
        if !labels.is_empty() {
            tracing::debug!("restricting model to labels {:?}", labels);
            model.add_scope_predicate(Rc::new(LabelPredicate::new(labels)));
        }
    }

    fn merge(&mut self, model: &mut Model, element: ElementId) {
        let full_name = model.graph().full_name(element);
        let Some(rule) = self
            .rules
            .iter_mut()
            .find(|r| r.selector.matches(full_name))
        else {
            return;
        };
        rule.matched = true;
        let visibility = rule.visibility.clone();
        model
            .graph_mut()
            .put_attr::<VisibilityAttribute>(element, visibility);
    }

    fn end_merging(&mut self, model: &mut Model) {
        for rule in self.rules.drain(..).filter(|r| !r.matched) {
            model.report(
                Diagnostic::error(
                    Location::named("visibility.rules"),
                    format!(
                        "Selector '{}' of visibility rule does not match any element.",
                        rule.raw_selector
                    ),
                )
                .with_code(codes::UNMATCHED_SELECTOR),
            );
        }
    }
}

/// The model scoper narrowed to elements visible under `labels`.
///
/// Returns `None` before the model is scoped. Violations of the narrower
/// view are reported with the labels as context.
pub fn scoper_for_labels(model: &mut Model, labels: &[String]) -> Option<Scoper> {
    let predicate = Rc::new(LabelPredicate::new(labels.to_vec()));
    let context = format!("With visibility labels '{}'", labels.join(","));
    model.restrict_scoper(predicate, context)
}
