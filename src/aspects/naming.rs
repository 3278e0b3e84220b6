//! Naming aspect: service name and element identifier checks.

use unicode_ident::{is_xid_continue, is_xid_start};

use crate::base::{ElementId, ElementKind, Location};
use crate::diagnostics::Diagnostic;
use crate::model::{ConfigAspect, LintRule, Model};

const MAX_DNS_NAME: usize = 253;
const MAX_DNS_LABEL: usize = 63;

/// The `naming` config aspect.
#[derive(Debug, Default)]
pub struct NamingConfigAspect;

impl ConfigAspect for NamingConfigAspect {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn lint_rules(&self) -> Vec<Box<dyn LintRule>> {
        vec![Box::new(ServiceNameRule), Box::new(IdentifierRule)]
    }
}

/// Whether `name` is a DNS-like name: at least two dot-separated labels of
/// lowercase letters, digits and inner hyphens.
pub fn is_dns_name(name: &str) -> bool {
    if name.len() > MAX_DNS_NAME {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= MAX_DNS_LABEL
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        })
}

/// Whether `name` is a valid identifier. `_` may start one.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || is_xid_start(first))
        && chars.all(is_xid_continue)
}

/// The service config name must be a DNS-like name.
pub struct ServiceNameRule;

impl LintRule for ServiceNameRule {
    fn name(&self) -> &'static str {
        "naming-service-name"
    }

    fn lint_model(&self, model: &Model) -> Vec<Diagnostic> {
        let Some(config) = model.service_config() else {
            return Vec::new();
        };
        if is_dns_name(&config.name) {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            Location::named("name"),
            format!(
                "Invalid DNS name '{}'. Service names should look like 'library.example.com'.",
                config.name
            ),
        )]
    }
}

/// Element names must be identifiers.
pub struct IdentifierRule;

impl LintRule for IdentifierRule {
    fn name(&self) -> &'static str {
        "naming-identifier"
    }

    fn applies_to(&self, kind: ElementKind) -> bool {
        kind != ElementKind::File
    }

    fn lint(&self, model: &Model, element: ElementId) -> Vec<Diagnostic> {
        let name = model.graph().name(element);
        if is_identifier(name) {
            return Vec::new();
        }
        vec![model.warning_for(
            element,
            format!(
                "{} name '{}' is not a valid identifier.",
                element.kind(),
                name
            ),
        )]
    }
}
