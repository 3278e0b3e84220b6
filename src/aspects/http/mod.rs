//! HTTP aspect.
//!
//! Merges HTTP rules into an [`HttpAttribute`] per method. A rule from the
//! service configuration takes precedence over the method's inline option.
//! Each rule yields its primary binding followed by its additional
//! bindings; path templates are parsed with [`parse_template`] and every
//! variable and the body are resolved against the method's input message.

mod template;

use rustc_hash::FxHashMap;

use crate::base::{ElementId, ElementKind, Location, MethodId};
use crate::config::Selector;
use crate::descriptor::HttpRule;
use crate::diagnostics::{Diagnostic, Severity, codes};
use crate::graph::{FieldSelector, HttpAttribute, HttpBinding, HttpMethod};
use crate::model::{ConfigAspect, LintRule, Model, Validator};

pub use template::{ParsedTemplate, TemplateProblem, parse_template};

/// Names clashing with keywords of common client languages.
const RESERVED_KEYWORDS: &[&str] = &[
    "abstract", "async", "await", "boolean", "break", "case", "catch", "char", "class", "const",
    "continue", "default", "delete", "do", "double", "else", "enum", "export", "extends", "false",
    "final", "float", "for", "function", "goto", "if", "implements", "import", "in", "instanceof",
    "int", "interface", "let", "long", "native", "new", "null", "package", "private", "protected",
    "public", "return", "short", "static", "super", "switch", "synchronized", "this", "throw",
    "throws", "true", "try", "typeof", "var", "void", "volatile", "while", "with", "yield",
];

struct ConfiguredRule {
    selector: Selector,
    rule: HttpRule,
    matched: bool,
}

/// The `http` config aspect.
#[derive(Default)]
pub struct HttpConfigAspect {
    rules: Vec<ConfiguredRule>,
}

impl HttpConfigAspect {
    pub fn new() -> Self {
        Self::default()
    }

    fn configured_rule(&mut self, full_name: &str) -> Option<HttpRule> {
        let configured = self
            .rules
            .iter_mut()
            .find(|c| c.selector.matches(full_name))?;
        configured.matched = true;
        Some(configured.rule.clone())
    }
}

impl ConfigAspect for HttpConfigAspect {
    fn name(&self) -> &'static str {
        "http"
    }

    fn lint_rules(&self) -> Vec<Box<dyn LintRule>> {
        vec![Box::new(ReservedKeywordRule)]
    }

    fn validators(&self) -> Vec<Box<dyn Validator>> {
        vec![Box::new(HttpBindingValidator)]
    }

    fn start_merging(&mut self, model: &mut Model) {
        self.rules = model
            .service_config()
            .map(|config| {
                config
                    .http
                    .rules
                    .iter()
                    .map(|rule| ConfiguredRule {
                        selector: Selector::parse(&rule.selector),
                        rule: rule.clone(),
                        matched: false,
                    })
                    .collect()
            })
            .unwrap_or_default();
    }

    fn merge(&mut self, model: &mut Model, element: ElementId) {
        let ElementId::Method(method) = element else {
            return;
        };
        let full_name = model.graph().full_name(element).to_string();
        let rule = match self.configured_rule(&full_name) {
            Some(rule) => rule,
            None => match model.graph().method(method).http_option() {
                Some(rule) => rule.clone(),
                None => return,
            },
        };

        let mut problems = Vec::new();
        let mut bindings = Vec::new();
        if let Some(binding) = build_binding(model, method, &rule, true, &mut problems) {
            bindings.push(binding);
        }
        for additional in &rule.additional_bindings {
            if let Some(binding) = build_binding(model, method, additional, false, &mut problems) {
                bindings.push(binding);
            }
        }
        for problem in problems {
            model.report(problem);
        }

        if !bindings.is_empty() {
            tracing::trace!("{} http binding(s) for '{}'", bindings.len(), full_name);
            model.graph_mut().put_attr::<HttpAttribute>(element, bindings);
        }
    }

    fn end_merging(&mut self, model: &mut Model) {
        for configured in self.rules.drain(..).filter(|c| !c.matched) {
            model.report(
                Diagnostic::error(
                    Location::named("http.rules"),
                    format!(
                        "Selector '{}' of http rule does not match any method.",
                        configured.rule.selector
                    ),
                )
                .with_code(codes::UNMATCHED_SELECTOR),
            );
        }
    }
}

fn http_method(verb: &str) -> HttpMethod {
    match verb {
        "GET" => HttpMethod::Get,
        "PUT" => HttpMethod::Put,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        "PATCH" => HttpMethod::Patch,
        other => HttpMethod::Custom(other.into()),
    }
}

/// Build one binding of `method` from `rule`, collecting problems.
fn build_binding(
    model: &Model,
    method: MethodId,
    rule: &HttpRule,
    primary: bool,
    problems: &mut Vec<Diagnostic>,
) -> Option<HttpBinding> {
    let element = ElementId::Method(method);
    let graph = model.graph();
    let method_name = graph.full_name(element);

    let Some((verb, path)) = rule.pattern() else {
        problems.push(
            model
                .error_for(
                    element,
                    format!("HTTP rule of method '{method_name}' declares no pattern."),
                )
                .with_code(codes::INVALID_HTTP_TEMPLATE),
        );
        return None;
    };

    let (parsed, template_problems) = parse_template(path);
    for problem in template_problems {
        let diagnostic = match problem.severity {
            Severity::Error => model.error_for(element, problem.message),
            _ => model.warning_for(element, problem.message),
        };
        problems.push(diagnostic.with_code(codes::INVALID_HTTP_TEMPLATE));
    }
    let parsed = parsed?;

    // Without a resolved input message no field path can be checked.
    let input = graph.method_signature(method).map(|s| s.input);
    let mut resolve = |field_path: &str, what: &str| -> Option<FieldSelector> {
        let input = input?;
        match FieldSelector::resolve(graph, input, field_path) {
            Ok(selector) => Some(selector),
            Err(err) => {
                problems.push(
                    model
                        .error_for(
                            element,
                            format!(
                                "Field path '{field_path}' in {what} of method '{method_name}' cannot be resolved: {err}."
                            ),
                        )
                        .with_code(codes::UNRESOLVED_FIELD_PATH),
                );
                None
            }
        }
    };

    let path_selectors = parsed
        .field_paths()
        .into_iter()
        .filter_map(|field_path| resolve(field_path, "HTTP path"))
        .collect();

    let body = (!rule.body.is_empty()).then(|| rule.body.clone());
    let body_selectors = match body.as_deref() {
        Some(body) if body != "*" => resolve(body, "HTTP body").into_iter().collect(),
        _ => Vec::new(),
    };

    Some(HttpBinding {
        method: http_method(verb),
        path: path.to_string(),
        segments: parsed.segments,
        custom_verb: parsed.custom_verb,
        path_selectors,
        body,
        body_selectors,
        primary,
    })
}

// ============================================================================
// LINT
// ============================================================================

/// Warns on bound fields whose names are keywords in client languages.
pub struct ReservedKeywordRule;

impl LintRule for ReservedKeywordRule {
    fn name(&self) -> &'static str {
        "http-reserved-keyword"
    }

    fn applies_to(&self, kind: ElementKind) -> bool {
        kind == ElementKind::Method
    }

    fn lint(&self, model: &Model, element: ElementId) -> Vec<Diagnostic> {
        let graph = model.graph();
        let Some(bindings) = graph.attr::<HttpAttribute>(element) else {
            return Vec::new();
        };
        let mut seen = Vec::new();
        for binding in bindings {
            let fields = binding
                .path_selectors
                .iter()
                .chain(&binding.body_selectors)
                .flat_map(|s| s.fields());
            for &field in fields {
                let name = graph.name(field.into());
                if RESERVED_KEYWORDS.contains(&name) && !seen.contains(&field) {
                    seen.push(field);
                }
            }
        }
        seen.into_iter()
            .map(|field| {
                model.warning_for(
                    element,
                    format!(
                        "Field '{}' bound by HTTP rule of method '{}' is a reserved keyword.",
                        graph.name(field.into()),
                        graph.full_name(element)
                    ),
                )
            })
            .collect()
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Rejects bodies on GET/DELETE and verb+path pairs bound by two methods.
pub struct HttpBindingValidator;

impl Validator for HttpBindingValidator {
    fn name(&self) -> &'static str {
        "http-bindings"
    }

    fn validate(&self, model: &Model) -> Vec<Diagnostic> {
        let graph = model.graph();
        let mut found = Vec::new();
        let mut owners: FxHashMap<(String, String), MethodId> = FxHashMap::default();

        for method in graph.method_ids() {
            let element = ElementId::Method(method);
            if !model.is_reachable(element) {
                continue;
            }
            let Some(bindings) = graph.attr::<HttpAttribute>(element) else {
                continue;
            };
            for binding in bindings {
                if binding.method.forbids_body() && binding.body.is_some() {
                    found.push(
                        model
                            .error_for(
                                element,
                                format!(
                                    "HTTP {} binding of method '{}' must not declare a body.",
                                    binding.method.as_str(),
                                    graph.full_name(element)
                                ),
                            )
                            .with_code(codes::HTTP_BODY_NOT_ALLOWED),
                    );
                }

                let key = (binding.method.as_str().to_string(), binding.path.clone());
                match owners.get(&key) {
                    Some(&owner) if owner != method => found.push(
                        model
                            .error_for(
                                element,
                                format!(
                                    "HTTP binding '{} {}' of method '{}' conflicts with method '{}'.",
                                    key.0,
                                    key.1,
                                    graph.full_name(element),
                                    graph.full_name(owner.into())
                                ),
                            )
                            .with_code(codes::HTTP_BINDING_CONFLICT),
                    ),
                    Some(_) => {}
                    None => {
                        owners.insert(key, method);
                    }
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests;
