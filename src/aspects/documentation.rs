//! Documentation aspect.
//!
//! Descriptions come from `documentation.rules` when a rule selects the
//! element, otherwise from the element's comments. Normalization evaluates
//! the `(== code arg ==)` instructions embedded in a description and keeps
//! the remaining text as the element's [`Documentation`].

use rustc_hash::FxHashSet;

use crate::base::{ElementId, ElementKind, FieldId, Location, MessageId};
use crate::config::{DocumentationRule, Selector};
use crate::diagnostics::{Diagnostic, Suppression, codes};
use crate::graph::{AttributeKey, Graph, TypeRef};
use crate::model::{ConfigAspect, LintRule, Model};

const OPEN: &str = "(==";
const CLOSE: &str = "==)";

/// Documentation of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Description text, without instructions once normalized.
    pub text: String,
    pub page: Option<String>,
    pub deprecation_description: Option<String>,
    /// Resource names from `resource_for` instructions.
    pub resources: Vec<String>,
}

pub struct DocumentationAttribute;

impl AttributeKey for DocumentationAttribute {
    type Value = Documentation;
    const NAME: &'static str = "documentation";
}

/// Fields of a message marked by `required_field`, with the method named by
/// the instruction. Nothing in the analysis reads it; it is output for
/// downstream generators.
pub struct RequiredFieldsAttribute;

impl AttributeKey for RequiredFieldsAttribute {
    type Value = Vec<(FieldId, String)>;
    const NAME: &'static str = "required_fields";
}

/// Set by `inline_message` on a message or enum, and on every message and
/// enum nested in the message. Output for documentation generators.
pub struct InliningAttribute;

impl AttributeKey for InliningAttribute {
    type Value = ();
    const NAME: &'static str = "inlining";
}

// ============================================================================
// INSTRUCTIONS
// ============================================================================

/// A `(== code arg ==)` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub code: String,
    pub arg: String,
}

/// Description text split into plain text and instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDescription {
    pub text: String,
    pub instructions: Vec<Instruction>,
    /// Set when an instruction is not closed. The text is then unusable.
    pub unterminated: bool,
}

pub fn parse_description(source: &str) -> ParsedDescription {
    let mut parsed = ParsedDescription::default();
    let mut rest = source;
    while let Some(start) = rest.find(OPEN) {
        parsed.text.push_str(&rest[..start]);
        let body = &rest[start + OPEN.len()..];
        let Some(end) = body.find(CLOSE) else {
            parsed.unterminated = true;
            rest = "";
            break;
        };
        let content = body[..end].trim();
        let (code, arg) = content
            .split_once(char::is_whitespace)
            .unwrap_or((content, ""));
        parsed.instructions.push(Instruction {
            code: code.to_string(),
            arg: arg.trim().to_string(),
        });
        rest = &body[end + CLOSE.len()..];
    }
    parsed.text.push_str(rest);
    parsed.text = parsed.text.trim().to_string();
    parsed
}

// ============================================================================
// ASPECT
// ============================================================================

struct ConfiguredRule {
    selector: Selector,
    rule: DocumentationRule,
    matched: bool,
}

/// The `documentation` config aspect.
#[derive(Default)]
pub struct DocumentationConfigAspect {
    rules: Vec<ConfiguredRule>,
}

impl DocumentationConfigAspect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigAspect for DocumentationConfigAspect {
    fn name(&self) -> &'static str {
        "documentation"
    }

    fn lint_rules(&self) -> Vec<Box<dyn LintRule>> {
        vec![Box::new(DeprecationDescriptionRule)]
    }

    fn start_merging(&mut self, model: &mut Model) {
        self.rules = model
            .service_config()
            .map(|config| {
                config
                    .documentation
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
        let graph = model.graph();
        let full_name = graph.full_name(element);
        let mut documentation = Documentation {
            text: graph.documentation(element),
            ..Default::default()
        };
        if let Some(configured) = self
            .rules
            .iter_mut()
            .find(|c| c.selector.matches(full_name))
        {
            configured.matched = true;
            if let Some(description) = &configured.rule.description {
                documentation.text = description.clone();
            }
            documentation.deprecation_description =
                configured.rule.deprecation_description.clone();
        }
        model
            .graph_mut()
            .put_attr::<DocumentationAttribute>(element, documentation);
    }

    fn end_merging(&mut self, model: &mut Model) {
        for configured in self.rules.drain(..).filter(|c| !c.matched) {
            model.report(
                Diagnostic::warning(
                    Location::named("documentation.rules"),
                    format!(
                        "Selector '{}' of documentation rule does not match any element.",
                        configured.rule.selector
                    ),
                )
                .with_code(codes::UNMATCHED_SELECTOR),
            );
        }
    }

    fn normalize(&mut self, model: &mut Model, element: ElementId) {
        let Some(source) = model
            .graph()
            .attr::<DocumentationAttribute>(element)
            .map(|d| d.text.clone())
        else {
            return;
        };
        if !source.contains(OPEN) {
            return;
        }

        let parsed = parse_description(&source);
        if parsed.unterminated {
            model.error_at(
                element,
                codes::INVALID_DOC_INSTRUCTION,
                format!(
                    "Unterminated documentation instruction in '{}'.",
                    model.graph().full_name(element)
                ),
            );
            return;
        }

        let errors_before = model.error_count();
        for instruction in &parsed.instructions {
            evaluate(model, element, instruction);
        }
        // A description with a broken instruction is kept as written.
        if model.error_count() == errors_before
            && let Some(documentation) = model.graph_mut().attr_mut::<DocumentationAttribute>(element)
        {
            documentation.text = parsed.text;
        }
    }
}

fn evaluate(model: &mut Model, element: ElementId, instruction: &Instruction) {
    let arg = instruction.arg.clone();
    match instruction.code.as_str() {
        "page" => {
            if let Some(documentation) = model.graph_mut().attr_mut::<DocumentationAttribute>(element) {
                documentation.page = Some(arg);
            }
        }
        "suppress_warning" => {
            model
                .diags_mut()
                .add_suppression(Suppression::new(Some(element), arg));
        }
        "deprecation_description" => {
            if let Some(documentation) = model.graph_mut().attr_mut::<DocumentationAttribute>(element) {
                documentation.deprecation_description = Some(arg);
            }
        }
        "resource_for" => {
            if element.kind() != ElementKind::Message {
                let message = format!(
                    "resource instruction must be associated with a message declaration, but '{}' is not a message.",
                    model.graph().full_name(element)
                );
                model.error_at(element, codes::INVALID_DOC_INSTRUCTION, message);
            } else if let Some(documentation) =
                model.graph_mut().attr_mut::<DocumentationAttribute>(element)
            {
                documentation.resources.push(arg);
            }
        }
        "required_field" => {
            let ElementId::Field(field) = element else {
                model.error_at(
                    element,
                    codes::INVALID_DOC_INSTRUCTION,
                    "required_field instruction can only be applied to a field.",
                );
                return;
            };
            if let Some(parent) = model.graph().parent(element) {
                model
                    .graph_mut()
                    .attr_or_insert_with::<RequiredFieldsAttribute>(parent, Vec::new)
                    .push((field, arg));
            }
        }
        "inline_message" => match element {
            ElementId::Message(message) if reaches_cycle(model.graph(), message) => {
                let message = format!(
                    "inline_message instruction must be associated with a *non-recursive* message declaration, but '{}' is recursive or contains a recursive subfield.",
                    model.graph().full_name(element)
                );
                model.error_at(element, codes::INVALID_DOC_INSTRUCTION, message);
            }
            ElementId::Message(_) | ElementId::Enum(_) => mark_inlined(model, element),
            _ => {
                let message = format!(
                    "inline_message instruction must be associated with a message/enum declaration, but '{}' is not a message/enum.",
                    model.graph().full_name(element)
                );
                model.error_at(element, codes::INVALID_DOC_INSTRUCTION, message);
            }
        },
        code => {
            model.error_at(
                element,
                codes::INVALID_DOC_INSTRUCTION,
                format!("documentation instruction '{code}' unknown."),
            );
        }
    }
}

fn mark_inlined(model: &mut Model, element: ElementId) {
    let mut pending = vec![element];
    while let Some(current) = pending.pop() {
        if let ElementId::Message(message) = current {
            let message = model.graph().message(message);
            pending.extend(message.messages().iter().map(|&m| ElementId::Message(m)));
            pending.extend(message.enums().iter().map(|&e| ElementId::Enum(e)));
        }
        model.graph_mut().put_attr::<InliningAttribute>(current, ());
    }
}

/// Whether following message-typed fields from `message` runs into a cycle,
/// either through `message` itself or through one of its subfields.
fn reaches_cycle(graph: &Graph, message: MessageId) -> bool {
    fn walk(
        graph: &Graph,
        message: MessageId,
        on_path: &mut FxHashSet<MessageId>,
        done: &mut FxHashSet<MessageId>,
    ) -> bool {
        if on_path.contains(&message) {
            return true;
        }
        if !done.insert(message) {
            return false;
        }
        on_path.insert(message);
        let cyclic = graph
            .message(message)
            .fields()
            .iter()
            .filter_map(|&f| graph.field_type(f).and_then(TypeRef::message_type))
            .any(|next| walk(graph, next, on_path, done));
        on_path.remove(&message);
        cyclic
    }
    walk(graph, message, &mut FxHashSet::default(), &mut FxHashSet::default())
}

// ============================================================================
// LINT
// ============================================================================

/// Deprecated elements should say what replaces them.
pub struct DeprecationDescriptionRule;

impl LintRule for DeprecationDescriptionRule {
    fn name(&self) -> &'static str {
        "documentation-deprecated"
    }

    fn applies_to(&self, kind: ElementKind) -> bool {
        kind != ElementKind::File
    }

    fn lint(&self, model: &Model, element: ElementId) -> Vec<Diagnostic> {
        let graph = model.graph();
        if !graph.header(element).is_deprecated() {
            return Vec::new();
        }
        let described = graph
            .attr::<DocumentationAttribute>(element)
            .and_then(|d| d.deprecation_description.as_deref())
            .is_some_and(|d| !d.trim().is_empty());
        if described {
            return Vec::new();
        }
        vec![model.warning_for(
            element,
            format!(
                "'{}' is deprecated but has no deprecation description.",
                graph.full_name(element)
            ),
        )]
    }
}
