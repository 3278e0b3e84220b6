//! The reachability walk.
//!
//! Depth-first from the roots, memoized on a `visited` set so every element is
//! offered to the walk at most once. This bounds the work by the graph size
//! and terminates on recursive message types.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::{ElementId, EnumId, FieldId, MessageId, MethodId};
use crate::config::GatedRule;
use crate::diagnostics::{Diagnostic, DiagCollector, codes};
use crate::graph::{Graph, HttpAttribute, TypeRef};

use super::{ScopeContext, ScopePredicate};

const MISSING_REASON: &str = "**Oops**: this looks like a bug, please report";

pub(super) struct Reacher<'a> {
    graph: &'a Graph,
    ctx: &'a ScopeContext<'a>,
    diags: &'a mut DiagCollector,
    predicate: &'a dyn ScopePredicate,
    error_context: &'a str,
    pub(super) reachable: FxHashSet<ElementId>,
    pub(super) has_unreachable_descendants: FxHashSet<ElementId>,
    pub(super) visited: FxHashSet<ElementId>,
    reasons: FxHashMap<ElementId, String>,
}

impl<'a> Reacher<'a> {
    pub(super) fn new(
        ctx: &'a ScopeContext<'a>,
        diags: &'a mut DiagCollector,
        predicate: &'a dyn ScopePredicate,
        error_context: &'a str,
    ) -> Self {
        Self {
            graph: ctx.graph,
            ctx,
            diags,
            predicate,
            error_context,
            reachable: FxHashSet::default(),
            has_unreachable_descendants: FxHashSet::default(),
            visited: FxHashSet::default(),
            reasons: FxHashMap::default(),
        }
    }

    /// Offer an element to the walk. Visits it if it was never offered before
    /// and is in scope.
    pub(super) fn visit_in_scope(&mut self, element: ElementId) {
        if !self.visited.insert(element) {
            return;
        }
        if !self.predicate.in_scope(self.graph, element) {
            self.note_out_of_scope(element);
            return;
        }
        self.visit(element);
    }

    fn visit_all_in_scope(&mut self, elements: impl IntoIterator<Item = ElementId>) {
        for element in elements {
            self.visit_in_scope(element);
        }
    }

    fn visit(&mut self, element: ElementId) {
        match element {
            ElementId::File(_) => {
                self.mark_as_reachable(element);
                let children = self.graph.children(element);
                self.visit_all_in_scope(children);
            }
            ElementId::Interface(_) => {
                self.mark_as_reachable(element);
                let methods = self.graph.children(element);
                self.visit_all_in_scope(methods);
            }
            ElementId::Method(method) => self.reach_method(method),
            ElementId::Message(message) => self.reach_message(message),
            ElementId::Field(field) => self.reach_field(field),
            ElementId::Enum(enum_type) => self.reach_enum(enum_type),
            ElementId::EnumValue(_) => self.mark_as_reachable(element),
        }
    }

    // ============================================================
    // Element Rules
    // ============================================================

    fn reach_method(&mut self, method: MethodId) {
        let graph = self.graph;
        let id = ElementId::Method(method);
        if let Some(signature) = graph.method_signature(method) {
            self.must_be_in_scope(id, ElementId::Message(signature.input));
            self.must_be_in_scope(id, ElementId::Message(signature.output));
        }
        self.mark_as_reachable(id);

        let Some(bindings) = graph.attr::<HttpAttribute>(id) else {
            return;
        };
        for binding in bindings {
            for selector in binding.required_selectors() {
                let fields = selector.fields();
                for (index, &field) in fields.iter().enumerate() {
                    let field_id = ElementId::Field(field);
                    if self.reachable.contains(&field_id) {
                        continue;
                    }
                    self.inherit_reason(field_id, &fields[..index]);
                    self.violation(
                        field_id,
                        codes::HTTP_FIELD_HIDDEN,
                        Some(GatedRule::HttpFieldHidden),
                        |reason| {
                            format!(
                                "Field '{}' required by HTTP binding of method '{}' cannot be hidden. {}.",
                                graph.full_name(field_id),
                                graph.full_name(id),
                                reason
                            )
                        },
                    );
                }
            }
        }
    }

    fn reach_message(&mut self, message: MessageId) {
        let graph = self.graph;
        let id = ElementId::Message(message);
        self.mark_as_reachable(id);
        let fields = graph.message(message).fields();
        self.visit_all_in_scope(fields.iter().map(|&f| ElementId::Field(f)));

        for &field in fields {
            let field_id = ElementId::Field(field);
            if !self.reachable.contains(&field_id) {
                self.has_unreachable_descendants.insert(id);
                if graph.field(field).is_required() {
                    self.violation(field_id, codes::REQUIRED_FIELD_HIDDEN, None, |reason| {
                        format!("A required field cannot be hidden. {reason}.")
                    });
                }
                continue;
            }
            let type_element = match graph.field_type(field) {
                Some(ty) if ty.is_message() => ty.message_type().map(ElementId::Message),
                Some(TypeRef::Enum(e)) => Some(ElementId::Enum(*e)),
                _ => None,
            };
            // A hidden type counts as a hidden descendant, as does anything
            // hidden below the type.
            let propagates = type_element.is_some_and(|t| {
                !self.reachable.contains(&t) || self.has_unreachable_descendants.contains(&t)
            });
            if propagates {
                self.has_unreachable_descendants.insert(id);
            }
        }
    }

    fn reach_field(&mut self, field: FieldId) {
        let graph = self.graph;
        let id = ElementId::Field(field);
        match graph.field_type(field) {
            Some(TypeRef::Map { entry, value, .. }) => {
                // The entry message is plumbing: include it, but only blame
                // the value type.
                self.visit_in_scope(ElementId::Message(*entry));
                if let Some(value_message) = graph.field_type(*value).and_then(|t| t.message_type())
                {
                    self.must_be_in_scope(id, ElementId::Message(value_message));
                }
            }
            Some(TypeRef::Message(message)) => {
                self.must_be_in_scope(id, ElementId::Message(*message));
            }
            Some(TypeRef::Enum(enum_type)) => {
                self.must_be_in_scope(id, ElementId::Enum(*enum_type));
            }
            Some(TypeRef::Scalar(_)) | None => {}
        }
        self.mark_as_reachable(id);
    }

    fn reach_enum(&mut self, enum_type: EnumId) {
        let graph = self.graph;
        let id = ElementId::Enum(enum_type);
        self.mark_as_reachable(id);
        let values = graph.enum_type(enum_type).values();
        self.visit_all_in_scope(values.iter().map(|&v| ElementId::EnumValue(v)));

        for &value in values {
            let value_id = ElementId::EnumValue(value);
            if self.reachable.contains(&value_id) {
                continue;
            }
            if graph.enum_value(value).index() == 0 {
                self.violation(value_id, codes::DEFAULT_VALUE_HIDDEN, None, |reason| {
                    format!(
                        "The default value of '{}' cannot be hidden. {}.",
                        graph.full_name(id),
                        reason
                    )
                });
            }
            self.has_unreachable_descendants.insert(id);
        }
    }

    // ============================================================
    // Helpers
    // ============================================================

    /// Offer `element` and report an error if it did not become reachable.
    fn must_be_in_scope(&mut self, context: ElementId, element: ElementId) {
        self.visit_in_scope(element);
        if self.reachable.contains(&element) {
            return;
        }
        // Reported once for the map field itself, not for the entry's value.
        if let ElementId::Field(field) = context
            && let Some(ElementId::Message(owner)) = self.graph.field(field).header().parent()
            && self.graph.message(owner).is_map_entry()
        {
            return;
        }
        let graph = self.graph;
        self.violation(element, codes::HIDDEN_BUT_REQUIRED, None, |reason| {
            format!(
                "'{}' is hidden but required by visible '{}'. {}.",
                graph.full_name(element),
                graph.full_name(context),
                reason
            )
        });
    }

    /// Mark an element and all its ancestors reachable.
    fn mark_as_reachable(&mut self, element: ElementId) {
        let graph = self.graph;
        self.reachable.insert(element);
        let mut current = graph.parent(element);
        while let Some(parent) = current {
            if self.reachable.insert(parent) && !self.predicate.in_scope(graph, parent) {
                self.note_out_of_scope(parent);
                self.violation(
                    parent,
                    codes::HIDDEN_PARENT,
                    Some(GatedRule::HiddenParent),
                    |reason| {
                        format!(
                            "Parent '{}' of visible element '{}' cannot be hidden. {}.",
                            graph.full_name(parent),
                            graph.full_name(element),
                            reason
                        )
                    },
                );
            }
            current = graph.parent(parent);
        }
    }

    fn note_out_of_scope(&mut self, element: ElementId) {
        if self.reasons.contains_key(&element) {
            return;
        }
        let reason = self
            .predicate
            .reason_for_unreachable(self.graph, element)
            .unwrap_or_else(|| format!("'{}' is not in scope", self.graph.full_name(element)));
        self.reasons.insert(element, reason);
    }

    /// Give a field the walk never offered the reason of the hidden element
    /// that cut it off: an earlier field of its selector, else an ancestor.
    fn inherit_reason(&mut self, field: ElementId, prefix: &[FieldId]) {
        if self.reasons.contains_key(&field) {
            return;
        }
        let graph = self.graph;
        let inherited = prefix
            .iter()
            .map(|&f| ElementId::Field(f))
            .chain(std::iter::successors(graph.parent(field), |&e| {
                graph.parent(e)
            }))
            .find_map(|e| self.reasons.get(&e).cloned());
        if let Some(reason) = inherited {
            self.reasons.insert(field, reason);
        }
    }

    /// Report a violation about `element`.
    ///
    /// Gated rules are errors from their threshold config version on and
    /// warnings with a note before. A missing reason means the walk broke its
    /// own bookkeeping; such reports carry the internal error code.
    fn violation(
        &mut self,
        element: ElementId,
        code: &'static str,
        gate: Option<GatedRule>,
        render: impl FnOnce(&str) -> String,
    ) {
        let (reason, code) = match self.reasons.get(&element) {
            Some(reason) => (reason.as_str(), code),
            None => (MISSING_REASON, codes::INTERNAL),
        };
        let mut message = render(reason);
        if !self.error_context.is_empty() {
            message.push(' ');
            message.push_str(self.error_context);
            message.push('.');
        }

        let threshold = gate.map_or(0, |rule| self.ctx.gates.threshold(rule));
        let location = self.graph.location(element);
        let diagnostic = if self.ctx.config_version >= threshold {
            Diagnostic::error(location, message).with_code(code)
        } else {
            message.push_str(&format!(
                " Note: this will be an error for config version {threshold} and later."
            ));
            Diagnostic::warning(location, message).with_code(codes::VERSION_GATED)
        };
        self.diags
            .report(diagnostic.with_element(element), &self.graph.ancestry(element));
    }
}
