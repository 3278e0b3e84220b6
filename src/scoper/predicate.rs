//! In-scope predicates.

use std::rc::Rc;

use crate::base::ElementId;
use crate::graph::Graph;

/// Decides whether an element belongs to the current view of the model.
pub trait ScopePredicate {
    fn in_scope(&self, graph: &Graph, element: ElementId) -> bool;

    /// Why an out-of-scope element is excluded, used in diagnostics.
    fn reason_for_unreachable(&self, _graph: &Graph, _element: ElementId) -> Option<String> {
        None
    }
}

impl<F> ScopePredicate for F
where
    F: Fn(&Graph, ElementId) -> bool,
{
    fn in_scope(&self, graph: &Graph, element: ElementId) -> bool {
        self(graph, element)
    }
}

/// Every element is in scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysInScope;

impl ScopePredicate for AlwaysInScope {
    fn in_scope(&self, _graph: &Graph, _element: ElementId) -> bool {
        true
    }
}

/// Conjunction of predicates. The first predicate rejecting an element
/// supplies the reason.
#[derive(Clone, Default)]
pub struct AllOf {
    predicates: Vec<Rc<dyn ScopePredicate>>,
}

impl AllOf {
    pub fn new(predicates: Vec<Rc<dyn ScopePredicate>>) -> Self {
        Self { predicates }
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl ScopePredicate for AllOf {
    fn in_scope(&self, graph: &Graph, element: ElementId) -> bool {
        self.predicates.iter().all(|p| p.in_scope(graph, element))
    }

    fn reason_for_unreachable(&self, graph: &Graph, element: ElementId) -> Option<String> {
        self.predicates
            .iter()
            .find(|p| !p.in_scope(graph, element))
            .and_then(|p| p.reason_for_unreachable(graph, element))
    }
}
