//! Visibility reachability over the element graph.
//!
//! A [`Scoper`] computes which elements are observable from a set of roots
//! (the declared API surface) under an in-scope predicate, and reports
//! visibility inconsistencies while doing so:
//!
//! - an in-scope element requires a type that is out of scope
//! - a required field is out of scope
//! - the default (first) value of an enum is out of scope
//! - the parent of a reachable element is out of scope (version gated)
//! - a field bound by an HTTP binding is not reachable (version gated)
//!
//! The computation runs once, at construction. [`Scoper::restrict`] layers an
//! extra predicate and recomputes from the same roots without touching the
//! original.

mod predicate;
mod reacher;

use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::base::ElementId;
use crate::config::VersionGates;
use crate::diagnostics::DiagCollector;
use crate::graph::Graph;

pub use predicate::{AllOf, AlwaysInScope, ScopePredicate};

use reacher::Reacher;

/// What the walk needs to know about the model besides the graph.
pub struct ScopeContext<'a> {
    pub graph: &'a Graph,
    pub config_version: u32,
    pub gates: &'a VersionGates,
}

/// The reachable subset of the graph for one set of roots and predicate.
pub struct Scoper {
    roots: Vec<ElementId>,
    predicate: Rc<dyn ScopePredicate>,
    error_context: String,
    reachable: FxHashSet<ElementId>,
    has_unreachable_descendants: FxHashSet<ElementId>,
    visited: FxHashSet<ElementId>,
}

impl Scoper {
    /// Scoper in which everything is in scope.
    pub fn create(ctx: &ScopeContext<'_>, diags: &mut DiagCollector, roots: Vec<ElementId>) -> Self {
        Self::with_predicate(ctx, diags, roots, Rc::new(AlwaysInScope), "")
    }

    /// Compute reachability from `roots` under `predicate`.
    ///
    /// A non-empty `error_context` is appended to every reported message.
    pub fn with_predicate(
        ctx: &ScopeContext<'_>,
        diags: &mut DiagCollector,
        roots: Vec<ElementId>,
        predicate: Rc<dyn ScopePredicate>,
        error_context: impl Into<String>,
    ) -> Self {
        let error_context = error_context.into();
        let (reachable, has_unreachable_descendants, visited) = {
            let mut reacher = Reacher::new(ctx, diags, predicate.as_ref(), &error_context);
            for &root in &roots {
                reacher.visit_in_scope(root);
            }
            (
                reacher.reachable,
                reacher.has_unreachable_descendants,
                reacher.visited,
            )
        };
        tracing::debug!(
            "scoper: {} root(s), {} visited, {} reachable",
            roots.len(),
            visited.len(),
            reachable.len()
        );
        Self {
            roots,
            predicate,
            error_context,
            reachable,
            has_unreachable_descendants,
            visited,
        }
    }

    /// A new scoper whose predicate is this one's and `predicate`.
    pub fn restrict(
        &self,
        ctx: &ScopeContext<'_>,
        diags: &mut DiagCollector,
        predicate: Rc<dyn ScopePredicate>,
        error_context: impl Into<String>,
    ) -> Scoper {
        let combined = AllOf::new(vec![self.predicate.clone(), predicate]);
        Self::with_predicate(
            ctx,
            diags,
            self.roots.clone(),
            Rc::new(combined),
            error_context,
        )
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn predicate(&self) -> Rc<dyn ScopePredicate> {
        self.predicate.clone()
    }

    pub fn in_scope(&self, graph: &Graph, element: ElementId) -> bool {
        self.predicate.in_scope(graph, element)
    }

    pub fn is_reachable(&self, element: impl Into<ElementId>) -> bool {
        self.reachable.contains(&element.into())
    }

    /// Whether some descendant (or, transitively, some element of a field's
    /// type) is hidden.
    pub fn has_unreachable_descendants(&self, element: impl Into<ElementId>) -> bool {
        self.has_unreachable_descendants.contains(&element.into())
    }

    /// Whether the walk offered this element, in scope or not.
    pub fn was_visited(&self, element: impl Into<ElementId>) -> bool {
        self.visited.contains(&element.into())
    }

    pub fn visit_count(&self) -> usize {
        self.visited.len()
    }

    pub fn reachable_count(&self) -> usize {
        self.reachable.len()
    }

    /// Keep only reachable elements, preserving order.
    pub fn filter<T, I>(&self, elements: I) -> Vec<T>
    where
        T: Copy + Into<ElementId>,
        I: IntoIterator<Item = T>,
    {
        elements
            .into_iter()
            .filter(|&e| self.is_reachable(e))
            .collect()
    }
}

impl fmt::Debug for Scoper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scoper")
            .field("roots", &self.roots)
            .field("error_context", &self.error_context)
            .field("reachable", &self.reachable.len())
            .field("visited", &self.visited.len())
            .finish()
    }
}
