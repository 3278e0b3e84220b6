//! Standard processors.
//!
//! ```text
//! Resolved ──► Merged ──► Normalized ──► Linted
//! ```
//!
//! - [`Resolver`]: symbol table, type and signature links
//! - [`Merger`]: service configuration, roots, aspect merging, scoping
//! - [`Normalizer`]: aspect normalization over reachable elements
//! - [`Linter`]: lint rules over reachable elements

mod linter;
mod merger;
mod normalizer;
mod resolver;

use crate::graph::AttributeKey;
use crate::model::Stage;

pub use linter::Linter;
pub use merger::Merger;
pub use normalizer::Normalizer;
pub use resolver::{Resolver, SymbolTable};

/// Names resolved; payload is the symbol table.
pub struct Resolved;

impl AttributeKey for Resolved {
    type Value = SymbolTable;
    const NAME: &'static str = "resolved";
}

impl Stage for Resolved {}

/// Service configuration merged and the model scoped.
pub struct Merged;

impl AttributeKey for Merged {
    type Value = ();
    const NAME: &'static str = "merged";
}

impl Stage for Merged {}

/// Aspects have normalized the reachable elements.
pub struct Normalized;

impl AttributeKey for Normalized {
    type Value = ();
    const NAME: &'static str = "normalized";
}

impl Stage for Normalized {}

/// Lint rules have run.
pub struct Linted;

impl AttributeKey for Linted {
    type Value = ();
    const NAME: &'static str = "linted";
}

impl Stage for Linted {}
