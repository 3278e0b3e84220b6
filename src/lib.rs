//! # protoscope-base
//!
//! Staged semantic analysis of protocol-buffer API descriptions: an element
//! graph built from a descriptor set, a dependency-ordered processor
//! pipeline, visibility scoping, and service-config aspects.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! setup       → Standard registration, analysis driver
//!   ↓
//! aspects     → HTTP, visibility, documentation, versioning, naming
//!   ↓
//! processors  → Resolver, Merger, Normalizer, Linter
//!   ↓
//! model       → Model, stages, processor and aspect registries
//!   ↓
//! scoper      → Reachability from the API roots, visibility checks
//!   ↓
//! graph       → Element arenas, attributes, field selectors
//!   ↓
//! descriptor  → Serde mirror of FileDescriptorSet
//! config      → Service config, analysis options
//! diagnostics → Diagnostics, suppression
//!   ↓
//! base        → Primitives (ElementId, Location, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → diagnostics → graph → scoper → model → processors → aspects)
// ============================================================================

/// Foundation types: element ids, locations, descriptor constants
pub mod base;

/// Diagnostics: errors, warnings, suppression directives
pub mod diagnostics;

/// Fatal error types
pub mod error;

/// Descriptor-set input types
pub mod descriptor;

/// Service configuration and analysis options
pub mod config;

/// Element graph with per-element attributes
pub mod graph;

/// Visibility reachability
pub mod scoper;

/// Model and staged processing
pub mod model;

/// Standard processors
pub mod processors;

/// Standard config aspects
pub mod aspects;

/// Standard setup and driver
pub mod setup;

// Re-export foundation types
pub use base::{ElementId, ElementKind, Location, Position, Span};

// Re-export the main entry points
pub use config::{AnalysisOptions, ServiceConfig};
pub use descriptor::FileDescriptorSet;
pub use diagnostics::{DiagCollector, Diagnostic, Severity};
pub use error::{ConfigError, ModelError, SelectorError};
pub use graph::Graph;
pub use model::Model;
pub use scoper::Scoper;
pub use setup::{AnalysisOutcome, analyze, register_standard_config_aspects, register_standard_processors};
