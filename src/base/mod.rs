//! Foundation types for protoscope.
//!
//! This module provides fundamental types used throughout the analysis:
//! - [`ElementId`] and the typed arena ids it wraps
//! - [`Location`] - Where a diagnostic points
//! - [`Position`], [`Span`] - Line/column positions from descriptor source info
//! - Descriptor field numbers and config version constants
//!
//! This module has NO dependencies on other protoscope modules.

pub mod constants;
mod ids;
mod location;
mod position;

pub use ids::{
    ElementId, ElementKind, EnumId, EnumValueId, FieldId, FileId, InterfaceId, MessageId, MethodId,
};
pub use location::Location;
pub use position::{Position, Span};

/// Append a `(field_number, index)` pair to a structural path.
///
/// Paths are the dot-joined field numbers and indices that locate an element
/// inside its file descriptor, e.g. `4.0.2.1` for the second field of the
/// first top-level message.
pub fn child_path(parent: &str, field_number: i32, index: usize) -> String {
    if parent.is_empty() {
        format!("{field_number}.{index}")
    } else {
        format!("{parent}.{field_number}.{index}")
    }
}
