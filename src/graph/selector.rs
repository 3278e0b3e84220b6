//! Dotted field paths resolved against a message.

use crate::base::{FieldId, MessageId};
use crate::error::SelectorError;

use super::{Graph, TypeRef};

/// An ordered list of fields reached by following a dotted path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    fields: Vec<FieldId>,
}

impl FieldSelector {
    pub fn of(fields: Vec<FieldId>) -> Self {
        Self { fields }
    }

    /// Resolve `path` (e.g. `"shelf.book.name"`) starting at `message`.
    ///
    /// Every intermediate field must be of plain message type. Requires the
    /// Resolver stage for paths longer than one segment.
    pub fn resolve(graph: &Graph, message: MessageId, path: &str) -> Result<Self, SelectorError> {
        if path.is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut fields = Vec::new();
        let mut current = message;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            let field = graph.lookup_field(current, segment).ok_or_else(|| {
                SelectorError::UnknownField {
                    segment: segment.to_string(),
                    message: graph.message(current).header.full_name.clone(),
                }
            })?;
            fields.push(field);
            if segments.peek().is_some() {
                current = match graph.field_type(field) {
                    Some(TypeRef::Message(next)) => *next,
                    _ => {
                        return Err(SelectorError::NotAMessage {
                            segment: segment.to_string(),
                        });
                    }
                };
            }
        }
        Ok(Self { fields })
    }

    /// Whether `path` names a single field.
    pub fn has_single_path_element(path: &str) -> bool {
        !path.is_empty() && !path.contains('.')
    }

    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn last_field(&self) -> Option<FieldId> {
        self.fields.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A new selector extending this one by `field`.
    pub fn add(&self, field: FieldId) -> Self {
        let mut fields = self.fields.clone();
        fields.push(field);
        Self { fields }
    }

    pub fn is_prefix_of(&self, other: &FieldSelector) -> bool {
        other.fields.starts_with(&self.fields)
    }

    /// Path of simple field names.
    pub fn display(&self, graph: &Graph) -> String {
        self.fields
            .iter()
            .map(|&f| graph.field(f).header.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}
