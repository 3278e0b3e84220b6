//! Resolved type references.
//!
//! Type links are derived facts: the Resolver stage attaches them to fields and
//! methods as attributes.

use crate::base::{EnumId, FieldId, MessageId};
use crate::descriptor::FieldType;

use super::AttributeKey;

/// The resolved type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(FieldType),
    Message(MessageId),
    Enum(EnumId),
    /// A map field. `entry` is the synthetic key/value message.
    Map {
        entry: MessageId,
        key: FieldId,
        value: FieldId,
    },
}

impl TypeRef {
    /// Message-valued, including maps (whose values are entry messages).
    pub fn is_message(&self) -> bool {
        matches!(self, TypeRef::Message(_) | TypeRef::Map { .. })
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeRef::Enum(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, TypeRef::Map { .. })
    }

    /// The message type, or the entry message for maps.
    pub fn message_type(&self) -> Option<MessageId> {
        match self {
            TypeRef::Message(id) => Some(*id),
            TypeRef::Map { entry, .. } => Some(*entry),
            _ => None,
        }
    }

    pub fn enum_type(&self) -> Option<EnumId> {
        match self {
            TypeRef::Enum(id) => Some(*id),
            _ => None,
        }
    }

    /// The value field of the entry message, for maps.
    pub fn map_value_field(&self) -> Option<FieldId> {
        match self {
            TypeRef::Map { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Attribute key: the resolved type of a field.
pub struct ResolvedType;

impl AttributeKey for ResolvedType {
    type Value = TypeRef;
    const NAME: &'static str = "resolver.type";
}

/// Resolved request and response messages of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    pub input: MessageId,
    pub output: MessageId,
}

/// Attribute key: the resolved signature of a method.
pub struct ResolvedSignature;

impl AttributeKey for ResolvedSignature {
    type Value = MethodSignature;
    const NAME: &'static str = "resolver.signature";
}
