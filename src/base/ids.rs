//! Typed arena indices for graph elements.

use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id from an arena index
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// Get the index into the arena
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

arena_id!(
    /// Index of a file in the graph.
    FileId
);
arena_id!(
    /// Index of a message type in the graph.
    MessageId
);
arena_id!(
    /// Index of a message field in the graph.
    FieldId
);
arena_id!(
    /// Index of an enum type in the graph.
    EnumId
);
arena_id!(
    /// Index of an enum value in the graph.
    EnumValueId
);
arena_id!(
    /// Index of an interface (service) in the graph.
    InterfaceId
);
arena_id!(
    /// Index of a method in the graph.
    MethodId
);

/// Any element of the graph.
///
/// This is the closed set of element variants; traversals match on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementId {
    File(FileId),
    Message(MessageId),
    Field(FieldId),
    Enum(EnumId),
    EnumValue(EnumValueId),
    Interface(InterfaceId),
    Method(MethodId),
}

/// The kind of an element, without its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    File,
    Message,
    Field,
    Enum,
    EnumValue,
    Interface,
    Method,
}

impl ElementId {
    pub fn kind(self) -> ElementKind {
        match self {
            ElementId::File(_) => ElementKind::File,
            ElementId::Message(_) => ElementKind::Message,
            ElementId::Field(_) => ElementKind::Field,
            ElementId::Enum(_) => ElementKind::Enum,
            ElementId::EnumValue(_) => ElementKind::EnumValue,
            ElementId::Interface(_) => ElementKind::Interface,
            ElementId::Method(_) => ElementKind::Method,
        }
    }
}

impl ElementKind {
    /// Human readable name, used in diagnostics.
    pub fn display(self) -> &'static str {
        match self {
            ElementKind::File => "file",
            ElementKind::Message => "message",
            ElementKind::Field => "field",
            ElementKind::Enum => "enum",
            ElementKind::EnumValue => "enum value",
            ElementKind::Interface => "interface",
            ElementKind::Method => "method",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

macro_rules! into_element_id {
    ($($id:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$id> for ElementId {
                fn from(id: $id) -> Self {
                    ElementId::$variant(id)
                }
            }
        )*
    };
}

into_element_id!(
    FileId => File,
    MessageId => Message,
    FieldId => Field,
    EnumId => Enum,
    EnumValueId => EnumValue,
    InterfaceId => Interface,
    MethodId => Method,
);
