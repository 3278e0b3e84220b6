//! The element graph: the semantic model of a descriptor set.
//!
//! The graph is a forest of containers (file → message/enum → field/value,
//! file → interface → method) stored in per-kind arenas and addressed by
//! typed ids. Cross references (field → type, method → input/output) are
//! derived facts attached as attributes by later passes and may form cycles.
//!
//! ## Key Types
//!
//! - [`Graph`] - arenas plus per-element [`AttributeBag`]s
//! - [`ElementRef`] - borrowed view of any element
//! - [`TypeRef`] - resolved field type
//! - [`FieldSelector`] - a resolved dotted field path
//! - [`HttpAttribute`] - HTTP bindings of a method

mod attributes;
mod builder;
mod element;
mod http;
mod selector;
mod types;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::constants::FILE_DOC_LOCATIONS;
use crate::base::{
    ElementId, EnumId, EnumValueId, FieldId, FileId, InterfaceId, Location, MessageId, MethodId,
    Span,
};

pub use attributes::{AttributeBag, AttributeKey};
pub use element::{
    ElementHeader, ElementRef, EnumType, EnumValue, ExtensionEntry, Field, File, Interface,
    Message, Method, Syntax,
};
pub use http::{HttpAttribute, HttpBinding, HttpMethod, PathSegment};
pub use selector::FieldSelector;
pub use types::{MethodSignature, ResolvedSignature, ResolvedType, TypeRef};

/// The element graph.
///
/// Built once from a descriptor set; afterwards no element is created or
/// removed, only attributes change.
#[derive(Debug, Default)]
pub struct Graph {
    pub(crate) files: Vec<File>,
    pub(crate) messages: Vec<Message>,
    pub(crate) fields: Vec<Field>,
    pub(crate) enums: Vec<EnumType>,
    pub(crate) enum_values: Vec<EnumValue>,
    pub(crate) interfaces: Vec<Interface>,
    pub(crate) methods: Vec<Method>,
    pub(crate) files_by_name: FxHashMap<SmolStr, FileId>,
    attributes: FxHashMap<ElementId, AttributeBag>,
}

impl Graph {
    // ============================================================
    // Arena Access
    // ============================================================

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.index()]
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.index()]
    }

    pub fn enum_type(&self, id: EnumId) -> &EnumType {
        &self.enums[id.index()]
    }

    pub fn enum_value(&self, id: EnumValueId) -> &EnumValue {
        &self.enum_values[id.index()]
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.interfaces[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    pub fn element(&self, id: ElementId) -> ElementRef<'_> {
        match id {
            ElementId::File(id) => ElementRef::File(self.file(id)),
            ElementId::Message(id) => ElementRef::Message(self.message(id)),
            ElementId::Field(id) => ElementRef::Field(self.field(id)),
            ElementId::Enum(id) => ElementRef::Enum(self.enum_type(id)),
            ElementId::EnumValue(id) => ElementRef::EnumValue(self.enum_value(id)),
            ElementId::Interface(id) => ElementRef::Interface(self.interface(id)),
            ElementId::Method(id) => ElementRef::Method(self.method(id)),
        }
    }

    pub fn header(&self, id: ElementId) -> &ElementHeader {
        self.element(id).header()
    }

    pub fn name(&self, id: ElementId) -> &str {
        self.header(id).name()
    }

    pub fn full_name(&self, id: ElementId) -> &str {
        self.header(id).full_name()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.header(id).parent()
    }

    /// The file whose descriptor declares `id`.
    pub fn file_of(&self, id: ElementId) -> FileId {
        self.header(id).file()
    }

    /// The element followed by its ancestors, innermost first.
    pub fn ancestry(&self, id: ElementId) -> Vec<ElementId> {
        let mut chain = vec![id];
        let mut current = self.parent(id);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    // ============================================================
    // Iteration
    // ============================================================

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(FileId::new)
    }

    pub fn interface_ids(&self) -> impl Iterator<Item = InterfaceId> + '_ {
        (0..self.interfaces.len()).map(InterfaceId::new)
    }

    pub fn message_ids(&self) -> impl Iterator<Item = MessageId> + '_ {
        (0..self.messages.len()).map(MessageId::new)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        (0..self.fields.len()).map(FieldId::new)
    }

    pub fn enum_ids(&self) -> impl Iterator<Item = EnumId> + '_ {
        (0..self.enums.len()).map(EnumId::new)
    }

    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len()).map(MethodId::new)
    }

    /// Total number of elements of all kinds.
    pub fn element_count(&self) -> usize {
        self.files.len()
            + self.messages.len()
            + self.fields.len()
            + self.enums.len()
            + self.enum_values.len()
            + self.interfaces.len()
            + self.methods.len()
    }

    /// Direct children of an element in containment order.
    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        match self.element(id) {
            ElementRef::File(file) => file
                .messages
                .iter()
                .map(|&m| ElementId::Message(m))
                .chain(file.enums.iter().map(|&e| ElementId::Enum(e)))
                .chain(file.interfaces.iter().map(|&i| ElementId::Interface(i)))
                .collect(),
            ElementRef::Message(message) => message
                .fields
                .iter()
                .map(|&f| ElementId::Field(f))
                .chain(message.messages.iter().map(|&m| ElementId::Message(m)))
                .chain(message.enums.iter().map(|&e| ElementId::Enum(e)))
                .collect(),
            ElementRef::Enum(enum_type) => enum_type
                .values
                .iter()
                .map(|&v| ElementId::EnumValue(v))
                .collect(),
            ElementRef::Interface(interface) => interface
                .methods
                .iter()
                .map(|&m| ElementId::Method(m))
                .collect(),
            ElementRef::Field(_) | ElementRef::EnumValue(_) | ElementRef::Method(_) => Vec::new(),
        }
    }

    /// Pre-order walk of the containment tree below `root`.
    ///
    /// Only follows ownership edges, never type references, so it terminates
    /// on recursive types.
    pub fn walk(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Every element of every source file, file by file in pre-order.
    pub fn source_elements(&self) -> Vec<ElementId> {
        self.file_ids()
            .filter(|&f| self.file(f).is_source())
            .flat_map(|f| self.walk(ElementId::File(f)))
            .collect()
    }

    // ============================================================
    // Lookup
    // ============================================================

    pub fn find_file(&self, name: &str) -> Option<FileId> {
        self.files_by_name.get(name).copied()
    }

    /// Imports of a file, resolved by name. Unresolved imports yield `None`.
    pub fn dependencies(&self, file: FileId) -> Vec<(&str, Option<FileId>)> {
        self.file(file)
            .dependency_names
            .iter()
            .map(|name| (name.as_str(), self.find_file(name)))
            .collect()
    }

    /// Find a field of `message` by simple name.
    pub fn lookup_field(&self, message: MessageId, name: &str) -> Option<FieldId> {
        self.message(message)
            .fields
            .iter()
            .copied()
            .find(|&f| self.field(f).header.name == name)
    }

    /// Resolved type of a field, once the Resolver stage has run.
    pub fn field_type(&self, field: FieldId) -> Option<&TypeRef> {
        self.attr::<ResolvedType>(ElementId::Field(field))
    }

    /// Resolved signature of a method, once the Resolver stage has run.
    pub fn method_signature(&self, method: MethodId) -> Option<&MethodSignature> {
        self.attr::<ResolvedSignature>(ElementId::Method(method))
    }

    // ============================================================
    // Locations and Documentation
    // ============================================================

    /// Source location of an element.
    ///
    /// Injected extension fields resolve through the file that declares the
    /// extension.
    pub fn location(&self, id: ElementId) -> Location {
        let file = self.file(self.file_of(id));
        if let ElementId::File(_) = id {
            return Location::file(file.name());
        }
        file.source_location(self.header(id).path())
            .and_then(|loc| Span::from_proto(&loc.span))
            .map(|span| Location::source(file.name(), span))
            .unwrap_or_else(|| Location::file(file.name()))
    }

    /// Documentation comment of an element: leading then trailing comment.
    ///
    /// For files, the comments of the syntax and package statements are
    /// composed in that order, joined by a newline, skipping empty ones.
    pub fn documentation(&self, id: ElementId) -> String {
        let file = self.file(self.file_of(id));
        match id {
            ElementId::File(_) => FILE_DOC_LOCATIONS
                .iter()
                .map(|number| comment_at(file, &number.to_string()))
                .filter(|comment| !comment.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
            _ => comment_at(file, self.header(id).path()),
        }
    }

    // ============================================================
    // Attributes
    // ============================================================

    pub fn attributes(&self, id: ElementId) -> Option<&AttributeBag> {
        self.attributes.get(&id)
    }

    pub fn attr<K: AttributeKey>(&self, id: ElementId) -> Option<&K::Value> {
        self.attributes.get(&id).and_then(|bag| bag.get::<K>())
    }

    pub fn attr_mut<K: AttributeKey>(&mut self, id: ElementId) -> Option<&mut K::Value> {
        self.attributes.get_mut(&id).and_then(|bag| bag.get_mut::<K>())
    }

    pub fn has_attr<K: AttributeKey>(&self, id: ElementId) -> bool {
        self.attributes
            .get(&id)
            .is_some_and(|bag| bag.contains::<K>())
    }

    /// Attach a value, overwriting and returning any previous one.
    pub fn put_attr<K: AttributeKey>(&mut self, id: ElementId, value: K::Value) -> Option<K::Value> {
        tracing::trace!("put {} on {:?}", K::NAME, id);
        self.attributes.entry(id).or_default().put::<K>(value)
    }

    pub fn attr_or_insert_with<K: AttributeKey>(
        &mut self,
        id: ElementId,
        init: impl FnOnce() -> K::Value,
    ) -> &mut K::Value {
        self.attributes
            .entry(id)
            .or_default()
            .get_or_insert_with::<K>(init)
    }

    pub fn remove_attr<K: AttributeKey>(&mut self, id: ElementId) -> Option<K::Value> {
        self.attributes.get_mut(&id).and_then(|bag| bag.remove::<K>())
    }
}

fn comment_at(file: &File, path: &str) -> String {
    let Some(location) = file.source_location(path) else {
        return String::new();
    };
    let mut comment = location.leading_comments.clone().unwrap_or_default();
    if let Some(trailing) = &location.trailing_comments {
        comment.push_str(trailing);
    }
    comment
}

#[cfg(test)]
mod tests;
