//! Element variants of the graph.
//!
//! Elements are plain data stored in per-kind arenas. Parent and cross
//! references are ids into those arenas, so recursive message definitions
//! never form ownership cycles.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{
    ElementId, EnumId, EnumValueId, FieldId, FileId, InterfaceId, MessageId, MethodId,
};
use crate::descriptor::{FieldType, HttpRule, Label, SourceLocation};

/// Data every element carries.
#[derive(Debug, Clone)]
pub struct ElementHeader {
    pub(crate) name: SmolStr,
    pub(crate) full_name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) file: FileId,
    pub(crate) path: String,
    pub(crate) deprecated: bool,
}

impl ElementHeader {
    /// Simple name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dot-joined qualified name.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// The file whose descriptor declares this element.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Structural path inside the declaring file's descriptor.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }
}

/// Proto syntax of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    Proto2,
    Proto3,
}

/// A field injected into a message by an extension declared in this file.
#[derive(Debug, Clone)]
pub struct ExtensionEntry {
    /// Full name of the extended message.
    pub extendee: String,
    pub field: FieldId,
    /// Path of the extension declaration in this file.
    pub path: String,
}

// ============================================================================
// CONTAINERS
// ============================================================================

#[derive(Debug)]
pub struct File {
    pub(crate) header: ElementHeader,
    pub(crate) syntax: Syntax,
    pub(crate) is_source: bool,
    pub(crate) dependency_names: Vec<String>,
    pub(crate) messages: Vec<MessageId>,
    pub(crate) enums: Vec<EnumId>,
    pub(crate) interfaces: Vec<InterfaceId>,
    pub(crate) extensions: Vec<ExtensionEntry>,
    pub(crate) locations: FxHashMap<String, Vec<SourceLocation>>,
}

impl File {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    /// The file name, e.g. `library/v1/library.proto`.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// The package, which is the file's full name.
    pub fn package(&self) -> &str {
        &self.header.full_name
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Whether this file is a proper source, in contrast to a dependency.
    pub fn is_source(&self) -> bool {
        self.is_source
    }

    /// Imported file names, as declared.
    pub fn dependency_names(&self) -> &[String] {
        &self.dependency_names
    }

    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }

    pub fn enums(&self) -> &[EnumId] {
        &self.enums
    }

    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.interfaces
    }

    /// Extensions this file declares.
    pub fn extensions(&self) -> &[ExtensionEntry] {
        &self.extensions
    }

    /// First source location recorded for `path`.
    pub fn source_location(&self, path: &str) -> Option<&SourceLocation> {
        self.locations.get(path).and_then(|l| l.first())
    }
}

#[derive(Debug)]
pub struct Message {
    pub(crate) header: ElementHeader,
    pub(crate) fields: Vec<FieldId>,
    pub(crate) messages: Vec<MessageId>,
    pub(crate) enums: Vec<EnumId>,
    pub(crate) map_entry: bool,
}

impl Message {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    /// Declared fields followed by extension fields.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn messages(&self) -> &[MessageId] {
        &self.messages
    }

    pub fn enums(&self) -> &[EnumId] {
        &self.enums
    }

    /// Whether this is the synthetic key/value message of a map field.
    pub fn is_map_entry(&self) -> bool {
        self.map_entry
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

#[derive(Debug)]
pub struct Field {
    pub(crate) header: ElementHeader,
    pub(crate) number: i32,
    pub(crate) label: Label,
    pub(crate) kind: Option<FieldType>,
    pub(crate) type_name: Option<String>,
    pub(crate) json_name: Option<String>,
    pub(crate) extension: bool,
}

impl Field {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn kind(&self) -> Option<FieldType> {
        self.kind
    }

    /// Type name as written in the descriptor, for message and enum fields.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn json_name(&self) -> Option<&str> {
        self.json_name.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.label == Label::Required
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Whether the field was injected by an extension.
    pub fn is_extension(&self) -> bool {
        self.extension
    }
}

#[derive(Debug)]
pub struct EnumType {
    pub(crate) header: ElementHeader,
    pub(crate) values: Vec<EnumValueId>,
}

impl EnumType {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn values(&self) -> &[EnumValueId] {
        &self.values
    }
}

#[derive(Debug)]
pub struct EnumValue {
    pub(crate) header: ElementHeader,
    pub(crate) number: i32,
    pub(crate) index: usize,
}

impl EnumValue {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    /// Declaration position inside the enum. Index 0 is the default value.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct Interface {
    pub(crate) header: ElementHeader,
    pub(crate) methods: Vec<MethodId>,
}

impl Interface {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }
}

#[derive(Debug)]
pub struct Method {
    pub(crate) header: ElementHeader,
    pub(crate) input_type_name: String,
    pub(crate) output_type_name: String,
    pub(crate) client_streaming: bool,
    pub(crate) server_streaming: bool,
    pub(crate) http: Option<HttpRule>,
}

impl Method {
    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn input_type_name(&self) -> &str {
        &self.input_type_name
    }

    pub fn output_type_name(&self) -> &str {
        &self.output_type_name
    }

    pub fn is_client_streaming(&self) -> bool {
        self.client_streaming
    }

    pub fn is_server_streaming(&self) -> bool {
        self.server_streaming
    }

    /// Inline HTTP annotation from the method options.
    pub fn http_option(&self) -> Option<&HttpRule> {
        self.http.as_ref()
    }
}

// ============================================================================
// ELEMENT REFERENCE
// ============================================================================

/// A borrowed view of any element.
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    File(&'a File),
    Message(&'a Message),
    Field(&'a Field),
    Enum(&'a EnumType),
    EnumValue(&'a EnumValue),
    Interface(&'a Interface),
    Method(&'a Method),
}

impl<'a> ElementRef<'a> {
    pub fn header(self) -> &'a ElementHeader {
        match self {
            ElementRef::File(e) => &e.header,
            ElementRef::Message(e) => &e.header,
            ElementRef::Field(e) => &e.header,
            ElementRef::Enum(e) => &e.header,
            ElementRef::EnumValue(e) => &e.header,
            ElementRef::Interface(e) => &e.header,
            ElementRef::Method(e) => &e.header,
        }
    }
}
