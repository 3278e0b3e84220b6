//! Descriptor-set input.
//!
//! Serde mirrors of `google.protobuf.FileDescriptorSet` in its JSON form, the
//! input from which the element graph is built. Only the parts the analysis
//! consumes are modeled; unknown keys are ignored.

mod http;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

pub use http::{CustomHttpPattern, HttpRule};

// ============================================================================
// FILES
// ============================================================================

/// A set of file descriptors, as produced by `protoc --descriptor_set_out`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDescriptorSet {
    pub file: Vec<FileDescriptorProto>,
}

impl FileDescriptorSet {
    pub fn new(file: Vec<FileDescriptorProto>) -> Self {
        Self { file }
    }

    /// Decode a descriptor set from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDescriptorProto {
    pub name: String,
    pub package: String,
    pub dependency: Vec<String>,
    pub message_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
    pub service: Vec<ServiceDescriptorProto>,
    pub extension: Vec<FieldDescriptorProto>,
    pub options: FileOptions,
    pub source_code_info: Option<SourceCodeInfo>,
    pub syntax: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    pub deprecated: bool,
}

impl FileDescriptorProto {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.dependency.push(name.into());
        self
    }

    pub fn with_message(mut self, message: DescriptorProto) -> Self {
        self.message_type.push(message);
        self
    }

    pub fn with_enum(mut self, enum_type: EnumDescriptorProto) -> Self {
        self.enum_type.push(enum_type);
        self
    }

    pub fn with_service(mut self, service: ServiceDescriptorProto) -> Self {
        self.service.push(service);
        self
    }

    pub fn with_extension(mut self, extension: FieldDescriptorProto) -> Self {
        self.extension.push(extension);
        self
    }

    /// Attach a comment to the location at `path`.
    pub fn with_comment(mut self, path: Vec<i32>, leading: impl Into<String>) -> Self {
        self.source_code_info
            .get_or_insert_with(SourceCodeInfo::default)
            .location
            .push(SourceLocation {
                path,
                leading_comments: Some(leading.into()),
                ..Default::default()
            });
        self
    }

    /// Attach a source span to the location at `path`.
    pub fn with_span(mut self, path: Vec<i32>, span: Vec<i32>) -> Self {
        self.source_code_info
            .get_or_insert_with(SourceCodeInfo::default)
            .location
            .push(SourceLocation {
                path,
                span,
                ..Default::default()
            });
        self
    }
}

// ============================================================================
// MESSAGES AND FIELDS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorProto {
    pub name: String,
    pub field: Vec<FieldDescriptorProto>,
    pub nested_type: Vec<DescriptorProto>,
    pub enum_type: Vec<EnumDescriptorProto>,
    pub extension: Vec<FieldDescriptorProto>,
    pub options: MessageOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageOptions {
    pub map_entry: bool,
    pub deprecated: bool,
}

impl DescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: FieldDescriptorProto) -> Self {
        self.field.push(field);
        self
    }

    pub fn with_nested(mut self, message: DescriptorProto) -> Self {
        self.nested_type.push(message);
        self
    }

    pub fn with_enum(mut self, enum_type: EnumDescriptorProto) -> Self {
        self.enum_type.push(enum_type);
        self
    }

    pub fn with_extension(mut self, extension: FieldDescriptorProto) -> Self {
        self.extension.push(extension);
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.options.deprecated = true;
        self
    }

    /// Build the synthetic entry message protoc generates for a map field.
    pub fn map_entry(name: impl Into<String>, key: FieldType, value: FieldDescriptorProto) -> Self {
        let mut entry = Self::new(name)
            .with_field(FieldDescriptorProto::scalar("key", 1, key))
            .with_field(FieldDescriptorProto {
                name: "value".into(),
                number: 2,
                ..value
            });
        entry.options.map_entry = true;
        entry
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[default]
    #[serde(rename = "LABEL_OPTIONAL")]
    Optional,
    #[serde(rename = "LABEL_REQUIRED")]
    Required,
    #[serde(rename = "LABEL_REPEATED")]
    Repeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "TYPE_DOUBLE")]
    Double,
    #[serde(rename = "TYPE_FLOAT")]
    Float,
    #[serde(rename = "TYPE_INT64")]
    Int64,
    #[serde(rename = "TYPE_UINT64")]
    Uint64,
    #[serde(rename = "TYPE_INT32")]
    Int32,
    #[serde(rename = "TYPE_FIXED64")]
    Fixed64,
    #[serde(rename = "TYPE_FIXED32")]
    Fixed32,
    #[serde(rename = "TYPE_BOOL")]
    Bool,
    #[serde(rename = "TYPE_STRING")]
    String,
    #[serde(rename = "TYPE_GROUP")]
    Group,
    #[serde(rename = "TYPE_MESSAGE")]
    Message,
    #[serde(rename = "TYPE_BYTES")]
    Bytes,
    #[serde(rename = "TYPE_UINT32")]
    Uint32,
    #[serde(rename = "TYPE_ENUM")]
    Enum,
    #[serde(rename = "TYPE_SFIXED32")]
    Sfixed32,
    #[serde(rename = "TYPE_SFIXED64")]
    Sfixed64,
    #[serde(rename = "TYPE_SINT32")]
    Sint32,
    #[serde(rename = "TYPE_SINT64")]
    Sint64,
}

impl FieldType {
    /// Whether values of this type reference a named message or enum.
    pub fn is_named(self) -> bool {
        matches!(self, FieldType::Message | FieldType::Group | FieldType::Enum)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDescriptorProto {
    pub name: String,
    pub number: i32,
    pub label: Label,
    #[serde(rename = "type")]
    pub kind: Option<FieldType>,
    pub type_name: Option<String>,
    pub extendee: Option<String>,
    pub json_name: Option<String>,
    pub options: FieldOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub deprecated: bool,
}

impl FieldDescriptorProto {
    /// A field of scalar type.
    pub fn scalar(name: impl Into<String>, number: i32, kind: FieldType) -> Self {
        Self {
            name: name.into(),
            number,
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// A field referencing a message by (relative or `.`-absolute) name.
    pub fn message(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            kind: Some(FieldType::Message),
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    /// A field referencing an enum by (relative or `.`-absolute) name.
    pub fn enumeration(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number,
            kind: Some(FieldType::Enum),
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.label = Label::Required;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.label = Label::Repeated;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.options.deprecated = true;
        self
    }

    /// Turn this field into an extension of `extendee`.
    pub fn extending(mut self, extendee: impl Into<String>) -> Self {
        self.extendee = Some(extendee.into());
        self
    }
}

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumDescriptorProto {
    pub name: String,
    pub value: Vec<EnumValueDescriptorProto>,
    pub options: EnumOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumOptions {
    pub deprecated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumValueDescriptorProto {
    pub name: String,
    pub number: i32,
    pub options: EnumOptions,
}

impl EnumDescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.value.push(EnumValueDescriptorProto {
            name: name.into(),
            number,
            ..Default::default()
        });
        self
    }
}

// ============================================================================
// SERVICES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDescriptorProto {
    pub name: String,
    pub method: Vec<MethodDescriptorProto>,
    pub options: ServiceOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceOptions {
    pub deprecated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodDescriptorProto {
    pub name: String,
    pub input_type: String,
    pub output_type: String,
    pub client_streaming: bool,
    pub server_streaming: bool,
    pub options: MethodOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodOptions {
    pub deprecated: bool,
    /// Inline `google.api.http` annotation.
    pub http: Option<HttpRule>,
}

impl ServiceDescriptorProto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_method(mut self, method: MethodDescriptorProto) -> Self {
        self.method.push(method);
        self
    }
}

impl MethodDescriptorProto {
    pub fn new(
        name: impl Into<String>,
        input_type: impl Into<String>,
        output_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            input_type: input_type.into(),
            output_type: output_type.into(),
            ..Default::default()
        }
    }

    pub fn with_http(mut self, rule: HttpRule) -> Self {
        self.options.http = Some(rule);
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.options.deprecated = true;
        self
    }
}

// ============================================================================
// SOURCE INFO
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceCodeInfo {
    pub location: Vec<SourceLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLocation {
    pub path: Vec<i32>,
    pub span: Vec<i32>,
    pub leading_comments: Option<String>,
    pub trailing_comments: Option<String>,
}

impl SourceLocation {
    /// The dot-joined structural path, the key used to look locations up.
    pub fn path_key(&self) -> String {
        self.path
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }
}
