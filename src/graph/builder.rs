//! Graph construction from a descriptor set.
//!
//! Construction runs bottom to top in one go: for each file, messages (with
//! their fields, nested messages and enums, depth-first) and enums are built
//! before services. Extensions are pooled up front by extendee so they can be
//! injected into the extended message while it is built, whichever file
//! declares them.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::constants::{
    ENUM_VALUE, FILE_ENUM_TYPE, FILE_EXTENSION, FILE_MESSAGE_TYPE, FILE_SERVICE, MESSAGE_ENUM_TYPE,
    MESSAGE_EXTENSION, MESSAGE_FIELD, MESSAGE_NESTED_TYPE, SERVICE_METHOD,
};
use crate::base::{
    ElementId, EnumId, EnumValueId, FieldId, FileId, InterfaceId, MessageId, MethodId, child_path,
};
use crate::config::AnalysisOptions;
use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::error::ModelError;

use super::{
    ElementHeader, EnumType, EnumValue, ExtensionEntry, Field, File, Graph, Interface, Message,
    Method, Syntax,
};

/// An extension waiting to be injected into its extendee.
struct PendingExtension<'a> {
    proto: &'a FieldDescriptorProto,
    file: FileId,
    path: String,
}

impl Graph {
    /// Build the graph for a descriptor set.
    ///
    /// Fails on input that prevents any analysis: duplicate file names and
    /// unknown syntax declarations.
    pub fn build(set: &FileDescriptorSet, options: &AnalysisOptions) -> Result<Graph, ModelError> {
        let mut builder = GraphBuilder::default();
        for (index, proto) in set.file.iter().enumerate() {
            builder.pool_extensions(proto, FileId::new(index));
        }
        for proto in &set.file {
            builder.build_file(proto, options)?;
        }
        Ok(builder.finish())
    }
}

#[derive(Default)]
struct GraphBuilder<'a> {
    graph: Graph,
    extension_pool: FxHashMap<String, Vec<PendingExtension<'a>>>,
    extensions_by_file: FxHashMap<FileId, Vec<ExtensionEntry>>,
}

impl<'a> GraphBuilder<'a> {
    // ============================================================
    // Extension Pool
    // ============================================================

    fn pool_extensions(&mut self, proto: &'a FileDescriptorProto, file: FileId) {
        for (i, ext) in proto.extension.iter().enumerate() {
            self.pool_extension(ext, file, child_path("", FILE_EXTENSION, i));
        }
        for (i, message) in proto.message_type.iter().enumerate() {
            self.pool_message_extensions(message, file, child_path("", FILE_MESSAGE_TYPE, i));
        }
    }

    fn pool_message_extensions(&mut self, message: &'a DescriptorProto, file: FileId, path: String) {
        for (i, ext) in message.extension.iter().enumerate() {
            self.pool_extension(ext, file, child_path(&path, MESSAGE_EXTENSION, i));
        }
        for (i, nested) in message.nested_type.iter().enumerate() {
            self.pool_message_extensions(nested, file, child_path(&path, MESSAGE_NESTED_TYPE, i));
        }
    }

    fn pool_extension(&mut self, proto: &'a FieldDescriptorProto, file: FileId, path: String) {
        let Some(extendee) = proto.extendee.as_deref() else {
            tracing::debug!("extension '{}' has no extendee, ignored", proto.name);
            return;
        };
        let extendee = extendee.trim_start_matches('.').to_string();
        self.extension_pool
            .entry(extendee)
            .or_default()
            .push(PendingExtension { proto, file, path });
    }

    // ============================================================
    // Files
    // ============================================================

    fn build_file(
        &mut self,
        proto: &'a FileDescriptorProto,
        options: &AnalysisOptions,
    ) -> Result<(), ModelError> {
        let id = FileId::new(self.graph.files.len());
        let name = SmolStr::new(&proto.name);
        if self.graph.files_by_name.contains_key(&name) {
            return Err(ModelError::DuplicateFile(proto.name.clone()));
        }
        let syntax = match proto.syntax.as_deref() {
            None | Some("") | Some("proto2") => Syntax::Proto2,
            Some("proto3") => Syntax::Proto3,
            Some(other) => {
                return Err(ModelError::UnsupportedSyntax {
                    file: proto.name.clone(),
                    syntax: other.to_string(),
                });
            }
        };
        let is_source = options
            .sources
            .as_ref()
            .is_none_or(|sources| sources.iter().any(|s| s == &proto.name));

        let mut locations: FxHashMap<String, Vec<_>> = FxHashMap::default();
        if let Some(info) = &proto.source_code_info {
            for location in &info.location {
                locations
                    .entry(location.path_key())
                    .or_default()
                    .push(location.clone());
            }
        }

        self.graph.files_by_name.insert(name.clone(), id);
        self.graph.files.push(File {
            header: ElementHeader {
                name,
                full_name: proto.package.clone(),
                parent: None,
                file: id,
                path: String::new(),
                deprecated: proto.options.deprecated,
            },
            syntax,
            is_source,
            dependency_names: proto.dependency.clone(),
            messages: Vec::new(),
            enums: Vec::new(),
            interfaces: Vec::new(),
            extensions: Vec::new(),
            locations,
        });

        let parent = ElementId::File(id);
        let messages = proto
            .message_type
            .iter()
            .enumerate()
            .map(|(i, m)| self.build_message(m, parent, id, child_path("", FILE_MESSAGE_TYPE, i)))
            .collect();
        let enums = proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| self.build_enum(e, parent, id, child_path("", FILE_ENUM_TYPE, i)))
            .collect();
        let interfaces = proto
            .service
            .iter()
            .enumerate()
            .map(|(i, s)| self.build_interface(s, id, child_path("", FILE_SERVICE, i)))
            .collect();

        let file = &mut self.graph.files[id.index()];
        file.messages = messages;
        file.enums = enums;
        file.interfaces = interfaces;
        Ok(())
    }

    fn finish(mut self) -> Graph {
        for (file, entries) in self.extensions_by_file {
            self.graph.files[file.index()].extensions = entries;
        }
        for (extendee, pending) in &self.extension_pool {
            tracing::debug!(
                "{} extension(s) of unknown message '{}' ignored",
                pending.len(),
                extendee
            );
        }
        self.graph
    }

    // ============================================================
    // Messages and Fields
    // ============================================================

    fn build_message(
        &mut self,
        proto: &'a DescriptorProto,
        parent: ElementId,
        file: FileId,
        path: String,
    ) -> MessageId {
        let id = MessageId::new(self.graph.messages.len());
        let full_name = qualify(self.graph.header(parent).full_name(), &proto.name);
        self.graph.messages.push(Message {
            header: ElementHeader {
                name: SmolStr::new(&proto.name),
                full_name: full_name.clone(),
                parent: Some(parent),
                file,
                path: path.clone(),
                deprecated: proto.options.deprecated,
            },
            fields: Vec::new(),
            messages: Vec::new(),
            enums: Vec::new(),
            map_entry: proto.options.map_entry,
        });

        let mut fields: Vec<FieldId> = proto
            .field
            .iter()
            .enumerate()
            .map(|(i, f)| {
                self.build_field(f, id, &full_name, file, child_path(&path, MESSAGE_FIELD, i), false)
            })
            .collect();

        if let Some(pending) = self.extension_pool.remove(&full_name) {
            for ext in pending {
                let field = self.build_field(ext.proto, id, &full_name, ext.file, ext.path.clone(), true);
                self.extensions_by_file
                    .entry(ext.file)
                    .or_default()
                    .push(ExtensionEntry {
                        extendee: full_name.clone(),
                        field,
                        path: ext.path,
                    });
                fields.push(field);
            }
        }

        let me = ElementId::Message(id);
        let messages = proto
            .nested_type
            .iter()
            .enumerate()
            .map(|(i, m)| self.build_message(m, me, file, child_path(&path, MESSAGE_NESTED_TYPE, i)))
            .collect();
        let enums = proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| self.build_enum(e, me, file, child_path(&path, MESSAGE_ENUM_TYPE, i)))
            .collect();

        let message = &mut self.graph.messages[id.index()];
        message.fields = fields;
        message.messages = messages;
        message.enums = enums;
        id
    }

    fn build_field(
        &mut self,
        proto: &FieldDescriptorProto,
        parent: MessageId,
        parent_full_name: &str,
        file: FileId,
        path: String,
        extension: bool,
    ) -> FieldId {
        let id = FieldId::new(self.graph.fields.len());
        self.graph.fields.push(Field {
            header: ElementHeader {
                name: SmolStr::new(&proto.name),
                full_name: qualify(parent_full_name, &proto.name),
                parent: Some(ElementId::Message(parent)),
                file,
                path,
                deprecated: proto.options.deprecated,
            },
            number: proto.number,
            label: proto.label,
            kind: proto.kind,
            type_name: proto.type_name.clone(),
            json_name: proto.json_name.clone(),
            extension,
        });
        id
    }

    // ============================================================
    // Enums
    // ============================================================

    fn build_enum(
        &mut self,
        proto: &EnumDescriptorProto,
        parent: ElementId,
        file: FileId,
        path: String,
    ) -> EnumId {
        let id = EnumId::new(self.graph.enums.len());
        let full_name = qualify(self.graph.header(parent).full_name(), &proto.name);
        let values = proto
            .value
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let value_id = EnumValueId::new(self.graph.enum_values.len());
                self.graph.enum_values.push(EnumValue {
                    header: ElementHeader {
                        name: SmolStr::new(&value.name),
                        full_name: qualify(&full_name, &value.name),
                        parent: Some(ElementId::Enum(id)),
                        file,
                        path: child_path(&path, ENUM_VALUE, index),
                        deprecated: value.options.deprecated,
                    },
                    number: value.number,
                    index,
                });
                value_id
            })
            .collect();
        self.graph.enums.push(EnumType {
            header: ElementHeader {
                name: SmolStr::new(&proto.name),
                full_name,
                parent: Some(parent),
                file,
                path,
                deprecated: proto.options.deprecated,
            },
            values,
        });
        id
    }

    // ============================================================
    // Services
    // ============================================================

    fn build_interface(
        &mut self,
        proto: &ServiceDescriptorProto,
        file: FileId,
        path: String,
    ) -> InterfaceId {
        let id = InterfaceId::new(self.graph.interfaces.len());
        let full_name = qualify(self.graph.file(file).package(), &proto.name);
        let methods = proto
            .method
            .iter()
            .enumerate()
            .map(|(i, m)| self.build_method(m, id, &full_name, file, child_path(&path, SERVICE_METHOD, i)))
            .collect();
        self.graph.interfaces.push(Interface {
            header: ElementHeader {
                name: SmolStr::new(&proto.name),
                full_name,
                parent: Some(ElementId::File(file)),
                file,
                path,
                deprecated: proto.options.deprecated,
            },
            methods,
        });
        id
    }

    fn build_method(
        &mut self,
        proto: &MethodDescriptorProto,
        parent: InterfaceId,
        parent_full_name: &str,
        file: FileId,
        path: String,
    ) -> MethodId {
        let id = MethodId::new(self.graph.methods.len());
        self.graph.methods.push(Method {
            header: ElementHeader {
                name: SmolStr::new(&proto.name),
                full_name: qualify(parent_full_name, &proto.name),
                parent: Some(ElementId::Interface(parent)),
                file,
                path,
                deprecated: proto.options.deprecated,
            },
            input_type_name: proto.input_type.clone(),
            output_type_name: proto.output_type.clone(),
            client_streaming: proto.client_streaming,
            server_streaming: proto.server_streaming,
            http: proto.options.http.clone(),
        });
        id
    }
}

/// Join a scope and a simple name. The empty package is the root scope.
fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}.{name}")
    }
}
