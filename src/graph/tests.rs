#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::AnalysisOptions;
use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto,
    FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::error::ModelError;

fn library_file() -> FileDescriptorProto {
    FileDescriptorProto::new("library.proto", "example.library")
        .with_message(
            DescriptorProto::new("Shelf")
                .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String))
                .with_field(FieldDescriptorProto::message("books", 2, "Book").repeated())
                .with_nested(
                    DescriptorProto::new("Label")
                        .with_field(FieldDescriptorProto::scalar("text", 1, FieldType::String)),
                )
                .with_enum(EnumDescriptorProto::new("Kind").with_value("KIND_UNSPECIFIED", 0)),
        )
        .with_message(DescriptorProto::new("Book"))
        .with_enum(
            EnumDescriptorProto::new("Genre")
                .with_value("GENRE_UNSPECIFIED", 0)
                .with_value("FICTION", 1),
        )
        .with_service(
            ServiceDescriptorProto::new("Library")
                .with_method(MethodDescriptorProto::new("GetShelf", ".example.library.Shelf", "Shelf")),
        )
}

fn build(files: Vec<FileDescriptorProto>) -> Graph {
    Graph::build(&FileDescriptorSet::new(files), &AnalysisOptions::default()).unwrap()
}

// ============================================================
// Construction
// ============================================================

#[test]
fn test_full_names() {
    let graph = build(vec![library_file()]);
    let names: Vec<_> = graph
        .walk(ElementId::File(FileId::new(0)))
        .into_iter()
        .map(|id| graph.full_name(id).to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "example.library",
            "example.library.Shelf",
            "example.library.Shelf.name",
            "example.library.Shelf.books",
            "example.library.Shelf.Label",
            "example.library.Shelf.Label.text",
            "example.library.Shelf.Kind",
            "example.library.Shelf.Kind.KIND_UNSPECIFIED",
            "example.library.Book",
            "example.library.Genre",
            "example.library.Genre.GENRE_UNSPECIFIED",
            "example.library.Genre.FICTION",
            "example.library.Library",
            "example.library.Library.GetShelf",
        ]
    );
}

#[test]
fn test_empty_package_uses_bare_names() {
    let graph = build(vec![
        FileDescriptorProto::new("bare.proto", "").with_message(DescriptorProto::new("Thing")),
    ]);
    assert_eq!(graph.message(MessageId::new(0)).header().full_name(), "Thing");
}

#[test]
fn test_structural_paths() {
    let graph = build(vec![library_file()]);
    let shelf = graph.message(MessageId::new(0));
    assert_eq!(shelf.header().path(), "4.0");
    let books = graph.field(shelf.fields()[1]);
    assert_eq!(books.header().path(), "4.0.2.1");
    let label = graph.message(shelf.messages()[0]);
    assert_eq!(label.header().path(), "4.0.3.0");
    let kind = graph.enum_type(shelf.enums()[0]);
    assert_eq!(kind.header().path(), "4.0.4.0");
    let genre = graph.enum_type(graph.file(FileId::new(0)).enums()[0]);
    assert_eq!(genre.header().path(), "5.0");
    assert_eq!(graph.enum_value(genre.values()[1]).header().path(), "5.0.2.1");
    let library = graph.interface(InterfaceId::new(0));
    assert_eq!(library.header().path(), "6.0");
    assert_eq!(graph.method(library.methods()[0]).header().path(), "6.0.2.0");
}

#[test]
fn test_enum_value_index() {
    let graph = build(vec![library_file()]);
    let genre = graph.enum_type(graph.file(FileId::new(0)).enums()[0]);
    let fiction = graph.enum_value(genre.values()[1]);
    assert_eq!(fiction.index(), 1);
    assert_eq!(fiction.number(), 1);
}

#[test]
fn test_parents() {
    let graph = build(vec![library_file()]);
    let text = graph
        .field_ids()
        .find(|&f| graph.field(f).header().name() == "text")
        .unwrap();
    let chain: Vec<_> = graph
        .ancestry(ElementId::Field(text))
        .into_iter()
        .map(|id| graph.name(id).to_string())
        .collect();
    assert_eq!(chain, vec!["text", "Label", "Shelf", "library.proto"]);
}

#[test]
fn test_syntax_detection() {
    let graph = build(vec![
        FileDescriptorProto::new("a.proto", "a"),
        FileDescriptorProto::new("b.proto", "b").with_syntax("proto3"),
        FileDescriptorProto::new("c.proto", "c").with_syntax("proto2"),
    ]);
    assert_eq!(graph.file(FileId::new(0)).syntax(), Syntax::Proto2);
    assert_eq!(graph.file(FileId::new(1)).syntax(), Syntax::Proto3);
    assert_eq!(graph.file(FileId::new(2)).syntax(), Syntax::Proto2);
}

#[test]
fn test_unsupported_syntax_is_fatal() {
    let set = FileDescriptorSet::new(vec![
        FileDescriptorProto::new("a.proto", "a").with_syntax("editions"),
    ]);
    let err = Graph::build(&set, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, ModelError::UnsupportedSyntax { .. }));
}

#[test]
fn test_duplicate_file_is_fatal() {
    let set = FileDescriptorSet::new(vec![
        FileDescriptorProto::new("a.proto", "a"),
        FileDescriptorProto::new("a.proto", "b"),
    ]);
    let err = Graph::build(&set, &AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateFile(name) if name == "a.proto"));
}

#[test]
fn test_source_files_from_options() {
    let set = FileDescriptorSet::new(vec![
        FileDescriptorProto::new("api.proto", "api"),
        FileDescriptorProto::new("dep.proto", "dep"),
    ]);
    let options = AnalysisOptions::default().with_sources(["api.proto"]);
    let graph = Graph::build(&set, &options).unwrap();
    assert!(graph.file(FileId::new(0)).is_source());
    assert!(!graph.file(FileId::new(1)).is_source());
    assert_eq!(graph.source_elements(), vec![ElementId::File(FileId::new(0))]);
}

#[test]
fn test_dependencies_by_name() {
    let graph = build(vec![
        FileDescriptorProto::new("dep.proto", "dep"),
        FileDescriptorProto::new("api.proto", "api")
            .with_dependency("dep.proto")
            .with_dependency("missing.proto"),
    ]);
    let deps = graph.dependencies(FileId::new(1));
    assert_eq!(
        deps,
        vec![("dep.proto", Some(FileId::new(0))), ("missing.proto", None)]
    );
}

// ============================================================
// Extensions
// ============================================================

#[test]
fn test_extension_injected_after_declared_fields() {
    let graph = build(vec![
        FileDescriptorProto::new("base.proto", "base").with_message(
            DescriptorProto::new("Options")
                .with_field(FieldDescriptorProto::scalar("id", 1, FieldType::Int32)),
        ),
        FileDescriptorProto::new("ext.proto", "ext")
            .with_extension(
                FieldDescriptorProto::scalar("tag", 100, FieldType::String)
                    .extending(".base.Options"),
            )
            .with_span(vec![7, 0], vec![3, 2, 30]),
    ]);
    let options = graph.message(MessageId::new(0));
    assert_eq!(options.fields().len(), 2);
    let tag = graph.field(options.fields()[1]);
    assert!(tag.is_extension());
    assert_eq!(tag.header().full_name(), "base.Options.tag");
    assert_eq!(tag.header().parent(), Some(ElementId::Message(MessageId::new(0))));

    let ext_file = graph.file(FileId::new(1));
    assert_eq!(ext_file.extensions().len(), 1);
    assert_eq!(ext_file.extensions()[0].extendee, "base.Options");
    assert_eq!(ext_file.extensions()[0].path, "7.0");

    let location = graph.location(ElementId::Field(options.fields()[1]));
    assert_eq!(location.file_name(), Some("ext.proto"));
    assert_eq!(location.span().unwrap().start.line, 3);
}

#[test]
fn test_nested_extension_path() {
    let graph = build(vec![
        FileDescriptorProto::new("a.proto", "a")
            .with_message(DescriptorProto::new("Target"))
            .with_message(
                DescriptorProto::new("Holder").with_extension(
                    FieldDescriptorProto::scalar("extra", 5, FieldType::Bool).extending("a.Target"),
                ),
            ),
    ]);
    let file = graph.file(FileId::new(0));
    assert_eq!(file.extensions()[0].path, "4.1.6.0");
}

#[test]
fn test_extension_of_unknown_message_is_ignored() {
    let graph = build(vec![
        FileDescriptorProto::new("a.proto", "a").with_extension(
            FieldDescriptorProto::scalar("x", 1, FieldType::Bool).extending(".nowhere.Msg"),
        ),
    ]);
    assert_eq!(graph.field_ids().count(), 0);
}

// ============================================================
// Locations and Documentation
// ============================================================

#[test]
fn test_location_falls_back_to_file() {
    let graph = build(vec![library_file()]);
    assert_eq!(
        graph.location(ElementId::Message(MessageId::new(1))),
        Location::file("library.proto")
    );
}

#[test]
fn test_location_from_span() {
    let graph = build(vec![library_file().with_span(vec![4, 1], vec![10, 0, 12, 1])]);
    let location = graph.location(ElementId::Message(MessageId::new(1)));
    assert_eq!(location.to_string(), "library.proto:11:1");
}

#[test]
fn test_file_documentation_order() {
    let graph = build(vec![
        library_file()
            .with_comment(vec![2], "Package comment.")
            .with_comment(vec![12], "Syntax comment."),
    ]);
    assert_eq!(
        graph.documentation(ElementId::File(FileId::new(0))),
        "Syntax comment.\nPackage comment."
    );
}

#[test]
fn test_file_documentation_skips_empty() {
    let graph = build(vec![library_file().with_comment(vec![2], "Only package.")]);
    assert_eq!(
        graph.documentation(ElementId::File(FileId::new(0))),
        "Only package."
    );
}

#[test]
fn test_element_documentation_leading_then_trailing() {
    let mut file = library_file().with_comment(vec![4, 1], "A book.");
    if let Some(info) = file.source_code_info.as_mut() {
        info.location[0].trailing_comments = Some(" Trailing.".to_string());
    }
    let graph = build(vec![file]);
    assert_eq!(
        graph.documentation(ElementId::Message(MessageId::new(1))),
        "A book. Trailing."
    );
}

// ============================================================
// Traversal and Attributes
// ============================================================

#[test]
fn test_walk_terminates_on_recursive_types() {
    let graph = build(vec![
        FileDescriptorProto::new("rec.proto", "rec").with_message(
            DescriptorProto::new("Node")
                .with_field(FieldDescriptorProto::message("next", 1, "Node"))
                .with_field(FieldDescriptorProto::message("children", 2, ".rec.Node").repeated()),
        ),
    ]);
    assert_eq!(graph.walk(ElementId::File(FileId::new(0))).len(), 4);
    assert_eq!(graph.element_count(), 4);
}

#[test]
fn test_attribute_overwrite() {
    struct Note;
    impl AttributeKey for Note {
        type Value = &'static str;
        const NAME: &'static str = "test.note";
    }

    let mut graph = build(vec![library_file()]);
    let shelf = ElementId::Message(MessageId::new(0));
    assert!(!graph.has_attr::<Note>(shelf));
    assert_eq!(graph.put_attr::<Note>(shelf, "first"), None);
    assert_eq!(graph.put_attr::<Note>(shelf, "second"), Some("first"));
    assert_eq!(graph.attr::<Note>(shelf), Some(&"second"));
    assert_eq!(graph.remove_attr::<Note>(shelf), Some("second"));
    assert!(graph.attr::<Note>(shelf).is_none());
}

#[test]
fn test_lookup_field() {
    let graph = build(vec![library_file()]);
    let shelf = MessageId::new(0);
    let books = graph.lookup_field(shelf, "books").unwrap();
    assert_eq!(graph.field(books).number(), 2);
    assert!(graph.lookup_field(shelf, "missing").is_none());
}
