//! A small library API used across the integration tests.

use protoscope::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto,
    FileDescriptorSet, HttpRule, MethodDescriptorProto, ServiceDescriptorProto,
};

pub const PACKAGE: &str = "library.v1";

/// Service config matching [`library_descriptors`].
pub const LIBRARY_CONFIG: &str = r#"
name: library.example.com
title: Library
config_version: 3
apis:
  - name: library.v1.LibraryService
http:
  rules:
    - selector: library.v1.LibraryService.ListShelves
      get: /v1/shelves
visibility:
  rules:
    - selector: library.v1.LibraryService.PreviewShelf
      restriction: PREVIEW
    - selector: library.v1.Shelf.internal_notes
      restriction: INTERNAL
documentation:
  summary: Manages shelves and books.
  rules:
    - selector: library.v1.Book
      description: A book on a shelf.
"#;

/// Full name of an element in the library package.
pub fn qualified(name: &str) -> String {
    format!("{PACKAGE}.{name}")
}

pub fn library_descriptors() -> FileDescriptorSet {
    FileDescriptorSet::new(vec![library_file()])
}

pub fn library_file() -> FileDescriptorProto {
    FileDescriptorProto::new("library/v1/library.proto", PACKAGE)
        .with_syntax("proto3")
        .with_message(
            DescriptorProto::new("Shelf")
                .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String))
                .with_field(FieldDescriptorProto::scalar("theme", 2, FieldType::String))
                .with_field(FieldDescriptorProto::scalar(
                    "internal_notes",
                    3,
                    FieldType::String,
                )),
        )
        .with_message(
            DescriptorProto::new("Book")
                .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String))
                .with_field(FieldDescriptorProto::scalar("author", 2, FieldType::String))
                .with_field(FieldDescriptorProto::enumeration("state", 3, "State"))
                .with_field(FieldDescriptorProto::scalar("read", 4, FieldType::Bool).deprecated())
                .with_enum(
                    EnumDescriptorProto::new("State")
                        .with_value("STATE_UNSPECIFIED", 0)
                        .with_value("AVAILABLE", 1)
                        .with_value("CHECKED_OUT", 2),
                ),
        )
        .with_message(
            DescriptorProto::new("GetShelfRequest")
                .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String)),
        )
        .with_message(
            DescriptorProto::new("ListShelvesRequest")
                .with_field(FieldDescriptorProto::scalar("page_size", 1, FieldType::Int32))
                .with_field(FieldDescriptorProto::message("filter", 2, "FilterEntry").repeated())
                .with_nested(DescriptorProto::map_entry(
                    "FilterEntry",
                    FieldType::String,
                    FieldDescriptorProto::scalar("value", 2, FieldType::String),
                )),
        )
        .with_message(
            DescriptorProto::new("ListShelvesResponse")
                .with_field(FieldDescriptorProto::message("shelves", 1, "Shelf").repeated())
                .with_field(FieldDescriptorProto::scalar(
                    "next_page_token",
                    2,
                    FieldType::String,
                )),
        )
        .with_message(
            DescriptorProto::new("CreateBookRequest")
                .with_field(FieldDescriptorProto::scalar("parent", 1, FieldType::String))
                .with_field(FieldDescriptorProto::message("book", 2, "Book")),
        )
        .with_service(
            ServiceDescriptorProto::new("LibraryService")
                .with_method(
                    MethodDescriptorProto::new("GetShelf", "GetShelfRequest", "Shelf")
                        .with_http(HttpRule::get("/v1/{name=shelves/*}")),
                )
                .with_method(MethodDescriptorProto::new(
                    "ListShelves",
                    "ListShelvesRequest",
                    "ListShelvesResponse",
                ))
                .with_method(
                    MethodDescriptorProto::new("CreateBook", "CreateBookRequest", "Book")
                        .with_http(HttpRule::post("/v1/{parent=shelves/*}/books", "book")),
                )
                .with_method(
                    MethodDescriptorProto::new("PreviewShelf", "GetShelfRequest", "Shelf")
                        .with_http(HttpRule::get("/v1/{name=shelves/*}:preview")),
                ),
        )
        // Book.read
        .with_comment(
            vec![4, 1, 2, 3],
            "Whether the book was read. (== deprecation_description Use reading lists. ==)",
        )
}
