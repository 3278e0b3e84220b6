use super::*;
use crate::config::{AnalysisOptions, ServiceConfig};
use crate::descriptor::{
    DescriptorProto, FieldDescriptorProto, FieldType, FileDescriptorProto, FileDescriptorSet,
    MethodDescriptorProto, ServiceDescriptorProto,
};
use crate::graph::PathSegment;
use crate::processors::Merged;
use crate::setup::register_standard_processors;

fn library(methods: Vec<MethodDescriptorProto>) -> FileDescriptorSet {
    let mut service = ServiceDescriptorProto::new("Library");
    for method in methods {
        service = service.with_method(method);
    }
    FileDescriptorSet::new(vec![
        FileDescriptorProto::new("library.proto", "lib")
            .with_message(
                DescriptorProto::new("Shelf")
                    .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String))
                    .with_field(FieldDescriptorProto::scalar("class", 2, FieldType::String)),
            )
            .with_message(
                DescriptorProto::new("ShelfRequest")
                    .with_field(FieldDescriptorProto::scalar("name", 1, FieldType::String))
                    .with_field(FieldDescriptorProto::message("shelf", 2, "Shelf")),
            )
            .with_service(service),
    ])
}

fn method(name: &str) -> MethodDescriptorProto {
    MethodDescriptorProto::new(name, ".lib.ShelfRequest", ".lib.Shelf")
}

fn merged(set: FileDescriptorSet, config: ServiceConfig) -> Model {
    let mut model = Model::from_descriptor_set(&set, AnalysisOptions::default()).unwrap();
    model.set_service_config(config);
    register_standard_processors(&mut model);
    model.register_config_aspect(Box::new(HttpConfigAspect::new()));
    model.establish::<Merged>().unwrap();
    model
}

fn method_id(model: &Model, name: &str) -> ElementId {
    let graph = model.graph();
    graph
        .method_ids()
        .map(ElementId::Method)
        .find(|&m| graph.full_name(m) == name)
        .unwrap()
}

fn bindings<'m>(model: &'m Model, name: &str) -> &'m [HttpBinding] {
    model
        .graph()
        .attr::<HttpAttribute>(method_id(model, name))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[test]
fn test_inline_binding() {
    let set = library(vec![
        method("GetShelf").with_http(HttpRule::get("/v1/{name=shelves/*}")),
    ]);
    let model = merged(set, ServiceConfig::new("library.example.com"));
    assert_eq!(model.error_count(), 0);

    let found = bindings(&model, "lib.Library.GetShelf");
    assert_eq!(found.len(), 1);
    let binding = &found[0];
    assert!(binding.primary);
    assert_eq!(binding.method, HttpMethod::Get);
    assert_eq!(binding.path_selectors.len(), 1);
    assert_eq!(binding.path_selectors[0].display(model.graph()), "name");
    assert_eq!(binding.body, None);
    assert!(matches!(&binding.segments[1], PathSegment::Variable { field_path, .. } if field_path == "name"));
}

#[test]
fn test_config_rule_overrides_inline() {
    let set = library(vec![
        method("GetShelf").with_http(HttpRule::get("/v1/inline")),
    ]);
    let config = ServiceConfig::new("library.example.com").with_http_rule(
        HttpRule::get("/v1/configured/{name}").with_selector("lib.Library.GetShelf"),
    );
    let model = merged(set, config);
    let found = bindings(&model, "lib.Library.GetShelf");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, "/v1/configured/{name}");
}

#[test]
fn test_additional_bindings_and_body() {
    let mut rule = HttpRule::post("/v1/shelves", "shelf");
    rule.additional_bindings
        .push(HttpRule::post("/v1/shelves:create", "*"));
    let set = library(vec![method("CreateShelf").with_http(rule)]);
    let model = merged(set, ServiceConfig::new("library.example.com"));
    assert_eq!(model.error_count(), 0);

    let found = bindings(&model, "lib.Library.CreateShelf");
    assert_eq!(found.len(), 2);
    assert!(found[0].primary);
    assert_eq!(found[0].body_selectors[0].display(model.graph()), "shelf");
    assert!(!found[0].body_captures_unbound_fields());
    assert!(!found[1].primary);
    assert!(found[1].body_captures_unbound_fields());
    assert_eq!(found[1].custom_verb.as_deref(), Some("create"));
}

#[test]
fn test_unresolved_field_path() {
    let set = library(vec![
        method("GetShelf").with_http(HttpRule::get("/v1/{shelf.missing}")),
    ]);
    let model = merged(set, ServiceConfig::new("library.example.com"));
    let errors: Vec<_> = model.diags().errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Some(codes::UNRESOLVED_FIELD_PATH));
    assert!(errors[0].message.contains("'shelf.missing'"));
    assert!(bindings(&model, "lib.Library.GetShelf")[0].path_selectors.is_empty());
}

#[test]
fn test_invalid_template_drops_binding() {
    let set = library(vec![method("GetShelf").with_http(HttpRule::get("v1/shelves"))]);
    let model = merged(set, ServiceConfig::new("library.example.com"));
    assert!(model.error_count() > 0);
    assert!(
        model
            .diags()
            .errors()
            .all(|d| d.code == Some(codes::INVALID_HTTP_TEMPLATE))
    );
    assert!(bindings(&model, "lib.Library.GetShelf").is_empty());
}

#[test]
fn test_unmatched_selector() {
    let set = library(vec![method("GetShelf")]);
    let config = ServiceConfig::new("library.example.com")
        .with_http_rule(HttpRule::get("/v1/x").with_selector("lib.Library.Missing"));
    let model = merged(set, config);
    let errors: Vec<_> = model.diags().errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Some(codes::UNMATCHED_SELECTOR));
    assert!(errors[0].message.contains("'lib.Library.Missing'"));
}

#[test]
fn test_validator_rejects_body_on_delete() {
    let rule = HttpRule {
        delete: Some("/v1/{name}".into()),
        body: "*".into(),
        ..Default::default()
    };
    let set = library(vec![method("DeleteShelf").with_http(rule)]);
    let mut model = merged(set, ServiceConfig::new("library.example.com"));
    assert!(!model.run_validators());
    let error = model.diags().errors().next().unwrap();
    assert_eq!(error.code, Some(codes::HTTP_BODY_NOT_ALLOWED));
}

#[test]
fn test_validator_detects_conflicting_bindings() {
    let set = library(vec![
        method("GetShelf").with_http(HttpRule::get("/v1/{name}")),
        method("ReadShelf").with_http(HttpRule::get("/v1/{name}")),
    ]);
    let mut model = merged(set, ServiceConfig::new("library.example.com"));
    assert!(!model.run_validators());
    let errors: Vec<_> = model.diags().errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, Some(codes::HTTP_BINDING_CONFLICT));
    assert!(errors[0].message.contains("'GET /v1/{name}'"));
    assert!(errors[0].message.contains("'lib.Library.GetShelf'"));
}

#[test]
fn test_reserved_keyword_rule() {
    let set = library(vec![
        method("GetShelf").with_http(HttpRule::get("/v1/{name}/{shelf.class}")),
    ]);
    let model = merged(set, ServiceConfig::new("library.example.com"));
    let element = method_id(&model, "lib.Library.GetShelf");
    let findings = ReservedKeywordRule.lint(&model, element);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("'class'"));
}
