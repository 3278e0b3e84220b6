//! Decoding descriptor sets and service configs.

use protoscope::config::GatedRule;
use protoscope::{AnalysisOptions, ConfigError, ModelError, Model, ServiceConfig};
use rstest::rstest;

use crate::helpers::library_fixture::LIBRARY_CONFIG;

const DESCRIPTORS: &str = r#"{
  "file": [{
    "name": "shelf.proto",
    "package": "pkg",
    "syntax": "proto3",
    "message_type": [{
      "name": "Shelf",
      "field": [
        { "name": "name", "number": 1, "type": "TYPE_STRING" },
        { "name": "tags", "number": 2, "label": "LABEL_REPEATED", "type": "TYPE_STRING" }
      ]
    }],
    "source_code_info": {
      "location": [{ "path": [4, 0], "span": [3, 0, 6, 1], "leading_comments": " A shelf.\n" }]
    }
  }]
}"#;

#[test]
fn test_model_from_json() {
    let model = Model::from_json(DESCRIPTORS, AnalysisOptions::default()).unwrap();
    let graph = model.graph();
    assert_eq!(graph.element_count(), 4);
    let shelf = graph.source_elements()[1];
    assert_eq!(graph.full_name(shelf), "pkg.Shelf");
    assert_eq!(graph.location(shelf).to_string(), "shelf.proto:4:1");
    assert_eq!(graph.documentation(shelf).trim(), "A shelf.");
}

#[rstest]
#[case("{ not json")]
#[case(r#"{ "file": [{ "name": 3 }] }"#)]
fn test_malformed_descriptors(#[case] json: &str) {
    let err = Model::from_json(json, AnalysisOptions::default()).unwrap_err();
    assert!(matches!(err, ModelError::Descriptor(_)));
}

#[test]
fn test_unsupported_syntax_is_fatal() {
    let json = r#"{ "file": [{ "name": "a.proto", "syntax": "editions" }] }"#;
    let err = Model::from_json(json, AnalysisOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Illegal proto syntax for file a.proto: editions"
    );
}

#[test]
fn test_service_config_from_yaml() {
    let config = ServiceConfig::from_yaml(LIBRARY_CONFIG).unwrap();
    assert_eq!(config.name, "library.example.com");
    assert_eq!(config.config_version, Some(3));
    assert_eq!(config.apis[0].name, "library.v1.LibraryService");
    assert_eq!(
        config.http.rules[0].pattern(),
        Some(("GET", "/v1/shelves"))
    );
    assert_eq!(config.visibility.rules.len(), 2);
    assert_eq!(config.documentation.summary, "Manages shelves and books.");
}

#[test]
fn test_service_config_from_json() {
    let config = ServiceConfig::from_json(r#"{ "name": "a.example.com", "config_version": 2 }"#)
        .unwrap();
    assert_eq!(config.config_version, Some(2));
    assert!(config.apis.is_empty());
}

#[test]
fn test_invalid_config_yaml() {
    let err = ServiceConfig::from_yaml("apis: 7").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_analysis_options_from_json() {
    let options: AnalysisOptions = serde_json::from_str(
        r#"{ "visibility_labels": ["PUBLIC"], "version_gates": { "hidden_parent": 3 } }"#,
    )
    .unwrap();
    assert_eq!(options.visibility_labels, vec!["PUBLIC"]);
    assert_eq!(options.version_gates.threshold(GatedRule::HiddenParent), 3);
    assert_eq!(options.version_gates.threshold(GatedRule::HttpFieldHidden), 0);
    assert!(options.sources.is_none());
}
