//! Documentation instructions in the full pipeline.

use protoscope::aspects::documentation::{Documentation, DocumentationAttribute};
use protoscope::descriptor::FileDescriptorSet;
use protoscope::{AnalysisOptions, ServiceConfig};

use crate::helpers::library_fixture::{library_file, qualified};
use crate::helpers::model_helpers::{analyzed, find, messages};

fn config() -> ServiceConfig {
    ServiceConfig::new("library.example.com").with_config_version(3)
}

/// The library file with `ListShelves` deprecated.
fn with_deprecated_method(service_comment: Option<&str>) -> FileDescriptorSet {
    let mut file = library_file();
    file.service[0].method[1].options.deprecated = true;
    if let Some(comment) = service_comment {
        file = file.with_comment(vec![6, 0], comment);
    }
    FileDescriptorSet::new(vec![file])
}

#[test]
fn test_deprecated_method_warns() {
    let (model, outcome) = analyzed(
        &with_deprecated_method(None),
        config(),
        AnalysisOptions::default(),
    );
    assert!(outcome.is_success());
    let warnings: Vec<_> = model.diags().warnings().collect();
    assert_eq!(warnings.len(), 1, "{:?}", messages(&model));
    assert_eq!(
        warnings[0].message,
        "'library.v1.LibraryService.ListShelves' is deprecated but has no deprecation description."
    );
}

#[test]
fn test_suppression_on_service_covers_methods() {
    let (model, outcome) = analyzed(
        &with_deprecated_method(Some(
            "The library. (== suppress_warning documentation-* ==)",
        )),
        config(),
        AnalysisOptions::default(),
    );
    assert!(outcome.is_success());
    assert_eq!(model.diags().warning_count(), 0, "{:?}", messages(&model));
    assert_eq!(model.diags().suppressed_count(), 1);

    let service = find(&model, &qualified("LibraryService"));
    let documentation = model.graph().attr::<DocumentationAttribute>(service);
    assert_eq!(
        documentation,
        Some(&Documentation {
            text: "The library.".into(),
            ..Default::default()
        })
    );
}

#[test]
fn test_unknown_instruction_fails_analysis() {
    let (model, outcome) = analyzed(
        &with_deprecated_method(Some("(== include other.md ==)")),
        config(),
        AnalysisOptions::default(),
    );
    assert!(!outcome.is_success());
    assert!(!outcome.linted);
    let error = model.diags().errors().next().unwrap();
    assert_eq!(error.message, "documentation instruction 'include' unknown.");
}
