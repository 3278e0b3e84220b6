//! End-to-end analysis of the library API.

use protoscope::aspects::DocumentationAttribute;
use protoscope::diagnostics::codes;
use protoscope::graph::HttpAttribute;
use protoscope::processors::{Linted, Merged, Normalized, Resolved};
use protoscope::{AnalysisOptions, ServiceConfig};

use crate::helpers::library_fixture::{LIBRARY_CONFIG, library_descriptors, qualified};
use crate::helpers::model_helpers::{analyzed, assert_no_errors, find, messages};

fn library_config() -> ServiceConfig {
    ServiceConfig::from_yaml(LIBRARY_CONFIG).expect("library config decodes")
}

#[test]
fn test_library_analysis_succeeds() {
    let (model, outcome) = analyzed(
        &library_descriptors(),
        library_config(),
        AnalysisOptions::default(),
    );
    assert_no_errors(&model);
    assert!(outcome.is_success());
    assert!(outcome.linted);
    assert!(outcome.validated);
    assert_eq!(outcome.warning_count, 0, "{:?}", messages(&model));
    for established in [
        model.is_established::<Resolved>(),
        model.is_established::<Merged>(),
        model.is_established::<Normalized>(),
        model.is_established::<Linted>(),
    ] {
        assert!(established);
    }
}

#[test]
fn test_all_standard_aspects_registered() {
    let (model, _) = analyzed(
        &library_descriptors(),
        library_config(),
        AnalysisOptions::default(),
    );
    assert_eq!(
        model.config_aspect_names(),
        vec!["documentation", "versioning", "http", "naming", "visibility"]
    );
}

#[test]
fn test_bindings_from_config_and_options() {
    let (model, _) = analyzed(
        &library_descriptors(),
        library_config(),
        AnalysisOptions::default(),
    );
    let graph = model.graph();

    let list = find(&model, &qualified("LibraryService.ListShelves"));
    let bindings = graph.attr::<HttpAttribute>(list).unwrap();
    assert_eq!(bindings[0].path, "/v1/shelves");

    let create = find(&model, &qualified("LibraryService.CreateBook"));
    let binding = &graph.attr::<HttpAttribute>(create).unwrap()[0];
    assert_eq!(binding.path_selectors[0].display(graph), "parent");
    assert_eq!(binding.body_selectors[0].display(graph), "book");
}

#[test]
fn test_reachability_from_configured_api() {
    let (model, _) = analyzed(
        &library_descriptors(),
        library_config(),
        AnalysisOptions::default(),
    );
    let scoper = model.scoper().unwrap();
    assert_eq!(scoper.roots().len(), 1);
    for name in [
        "Shelf",
        "Book.State",
        "ListShelvesRequest.FilterEntry",
        "LibraryService.PreviewShelf",
    ] {
        assert!(
            model.is_reachable(find(&model, &qualified(name))),
            "{name} should be reachable"
        );
    }
}

#[test]
fn test_documentation_normalized() {
    let (model, _) = analyzed(
        &library_descriptors(),
        library_config(),
        AnalysisOptions::default(),
    );
    let graph = model.graph();
    let book = graph
        .attr::<DocumentationAttribute>(find(&model, &qualified("Book")))
        .unwrap();
    assert_eq!(book.text, "A book on a shelf.");

    let read = graph
        .attr::<DocumentationAttribute>(find(&model, &qualified("Book.read")))
        .unwrap();
    assert_eq!(read.text, "Whether the book was read.");
    assert_eq!(
        read.deprecation_description.as_deref(),
        Some("Use reading lists.")
    );
}

#[test]
fn test_hidden_type_required_by_visible_method() {
    let config = library_config().with_visibility_rule(qualified("Shelf"), "PREVIEW");
    let options = AnalysisOptions::default().with_visibility_label("PUBLIC");
    let (model, outcome) = analyzed(&library_descriptors(), config, options);

    assert!(!outcome.is_success());
    assert!(!outcome.linted);
    assert!(!outcome.validated);
    let errors: Vec<_> = model.diags().errors().collect();
    assert_eq!(errors.len(), 2, "{:?}", messages(&model));
    assert!(errors.iter().all(|e| e.code == Some(codes::HIDDEN_BUT_REQUIRED)));
    assert_eq!(
        errors[0].message,
        "'library.v1.Shelf' is hidden but required by visible \
         'library.v1.LibraryService.GetShelf'. 'library.v1.Shelf' is restricted to 'PREVIEW'."
    );
    assert!(errors[1].message.contains("'library.v1.ListShelvesResponse.shelves'"));
}

#[test]
fn test_http_field_hidden_is_error_at_current_version() {
    let config = library_config().with_visibility_rule(qualified("GetShelfRequest.name"), "INTERNAL");
    let options = AnalysisOptions::default().with_visibility_label("PUBLIC");
    let (model, outcome) = analyzed(&library_descriptors(), config, options);

    assert!(!outcome.is_success());
    let errors: Vec<_> = model.diags().errors().collect();
    assert_eq!(errors.len(), 1, "{:?}", messages(&model));
    assert_eq!(errors[0].code, Some(codes::HTTP_FIELD_HIDDEN));
    assert!(errors[0].message.starts_with(
        "Field 'library.v1.GetShelfRequest.name' required by HTTP binding of method \
         'library.v1.LibraryService.GetShelf' cannot be hidden."
    ));
}

#[test]
fn test_http_field_hidden_is_warning_before_gate() {
    let mut config =
        library_config().with_visibility_rule(qualified("GetShelfRequest.name"), "INTERNAL");
    config.config_version = Some(1);
    let options = AnalysisOptions::default().with_visibility_label("PUBLIC");
    let (model, outcome) = analyzed(&library_descriptors(), config, options);

    assert!(outcome.is_success(), "{:?}", messages(&model));
    let gated: Vec<_> = model
        .diags()
        .warnings()
        .filter(|w| w.code == Some(codes::VERSION_GATED))
        .collect();
    assert_eq!(gated.len(), 1);
    assert!(
        gated[0]
            .message
            .ends_with("Note: this will be an error for config version 2 and later.")
    );
    assert!(
        model
            .diags()
            .warnings()
            .any(|w| w.rule.as_deref() == Some("versioning-config-version"))
    );
}

#[test]
fn test_visibility_labels_hide_restricted_elements() {
    let options = AnalysisOptions::default().with_visibility_label("PUBLIC");
    let (model, outcome) = analyzed(&library_descriptors(), library_config(), options);

    assert!(outcome.is_success(), "{:?}", messages(&model));
    assert!(!model.is_reachable(find(&model, &qualified("LibraryService.PreviewShelf"))));
    assert!(!model.is_reachable(find(&model, &qualified("Shelf.internal_notes"))));
    assert!(model.is_reachable(find(&model, &qualified("Shelf.theme"))));
    let scoper = model.scoper().unwrap();
    assert!(scoper.has_unreachable_descendants(find(&model, &qualified("Shelf"))));
}

#[test]
fn test_unresolved_api_fails_merge() {
    let config = ServiceConfig::new("library.example.com")
        .with_config_version(3)
        .with_api("library.v1.Missing");
    let (model, outcome) = analyzed(&library_descriptors(), config, AnalysisOptions::default());

    assert!(!outcome.linted);
    assert!(!model.is_established::<Merged>());
    assert!(model.is_established::<Resolved>());
    let error = model.diags().errors().next().unwrap();
    assert_eq!(error.code, Some(codes::UNRESOLVED_API));
}
