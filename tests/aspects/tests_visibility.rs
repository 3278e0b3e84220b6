//! Label views of an analyzed model.

use protoscope::aspects::scoper_for_labels;
use protoscope::diagnostics::codes;
use protoscope::{AnalysisOptions, ServiceConfig};

use crate::helpers::library_fixture::{LIBRARY_CONFIG, library_descriptors, qualified};
use crate::helpers::model_helpers::{analyzed, find, messages};

#[test]
fn test_preview_view() {
    let config = ServiceConfig::from_yaml(LIBRARY_CONFIG).unwrap();
    let (mut model, outcome) = analyzed(&library_descriptors(), config, AnalysisOptions::default());
    assert!(outcome.is_success());

    let view = scoper_for_labels(&mut model, &["PREVIEW".to_string()]).unwrap();
    assert!(view.is_reachable(find(&model, &qualified("LibraryService.PreviewShelf"))));
    assert!(!view.is_reachable(find(&model, &qualified("Shelf.internal_notes"))));
    // The model scoper itself is untouched.
    assert!(model.is_reachable(find(&model, &qualified("Shelf.internal_notes"))));
    assert_eq!(model.error_count(), 0, "{:?}", messages(&model));
}

#[test]
fn test_view_violations_carry_label_context() {
    let config = ServiceConfig::from_yaml(LIBRARY_CONFIG)
        .unwrap()
        .with_visibility_rule(qualified("Book"), "INTERNAL");
    let (mut model, outcome) = analyzed(&library_descriptors(), config, AnalysisOptions::default());
    assert!(outcome.is_success());

    let view = scoper_for_labels(&mut model, &["PUBLIC".to_string()]).unwrap();
    assert!(!view.is_reachable(find(&model, &qualified("Book"))));
    let errors: Vec<_> = model.diags().errors().collect();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.code == Some(codes::HIDDEN_BUT_REQUIRED)));
    assert!(
        errors[0]
            .message
            .ends_with("With visibility labels 'PUBLIC'.")
    );
}
