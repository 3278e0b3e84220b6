//! Model setup and lookup helpers.

use protoscope::descriptor::FileDescriptorSet;
use protoscope::{
    AnalysisOptions, AnalysisOutcome, ElementId, Model, ServiceConfig, analyze,
    register_standard_config_aspects, register_standard_processors,
};

/// Build a model with the standard setup, without running anything.
pub fn standard_model(
    set: &FileDescriptorSet,
    config: ServiceConfig,
    options: AnalysisOptions,
) -> Model {
    let mut model = Model::from_descriptor_set(set, options).expect("descriptor set builds");
    model.set_service_config(config);
    register_standard_processors(&mut model);
    register_standard_config_aspects(&mut model);
    model
}

/// Build a model with the standard setup and analyze it.
pub fn analyzed(
    set: &FileDescriptorSet,
    config: ServiceConfig,
    options: AnalysisOptions,
) -> (Model, AnalysisOutcome) {
    let mut model = standard_model(set, config, options);
    let outcome = analyze(&mut model).expect("no fatal pipeline error");
    (model, outcome)
}

/// Find a source element by full name.
pub fn find(model: &Model, full_name: &str) -> ElementId {
    let graph = model.graph();
    graph
        .source_elements()
        .into_iter()
        .find(|&e| graph.full_name(e) == full_name)
        .unwrap_or_else(|| panic!("no element named '{full_name}'"))
}

/// Messages of all recorded diagnostics, for assertion output.
pub fn messages(model: &Model) -> Vec<String> {
    model
        .diags()
        .diagnostics()
        .iter()
        .map(ToString::to_string)
        .collect()
}

pub fn assert_no_errors(model: &Model) {
    assert_eq!(
        model.error_count(),
        0,
        "Expected no errors, got:\n{}",
        messages(model).join("\n")
    );
}
