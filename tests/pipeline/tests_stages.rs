//! Stage establishment through the public API.

use protoscope::graph::AttributeKey;
use protoscope::model::{Processor, Stage, StageId, StageState};
use protoscope::processors::{Linted, Normalized, Resolved, SymbolTable};
use protoscope::{AnalysisOptions, ModelError, ServiceConfig, analyze};

use crate::helpers::library_fixture::library_descriptors;
use crate::helpers::model_helpers::standard_model;

/// Counts the message types the resolver indexed.
struct TypeCount;

impl AttributeKey for TypeCount {
    type Value = usize;
    const NAME: &'static str = "type_count";
}

impl Stage for TypeCount {}

struct TypeCounter;

impl Processor for TypeCounter {
    fn requires(&self) -> Vec<StageId> {
        vec![StageId::of::<Resolved>()]
    }

    fn establishes(&self) -> StageId {
        StageId::of::<TypeCount>()
    }

    fn run(&mut self, model: &mut protoscope::Model) -> bool {
        let Some(count) = model.stage::<Resolved>().map(SymbolTable::type_count) else {
            return false;
        };
        model.put_stage::<TypeCount>(count);
        true
    }
}

#[test]
fn test_custom_stage_runs_after_requirements() {
    let mut model = standard_model(
        &library_descriptors(),
        ServiceConfig::new("library.example.com"),
        AnalysisOptions::default(),
    );
    model.register_processor(Box::new(TypeCounter));

    assert!(model.establish::<TypeCount>().unwrap());
    assert_eq!(
        model.stage_state(StageId::of::<Resolved>()),
        StageState::Established
    );
    // Six top-level messages, FilterEntry and Book.State.
    assert_eq!(model.stage::<TypeCount>(), Some(&8));
    assert_eq!(
        model.stage_state(StageId::of::<Normalized>()),
        StageState::Unestablished
    );
}

#[test]
fn test_analyze_without_processors_is_fatal() {
    let mut model = protoscope::Model::from_descriptor_set(
        &library_descriptors(),
        AnalysisOptions::default(),
    )
    .unwrap();
    let err = analyze(&mut model).unwrap_err();
    assert!(matches!(err, ModelError::MissingProcessor("linted")));
    assert!(!model.is_established::<Linted>());
}

#[test]
fn test_stages_are_established_once() {
    let mut model = standard_model(
        &library_descriptors(),
        ServiceConfig::new("library.example.com").with_config_version(3),
        AnalysisOptions::default(),
    );
    assert!(model.establish::<Linted>().unwrap());
    let warnings = model.diags().warning_count();
    assert!(model.establish::<Linted>().unwrap());
    assert_eq!(model.diags().warning_count(), warnings);
}
