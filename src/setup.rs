//! Standard setup and the analysis driver.
//!
//! ```text
//! let mut model = Model::from_json(descriptors, options)?;
//! model.set_service_config(config);
//! register_standard_processors(&mut model);
//! register_standard_config_aspects(&mut model);
//! let outcome = analyze(&mut model)?;
//! ```

use crate::aspects::{
    DocumentationConfigAspect, HttpConfigAspect, NamingConfigAspect, VersionConfigAspect,
    VisibilityConfigAspect,
};
use crate::error::ModelError;
use crate::model::Model;
use crate::processors::{Linted, Linter, Merger, Normalizer, Resolver};

/// Register the Resolver, Merger, Normalizer and Linter.
pub fn register_standard_processors(model: &mut Model) {
    model.register_processor(Box::new(Resolver));
    model.register_processor(Box::new(Merger));
    model.register_processor(Box::new(Normalizer));
    model.register_processor(Box::new(Linter));
}

/// Register the standard config aspects with their lint rules and
/// validators. Call after the service config is attached.
pub fn register_standard_config_aspects(model: &mut Model) {
    if model.service_config().is_none() {
        tracing::warn!("registering config aspects on a model without service config");
    }
    model.register_config_aspect(Box::new(DocumentationConfigAspect::new()));
    model.register_config_aspect(Box::new(VersionConfigAspect));
    model.register_config_aspect(Box::new(HttpConfigAspect::new()));
    model.register_config_aspect(Box::new(NamingConfigAspect));
    model.register_config_aspect(Box::new(VisibilityConfigAspect::new()));
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// Whether the lint stage was established.
    pub linted: bool,
    /// Whether validators ran and found no error.
    pub validated: bool,
    pub error_count: usize,
    pub warning_count: usize,
}

impl AnalysisOutcome {
    /// Linted and no error recorded anywhere.
    pub fn is_success(&self) -> bool {
        self.linted && self.error_count == 0
    }
}

/// Establish the lint stage, then run the validators on the result.
///
/// Validators only run once linting succeeded. Fatal pipeline errors (a
/// stage cycle, a missing processor) are returned as `Err`.
pub fn analyze(model: &mut Model) -> Result<AnalysisOutcome, ModelError> {
    let linted = model.establish::<Linted>()?;
    let validated = linted && model.run_validators();
    let outcome = AnalysisOutcome {
        linted,
        validated,
        error_count: model.diags().error_count(),
        warning_count: model.diags().warning_count(),
    };
    tracing::info!(
        "analysis finished: {} error(s), {} warning(s)",
        outcome.error_count,
        outcome.warning_count
    );
    Ok(outcome)
}
