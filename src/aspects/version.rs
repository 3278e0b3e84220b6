//! Config version aspect.

use crate::base::Location;
use crate::base::constants::CURRENT_CONFIG_VERSION;
use crate::diagnostics::Diagnostic;
use crate::model::{ConfigAspect, LintRule, Model};

/// The `versioning` config aspect. The Merger applies the version itself;
/// this aspect only lints it.
#[derive(Debug, Default)]
pub struct VersionConfigAspect;

impl ConfigAspect for VersionConfigAspect {
    fn name(&self) -> &'static str {
        "versioning"
    }

    fn lint_rules(&self) -> Vec<Box<dyn LintRule>> {
        vec![Box::new(ConfigVersionRule)]
    }
}

/// Warns when the service config is on an older config version.
pub struct ConfigVersionRule;

impl LintRule for ConfigVersionRule {
    fn name(&self) -> &'static str {
        "versioning-config-version"
    }

    fn lint_model(&self, model: &Model) -> Vec<Diagnostic> {
        let version = model.config_version();
        if version >= CURRENT_CONFIG_VERSION {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            Location::named("config_version"),
            format!(
                "Service config uses config_version {version}, the current version is {CURRENT_CONFIG_VERSION}."
            ),
        )]
    }
}
