//! Service configuration and analysis options.
//!
//! [`ServiceConfig`] is the typed form of the externally supplied service
//! configuration merged into the model by the Merger stage. [`AnalysisOptions`]
//! controls how one analysis run behaves.

mod selector;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::HttpRule;
use crate::error::ConfigError;

pub use selector::Selector;

// ============================================================================
// SERVICE CONFIG
// ============================================================================

/// The service configuration, as decoded from YAML or JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub title: String,
    /// Declared config version. Absent means [`DEFAULT_CONFIG_VERSION`].
    ///
    /// [`DEFAULT_CONFIG_VERSION`]: crate::base::constants::DEFAULT_CONFIG_VERSION
    pub config_version: Option<u32>,
    /// Interfaces making up the public API. Empty means every source interface.
    pub apis: Vec<ApiRef>,
    pub http: HttpConfig,
    pub visibility: VisibilityConfig,
    pub documentation: DocumentationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub rules: Vec<HttpRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    pub rules: Vec<VisibilityRule>,
}

/// Restricts the elements matched by `selector` to the comma-separated labels
/// in `restriction`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityRule {
    pub selector: String,
    pub restriction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    pub summary: String,
    pub rules: Vec<DocumentationRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationRule {
    pub selector: String,
    pub description: Option<String>,
    pub deprecation_description: Option<String>,
}

impl ServiceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Decode a service config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Decode a service config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_config_version(mut self, version: u32) -> Self {
        self.config_version = Some(version);
        self
    }

    pub fn with_api(mut self, name: impl Into<String>) -> Self {
        self.apis.push(ApiRef { name: name.into() });
        self
    }

    pub fn with_http_rule(mut self, rule: HttpRule) -> Self {
        self.http.rules.push(rule);
        self
    }

    pub fn with_visibility_rule(
        mut self,
        selector: impl Into<String>,
        restriction: impl Into<String>,
    ) -> Self {
        self.visibility.rules.push(VisibilityRule {
            selector: selector.into(),
            restriction: restriction.into(),
        });
        self
    }

    pub fn with_documentation_rule(mut self, rule: DocumentationRule) -> Self {
        self.documentation.rules.push(rule);
        self
    }
}

// ============================================================================
// ANALYSIS OPTIONS
// ============================================================================

/// Options for one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Files treated as sources. `None` treats every file as a source.
    pub sources: Option<Vec<String>>,
    /// Visibility labels enabled for this run.
    pub visibility_labels: Vec<String>,
    /// Version gates of scoper rules.
    pub version_gates: VersionGates,
}

impl AnalysisOptions {
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_visibility_label(mut self, label: impl Into<String>) -> Self {
        self.visibility_labels.push(label.into());
        self
    }
}

/// Rules whose violation is an error only from some config version on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatedRule {
    /// The parent of a visible element is hidden.
    HiddenParent,
    /// A field bound by an HTTP rule is hidden.
    HttpFieldHidden,
}

/// Config version thresholds for [`GatedRule`]s.
///
/// Below its threshold, a violated rule is downgraded to a warning carrying a
/// note about the version at which it becomes an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionGates {
    thresholds: FxHashMap<GatedRule, u32>,
}

impl Default for VersionGates {
    fn default() -> Self {
        let mut thresholds = FxHashMap::default();
        thresholds.insert(GatedRule::HiddenParent, 2);
        thresholds.insert(GatedRule::HttpFieldHidden, 2);
        Self { thresholds }
    }
}

impl VersionGates {
    /// Gates with no thresholds: every rule is an error at every version.
    pub fn none() -> Self {
        Self {
            thresholds: FxHashMap::default(),
        }
    }

    pub fn with_threshold(mut self, rule: GatedRule, version: u32) -> Self {
        self.thresholds.insert(rule, version);
        self
    }

    /// The version from which `rule` is an error. Ungated rules return 0.
    pub fn threshold(&self, rule: GatedRule) -> u32 {
        self.thresholds.get(&rule).copied().unwrap_or(0)
    }
}
