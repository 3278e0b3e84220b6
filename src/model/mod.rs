//! The element graph plus everything analysis hangs off it.
//!
//! A [`Model`] owns the graph, the diagnostics sink, the stage registry and
//! the plugin registries (processors, config aspects, lint rules,
//! validators). All registries live on the instance, so independent models
//! can coexist in one process.
//!
//! ## Stages
//!
//! Each stage moves `Unestablished → Establishing → Established | Failed`.
//! [`Model::establish_stage`] establishes the requirements of the stage's
//! processor in declaration order, then runs it once. A stage fails when its
//! processor returns `false`, reports an error while running, or one of its
//! requirements fails; dependents of a failed stage never run. Requesting a
//! stage that is already being established is a dependency cycle and aborts.

mod plugin;
mod processor;
mod stage;

use std::rc::Rc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::base::constants::DEFAULT_CONFIG_VERSION;
use crate::base::{ElementId, Location};
use crate::config::{AnalysisOptions, ServiceConfig};
use crate::descriptor::FileDescriptorSet;
use crate::diagnostics::{DiagCollector, Diagnostic, codes};
use crate::error::ModelError;
use crate::graph::{AttributeBag, Graph};
use crate::scoper::{AllOf, AlwaysInScope, ScopeContext, ScopePredicate, Scoper};

pub use plugin::{ConfigAspect, LintRule, Validator};
pub use processor::Processor;
pub use stage::{Stage, StageId, StageState};

/// The semantic model of one analysis run.
pub struct Model {
    graph: Graph,
    diags: DiagCollector,
    options: AnalysisOptions,

    // Stages
    stage_data: AttributeBag,
    states: FxHashMap<StageId, StageState>,
    /// A slot is empty while its processor runs.
    processors: IndexMap<StageId, Option<Box<dyn Processor>>>,
    establishing: Vec<StageId>,

    // Config aspects
    config_aspects: Vec<Box<dyn ConfigAspect>>,
    lint_rules: Vec<Box<dyn LintRule>>,
    validators: Vec<Box<dyn Validator>>,
    service_config: Option<ServiceConfig>,
    config_version: u32,

    // Scoping
    roots: Vec<ElementId>,
    scope_predicates: Vec<Rc<dyn ScopePredicate>>,
    scoper: Option<Scoper>,
}

impl Model {
    /// Build a model from a descriptor set.
    ///
    /// Errors here are fatal: no model exists to analyze.
    pub fn from_descriptor_set(
        set: &FileDescriptorSet,
        options: AnalysisOptions,
    ) -> Result<Model, ModelError> {
        let graph = Graph::build(set, &options)?;
        tracing::debug!(
            "model: {} file(s), {} element(s)",
            set.file.len(),
            graph.element_count()
        );
        Ok(Model {
            graph,
            diags: DiagCollector::new(),
            options,
            stage_data: AttributeBag::default(),
            states: FxHashMap::default(),
            processors: IndexMap::new(),
            establishing: Vec::new(),
            config_aspects: Vec::new(),
            lint_rules: Vec::new(),
            validators: Vec::new(),
            service_config: None,
            config_version: DEFAULT_CONFIG_VERSION,
            roots: Vec::new(),
            scope_predicates: Vec::new(),
            scoper: None,
        })
    }

    /// Decode a JSON descriptor set and build a model from it.
    pub fn from_json(json: &str, options: AnalysisOptions) -> Result<Model, ModelError> {
        let set = FileDescriptorSet::from_json(json)?;
        Self::from_descriptor_set(&set, options)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    // ============================================================
    // Diagnostics
    // ============================================================

    pub fn diags(&self) -> &DiagCollector {
        &self.diags
    }

    pub fn diags_mut(&mut self) -> &mut DiagCollector {
        &mut self.diags
    }

    pub fn error_count(&self) -> usize {
        self.diags.error_count()
    }

    /// Report a diagnostic, matching suppressions against its element and
    /// the element's ancestors. Returns whether it was recorded.
    pub fn report(&mut self, diagnostic: Diagnostic) -> bool {
        let scope = diagnostic
            .element
            .map(|e| self.graph.ancestry(e))
            .unwrap_or_default();
        self.diags.report(diagnostic, &scope)
    }

    /// An error located at `element`.
    pub fn error_for(&self, element: ElementId, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.graph.location(element), message).with_element(element)
    }

    /// A warning located at `element`.
    pub fn warning_for(&self, element: ElementId, message: impl Into<String>) -> Diagnostic {
        Diagnostic::warning(self.graph.location(element), message).with_element(element)
    }

    pub fn error_at(&mut self, element: ElementId, code: &'static str, message: impl Into<String>) {
        let diagnostic = self.error_for(element, message).with_code(code);
        self.report(diagnostic);
    }

    pub fn warning_at(
        &mut self,
        element: ElementId,
        code: &'static str,
        message: impl Into<String>,
    ) {
        let diagnostic = self.warning_for(element, message).with_code(code);
        self.report(diagnostic);
    }

    // ============================================================
    // Service Configuration
    // ============================================================

    pub fn set_service_config(&mut self, config: ServiceConfig) {
        self.service_config = Some(config);
    }

    pub fn service_config(&self) -> Option<&ServiceConfig> {
        self.service_config.as_ref()
    }

    pub fn config_version(&self) -> u32 {
        self.config_version
    }

    pub fn set_config_version(&mut self, version: u32) {
        self.config_version = version;
    }

    // ============================================================
    // Scoping
    // ============================================================

    /// The declared API surface: root elements reachability starts from.
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn set_roots(&mut self, roots: Vec<ElementId>) {
        self.roots = roots;
    }

    /// Narrow the model's view. All registered predicates must hold.
    pub fn add_scope_predicate(&mut self, predicate: Rc<dyn ScopePredicate>) {
        self.scope_predicates.push(predicate);
    }

    pub fn scope_predicate(&self) -> Rc<dyn ScopePredicate> {
        match self.scope_predicates.as_slice() {
            [] => Rc::new(AlwaysInScope),
            [single] => single.clone(),
            all => Rc::new(AllOf::new(all.to_vec())),
        }
    }

    /// Compute the model scoper from the current roots and scope predicate.
    pub fn build_scoper(&mut self) -> &Scoper {
        let ctx = ScopeContext {
            graph: &self.graph,
            config_version: self.config_version,
            gates: &self.options.version_gates,
        };
        let predicate = self.scope_predicate();
        let scoper = Scoper::with_predicate(
            &ctx,
            &mut self.diags,
            self.roots.clone(),
            predicate,
            "",
        );
        self.scoper.insert(scoper)
    }

    pub fn scoper(&self) -> Option<&Scoper> {
        self.scoper.as_ref()
    }

    /// A narrower view of the model scoper. Violations found on the way are
    /// reported with `error_context` appended.
    pub fn restrict_scoper(
        &mut self,
        predicate: Rc<dyn ScopePredicate>,
        error_context: impl Into<String>,
    ) -> Option<Scoper> {
        let scoper = self.scoper.as_ref()?;
        let ctx = ScopeContext {
            graph: &self.graph,
            config_version: self.config_version,
            gates: &self.options.version_gates,
        };
        Some(scoper.restrict(&ctx, &mut self.diags, predicate, error_context))
    }

    /// Whether the model scoper reached `element`. Before scoping, every
    /// element counts as reachable.
    pub fn is_reachable(&self, element: ElementId) -> bool {
        self.scoper.as_ref().is_none_or(|s| s.is_reachable(element))
    }

    /// Reachable elements of the source files, in pre-order.
    pub fn reachable_elements(&self) -> Vec<ElementId> {
        self.graph
            .source_elements()
            .into_iter()
            .filter(|&e| self.is_reachable(e))
            .collect()
    }

    // ============================================================
    // Registration
    // ============================================================

    /// Register the processor for the stage it establishes, replacing any
    /// earlier one.
    pub fn register_processor(&mut self, processor: Box<dyn Processor>) {
        let stage = processor.establishes();
        if self.processors.insert(stage, Some(processor)).is_some() {
            tracing::warn!("replacing processor for stage '{}'", stage);
        }
    }

    pub fn has_processor(&self, stage: StageId) -> bool {
        self.processors.contains_key(&stage)
    }

    /// Register a config aspect along with its lint rules and validators.
    pub fn register_config_aspect(&mut self, aspect: Box<dyn ConfigAspect>) {
        tracing::debug!("registering config aspect '{}'", aspect.name());
        self.lint_rules.extend(aspect.lint_rules());
        self.validators.extend(aspect.validators());
        self.config_aspects.push(aspect);
    }

    pub fn register_lint_rule(&mut self, rule: Box<dyn LintRule>) {
        self.lint_rules.push(rule);
    }

    pub fn register_validator(&mut self, validator: Box<dyn Validator>) {
        self.validators.push(validator);
    }

    pub fn config_aspect_names(&self) -> Vec<&'static str> {
        self.config_aspects.iter().map(|a| a.name()).collect()
    }

    pub fn lint_rules(&self) -> &[Box<dyn LintRule>] {
        &self.lint_rules
    }

    /// Run `f` over every config aspect with mutable access to the model.
    pub fn for_each_config_aspect(&mut self, mut f: impl FnMut(&mut dyn ConfigAspect, &mut Model)) {
        let mut aspects = std::mem::take(&mut self.config_aspects);
        for aspect in &mut aspects {
            f(aspect.as_mut(), self);
        }
        // Aspects registered while running go after the existing ones.
        aspects.append(&mut self.config_aspects);
        self.config_aspects = aspects;
    }

    /// Run every validator and report what they find. Returns whether no
    /// error was found.
    pub fn run_validators(&mut self) -> bool {
        let errors_before = self.diags.error_count();
        let mut found = Vec::new();
        for validator in &self.validators {
            tracing::trace!("validator '{}'", validator.name());
            found.extend(validator.validate(self));
        }
        for diagnostic in found {
            self.report(diagnostic);
        }
        self.diags.error_count() == errors_before
    }

    // ============================================================
    // Stages
    // ============================================================

    pub fn stage_state(&self, stage: StageId) -> StageState {
        self.states.get(&stage).copied().unwrap_or_default()
    }

    pub fn is_established<S: Stage>(&self) -> bool {
        self.stage_state(StageId::of::<S>()) == StageState::Established
    }

    /// Payload of an established stage.
    pub fn stage<S: Stage>(&self) -> Option<&S::Value> {
        if self.is_established::<S>() {
            self.stage_data.get::<S>()
        } else {
            None
        }
    }

    /// Attach the payload of `S`. Called by the processor establishing `S`.
    pub fn put_stage<S: Stage>(&mut self, value: S::Value) {
        self.stage_data.put::<S>(value);
    }

    pub fn establish<S: Stage>(&mut self) -> Result<bool, ModelError> {
        self.establish_stage(StageId::of::<S>())
    }

    /// Establish a stage and, first, everything it requires.
    ///
    /// Returns `Ok(false)` when the stage failed now or earlier. Missing
    /// processors and dependency cycles are fatal.
    pub fn establish_stage(&mut self, stage: StageId) -> Result<bool, ModelError> {
        match self.stage_state(stage) {
            StageState::Established => return Ok(true),
            StageState::Failed => return Ok(false),
            StageState::Establishing => return Err(self.stage_cycle(stage)),
            StageState::Unestablished => {}
        }
        let Some(mut processor) = self.processors.get_mut(&stage).and_then(Option::take) else {
            return Err(ModelError::MissingProcessor(stage.name()));
        };

        self.states.insert(stage, StageState::Establishing);
        self.establishing.push(stage);
        let result = self.run_processor(stage, processor.as_mut());
        self.establishing.pop();
        if let Some(slot) = self.processors.get_mut(&stage) {
            *slot = Some(processor);
        }

        let established = matches!(result, Ok(true));
        let state = if established {
            StageState::Established
        } else {
            StageState::Failed
        };
        self.states.insert(stage, state);
        if established {
            tracing::debug!("stage '{}' established", stage);
        } else {
            tracing::debug!("stage '{}' failed", stage);
        }
        result
    }

    fn run_processor(
        &mut self,
        stage: StageId,
        processor: &mut dyn Processor,
    ) -> Result<bool, ModelError> {
        for required in processor.requires() {
            if !self.establish_stage(required)? {
                tracing::debug!(
                    "stage '{}' not run: required stage '{}' failed",
                    stage,
                    required
                );
                return Ok(false);
            }
        }
        tracing::trace!("running processor for stage '{}'", stage);
        let errors_before = self.diags.error_count();
        let success = processor.run(self);
        Ok(success && self.diags.error_count() == errors_before)
    }

    fn stage_cycle(&mut self, stage: StageId) -> ModelError {
        let mut path: Vec<&'static str> = self
            .establishing
            .iter()
            .skip_while(|s| **s != stage)
            .map(|s| s.name())
            .collect();
        path.push(stage.name());
        let message = format!("Cyclic stage dependency: {}", path.join(" -> "));
        self.diags.report(
            Diagnostic::error(Location::TopLevel, message).with_code(codes::STAGE_CYCLE),
            &[],
        );
        ModelError::StageCycle(path)
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("elements", &self.graph.element_count())
            .field("stages", &self.states)
            .field("config_aspects", &self.config_aspect_names())
            .field("config_version", &self.config_version)
            .field("errors", &self.diags.error_count())
            .finish()
    }
}
