//! Merging of the service configuration into the model.

use crate::base::constants::{CURRENT_CONFIG_VERSION, DEFAULT_CONFIG_VERSION};
use crate::base::{ElementId, Location};
use crate::diagnostics::{Diagnostic, codes};
use crate::model::{Model, Processor, StageId};

use super::{Merged, Resolved};

/// Establishes [`Merged`].
///
/// Applies the config version, resolves the configured APIs to root
/// interfaces, lets every config aspect merge its part of the configuration
/// and finally computes the model scoper from the roots.
#[derive(Debug, Default)]
pub struct Merger;

impl Processor for Merger {
    fn requires(&self) -> Vec<StageId> {
        vec![StageId::of::<Resolved>()]
    }

    fn establishes(&self) -> StageId {
        StageId::of::<Merged>()
    }

    fn run(&mut self, model: &mut Model) -> bool {
        apply_config_version(model);
        let roots = resolve_roots(model);
        model.set_roots(roots);

        let elements = model.graph().source_elements();
        model.for_each_config_aspect(|aspect, model| {
            tracing::trace!("merging aspect '{}'", aspect.name());
            aspect.start_merging(model);
            for &element in &elements {
                aspect.merge(model, element);
            }
            aspect.end_merging(model);
        });

        let scoper = model.build_scoper();
        tracing::debug!(
            "merged: {} root(s), {} reachable element(s)",
            scoper.roots().len(),
            scoper.reachable_count()
        );
        true
    }
}

fn apply_config_version(model: &mut Model) {
    let declared = model.service_config().and_then(|c| c.config_version);
    let version = match declared {
        None => DEFAULT_CONFIG_VERSION,
        Some(version) if version > CURRENT_CONFIG_VERSION => {
            model.report(
                Diagnostic::error(
                    Location::named("config_version"),
                    format!(
                        "config_version {version} is invalid, the latest supported version is {CURRENT_CONFIG_VERSION}."
                    ),
                )
                .with_code(codes::INVALID_CONFIG_VERSION),
            );
            CURRENT_CONFIG_VERSION
        }
        Some(version) => version,
    };
    model.set_config_version(version);
}

/// The configured APIs, or every source file when none are configured.
fn resolve_roots(model: &mut Model) -> Vec<ElementId> {
    let apis: Vec<String> = model
        .service_config()
        .map(|c| c.apis.iter().map(|api| api.name.clone()).collect())
        .unwrap_or_default();

    if apis.is_empty() {
        let graph = model.graph();
        return graph
            .file_ids()
            .filter(|&f| graph.file(f).is_source())
            .map(ElementId::File)
            .collect();
    }

    let mut roots = Vec::new();
    for api in apis {
        let found = model
            .stage::<Resolved>()
            .and_then(|table| table.lookup_interface(&api));
        match found {
            Some(interface) => roots.push(ElementId::Interface(interface)),
            None => {
                model.report(
                    Diagnostic::error(
                        Location::named("apis"),
                        format!("Cannot resolve api '{api}'."),
                    )
                    .with_code(codes::UNRESOLVED_API),
                );
            }
        }
    }
    roots
}
