//! Normalization of reachable elements by the config aspects.

use crate::model::{Model, Processor, StageId};

use super::{Merged, Normalized};

/// Establishes [`Normalized`].
#[derive(Debug, Default)]
pub struct Normalizer;

impl Processor for Normalizer {
    fn requires(&self) -> Vec<StageId> {
        vec![StageId::of::<Merged>()]
    }

    fn establishes(&self) -> StageId {
        StageId::of::<Normalized>()
    }

    fn run(&mut self, model: &mut Model) -> bool {
        let elements = model.reachable_elements();
        model.for_each_config_aspect(|aspect, model| {
            tracing::trace!("normalizing aspect '{}'", aspect.name());
            aspect.start_normalization(model);
            for &element in &elements {
                aspect.normalize(model, element);
            }
            aspect.end_normalization(model);
        });
        true
    }
}
