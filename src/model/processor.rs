//! The processor protocol.

use super::{Model, StageId};

/// A pass that establishes one stage.
///
/// The model runs a processor at most once, after every stage it requires has
/// been established, and marks its stage failed if `run` returns `false` or
/// reports an error.
pub trait Processor {
    /// Stages to establish first, in order.
    fn requires(&self) -> Vec<StageId>;

    fn establishes(&self) -> StageId;

    fn run(&mut self, model: &mut Model) -> bool;
}
