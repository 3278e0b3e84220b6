//! Stage identifiers and per-stage state.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::graph::AttributeKey;

/// A unit of completed analysis.
///
/// The associated `Value` is the payload a stage attaches to the model when
/// established; marker stages use `()`.
pub trait Stage: AttributeKey {}

/// Type-erased stage identity, used to key processors and states.
#[derive(Clone, Copy)]
pub struct StageId {
    type_id: TypeId,
    name: &'static str,
}

impl StageId {
    pub fn of<S: Stage>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            name: S::NAME,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for StageId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StageId {}

impl Hash for StageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage({})", self.name)
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lifecycle of a stage within one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageState {
    #[default]
    Unestablished,
    /// Its processor's requirements are being established, or it is running.
    Establishing,
    Established,
    Failed,
}
