//! Constraint evaluation core
//!
//! Couples a destination node's transform to a source node's transform,
//! honoring per-axis freezing, interpolation weight, and coordinate-space
//! conversion:
//! - space: local/model space selection and delta reprojection
//! - decompose: translation/rotation extraction from composed matrices
//! - freeze: per-axis delta masking
//! - position / rotation: the two concrete constraint variants
//! - set: dependency-ordered per-frame evaluation
//! - schema: serialized configuration shape

pub mod decompose;
pub mod freeze;
pub mod position;
pub mod rotation;
pub mod schema;
pub mod set;
pub mod space;

pub use freeze::FreezeAxes;
pub use position::PositionConstraint;
pub use rotation::RotationConstraint;
pub use schema::{ConstraintDef, ConstraintKind, constraint_defs_from_json};
pub use set::ConstraintSet;
pub use space::ConstraintSpace;

use slotmap::SlotMap;

use crate::scene::{Node, NodeHandle};

/// A single constraint binding one destination node to one source node.
///
/// Flat enum dispatch over the two variants; both share the same
/// init/update lifecycle and differ only in the value domain (vectors vs.
/// quaternions).
#[derive(Debug, Clone)]
pub enum Constraint {
    Position(PositionConstraint),
    Rotation(RotationConstraint),
}

impl Constraint {
    /// The node this constraint writes to.
    #[must_use]
    pub fn destination(&self) -> NodeHandle {
        match self {
            Self::Position(c) => c.destination,
            Self::Rotation(c) => c.destination,
        }
    }

    /// The node this constraint reads from, if bound.
    #[must_use]
    pub fn source(&self) -> Option<NodeHandle> {
        match self {
            Self::Position(c) => c.source,
            Self::Rotation(c) => c.source,
        }
    }

    /// Captures the rest-pose baseline; see
    /// [`PositionConstraint::set_init_state`].
    pub fn set_init_state(&mut self, nodes: &SlotMap<NodeHandle, Node>) {
        match self {
            Self::Position(c) => c.set_init_state(nodes),
            Self::Rotation(c) => c.set_init_state(nodes),
        }
    }

    /// Per-frame evaluation; see [`PositionConstraint::update`].
    pub fn update(&mut self, nodes: &mut SlotMap<NodeHandle, Node>) {
        match self {
            Self::Position(c) => c.update(nodes),
            Self::Rotation(c) => c.update(nodes),
        }
    }
}
