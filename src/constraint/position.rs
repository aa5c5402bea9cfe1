use glam::Vec3;
use slotmap::SlotMap;

use crate::constraint::freeze::FreezeAxes;
use crate::constraint::space::{self, ConstraintSpace};
use crate::scene::{Node, NodeHandle};

/// Couples a destination node's local position to a source node's position.
///
/// At bind time the constraint records the destination's rest position and
/// the source's evaluated rest position. Every frame it recomputes the
/// source's current position, takes the delta against the recorded rest
/// value, freezes and weights it, and writes `rest + delta` into the
/// destination — a full overwrite relative to rest, so repeated updates
/// never accumulate drift.
#[derive(Debug, Clone)]
pub struct PositionConstraint {
    pub destination: NodeHandle,
    /// Source node; `None` makes the constraint a no-op (zero baseline).
    pub source: Option<NodeHandle>,
    pub source_space: ConstraintSpace,
    pub destination_space: ConstraintSpace,
    pub freeze_axes: FreezeAxes,
    /// Scales the applied delta; expected in [0, 1] but not re-validated
    /// per frame.
    pub weight: f32,

    init_destination: Vec3,
    init_source: Vec3,
}

impl PositionConstraint {
    #[must_use]
    pub fn new(destination: NodeHandle) -> Self {
        Self {
            destination,
            source: None,
            source_space: ConstraintSpace::default(),
            destination_space: ConstraintSpace::default(),
            freeze_axes: FreezeAxes::ALL,
            weight: 1.0,
            init_destination: Vec3::ZERO,
            init_source: Vec3::ZERO,
        }
    }

    /// Destination rest position captured at bind time.
    #[inline]
    #[must_use]
    pub fn init_destination(&self) -> Vec3 {
        self.init_destination
    }

    /// Captures the rest-pose baseline.
    ///
    /// Must be called exactly once before any [`Self::update`], while the
    /// hierarchy still reflects the rest pose (world matrices current, no
    /// constraint has written yet). Does not mutate any node.
    pub fn set_init_state(&mut self, nodes: &SlotMap<NodeHandle, Node>) {
        self.init_destination = nodes
            .get(self.destination)
            .map_or(Vec3::ZERO, |n| n.transform.position);

        self.init_source = Vec3::ZERO;
        if let Some(source) = self.source {
            space::position_in_space(nodes, source, self.source_space, &mut self.init_source);
        }
    }

    /// Recomputes the source delta and writes the destination's local
    /// position. Idempotent within a frame: unchanged source state always
    /// produces the same destination position.
    pub fn update(&mut self, nodes: &mut SlotMap<NodeHandle, Node>) {
        // 1. Current source position in source space (zero if unbound)
        let mut current = Vec3::ZERO;
        if let Some(source) = self.source {
            space::position_in_space(nodes, source, self.source_space, &mut current);
        }

        // 2-4. Delta from rest, frozen and weighted
        let mut delta = current - self.init_source;
        self.freeze_axes.apply(&mut delta);
        delta *= self.weight;

        // 5. A model-space delta must be re-expressed in the destination's
        //    local frame before composing onto the local rest position
        if self.destination_space == ConstraintSpace::Model {
            delta = space::model_to_local(nodes, self.destination).transform_vector3(delta);
        }

        // 6-7. Overwrite relative to rest and flag the matrix stale
        if let Some(node) = nodes.get_mut(self.destination) {
            node.transform.position = self.init_destination + delta;
            node.transform.mark_dirty();
        }
    }
}
