use glam::Quat;
use slotmap::SlotMap;

use crate::constraint::decompose;
use crate::constraint::freeze::FreezeAxes;
use crate::constraint::space::{self, ConstraintSpace};
use crate::scene::{Node, NodeHandle};

/// Couples a destination node's local rotation to a source node's rotation.
///
/// Mirrors [`PositionConstraint`], with rotation-specific math: the delta is
/// the relative rotation `current × init⁻¹`, axis freezing filters the
/// delta's rotation axis (X-Y-Z order), and weighting scales the rotation
/// angle — rotations are not a vector space, so the delta is decomposed to
/// axis-angle, scaled, and recomposed rather than multiplied through.
///
/// [`PositionConstraint`]: crate::constraint::PositionConstraint
#[derive(Debug, Clone)]
pub struct RotationConstraint {
    pub destination: NodeHandle,
    /// Source node; `None` makes the constraint a no-op (identity baseline).
    pub source: Option<NodeHandle>,
    pub source_space: ConstraintSpace,
    pub destination_space: ConstraintSpace,
    pub freeze_axes: FreezeAxes,
    pub weight: f32,

    init_destination: Quat,
    init_source: Quat,
}

impl RotationConstraint {
    #[must_use]
    pub fn new(destination: NodeHandle) -> Self {
        Self {
            destination,
            source: None,
            source_space: ConstraintSpace::default(),
            destination_space: ConstraintSpace::default(),
            freeze_axes: FreezeAxes::ALL,
            weight: 1.0,
            init_destination: Quat::IDENTITY,
            init_source: Quat::IDENTITY,
        }
    }

    /// Destination rest rotation captured at bind time.
    #[inline]
    #[must_use]
    pub fn init_destination(&self) -> Quat {
        self.init_destination
    }

    /// Captures the rest-pose baseline. Same contract as
    /// [`PositionConstraint::set_init_state`].
    ///
    /// [`PositionConstraint::set_init_state`]: crate::constraint::PositionConstraint::set_init_state
    pub fn set_init_state(&mut self, nodes: &SlotMap<NodeHandle, Node>) {
        self.init_destination = nodes
            .get(self.destination)
            .map_or(Quat::IDENTITY, |n| n.transform.rotation);

        self.init_source = Quat::IDENTITY;
        if let Some(source) = self.source {
            space::rotation_in_space(nodes, source, self.source_space, &mut self.init_source);
        }
    }

    /// Recomputes the relative source rotation and writes the destination's
    /// local rotation as `delta × rest`. Full overwrite relative to rest,
    /// like the position variant.
    pub fn update(&mut self, nodes: &mut SlotMap<NodeHandle, Node>) {
        let mut current = Quat::IDENTITY;
        if let Some(source) = self.source {
            space::rotation_in_space(nodes, source, self.source_space, &mut current);
        }

        let delta = current * self.init_source.inverse();
        let mut delta = shape_delta(delta, self.freeze_axes, self.weight);

        // Re-express a model-space delta in the destination's local frame by
        // conjugating with the inverse parent rotation
        if self.destination_space == ConstraintSpace::Model {
            let conv = space::model_to_local(nodes, self.destination);
            let mut parent_inv = Quat::IDENTITY;
            decompose::rotation_of(&conv, &mut parent_inv);
            delta = parent_inv * delta * parent_inv.inverse();
        }

        if let Some(node) = nodes.get_mut(self.destination) {
            node.transform.rotation = (delta * self.init_destination).normalize();
            node.transform.mark_dirty();
        }
    }
}

/// Applies axis freezing and weight to a delta rotation.
///
/// The delta is normalized to its shortest arc, decomposed to axis-angle,
/// the axis is filtered per the freeze mask (a fully frozen-out axis yields
/// identity), the angle is scaled by the weight, and the result recomposed.
fn shape_delta(delta: Quat, freeze_axes: FreezeAxes, weight: f32) -> Quat {
    let delta = if delta.w < 0.0 { -delta } else { delta };

    let (mut axis, angle) = delta.to_axis_angle();
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }

    if !freeze_axes.is_all() {
        freeze_axes.apply(&mut axis);
        if axis.length_squared() < 1e-12 {
            return Quat::IDENTITY;
        }
        axis = axis.normalize();
    }

    Quat::from_axis_angle(axis, angle * weight).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn shape_delta_identity_stays_identity() {
        let out = shape_delta(Quat::IDENTITY, FreezeAxes::ALL, 1.0);
        assert_eq!(out, Quat::IDENTITY);
    }

    #[test]
    fn shape_delta_scales_angle_by_weight() {
        let delta = Quat::from_rotation_y(FRAC_PI_2);
        let out = shape_delta(delta, FreezeAxes::ALL, 0.5);
        let expected = Quat::from_rotation_y(FRAC_PI_2 * 0.5);
        assert!(out.angle_between(expected) < 1e-5);
    }

    #[test]
    fn shape_delta_frozen_axis_yields_identity() {
        let delta = Quat::from_rotation_y(FRAC_PI_2);
        // Y is the rotation axis; freezing it out leaves nothing to rotate
        let out = shape_delta(delta, FreezeAxes(true, false, true), 1.0);
        assert!(out.angle_between(Quat::IDENTITY) < 1e-5);
    }

    #[test]
    fn shape_delta_filters_axis_components() {
        // Rotation about a diagonal XY axis, with X frozen out: only the Y
        // component of the axis survives
        let axis = Vec3::new(1.0, 1.0, 0.0).normalize();
        let delta = Quat::from_axis_angle(axis, 1.0);
        let out = shape_delta(delta, FreezeAxes(false, true, false), 1.0);
        let (out_axis, out_angle) = out.to_axis_angle();
        assert!((out_axis - Vec3::Y).length() < 1e-5);
        assert!((out_angle - 1.0).abs() < 1e-5);
    }
}
