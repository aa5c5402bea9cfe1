//! Coordinate-space selection and conversion.
//!
//! A constraint evaluates each side in either the node's local frame
//! (relative to its parent) or in model space (relative to the rig root,
//! i.e. the accumulated world matrix). Model-space deltas applied to a
//! destination must first be re-expressed in the destination's local frame;
//! [`model_to_local`] provides the matrix for that reprojection.

use glam::{Affine3A, Quat, Vec3};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::constraint::decompose;
use crate::scene::{Node, NodeHandle};

/// Coordinate space a constraint side is evaluated in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintSpace {
    /// Relative to the node's parent.
    Local,
    /// Relative to the rig root (accumulated world matrix).
    #[default]
    Model,
}

/// Matrix re-expressing a model-space delta in `handle`'s local frame:
/// the inverse of the parent chain's accumulated world transform with its
/// translation stripped (a delta is a direction, not a point).
///
/// A node without a parent needs no reprojection — the conversion
/// degenerates to identity. Requires the parent's world matrix to be
/// current.
#[must_use]
pub fn model_to_local(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Affine3A {
    let Some(parent_handle) = nodes.get(handle).and_then(|n| n.parent) else {
        return Affine3A::IDENTITY;
    };
    let Some(parent) = nodes.get(parent_handle) else {
        return Affine3A::IDENTITY;
    };

    let mut inv = parent.transform.world_matrix.inverse();
    inv.translation = glam::Vec3A::ZERO;
    inv
}

/// Evaluates a node's position in the given space, writing into `out`.
/// Model space reads the cached world matrix and requires it to be current.
pub fn position_in_space(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    space: ConstraintSpace,
    out: &mut Vec3,
) {
    let Some(node) = nodes.get(handle) else {
        *out = Vec3::ZERO;
        return;
    };
    match space {
        ConstraintSpace::Local => *out = node.transform.position,
        ConstraintSpace::Model => decompose::translation_of(&node.transform.world_matrix, out),
    }
}

/// Evaluates a node's rotation in the given space, writing into `out`.
pub fn rotation_in_space(
    nodes: &SlotMap<NodeHandle, Node>,
    handle: NodeHandle,
    space: ConstraintSpace,
    out: &mut Quat,
) {
    let Some(node) = nodes.get(handle) else {
        *out = Quat::IDENTITY;
        return;
    };
    match space {
        ConstraintSpace::Local => *out = node.transform.rotation,
        ConstraintSpace::Model => decompose::rotation_of(&node.transform.world_matrix, out),
    }
}
