//! Transform system
//!
//! World-matrix propagation over the node hierarchy, decoupled from [`Rig`]
//! so it only borrows the node map and the root list. Parents are always
//! visited before their children, and a node's world matrix is only
//! recomputed when its own local matrix or an ancestor's world matrix
//! changed.
//!
//! [`Rig`]: crate::scene::Rig

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every node reachable from `roots`.
///
/// Uses an explicit work stack instead of recursion so deep chains (long
/// spines, tails, hair bones) cannot overflow the call stack.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // Work stack: (node handle, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        let children_count = node.children.len();

        // Push children in reverse to keep a stable visit order
        for i in (0..children_count).rev() {
            if let Some(node) = nodes.get(node_handle)
                && let Some(&child_handle) = node.children.get(i)
            {
                stack.push((child_handle, current_world, world_needs_update));
            }
        }
    }
}

/// Updates the subtree rooted at `root_handle`, re-reading the parent's
/// world matrix if the node has one.
///
/// Used to refresh a constraint destination's chain immediately after the
/// constraint wrote its local transform, so downstream readers see a
/// finalized world matrix within the same frame.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root_handle: NodeHandle) {
    let parent_world = if let Some(node) = nodes.get(root_handle) {
        if let Some(parent_handle) = node.parent {
            nodes
                .get(parent_handle)
                .map(|p| p.transform.world_matrix)
                .unwrap_or(Affine3A::IDENTITY)
        } else {
            Affine3A::IDENTITY
        }
    } else {
        return;
    };

    let mut stack: Vec<(NodeHandle, Affine3A)> = vec![(root_handle, parent_world)];

    while let Some((node_handle, parent_world_matrix)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        // Unconditional within a subtree refresh: the caller asked for it
        // because something above or at the root changed.
        node.transform.update_local_matrix();
        let new_world = parent_world_matrix * *node.transform.local_matrix();
        node.transform.set_world_matrix(new_world);

        let children_count = node.children.len();
        for i in (0..children_count).rev() {
            if let Some(node) = nodes.get(node_handle)
                && let Some(&child_handle) = node.children.get(i)
            {
                stack.push((child_handle, new_world));
            }
        }
    }
}
