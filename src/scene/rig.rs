use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform_system;

/// The transform-node hierarchy of an avatar.
///
/// `Rig` is a pure data layer: it owns the node map and the root list, and
/// keeps parent/child links consistent. Constraint evaluation lives outside
/// in [`ConstraintSet`] and borrows the node map per call.
///
/// [`ConstraintSet`]: crate::constraint::ConstraintSet
#[derive(Debug, Default)]
pub struct Rig {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
        }
    }

    /// Adds a node to the rig as a root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Adds a node as a child of `parent_handle`.
    pub fn add_to_parent(&mut self, child: Node, parent_handle: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);

        if let Some(p) = self.nodes.get_mut(parent_handle) {
            p.children.push(handle);
        }
        if let Some(c) = self.nodes.get_mut(handle) {
            c.parent = Some(parent_handle);
        }

        handle
    }

    /// Re-parents `child_handle` under `parent_handle`, detaching it from
    /// its old parent (or the root list) first.
    pub fn attach(&mut self, child_handle: NodeHandle, parent_handle: NodeHandle) {
        if child_handle == parent_handle {
            log::warn!("Cannot attach node to itself!");
            return;
        }

        // 1. Detach from old
        let old_parent = self.nodes.get(child_handle).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child_handle)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child_handle) {
            self.root_nodes.remove(i);
        }

        // 2. Attach to new
        if let Some(p) = self.nodes.get_mut(parent_handle) {
            p.children.push(child_handle);
        } else {
            log::error!("Parent node not found during attach!");
            self.root_nodes.push(child_handle);
            return;
        }

        // 3. Update child
        if let Some(c) = self.nodes.get_mut(child_handle) {
            c.parent = Some(parent_handle);
            c.transform.mark_dirty(); // parent chain changed, matrix must refresh
        }
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// World position of a node, as of the last matrix update.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<glam::Vec3> {
        self.nodes
            .get(handle)
            .map(|n| n.transform.world_matrix.translation.into())
    }

    /// Updates world matrices for the whole hierarchy.
    ///
    /// Must run before constraints are bound ([`ConstraintSet::set_init_state`])
    /// or evaluated, so sources expose current world matrices.
    ///
    /// [`ConstraintSet::set_init_state`]: crate::constraint::ConstraintSet::set_init_state
    pub fn update_world_matrices(&mut self) {
        transform_system::update_hierarchy(&mut self.nodes, &self.root_nodes);
    }

    /// Updates the subtree rooted at `handle` only.
    pub fn update_subtree(&mut self, handle: NodeHandle) {
        transform_system::update_subtree(&mut self.nodes, handle);
    }

    /// Parent-chain world matrix of a node (identity for roots).
    #[must_use]
    pub fn parent_world_matrix(&self, handle: NodeHandle) -> Affine3A {
        self.nodes
            .get(handle)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
            .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix)
    }
}
