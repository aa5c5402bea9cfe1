//! Dependency-ordered constraint evaluation.
//!
//! A constraint must read its source's world matrix only after everything
//! that writes it — including other constraints — has run this frame. The
//! order is made explicit: a topological sort over the source→destination
//! graph, computed once when the set is built and reused every frame.

use std::collections::VecDeque;

use slotmap::SlotMap;

use crate::constraint::Constraint;
use crate::errors::{Result, RigError};
use crate::scene::{Node, NodeHandle, transform_system};

/// An ordered collection of constraints evaluated once per frame.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    /// Indices into `constraints`, sources before consumers.
    order: Vec<usize>,
}

impl ConstraintSet {
    /// Builds a set from constraints bound to `nodes`, computing the
    /// evaluation order. Fails if the dependency graph has a cycle.
    pub fn build(
        constraints: Vec<Constraint>,
        nodes: &SlotMap<NodeHandle, Node>,
    ) -> Result<Self> {
        let order = evaluation_order(&constraints, nodes)?;
        log::debug!(
            "built constraint evaluation order for {} constraint(s): {order:?}",
            constraints.len()
        );
        Ok(Self { constraints, order })
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The computed evaluation order (indices into [`Self::constraints`]).
    #[must_use]
    pub fn evaluation_order(&self) -> &[usize] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Captures every constraint's rest-pose baseline.
    ///
    /// Precondition: world matrices reflect the rest pose (call
    /// [`Rig::update_world_matrices`] first) and no constraint has written
    /// to the hierarchy yet.
    ///
    /// [`Rig::update_world_matrices`]: crate::scene::Rig::update_world_matrices
    pub fn set_init_state(&mut self, nodes: &SlotMap<NodeHandle, Node>) {
        for constraint in &mut self.constraints {
            constraint.set_init_state(nodes);
        }
    }

    /// Evaluates all constraints in dependency order.
    ///
    /// After each constraint writes its destination, the destination's
    /// subtree world matrices are refreshed immediately, so a downstream
    /// constraint sourcing from that subtree reads finalized state.
    pub fn update(&mut self, nodes: &mut SlotMap<NodeHandle, Node>) {
        for &index in &self.order {
            let constraint = &mut self.constraints[index];
            constraint.update(nodes);
            transform_system::update_subtree(nodes, constraint.destination());
        }
    }
}

/// Whether `ancestor` is `node` or on `node`'s parent chain.
fn is_ancestor_or_self(
    nodes: &SlotMap<NodeHandle, Node>,
    ancestor: NodeHandle,
    node: NodeHandle,
) -> bool {
    let mut current = Some(node);
    while let Some(handle) = current {
        if handle == ancestor {
            return true;
        }
        current = nodes.get(handle).and_then(Node::parent);
    }
    false
}

/// Kahn's algorithm over "B reads what A wrote": an edge A→B exists when
/// A's destination is B's source or an ancestor of it (writing a node moves
/// every world matrix below it).
fn evaluation_order(
    constraints: &[Constraint],
    nodes: &SlotMap<NodeHandle, Node>,
) -> Result<Vec<usize>> {
    let n = constraints.len();
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];

    for (a, writer) in constraints.iter().enumerate() {
        for (b, reader) in constraints.iter().enumerate() {
            if a == b {
                continue;
            }
            let Some(source) = reader.source() else {
                continue;
            };
            if is_ancestor_or_self(nodes, writer.destination(), source) {
                edges[a].push(b);
                indegree[b] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &next in &edges[index] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if order.len() < n {
        return Err(RigError::CyclicDependency {
            unresolved: n - order.len(),
        });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::PositionConstraint;

    fn chain(nodes: &mut SlotMap<NodeHandle, Node>, len: usize) -> Vec<NodeHandle> {
        let mut handles = Vec::new();
        for i in 0..len {
            let mut node = Node::new();
            if i > 0 {
                node.set_parent(Some(handles[i - 1]));
            }
            let handle = nodes.insert(node);
            if i > 0 {
                nodes.get_mut(handles[i - 1]).unwrap().push_child(handle);
            }
            handles.push(handle);
        }
        handles
    }

    #[test]
    fn dependent_constraint_is_ordered_after_its_writer() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let handles = chain(&mut nodes, 3);
        let extra = nodes.insert(Node::new());

        // Inserted "wrong way round": the consumer first
        let mut consumer = PositionConstraint::new(extra);
        consumer.source = Some(handles[1]);
        let mut writer = PositionConstraint::new(handles[1]);
        writer.source = Some(handles[0]);

        let set = ConstraintSet::build(
            vec![Constraint::Position(consumer), Constraint::Position(writer)],
            &nodes,
        )
        .unwrap();

        assert_eq!(set.evaluation_order(), &[1, 0]);
    }

    #[test]
    fn writing_an_ancestor_orders_before_subtree_readers() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let handles = chain(&mut nodes, 3);
        let extra = nodes.insert(Node::new());

        // Reader sources the leaf; writer moves the chain root above it
        let mut reader = PositionConstraint::new(extra);
        reader.source = Some(handles[2]);
        let mut writer = PositionConstraint::new(handles[0]);
        writer.source = Some(extra);

        // reader depends on writer (root is an ancestor of the leaf), and
        // writer depends on reader (it sources reader's destination): cycle
        let result = ConstraintSet::build(
            vec![Constraint::Position(reader), Constraint::Position(writer)],
            &nodes,
        );
        assert!(matches!(
            result,
            Err(RigError::CyclicDependency { unresolved: 2 })
        ));
    }

    #[test]
    fn unbound_sources_never_create_edges() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();
        let handles = chain(&mut nodes, 2);

        let a = PositionConstraint::new(handles[0]);
        let b = PositionConstraint::new(handles[1]);
        let set = ConstraintSet::build(
            vec![Constraint::Position(a), Constraint::Position(b)],
            &nodes,
        )
        .unwrap();

        assert_eq!(set.evaluation_order(), &[0, 1]);
    }
}
