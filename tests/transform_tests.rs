//! Transform and scene hierarchy tests
//!
//! Tests for:
//! - Transform TRS operations and dirty checking
//! - Hierarchical world-matrix propagation
//! - Subtree refresh after local edits
//! - Rig attach/detach semantics

use glam::{Mat4, Quat, Vec3};
use rigkit::scene::node::Node;
use rigkit::scene::transform::Transform;
use rigkit::scene::{NodeHandle, Rig};
use std::f32::consts::FRAC_PI_2;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

/// Chain of `length` nodes, each translated +1 in X relative to its parent.
fn create_chain(length: usize) -> (Rig, Vec<NodeHandle>) {
    let mut rig = Rig::new();
    let mut handles: Vec<NodeHandle> = Vec::new();
    for i in 0..length {
        let mut node = Node::new();
        node.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let handle = if i == 0 {
            rig.add_node(node)
        } else {
            rig.add_to_parent(node, handles[i - 1])
        };
        handles.push(handle);
    }
    (rig, handles)
}

// ============================================================================
// Transform Unit Tests
// ============================================================================

#[test]
fn transform_default_is_identity() {
    let t = Transform::new();
    assert_eq!(t.position, Vec3::ZERO);
    assert_eq!(t.rotation, Quat::IDENTITY);
    assert_eq!(t.scale, Vec3::ONE);
}

#[test]
fn transform_update_local_matrix_dirty_check() {
    let mut t = Transform::new();

    // First call should always return true (force_update starts true)
    assert!(t.update_local_matrix());

    // Second call without changes should return false
    assert!(!t.update_local_matrix());

    // Changing position should trigger a new update
    t.position = Vec3::new(1.0, 2.0, 3.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    // Changing rotation
    t.rotation = Quat::from_rotation_y(FRAC_PI_2);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());

    // Changing scale
    t.scale = Vec3::splat(2.0);
    assert!(t.update_local_matrix());
    assert!(!t.update_local_matrix());
}

#[test]
fn transform_local_matrix_reflects_trs() {
    let mut t = Transform::new();
    t.position = Vec3::new(10.0, 20.0, 30.0);
    t.scale = Vec3::splat(2.0);
    t.update_local_matrix();

    let mat = Mat4::from(*t.local_matrix());
    let translation = mat.w_axis.truncate();
    assert!(vec3_approx(translation, Vec3::new(10.0, 20.0, 30.0)));
}

#[test]
fn transform_mark_dirty_forces_update() {
    let mut t = Transform::new();
    t.update_local_matrix();
    assert!(!t.update_local_matrix());

    t.mark_dirty();
    assert!(t.update_local_matrix());
}

// ============================================================================
// Hierarchy Tests
// ============================================================================

#[test]
fn hierarchy_chain_world_positions() {
    let (mut rig, handles) = create_chain(5);

    rig.update_world_matrices();

    // Node[i] should have world X = i+1 (cumulative translations)
    for (i, &handle) in handles.iter().enumerate() {
        let world_pos = rig.world_position(handle).unwrap();
        let expected_x = (i + 1) as f32;
        assert!(
            approx_eq(world_pos.x, expected_x),
            "Node {i}: expected x={expected_x}, got x={}",
            world_pos.x
        );
    }
}

#[test]
fn hierarchy_with_rotation_and_scale() {
    let mut rig = Rig::new();

    // Parent: translate (5,0,0), rotate 90° around Y, scale 2x
    let mut parent = Node::new();
    parent.transform.position = Vec3::new(5.0, 0.0, 0.0);
    parent.transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
    parent.transform.scale = Vec3::splat(2.0);
    let parent_h = rig.add_node(parent);

    // Child: translate (1,0,0) in local space
    let mut child = Node::new();
    child.transform.position = Vec3::new(1.0, 0.0, 0.0);
    let child_h = rig.add_to_parent(child, parent_h);

    rig.update_world_matrices();

    // Child local (1,0,0) in parent space:
    //   After parent's rotation (90° Y): (1,0,0) → (0,0,-1)
    //   After parent's scale (2x): (0,0,-2)
    //   After parent's translation: (5,0,-2)
    let child_world = rig.world_position(child_h).unwrap();
    assert!(vec3_approx(child_world, Vec3::new(5.0, 0.0, -2.0)));
}

#[test]
fn hierarchy_subtree_update() {
    let (mut rig, handles) = create_chain(5);

    rig.update_world_matrices();

    // Move node[2], refresh only its subtree
    rig.get_node_mut(handles[2]).unwrap().transform.position = Vec3::new(10.0, 0.0, 0.0);
    rig.update_subtree(handles[2]);

    // Node[2] world X = parent(2) + 10 = 12
    let node2_world = rig.world_position(handles[2]).unwrap();
    assert!(
        approx_eq(node2_world.x, 12.0),
        "expected 12.0, got {}",
        node2_world.x
    );

    // Node[3] world X = node2(12) + 1 = 13
    let node3_world = rig.world_position(handles[3]).unwrap();
    assert!(
        approx_eq(node3_world.x, 13.0),
        "expected 13.0, got {}",
        node3_world.x
    );

    // Node[1] above the edited subtree is untouched
    let node1_world = rig.world_position(handles[1]).unwrap();
    assert!(approx_eq(node1_world.x, 2.0));
}

#[test]
fn identity_hierarchy_produces_identity_world() {
    let mut rig = Rig::new();
    let root = rig.add_node(Node::new());
    let child = rig.add_to_parent(Node::new(), root);

    rig.update_world_matrices();

    assert!(vec3_approx(rig.world_position(child).unwrap(), Vec3::ZERO));
    assert!(vec3_approx(rig.world_position(root).unwrap(), Vec3::ZERO));
}

#[test]
fn deeply_nested_hierarchy_no_stack_overflow() {
    let depth = 500; // Explicit-stack traversal must handle this
    let (mut rig, handles) = create_chain(depth);

    rig.update_world_matrices();

    let last = rig.world_position(*handles.last().unwrap()).unwrap();
    let expected = depth as f32;
    assert!(
        approx_eq(last.x, expected),
        "expected {expected}, got {}",
        last.x
    );
}

// ============================================================================
// Rig Attach Tests
// ============================================================================

#[test]
fn attach_moves_node_under_new_parent() {
    let mut rig = Rig::new();

    let mut a = Node::new();
    a.transform.position = Vec3::new(3.0, 0.0, 0.0);
    let a_h = rig.add_node(a);

    let mut b = Node::new();
    b.transform.position = Vec3::new(0.0, 1.0, 0.0);
    let b_h = rig.add_node(b);

    assert_eq!(rig.root_nodes.len(), 2);

    rig.attach(b_h, a_h);
    assert_eq!(rig.root_nodes.len(), 1);
    assert_eq!(rig.get_node(b_h).unwrap().parent(), Some(a_h));
    assert_eq!(rig.get_node(a_h).unwrap().children(), &[b_h]);

    rig.update_world_matrices();
    let b_world = rig.world_position(b_h).unwrap();
    assert!(vec3_approx(b_world, Vec3::new(3.0, 1.0, 0.0)));
}

#[test]
fn attach_to_self_is_rejected() {
    let mut rig = Rig::new();
    let a_h = rig.add_node(Node::new());

    rig.attach(a_h, a_h);

    assert_eq!(rig.get_node(a_h).unwrap().parent(), None);
    assert_eq!(rig.root_nodes, vec![a_h]);
}

#[test]
fn reattach_detaches_from_old_parent() {
    let mut rig = Rig::new();
    let p1 = rig.add_node(Node::new());
    let p2 = rig.add_node(Node::new());
    let child = rig.add_to_parent(Node::new(), p1);

    rig.attach(child, p2);

    assert!(rig.get_node(p1).unwrap().children().is_empty());
    assert_eq!(rig.get_node(p2).unwrap().children(), &[child]);
    assert_eq!(rig.get_node(child).unwrap().parent(), Some(p2));
}
