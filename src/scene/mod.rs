//! Scene graph
//!
//! The transform-node hierarchy a rig is built from:
//! - Node: scene node (parent/child links and a transform)
//! - Transform: TRS component with cached local/world matrices
//! - Rig: node container and hierarchy operations
//! - transform_system: decoupled world-matrix propagation

pub mod node;
pub mod rig;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use rig::Rig;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a [`Node`] stored in a rig's node map.
    pub struct NodeHandle;
}
