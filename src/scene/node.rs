use crate::scene::NodeHandle;
use crate::scene::transform::Transform;
use glam::Affine3A;

/// A minimal scene node: hierarchy links plus a transform.
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: optional handle to the parent node (`None` for roots)
/// - `children`: list of child node handles
///
/// Everything else a rig attaches to a node (constraints, meshes, ...) lives
/// outside the node itself and refers to it by handle, keeping the per-frame
/// traversal data small.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    /// Transform component (hot data accessed every frame)
    pub transform: Transform,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
        }
    }

    /// Returns the parent node handle, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Returns a read-only slice of child node handles.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Sets the parent of this node. Prefer [`Rig::attach`] which keeps both
    /// sides of the relationship in sync; this is exposed for low-level
    /// construction outside of a [`Rig`].
    ///
    /// [`Rig`]: crate::scene::Rig
    /// [`Rig::attach`]: crate::scene::Rig::attach
    #[inline]
    pub fn set_parent(&mut self, parent: Option<NodeHandle>) {
        self.parent = parent;
    }

    /// Appends a child handle. Prefer [`Rig::attach`]; see [`Self::set_parent`].
    ///
    /// [`Rig::attach`]: crate::scene::Rig::attach
    #[inline]
    pub fn push_child(&mut self, child: NodeHandle) {
        self.children.push(child);
    }

    /// Returns a reference to the world transformation matrix, as of the
    /// last hierarchy update.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}
