//! Error Types
//!
//! All failures in this crate surface at construction or bind time:
//! resolving a constraint definition against a node table, or building the
//! per-frame evaluation order. Per-frame [`Constraint::update`] calls never
//! fail — an unbound source contributes a zero baseline and a root-level
//! destination skips space conversion, both by contract.
//!
//! [`Constraint::update`]: crate::constraint::Constraint::update

use thiserror::Error;

/// The error type for rig construction and constraint binding.
#[derive(Error, Debug)]
pub enum RigError {
    /// A constraint definition referenced a node index outside the
    /// loader-provided node table.
    #[error("node index out of bounds: {index} (table has {len} nodes)")]
    NodeIndexOutOfBounds {
        /// The invalid index from the definition
        index: usize,
        /// Length of the node table
        len: usize,
    },

    /// The source→destination dependency graph of a constraint set contains
    /// a cycle, so no valid evaluation order exists.
    #[error("cyclic constraint dependency: {unresolved} constraint(s) could not be ordered")]
    CyclicDependency {
        /// Number of constraints left unordered after the topological sort
        unresolved: usize,
    },

    /// JSON parsing error while reading constraint definitions.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
