pub mod constraint;
pub mod errors;
pub mod scene;

pub use constraint::{
    Constraint, ConstraintDef, ConstraintKind, ConstraintSet, ConstraintSpace, FreezeAxes,
    PositionConstraint, RotationConstraint,
};
pub use errors::{Result, RigError};
pub use scene::{Node, NodeHandle, Rig, Transform};
