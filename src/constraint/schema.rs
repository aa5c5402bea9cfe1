//! Serialized constraint configuration.
//!
//! The on-disk shape a constraint is constructed from, as it appears in a
//! loaded rig definition: node references are indices into the definition's
//! node list, spaces are `"local"`/`"model"` strings, `freezeAxes` is a
//! 3-element bool array, and `weight` defaults to 1.
//!
//! ```json
//! {
//!   "kind": "position",
//!   "destination": 2,
//!   "source": 0,
//!   "sourceSpace": "model",
//!   "destinationSpace": "local",
//!   "freezeAxes": [false, true, false],
//!   "weight": 0.5
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::constraint::Constraint;
use crate::constraint::freeze::FreezeAxes;
use crate::constraint::position::PositionConstraint;
use crate::constraint::rotation::RotationConstraint;
use crate::constraint::space::ConstraintSpace;
use crate::errors::{Result, RigError};
use crate::scene::NodeHandle;

/// Which transform channel a constraint definition drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Position,
    Rotation,
}

/// A constraint as read from a rig definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDef {
    pub kind: ConstraintKind,
    /// Index of the destination node in the definition's node list.
    pub destination: usize,
    /// Index of the source node; absent means a no-op constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<usize>,
    #[serde(default)]
    pub source_space: ConstraintSpace,
    #[serde(default)]
    pub destination_space: ConstraintSpace,
    #[serde(default)]
    pub freeze_axes: FreezeAxes,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl ConstraintDef {
    /// Resolves node indices against the loader's index→handle table and
    /// constructs the constraint.
    ///
    /// Out-of-bounds indices are errors; a weight outside [0, 1] is kept
    /// as-is but logged, since the evaluation core does not re-validate it
    /// per frame.
    pub fn instantiate(&self, node_table: &[NodeHandle]) -> Result<Constraint> {
        let destination = resolve(self.destination, node_table)?;
        let source = self
            .source
            .map(|index| resolve(index, node_table))
            .transpose()?;

        if !(0.0..=1.0).contains(&self.weight) {
            log::warn!(
                "constraint weight {} outside [0, 1]; applying as-is",
                self.weight
            );
        }

        Ok(match self.kind {
            ConstraintKind::Position => {
                let mut c = PositionConstraint::new(destination);
                c.source = source;
                c.source_space = self.source_space;
                c.destination_space = self.destination_space;
                c.freeze_axes = self.freeze_axes;
                c.weight = self.weight;
                Constraint::Position(c)
            }
            ConstraintKind::Rotation => {
                let mut c = RotationConstraint::new(destination);
                c.source = source;
                c.source_space = self.source_space;
                c.destination_space = self.destination_space;
                c.freeze_axes = self.freeze_axes;
                c.weight = self.weight;
                Constraint::Rotation(c)
            }
        })
    }
}

fn resolve(index: usize, node_table: &[NodeHandle]) -> Result<NodeHandle> {
    node_table
        .get(index)
        .copied()
        .ok_or(RigError::NodeIndexOutOfBounds {
            index,
            len: node_table.len(),
        })
}

/// Parses a JSON array of constraint definitions.
pub fn constraint_defs_from_json(json: &str) -> Result<Vec<ConstraintDef>> {
    Ok(serde_json::from_str(json)?)
}
