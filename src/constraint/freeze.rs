use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Per-axis selection of which components a constraint drives, in X-Y-Z
/// order. An axis set to `false` is "frozen out": its delta component is
/// zeroed and the destination keeps its rest value on that axis.
///
/// Serializes as a 3-element bool array (`[true, false, true]`), matching
/// the on-disk constraint schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreezeAxes(pub bool, pub bool, pub bool);

impl FreezeAxes {
    /// All axes driven.
    pub const ALL: Self = Self(true, true, true);
    /// No axis driven; the constraint becomes a no-op.
    pub const NONE: Self = Self(false, false, false);

    /// Zeroes the components of `delta` whose axis is not selected.
    /// In-place, no other side effects.
    pub fn apply(&self, delta: &mut Vec3) {
        if !self.0 {
            delta.x = 0.0;
        }
        if !self.1 {
            delta.y = 0.0;
        }
        if !self.2 {
            delta.z = 0.0;
        }
    }

    /// Whether every axis is selected (the common case, taken as a fast path
    /// by rotation freezing where axis filtering would renormalize).
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 && self.1 && self.2
    }
}

impl Default for FreezeAxes {
    fn default() -> Self {
        Self::ALL
    }
}
