//! Matrix decomposition helpers.
//!
//! Constraints read source state from composed matrices every frame, so
//! these write into caller-supplied outputs instead of returning fresh
//! values through intermediate structs.
//!
//! Scale handling: translation extraction is a plain column read and is
//! unaffected by scale. Rotation extraction normalizes the basis axes to
//! strip (possibly non-uniform) scale before the matrix-to-quaternion
//! conversion; shear introduced by non-uniform scale in a parent chain is
//! not preserved. A degenerate axis (zero scale) yields identity rotation.

use glam::{Affine3A, Mat3, Quat, Vec3};

/// Extracts the translation component of `mat` into `out`.
#[inline]
pub fn translation_of(mat: &Affine3A, out: &mut Vec3) {
    *out = mat.translation.into();
}

/// Extracts the rotation component of `mat` into `out`.
pub fn rotation_of(mat: &Affine3A, out: &mut Quat) {
    let x_axis = Vec3::from(mat.matrix3.x_axis);
    let y_axis = Vec3::from(mat.matrix3.y_axis);
    let z_axis = Vec3::from(mat.matrix3.z_axis);

    let lx = x_axis.length();
    let ly = y_axis.length();
    let lz = z_axis.length();

    if lx < f32::EPSILON || ly < f32::EPSILON || lz < f32::EPSILON {
        *out = Quat::IDENTITY;
        return;
    }

    let basis = Mat3::from_cols(x_axis / lx, y_axis / ly, z_axis / lz);
    *out = Quat::from_mat3(&basis).normalize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn translation_is_column_read() {
        let mat = Affine3A::from_translation(Vec3::new(1.0, -2.0, 3.0));
        let mut out = Vec3::ZERO;
        translation_of(&mat, &mut out);
        assert_eq!(out, Vec3::new(1.0, -2.0, 3.0));
    }

    #[test]
    fn rotation_survives_nonuniform_scale() {
        let rot = Quat::from_rotation_y(FRAC_PI_2);
        let mat = Affine3A::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 3.0),
            rot,
            Vec3::new(4.0, 5.0, 6.0),
        );
        let mut out = Quat::IDENTITY;
        rotation_of(&mat, &mut out);
        assert!(out.angle_between(rot) < 1e-4);
    }

    #[test]
    fn degenerate_scale_falls_back_to_identity() {
        let mat = Affine3A::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let mut out = Quat::from_rotation_x(1.0);
        rotation_of(&mat, &mut out);
        assert_eq!(out, Quat::IDENTITY);
    }
}
