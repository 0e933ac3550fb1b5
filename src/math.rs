//! 2-D vector helpers on top of [`glam::Vec2`].
//!
//! Addition, subtraction, scaling, dot product, norm and distance come
//! straight from `glam`; this module only adds the handful of operations the
//! raycaster needs that either carry a failure mode or use the engine's sign
//! conventions (screen Y grows downward, so "orthogonal" turns clockwise).

use glam::Vec2;
use thiserror::Error;

/// Geometry precondition violations.  Both are fatal to the frame being
/// rendered – see [`crate::engine::RenderError`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeomError {
    /// `normalize` was asked to scale a zero-length vector.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// `differential` was asked for the slope of a perfectly vertical vector.
    #[error("slope of a vertical vector (v.x == 0) is undefined")]
    DivisionByZero,
}

/// Unit vector in the direction of `v`.
pub fn normalize(v: Vec2) -> Result<Vec2, GeomError> {
    v.try_normalize().ok_or(GeomError::DegenerateVector)
}

/// Slope `dy/dx` of `v`.
///
/// Callers must guarantee the vector is never perfectly vertical in
/// grid space; the FOV geometry of the wall pass avoids this in practice,
/// but it is a precondition, not something silently mapped to NaN.
pub fn differential(v: Vec2) -> Result<f32, GeomError> {
    if v.x == 0.0 {
        return Err(GeomError::DivisionByZero);
    }
    Ok(v.y / v.x)
}

/// Rotate `v` by `angle` radians.
///
/// Positive angles turn clockwise in world space (Y axis points down, as on
/// screen), so this is the transpose of the usual CCW rotation matrix.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x + s * v.y, -s * v.x + c * v.y)
}

/// Vector orthogonal to `v`, a quarter turn clockwise: `(y, -x)`.
pub fn orthogonal(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Cosine of the angle between `a` and `b`.
///
/// Neither vector has to be unit length; both must be non-zero.
pub fn cos_between(a: Vec2, b: Vec2) -> Result<f32, GeomError> {
    let lengths = a.length() * b.length();
    if lengths == 0.0 {
        return Err(GeomError::DegenerateVector);
    }
    Ok(a.dot(b) / lengths)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn normalize_rejects_zero() {
        assert_eq!(normalize(Vec2::ZERO).unwrap_err(), GeomError::DegenerateVector);
        let n = normalize(vec2(3.0, 4.0)).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn differential_rejects_vertical() {
        assert_eq!(
            differential(vec2(0.0, 1.0)).unwrap_err(),
            GeomError::DivisionByZero
        );
        assert!((differential(vec2(2.0, 1.0)).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn rotate_quarter_turn_is_orthogonal() {
        let v = vec2(1.0, 0.0);
        let r = rotate(v, FRAC_PI_2);
        assert!((r - orthogonal(v)).length() < 1e-6);
        assert!((r - vec2(0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_preserves_length() {
        let v = vec2(3.0, -7.0);
        assert!((rotate(v, 1.234).length() - v.length()).abs() < 1e-4);
    }

    #[test]
    fn cos_between_is_scale_invariant() {
        let a = vec2(1.0, 0.0);
        let b = vec2(5.0, 5.0);
        let c = cos_between(a, b).unwrap();
        assert!((c - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-5);
        assert!((c - cos_between(a * 10.0, b).unwrap()).abs() < 1e-6);
        assert_eq!(
            cos_between(Vec2::ZERO, b).unwrap_err(),
            GeomError::DegenerateVector
        );
    }
}
