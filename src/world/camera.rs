//! Player view-point in world space.

use glam::Vec2;

use crate::math::{self, GeomError};

/// Position plus facing on the grid plane.
///
/// * Only heading is simulated – the engine never tilts up/down.
/// * `dir` need not be unit length; rotation preserves whatever length the
///   constructor was given, so it is non-zero for the camera's lifetime.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2,
    dir: Vec2,
    fov: f32, // horizontal FoV, radians
}

impl Camera {
    /// Create a camera at `pos` facing `dir`.  Fails on a zero `dir`.
    pub fn new(pos: Vec2, dir: Vec2, fov: f32) -> Result<Self, GeomError> {
        if dir == Vec2::ZERO {
            return Err(GeomError::DegenerateVector);
        }
        Ok(Self { pos, dir, fov })
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Camera-plane vector: orthogonal to the facing direction, scaled to
    /// half the field-of-view width at unit distance.
    ///
    /// Rays fan out as `dir + plane * frac` with `frac` in `[-1, 1]`.
    #[inline]
    pub fn plane(&self) -> Vec2 {
        // `dir` is non-zero by construction.
        math::orthogonal(self.dir) / self.dir.length() * (self.fov * 0.5).tan()
    }

    /// Rotate the facing direction (positive = clockwise on the map).
    pub fn turn(&mut self, angle: f32) {
        self.dir = math::rotate(self.dir, angle);
    }

    /// Translate by a world-space offset.  Collision policy lives in the
    /// simulation step, not here.
    pub fn advance(&mut self, offset: Vec2) {
        self.pos += offset;
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
