//! The per-frame render passes.
//!
//! [`build_frame`] assembles one frame's draw-call list in compositing
//! order: floor/ceiling background, then walls (which also fill the
//! per-column depth buffer), then props back-to-front against that depth
//! buffer.  Every pass is pure with respect to world state; all transient
//! buffers live in the returned [`Frame`].

use thiserror::Error;

use crate::math::GeomError;
use crate::renderer::DrawCall;
use crate::world::{Camera, DoorState, Grid, PropRegistry, SceneSheets};

pub mod planes;
pub mod raycast;
pub mod sprites;
pub mod walls;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self { w, h }
    }
}

/// Failures that abort the current frame's render.
///
/// All variants signal a violated geometry precondition, not a recoverable
/// runtime condition: the caller should surface a diagnostic instead of
/// presenting a corrupt frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeomError),

    /// A ray failed to resolve a solid tile; the grid border invariant was
    /// violated (or the traversal left the grid entirely).
    #[error("ray from ({x:.1}, {y:.1}) did not resolve a tile within {steps} steps")]
    TraversalExhausted { x: f32, y: f32, steps: u32 },
}

/// One rendered frame: the ordered draw list plus the wall depth buffer.
pub struct Frame {
    pub calls: Vec<DrawCall>,
    /// Perpendicular wall distance per screen column.
    pub depth: Vec<f32>,
}

impl Frame {
    /// Wall depth straight ahead – what the hit-scan weapon shoots against.
    pub fn center_depth(&self) -> f32 {
        self.depth[self.depth.len() / 2]
    }
}

/// Run all render passes for the current world state.
pub fn build_frame(
    grid: &Grid,
    props: &PropRegistry,
    cam: &Camera,
    door: &DoorState,
    sheets: &SceneSheets,
    screen: Screen,
) -> Result<Frame, RenderError> {
    let mut calls = Vec::with_capacity(screen.w * 2 + screen.h);
    let mut depth = vec![0.0f32; screen.w];

    planes::project_planes(cam, sheets, screen, &mut calls);
    walls::render_walls(grid, cam, door, sheets, screen, &mut calls, &mut depth)?;
    sprites::composite_props(props, cam, &depth, sheets, screen, &mut calls)?;

    Ok(Frame { calls, depth })
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TextureBank;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    const MAP: &str = "bbbbb\n\
                       b...b\n\
                       b...b\n\
                       b...b\n\
                       bbbbb\n";

    fn scene() -> (Grid, PropRegistry, Camera, DoorState, SceneSheets) {
        let grid = Grid::parse(MAP).unwrap();
        let props = PropRegistry::parse(".....\n.....\n...w.\n").unwrap();
        let cam = Camera::new(vec2(160.0, 160.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let mut bank = TextureBank::default_with_checker();
        let sheets = SceneSheets::builtin(&mut bank).unwrap();
        (grid, props, cam, DoorState::default(), sheets)
    }

    #[test]
    fn frame_is_ordered_background_to_foreground() {
        let (grid, props, cam, door, sheets) = scene();
        let screen = Screen::new(64, 48);
        let frame = build_frame(&grid, &props, &cam, &door, &sheets, screen).unwrap();

        assert_eq!(frame.depth.len(), 64);
        assert!(frame.depth.iter().all(|&d| d > 0.0));

        // planes strictly before walls, walls strictly before sprites
        let order: Vec<u8> = frame
            .calls
            .iter()
            .map(|c| match c {
                DrawCall::Plane(_) => 0,
                DrawCall::Wall(_) => 1,
                DrawCall::Sprite(_) => 2,
                DrawCall::Overlay(_) => 3,
            })
            .collect();
        assert!(order.windows(2).all(|w| w[0] <= w[1]));

        // one wall strip per column
        let walls = order.iter().filter(|&&k| k == 1).count();
        assert_eq!(walls, 64);
    }

    #[test]
    fn perpendicular_distance_never_exceeds_euclidean() {
        let (grid, _, cam, door, sheets) = scene();
        let screen = Screen::new(33, 24);
        let frame = build_frame(
            &grid,
            &PropRegistry::default(),
            &cam,
            &door,
            &sheets,
            screen,
        )
        .unwrap();

        // Straight ahead the ray is collinear with the facing axis: the
        // perpendicular distance equals the Euclidean one (east wall at
        // x=256, player at x=160).
        assert!((frame.center_depth() - 96.0).abs() < 0.5);
        // Off-centre columns are foreshortened, never lengthened.
        for &d in &frame.depth {
            assert!(d <= 96.0 * 2.0_f32.sqrt() + 0.5);
        }
    }
}
