//! Floor and ceiling projection.
//!
//! Horizontal scan-line sweep: each screen row below the horizon maps to a
//! fixed world-space distance, so the whole row can be sampled by walking a
//! straight segment between the leftmost and rightmost rays at that
//! distance.  The ceiling row mirrored above the horizon reuses the same
//! walk, which is why one [`PlaneSpan`] carries both rows.

use crate::engine::Screen;
use crate::renderer::{DrawCall, PlaneSpan};
use crate::world::grid::{CEILING_SLOT, FLOOR_SLOT};
use crate::world::{Camera, SceneSheets, TILE};

/// Emit one span per floor row.  The horizon row itself and the outermost
/// row stay background-coloured; their projected distances degenerate.
pub fn project_planes(
    cam: &Camera,
    sheets: &SceneSheets,
    screen: Screen,
    calls: &mut Vec<DrawCall>,
) {
    let half = screen.h / 2;
    let plane = cam.plane();
    // Camera facing is non-zero for its whole lifetime.
    let forward = cam.dir() / cam.dir().length();

    for p in 1..half {
        // Row `half + p` sees the floor at this forward distance.
        let d = TILE as f32 * half as f32 / p as f32;
        let centre = cam.pos() + forward * d;
        let left = centre + plane * d;
        let right = centre - plane * d;
        let step = (right - left) / screen.w as f32;

        calls.push(DrawCall::Plane(PlaneSpan {
            tex: sheets.walls,
            y_floor: half + p,
            y_ceil: half - p,
            left,
            step,
            floor_slot: FLOOR_SLOT,
            ceil_slot: CEILING_SLOT,
        }));
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
