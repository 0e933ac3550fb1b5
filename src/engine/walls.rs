//! Per-column wall resolution.
//!
//! For every screen column: build the column's ray from the camera plane,
//! trace it to the first blocking tile, resolve the door-vs-wall ambiguity,
//! and emit one textured [`WallStrip`] plus one depth-buffer entry.

use glam::Vec2;

use crate::engine::raycast::{self, Axis, DoorPolicy, WallHit};
use crate::engine::{RenderError, Screen};
use crate::math;
use crate::renderer::{DrawCall, WallStrip};
use crate::world::grid::{DOOR_FRAME_SLOT, DOOR_MAX, DOOR_SLOT};
use crate::world::{Camera, DoorState, Grid, SceneSheets, TILE, Tile};

/// What one column's ray finally landed on.
struct Resolved {
    point: Vec2,
    axis: Axis,
    atlas_slot: u32,
    /// The sliding door face itself (gets the slide offset applied).
    door: bool,
}

/// Render every wall column, filling `depth` with perpendicular distances.
pub fn render_walls(
    grid: &Grid,
    cam: &Camera,
    door: &DoorState,
    sheets: &SceneSheets,
    screen: Screen,
    calls: &mut Vec<DrawCall>,
    depth: &mut [f32],
) -> Result<(), RenderError> {
    let plane = cam.plane();

    for x in 0..screen.w {
        // Signed offset across the camera plane: +1 at the left edge,
        // −1 at the right.
        let frac = -((2.0 * x as f32 / screen.w as f32) - 1.0);
        let ray = cam.dir() + plane * frac;

        let first = raycast::trace(grid, cam.pos(), ray, DoorPolicy::Opaque)?;
        let hit = resolve_column(grid, cam, ray, first, door)?;

        let dist = cam.pos().distance(hit.point);
        let perp = math::cos_between(ray, cam.dir())? * dist;
        depth[x] = perp;

        // Texture coordinate along the non-crossed axis; Y-axis crossings
        // get the darker shade.
        let xmod = (hit.point.x as i32).rem_euclid(TILE) as u32;
        let ymod = (hit.point.y as i32).rem_euclid(TILE) as u32;
        let (u, shaded) = match hit.axis {
            Axis::X => (ymod, false),
            Axis::Y => (xmod, true),
        };
        let mut src_x = hit.atlas_slot * TILE as u32 + u;
        if hit.door {
            // Slide the sampling window as the door opens.
            src_x += (DOOR_MAX - door.timer()) as u32;
        }

        let height = TILE as f32 * screen.h as f32 / perp;
        let top = (screen.h as f32 - height) / 2.0;
        calls.push(DrawCall::Wall(WallStrip {
            tex: sheets.walls,
            x,
            top,
            height,
            src_x,
            shaded,
        }));
    }
    Ok(())
}

/// Resolve what a column actually shows once doors come into play.
///
/// A ray stopping on a door tile is re-traced ignoring doors, giving the
/// wall behind.  The door itself lives on the tile's centre plane, half a
/// tile past the entry edge along the crossed axis; whichever of door plane
/// and back wall is geometrically nearer wins.  A nearer door still only
/// renders if its exposed edge (per the shared open timer) covers the ray's
/// crossing offset – otherwise the ray slips through the opening.
fn resolve_column(
    grid: &Grid,
    cam: &Camera,
    ray: Vec2,
    first: WallHit,
    door: &DoorState,
) -> Result<Resolved, RenderError> {
    let kind = match first.tile {
        Tile::Wall(kind) => kind,
        Tile::Door => {
            let behind = raycast::trace(grid, cam.pos(), ray, DoorPolicy::Transparent)?;

            let slope = math::differential(ray)?;
            let delta = match first.axis {
                Axis::X => {
                    let dx = first.sign.cx as f32 * TILE as f32 / 2.0;
                    Vec2::new(dx, dx * slope)
                }
                Axis::Y => {
                    let dy = first.sign.cy as f32 * TILE as f32 / 2.0;
                    Vec2::new(dy / slope, dy)
                }
            };
            let door_point = first.point + delta;

            let door_dist = cam.pos().distance(door_point);
            let wall_dist = cam.pos().distance(behind.point);

            if door_dist < wall_dist {
                let edge = match first.axis {
                    Axis::X => (door_point.y as i32).rem_euclid(TILE),
                    Axis::Y => (door_point.x as i32).rem_euclid(TILE),
                };
                if edge <= door.timer() {
                    return Ok(Resolved {
                        point: door_point,
                        axis: first.axis,
                        atlas_slot: DOOR_SLOT,
                        door: true,
                    });
                }
                // The door has slid past this offset: show the wall behind.
                return Ok(Resolved {
                    point: behind.point,
                    axis: behind.axis,
                    atlas_slot: wall_slot(behind.tile),
                    door: false,
                });
            }
            // Entered the door tile beyond its centre plane (looking along
            // the opening): the visible surface is the door frame.
            return Ok(Resolved {
                point: behind.point,
                axis: behind.axis,
                atlas_slot: DOOR_FRAME_SLOT,
                door: false,
            });
        }
        Tile::Empty => unreachable!("trace never stops on an empty tile"),
    };
    Ok(Resolved {
        point: first.point,
        axis: first.axis,
        atlas_slot: kind.atlas_slot(),
        door: false,
    })
}

fn wall_slot(tile: Tile) -> u32 {
    match tile {
        Tile::Wall(kind) => kind.atlas_slot(),
        // A transparent trace only ever stops on walls.
        Tile::Door | Tile::Empty => DOOR_FRAME_SLOT,
    }
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

    const DOOR_MAP: &str = "bbbbb\n\
                            b.p.b\n\
                            bbbbb\n";

    fn setup() -> (Grid, Camera, SceneSheets) {
        let grid = Grid::parse(DOOR_MAP).unwrap();
        let cam = Camera::new(vec2(96.0, 96.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let mut bank = TextureBank::default_with_checker();
        let sheets = SceneSheets::builtin(&mut bank).unwrap();
        (grid, cam, sheets)
    }

    fn centre_strip(calls: &[DrawCall], w: usize) -> WallStrip {
        calls
            .iter()
            .find_map(|c| match c {
                DrawCall::Wall(s) if s.x == w / 2 => Some(*s),
                _ => None,
            })
            .expect("centre column rendered")
    }

    #[test]
    fn closed_door_renders_on_its_centre_plane() {
        let (grid, cam, sheets) = setup();
        let screen = Screen::new(32, 32);
        let mut calls = Vec::new();
        let mut depth = vec![0.0; 32];
        let door = DoorState::default(); // fully closed

        render_walls(&grid, &cam, &door, &sheets, screen, &mut calls, &mut depth).unwrap();

        // Door tile starts at x=128; its sliding plane sits at x=160.
        let strip = centre_strip(&calls, 32);
        assert_eq!(strip.src_x / TILE as u32, DOOR_SLOT);
        // Closed door: no slide offset.
        assert_eq!(strip.src_x % TILE as u32, 32); // hit centre of the tile
        assert!((depth[16] - 64.0).abs() < 1.0);
    }

    #[test]
    fn open_door_lets_rays_through_to_the_far_wall() {
        let (grid, cam, sheets) = setup();
        let screen = Screen::new(32, 32);
        let mut calls = Vec::new();
        let mut depth = vec![0.0; 32];

        let mut door = DoorState::default();
        door.request_open();
        for _ in 0..DOOR_MAX {
            door.update();
        }

        render_walls(&grid, &cam, &door, &sheets, screen, &mut calls, &mut depth).unwrap();

        // With the door fully open the centre ray reaches the east wall
        // at x=256: depth 160, and a wall-family texture.
        let strip = centre_strip(&calls, 32);
        assert_ne!(strip.src_x / TILE as u32, DOOR_SLOT);
        assert!((depth[16] - 160.0).abs() < 1.0);
    }

    #[test]
    fn half_open_door_splits_by_crossing_offset() {
        let (grid, cam, sheets) = setup();
        let screen = Screen::new(64, 64);
        let mut calls = Vec::new();
        let mut depth = vec![0.0; 64];

        let mut door = DoorState::default();
        door.request_open();
        for _ in 0..32 {
            door.update(); // timer now 32: lower offsets covered, upper open
        }

        render_walls(&grid, &cam, &door, &sheets, screen, &mut calls, &mut depth).unwrap();

        let door_cols = calls
            .iter()
            .filter(|c| {
                matches!(c, DrawCall::Wall(s) if s.src_x >= DOOR_SLOT * TILE as u32
                    && s.src_x < DOOR_FRAME_SLOT * TILE as u32)
            })
            .count();
        // Some columns still see the door, some slip past it.
        assert!(door_cols > 0 && door_cols < 64);
    }

    #[test]
    fn shading_follows_the_crossed_axis() {
        let grid = Grid::parse("bbb\nb.b\nbbb\n").unwrap();
        let cam = Camera::new(vec2(96.0, 96.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let mut bank = TextureBank::default_with_checker();
        let sheets = SceneSheets::builtin(&mut bank).unwrap();
        let mut calls = Vec::new();
        let mut depth = vec![0.0; 17];

        render_walls(
            &grid,
            &cam,
            &DoorState::default(),
            &sheets,
            Screen::new(17, 17),
            &mut calls,
            &mut depth,
        )
        .unwrap();

        // The dead-centre ray crosses a vertical grid line: unshaded.
        let strip = centre_strip(&calls, 17);
        assert!(!strip.shaded);
        // Steep side rays cross horizontal grid lines: shaded.
        let shaded = calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Wall(s) if s.shaded))
            .count();
        assert!(shaded > 0);
    }
}
