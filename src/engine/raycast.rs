//! Incremental ray/grid intersection (a DDA variant).
//!
//! [`next_crossing`] advances a ray to the nearest grid-line crossing and
//! reports which axis was crossed plus the per-axis movement signs.
//! [`trace`] iterates crossings until a solid tile is resolved, applying the
//! corner tie-break: a crossing that lands exactly on a grid corner is
//! ambiguous between up to four tiles, and the movement signs decide which
//! one the ray actually entered.

use glam::Vec2;

use crate::engine::RenderError;
use crate::math::{self, GeomError};
use crate::world::{Grid, TILE, Tile};

/// A traversal that has not resolved a tile after this many crossings can
/// only mean the border invariant is broken.
pub const MAX_STEPS: u32 = 30;

/// Which grid-line family the crossing landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// A vertical grid line (constant x) was crossed.
    X,
    /// A horizontal grid line (constant y) was crossed.
    Y,
}

/// Movement sign per axis, each −1 or +1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepSign {
    pub cx: i32,
    pub cy: i32,
}

/// One grid-line crossing.
#[derive(Clone, Copy, Debug)]
pub struct Crossing {
    pub point: Vec2,
    pub axis: Axis,
    pub sign: StepSign,
}

/// How [`trace`] treats door tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorPolicy {
    /// Stop on door tiles, like on walls.
    Opaque,
    /// Scan through doors to find the solid wall behind them.
    Transparent,
}

/// A resolved traversal: the blocking tile and the exact entry point.
#[derive(Clone, Copy, Debug)]
pub struct WallHit {
    pub point: Vec2,
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
    pub axis: Axis,
    pub sign: StepSign,
}

/// Advance `pos` along `dir` to the nearest grid-line crossing.
///
/// Candidate crossings are computed independently per axis; a position
/// already sitting on a grid line steps a full tile rather than zero so the
/// traversal can never stall.  Magnitudes tie towards the X axis.
///
/// Precondition: `dir.x != 0` (see [`math::differential`]).  A horizontal
/// ray (`dir.y == 0`) is fine – its Y candidate degenerates to infinity and
/// the X candidate always wins.
pub fn next_crossing(pos: Vec2, dir: Vec2) -> Result<Crossing, GeomError> {
    let slope = math::differential(dir)?;
    let sign = StepSign {
        cx: if dir.x > 0.0 { 1 } else { -1 },
        cy: if dir.y > 0.0 { 1 } else { -1 },
    };

    let dx = if dir.x > 0.0 {
        (TILE - (pos.x as i32) % TILE) as f32
    } else {
        let back = -((pos.x as i32) % TILE);
        if back == 0 { -(TILE as f32) } else { back as f32 }
    };
    let x_cand = Vec2::new(dx, dx * slope);

    let dy = if dir.y > 0.0 {
        (TILE - (pos.y as i32) % TILE) as f32
    } else {
        let back = -((pos.y as i32) % TILE);
        if back == 0 { -(TILE as f32) } else { back as f32 }
    };
    let y_cand = Vec2::new(dy / slope, dy);

    let (axis, delta) = if y_cand.length_squared() < x_cand.length_squared() {
        (Axis::Y, y_cand)
    } else {
        (Axis::X, x_cand)
    };

    Ok(Crossing {
        point: pos + delta,
        axis,
        sign,
    })
}

/// Walk the grid from `origin` along `dir` until a blocking tile resolves.
pub fn trace(
    grid: &Grid,
    origin: Vec2,
    dir: Vec2,
    doors: DoorPolicy,
) -> Result<WallHit, RenderError> {
    let exhausted = |steps: u32| RenderError::TraversalExhausted {
        x: origin.x,
        y: origin.y,
        steps,
    };

    let mut pos = origin;
    for step in 0..MAX_STEPS {
        let crossing = next_crossing(pos, dir)?;
        let point = crossing.point;

        let mut col = point.x as i32 / TILE;
        let mut row = point.y as i32 / TILE;

        // Corner correction first: a hit on the shared corner of four tiles
        // whose naive tile is empty belongs to the diagonal neighbour the
        // movement signs point at.  Otherwise only the crossed axis needs a
        // sign-dependent adjustment (integer division already picked the
        // forward tile for positive movement).
        let on_corner = (point.x as i32) % TILE == 0 && (point.y as i32) % TILE == 0;
        if on_corner && grid.get(row, col) == Some(Tile::Empty) {
            if crossing.sign.cy == -1 {
                row -= 1;
            }
            if crossing.sign.cx == -1 {
                col -= 1;
            }
        } else {
            match crossing.axis {
                Axis::X if crossing.sign.cx == -1 => col -= 1,
                Axis::Y if crossing.sign.cy == -1 => row -= 1,
                _ => {}
            }
        }

        let tile = grid.get(row, col).ok_or_else(|| exhausted(step))?;
        let stop = match tile {
            Tile::Empty => false,
            Tile::Door => doors == DoorPolicy::Opaque,
            Tile::Wall(_) => true,
        };
        if stop {
            return Ok(WallHit {
                point,
                row: row as usize,
                col: col as usize,
                tile,
                axis: crossing.axis,
                sign: crossing.sign,
            });
        }
        pos = point;
    }
    Err(exhausted(MAX_STEPS))
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn box_grid() -> Grid {
        // 3×3: solid ring around one empty tile.
        Grid::parse("bbb\nb.b\nbbb\n").unwrap()
    }

    #[test]
    fn east_ray_hits_west_edge_of_east_tile() {
        let grid = box_grid();
        let hit = trace(&grid, vec2(96.0, 96.0), vec2(1.0, 0.0), DoorPolicy::Opaque).unwrap();
        assert_eq!((hit.row, hit.col), (1, 2));
        assert_eq!(hit.point, vec2(128.0, 96.0)); // exactly the tile's west edge
        assert_eq!(hit.axis, Axis::X);
        assert_eq!(hit.tile, Tile::Wall(crate::world::WallKind::Brick));
    }

    #[test]
    fn corner_tie_break_picks_diagonal_neighbour() {
        // The ray towards (-1,-1) from the centre of tile (2,2) crosses the
        // corner at (128,128); the naive tile (2,2) is empty, so the
        // movement signs must pull the resolution to tile (1,1).
        let grid = Grid::parse(
            "bbbb\n\
             bb.b\n\
             b..b\n\
             bbbb\n",
        )
        .unwrap();
        let hit = trace(&grid, vec2(160.0, 160.0), vec2(-1.0, -1.0), DoorPolicy::Opaque).unwrap();
        assert_eq!((hit.row, hit.col), (1, 1));
        assert_eq!(hit.point, vec2(128.0, 128.0));
        assert_eq!(hit.sign, StepSign { cx: -1, cy: -1 });
    }

    #[test]
    fn exact_grid_line_start_steps_a_full_tile() {
        // Origin already on a vertical grid line, moving west.
        let crossing = next_crossing(vec2(64.0, 96.0), vec2(-1.0, 0.1)).unwrap();
        assert_eq!(crossing.point.x, 0.0);
        assert_eq!(crossing.axis, Axis::X);
    }

    #[test]
    fn vertical_rays_are_rejected() {
        let err = next_crossing(vec2(96.0, 96.0), vec2(0.0, 1.0)).unwrap_err();
        assert_eq!(err, GeomError::DivisionByZero);
    }

    #[test]
    fn all_interior_rays_terminate_in_bounds() {
        let grid = Grid::parse(
            "sssss\n\
             s...s\n\
             s.b.s\n\
             s...s\n\
             sssss\n",
        )
        .unwrap();
        let origin = vec2(100.0, 230.0);
        for i in 0..360 {
            let angle = (i as f32).to_radians();
            let dir = vec2(angle.cos(), angle.sin());
            if dir.x == 0.0 {
                continue; // documented precondition
            }
            let hit = trace(&grid, origin, dir, DoorPolicy::Opaque).unwrap();
            assert!(hit.row < grid.height() && hit.col < grid.width());
            assert!(hit.tile.blocks());
        }
    }

    #[test]
    fn door_policy_controls_transparency() {
        let grid = Grid::parse(
            "bbbbb\n\
             b.p.b\n\
             bbbbb\n",
        )
        .unwrap();
        let origin = vec2(96.0, 96.0);
        let dir = vec2(1.0, 0.001);

        let stop = trace(&grid, origin, dir, DoorPolicy::Opaque).unwrap();
        assert_eq!(stop.tile, Tile::Door);
        assert_eq!((stop.row, stop.col), (1, 2));

        let through = trace(&grid, origin, dir, DoorPolicy::Transparent).unwrap();
        assert!(matches!(through.tile, Tile::Wall(_)));
        assert_eq!((through.row, through.col), (1, 4));
    }
}
