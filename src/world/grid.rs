//! The static tile grid: wall/door classification and the map loader.
//!
//! Maps are plain text, one character per tile:
//!
//! | char | tile              | atlas slot |
//! |------|-------------------|------------|
//! | `.`  | empty floor       | –          |
//! | `p`  | sliding door      | 8 (face)   |
//! | `f`  | brick with banner | 0          |
//! | `b`  | brick             | 1          |
//! | `s`  | stone             | 3          |
//! | `g`  | blue brick        | 4          |
//! | `m`  | mossy stone       | 5          |
//! | `w`  | wood              | 6          |
//! | `t`  | terracotta        | 7          |

use std::{fs, io, path::Path};

use glam::Vec2;
use thiserror::Error;

/// Side of one square tile in world units.
pub const TILE: i32 = 64;

/// Door timer value at which a door is fully closed (0 = fully open).
pub const DOOR_MAX: i32 = 64;

/// Texture family of a solid wall tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallKind {
    Banner,
    Brick,
    Stone,
    BlueBrick,
    Mossy,
    Wood,
    Terracotta,
}

impl WallKind {
    /// Horizontal 64-px cell of this family inside the wall atlas.
    pub fn atlas_slot(self) -> u32 {
        match self {
            WallKind::Banner => 0,
            WallKind::Brick => 1,
            WallKind::Stone => 3,
            WallKind::BlueBrick => 4,
            WallKind::Mossy => 5,
            WallKind::Wood => 6,
            WallKind::Terracotta => 7,
        }
    }
}

/// Atlas cell of the sliding door face.
pub const DOOR_SLOT: u32 = 8;
/// Atlas cell of the door frame (visible when looking along an open door).
pub const DOOR_FRAME_SLOT: u32 = 9;
/// Atlas cells sampled by the floor/ceiling pass.
pub const FLOOR_SLOT: u32 = 6;
pub const CEILING_SLOT: u32 = 10;

/// One cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Door,
    Wall(WallKind),
}

impl Tile {
    fn from_char(c: char) -> Option<Tile> {
        Some(match c {
            '.' => Tile::Empty,
            'p' => Tile::Door,
            'f' => Tile::Wall(WallKind::Banner),
            'b' => Tile::Wall(WallKind::Brick),
            's' => Tile::Wall(WallKind::Stone),
            'g' => Tile::Wall(WallKind::BlueBrick),
            'm' => Tile::Wall(WallKind::Mossy),
            'w' => Tile::Wall(WallKind::Wood),
            't' => Tile::Wall(WallKind::Terracotta),
            _ => return None,
        })
    }

    /// True for every tile the player cannot stand in.
    pub fn blocks(self) -> bool {
        self != Tile::Empty
    }
}

/// Errors that can be encountered while loading a map.
#[derive(Error, Debug)]
pub enum MapError {
    /// Underlying I/O failure – propagated unchanged.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("map is empty")]
    Empty,

    #[error("row {row} is {got} tiles wide, expected {expected}")]
    Ragged { row: usize, got: usize, expected: usize },

    #[error("unknown tile character {ch:?} at row {row}, col {col}")]
    UnknownTile { ch: char, row: usize, col: usize },

    /// Rays must never be able to leave the grid.
    #[error("border tile at row {row}, col {col} is empty")]
    OpenBorder { row: usize, col: usize },
}

/// Fixed tile grid, immutable after load.
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Parse a map from its textual form.  Blank lines are skipped; every
    /// remaining row must have the same width and the border must be solid.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut tiles = Vec::new();
        let mut width = 0usize;
        let mut height = 0usize;

        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let row: Vec<char> = line.chars().collect();
            if height == 0 {
                width = row.len();
            } else if row.len() != width {
                return Err(MapError::Ragged {
                    row: height,
                    got: row.len(),
                    expected: width,
                });
            }
            for (col, ch) in row.into_iter().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MapError::UnknownTile {
                    ch,
                    row: height,
                    col,
                })?;
                tiles.push(tile);
            }
            height += 1;
        }

        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }

        let grid = Grid {
            width,
            height,
            tiles,
        };
        grid.check_border()?;
        Ok(grid)
    }

    /// Load a map from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    fn check_border(&self) -> Result<(), MapError> {
        for row in 0..self.height {
            for col in 0..self.width {
                let on_border = row == 0
                    || col == 0
                    || row == self.height - 1
                    || col == self.width - 1;
                if on_border && self.tile(row, col) == Tile::Empty {
                    return Err(MapError::OpenBorder { row, col });
                }
            }
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at `(row, col)`.  Panics on out-of-range indices; use [`get`]
    /// when the indices come from untrusted geometry.
    ///
    /// [`get`]: Grid::get
    pub fn tile(&self, row: usize, col: usize) -> Tile {
        self.tiles[row * self.width + col]
    }

    /// Bounds-checked lookup with signed indices.
    pub fn get(&self, row: i32, col: i32) -> Option<Tile> {
        if row < 0 || col < 0 || row as usize >= self.height || col as usize >= self.width {
            return None;
        }
        Some(self.tile(row as usize, col as usize))
    }

    /// Tile under a world-space position.
    pub fn tile_at(&self, pos: Vec2) -> Option<Tile> {
        self.get(pos.y as i32 / TILE, pos.x as i32 / TILE)
    }
}

/// The one global door-open timer.
///
/// The engine models a *single* timer shared by every door tile: opening any
/// door animates all of them in lockstep, and an opened door never closes.
/// This mirrors the behaviour of the original game and is a documented
/// simplification – per-door timers would change hit-testing and occlusion
/// ordering subtly.
#[derive(Clone, Copy, Debug)]
pub struct DoorState {
    timer: i32,
    opening: bool,
}

impl Default for DoorState {
    fn default() -> Self {
        Self {
            timer: DOOR_MAX,
            opening: false,
        }
    }
}

impl DoorState {
    /// `DOOR_MAX` = fully closed, 0 = fully open.
    pub fn timer(&self) -> i32 {
        self.timer
    }

    /// Start sliding the doors open.
    pub fn request_open(&mut self) {
        if self.timer > 0 {
            self.opening = true;
        }
    }

    /// Advance the slide by one frame.
    pub fn update(&mut self) {
        if self.opening {
            self.timer -= 1;
            if self.timer <= 0 {
                self.timer = 0;
                self.opening = false;
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
