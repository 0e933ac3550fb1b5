//! World objects: decorations and enemies.
//!
//! Props are loaded once from a character layout, never relocate, and only
//! mutate through hit-scan resolution.  Layout characters:
//!
//! `w` wooden barrel, `i` iron barrel, `d` dinner table, `f` furnace,
//! `e` well, `a` armor stand, `p` pillar, `s` soldier, `.` nothing.

use std::{fs, io, path::Path};

use glam::Vec2;
use thiserror::Error;

use crate::math;
use crate::world::grid::TILE;

/// How far off dead-centre a shot may land and still connect.
const AIM_COS: f32 = 0.999;

/// Closed set of prop types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    WoodenBarrel,
    IronBarrel,
    DinnerTable,
    Furnace,
    Well,
    Armor,
    Pillar,
    Soldier,
}

/// Static per-kind data, looked up instead of switched over.
#[derive(Clone, Copy, Debug)]
pub struct SpriteInfo {
    /// Blocks player movement while the prop is not dead.
    pub collision: bool,
    /// Starting life for hostile kinds, `None` for decorations.
    pub life: Option<i32>,
}

impl PropKind {
    fn from_char(c: char) -> Option<PropKind> {
        Some(match c {
            'w' => PropKind::WoodenBarrel,
            'i' => PropKind::IronBarrel,
            'd' => PropKind::DinnerTable,
            'f' => PropKind::Furnace,
            'e' => PropKind::Well,
            'a' => PropKind::Armor,
            'p' => PropKind::Pillar,
            's' => PropKind::Soldier,
            _ => return None,
        })
    }

    pub fn info(self) -> SpriteInfo {
        match self {
            PropKind::Soldier => SpriteInfo {
                collision: true,
                life: Some(10),
            },
            _ => SpriteInfo {
                collision: true,
                life: None,
            },
        }
    }

    /// Hostile kinds participate in hit-scan.
    pub fn hostile(self) -> bool {
        self.info().life.is_some()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropState {
    Idle,
    Dead,
}

/// One placed world object.
#[derive(Clone, Debug)]
pub struct Prop {
    pub kind: PropKind,
    pub pos: Vec2,
    pub state: PropState,
    pub life: i32,
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unknown prop character {ch:?} at row {row}, col {col}")]
    UnknownProp { ch: char, row: usize, col: usize },
}

/// All props plus an index of the hostile subset.
#[derive(Debug, Default)]
pub struct PropRegistry {
    props: Vec<Prop>,
    enemies: Vec<usize>,
}

impl PropRegistry {
    /// Parse a layout.  Each prop spawns centred in its grid cell.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut reg = PropRegistry::default();
        for (row, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind =
                    PropKind::from_char(ch).ok_or(LayoutError::UnknownProp { ch, row, col })?;
                let pos = Vec2::new(
                    (col as i32 * TILE + TILE / 2) as f32,
                    (row as i32 * TILE + TILE / 2) as f32,
                );
                if kind.hostile() {
                    reg.enemies.push(reg.props.len());
                }
                reg.props.push(Prop {
                    kind,
                    pos,
                    state: PropState::Idle,
                    life: kind.info().life.unwrap_or(0),
                });
            }
        }
        Ok(reg)
    }

    /// Load a layout from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Indices of hostile props (stable for the lifetime of the registry).
    pub fn enemies(&self) -> &[usize] {
        &self.enemies
    }

    /// Prop occupying the same grid cell as `pos`, if any.
    pub fn prop_at(&self, pos: Vec2) -> Option<&Prop> {
        let (col, row) = (pos.x as i32 / TILE, pos.y as i32 / TILE);
        self.props
            .iter()
            .find(|p| p.pos.x as i32 / TILE == col && p.pos.y as i32 / TILE == row)
    }

    /// True if a live colliding prop occupies the cell under `pos`.
    pub fn blocks(&self, pos: Vec2) -> bool {
        self.prop_at(pos)
            .is_some_and(|p| p.kind.info().collision && p.state != PropState::Dead)
    }

    /// Resolve one impact frame of the hit-scan weapon.
    ///
    /// An enemy is hit when it stands nearer than the wall straight ahead
    /// (`center_depth`, the middle column of the wall depth buffer) and the
    /// cosine between the aim axis and the ray to the enemy is within the
    /// centre-of-screen tolerance.  Dead enemies are skipped, so repeated
    /// impacts on a corpse neither drain life nor re-trigger the death
    /// transition.  Returns the number of enemies hit.
    pub fn hit_scan(
        &mut self,
        origin: Vec2,
        facing: Vec2,
        center_depth: f32,
        damage: i32,
    ) -> usize {
        let mut hits = 0;
        for &idx in &self.enemies {
            let prop = &mut self.props[idx];
            if prop.state == PropState::Dead {
                continue;
            }
            let ray = prop.pos - origin;
            let Ok(cs) = math::cos_between(ray, facing) else {
                continue; // standing exactly on the prop
            };
            let dist = cs * ray.length();
            if dist < center_depth && cs >= AIM_COS {
                prop.life -= damage;
                if prop.life <= 0 {
                    prop.life = 0;
                    prop.state = PropState::Dead;
                }
                hits += 1;
            }
        }
        hits
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
