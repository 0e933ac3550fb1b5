// Format-agnostic repository of textures.
// The renderer and the render passes interact through `TextureId` only.

use std::collections::HashMap;

use thiserror::Error;

use crate::world::grid::{CEILING_SLOT, DOOR_FRAME_SLOT, DOOR_SLOT, TILE};
use crate::world::props::PropKind;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because [`TextureBank::new`] inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Side of one atlas cell / sprite frame in pixels (matches the tile size).
pub const SHEET_CELL: usize = TILE as usize;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
/// The all-zero pixel is treated as fully transparent by the software
/// back-end, so sprite sheets can carry cut-outs without a mask channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        let mut pix = vec![0u32; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 {
                    0xFF_B0B0B0
                } else {
                    0xFF_404040
                };
            }
        }
        Texture {
            w: 8,
            h: 8,
            pixels: pix,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// A cache of textures addressed by id, with name-based lookup at load time.
///
/// * Stores exactly one copy of every name.
/// * ID **0** is always the "missing" checkerboard.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    /// Create a bank whose id 0 is the given fallback texture.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    /// Number of textures stored (including the "missing" one).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 1 // only the checker
    }

    /// Obtain the id for a loaded texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Insert a texture under `name`, returning its new id.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*──────────────────── built-in procedural sheets ─────────────────────*/

/// Texture handles the render passes need for one scene.
#[derive(Clone, Copy, Debug)]
pub struct SceneSheets {
    /// Wall atlas: 11 cells of 64 px side by side (wall families, door
    /// face, door frame, floor, ceiling).
    pub walls: TextureId,
    /// Weapon overlay sheet: 4 frames of 128 px.
    pub gun: TextureId,
    props: [TextureId; 8],
}

impl SceneSheets {
    pub fn prop(&self, kind: PropKind) -> TextureId {
        self.props[prop_index(kind)]
    }

    /// Fill `bank` with the built-in procedural sheets.
    ///
    /// Keeps the binary asset-free: patterns are flat-shaded stand-ins laid
    /// out exactly like the sprite sheets the original art used, so the
    /// sampling maths is exercised for real.
    pub fn builtin(bank: &mut TextureBank) -> Result<Self, TextureError> {
        let walls = bank.insert("WALL_ATLAS", wall_atlas())?;
        let gun = bank.insert("GUN", gun_sheet())?;
        let mut props = [NO_TEXTURE; 8];
        for (kind, name, base) in PROP_STYLE {
            let tex = if kind == PropKind::Soldier {
                soldier_sheet(base)
            } else {
                prop_sheet(base)
            };
            props[prop_index(kind)] = bank.insert(name, tex)?;
        }
        Ok(SceneSheets { walls, gun, props })
    }
}

fn prop_index(kind: PropKind) -> usize {
    match kind {
        PropKind::WoodenBarrel => 0,
        PropKind::IronBarrel => 1,
        PropKind::DinnerTable => 2,
        PropKind::Furnace => 3,
        PropKind::Well => 4,
        PropKind::Armor => 5,
        PropKind::Pillar => 6,
        PropKind::Soldier => 7,
    }
}

const PROP_STYLE: [(PropKind, &str, u32); 8] = [
    (PropKind::WoodenBarrel, "BARREL_WOOD", 0xFF_8B5A2B),
    (PropKind::IronBarrel, "BARREL_IRON", 0xFF_708090),
    (PropKind::DinnerTable, "TABLE", 0xFF_A0522D),
    (PropKind::Furnace, "FURNACE", 0xFF_505050),
    (PropKind::Well, "WELL", 0xFF_607080),
    (PropKind::Armor, "ARMOR", 0xFF_C0C0D0),
    (PropKind::Pillar, "PILLAR", 0xFF_D8D0C0),
    (PropKind::Soldier, "SOLDIER", 0xFF_3A5F3A),
];

/// Base colour per atlas cell; patterned below.
const SLOT_COLORS: [u32; 11] = [
    0xFF_9A3B3B, // 0 banner brick
    0xFF_A04545, // 1 brick
    0xFF_777777, // 2 (unused)
    0xFF_8A8A8A, // 3 stone
    0xFF_3B4F9A, // 4 blue brick
    0xFF_5F7A4A, // 5 mossy stone
    0xFF_8B6B3B, // 6 wood / floor
    0xFF_B06A4A, // 7 terracotta
    0xFF_6B5B45, // 8 door face
    0xFF_4B4238, // 9 door frame
    0xFF_303038, // 10 ceiling
];

fn wall_atlas() -> Texture {
    let cell = SHEET_CELL;
    let (w, h) = (cell * SLOT_COLORS.len(), cell);
    let mut pixels = vec![0u32; w * h];
    for (slot, &base) in SLOT_COLORS.iter().enumerate() {
        for y in 0..h {
            for x in 0..cell {
                let brick_line = y % 16 == 0 || (x + (y / 16 % 2) * 8) % 16 == 0;
                let px = match slot as u32 {
                    DOOR_SLOT => {
                        // vertical panel grooves
                        if x % 16 == 0 { darken(base) } else { base }
                    }
                    s if s == DOOR_FRAME_SLOT || s == CEILING_SLOT => base,
                    _ if brick_line => darken(base),
                    _ => base,
                };
                pixels[y * w + slot * cell + x] = px;
            }
        }
    }
    Texture { w, h, pixels }
}

/// 64×64 single-frame decoration sheet: filled disc on transparency.
fn prop_sheet(base: u32) -> Texture {
    let cell = SHEET_CELL as i32;
    let mut pixels = vec![0u32; (cell * cell) as usize];
    let r = cell / 2 - 4;
    for y in 0..cell {
        for x in 0..cell {
            let (dx, dy) = (x - cell / 2, y - cell / 2);
            if dx * dx + dy * dy <= r * r {
                let shade = if dx * dx + dy * dy > (r - 3) * (r - 3) {
                    darken(base)
                } else {
                    base
                };
                pixels[(y * cell + x) as usize] = shade;
            }
        }
    }
    Texture {
        w: cell as usize,
        h: cell as usize,
        pixels,
    }
}

/// Soldier sheet: 8×6 grid of 64-px cells.  Idle frame at (0,0), corpse at
/// cell (4,5) – the alternate region the compositor selects for dead enemies.
fn soldier_sheet(base: u32) -> Texture {
    let cell = SHEET_CELL;
    let (w, h) = (cell * 8, cell * 6);
    let mut pixels = vec![0u32; w * h];
    // idle: upright rectangle
    stamp_rect(&mut pixels, w, 24, 8, 16, 48, base);
    // corpse: flat rectangle in cell (4,5)
    stamp_rect(&mut pixels, w, 4 * cell + 8, 5 * cell + 44, 48, 12, darken(base));
    Texture { w, h, pixels }
}

/// 4-frame weapon sheet, 128-px frames; muzzle block grows per frame.
fn gun_sheet() -> Texture {
    let frame = 128usize;
    let (w, h) = (frame * 4, frame);
    let mut pixels = vec![0u32; w * h];
    for f in 0..4 {
        stamp_rect(&mut pixels, w, f * frame + 52, 64, 24, 64, 0xFF_404048);
        if f >= 2 {
            let flash = 8 + 8 * (f - 1);
            stamp_rect(
                &mut pixels,
                w,
                f * frame + 64 - flash / 2,
                64 - flash,
                flash,
                flash,
                0xFF_FFD040,
            );
        }
    }
    Texture { w, h, pixels }
}

fn stamp_rect(pixels: &mut [u32], stride: usize, x0: usize, y0: usize, w: usize, h: usize, c: u32) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            pixels[y * stride + x] = c;
        }
    }
}

fn darken(c: u32) -> u32 {
    (c >> 1) & 0x7F_7F7F7F | 0xFF_000000
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
