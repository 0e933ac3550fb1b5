//! The hit-scan weapon's animation and ammo state machine.
//!
//! The weapon cycles `Idle -> Loading -> Firing` while the trigger is held
//! and ammo remains; releasing the trigger (or running dry) snaps it back to
//! `Idle`.  Shots only connect during `Firing`, so the spin-up frames are a
//! real gameplay delay, not cosmetics.

use crate::renderer::{DrawCall, OverlayBlit};
use crate::world::SceneSheets;

/// Life subtracted per impact frame.
pub const DAMAGE: i32 = 1;

/// Rounds held by a full magazine.
pub const MAX_AMMO: i32 = 100;

/// Sim frames per animation frame.
const ANIM_DIVISOR: i32 = 5;
/// Frames in the weapon sheet (two spin-up, two firing).
const SHEET_FRAMES: i32 = 4;
/// The firing loop only cycles the last two frames.
const FIRING_FRAMES: i32 = 2;
/// Firing frames per round of ammo.
const FRAMES_PER_ROUND: i32 = 3;

/// Side of one frame in the weapon sheet, in pixels.
const FRAME_PX: u32 = 128;
/// On-screen size of the scaled weapon overlay.
const OVERLAY_PX: u32 = 500;
/// The overlay hangs this far below the bottom edge.
const OVERLAY_SINK: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GunPhase {
    Idle,
    Loading,
    Firing,
}

#[derive(Clone, Copy, Debug)]
pub struct Weapon {
    phase: GunPhase,
    anim: i32,
    frame: i32,
    ammo: i32,
    ammo_tick: i32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            phase: GunPhase::Idle,
            anim: 0,
            frame: 0,
            ammo: MAX_AMMO,
            ammo_tick: 0,
        }
    }
}

impl Weapon {
    /// Advance one sim frame.  `trigger` is the raw fire input.
    pub fn update(&mut self, trigger: bool) {
        let mut cycle = SHEET_FRAMES;
        if trigger && self.ammo > 0 {
            self.frame = self.anim / ANIM_DIVISOR;
            match self.phase {
                GunPhase::Idle => self.phase = GunPhase::Loading,
                GunPhase::Loading if self.frame == SHEET_FRAMES - 1 => {
                    self.phase = GunPhase::Firing;
                }
                GunPhase::Firing => {
                    // The animation counter can overshoot right after the
                    // loading transition; clamp to the last sheet frame.
                    self.frame = (self.frame + FIRING_FRAMES).min(SHEET_FRAMES - 1);
                    cycle = FIRING_FRAMES;
                }
                GunPhase::Loading => {}
            }
            self.ammo_tick += 1;
            if self.ammo_tick == FRAMES_PER_ROUND {
                self.ammo -= 1;
                self.ammo_tick = 0;
            }
        } else {
            self.phase = GunPhase::Idle;
            self.frame = 0;
        }
        self.anim = (self.anim + 1) % (cycle * ANIM_DIVISOR);
    }

    /// True while shots connect (trigger held, ammo left, spin-up done).
    pub fn impact(&self) -> bool {
        self.phase == GunPhase::Firing
    }

    pub fn ammo(&self) -> i32 {
        self.ammo
    }

    pub fn reload(&mut self) {
        self.ammo = MAX_AMMO;
    }

    /// HUD draw call for the current animation frame.
    pub fn overlay(&self, sheets: &SceneSheets, screen_w: usize, screen_h: usize) -> DrawCall {
        DrawCall::Overlay(OverlayBlit {
            tex: sheets.gun,
            src_x: self.frame as u32 * FRAME_PX,
            src_y: 0,
            src_w: FRAME_PX,
            src_h: FRAME_PX,
            dst_x: (screen_w as i32 - OVERLAY_PX as i32) / 2,
            dst_y: screen_h as i32 - OVERLAY_PX as i32 + OVERLAY_SINK,
            dst_w: OVERLAY_PX,
            dst_h: OVERLAY_PX,
        })
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
