//! Rendering abstraction layer.
//!
//! *The render passes never touch a pixel buffer directly.*
//! They produce a list of [`DrawCall`]s (background first, then walls, then
//! sprites back-to-front, then overlays) and hand them to a type that
//! implements [`Renderer`].
//!
//! * Multiple back-ends can be plugged in without changing engine logic.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use glam::Vec2;

use crate::world::texture::{TextureBank, TextureId};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One scan-line of the ground-plane sweep: a floor row and its mirrored
/// ceiling row share the same world-space walk from `left` in `step`
/// increments.
#[derive(Clone, Debug)]
pub struct PlaneSpan {
    pub tex: TextureId,
    pub y_floor: usize,
    pub y_ceil: usize,
    /// World-space sample point under the leftmost pixel.
    pub left: Vec2,
    /// World-space advance per screen pixel.
    pub step: Vec2,
    /// Atlas cells to sample (64-px cells, indexed horizontally).
    pub floor_slot: u32,
    pub ceil_slot: u32,
}

/// One textured vertical wall slice, a single screen column wide.
#[derive(Clone, Copy, Debug)]
pub struct WallStrip {
    pub tex: TextureId,
    /// Screen column.
    pub x: usize,
    /// Top of the projected wall in screen rows (may be negative).
    pub top: f32,
    /// Projected height in screen rows.
    pub height: f32,
    /// Absolute source column inside the atlas.
    pub src_x: u32,
    /// Darken the slice (grid-line shading for Y-axis crossings).
    pub shaded: bool,
}

/// One textured vertical sprite slice.  Transparent (all-zero) texels are
/// skipped so sheets carry their own cut-outs.
#[derive(Clone, Copy, Debug)]
pub struct SpriteStrip {
    pub tex: TextureId,
    pub x: usize,
    pub top: f32,
    pub height: f32,
    /// Source column and the top row of the 64-px source cell.
    pub src_x: u32,
    pub src_y: u32,
}

/// Scaled rectangle blit for HUD elements (the weapon).
#[derive(Clone, Copy, Debug)]
pub struct OverlayBlit {
    pub tex: TextureId,
    pub src_x: u32,
    pub src_y: u32,
    pub src_w: u32,
    pub src_h: u32,
    pub dst_x: i32,
    pub dst_y: i32,
    pub dst_w: u32,
    pub dst_h: u32,
}

pub enum DrawCall {
    Plane(PlaneSpan),
    Wall(WallStrip),
    Sprite(SpriteStrip),
    Overlay(OverlayBlit),
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager;
/// GPU back-ends can ignore the slice because they never allocate it.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    fn draw_plane(&mut self, span: &PlaneSpan, bank: &TextureBank);
    fn draw_wall(&mut self, strip: &WallStrip, bank: &TextureBank);
    fn draw_sprite(&mut self, strip: &SpriteStrip, bank: &TextureBank);
    fn draw_overlay(&mut self, blit: &OverlayBlit, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        calls: &[DrawCall],
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        for c in calls {
            match c {
                DrawCall::Plane(p) => self.draw_plane(p, bank),
                DrawCall::Wall(w) => self.draw_wall(w, bank),
                DrawCall::Sprite(s) => self.draw_sprite(s, bank),
                DrawCall::Overlay(o) => self.draw_overlay(o, bank),
            }
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;
pub use software::Software;
