//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Draw calls arrive pre-ordered (planes, walls, sprites back-to-front,
//!   overlays), so no Z-buffer is needed here – occlusion was already
//!   resolved by the render passes.
//! ---------------------------------------------------------------------------

use crate::{
    renderer::{OverlayBlit, PlaneSpan, Renderer, Rgba, SpriteStrip, WallStrip},
    world::texture::{SHEET_CELL, Texture, TextureBank},
};

const CLEAR_COLOR: Rgba = 0xFF_101020;

/// Column-at-a-time software rasteriser.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
}

impl Software {
    fn put(&mut self, x: usize, y: usize, px: Rgba) {
        self.scratch[y * self.width + x] = px;
    }

    /// Sample one texel; `u`/`v` are wrapped into the texture.
    fn texel(tex: &Texture, u: i32, v: i32) -> Rgba {
        let x = u.rem_euclid(tex.w as i32) as usize;
        let y = v.rem_euclid(tex.h as i32) as usize;
        tex.pixels[y * tex.w + x]
    }

    /// Draw one vertical slice of a 64-px source cell, scaled to `height`
    /// screen rows starting at `top`.  `skip_transparent` implements the
    /// sprite cut-outs; `shade` halves the brightness.
    fn draw_slice(
        &mut self,
        x: usize,
        top: f32,
        height: f32,
        tex: &Texture,
        src_x: u32,
        src_y: u32,
        skip_transparent: bool,
        shade: bool,
    ) {
        if x >= self.width || height <= 0.0 {
            return;
        }
        let y0 = top.max(0.0) as usize;
        let y1 = ((top + height).min(self.height as f32)).max(0.0) as usize;
        for y in y0..y1 {
            let v = ((y as f32 - top) / height * SHEET_CELL as f32) as i32;
            let px = Self::texel(tex, src_x as i32, src_y as i32 + v);
            if skip_transparent && px == 0 {
                continue;
            }
            self.put(x, y, if shade { darken(px) } else { px });
        }
    }
}

fn darken(px: Rgba) -> Rgba {
    (px >> 1) & 0x7F_7F7F7F | 0xFF_000000
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(CLEAR_COLOR);
    }

    fn draw_plane(&mut self, span: &PlaneSpan, bank: &TextureBank) {
        let Ok(tex) = bank.texture(span.tex) else {
            return;
        };
        if span.y_floor >= self.height || span.y_ceil >= self.height {
            return;
        }
        let cell = SHEET_CELL as i32;
        let mut p = span.left;
        for x in 0..self.width {
            let u = (p.x as i32).rem_euclid(cell);
            let v = (p.y as i32).rem_euclid(cell);
            let floor_px = Self::texel(tex, span.floor_slot as i32 * cell + u, v);
            let ceil_px = Self::texel(tex, span.ceil_slot as i32 * cell + u, v);
            self.put(x, span.y_floor, floor_px);
            self.put(x, span.y_ceil, ceil_px);
            p += span.step;
        }
    }

    fn draw_wall(&mut self, strip: &WallStrip, bank: &TextureBank) {
        let Ok(tex) = bank.texture(strip.tex) else {
            return;
        };
        self.draw_slice(
            strip.x,
            strip.top,
            strip.height,
            tex,
            strip.src_x,
            0,
            false,
            strip.shaded,
        );
    }

    fn draw_sprite(&mut self, strip: &SpriteStrip, bank: &TextureBank) {
        let Ok(tex) = bank.texture(strip.tex) else {
            return;
        };
        self.draw_slice(
            strip.x,
            strip.top,
            strip.height,
            tex,
            strip.src_x,
            strip.src_y,
            true,
            false,
        );
    }

    fn draw_overlay(&mut self, blit: &OverlayBlit, bank: &TextureBank) {
        let Ok(tex) = bank.texture(blit.tex) else {
            return;
        };
        if blit.dst_w == 0 || blit.dst_h == 0 {
            return;
        }
        for dy in 0..blit.dst_h {
            let y = blit.dst_y + dy as i32;
            if y < 0 || y as usize >= self.height {
                continue;
            }
            let v = blit.src_y + dy * blit.src_h / blit.dst_h;
            for dx in 0..blit.dst_w {
                let x = blit.dst_x + dx as i32;
                if x < 0 || x as usize >= self.width {
                    continue;
                }
                let u = blit.src_x + dx * blit.src_w / blit.dst_w;
                let px = Self::texel(tex, u as i32, v as i32);
                if px != 0 {
                    self.put(x as usize, y as usize, px);
                }
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
