//! Depth-buffered prop compositing.
//!
//! Props are billboards: one 64-px sheet cell scaled by perpendicular
//! distance and centred on the prop's screen position.  Visible props are
//! painted farthest first, and each column is tested against the wall depth
//! buffer so walls clip sprites without any per-pixel depth storage.

use smallvec::SmallVec;

use crate::engine::{RenderError, Screen};
use crate::math;
use crate::renderer::{DrawCall, SpriteStrip};
use crate::world::texture::{SHEET_CELL, TextureId};
use crate::world::{Camera, PropKind, PropRegistry, PropState, SceneSheets, TILE};

/// Projection constant relating sprite size to perpendicular distance.
const PROP_PROJECTION: f32 = 700.0;

/// Corpse cell inside the soldier sheet (column 4, row 5).
const CORPSE_CELL: (u32, u32) = (4, 5);

struct Visible {
    tex: TextureId,
    dead_soldier: bool,
    /// Signed sideways component of the ray, scaled to unit distance.
    lateral: f32,
    dist: f32,
    perp: f32,
}

/// Project every prop inside the view cone and append its column strips.
pub fn composite_props(
    props: &PropRegistry,
    cam: &Camera,
    depth: &[f32],
    sheets: &SceneSheets,
    screen: Screen,
    calls: &mut Vec<DrawCall>,
) -> Result<(), RenderError> {
    let plane = cam.plane();
    let mut visible: SmallVec<[Visible; 32]> = SmallVec::new();

    for prop in props.props() {
        let ray = prop.pos - cam.pos();
        // A ray of zero length means the camera stands on the prop.
        let Ok(cs) = math::cos_between(ray, cam.dir()) else {
            continue;
        };
        if cs.clamp(-1.0, 1.0).acos() >= cam.fov() / 2.0 {
            continue;
        }
        let lateral = math::cos_between(ray, plane)?;
        visible.push(Visible {
            tex: sheets.prop(prop.kind),
            dead_soldier: prop.kind == PropKind::Soldier && prop.state == PropState::Dead,
            lateral,
            dist: ray.length(),
            perp: cs * ray.length(),
        });
    }

    // Painter's order: the nearest prop is drawn last and wins overlaps.
    visible.sort_by(|a, b| b.perp.total_cmp(&a.perp));

    for v in visible {
        let size = PROP_PROJECTION * TILE as f32 / v.perp;
        let x_offset = screen.w as f32 / 2.0 * (v.dist * v.lateral) / v.perp;
        let left = screen.w as f32 / 2.0 - x_offset - size / 2.0;
        let top = screen.h as f32 / 2.0 - size / 2.0;

        let size_i = size as i32;
        if size_i <= 0 {
            continue;
        }
        let left_i = left as i32;
        let first = (-left_i).max(0);
        let last = (screen.w as i32 - left_i).min(size_i);

        let (src_base_x, src_y) = if v.dead_soldier {
            (
                CORPSE_CELL.0 * SHEET_CELL as u32,
                CORPSE_CELL.1 * SHEET_CELL as u32,
            )
        } else {
            (0, 0)
        };

        for col in first..last {
            let x = (left_i + col) as usize;
            // Wall nearer than the prop: this column stays hidden.
            if v.perp >= depth[x] {
                continue;
            }
            let src_x = src_base_x + (col as u32 * SHEET_CELL as u32) / size_i as u32;
            calls.push(DrawCall::Sprite(SpriteStrip {
                tex: v.tex,
                x,
                top,
                height: size,
                src_x,
                src_y,
            }));
        }
    }
    Ok(())
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

    fn sheets() -> (TextureBank, SceneSheets) {
        let mut bank = TextureBank::default_with_checker();
        let sheets = SceneSheets::builtin(&mut bank).unwrap();
        (bank, sheets)
    }

    fn strips(
        props: &PropRegistry,
        cam: &Camera,
        depth: &[f32],
        sheets: &SceneSheets,
        w: usize,
    ) -> Vec<SpriteStrip> {
        let mut calls = Vec::new();
        composite_props(props, cam, depth, sheets, Screen::new(w, w), &mut calls).unwrap();
        calls
            .into_iter()
            .map(|c| match c {
                DrawCall::Sprite(s) => s,
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn walls_occlude_props_entirely() {
        let (_, sheets) = sheets();
        let props = PropRegistry::parse("...w\n").unwrap();
        let cam = Camera::new(vec2(32.0, 32.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();

        // Wall at 100 units, barrel at 192: every column is clipped.
        let depth = vec![100.0f32; 64];
        assert!(strips(&props, &cam, &depth, &sheets, 64).is_empty());

        // Move the wall back and the barrel appears.
        let depth = vec![1000.0f32; 64];
        assert!(!strips(&props, &cam, &depth, &sheets, 64).is_empty());
    }

    #[test]
    fn props_paint_back_to_front() {
        let (_, sheets) = sheets();
        // Iron barrel near, wooden barrel mid, table far, on one axis.
        let props = PropRegistry::parse(".i.w...d\n").unwrap();
        let cam = Camera::new(vec2(32.0, 32.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let depth = vec![10_000.0f32; 64];

        let strips = strips(&props, &cam, &depth, &sheets, 64);
        let order: Vec<TextureId> = strips
            .iter()
            .map(|s| s.tex)
            .scan(None, |prev, tex| {
                let first = *prev != Some(tex);
                *prev = Some(tex);
                Some((tex, first))
            })
            .filter_map(|(tex, first)| first.then_some(tex))
            .collect();
        assert_eq!(
            order,
            vec![
                sheets.prop(PropKind::DinnerTable),
                sheets.prop(PropKind::WoodenBarrel),
                sheets.prop(PropKind::IronBarrel),
            ]
        );
    }

    #[test]
    fn out_of_cone_props_are_culled() {
        let (_, sheets) = sheets();
        let props = PropRegistry::parse("w\n").unwrap();
        // Facing away from the barrel.
        let cam = Camera::new(vec2(160.0, 32.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let depth = vec![10_000.0f32; 32];
        assert!(strips(&props, &cam, &depth, &sheets, 32).is_empty());
    }

    #[test]
    fn dead_soldiers_sample_the_corpse_cell() {
        let (_, sheets) = sheets();
        let mut props = PropRegistry::parse("...s\n").unwrap();
        let cam = Camera::new(vec2(32.0, 32.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let depth = vec![10_000.0f32; 64];

        let alive = strips(&props, &cam, &depth, &sheets, 64);
        assert!(alive.iter().all(|s| s.src_y == 0));

        // 10 impact frames at 1 damage kill the soldier.
        for _ in 0..10 {
            props.hit_scan(cam.pos(), cam.dir(), 1e9, 1);
        }
        let dead = strips(&props, &cam, &depth, &sheets, 64);
        assert!(!dead.is_empty());
        for s in &dead {
            assert_eq!(s.src_y, 5 * SHEET_CELL as u32);
            assert!(s.src_x >= 4 * SHEET_CELL as u32);
            assert!(s.src_x < 5 * SHEET_CELL as u32);
        }
    }

    #[test]
    fn centred_prop_projects_symmetrically() {
        let (_, sheets) = sheets();
        let props = PropRegistry::parse("....w\n").unwrap();
        // On the prop's axis: x_offset is zero, strips straddle the centre.
        let cam = Camera::new(vec2(32.0, 32.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        let depth = vec![10_000.0f32; 100];

        let strips = strips(&props, &cam, &depth, &sheets, 100);
        let min = strips.iter().map(|s| s.x).min().unwrap();
        let max = strips.iter().map(|s| s.x).max().unwrap();
        assert!((min as i32 + max as i32 - 99).abs() <= 1);
    }
}
