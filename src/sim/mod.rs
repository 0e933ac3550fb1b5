//! Per-frame game logic: input, movement with collision, door slide and
//! the weapon state machine.  Rendering reads the world this module
//! mutates; nothing here touches a pixel.

mod weapon;

pub use weapon::{DAMAGE, MAX_AMMO, Weapon};

use bitflags::bitflags;
use glam::Vec2;

use crate::math;
use crate::world::{Camera, DoorState, Grid, PropRegistry, Tile};

/// World units moved per sim frame at full input.
pub const STEP_FORWARD: f32 = 5.0;
pub const STEP_SIDE: f32 = 5.0;

bitflags! {
    /// Momentary action buttons, separate from the analog axes.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const OPEN_DOOR = 1 << 0;
        const FIRE = 1 << 1;
        const RELOAD = 1 << 2;
        const QUIT = 1 << 3;
    }
}

/// One frame of player input, already mapped from raw device events.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputCmd {
    pub forward: f32, // -1 … +1
    pub strafe: f32,  // -1 … +1 (left / right)
    pub turn: f32,    // radians this frame, clockwise positive
    pub buttons: Buttons,
}

/// Mutable game state outside the camera: doors and the weapon.
#[derive(Debug, Default)]
pub struct Simulation {
    pub door: DoorState,
    pub weapon: Weapon,
}

impl Simulation {
    /// Apply one input frame: turn, slide, door and weapon updates.
    ///
    /// Movement is all-or-nothing per frame; a step into a blocking tile or
    /// a live colliding prop is dropped entirely rather than clipped along
    /// the wall.
    pub fn update(
        &mut self,
        grid: &Grid,
        props: &PropRegistry,
        cam: &mut Camera,
        cmd: &InputCmd,
    ) {
        cam.turn(cmd.turn);

        // Facing is non-zero for the camera's lifetime.
        let forward = cam.dir() / cam.dir().length();
        let sideways = math::orthogonal(forward);
        let offset = forward * STEP_FORWARD * cmd.forward + sideways * STEP_SIDE * cmd.strafe;
        if offset != Vec2::ZERO {
            let target = cam.pos() + offset;
            if grid.tile_at(target) == Some(Tile::Empty) && !props.blocks(target) {
                cam.advance(offset);
            }
        }

        if cmd.buttons.contains(Buttons::OPEN_DOOR) {
            self.door.request_open();
        }
        self.door.update();

        if cmd.buttons.contains(Buttons::RELOAD) {
            self.weapon.reload();
        }
        self.weapon.update(cmd.buttons.contains(Buttons::FIRE));
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::DOOR_MAX;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    const MAP: &str = "bbbb\n\
                       b..b\n\
                       b..b\n\
                       bbbb\n";

    fn world() -> (Grid, PropRegistry, Camera) {
        let grid = Grid::parse(MAP).unwrap();
        let props = PropRegistry::default();
        let cam = Camera::new(vec2(96.0, 96.0), vec2(1.0, 0.0), FRAC_PI_2).unwrap();
        (grid, props, cam)
    }

    #[test]
    fn walls_stop_movement() {
        let (grid, props, mut cam) = world();
        let mut sim = Simulation::default();
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };

        // 64 units of open floor ahead, 5 per frame.
        for _ in 0..100 {
            sim.update(&grid, &props, &mut cam, &cmd);
        }
        assert!(cam.pos().x < 192.0);
        assert!(cam.pos().x > 180.0);
        assert_eq!(cam.pos().y, 96.0);
    }

    #[test]
    fn live_props_block_dead_props_do_not() {
        let (grid, _, mut cam) = world();
        let mut props = PropRegistry::parse("....\n..s.\n").unwrap();
        let mut sim = Simulation::default();
        let cmd = InputCmd {
            forward: 1.0,
            ..Default::default()
        };

        for _ in 0..20 {
            sim.update(&grid, &props, &mut cam, &cmd);
        }
        let blocked_at = cam.pos().x;
        assert!(blocked_at < 128.0);

        // Kill the soldier; its cell stops colliding.
        for _ in 0..10 {
            props.hit_scan(cam.pos(), cam.dir(), 1e9, DAMAGE);
        }
        for _ in 0..20 {
            sim.update(&grid, &props, &mut cam, &cmd);
        }
        assert!(cam.pos().x > blocked_at);
    }

    #[test]
    fn door_button_starts_the_slide() {
        let (grid, props, mut cam) = world();
        let mut sim = Simulation::default();

        sim.update(&grid, &props, &mut cam, &InputCmd::default());
        assert_eq!(sim.door.timer(), DOOR_MAX);

        let open = InputCmd {
            buttons: Buttons::OPEN_DOOR,
            ..Default::default()
        };
        sim.update(&grid, &props, &mut cam, &open);
        assert_eq!(sim.door.timer(), DOOR_MAX - 1);

        // Keeps sliding without the button held.
        for _ in 0..200 {
            sim.update(&grid, &props, &mut cam, &InputCmd::default());
        }
        assert_eq!(sim.door.timer(), 0);
    }

    #[test]
    fn strafe_is_orthogonal_to_facing() {
        let (grid, props, mut cam) = world();
        let mut sim = Simulation::default();
        let cmd = InputCmd {
            strafe: 1.0,
            ..Default::default()
        };
        sim.update(&grid, &props, &mut cam, &cmd);
        assert_eq!(cam.pos().x, 96.0);
        assert_eq!(cam.pos().y, 96.0 - STEP_SIDE);
    }
}
