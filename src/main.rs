//! Windowed raycaster demo.
//!
//! ```bash
//! cargo run --release -- [--map map.txt --props props.txt]
//! ```
//!
//! Without arguments a built-in demo scene is loaded.  WASD/arrows move,
//! Space opens doors, Ctrl fires, R reloads, Esc quits.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use graycast::{
    engine::{self, Screen},
    renderer::{RendererExt, Software},
    sim::{Buttons, DAMAGE, InputCmd, Simulation},
    world::{Camera, Grid, PropRegistry, SceneSheets, TILE, TextureBank, Tile},
};

/// Radians turned per frame while an arrow key is held.
const TURN_STEP: f32 = 0.035;

const DEMO_MAP: &str = "\
sssssssssssssssssssss
s...................s
s.bbb....t...mm.....s
s.b.b....t...mm.....s
s.bbb...............s
s..........wwww.....s
s....gg....w..w.....s
s....gg....wwww.....s
s...................s
ssspsssss...........s
s.......s....ffff...s
s.......s....f..f...s
s..tt...s....ffff...s
s.......s...........s
s.......sssssssss...s
s...................s
s....bbbb....gg.....s
s....b..b....gg.....s
s....bbbb...........s
s...................s
sssssssssssssssssssss
";

const DEMO_PROPS: &str = "\
.....................
.....................
.................s...
.....wi..............
.....................
.....f...............
.....................
.....................
..........e.....p....
.....................
.....................
...s.................
.....................
..........d..........
.....................
.....a...............
.....................
.....................
...............s.....
.....................
.....................
";

#[derive(Parser, Debug)]
#[command(name = "graycast", about = "Wolfenstein-style grid raycaster")]
struct Args {
    /// Tile map file (one character per tile); built-in demo when omitted.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Prop layout file, same shape as the map; built-in demo when omitted.
    #[arg(long)]
    props: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: usize,

    #[arg(long, default_value_t = 640)]
    height: usize,

    /// Horizontal field of view in degrees.
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_custom_env("GRAYCAST_LOG");
    let args = Args::parse();

    let grid = match &args.map {
        Some(path) => {
            Grid::from_file(path).with_context(|| format!("loading map {}", path.display()))?
        }
        None => Grid::parse(DEMO_MAP)?,
    };
    let mut props = match &args.props {
        Some(path) => PropRegistry::from_file(path)
            .with_context(|| format!("loading props {}", path.display()))?,
        None => PropRegistry::parse(DEMO_PROPS)?,
    };
    log::info!(
        "map {}x{} tiles, {} props ({} hostile)",
        grid.width(),
        grid.height(),
        props.props().len(),
        props.enemies().len()
    );

    let mut bank = TextureBank::default_with_checker();
    let sheets = SceneSheets::builtin(&mut bank)?;

    let start = spawn_point(&grid, &props).context("map has no free tile to spawn on")?;
    let mut cam = Camera::new(start, vec2(1.0, 0.0), args.fov.to_radians())?;

    let mut sim = Simulation::default();
    let mut renderer = Software::default();
    let screen = Screen::new(args.width, args.height);

    let mut window = Window::new(
        "graycast",
        args.width,
        args.height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(60);

    while window.is_open() {
        let mut cmd = InputCmd::default();
        if window.is_key_down(Key::Up) || window.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if window.is_key_down(Key::Down) || window.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if window.is_key_down(Key::A) {
            cmd.strafe += 1.0;
        }
        if window.is_key_down(Key::D) {
            cmd.strafe -= 1.0;
        }
        if window.is_key_down(Key::Left) {
            cmd.turn += TURN_STEP;
        }
        if window.is_key_down(Key::Right) {
            cmd.turn -= TURN_STEP;
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            cmd.buttons |= Buttons::OPEN_DOOR;
        }
        if window.is_key_down(Key::LeftCtrl) || window.is_key_down(Key::RightCtrl) {
            cmd.buttons |= Buttons::FIRE;
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            cmd.buttons |= Buttons::RELOAD;
        }
        if window.is_key_down(Key::Escape) {
            cmd.buttons |= Buttons::QUIT;
        }
        if cmd.buttons.contains(Buttons::QUIT) {
            break;
        }

        sim.update(&grid, &props, &mut cam, &cmd);

        let mut frame = engine::build_frame(&grid, &props, &cam, &sim.door, &sheets, screen)?;
        if sim.weapon.impact() {
            let hits = props.hit_scan(cam.pos(), cam.dir(), frame.center_depth(), DAMAGE);
            if hits > 0 {
                log::debug!("{hits} hit(s), ammo {}", sim.weapon.ammo());
            }
        }
        frame
            .calls
            .push(sim.weapon.overlay(&sheets, args.width, args.height));

        let mut submitted = Ok(());
        renderer.draw_frame(args.width, args.height, &frame.calls, &bank, |fb, w, h| {
            submitted = window.update_with_buffer(fb, w, h);
        });
        submitted?;
    }
    Ok(())
}

/// Centre of the first tile that is empty and not occupied by a prop.
fn spawn_point(grid: &Grid, props: &PropRegistry) -> Option<glam::Vec2> {
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if grid.tile(row, col) != Tile::Empty {
                continue;
            }
            let pos = vec2(
                (col as i32 * TILE + TILE / 2) as f32,
                (row as i32 * TILE + TILE / 2) as f32,
            );
            if !props.blocks(pos) {
                return Some(pos);
            }
        }
    }
    None
}
