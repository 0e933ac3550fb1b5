//! Wolfenstein-style grid raycaster.
//!
//! The crate is split the classic way:
//!
//! * [`math`]     – 2-D vector helpers on top of `glam`.
//! * [`world`]    – static scene state: tile grid, props, camera, textures.
//! * [`engine`]   – the per-frame render passes (walls, sprites, planes).
//! * [`renderer`] – draw-call model plus a software back-end.
//! * [`sim`]      – per-frame simulation: doors, weapon, player movement.

pub mod engine;
pub mod math;
pub mod renderer;
pub mod sim;
pub mod world;
