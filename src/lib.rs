//! Tile-map raycaster: DDA walls, textured floor/ceiling planes, billboard
//! sprites and a glitchy lighting model, rendered on the CPU.
//!
//! * [`world`]   – tile map, camera, texture atlas and the map-file loader.
//! * [`renderer`] – the per-frame pipeline (walls ∥ planes → sprites).
//! * [`sim`]      – player movement and the `hecs` entity world feeding sprites.
//! * [`config`]   – RON settings shared by all of the above.

pub mod config;
pub mod renderer;
pub mod sim;
pub mod world;
