//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It describes the frame as a [`Scene`] (map, camera, billboards, glitch
//! level) and hands it to a type that implements [`Renderer`].
//!
//! The passes themselves are plain functions over borrowed state
//! ([`raycast::cast`], [`software::cast_walls`], [`software::render_planes`],
//! [`software::project_sprites`]) so they can be tested without a window.

use crate::world::{Camera, TextureAtlas, TileMap};

pub mod lighting;
pub mod raycast;
pub mod software;
pub mod view;

pub use software::SpriteRecord;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Everything that changes from one frame to the next.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
    pub map: &'a TileMap,
    pub camera: Camera,
    pub sprites: &'a [SpriteRecord],
    /// Corruption level; 0 is a clean frame.
    pub glitch: f32,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Render floor, ceiling, walls and sprites into the internal buffer.
    fn draw_scene(&mut self, scene: &Scene<'_>, atlas: &TextureAtlas);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}
