//! ---------------------------------------------------------------------------
//! CPU tile-map renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Per frame: floor/ceiling and wall rays in parallel, depth buffer,
//!   wall raster, then sprites back-to-front.
//! * Every pass is a fork-join over disjoint rows, rays or sprites; no
//!   locks and no `unsafe`.
//! ---------------------------------------------------------------------------

mod minimap;
mod planes;
mod renderer;
mod sprites;
mod walls;

pub use minimap::{Minimap, wall_colour};
pub use planes::{HORIZON_EPSILON, Surface, classify, plane_extent, render_planes, row_distance, upscale};
pub use renderer::{RenderParams, Software};
pub use sprites::{
    MAX_SPRITE_SIZE, OCCLUSION_THRESHOLD, SpriteDraw, SpriteRecord, blit_sprites, occluded,
    project_sprites,
};
pub use walls::{MAX_WALL_HEIGHT, WallSlice, cast_walls, raster_walls, ray_count, write_depth};
