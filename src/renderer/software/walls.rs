//! Wall pass.
//!
//! Split in two so both halves run data-parallel over disjoint output:
//! 1. [`cast_walls`]: one task per ray, producing a [`WallSlice`].
//! 2. [`raster_walls`]: one task per frame row, painting every slice that
//!    covers the row.
//!
//! [`write_depth`] runs between the two and is the only writer of the
//! per-column depth buffer.

use rayon::prelude::*;

use crate::{
    renderer::{
        Rgba,
        lighting::{Lighting, screen_norm, shade},
        raycast::{Side, cast},
        view::Viewer,
    },
    world::{TextureAtlas, TileId, TileMap},
};

/// Slices this tall or taller are skipped (the camera is inside the wall).
pub const MAX_WALL_HEIGHT: i32 = 8000;

/// Corrected distances never drop below this.
const MIN_DISTANCE: f32 = 0.01;

/// Everything needed to paint one ray's worth of columns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    /// Screen columns `x_start..x_end` covered by this ray.
    pub x_start: usize,
    pub x_end: usize,
    /// Fisheye-corrected distance; this is what lands in the depth buffer.
    pub depth: f32,
    pub top: i32,
    pub height: i32,
    pub tile: TileId,
    pub tex_x: usize,
    /// Distance falloff term, shared by every pixel of the slice.
    pub falloff: f32,
}

impl WallSlice {
    #[inline]
    pub fn visible(&self) -> bool {
        self.height > 0 && self.height < MAX_WALL_HEIGHT
    }

    /// Rows of the slice clipped to `0..screen_h`.
    #[inline]
    fn rows(&self, screen_h: usize) -> std::ops::Range<i32> {
        self.top.max(0)..(self.top + self.height).min(screen_h as i32)
    }
}

/// Number of rays for a screen `width` when each ray spans `divisor` columns.
#[inline]
pub fn ray_count(width: usize, divisor: usize) -> usize {
    (width / divisor.max(1)).max(1)
}

/// Cast `ray_count(w, divisor)` rays across the view, replacing `out`.
pub fn cast_walls(
    view: &Viewer,
    map: &TileMap,
    atlas: &TextureAtlas,
    lighting: &Lighting,
    divisor: usize,
    out: &mut Vec<WallSlice>,
) {
    let w = view.screen.w;
    let num_rays = ray_count(w, divisor);
    let ray_width = w as f32 / num_rays as f32;

    (0..num_rays)
        .into_par_iter()
        .map(|i| {
            let x_start = (i as f32 * ray_width) as usize;
            // the last ray always reaches the right edge
            let x_end = if i + 1 == num_rays {
                w
            } else {
                (((i + 1) as f32 * ray_width) as usize).min(w)
            };
            wall_slice(view, map, atlas, lighting, i, num_rays, x_start..x_end)
        })
        .collect_into_vec(out);
}

fn wall_slice(
    view: &Viewer,
    map: &TileMap,
    atlas: &TextureAtlas,
    lighting: &Lighting,
    ray: usize,
    num_rays: usize,
    cols: std::ops::Range<usize>,
) -> WallSlice {
    let cam = &view.camera;
    let norm_x = 2.0 * ray as f32 / num_rays as f32 - 1.0;
    let offset = (norm_x * view.lens).atan();

    let hit = cast(cam.pos(), cam.yaw() + offset, map, view.max_depth);
    let depth = (hit.distance * offset.cos()).max(MIN_DISTANCE);

    let height = (view.screen.h as f32 * view.height_factor / depth) as i32;
    let top = (view.centre_y - height as f32 * 0.5) as i32;

    // texture column comes from the uncorrected distance
    let tex = atlas.wall(hit.tile);
    let tw = tex.size();
    let mut tex_x = (hit.face_fraction(cam.pos()) * tw as f32) as usize;
    let mirrored = match hit.side {
        Side::Vertical => hit.dir.x > 0.0,
        Side::Horizontal => hit.dir.y < 0.0,
    };
    if mirrored {
        tex_x = tw - tex_x.min(tw - 1) - 1;
    }

    WallSlice {
        x_start: cols.start,
        x_end: cols.end,
        depth,
        top,
        height,
        tile: hit.tile,
        tex_x: tex_x.min(tw - 1),
        falloff: lighting.falloff(depth),
    }
}

/// Reset `depth` to `max_depth`, then store each slice's distance in its
/// columns. Skipped slices still record their distance.
pub fn write_depth(slices: &[WallSlice], depth: &mut [f32], max_depth: f32) {
    depth.fill(max_depth);
    for s in slices {
        let end = s.x_end.min(depth.len());
        if s.x_start < end {
            depth[s.x_start..end].fill(s.depth);
        }
    }
}

/// Paint visible slices into a row-major `frame` of `view.screen` size.
pub fn raster_walls(
    frame: &mut [Rgba],
    view: &Viewer,
    slices: &[WallSlice],
    atlas: &TextureAtlas,
    lighting: &Lighting,
    glitch: f32,
) {
    let screen = view.screen;
    let corruption = 1.0 - glitch;

    frame
        .par_chunks_mut(screen.w)
        .enumerate()
        .for_each(|(y, row)| {
            let yi = y as i32;
            for s in slices.iter().filter(|s| s.visible() && s.rows(screen.h).contains(&yi)) {
                let tex = atlas.wall(s.tile);
                let th = tex.size();
                let ratio = (yi - s.top) as f32 / s.height as f32;
                let tex_y = ((ratio * th as f32) as usize).min(th - 1);
                let texel = tex.texel(s.tex_x, tex_y);

                for (x, px) in row.iter_mut().enumerate().take(s.x_end).skip(s.x_start) {
                    let n = screen_norm(x as f32, y as f32, &screen);
                    let light = s.falloff * lighting.vignette(n) * corruption;
                    *px = shade(texel, light).to_u32();
                }
            }
        });
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
