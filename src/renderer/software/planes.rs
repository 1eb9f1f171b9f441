//! Floor / ceiling pass.
//!
//! Every row of the (possibly downscaled) plane buffer sits at a fixed
//! world distance from the eye, so rows are independent and run in
//! parallel. Rows within one pixel of the horizon are left untouched.

use glam::vec2;
use rayon::prelude::*;

use crate::{
    renderer::{
        Rgba,
        lighting::{Lighting, screen_norm, shade},
        view::Viewer,
    },
    world::{TextureAtlas, TileMap},
};

/// Half-height of the horizon band that is neither floor nor ceiling.
pub const HORIZON_EPSILON: f32 = 1.0;

/// Surface a plane-buffer row belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Floor,
    Ceiling,
    Horizon,
}

/// Classify screen row `screen_y` against the horizon `centre_y`.
#[inline]
pub fn classify(screen_y: f32, centre_y: f32) -> Surface {
    let p = screen_y - centre_y;
    if p > HORIZON_EPSILON {
        Surface::Floor
    } else if p < -HORIZON_EPSILON {
        Surface::Ceiling
    } else {
        Surface::Horizon
    }
}

/// World distance to the floor/ceiling seen at screen row `screen_y`.
#[inline]
pub fn row_distance(view: &Viewer, screen_y: f32) -> f32 {
    let p = (screen_y - view.centre_y).abs().max(HORIZON_EPSILON);
    0.5 * view.screen.h as f32 * view.height_factor / p
}

/// Fill `buf` (`buf_w × buf_h`, each texel covering `scale²` screen pixels).
#[allow(clippy::too_many_arguments)]
pub fn render_planes(
    buf: &mut [Rgba],
    buf_w: usize,
    scale: usize,
    view: &Viewer,
    map: &TileMap,
    atlas: &TextureAtlas,
    lighting: &Lighting,
    glitch: f32,
) {
    let cam = &view.camera;
    let (sin, cos) = cam.sin_cos();
    let forward = vec2(cos, sin);
    // camera plane: forward rotated a quarter turn, scaled to the lens
    let plane = vec2(-sin, cos) * view.lens;
    let origin = cam.pos();
    let corruption = 1.0 - glitch;
    let scale_f = scale as f32;

    buf.par_chunks_mut(buf_w).enumerate().for_each(|(y, row)| {
        let screen_y = y as f32 * scale_f;
        let surface = classify(screen_y, view.centre_y);
        if surface == Surface::Horizon {
            return;
        }
        let dist = row_distance(view, screen_y);
        let falloff = lighting.falloff(dist);

        for (x, px) in row.iter_mut().enumerate() {
            let xn = 2.0 * x as f32 / buf_w as f32 - 1.0;
            let world = origin + (forward + plane * xn) * dist;
            let (cx, cy) = (world.x as i32, world.y as i32);

            let tex = match surface {
                Surface::Floor => atlas.floor(map.floor_at(cx, cy)),
                _ => atlas.ceiling(map.ceiling_at(cx, cy)),
            };
            let size = tex.size() as f32;
            let texel = tex.wrapped((world.x * size) as i32, (world.y * size) as i32);

            let n = screen_norm(x as f32 * scale_f, screen_y, &view.screen);
            let light = falloff * lighting.vignette(n) * corruption;
            *px = shade(texel, light).to_u32();
        }
    });
}

/// Nearest-neighbour upscale of the plane buffer into the full frame.
pub fn upscale(src: &[Rgba], src_w: usize, src_h: usize, scale: usize, dst: &mut [Rgba], dst_w: usize) {
    if scale == 1 && src_w == dst_w {
        dst[..src.len()].copy_from_slice(src);
        return;
    }
    dst.par_chunks_mut(dst_w).enumerate().for_each(|(y, row)| {
        let sy = (y / scale).min(src_h - 1);
        let src_row = &src[sy * src_w..(sy + 1) * src_w];
        for (x, px) in row.iter_mut().enumerate() {
            *px = src_row[(x / scale).min(src_w - 1)];
        }
    });
}

/// Plane-buffer side for a screen side and scale (never zero).
#[inline]
pub fn plane_extent(screen: usize, scale: usize) -> usize {
    (screen / scale.max(1)).max(1)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
