//! Billboard sprites: project, cull, occlusion-test, sort, blit.
//!
//! Projection is parallel per sprite; the sort afterwards is the sequential
//! barrier. Blitting walks the list farthest-first so nearer sprites
//! overwrite farther ones (no sprite-vs-sprite depth test).

use glam::Vec2;
use rayon::prelude::*;

use crate::{
    renderer::{Rgba, lighting::Lighting, lighting::shade, view::Viewer},
    world::{TextureAtlas, TextureId},
};

/// Sprites closer than this (Euclidean or along the view axis) are skipped.
const NEAR_CLIP: f32 = 0.1;

/// Projected sizes at or beyond this many pixels are skipped.
pub const MAX_SPRITE_SIZE: f32 = 10_000.0;

/// A sprite is dropped when more than this share of its columns is behind
/// a wall.
pub const OCCLUSION_THRESHOLD: f32 = 0.7;

/// One billboard handed in by the entity layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRecord {
    pub pos: Vec2,
    pub texture: TextureId,
    /// Force the depth-buffer occlusion test regardless of texture id.
    pub occludable: bool,
}

/// A sprite that survived culling, in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Horizontal centre in pixels.
    pub screen_x: f32,
    pub height: f32,
    pub width: f32,
    /// Euclidean distance from the camera; the sort key.
    pub distance: f32,
    pub texture: TextureId,
    pub light: f32,
}

/// Project `records` against the wall `depth` buffer and return the
/// survivors ordered farthest-first.
pub fn project_sprites(
    records: &[SpriteRecord],
    view: &Viewer,
    lighting: &Lighting,
    depth: &[f32],
    occludable_ids: &[TextureId],
) -> Vec<SpriteDraw> {
    let mut draws: Vec<SpriteDraw> = records
        .par_iter()
        .filter_map(|r| project_one(r, view, lighting, depth, occludable_ids))
        .collect();
    draws.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    draws
}

fn project_one(
    r: &SpriteRecord,
    view: &Viewer,
    lighting: &Lighting,
    depth: &[f32],
    occludable_ids: &[TextureId],
) -> Option<SpriteDraw> {
    let cam = &view.camera;
    let distance = (r.pos - cam.pos()).length();
    if !(NEAR_CLIP..=view.max_depth).contains(&distance) {
        return None;
    }

    let local = cam.to_cam(r.pos);
    let (lateral, forward) = (local.x, local.y);
    if forward <= NEAR_CLIP {
        return None;
    }

    let screen_w = view.screen.w as f32;
    let screen_x = view.screen.half_w * (1.0 + (lateral / forward) / view.lens);
    let height = view.screen.h as f32 / forward * view.height_factor;
    let width = height;
    let half = width * 0.5;
    if screen_x + half < 0.0 || screen_x - half > screen_w {
        return None;
    }

    if (r.occludable || occludable_ids.contains(&r.texture))
        && occluded(depth, screen_x - half, screen_x + half, forward)
    {
        return None;
    }

    if !(height > 0.0 && height < MAX_SPRITE_SIZE) {
        return None;
    }

    Some(SpriteDraw {
        screen_x,
        height,
        width,
        distance,
        texture: r.texture,
        light: lighting.falloff(distance),
    })
}

/// True when more than [`OCCLUSION_THRESHOLD`] of the columns in
/// `[left, right]` hold a wall nearer than `forward`.
pub fn occluded(depth: &[f32], left: f32, right: f32, forward: f32) -> bool {
    if depth.is_empty() {
        return false;
    }
    let first = left.max(0.0) as usize;
    let last = (right.min(depth.len() as f32 - 1.0) as usize).min(depth.len() - 1);
    if first > last {
        return false;
    }
    let span = &depth[first..=last];
    let hidden = span.iter().filter(|&&d| d < forward).count();
    hidden as f32 / span.len() as f32 > OCCLUSION_THRESHOLD
}

/// Composite `draws` (farthest-first) into `frame`. Transparent texels are
/// skipped; the sprite is centred on the horizon.
pub fn blit_sprites(frame: &mut [Rgba], view: &Viewer, draws: &[SpriteDraw], atlas: &TextureAtlas) {
    if draws.is_empty() {
        return;
    }
    let screen = view.screen;

    frame
        .par_chunks_mut(screen.w)
        .enumerate()
        .for_each(|(y, row)| {
            let yf = y as f32;
            for d in draws {
                let top = view.centre_y - d.height * 0.5;
                let v = (yf - top) / d.height;
                if !(0.0..1.0).contains(&v) {
                    continue;
                }
                let tex = atlas.sprite(d.texture);
                let ts = tex.size();
                let ty = ((v * ts as f32) as usize).min(ts - 1);
                let left = d.screen_x - d.width * 0.5;
                let x0 = left.max(0.0) as usize;
                let x1 = ((left + d.width).ceil().max(0.0) as usize).min(screen.w);

                for (x, px) in row.iter_mut().enumerate().take(x1).skip(x0) {
                    let u = (x as f32 - left) / d.width;
                    if !(0.0..1.0).contains(&u) {
                        continue;
                    }
                    let tx = ((u * ts as f32) as usize).min(ts - 1);
                    if tex.is_opaque(tx, ty) {
                        *px = shade(tex.texel(tx, ty), d.light).to_u32();
                    }
                }
            }
        });
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
