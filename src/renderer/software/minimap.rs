//! Top-down overlay in the top-right corner.
//!
//! The wall layer is rasterised into a cache when the overlay size changes;
//! entities and the player are drawn on top every frame.

use glam::Vec2;

use crate::{
    config::MinimapConfig,
    renderer::Rgba,
    world::{Rgb, TileId, TileMap},
};

const BACKGROUND: Rgb = Rgb::BLACK;
const WALL_DEFAULT: Rgb = Rgb::new(100, 100, 100);
const ENTITY: Rgb = Rgb::new(255, 100, 100);
const PLAYER: Rgb = Rgb::new(255, 0, 0);

const ENTITY_RADIUS: i32 = 3;
const PLAYER_RADIUS: i32 = 3;
const HEADING_LENGTH: f32 = 10.0;

/// Minimap colour of a wall tile.
pub fn wall_colour(tile: TileId) -> Rgb {
    match tile {
        2 => Rgb::new(100, 50, 50),
        3 => Rgb::new(50, 100, 50),
        4 => Rgb::new(50, 0, 50),
        5 => Rgb::new(122, 0, 5),
        _ => WALL_DEFAULT,
    }
}

#[derive(Default)]
pub struct Minimap {
    cache: Vec<Rgba>,
    size: usize,
}

impl Minimap {
    fn rebuild(&mut self, map: &TileMap, size: usize) {
        self.size = size;
        self.cache.clear();
        self.cache.resize(size * size, BACKGROUND.to_u32());

        let scale = size as f32 / map.width().max(map.height()) as f32;
        for y in 0..map.height() as i32 {
            for x in 0..map.width() as i32 {
                let Some(tile) = map.tile(x, y).filter(|&t| t > 0) else {
                    continue;
                };
                let col = wall_colour(tile).to_u32();
                let (x0, y0) = ((x as f32 * scale) as usize, (y as f32 * scale) as usize);
                let (x1, y1) = (
                    (((x + 1) as f32 * scale).ceil() as usize).min(size),
                    (((y + 1) as f32 * scale).ceil() as usize).min(size),
                );
                for row in self.cache[y0 * size..y1 * size].chunks_exact_mut(size) {
                    row[x0..x1].fill(col);
                }
            }
        }
    }

    /// Composite the overlay into `frame` (`fw × fh`).
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        frame: &mut [Rgba],
        fw: usize,
        fh: usize,
        cfg: &MinimapConfig,
        map: &TileMap,
        player: Vec2,
        heading: Vec2,
        entities: &[Vec2],
    ) {
        let size = cfg.size;
        if size == 0 || size + cfg.margin > fw || size + cfg.margin > fh {
            return;
        }
        if self.size != size {
            self.rebuild(map, size);
        }

        let ox = fw - size - cfg.margin;
        let oy = cfg.margin;
        for (y, src) in self.cache.chunks_exact(size).enumerate() {
            let start = (oy + y) * fw + ox;
            frame[start..start + size].copy_from_slice(src);
        }

        let mut canvas = Canvas { px: frame, w: fw, h: fh };
        let scale = size as f32 / map.width().max(map.height()) as f32;
        let origin = Vec2::new(ox as f32, oy as f32);
        let to_screen = |p: Vec2| origin + p * scale;

        for &e in entities {
            let s = to_screen(e);
            canvas.disc(s.x as i32, s.y as i32, ENTITY_RADIUS, ENTITY.to_u32());
        }
        let p = to_screen(player);
        let tip = p + heading * HEADING_LENGTH;
        canvas.disc(p.x as i32, p.y as i32, PLAYER_RADIUS, PLAYER.to_u32());
        canvas.line(p.x as i32, p.y as i32, tip.x as i32, tip.y as i32, PLAYER.to_u32());
    }
}

/// Clipped drawing primitives over a row-major frame.
struct Canvas<'a> {
    px: &'a mut [Rgba],
    w: usize,
    h: usize,
}

impl Canvas<'_> {
    #[inline]
    fn put(&mut self, x: i32, y: i32, col: Rgba) {
        if (0..self.w as i32).contains(&x) && (0..self.h as i32).contains(&y) {
            self.px[y as usize * self.w + x as usize] = col;
        }
    }

    fn disc(&mut self, cx: i32, cy: i32, r: i32, col: Rgba) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, col);
                }
            }
        }
    }

    /// Bresenham.
    fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, col: Rgba) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, col);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
