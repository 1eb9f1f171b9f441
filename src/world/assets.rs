//! Texture atlas construction: decode image files from a directory, then
//! synthesise fallbacks for the ids the renderer cannot live without.
//!
//! ### File naming
//! `<anything><id>.<ext>` with `ext ∈ {png, jpg, jpeg, bmp}`. The stem picks
//! the set: `sprite` → sprites (alpha kept), `floor` → floors, `ceiling` →
//! ceilings, anything else → walls. Every image is resampled to the atlas
//! side length so all samplers can rely on the power-of-two mask.

use std::path::Path;

use image::imageops::FilterType;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::world::texture::{Rgb, Texture, TextureAtlas, TextureError, TextureId, TextureSet};

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\.[a-zA-Z0-9]+$").expect("static regex"));

const EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Two-tone checkerboards synthesised for missing wall ids 1..=3.
const WALL_FALLBACKS: [(TextureId, Rgb, Rgb); 3] = [
    (1, Rgb::new(150, 150, 150), Rgb::new(100, 100, 100)),
    (2, Rgb::new(150, 100, 100), Rgb::new(100, 50, 50)),
    (3, Rgb::new(100, 150, 100), Rgb::new(50, 100, 50)),
];
const FLOOR_COLOURS: (Rgb, Rgb) = (Rgb::new(80, 80, 80), Rgb::new(60, 60, 60));
const CEILING_COLOURS: (Rgb, Rgb) = (Rgb::new(40, 40, 60), Rgb::new(30, 30, 50));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Wall,
    Floor,
    Ceiling,
    Sprite,
}

impl Kind {
    fn of(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        if lower.contains("sprite") {
            Kind::Sprite
        } else if lower.contains("floor") {
            Kind::Floor
        } else if lower.contains("ceiling") {
            Kind::Ceiling
        } else {
            Kind::Wall
        }
    }
}

impl TextureAtlas {
    /// Atlas made only of synthesised textures of side `size`.
    pub fn with_fallbacks(size: usize) -> Self {
        let mut atlas = Self {
            walls: TextureSet::new(Texture::checker(size, WALL_FALLBACKS[0].1, WALL_FALLBACKS[0].2)),
            floors: TextureSet::new(Texture::checker(size, FLOOR_COLOURS.0, FLOOR_COLOURS.1)),
            ceilings: TextureSet::new(Texture::checker(size, CEILING_COLOURS.0, CEILING_COLOURS.1)),
            sprites: TextureSet::new(fallback_sprite(size)),
        };
        atlas.fill_missing_walls(size);
        atlas
    }

    /// Load every recognised image in `dir`, then add fallbacks for the
    /// ids nothing was loaded for. A missing directory only logs a warning.
    pub fn load_dir<P: AsRef<Path>>(dir: P, size: usize) -> Result<Self, TextureError> {
        let dir = dir.as_ref();
        let size = size.max(2).next_power_of_two();
        let mut atlas = Self::with_fallbacks(size);
        // loaded files take precedence over the synthesised ids
        atlas.walls = TextureSet::new(atlas.walls.get(0).clone());

        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "texture directory not readable");
                atlas.fill_missing_walls(size);
                return Ok(atlas);
            }
        };

        let mut loaded = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let ext_ok = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !ext_ok {
                continue;
            }
            let Some(id) = ID_PATTERN
                .captures(name)
                .and_then(|c| c[1].parse::<TextureId>().ok())
            else {
                debug!(file = name, "no texture id in file name, skipped");
                continue;
            };

            let kind = Kind::of(name);
            let tex = match decode(&path, size, kind == Kind::Sprite) {
                Ok(t) => t,
                Err(e) => {
                    warn!(file = name, error = %e, "failed to load texture");
                    continue;
                }
            };
            let set = match kind {
                Kind::Wall => &mut atlas.walls,
                Kind::Floor => &mut atlas.floors,
                Kind::Ceiling => &mut atlas.ceilings,
                Kind::Sprite => &mut atlas.sprites,
            };
            match set.insert(id, tex) {
                Ok(()) => {
                    loaded += 1;
                    debug!(file = name, id, ?kind, "texture loaded");
                }
                Err(e) => warn!(file = name, error = %e, "texture ignored"),
            }
        }

        atlas.fill_missing_walls(size);
        info!(
            dir = %dir.display(),
            loaded,
            walls = atlas.walls.len(),
            floors = atlas.floors.len(),
            ceilings = atlas.ceilings.len(),
            sprites = atlas.sprites.len(),
            "texture atlas ready"
        );
        Ok(atlas)
    }

    fn fill_missing_walls(&mut self, size: usize) {
        for (id, primary, secondary) in WALL_FALLBACKS {
            if !self.walls.contains(id) {
                // cannot collide: `contains` just said the slot is free
                let _ = self.walls.insert(id, Texture::checker(size, primary, secondary));
                debug!(id, "generated fallback wall texture");
            }
        }
    }
}

fn decode(path: &Path, size: usize, keep_alpha: bool) -> Result<Texture, TextureError> {
    let err = |reason: String| TextureError::Decode {
        path: path.display().to_string(),
        reason,
    };
    let img = image::open(path).map_err(|e| err(e.to_string()))?;
    let rgba = img
        .resize_exact(size as u32, size as u32, FilterType::Triangle)
        .to_rgba8();

    let pixels = rgba
        .pixels()
        .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    let tex = Texture::new(size, pixels)?;
    if keep_alpha {
        tex.with_alpha(rgba.pixels().map(|p| p.0[3]).collect())
    } else {
        Ok(tex)
    }
}

/// Red two-disc figure with black eyes on a transparent background.
fn fallback_sprite(size: usize) -> Texture {
    let size = size.max(2).next_power_of_two();
    let s = size as f32;
    let red = Rgb::new(255, 0, 0);
    let discs = [
        (s / 2.0, s / 2.0 - s / 8.0, s / 8.0, red),
        (s / 2.0, s / 2.0 + s / 8.0, s / 4.0, red),
        (s / 2.0 - s / 8.0, s / 2.0 - s / 8.0, s / 16.0, Rgb::BLACK),
        (s / 2.0 + s / 8.0, s / 2.0 - s / 8.0, s / 16.0, Rgb::BLACK),
    ];

    let mut pixels = vec![Rgb::BLACK; size * size];
    let mut alpha = vec![0u8; size * size];
    for y in 0..size {
        for x in 0..size {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            // later discs paint over earlier ones
            for &(cx, cy, r, c) in &discs {
                if (px - cx).powi(2) + (py - cy).powi(2) <= r * r {
                    pixels[y * size + x] = c;
                    alpha[y * size + x] = 255;
                }
            }
        }
    }

    Texture::new(size, pixels)
        .and_then(|t| t.with_alpha(alpha))
        .unwrap_or_else(|_| Texture::checker(size, red, Rgb::BLACK))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_cover_required_ids() {
        let atlas = TextureAtlas::with_fallbacks(8);
        for id in 0..=3 {
            assert!(atlas.walls.contains(id));
        }
        assert_eq!(atlas.wall(2).texel(7, 0), Rgb::new(150, 100, 100));
        assert_eq!(atlas.floor(0).texel(0, 0), FLOOR_COLOURS.1);
        assert_eq!(atlas.ceiling(42).texel(7, 0), CEILING_COLOURS.0);
        // corners of the sprite are transparent, its centre is not
        let spr = atlas.sprite(0);
        assert!(!spr.is_opaque(0, 0));
        assert!(spr.is_opaque(4, 5));
    }

    #[test]
    fn kind_from_file_name() {
        assert_eq!(Kind::of("sprite15.png"), Kind::Sprite);
        assert_eq!(Kind::of("Floor_2.png"), Kind::Floor);
        assert_eq!(Kind::of("ceiling0.bmp"), Kind::Ceiling);
        assert_eq!(Kind::of("brick4.jpg"), Kind::Wall);
    }

    #[test]
    fn id_pattern_takes_trailing_digits() {
        let caps = ID_PATTERN.captures("wall_v2_17.png").unwrap();
        assert_eq!(&caps[1], "17");
        assert!(ID_PATTERN.captures("brick.png").is_none());
    }

    #[test]
    fn loads_directory_and_keeps_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(3, 5, image::Rgba([0, 0, 255, 255]))
            .save(dir.path().join("wall2.png"))
            .unwrap();
        image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 255, 0, 0]))
            .save(dir.path().join("sprite9.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let atlas = TextureAtlas::load_dir(dir.path(), 4).unwrap();
        assert_eq!(atlas.wall(2).size(), 4);
        assert_eq!(atlas.wall(2).texel(1, 1), Rgb::new(0, 0, 255));
        assert!(atlas.walls.contains(1) && atlas.walls.contains(3));
        assert!(atlas.sprites.contains(9));
        assert!(!atlas.sprite(9).is_opaque(0, 0));
    }

    #[test]
    fn missing_directory_is_not_fatal() {
        let atlas = TextureAtlas::load_dir("/definitely/not/here", 16).unwrap();
        assert!(atlas.walls.contains(3));
        assert_eq!(atlas.wall(1).size(), 16);
    }
}
