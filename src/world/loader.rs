//! Plain-text level loader.
//!
//! ### Format
//! * One text line per map row; blank lines are skipped.
//! * Digits `0‥9` are wall tile ids (`0` = open floor).
//! * `P` marks the player spawn, `M` a monster, `C` a collectible
//!   (case-insensitive); those cells are open floor.
//! * Any other character is open floor.
//! * Short rows are padded with tile `1` so the grid stays rectangular.
//!
//! Next to `name.txt` the loader looks for `name_floor.txt` and
//! `name_ceiling.txt` (digit grids of texture ids). A missing sidecar means
//! texture 0 everywhere; a sidecar of the wrong shape is padded with `0` or
//! truncated to the wall grid.

use std::path::{Path, PathBuf};

use glam::{Vec2, vec2};
use tracing::{debug, info};

use crate::world::{
    texture::TextureId,
    tilemap::{BOUNDARY_TILE, MapError, TileId, TileMap},
};

/// Spawn used when the map has no `P` marker.
pub const DEFAULT_SPAWN: Vec2 = vec2(2.0, 2.0);

/// Everything a level file describes.
#[derive(Clone, Debug)]
pub struct MapData {
    pub map: TileMap,
    pub spawn: Vec2,
    pub monsters: Vec<Vec2>,
    pub collectibles: Vec<Vec2>,
}

/// Parse the wall grid and entity markers of one level.
pub fn parse_map(text: &str) -> Result<MapData, MapError> {
    let mut rows: Vec<Vec<TileId>> = Vec::new();
    let mut spawn = DEFAULT_SPAWN;
    let mut monsters = Vec::new();
    let mut collectibles = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let y = rows.len();
        let centre = |x: usize| vec2(x as f32 + 0.5, y as f32 + 0.5);

        let row = line
            .chars()
            .enumerate()
            .map(|(x, ch)| match ch.to_ascii_uppercase() {
                d if d.is_ascii_digit() => d.to_digit(10).unwrap_or(0) as TileId,
                'P' => {
                    spawn = centre(x);
                    0
                }
                'M' => {
                    monsters.push(centre(x));
                    0
                }
                'C' => {
                    collectibles.push(centre(x));
                    0
                }
                _ => 0,
            })
            .collect();
        rows.push(row);
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, BOUNDARY_TILE);
    }

    Ok(MapData {
        map: TileMap::new(rows)?,
        spawn,
        monsters,
        collectibles,
    })
}

/// Parse a floor/ceiling sidecar, forcing it to `width × height`.
pub fn parse_plane(text: &str, width: usize, height: usize) -> Vec<Vec<TextureId>> {
    let mut rows: Vec<Vec<TextureId>> = text
        .lines()
        .map(|l| {
            l.chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| d as TextureId)
                .collect::<Vec<_>>()
        })
        .filter(|r| !r.is_empty())
        .collect();

    rows.resize(height, Vec::new());
    for row in &mut rows {
        row.resize(width, 0);
    }
    rows
}

/// Load `path` plus its optional floor/ceiling sidecars.
pub fn load_map<P: AsRef<Path>>(path: P) -> Result<MapData, MapError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let mut data = parse_map(&text)?;

    let (w, h) = (data.map.width(), data.map.height());
    let floor = load_plane(&sidecar(path, "floor"), w, h)?;
    let ceiling = load_plane(&sidecar(path, "ceiling"), w, h)?;
    data.map = data.map.with_planes(floor, ceiling)?;

    info!(
        map = %path.display(),
        width = w,
        height = h,
        monsters = data.monsters.len(),
        collectibles = data.collectibles.len(),
        "map loaded"
    );
    Ok(data)
}

fn sidecar(path: &Path, plane: &str) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("map");
    path.with_file_name(format!("{stem}_{plane}.txt"))
}

fn load_plane(path: &Path, w: usize, h: usize) -> Result<Vec<Vec<TextureId>>, MapError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(parse_plane(&text, w, h)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(file = %path.display(), "no sidecar, plane texture 0 everywhere");
            Ok(vec![vec![0; w]; h])
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = "\
11111
1P0C1
10M0
11111
";

    #[test]
    fn markers_and_padding() {
        let data = parse_map(LEVEL).unwrap();
        assert_eq!((data.map.width(), data.map.height()), (5, 4));
        assert_eq!(data.spawn, vec2(1.5, 1.5));
        assert_eq!(data.monsters, vec![vec2(2.5, 2.5)]);
        assert_eq!(data.collectibles, vec![vec2(3.5, 1.5)]);
        // marker cells are open, the short row was padded with a wall
        assert_eq!(data.map.tile(1, 1), Some(0));
        assert_eq!(data.map.tile(2, 2), Some(0));
        assert_eq!(data.map.tile(4, 2), Some(1));
    }

    #[test]
    fn default_spawn_and_blank_lines() {
        let data = parse_map("\n111\n\n1x1\n111\n").unwrap();
        assert_eq!(data.map.height(), 3);
        assert_eq!(data.spawn, DEFAULT_SPAWN);
        assert_eq!(data.map.tile(1, 1), Some(0));
    }

    #[test]
    fn empty_map_is_an_error() {
        assert_eq!(parse_map("\n\n").unwrap_err(), MapError::Empty);
    }

    #[test]
    fn plane_is_forced_to_shape() {
        let plane = parse_plane("12\n3456\n", 3, 3);
        assert_eq!(plane, vec![vec![1, 2, 0], vec![3, 4, 5], vec![0, 0, 0]]);
    }

    #[test]
    fn loads_sidecars_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("level.txt");
        std::fs::write(&path, "111\n1P1\n111\n").unwrap();
        std::fs::write(dir.path().join("level_floor.txt"), "000\n020\n000\n").unwrap();

        let data = load_map(&path).unwrap();
        assert_eq!(data.map.floor_at(1, 1), 2);
        assert_eq!(data.map.ceiling_at(1, 1), 0);
    }

    #[test]
    fn missing_file_reports_io() {
        let err = load_map("/no/such/level.txt").unwrap_err();
        assert!(matches!(err, MapError::Io(_)));
    }
}
