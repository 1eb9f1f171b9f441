use glam::Vec2;

use crate::world::texture::TextureId;

/// Wall variant stored in a grid cell. `0` is open floor.
pub type TileId = u16;

/// Tile that stands in for everything outside the grid.
pub const BOUNDARY_TILE: TileId = 1;

/// Errors raised while assembling a [`TileMap`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("map has no rows")]
    Empty,

    /// Row `row` is `found` cells wide while row 0 is `expected`.
    #[error("row {row} is {found} cells wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A floor/ceiling grid does not match the wall grid.
    #[error("{plane} grid is {found:?}, wall grid is {expected:?}")]
    PlaneShape {
        plane: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl From<std::io::Error> for MapError {
    fn from(e: std::io::Error) -> Self {
        MapError::Io(e.to_string())
    }
}

/// Immutable level geometry: one wall grid plus per-cell floor and ceiling
/// texture ids, all stored row-major with the same `width × height`.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    walls: Vec<TileId>,
    floor: Vec<TextureId>,
    ceiling: Vec<TextureId>,
}

impl TileMap {
    /// Build a map from wall rows; floor and ceiling grids are all zero.
    pub fn new(rows: Vec<Vec<TileId>>) -> Result<Self, MapError> {
        let (width, height, walls) = flatten(rows, "wall", None)?;
        Ok(Self {
            width,
            height,
            walls,
            floor: vec![0; width * height],
            ceiling: vec![0; width * height],
        })
    }

    /// Attach floor and ceiling texture grids of the same shape.
    pub fn with_planes(
        mut self,
        floor: Vec<Vec<TextureId>>,
        ceiling: Vec<Vec<TextureId>>,
    ) -> Result<Self, MapError> {
        let shape = Some((self.width, self.height));
        self.floor = flatten(floor, "floor", shape)?.2;
        self.ceiling = flatten(ceiling, "ceiling", shape)?.2;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Wall id at cell `(x, y)`, `None` outside the grid.
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Option<TileId> {
        if self.in_bounds(x, y) {
            Some(self.walls[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    /// True if the world point lies in a wall cell or outside the map.
    pub fn is_wall(&self, p: Vec2) -> bool {
        let (x, y) = (p.x.floor() as i32, p.y.floor() as i32);
        self.tile(x, y).is_none_or(|t| t > 0)
    }

    /// Floor texture of the cell under `(x, y)`, clamped into the grid.
    #[inline]
    pub fn floor_at(&self, x: i32, y: i32) -> TextureId {
        self.floor[self.clamped_index(x, y)]
    }

    /// Ceiling texture of the cell under `(x, y)`, clamped into the grid.
    #[inline]
    pub fn ceiling_at(&self, x: i32, y: i32) -> TextureId {
        self.ceiling[self.clamped_index(x, y)]
    }

    #[inline]
    fn clamped_index(&self, x: i32, y: i32) -> usize {
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cy = y.clamp(0, self.height as i32 - 1) as usize;
        cy * self.width + cx
    }
}

fn flatten(
    rows: Vec<Vec<u16>>,
    plane: &'static str,
    expect: Option<(usize, usize)>,
) -> Result<(usize, usize, Vec<u16>), MapError> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        return Err(MapError::Empty);
    }
    if let Some(expected) = expect {
        if expected != (width, height) {
            return Err(MapError::PlaneShape {
                plane,
                expected,
                found: (width, height),
            });
        }
    }

    let mut cells = Vec::with_capacity(width * height);
    for (row, r) in rows.into_iter().enumerate() {
        if r.len() != width {
            return Err(MapError::Ragged {
                row,
                expected: width,
                found: r.len(),
            });
        }
        cells.extend(r);
    }
    Ok((width, height, cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(n: usize) -> TileMap {
        let rows = (0..n)
            .map(|y| {
                (0..n)
                    .map(|x| (x == 0 || y == 0 || x == n - 1 || y == n - 1) as TileId)
                    .collect()
            })
            .collect();
        TileMap::new(rows).unwrap()
    }

    #[test]
    fn bounds_and_occupancy() {
        let map = boxed(5);
        assert_eq!((map.width(), map.height()), (5, 5));
        assert_eq!(map.tile(0, 0), Some(1));
        assert_eq!(map.tile(2, 2), Some(0));
        assert_eq!(map.tile(5, 2), None);
        assert_eq!(map.tile(-1, 2), None);

        assert!(!map.is_wall(Vec2::new(2.5, 2.5)));
        assert!(map.is_wall(Vec2::new(0.5, 2.5)));
        assert!(map.is_wall(Vec2::new(-0.5, 2.5)), "outside counts as wall");
        assert!(map.is_wall(Vec2::new(9.0, 9.0)));
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = TileMap::new(vec![vec![1, 1, 1], vec![1, 0]]).unwrap_err();
        assert_eq!(
            err,
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(TileMap::new(vec![]).unwrap_err(), MapError::Empty);
    }

    #[test]
    fn plane_lookup_clamps() {
        let map = TileMap::new(vec![vec![0, 0], vec![0, 0]])
            .unwrap()
            .with_planes(vec![vec![1, 2], vec![3, 4]], vec![vec![5, 6], vec![7, 8]])
            .unwrap();
        assert_eq!(map.floor_at(1, 0), 2);
        assert_eq!(map.floor_at(-3, 7), 3);
        assert_eq!(map.ceiling_at(9, 9), 8);
    }

    #[test]
    fn plane_shape_mismatch() {
        let err = TileMap::new(vec![vec![0, 0]])
            .unwrap()
            .with_planes(vec![vec![0]], vec![vec![0, 0]])
            .unwrap_err();
        assert!(matches!(err, MapError::PlaneShape { plane: "floor", .. }));
    }
}
