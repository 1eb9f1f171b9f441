//! Grid traversal (DDA) from a point along an angle until a wall cell.
//!
//! Never fails: axis-parallel rays use a large finite step instead of
//! `inf`, and a ray that leaves the grid or runs out of steps reports a
//! hit on [`BOUNDARY_TILE`].

use glam::{IVec2, Vec2, ivec2, vec2};

use crate::world::{BOUNDARY_TILE, TileId, TileMap};

/// Reciprocal used for a zero direction component.
const AXIS_SENTINEL: f32 = 1e30;

/// Hard cap on cell steps per ray.
pub const MAX_STEPS: usize = 50;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    /// Stepped along X: a face running north–south.
    Vertical = 0,
    /// Stepped along Y: a face running east–west.
    Horizontal = 1,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance, uncorrected for the view angle, in `[0, max_depth]`.
    pub distance: f32,
    pub side: Side,
    pub tile: TileId,
    /// Unit direction `(cos θ, sin θ)`.
    pub dir: Vec2,
    /// Cell the ray stopped in (may lie just outside the grid).
    pub cell: IVec2,
}

impl RayHit {
    /// Fraction `[0, 1)` along the face that was struck, measured on the
    /// axis the face runs along.
    #[inline]
    pub fn face_fraction(&self, origin: Vec2) -> f32 {
        let along = match self.side {
            Side::Vertical => origin.y + self.distance * self.dir.y,
            Side::Horizontal => origin.x + self.distance * self.dir.x,
        };
        fract01(along)
    }
}

/// Fractional part forced into `[0, 1)`; rounding can make `x − ⌊x⌋`
/// come out as exactly `1.0` for tiny negative inputs.
#[inline(always)]
pub fn fract01(x: f32) -> f32 {
    let f = x - x.floor();
    if f >= 1.0 || !f.is_finite() { 0.0 } else { f }
}

#[inline(always)]
fn reciprocal(d: f32) -> f32 {
    if d == 0.0 { AXIS_SENTINEL } else { (1.0 / d).abs() }
}

/// Cast one ray from `origin` along `angle` (radians).
pub fn cast(origin: Vec2, angle: f32, map: &TileMap, max_depth: f32) -> RayHit {
    let (sin, cos) = angle.sin_cos();
    let dir = vec2(cos, sin);

    let mut cell = ivec2(origin.x as i32, origin.y as i32);
    let delta = vec2(reciprocal(dir.x), reciprocal(dir.y));

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - cell.x as f32) * delta.x)
    } else {
        (1, (cell.x as f32 + 1.0 - origin.x) * delta.x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - cell.y as f32) * delta.y)
    } else {
        (1, (cell.y as f32 + 1.0 - origin.y) * delta.y)
    };

    let mut side = Side::Vertical;
    let mut tile = BOUNDARY_TILE;
    for _ in 0..MAX_STEPS {
        if side_x < side_y {
            side_x += delta.x;
            cell.x += step_x;
            side = Side::Vertical;
        } else {
            side_y += delta.y;
            cell.y += step_y;
            side = Side::Horizontal;
        }
        match map.tile(cell.x, cell.y) {
            None => break, // left the grid: boundary
            Some(0) => continue,
            Some(t) => {
                tile = t;
                break;
            }
        }
    }

    let raw = match side {
        Side::Vertical if dir.x != 0.0 => {
            (cell.x as f32 - origin.x + (1 - step_x) as f32 * 0.5) / dir.x
        }
        Side::Horizontal if dir.y != 0.0 => {
            (cell.y as f32 - origin.y + (1 - step_y) as f32 * 0.5) / dir.y
        }
        _ => max_depth,
    };
    let distance = if raw.is_finite() { raw.abs().min(max_depth) } else { max_depth };

    RayHit {
        distance,
        side,
        tile,
        dir,
        cell,
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
