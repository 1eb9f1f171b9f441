use glam::{Vec2, vec2};

/// Player view-point in world space.
///
/// * Only **yaw** (heading) is simulated – the view never tilts.
/// * `bob` is a vertical screen offset in pixels supplied by movement.
/// * Sine/cosine of the yaw are cached on every update, so per-pixel code
///   never calls `sin_cos` itself.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2, // x,y in tile units
    yaw: f32,  // radians (0 = +X, positive turns towards +Y)
    bob: f32,  // pixels
    sin: f32,
    cos: f32,
}

impl Camera {
    /// Create a new camera at `pos`, facing `yaw`.
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        Self {
            pos,
            yaw,
            bob: 0.0,
            sin,
            cos,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn bob(&self) -> f32 {
        self.bob
    }

    /// Cached `(sin yaw, cos yaw)`.
    #[inline(always)]
    pub fn sin_cos(&self) -> (f32, f32) {
        (self.sin, self.cos)
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        (self.sin, self.cos) = self.yaw.sin_cos();
    }

    pub fn set_bob(&mut self, bob: f32) {
        self.bob = bob;
    }

    /// Rotate in place (positive = towards +Y).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.set_yaw(self.yaw + delta_yaw);
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        vec2(self.cos, self.sin)
    }

    /// Unit vector pointing to the camera's right (map rows grow downwards,
    /// so this is `forward` rotated by +90°).
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        self.forward().perp()
    }

    /// Transform a world point into camera-local coords:
    ///  .x = lateral offset (+ right)
    ///  .y = depth along the forward axis
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos;
        vec2(d.dot(self.right()), d.dot(self.forward()))
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
