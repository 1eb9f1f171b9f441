use crate::world::Camera;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_w: f32, // pre-derived for speed
    pub half_h: f32, // pre-derived for speed
    pub aspect: f32,
}

impl Screen {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            half_w: w as f32 * 0.5,
            half_h: h as f32 * 0.5,
            aspect: w as f32 / h.max(1) as f32,
        }
    }
}

/// Camera state plus projection constants reused by every pass of a frame.
#[derive(Clone, Copy, Debug)]
pub struct Viewer {
    pub camera: Camera,
    pub screen: Screen,
    pub max_depth: f32,
    pub height_factor: f32,
    /// `tan(fov/2) · aspect`: half-width of the projection plane at depth 1.
    pub lens: f32,
    /// Horizon row, `half_h + bob`.
    pub centre_y: f32,
}

impl Viewer {
    /// `fov` in radians.
    pub fn new(camera: Camera, screen: Screen, fov: f32, max_depth: f32, height_factor: f32) -> Self {
        Self {
            camera,
            screen,
            max_depth,
            height_factor,
            lens: (fov * 0.5).tan() * screen.aspect,
            centre_y: screen.half_h + camera.bob(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn lens_and_horizon() {
        let mut cam = Camera::new(Vec2::ZERO, 0.0);
        cam.set_bob(4.0);
        let view = Viewer::new(cam, Screen::new(200, 100), 90f32.to_radians(), 10.0, 1.0);
        assert!((view.lens - 2.0).abs() < 1e-5);
        assert_eq!(view.centre_y, 54.0);
        assert_eq!(view.screen.half_w, 100.0);
    }
}
