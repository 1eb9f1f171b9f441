use glam::Vec2;

use crate::world::TextureId;

/// World-space position in tile units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Drawn as a camera-facing sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub texture: TextureId,
    /// Hidden when mostly behind a wall.
    pub occludable: bool,
}

/// Chases the player straight through walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monster {
    pub speed_multiplier: f32,
}

impl Default for Monster {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
        }
    }
}

/// Picked up when the player walks close enough; despawned afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collectible;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (left / right)
    pub run: bool,    // Shift
}

impl InputCmd {
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.forward != 0.0 || self.strafe != 0.0
    }
}
