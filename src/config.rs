//! Engine settings, stored as RON.
//!
//! Every section is `#[serde(default)]`, so a file only needs the keys it
//! changes:
//!
//! ```ron
//! (
//!     render: (fov_deg: 75.0, wall_ray_divisor: 2),
//!     lighting: (vignette: false),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::world::TextureId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A value parsed fine but cannot drive the renderer.
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplayConfig,
    pub render: RenderConfig,
    pub lighting: LightingConfig,
    pub glitch: GlitchConfig,
    pub player: PlayerConfig,
    pub monster: MonsterConfig,
    pub collectible: CollectibleConfig,
    pub assets: AssetConfig,
    pub minimap: MinimapConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub fps: usize,
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 144,
            title: "Yet Another Raycaster".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Field of view in degrees (stretched horizontally by the aspect ratio).
    pub fov_deg: f32,
    pub max_depth: f32,
    /// Screen columns per cast ray; `2` casts half as many rays as columns.
    pub wall_ray_divisor: usize,
    /// Floor/ceiling buffer is `screen / plane_scale`, then upscaled.
    pub plane_scale: usize,
    pub wall_height_factor: f32,
    /// Corruption applied even with no monster around.
    pub glitch_intensity: f32,
    /// Sprite textures hidden by the depth-buffer occlusion test.
    pub occludable_textures: Vec<TextureId>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            max_depth: 100.0,
            wall_ray_divisor: 1,
            plane_scale: 1,
            wall_height_factor: 1.0,
            glitch_intensity: 0.0,
            occludable_textures: vec![15],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Inverse-square distance falloff.
    pub falloff: bool,
    pub light_intensity: f32,
    /// Lower bound of the falloff term.
    pub ambient: f32,
    pub vignette: bool,
    pub vignette_intensity: f32,
    /// Normalised screen radius where the vignette starts.
    pub vignette_radius: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            falloff: true,
            light_intensity: 1.0,
            ambient: 0.03,
            vignette: true,
            vignette_intensity: 1.0,
            vignette_radius: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlitchConfig {
    /// Ramp corruption up as the nearest monster approaches.
    pub proximity: bool,
    pub start_distance: f32,
    pub max_distance: f32,
    pub max_intensity: f32,
}

impl Default for GlitchConfig {
    fn default() -> Self {
        Self {
            proximity: true,
            start_distance: 5.0,
            max_distance: 0.0,
            max_intensity: 20.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    /// Radians per second.
    pub turn_speed: f32,
    /// Degrees of yaw per pixel of horizontal mouse motion.
    pub mouse_sensitivity: f32,
    pub collision_radius: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub sprint_multiplier: f32,
    pub sprint_bob_multiplier: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            turn_speed: 2.5,
            mouse_sensitivity: 0.2,
            collision_radius: 0.2,
            bob_amplitude: 5.0,
            bob_frequency: 1.0,
            sprint_multiplier: 1.5,
            sprint_bob_multiplier: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    pub move_speed: f32,
    pub collision_distance: f32,
    /// Speed multiplier once every collectible is picked up.
    pub speed_boost: f32,
    /// Sprite textures handed out to monsters in spawn order.
    pub texture_ids: Vec<TextureId>,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.5,
            collision_distance: 0.3,
            speed_boost: 3.0,
            texture_ids: vec![0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectibleConfig {
    pub total: usize,
    pub collection_distance: f32,
    pub texture_ids: Vec<TextureId>,
}

impl Default for CollectibleConfig {
    fn default() -> Self {
        Self {
            total: 3,
            collection_distance: 0.5,
            texture_ids: vec![15],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub texture_dir: String,
    /// Side of every texture; must be a power of two.
    pub texture_size: usize,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: "textures".into(),
            texture_size: 512,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub enabled: bool,
    pub size: usize,
    pub margin: usize,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 150,
            margin: 10,
        }
    }
}

impl Settings {
    /// Parse and validate settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let settings = Self::from_ron(&std::fs::read_to_string(path)?)?;
        info!(file = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &'static str, reason: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                key,
                reason: reason.into(),
            })
        };
        let r = &self.render;
        if !(r.fov_deg > 0.0 && r.fov_deg < 180.0) {
            return invalid("render.fov_deg", "must lie in (0, 180)");
        }
        if !(r.max_depth > 0.0) {
            return invalid("render.max_depth", "must be positive");
        }
        if r.wall_ray_divisor == 0 {
            return invalid("render.wall_ray_divisor", "must be at least 1");
        }
        if r.plane_scale == 0 {
            return invalid("render.plane_scale", "must be at least 1");
        }
        if !(r.wall_height_factor > 0.0) {
            return invalid("render.wall_height_factor", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.lighting.ambient) {
            return invalid("lighting.ambient", "must lie in [0, 1]");
        }
        if self.display.width == 0 || self.display.height == 0 {
            return invalid("display", "width and height must be non-zero");
        }
        if !self.assets.texture_size.is_power_of_two() {
            return invalid("assets.texture_size", "must be a power of two");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s = Settings::from_ron("(render: (fov_deg: 75.0), lighting: (vignette: false))").unwrap();
        assert_eq!(s.render.fov_deg, 75.0);
        assert_eq!(s.render.max_depth, 100.0);
        assert!(!s.lighting.vignette);
        assert!(s.lighting.falloff);
        assert_eq!(s.collectible.texture_ids, vec![15]);
    }

    #[test]
    fn round_trips_through_ron() {
        let s = Settings::default();
        let text = ron::to_string(&s).unwrap();
        assert_eq!(Settings::from_ron(&text).unwrap(), s);
    }

    #[test]
    fn rejects_bad_values() {
        let err = Settings::from_ron("(assets: (texture_size: 300))").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "assets.texture_size",
                ..
            }
        ));
        let err = Settings::from_ron("(render: (wall_ray_divisor: 0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = Settings::from_ron("(render: (fov_deg: 180.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = Settings::from_ron("(lighting: (ambient: 1.5))").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "lighting.ambient",
                ..
            }
        ));
        assert!(Settings::from_ron("(lighting: (ambient: -0.1))").is_err());
        assert!(Settings::from_ron("(lighting: (ambient: 1.0))").is_ok());
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        assert!(matches!(
            Settings::from_ron("(render: (fov_deg: ").unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
