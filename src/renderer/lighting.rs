//! Per-pixel brightness shared by every pass.
//!
//! ```text
//! light = falloff(distance) · vignette(screen) · (1 − glitch)
//! ```
//!
//! `glitch` is not clamped: above 1 the product goes negative and the
//! channel arithmetic in [`shade`] wraps modulo 256. That wrap is the
//! "corruption" effect, not an overflow bug.

use bitflags::bitflags;
use glam::{Vec2, vec2};
use std::f32::consts::SQRT_2;

use crate::{config::GlitchConfig, config::LightingConfig, renderer::view::Screen, world::Rgb};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LightFlags: u8 {
        const FALLOFF  = 0b01;
        const VIGNETTE = 0b10;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub flags: LightFlags,
    pub intensity: f32,
    pub ambient: f32,
    pub vignette_intensity: f32,
    pub vignette_radius: f32,
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from(&LightingConfig::default())
    }
}

impl From<&LightingConfig> for Lighting {
    fn from(c: &LightingConfig) -> Self {
        let mut flags = LightFlags::empty();
        flags.set(LightFlags::FALLOFF, c.falloff);
        flags.set(LightFlags::VIGNETTE, c.vignette);
        Self {
            flags,
            intensity: c.light_intensity,
            ambient: c.ambient,
            vignette_intensity: c.vignette_intensity,
            vignette_radius: c.vignette_radius,
        }
    }
}

impl Lighting {
    /// Everything switched off: `light` is `1 − glitch`.
    pub fn unlit() -> Self {
        Self {
            flags: LightFlags::empty(),
            ..Self::default()
        }
    }

    /// Inverse-square falloff clamped to `[ambient, 1]`; `1` when disabled.
    #[inline(always)]
    pub fn falloff(&self, distance: f32) -> f32 {
        if !self.flags.contains(LightFlags::FALLOFF) {
            return 1.0;
        }
        (self.intensity / (distance * distance + 0.1)).min(1.0).max(self.ambient)
    }

    /// Radial darkening for a point in normalised screen space
    /// (`(0,0)` centre, `(±1,±1)` corners).
    #[inline(always)]
    pub fn vignette(&self, n: Vec2) -> f32 {
        if !self.flags.contains(LightFlags::VIGNETTE) {
            return 1.0;
        }
        let radius = self.vignette_radius;
        let r2 = n.length_squared();
        if r2 <= radius * radius {
            return 1.0;
        }
        let ramp = ((r2.sqrt() - radius) / (SQRT_2 - radius + 0.001)).min(1.0);
        1.0 - ramp * self.vignette_intensity
    }

    /// Full multiplier for one pixel.
    #[inline(always)]
    pub fn light(&self, distance: f32, n: Vec2, glitch: f32) -> f32 {
        self.falloff(distance) * self.vignette(n) * (1.0 - glitch)
    }
}

/// Screen pixel → normalised vignette coordinates. The vignette is centred
/// on the screen, not on the bobbing horizon.
#[inline(always)]
pub fn screen_norm(x: f32, y: f32, screen: &Screen) -> Vec2 {
    vec2((x - screen.half_w) / screen.half_w, (y - screen.half_h) / screen.half_h)
}

/// Truncate towards zero, then wrap into `0..256` (negative values too).
#[inline(always)]
pub fn wrap_channel(v: f32) -> u8 {
    (v as i32).rem_euclid(256) as u8
}

/// Scale every channel by `light` with modulo-256 wrap.
#[inline(always)]
pub fn shade(c: Rgb, light: f32) -> Rgb {
    Rgb::new(
        wrap_channel(c.r as f32 * light),
        wrap_channel(c.g as f32 * light),
        wrap_channel(c.b as f32 * light),
    )
}

/// Corruption level for a frame: the configured base plus a linear ramp
/// from `start_distance` (0) down to `max_distance` (`max_intensity`)
/// driven by the nearest monster.
pub fn glitch_intensity(cfg: &GlitchConfig, base: f32, nearest_monster: Option<f32>) -> f32 {
    let Some(d) = nearest_monster.filter(|_| cfg.proximity) else {
        return base;
    };
    let extra = if d >= cfg.start_distance {
        0.0
    } else if d <= cfg.max_distance {
        cfg.max_intensity
    } else {
        (cfg.start_distance - d) / (cfg.start_distance - cfg.max_distance) * cfg.max_intensity
    };
    base + extra
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg_lighting() -> Lighting {
        Lighting {
            flags: LightFlags::FALLOFF,
            intensity: 1.0,
            ambient: 0.03,
            vignette_intensity: 1.0,
            vignette_radius: 0.5,
        }
    }

    #[test]
    fn falloff_at_unit_distance() {
        let l = cfg_lighting();
        assert!((l.falloff(1.0) - 1.0 / 1.1).abs() < 1e-6);
        assert!((l.light(1.0, Vec2::ZERO, 0.0) - 0.909_090_9).abs() < 1e-5);
    }

    #[test]
    fn falloff_is_monotonic_and_floored() {
        let l = cfg_lighting();
        let mut prev = f32::INFINITY;
        for i in 0..400 {
            let v = l.falloff(i as f32 * 0.25);
            assert!(v <= prev);
            assert!((0.03..=1.0).contains(&v));
            prev = v;
        }
        assert_eq!(l.falloff(1000.0), 0.03);
    }

    #[test]
    fn ambient_above_one_wins_without_panicking() {
        let l = Lighting {
            ambient: 1.5,
            ..cfg_lighting()
        };
        assert_eq!(l.falloff(0.0), 1.5);
        assert_eq!(l.falloff(50.0), 1.5);
    }

    #[test]
    fn disabled_falloff_is_exactly_one() {
        let l = Lighting::unlit();
        for d in [0.0, 0.5, 3.0, 99.0] {
            assert_eq!(l.falloff(d), 1.0);
        }
        assert_eq!(l.light(7.0, vec2(1.0, 1.0), 0.0), 1.0);
    }

    #[test]
    fn vignette_ramps_to_corner() {
        let l = Lighting::default();
        assert_eq!(l.vignette(vec2(0.3, 0.3)), 1.0);
        let corner = l.vignette(vec2(1.0, 1.0));
        assert!(corner < 0.01 && corner >= 0.0);
        let mid = l.vignette(vec2(0.9, 0.0));
        assert!(mid < 1.0 && mid > corner);
    }

    #[test]
    fn channels_wrap_modulo_256() {
        assert_eq!(wrap_channel(300.0), 44);
        assert_eq!(wrap_channel(-100.0), 156);
        assert_eq!(wrap_channel(-0.7), 0);
        let c = shade(Rgb::new(200, 100, 0), -0.5);
        assert_eq!(c, Rgb::new(156, 206, 0));
        assert_eq!(shade(Rgb::new(200, 100, 50), 1.0), Rgb::new(200, 100, 50));
    }

    #[test]
    fn corruption_darkens_then_wraps() {
        let l = Lighting::unlit();
        assert_eq!(l.light(1.0, Vec2::ZERO, 0.25), 0.75);
        assert!(l.light(1.0, Vec2::ZERO, 3.0) < 0.0);
    }

    #[test]
    fn glitch_ramp() {
        let cfg = GlitchConfig::default();
        assert_eq!(glitch_intensity(&cfg, 0.0, None), 0.0);
        assert_eq!(glitch_intensity(&cfg, 0.1, Some(7.0)), 0.1);
        assert!((glitch_intensity(&cfg, 0.0, Some(2.5)) - 10.0).abs() < 1e-5);
        assert_eq!(glitch_intensity(&cfg, 0.0, Some(0.0)), 20.0);
        let off = GlitchConfig {
            proximity: false,
            ..cfg
        };
        assert_eq!(glitch_intensity(&off, 0.2, Some(0.0)), 0.2);
    }
}
