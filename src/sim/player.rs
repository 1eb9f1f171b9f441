//! Player movement: wall sliding against the tile grid plus view bobbing.

use std::f32::consts::TAU;

use glam::{Vec2, vec2};

use crate::{
    config::PlayerConfig,
    sim::InputCmd,
    world::{Camera, TileMap},
};

const DIAGONAL: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Bob phase wraps back to zero past this many radians.
const BOB_PHASE_LIMIT: f32 = TAU * 100.0;

/// Idle bob decays by this factor per update until it drops below
/// [`BOB_SETTLE`].
const BOB_DECAY: f32 = 0.8;
const BOB_SETTLE: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct Player {
    camera: Camera,
    bob_phase: f32,
    moving: bool,
    /// Centre plus eight points on the collision circle.
    probes: [Vec2; 8],
}

impl Player {
    pub fn new(pos: Vec2, yaw: f32, collision_radius: f32) -> Self {
        let r = collision_radius;
        let d = r * DIAGONAL;
        Self {
            camera: Camera::new(pos, yaw),
            bob_phase: 0.0,
            moving: false,
            probes: [
                vec2(r, 0.0),
                vec2(-r, 0.0),
                vec2(0.0, r),
                vec2(0.0, -r),
                vec2(d, d),
                vec2(-d, d),
                vec2(d, -d),
                vec2(-d, -d),
            ],
        }
    }

    /// View-point handed to the renderer (position, yaw and bob).
    #[inline]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.camera.pos()
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// True if the player's collision circle at `p` touches a wall.
    pub fn collides(&self, p: Vec2, map: &TileMap) -> bool {
        map.is_wall(p) || self.probes.iter().any(|&o| map.is_wall(p + o))
    }

    /// Move by `delta`, sliding along walls: full move, else X only, then Y.
    pub fn try_move(&mut self, delta: Vec2, map: &TileMap) {
        let pos = self.pos();
        let target = pos + delta;
        if !self.collides(target, map) {
            self.camera.set_pos(target);
            return;
        }
        let mut p = pos;
        if !self.collides(vec2(target.x, p.y), map) {
            p.x = target.x;
        }
        if !self.collides(vec2(p.x, target.y), map) {
            p.y = target.y;
        }
        self.camera.set_pos(p);
    }

    /// Turn by a horizontal mouse delta in pixels.
    pub fn look(&mut self, dx: f32, cfg: &PlayerConfig) {
        if dx != 0.0 {
            self.camera.turn((dx * cfg.mouse_sensitivity).to_radians());
        }
    }

    /// One simulation step of `dt` seconds.
    pub fn update(&mut self, cmd: &InputCmd, dt: f32, map: &TileMap, cfg: &PlayerConfig) {
        if cmd.turn != 0.0 {
            self.camera.turn(cmd.turn * cfg.turn_speed * dt);
        }

        let mut speed = cfg.move_speed * dt;
        if cmd.run {
            speed *= cfg.sprint_multiplier;
        }
        let fwd = self.camera.forward();
        let right = self.camera.right();
        let mut delta = (fwd * cmd.forward + right * cmd.strafe) * speed;
        // diagonal input is no faster than straight input
        if delta.length() > speed {
            delta = delta.normalize_or_zero() * speed;
        }

        self.moving = cmd.is_moving();
        if delta != Vec2::ZERO {
            self.try_move(delta, map);
        }
        self.update_bob(dt, cmd.run, cfg);
    }

    fn update_bob(&mut self, dt: f32, sprinting: bool, cfg: &PlayerConfig) {
        if self.moving {
            let mut freq = cfg.bob_frequency;
            if sprinting {
                freq *= cfg.sprint_bob_multiplier;
            }
            self.bob_phase += freq * dt;
            if self.bob_phase > BOB_PHASE_LIMIT {
                self.bob_phase = 0.0;
            }
            self.camera.set_bob((self.bob_phase * TAU).sin() * cfg.bob_amplitude);
        } else if self.camera.bob().abs() > BOB_SETTLE {
            self.camera.set_bob(self.camera.bob() * BOB_DECAY);
        } else {
            self.camera.set_bob(0.0);
            self.bob_phase = 0.0;
        }
    }
}
