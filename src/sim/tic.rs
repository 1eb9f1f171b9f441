use glam::Vec2;
use hecs::World;
use std::time::{Duration, Instant};
use tracing::info;

use super::{InputCmd, Player, systems};
use crate::{
    config::Settings,
    renderer::SpriteRecord,
    world::{MapData, TileMap},
};

pub const SIM_FPS: u32 = 60;
pub const DT: f32 = 1.0 / SIM_FPS as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / SIM_FPS as u64);

/// Where the round stands after a tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    /// A monster reached the player.
    Caught,
}

/// Owns the ECS world and the player, and drives all game-logic systems.
pub struct TicRunner {
    world: World,
    player: Player,
    settings: Settings,
    collected: usize,
    status: Status,
    last: Instant,
}

impl TicRunner {
    /// Spawn the player and every entity marker of `data`.
    pub fn new(data: &MapData, settings: &Settings) -> Self {
        let mut world = World::new();
        for (i, &pos) in data.monsters.iter().enumerate() {
            let tex = systems::pick_texture(&settings.monster.texture_ids, i);
            systems::spawn_monster(&mut world, pos, tex);
        }
        for (i, &pos) in data.collectibles.iter().enumerate() {
            let tex = systems::pick_texture(&settings.collectible.texture_ids, i);
            systems::spawn_collectible(&mut world, pos, tex);
        }
        Self {
            world,
            player: Player::new(data.spawn, 0.0, settings.player.collision_radius),
            settings: settings.clone(),
            collected: 0,
            status: Status::Playing,
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn collected(&self) -> usize {
        self.collected
    }

    /// Distance from the player to the nearest monster.
    pub fn nearest_monster(&self) -> Option<f32> {
        systems::nearest_monster(&self.world, self.player.pos())
    }

    pub fn sprite_records(&self, out: &mut Vec<SpriteRecord>) {
        systems::sprite_records(&self.world, out);
    }

    pub fn billboard_positions(&self, out: &mut Vec<Vec2>) {
        systems::billboard_positions(&self.world, out);
    }

    /// Mouse look, applied once per frame rather than per tic.
    pub fn look(&mut self, dx: f32) {
        if self.status == Status::Playing {
            self.player.look(dx, &self.settings.player);
        }
    }

    /// Forget time spent while not pumping (e.g. paused).
    pub fn resync(&mut self) {
        self.last = Instant::now();
    }

    /// Advance enough tics to synchronise simulation with real time.
    pub fn pump(&mut self, map: &TileMap, cmd: &InputCmd) -> Status {
        while self.last.elapsed() >= TIC {
            self.tick(map, cmd, DT);
            self.last += TIC;
        }
        self.status
    }

    /* ---------------------------------------------------------------- */
    /* one fixed-rate game tic                                          */
    /* ---------------------------------------------------------------- */
    pub fn tick(&mut self, map: &TileMap, cmd: &InputCmd, dt: f32) {
        if self.status != Status::Playing {
            return;
        }
        self.player.update(cmd, dt, map, &self.settings.player);
        let pos = self.player.pos();

        systems::chase(&mut self.world, pos, dt, &self.settings.monster);

        let got = systems::collect(&mut self.world, pos, self.settings.collectible.collection_distance);
        if got > 0 {
            let total = self.settings.collectible.total;
            let before = self.collected;
            self.collected += got;
            info!(collected = self.collected, total, "collectible picked up");
            if before < total && self.collected >= total {
                info!("all collectibles found, monsters enraged");
                systems::enrage(&mut self.world, self.settings.monster.speed_boost);
            }
        }

        if systems::caught(&self.world, pos, self.settings.monster.collision_distance) {
            info!(x = pos.x, y = pos.y, "caught by a monster");
            self.status = Status::Caught;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::parse_map;

    const LEVEL: &str = "\
1111111111
1P0C00000M
1000000001
1111111111
";

    #[test]
    fn spawns_markers() {
        let data = parse_map(LEVEL).unwrap();
        let runner = TicRunner::new(&data, &Settings::default());
        let mut recs = Vec::new();
        runner.sprite_records(&mut recs);
        assert_eq!(recs.len(), 2);
        assert_eq!(runner.player().pos(), data.spawn);
        assert!((runner.nearest_monster().unwrap() - 8.0).abs() < 1e-5);
    }

    #[test]
    fn pick_up_then_get_caught() {
        let data = parse_map(LEVEL).unwrap();
        let mut s = Settings::default();
        s.collectible.total = 1;
        let mut runner = TicRunner::new(&data, &s);
        let forward = InputCmd {
            forward: 1.0,
            ..Default::default()
        };

        let mut ticks = 0;
        while runner.collected() == 0 && ticks < 200 {
            runner.tick(&data.map, &forward, DT);
            ticks += 1;
        }
        assert_eq!(runner.collected(), 1);

        let idle = InputCmd::default();
        for _ in 0..2000 {
            runner.tick(&data.map, &idle, DT);
            if runner.status() == Status::Caught {
                break;
            }
        }
        assert_eq!(runner.status(), Status::Caught);
    }
}
