use glam::Vec2;
use hecs::{Entity, World};
use smallvec::SmallVec;

use super::{Billboard, Collectible, Monster, Position};
use crate::{config::MonsterConfig, renderer::SpriteRecord, world::TextureId};

/* ── Spawning ─────────────────────────────────────────────────────── */

/// Monster texture ids are handed out round-robin from `texture_ids`.
pub fn spawn_monster(world: &mut World, pos: Vec2, texture: TextureId) -> Entity {
    world.spawn((
        Position(pos),
        Billboard {
            texture,
            occludable: false,
        },
        Monster::default(),
    ))
}

pub fn spawn_collectible(world: &mut World, pos: Vec2, texture: TextureId) -> Entity {
    world.spawn((
        Position(pos),
        Billboard {
            texture,
            occludable: true,
        },
        Collectible,
    ))
}

/// Cycle through `ids`, falling back to texture 0 for an empty list.
#[inline]
pub fn pick_texture(ids: &[TextureId], n: usize) -> TextureId {
    if ids.is_empty() { 0 } else { ids[n % ids.len()] }
}

/* ── Monster AI ───────────────────────────────────────────────────── */

/// Walk every monster straight towards `target`.
pub fn chase(world: &mut World, target: Vec2, dt: f32, cfg: &MonsterConfig) {
    for (_, (pos, monster)) in world.query_mut::<(&mut Position, &Monster)>() {
        let to = target - pos.0;
        let dist = to.length();
        if dist > 0.0 {
            let step = cfg.move_speed * monster.speed_multiplier * dt;
            pos.0 += to / dist * step;
        }
    }
}

/// Apply the end-game speed boost to every monster.
pub fn enrage(world: &mut World, multiplier: f32) {
    for (_, monster) in world.query_mut::<&mut Monster>() {
        monster.speed_multiplier = multiplier;
    }
}

/// True if any monster is within `radius` of `target`.
pub fn caught(world: &World, target: Vec2, radius: f32) -> bool {
    let r2 = radius * radius;
    world
        .query::<(&Position, &Monster)>()
        .iter()
        .any(|(_, (pos, _))| pos.0.distance_squared(target) < r2)
}

/// Distance to the nearest monster, `None` when there are none.
pub fn nearest_monster(world: &World, target: Vec2) -> Option<f32> {
    world
        .query::<(&Position, &Monster)>()
        .iter()
        .map(|(_, (pos, _))| pos.0.distance(target))
        .min_by(f32::total_cmp)
}

/* ── Pick-ups ─────────────────────────────────────────────────────── */

/// Despawn collectibles within `radius` of `target`; returns how many.
pub fn collect(world: &mut World, target: Vec2, radius: f32) -> usize {
    let r2 = radius * radius;
    let taken: SmallVec<[Entity; 4]> = world
        .query::<(&Position, &Collectible)>()
        .iter()
        .filter(|(_, (pos, _))| pos.0.distance_squared(target) < r2)
        .map(|(e, _)| e)
        .collect();
    for &e in &taken {
        // just returned by the query, so still alive
        let despawned = world.despawn(e);
        debug_assert!(despawned.is_ok());
    }
    taken.len()
}

/* ── Rendering hand-off ───────────────────────────────────────────── */

/// Rebuild `out` with one record per billboard entity.
pub fn sprite_records(world: &World, out: &mut Vec<SpriteRecord>) {
    out.clear();
    out.extend(
        world
            .query::<(&Position, &Billboard)>()
            .iter()
            .map(|(_, (pos, b))| SpriteRecord {
                pos: pos.0,
                texture: b.texture,
                occludable: b.occludable,
            }),
    );
}

/// Positions of every billboard (for the minimap).
pub fn billboard_positions(world: &World, out: &mut Vec<Vec2>) {
    out.clear();
    out.extend(world.query::<(&Position, &Billboard)>().iter().map(|(_, (p, _))| p.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    #[test]
    fn monsters_close_in() {
        let mut world = World::new();
        spawn_monster(&mut world, vec2(0.0, 0.0), 0);
        let cfg = MonsterConfig::default();
        chase(&mut world, vec2(10.0, 0.0), 1.0, &cfg);
        assert!((nearest_monster(&world, vec2(10.0, 0.0)).unwrap() - 8.5).abs() < 1e-5);

        enrage(&mut world, 2.0);
        chase(&mut world, vec2(10.0, 0.0), 1.0, &cfg);
        assert!((nearest_monster(&world, vec2(10.0, 0.0)).unwrap() - 5.5).abs() < 1e-5);
    }

    #[test]
    fn caught_within_radius() {
        let mut world = World::new();
        assert!(!caught(&world, Vec2::ZERO, 0.3));
        assert_eq!(nearest_monster(&world, Vec2::ZERO), None);
        spawn_monster(&mut world, vec2(0.2, 0.0), 0);
        assert!(caught(&world, Vec2::ZERO, 0.3));
        assert!(!caught(&world, vec2(1.0, 0.0), 0.3));
    }

    #[test]
    fn collect_despawns() {
        let mut world = World::new();
        spawn_collectible(&mut world, vec2(1.0, 1.0), 15);
        spawn_collectible(&mut world, vec2(1.2, 1.0), 15);
        spawn_collectible(&mut world, vec2(5.0, 5.0), 15);
        spawn_monster(&mut world, vec2(1.0, 1.1), 3);

        assert_eq!(collect(&mut world, vec2(1.1, 1.0), 0.5), 2);
        assert_eq!(collect(&mut world, vec2(1.1, 1.0), 0.5), 0);

        let mut recs = Vec::new();
        sprite_records(&world, &mut recs);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().any(|r| r.texture == 15 && r.occludable));
        assert!(recs.iter().any(|r| r.texture == 3 && !r.occludable));
    }

    #[test]
    fn texture_round_robin() {
        assert_eq!(pick_texture(&[4, 5], 0), 4);
        assert_eq!(pick_texture(&[4, 5], 3), 5);
        assert_eq!(pick_texture(&[], 7), 0);
    }
}
