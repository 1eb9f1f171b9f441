use glam::vec2;
use proptest::prelude::*;

use yaray_rs::{
    renderer::{
        lighting::{LightFlags, Lighting, shade, wrap_channel},
        raycast::{Side, cast, fract01},
        software::{SpriteRecord, classify, occluded, project_sprites, Surface},
        view::{Screen, Viewer},
    },
    world::{Camera, Rgb, TileId, TileMap},
};

const MAX_DEPTH: f32 = 40.0;

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

proptest! {
    #[test]
    fn distance_is_bounded(x in 1.01f32..7.99, y in 1.01f32..7.99, angle in -10.0f32..10.0) {
        let hit = cast(vec2(x, y), angle, &boxed(9), MAX_DEPTH);
        prop_assert!((0.0..=MAX_DEPTH).contains(&hit.distance));
        prop_assert!(matches!(hit.side, Side::Vertical | Side::Horizontal));
        prop_assert!(hit.tile > 0);
    }

    #[test]
    fn axis_aligned_rays_terminate(x in 1.01f32..7.99, y in 1.01f32..7.99, quadrant in 0u8..4) {
        let angle = quadrant as f32 * std::f32::consts::FRAC_PI_2;
        let hit = cast(vec2(x, y), angle, &boxed(9), MAX_DEPTH);
        prop_assert!(hit.distance.is_finite());
        prop_assert!(hit.distance <= 8.0);
    }

    #[test]
    fn open_field_never_loops(x in 0.0f32..1000.0, y in 0.0f32..3.0, angle in -7.0f32..7.0) {
        let field = TileMap::new(vec![vec![0; 1000]; 3]).unwrap();
        let hit = cast(vec2(x, y), angle, &field, MAX_DEPTH);
        prop_assert!((0.0..=MAX_DEPTH).contains(&hit.distance));
    }

    #[test]
    fn face_fraction_in_unit_interval(x in 1.01f32..7.99, y in 1.01f32..7.99, angle in -10.0f32..10.0) {
        let origin = vec2(x, y);
        let hit = cast(origin, angle, &boxed(9), MAX_DEPTH);
        let f = hit.face_fraction(origin);
        prop_assert!((0.0..1.0).contains(&f));
    }

    #[test]
    fn fract01_in_unit_interval(v in -1e6f32..1e6) {
        let f = fract01(v);
        prop_assert!((0.0..1.0).contains(&f));
    }

    #[test]
    fn falloff_non_increasing(a in 0.0f32..200.0, b in 0.0f32..200.0, intensity in 0.1f32..5.0) {
        let l = Lighting { flags: LightFlags::FALLOFF, intensity, ..Lighting::default() };
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(l.falloff(near) >= l.falloff(far));
    }

    #[test]
    fn falloff_disabled_is_one(d in 0.0f32..1000.0) {
        prop_assert_eq!(Lighting::unlit().falloff(d), 1.0);
    }

    #[test]
    fn channel_wrap_matches_double_modulo(v in -100_000.0f32..100_000.0) {
        let i = v as i32;
        prop_assert_eq!(wrap_channel(v) as i32, ((i % 256) + 256) % 256);
    }

    #[test]
    fn shading_by_one_is_identity(r: u8, g: u8, b: u8) {
        prop_assert_eq!(shade(Rgb::new(r, g, b), 1.0), Rgb::new(r, g, b));
    }

    #[test]
    fn horizon_partition(y in 0.0f32..1000.0, centre in 0.0f32..1000.0) {
        let p = y - centre;
        match classify(y, centre) {
            Surface::Floor => prop_assert!(p > 1.0),
            Surface::Ceiling => prop_assert!(p < -1.0),
            Surface::Horizon => prop_assert!(p.abs() <= 1.0),
        }
    }

    #[test]
    fn sprites_sorted_farthest_first(
        points in prop::collection::vec((0.5f32..30.0, -10.0f32..10.0), 2..24),
        yaw in -0.5f32..0.5,
    ) {
        let view = Viewer::new(
            Camera::new(vec2(0.0, 0.0), yaw),
            Screen::new(160, 120),
            70f32.to_radians(),
            MAX_DEPTH,
            1.0,
        );
        let recs: Vec<SpriteRecord> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| SpriteRecord { pos: vec2(x, y), texture: i as u16, occludable: false })
            .collect();
        let draws = project_sprites(&recs, &view, &Lighting::default(), &[MAX_DEPTH; 160], &[]);
        prop_assert!(draws.windows(2).all(|w| w[0].distance >= w[1].distance));
    }

    #[test]
    fn constant_depth_occlusion(wall in 0.5f32..50.0, sprite in 0.5f32..50.0, cols in 1usize..64) {
        let depth = vec![wall; cols];
        prop_assert_eq!(occluded(&depth, 0.0, cols as f32 - 1.0, sprite), wall < sprite);
    }
}
