use glam::Vec2;
use smallvec::SmallVec;
use tracing::{debug, debug_span};

use crate::{
    config::{MinimapConfig, Settings},
    renderer::{
        Renderer, Rgba, Scene,
        lighting::Lighting,
        software::{
            minimap::Minimap,
            planes::{plane_extent, render_planes, upscale},
            sprites::{SpriteDraw, blit_sprites, project_sprites},
            walls::{WallSlice, cast_walls, raster_walls, write_depth},
        },
        view::{Screen, Viewer},
    },
    world::{TextureAtlas, TextureId, TileMap},
};

/// Frame-independent render settings.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Radians.
    pub fov: f32,
    pub max_depth: f32,
    pub height_factor: f32,
    /// Screen columns per wall ray.
    pub ray_divisor: usize,
    /// Plane buffer is `screen / plane_scale`.
    pub plane_scale: usize,
    pub lighting: Lighting,
    pub occludable: SmallVec<[TextureId; 4]>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for RenderParams {
    fn from(s: &Settings) -> Self {
        let r = &s.render;
        let mut occludable: SmallVec<[TextureId; 4]> = r.occludable_textures.iter().copied().collect();
        for id in &s.collectible.texture_ids {
            if !occludable.contains(id) {
                occludable.push(*id);
            }
        }
        Self {
            fov: r.fov_deg.to_radians(),
            max_depth: r.max_depth,
            height_factor: r.wall_height_factor,
            ray_divisor: r.wall_ray_divisor.max(1),
            plane_scale: r.plane_scale.max(1),
            lighting: Lighting::from(&s.lighting),
            occludable,
        }
    }
}

/// CPU back-end: owns every per-frame buffer and reuses them across frames.
#[derive(Default)]
pub struct Software {
    pub params: RenderParams,
    pub scratch: Vec<Rgba>,
    pub plane: Vec<Rgba>,
    pub depth: Vec<f32>,
    pub slices: Vec<WallSlice>,
    pub draws: Vec<SpriteDraw>,
    pub minimap: Minimap,

    pub width: usize,
    pub height: usize,
    pub plane_w: usize,
    pub plane_h: usize,
}

impl Software {
    pub fn new(params: RenderParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Wall distance per screen column of the last frame.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Sprites drawn in the last frame, farthest first.
    pub fn draws(&self) -> &[SpriteDraw] {
        &self.draws
    }

    /// Overlay the minimap on the current frame.
    pub fn draw_minimap(
        &mut self,
        cfg: &MinimapConfig,
        map: &TileMap,
        player: Vec2,
        heading: Vec2,
        entities: &[Vec2],
    ) {
        self.minimap.draw(
            &mut self.scratch,
            self.width,
            self.height,
            cfg,
            map,
            player,
            heading,
            entities,
        );
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.plane_w = plane_extent(w, self.params.plane_scale);
            self.plane_h = plane_extent(h, self.params.plane_scale);
            self.scratch.resize(w * h, 0);
            self.plane.resize(self.plane_w * self.plane_h, 0);
            self.depth.resize(w, self.params.max_depth);
            debug!(w, h, plane_w = self.plane_w, plane_h = self.plane_h, "frame buffers resized");
        }
        // horizon band stays black
        self.plane.fill(0);
        self.draws.clear();
    }

    fn draw_scene(&mut self, scene: &Scene<'_>, atlas: &TextureAtlas) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let _span = debug_span!("draw_scene").entered();
        let p = &self.params;
        let view = Viewer::new(
            scene.camera,
            Screen::new(self.width, self.height),
            p.fov,
            p.max_depth,
            p.height_factor,
        );

        // floor/ceiling and wall rays are independent
        let (plane, plane_w, slices) = (&mut self.plane, self.plane_w, &mut self.slices);
        rayon::join(
            || {
                render_planes(
                    plane,
                    plane_w,
                    p.plane_scale,
                    &view,
                    scene.map,
                    atlas,
                    &p.lighting,
                    scene.glitch,
                )
            },
            || cast_walls(&view, scene.map, atlas, &p.lighting, p.ray_divisor, slices),
        );

        write_depth(&self.slices, &mut self.depth, p.max_depth);
        upscale(&self.plane, self.plane_w, self.plane_h, p.plane_scale, &mut self.scratch, self.width);
        raster_walls(&mut self.scratch, &view, &self.slices, atlas, &p.lighting, scene.glitch);

        // sprites only after the depth buffer is complete
        self.draws = project_sprites(scene.sprites, &view, &p.lighting, &self.depth, &p.occludable);
        blit_sprites(&mut self.scratch, &view, &self.draws, atlas);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::software::SpriteRecord,
        world::{Camera, Rgb, Texture, TextureSet, TileId},
    };
    use glam::vec2;

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

    fn atlas() -> TextureAtlas {
        let set = |c| TextureSet::new(Texture::new(4, vec![c; 16]).unwrap());
        TextureAtlas {
            walls: set(Rgb::new(200, 0, 0)),
            floors: set(Rgb::new(0, 200, 0)),
            ceilings: set(Rgb::new(0, 0, 200)),
            sprites: set(Rgb::new(255, 255, 0)),
        }
    }

    fn unlit_params(plane_scale: usize, ray_divisor: usize) -> RenderParams {
        let mut s = Settings::default();
        s.lighting.falloff = false;
        s.lighting.vignette = false;
        s.render.plane_scale = plane_scale;
        s.render.wall_ray_divisor = ray_divisor;
        RenderParams::from(&s)
    }

    fn render(sw: &mut Software, sprites: &[SpriteRecord]) -> Vec<Rgba> {
        let map = boxed(9);
        let scene = Scene {
            map: &map,
            camera: Camera::new(vec2(4.5, 4.5), 0.0),
            sprites,
            glitch: 0.0,
        };
        sw.begin_frame(64, 48);
        sw.draw_scene(&scene, &atlas());
        let mut out = Vec::new();
        sw.end_frame(|fb, w, h| {
            assert_eq!((w, h), (64, 48));
            out = fb.to_vec();
        });
        out
    }

    #[test]
    fn full_frame_layers() {
        let mut sw = Software::new(unlit_params(1, 1));
        let fb = render(&mut sw, &[]);
        let w = 64;
        // wall at the centre, ceiling at the top, floor at the bottom
        assert_eq!(fb[24 * w + 32], Rgb::new(200, 0, 0).to_u32());
        assert_eq!(fb[w + 32], Rgb::new(0, 0, 200).to_u32());
        assert_eq!(fb[46 * w + 32], Rgb::new(0, 200, 0).to_u32());
        assert_eq!(sw.depth().len(), 64);
        assert!((sw.depth()[32] - 3.5).abs() < 0.05);
    }

    #[test]
    fn downscaled_planes_and_wide_rays() {
        let mut sw = Software::new(unlit_params(2, 4));
        let fb = render(&mut sw, &[]);
        assert_eq!((sw.plane_w, sw.plane_h), (32, 24));
        assert_eq!(sw.slices.len(), 16);
        assert_eq!(fb[46 * 64 + 5], Rgb::new(0, 200, 0).to_u32());
        assert!(sw.depth().iter().all(|&d| d < 100.0));
    }

    #[test]
    fn sprite_in_front_of_wall() {
        let mut sw = Software::new(unlit_params(1, 1));
        let sprites = [SpriteRecord {
            pos: vec2(6.5, 4.5),
            texture: 0,
            occludable: false,
        }];
        let fb = render(&mut sw, &sprites);
        assert_eq!(sw.draws().len(), 1);
        assert_eq!(fb[24 * 64 + 32], Rgb::new(255, 255, 0).to_u32());
    }

    #[test]
    fn collectible_ids_are_occludable() {
        let p = RenderParams::default();
        assert!(p.occludable.contains(&15));
        assert!(!p.occludable.spilled());
    }
}
