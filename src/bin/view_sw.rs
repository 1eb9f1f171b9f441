//! Playable software-rendered view of a tile map.
//!
//! ```bash
//! cargo run --release -- maps/level1.txt --config settings.ron
//! ```
//!
//! W/S move, A/D strafe, ←/→ or the mouse turn, Shift sprints,
//! M toggles the minimap, P pauses, Esc quits. `RUST_LOG=debug` shows per-frame spans.

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use yaray_rs::{
    config::Settings,
    renderer::{
        Renderer, Scene, SpriteRecord,
        lighting::glitch_intensity,
        software::{RenderParams, Software},
    },
    sim::{InputCmd, Status, TicRunner},
    world::{TextureAtlas, load_map},
};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Level file (digit grid with P/M/C markers)
    #[arg(value_name = "MAP")]
    map: PathBuf,

    /// RON settings file; defaults are used when absent
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Texture directory (overrides the settings file)
    #[arg(long, value_name = "DIR")]
    textures: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Screen columns per wall ray (overrides the settings file)
    #[arg(long)]
    ray_divisor: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let opts = Opts::parse();

    let mut settings = match &opts.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(w) = opts.width {
        settings.display.width = w;
    }
    if let Some(h) = opts.height {
        settings.display.height = h;
    }
    if let Some(d) = opts.ray_divisor {
        settings.render.wall_ray_divisor = d;
    }
    if let Some(dir) = &opts.textures {
        settings.assets.texture_dir = dir.display().to_string();
    }
    settings.validate()?;

    let data = load_map(&opts.map).with_context(|| format!("loading {}", opts.map.display()))?;
    let atlas = TextureAtlas::load_dir(&settings.assets.texture_dir, settings.assets.texture_size)?;
    let mut sim = TicRunner::new(&data, &settings);
    let mut renderer = Software::new(RenderParams::from(&settings));

    let (w, h) = (settings.display.width, settings.display.height);
    let mut win = Window::new(&settings.display.title, w, h, WindowOptions::default())?;
    win.set_target_fps(settings.display.fps);

    let mut show_minimap = settings.minimap.enabled;
    let mut sprites: Vec<SpriteRecord> = Vec::new();
    let mut dots = Vec::new();
    let mut announced = false;
    let mut paused = false;
    let mut last_mouse: Option<f32> = None;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* --------------- build one InputCmd per frame --------------------- */
        let mut cmd = InputCmd::default();
        if win.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if win.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if win.is_key_down(Key::A) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::D) {
            cmd.strafe += 1.0;
        }
        if win.is_key_down(Key::Left) {
            cmd.turn -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.turn += 1.0;
        }
        cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            show_minimap = !show_minimap;
        }
        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            paused = !paused;
            if !paused {
                sim.resync();
            }
            info!(paused, "pause toggled");
        }

        // horizontal mouse motion since the previous frame
        let mouse_x = win.get_mouse_pos(MouseMode::Pass).map(|(x, _)| x);
        if let (Some(prev), Some(x)) = (last_mouse, mouse_x) {
            if !paused {
                sim.look(x - prev);
            }
        }
        last_mouse = mouse_x;

        if !paused && sim.pump(&data.map, &cmd) == Status::Caught && !announced {
            warn!(collected = sim.collected(), "game over");
            win.set_title(&format!("{} - GAME OVER", settings.display.title));
            announced = true;
        }

        /* --------------- draw --------------------------------------------- */
        sim.sprite_records(&mut sprites);
        let glitch = glitch_intensity(
            &settings.glitch,
            settings.render.glitch_intensity,
            sim.nearest_monster(),
        );
        let camera = sim.player().camera();
        let scene = Scene {
            map: &data.map,
            camera,
            sprites: &sprites,
            glitch,
        };

        renderer.begin_frame(w, h);
        renderer.draw_scene(&scene, &atlas);
        if show_minimap {
            sim.billboard_positions(&mut dots);
            renderer.draw_minimap(&settings.minimap, &data.map, camera.pos(), camera.forward(), &dots);
        }
        let mut shown = Ok(());
        renderer.end_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        // ─────────── report every ~3 s ────────────────────
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            let fps = 1000.0 / avg_ms;
            info!("avg render: {avg_ms:.2} ms  ({fps:.1} FPS)");
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
