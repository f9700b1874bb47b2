//! Headless globe demo: flies a camera from orbit toward the surface and logs
//! how the tile quadtree refines.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p globe-demo -- --frames 300 --log-level debug`.

mod imagery;
mod sphere;

use std::error::Error;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use glam::{DVec3, UVec2};
use globe_config::{CameraConfig, CliArgs, Config, default_config_dir};
use globe_geo::{Camera, Geodetic2D, Geodetic3D, Sector};
use globe_tiles::{TileRenderer, TilesRenderParameters};
use tracing::{info, warn};

use crate::imagery::SimulatedImagery;
use crate::sphere::{DrawCounter, SphereTessellator};

/// Point the camera descends toward.
const LANDING_SITE: Geodetic2D = Geodetic2D::from_degrees(40.4, -3.7);

/// Frames between an image request and its delivery.
const IMAGERY_LATENCY_FRAMES: u64 = 3;

/// Simulated frame time, so the split budget sees realistic intervals.
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Frames to wait for the first-level imagery before giving up.
const MAX_STARTUP_FRAMES: u32 = 100;

/// Camera altitude at `frame`, descending geometrically from the start to
/// the end altitude.
fn altitude_at(config: &CameraConfig, frame: u32) -> f64 {
    if config.frames <= 1 {
        return config.end_altitude_m;
    }
    let t = f64::from(frame) / f64::from(config.frames - 1);
    let start = config.start_altitude_m.max(1.0);
    let end = config.end_altitude_m.max(1.0);
    start * (end / start).powf(t)
}

/// Camera above the landing site at `altitude`, looking at the planet center.
fn camera_at(config: &CameraConfig, altitude: f64) -> Camera {
    let eye = Geodetic3D::new(LANDING_SITE, altitude).to_cartesian(config.planet_radius_m);
    Camera::look_at(
        eye,
        DVec3::ZERO,
        DVec3::Z,
        config.fov_y_degrees.to_radians(),
        UVec2::new(config.viewport_width, config.viewport_height),
    )
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .ok_or("failed to resolve config directory")?;

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    globe_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let draws = DrawCounter::default();
    let tessellator = SphereTessellator::new(config.camera.planet_radius_m, draws.clone());
    let imagery = Rc::new(SimulatedImagery::new(
        config.camera.planet_radius_m,
        IMAGERY_LATENCY_FRAMES,
        draws.clone(),
    ));
    let mut renderer = TileRenderer::new(
        TilesRenderParameters::from(&config.tiles),
        Box::new(tessellator),
        Some(imagery.clone()),
        &Sector::FULL_SPHERE,
    )?;
    info!(
        top_level_tiles = renderer.top_level_tiles().len(),
        max_level = renderer.parameters().max_level,
        split_budget = renderer.parameters().use_split_budget,
        "tile renderer ready"
    );

    let start_camera = camera_at(&config.camera, altitude_at(&config.camera, 0));
    let mut startup_frames = 0;
    while !renderer.is_ready_to_render(&start_camera) {
        if startup_frames >= MAX_STARTUP_FRAMES {
            warn!(startup_frames, "first-level imagery still missing, rendering anyway");
            break;
        }
        startup_frames += 1;
        imagery.advance_frame();
    }
    info!(startup_frames, "first-level tiles textured");

    for frame in 0..config.camera.frames {
        imagery.advance_frame();
        let altitude = altitude_at(&config.camera, frame);
        let camera = camera_at(&config.camera, altitude);

        let stats = renderer.render(&camera);
        info!(
            frame,
            altitude_km = altitude / 1000.0,
            visible = stats.tiles_visible(),
            rendered = stats.tiles_rendered(),
            splits = stats.splits_count_in_frame(),
            deepest_level = ?stats.deepest_rendered_level(),
            draws = draws.take(),
            pending_images = imagery.pending_requests(),
            "frame"
        );

        std::thread::sleep(FRAME_TIME);
    }

    if let Some(tile) = renderer.find_deepest_tile_containing(&LANDING_SITE) {
        info!(
            tile = %tile.key(),
            sector = %tile.sector(),
            textured = tile.is_texture_solved(),
            "tile under the landing site"
        );
    }

    renderer.prune_all();
    info!(
        cancelled_images = imagery.cancelled_requests(),
        pending_images = imagery.pending_requests(),
        "tile tree collapsed"
    );
    Ok(())
}
