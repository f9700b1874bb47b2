//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Globe demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "globe", about = "Adaptive globe tile renderer")]
pub struct CliArgs {
    /// Deepest tile level.
    #[arg(long)]
    pub max_level: Option<u32>,

    /// Enable or disable the per-frame split budget.
    #[arg(long)]
    pub split_budget: Option<bool>,

    /// Refine tiles only after their texture is final.
    #[arg(long)]
    pub incremental_quality: Option<bool>,

    /// Draw debug wireframes.
    #[arg(long)]
    pub render_debug: Option<bool>,

    /// Number of frames to render.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(level) = args.max_level {
            self.tiles.max_level = level;
        }
        if let Some(budget) = args.split_budget {
            self.tiles.use_split_budget = budget;
        }
        if let Some(incremental) = args.incremental_quality {
            self.tiles.incremental_tile_quality = incremental;
        }
        if let Some(debug) = args.render_debug {
            self.tiles.render_debug = debug;
        }
        if let Some(frames) = args.frames {
            self.camera.frames = frames;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
