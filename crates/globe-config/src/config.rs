//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Tile quadtree settings.
    pub tiles: TilesConfig,
    /// Camera and planet settings used by the demo driver.
    pub camera: CameraConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Tile quadtree traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilesConfig {
    /// Deepest level a tile may be split to.
    pub max_level: u32,
    /// Width in texels of the imagery applied to one tile.
    pub tile_texture_width: u32,
    /// Height in texels of the imagery applied to one tile.
    pub tile_texture_height: u32,
    /// Limit how many tiles may split in a single frame.
    pub use_split_budget: bool,
    /// Render a tile as-is until its texture is final before refining it.
    pub incremental_tile_quality: bool,
    /// Draw the tessellator's debug wireframe on top of every rendered tile.
    pub render_debug: bool,
    /// Number of top-level tiles along the latitude axis.
    pub top_sector_splits_by_latitude: u32,
    /// Number of top-level tiles along the longitude axis.
    pub top_sector_splits_by_longitude: u32,
    /// Maximum number of frontier rounds per frame.
    pub max_frontier_iterations: usize,
    /// Wait for the top-level tiles to be fully texturized before the first frame.
    pub force_first_level_tiles_render_on_start: bool,
}

/// Camera and planet configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Planet radius in meters.
    pub planet_radius_m: f64,
    /// Altitude of the first demo frame, in meters.
    pub start_altitude_m: f64,
    /// Altitude of the last demo frame, in meters.
    pub end_altitude_m: f64,
    /// Number of frames the demo renders.
    pub frames: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            max_level: 17,
            tile_texture_width: 256,
            tile_texture_height: 256,
            use_split_budget: true,
            incremental_tile_quality: false,
            render_debug: false,
            top_sector_splits_by_latitude: 2,
            top_sector_splits_by_longitude: 4,
            max_frontier_iterations: 64,
            force_first_level_tiles_render_on_start: true,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            fov_y_degrees: 60.0,
            planet_radius_m: 6_378_137.0,
            start_altitude_m: 20_000_000.0,
            end_altitude_m: 10_000.0,
            frames: 120,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl TilesConfig {
    /// Reject settings no tile layout can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tile_texture_width", u64::from(self.tile_texture_width)),
            ("tile_texture_height", u64::from(self.tile_texture_height)),
            (
                "top_sector_splits_by_latitude",
                u64::from(self.top_sector_splits_by_latitude),
            ),
            (
                "top_sector_splits_by_longitude",
                u64::from(self.top_sector_splits_by_longitude),
            ),
            ("max_frontier_iterations", self.max_frontier_iterations as u64),
        ];
        match positive.into_iter().find(|(_, value)| *value == 0) {
            Some((field, value)) => Err(ConfigError::InvalidTiles { field, value }),
            None => Ok(()),
        }
    }
}

/// Platform config directory for this application (`<config>/globe`).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("globe"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.tiles.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.tiles.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
