//! Per-frame traversal parameters.

use globe_config::TilesConfig;

/// Read-only parameters of a tile traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesRenderParameters {
    /// Deepest level a tile may be split to.
    pub max_level: u32,
    /// Imagery width of one tile, in texels.
    pub tile_texture_width: u32,
    /// Imagery height of one tile, in texels.
    pub tile_texture_height: u32,
    /// Limit how many tiles may split per frame.
    pub use_split_budget: bool,
    /// Render a tile as-is until its texture is final.
    pub incremental_tile_quality: bool,
    /// Draw debug meshes of rendered tiles.
    pub render_debug: bool,
    pub top_sector_splits_by_latitude: u32,
    pub top_sector_splits_by_longitude: u32,
    /// Frontier rounds per frame before the remaining frontier renders as-is.
    pub max_frontier_iterations: usize,
    pub force_first_level_tiles_render_on_start: bool,
}

impl Default for TilesRenderParameters {
    fn default() -> Self {
        Self::from(&TilesConfig::default())
    }
}

impl From<&TilesConfig> for TilesRenderParameters {
    fn from(config: &TilesConfig) -> Self {
        Self {
            max_level: config.max_level,
            tile_texture_width: config.tile_texture_width,
            tile_texture_height: config.tile_texture_height,
            use_split_budget: config.use_split_budget,
            incremental_tile_quality: config.incremental_tile_quality,
            render_debug: config.render_debug,
            top_sector_splits_by_latitude: config.top_sector_splits_by_latitude,
            top_sector_splits_by_longitude: config.top_sector_splits_by_longitude,
            max_frontier_iterations: config.max_frontier_iterations,
            force_first_level_tiles_render_on_start: config
                .force_first_level_tiles_render_on_start,
        }
    }
}
