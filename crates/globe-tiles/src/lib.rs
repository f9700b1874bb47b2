//! Adaptive tile quadtree for planet rendering.
//!
//! Every frame the [`TileRenderer`] walks the visible frontier of the tile
//! quadtree, rendering tiles that are detailed enough, splitting the ones that
//! are not, and pruning subtrees that left the view. Mesh generation and
//! imagery are supplied by a [`TileTessellator`] and an optional
//! [`TileTexturizer`].

mod context;
mod error;
mod mesh;
mod parameters;
mod renderer;
mod requests;
mod statistics;
mod texturizer;
mod tile;
mod tile_key;
mod timer;

#[cfg(test)]
mod test_support;

pub use context::TileRenderContext;
pub use error::TilesError;
pub use mesh::{Mesh, TileTessellator};
pub use parameters::TilesRenderParameters;
pub use renderer::{TileRenderer, create_top_level_tiles};
pub use requests::{ImageDownloader, ImageRequestTracker, RequestId};
pub use statistics::TilesStatistics;
pub use texturizer::{TileTexturizer, Texturized};
pub use tile::{MIN_SPLIT_INTERVAL_MS, SPLIT_TEXTURE_FACTOR, Tile};
pub use tile_key::TileKey;
pub use timer::{SplitTimer, Stopwatch};
