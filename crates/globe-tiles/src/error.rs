//! Tile tree construction errors.

use globe_geo::Sector;

/// Errors raised while laying out the top-level tiles.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TilesError {
    /// The top sector must be split at least once along each axis.
    #[error("top sector splits must be positive, got {latitude} x {longitude}")]
    ZeroSplits { latitude: u32, longitude: u32 },

    /// The top sector spans no area.
    #[error("top sector {0} is degenerate")]
    DegenerateSector(Sector),
}
