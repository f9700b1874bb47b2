//! Frame driver: walks the visible frontier of every top-level tile.

use std::rc::Rc;

use globe_geo::{Camera, Geodetic2D, Sector};
use tracing::debug;

use crate::{
    SplitTimer, Stopwatch, Tile, TileKey, TileRenderContext, TileTessellator, TileTexturizer,
    TilesError, TilesRenderParameters, TilesStatistics,
};

/// Divide `sector` into a `splits_by_latitude` x `splits_by_longitude` grid
/// of level-0 tiles keyed `(0, row, column)`, rows counted from the lower
/// latitude.
pub fn create_top_level_tiles(
    sector: &Sector,
    splits_by_latitude: u32,
    splits_by_longitude: u32,
    texturizer: Option<Rc<dyn TileTexturizer>>,
) -> Result<Vec<Tile>, TilesError> {
    if splits_by_latitude == 0 || splits_by_longitude == 0 {
        return Err(TilesError::ZeroSplits {
            latitude: splits_by_latitude,
            longitude: splits_by_longitude,
        });
    }
    if sector.is_degenerate() {
        return Err(TilesError::DegenerateSector(*sector));
    }

    let lower = sector.lower();
    let upper = sector.upper();
    let lat_at = |row: u32| {
        lower
            .latitude
            .lerp(upper.latitude, f64::from(row) / f64::from(splits_by_latitude))
    };
    let lon_at = |column: u32| {
        lower
            .longitude
            .lerp(upper.longitude, f64::from(column) / f64::from(splits_by_longitude))
    };

    let mut tiles = Vec::with_capacity((splits_by_latitude * splits_by_longitude) as usize);
    for row in 0..splits_by_latitude {
        for column in 0..splits_by_longitude {
            let tile_sector = Sector::new(
                Geodetic2D::new(lat_at(row), lon_at(column)),
                Geodetic2D::new(lat_at(row + 1), lon_at(column + 1)),
            );
            tiles.push(Tile::new(
                texturizer.clone(),
                None,
                tile_sector,
                TileKey::new(0, row, column),
            ));
        }
    }
    debug!(
        top_sector = %sector,
        tiles = tiles.len(),
        "created top-level tiles"
    );
    Ok(tiles)
}

/// Owns a tile forest and renders it once per frame.
///
/// Each frame starts with fresh statistics shared by all top-level tiles.
/// The split timer persists across frames so the split interval is measured
/// from the last split, whichever frame it happened in.
pub struct TileRenderer {
    parameters: TilesRenderParameters,
    tessellator: Box<dyn TileTessellator>,
    texturizer: Option<Rc<dyn TileTexturizer>>,
    top_level_tiles: Vec<Tile>,
    last_split_timer: Box<dyn SplitTimer>,
    statistics: TilesStatistics,
    frame: u64,
}

impl TileRenderer {
    pub fn new(
        parameters: TilesRenderParameters,
        tessellator: Box<dyn TileTessellator>,
        texturizer: Option<Rc<dyn TileTexturizer>>,
        top_sector: &Sector,
    ) -> Result<Self, TilesError> {
        let top_level_tiles = create_top_level_tiles(
            top_sector,
            parameters.top_sector_splits_by_latitude,
            parameters.top_sector_splits_by_longitude,
            texturizer.clone(),
        )?;
        Ok(Self {
            parameters,
            tessellator,
            texturizer,
            top_level_tiles,
            last_split_timer: Box::new(Stopwatch::new()),
            statistics: TilesStatistics::new(),
            frame: 0,
        })
    }

    /// Replace the wall-clock split timer.
    pub fn with_split_timer(mut self, timer: Box<dyn SplitTimer>) -> Self {
        self.last_split_timer = timer;
        self
    }

    pub fn parameters(&self) -> &TilesRenderParameters {
        &self.parameters
    }

    pub fn top_level_tiles(&self) -> &[Tile] {
        &self.top_level_tiles
    }

    /// Statistics of the last rendered frame.
    pub fn last_statistics(&self) -> &TilesStatistics {
        &self.statistics
    }

    /// Render one frame.
    ///
    /// The frontier starts at the top-level tiles and is consumed level by
    /// level: every tile either renders or queues its four children for the
    /// next round. After `max_frontier_iterations` rounds the remaining
    /// frontier renders as-is.
    pub fn render(&mut self, camera: &Camera) -> &TilesStatistics {
        self.frame += 1;
        let previous = std::mem::take(&mut self.statistics);
        let max_iterations = self.parameters.max_frontier_iterations.max(1);

        let mut ctx = TileRenderContext::new(
            camera,
            &self.parameters,
            &*self.tessellator,
            &mut self.statistics,
            &mut *self.last_split_timer,
        );

        let mut frontier: Vec<&mut Tile> = self.top_level_tiles.iter_mut().collect();
        let mut iterations = 0;
        while !frontier.is_empty() {
            iterations += 1;
            let mut next = Vec::new();
            if iterations >= max_iterations {
                for tile in frontier {
                    tile.render(&mut ctx, None);
                }
            } else {
                for tile in frontier {
                    tile.render(&mut ctx, Some(&mut next));
                }
            }
            frontier = next;
        }

        debug!(
            frame = self.frame,
            iterations,
            processed = self.statistics.tiles_processed(),
            visible = self.statistics.tiles_visible(),
            rendered = self.statistics.tiles_rendered(),
            splits = self.statistics.splits_count_in_frame(),
            "tiles frame rendered"
        );
        self.statistics.log_if_changed(&previous);
        &self.statistics
    }

    /// Render every top-level tile as-is, without refining.
    pub fn render_single_pass(&mut self, camera: &Camera) -> &TilesStatistics {
        self.statistics = TilesStatistics::new();
        let mut ctx = TileRenderContext::new(
            camera,
            &self.parameters,
            &*self.tessellator,
            &mut self.statistics,
            &mut *self.last_split_timer,
        );
        for tile in &mut self.top_level_tiles {
            tile.render(&mut ctx, None);
        }
        &self.statistics
    }

    /// Prepare the top-level tiles and report whether their imagery is final.
    ///
    /// Always true unless `force_first_level_tiles_render_on_start` is set
    /// and a texturizer is installed.
    pub fn is_ready_to_render(&mut self, camera: &Camera) -> bool {
        if !self.parameters.force_first_level_tiles_render_on_start || self.texturizer.is_none() {
            return true;
        }

        let mut scratch = TilesStatistics::new();
        let ctx = TileRenderContext::new(
            camera,
            &self.parameters,
            &*self.tessellator,
            &mut scratch,
            &mut *self.last_split_timer,
        );
        let mut ready = true;
        for tile in &mut self.top_level_tiles {
            tile.prepare_for_full_rendering(&ctx);
            ready &= tile.is_texture_solved();
        }
        ready
    }

    /// The deepest existing tile whose sector contains `position`.
    pub fn find_deepest_tile_containing(&self, position: &Geodetic2D) -> Option<&Tile> {
        self.top_level_tiles
            .iter()
            .find_map(|tile| tile.find_deepest_tile_containing(position))
    }

    pub fn tile(&self, key: &TileKey) -> Option<&Tile> {
        let top = key.ancestor_at(0)?;
        self.top_level_tiles
            .iter()
            .find(|tile| tile.key() == top)?
            .descendant(key)
    }

    pub fn tile_mut(&mut self, key: &TileKey) -> Option<&mut Tile> {
        let top = key.ancestor_at(0)?;
        self.top_level_tiles
            .iter_mut()
            .find(|tile| tile.key() == top)?
            .descendant_mut(key)
    }

    /// Collapse every top-level tile to a leaf.
    pub fn prune_all(&mut self) {
        for tile in &mut self.top_level_tiles {
            tile.prune();
        }
    }
}
