//! Per-frame traversal counters.

use tracing::info;

use crate::Tile;

/// Counters written by one traversal pass. A fresh instance is used for
/// every frame, shared by all top-level tiles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TilesStatistics {
    tiles_processed: usize,
    tiles_visible: usize,
    tiles_rendered: usize,
    splits_count_in_frame: usize,
    processed_by_level: Vec<usize>,
    visible_by_level: Vec<usize>,
    rendered_by_level: Vec<usize>,
}

fn bump(by_level: &mut Vec<usize>, level: u32) {
    let level = level as usize;
    if by_level.len() <= level {
        by_level.resize(level + 1, 0);
    }
    by_level[level] += 1;
}

impl TilesStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_tile_processed(&mut self, tile: &Tile) {
        self.tiles_processed += 1;
        bump(&mut self.processed_by_level, tile.level());
    }

    pub fn compute_visible_tile(&mut self, tile: &Tile) {
        self.tiles_visible += 1;
        bump(&mut self.visible_by_level, tile.level());
    }

    pub fn compute_tile_rendered(&mut self, tile: &Tile) {
        self.tiles_rendered += 1;
        bump(&mut self.rendered_by_level, tile.level());
    }

    pub fn compute_split_in_frame(&mut self) {
        self.splits_count_in_frame += 1;
    }

    pub fn tiles_processed(&self) -> usize {
        self.tiles_processed
    }

    pub fn tiles_visible(&self) -> usize {
        self.tiles_visible
    }

    pub fn tiles_rendered(&self) -> usize {
        self.tiles_rendered
    }

    pub fn splits_count_in_frame(&self) -> usize {
        self.splits_count_in_frame
    }

    /// Rendered tile counts indexed by level.
    pub fn rendered_by_level(&self) -> &[usize] {
        &self.rendered_by_level
    }

    pub fn processed_by_level(&self) -> &[usize] {
        &self.processed_by_level
    }

    pub fn visible_by_level(&self) -> &[usize] {
        &self.visible_by_level
    }

    /// Deepest level that rendered at least one tile.
    pub fn deepest_rendered_level(&self) -> Option<u32> {
        self.rendered_by_level
            .iter()
            .rposition(|&count| count > 0)
            .map(|level| level as u32)
    }

    /// Log the counters when they differ from the previous frame's.
    pub fn log_if_changed(&self, previous: &TilesStatistics) {
        if self == previous {
            return;
        }
        info!(
            processed = self.tiles_processed,
            visible = self.tiles_visible,
            rendered = self.tiles_rendered,
            splits = self.splits_count_in_frame,
            rendered_by_level = ?self.rendered_by_level,
            "tiles statistics changed"
        );
    }
}
