//! State shared by every tile visit of one traversal pass.

use globe_geo::Camera;

use crate::{SplitTimer, TileTessellator, TilesRenderParameters, TilesStatistics};

/// Frame inputs (camera, parameters, tessellator) and the frame's mutable
/// bookkeeping (statistics, split timer).
pub struct TileRenderContext<'a> {
    camera: &'a Camera,
    parameters: &'a TilesRenderParameters,
    tessellator: &'a dyn TileTessellator,
    statistics: &'a mut TilesStatistics,
    last_split_timer: &'a mut dyn SplitTimer,
}

impl<'a> TileRenderContext<'a> {
    pub fn new(
        camera: &'a Camera,
        parameters: &'a TilesRenderParameters,
        tessellator: &'a dyn TileTessellator,
        statistics: &'a mut TilesStatistics,
        last_split_timer: &'a mut dyn SplitTimer,
    ) -> Self {
        Self {
            camera,
            parameters,
            tessellator,
            statistics,
            last_split_timer,
        }
    }

    pub fn camera(&self) -> &Camera {
        self.camera
    }

    pub fn parameters(&self) -> &TilesRenderParameters {
        self.parameters
    }

    pub fn tessellator(&self) -> &dyn TileTessellator {
        self.tessellator
    }

    pub fn statistics(&self) -> &TilesStatistics {
        &*self.statistics
    }

    pub fn statistics_mut(&mut self) -> &mut TilesStatistics {
        &mut *self.statistics
    }

    pub fn last_split_timer(&self) -> &dyn SplitTimer {
        &*self.last_split_timer
    }

    pub fn last_split_timer_mut(&mut self) -> &mut dyn SplitTimer {
        &mut *self.last_split_timer
    }
}
