//! Simulated imagery source: each tile's image "arrives" a fixed number of
//! frames after it was requested, unless the tile is pruned first.

use std::cell::{Cell, RefCell};

use globe_tiles::{
    ImageDownloader, ImageRequestTracker, Mesh, RequestId, Texturized, Tile, TileKey,
    TileTexturizer,
};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::sphere::{DrawCounter, SphereMesh, sector_bounds};

/// Payload kept on a textured tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeliveredImage {
    pub request_id: RequestId,
    pub frame: u64,
}

#[derive(Debug, Default)]
struct SimulatedDownloader {
    cancelled: Cell<u64>,
}

impl ImageDownloader for SimulatedDownloader {
    fn cancel_request(&self, request_id: RequestId) {
        trace!(request_id, "download cancelled");
        self.cancelled.set(self.cancelled.get() + 1);
    }
}

pub struct SimulatedImagery {
    radius: f64,
    latency_frames: u64,
    frame: Cell<u64>,
    next_request: Cell<RequestId>,
    requested_at: RefCell<FxHashMap<RequestId, u64>>,
    tracker: RefCell<ImageRequestTracker>,
    downloader: SimulatedDownloader,
    draws: DrawCounter,
}

impl SimulatedImagery {
    pub fn new(radius: f64, latency_frames: u64, draws: DrawCounter) -> Self {
        Self {
            radius,
            latency_frames,
            frame: Cell::new(0),
            next_request: Cell::new(0),
            requested_at: RefCell::default(),
            tracker: RefCell::default(),
            downloader: SimulatedDownloader::default(),
            draws,
        }
    }

    pub fn advance_frame(&self) {
        self.frame.set(self.frame.get() + 1);
    }

    pub fn pending_requests(&self) -> usize {
        self.tracker.borrow().len()
    }

    pub fn cancelled_requests(&self) -> u64 {
        self.downloader.cancelled.get()
    }

    fn start_request(&self, tracker: &mut ImageRequestTracker, key: TileKey) {
        let request_id = self.next_request.get();
        self.next_request.set(request_id + 1);
        tracker.register(key, request_id);
        self.requested_at
            .borrow_mut()
            .insert(request_id, self.frame.get());
        trace!(tile = %key, request_id, "download started");
    }
}

impl TileTexturizer for SimulatedImagery {
    fn tile_meets_render_criteria(&self, _tile: &Tile) -> bool {
        false
    }

    fn texturize(
        &self,
        tile: &Tile,
        _tessellated: &dyn Mesh,
        previous: Option<Box<dyn Mesh>>,
    ) -> Texturized {
        let key = tile.key();
        let frame = self.frame.get();
        let mut tracker = self.tracker.borrow_mut();

        let Some(request_id) = tracker.request_for(&key) else {
            self.start_request(&mut tracker, key);
            // Keep showing the previous imagery while the new one downloads.
            return Texturized {
                mesh: previous,
                ..Texturized::pending()
            };
        };

        let requested_at = self
            .requested_at
            .borrow()
            .get(&request_id)
            .copied()
            .unwrap_or(frame);
        if frame.saturating_sub(requested_at) < self.latency_frames {
            return Texturized {
                mesh: previous,
                ..Texturized::pending()
            };
        }

        tracker.finish(&key);
        self.requested_at.borrow_mut().remove(&request_id);
        trace!(tile = %key, request_id, "image delivered");
        Texturized {
            mesh: Some(Box::new(SphereMesh::new(
                sector_bounds(tile.sector(), self.radius),
                self.draws.clone(),
            ))),
            texture_solved: true,
            dirty: false,
            data: Some(Box::new(DeliveredImage { request_id, frame })),
        }
    }

    fn ancestor_texture_solved_changed(&self, tile: &mut Tile, ancestor: TileKey, solved: bool) {
        trace!(tile = %tile.key(), %ancestor, solved, "ancestor texture changed");
    }

    fn tile_mesh_to_be_deleted(&self, tile: &Tile, _mesh: &dyn Mesh) {
        trace!(tile = %tile.key(), "textured mesh released");
    }

    fn tile_to_be_deleted(&self, tile: &Tile, _mesh: Option<&dyn Mesh>) {
        let key = tile.key();
        let mut tracker = self.tracker.borrow_mut();
        if let Some(request_id) = tracker.request_for(&key) {
            self.requested_at.borrow_mut().remove(&request_id);
        }
        tracker.cancel(&key, &self.downloader);
    }
}
