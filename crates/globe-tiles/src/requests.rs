//! Bookkeeping of outstanding imagery downloads, one per tile.
//!
//! A texturizer registers the download it starts for a tile, forgets it when
//! the download listener completes, and cancels it when the tile is pruned
//! (from [`TileTexturizer::tile_to_be_deleted`](crate::TileTexturizer::tile_to_be_deleted)).
//! The tracker guarantees the downloader hears about each cancellation once.

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::TileKey;

/// Identifier handed out by an [`ImageDownloader`].
pub type RequestId = u64;

/// The part of the download pipeline the tracker talks to.
pub trait ImageDownloader {
    fn cancel_request(&self, request_id: RequestId);
}

/// Outstanding download request per tile.
#[derive(Debug, Default)]
pub struct ImageRequestTracker {
    requests_per_tile: FxHashMap<TileKey, RequestId>,
}

impl ImageRequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the request started for `key`. Returns the request it replaces.
    pub fn register(&mut self, key: TileKey, request_id: RequestId) -> Option<RequestId> {
        self.requests_per_tile.insert(key, request_id)
    }

    /// The download for `key` completed (delivered, failed or cancelled).
    pub fn finish(&mut self, key: &TileKey) -> Option<RequestId> {
        self.requests_per_tile.remove(key)
    }

    /// Cancel the outstanding request for `key`, if any. Returns true if the
    /// downloader was told to cancel.
    pub fn cancel(&mut self, key: &TileKey, downloader: &dyn ImageDownloader) -> bool {
        match self.requests_per_tile.remove(key) {
            Some(request_id) => {
                trace!(tile = %key, request_id, "cancelling image request");
                downloader.cancel_request(request_id);
                true
            }
            None => false,
        }
    }

    pub fn request_for(&self, key: &TileKey) -> Option<RequestId> {
        self.requests_per_tile.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.requests_per_tile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests_per_tile.is_empty()
    }
}
