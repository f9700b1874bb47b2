use glam::UVec2;

use crate::{Camera, Frustum};

/// The bounding volume of a renderable mesh, as seen by visibility and
/// level-of-detail tests.
pub trait Extent {
    /// Returns true if the volume is at least partially inside the frustum.
    fn touches(&self, frustum: &Frustum) -> bool;

    /// Screen-space size of the volume, in pixels (`x` = width, `y` = height).
    fn projected_extent(&self, camera: &Camera) -> UVec2;
}
