//! Axis-aligned bounding boxes in earth-centered f64 space.

use glam::{DVec2, DVec3, UVec2};

use crate::{Camera, Extent, Frustum};

/// An axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box.
    pub min: DVec3,
    /// Maximum corner of the bounding box.
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// The smallest box enclosing every point. Returns `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Half-size along each axis.
    pub fn extents(&self) -> DVec3 {
        (self.max - self.min) * 0.5
    }

    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }
}

impl Extent for BoundingBox {
    fn touches(&self, frustum: &Frustum) -> bool {
        frustum.touches_box(self)
    }

    /// Bounding rectangle of the projected corners. A box that crosses the
    /// eye plane cannot be projected and is reported as covering the viewport.
    fn projected_extent(&self, camera: &Camera) -> UVec2 {
        let mut min = DVec2::splat(f64::MAX);
        let mut max = DVec2::splat(f64::MIN);
        for corner in self.corners() {
            let Some(pixel) = camera.point_to_pixel(corner) else {
                return camera.viewport();
            };
            min = min.min(pixel);
            max = max.max(pixel);
        }
        let size = (max - min).round();
        UVec2::new(size.x as u32, size.y as u32)
    }
}
