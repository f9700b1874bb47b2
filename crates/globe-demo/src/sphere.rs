//! Headless sphere tessellation: every tile mesh is the bounding box of its
//! sector on a sphere, and "drawing" it bumps a shared counter.

use std::cell::Cell;
use std::rc::Rc;

use globe_geo::{BoundingBox, Camera, Extent, Sector};
use globe_tiles::{Mesh, Tile, TileTessellator};

/// Samples per sector edge used to bound the curved surface.
const SAMPLES_PER_EDGE: u32 = 5;

/// Draw calls issued since the last [`DrawCounter::take`].
#[derive(Clone, Debug, Default)]
pub struct DrawCounter(Rc<Cell<u64>>);

impl DrawCounter {
    pub fn record(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn take(&self) -> u64 {
        self.0.replace(0)
    }
}

/// Bounding box of `sector` on a sphere of `radius`.
pub fn sector_bounds(sector: &Sector, radius: f64) -> Option<BoundingBox> {
    let last = f64::from(SAMPLES_PER_EDGE - 1);
    let points = (0..SAMPLES_PER_EDGE).flat_map(|i| {
        (0..SAMPLES_PER_EDGE).map(move |j| {
            sector
                .inner_point(f64::from(i) / last, f64::from(j) / last)
                .to_cartesian(radius)
        })
    });
    BoundingBox::from_points(points)
}

pub struct SphereMesh {
    extent: Option<BoundingBox>,
    draws: DrawCounter,
}

impl SphereMesh {
    pub fn new(extent: Option<BoundingBox>, draws: DrawCounter) -> Self {
        Self { extent, draws }
    }
}

impl Mesh for SphereMesh {
    fn extent(&self) -> Option<&dyn Extent> {
        self.extent.as_ref().map(|extent| extent as &dyn Extent)
    }

    fn render(&self, _camera: &Camera) {
        self.draws.record();
    }
}

pub struct SphereTessellator {
    radius: f64,
    draws: DrawCounter,
}

impl SphereTessellator {
    pub fn new(radius: f64, draws: DrawCounter) -> Self {
        Self { radius, draws }
    }
}

impl TileTessellator for SphereTessellator {
    fn create_mesh(&self, tile: &Tile) -> Option<Box<dyn Mesh>> {
        let extent = sector_bounds(tile.sector(), self.radius)?;
        Some(Box::new(SphereMesh::new(Some(extent), self.draws.clone())))
    }

    fn create_debug_mesh(&self, _tile: &Tile) -> Option<Box<dyn Mesh>> {
        Some(Box::new(SphereMesh::new(None, self.draws.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_sector_bounds_enclose_corners() {
        let sector = Sector::from_degrees(0.0, 0.0, 45.0, 90.0);
        let bounds = sector_bounds(&sector, 1.0).unwrap();
        for corner in sector.corners() {
            let p = corner.to_cartesian(1.0);
            assert!(p.cmpge(bounds.min - DVec3::splat(1e-12)).all());
            assert!(p.cmple(bounds.max + DVec3::splat(1e-12)).all());
        }
        // The equator-meridian point (1, 0, 0) is a corner of this sector.
        assert!((bounds.max.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_draw_counter_take_resets() {
        let draws = DrawCounter::default();
        let mesh = SphereMesh::new(None, draws.clone());
        let camera = Camera::look_at(
            DVec3::new(0.0, 0.0, 10.0),
            DVec3::ZERO,
            DVec3::Y,
            1.0,
            glam::UVec2::new(64, 64),
        );
        mesh.render(&camera);
        mesh.render(&camera);
        assert_eq!(draws.take(), 2);
        assert_eq!(draws.take(), 0);
    }
}
