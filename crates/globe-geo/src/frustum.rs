//! View frustum extracted from a view-projection matrix.

use glam::{DMat4, DVec3, DVec4};

use crate::BoundingBox;

/// Plane indices into the frustum planes array.
const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// A view frustum defined by six inward-pointing planes.
#[derive(Clone, Debug)]
pub struct Frustum {
    /// Six planes: left, right, bottom, top, near, far.
    /// Each `DVec4(a, b, c, d)` where `(a,b,c)` is the normalized inward
    /// normal and `d` is the signed distance term.
    planes: [DVec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a combined view-projection matrix
    /// using the Gribb-Hartmann method, for a `[0, 1]` clip depth range.
    pub fn from_view_projection(vp: &DMat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [DVec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        planes[NEAR] = rows[2];
        planes[FAR] = rows[3] - rows[2];

        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    pub fn planes(&self) -> &[DVec4; 6] {
        &self.planes
    }

    /// Returns true if the point lies inside all six planes.
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }

    /// Test whether a box is at least partially inside the frustum.
    ///
    /// Uses the p-vertex method: for each plane, the corner furthest along
    /// the plane normal must not be behind it. Conservative near frustum
    /// corners, never rejects a visible box.
    pub fn touches_box(&self, bbox: &BoundingBox) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();
            let p = DVec3::new(
                if normal.x >= 0.0 { bbox.max.x } else { bbox.min.x },
                if normal.y >= 0.0 { bbox.max.y } else { bbox.min.y },
                if normal.z >= 0.0 { bbox.max.z } else { bbox.min.z },
            );
            if normal.dot(p) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }
}
