//! Perspective camera producing the view volume and pixel projections used by
//! tile visibility and level-of-detail tests.

use glam::{DMat4, DVec2, DVec3, UVec2};

use crate::Frustum;

/// Default near clip distance.
const DEFAULT_NEAR: f64 = 0.1;
/// Default far clip distance, large enough for planet-scale scenes.
const DEFAULT_FAR: f64 = 1.0e10;

/// A perspective camera in earth-centered f64 space.
#[derive(Clone, Debug)]
pub struct Camera {
    position: DVec3,
    view_projection: DMat4,
    viewport: UVec2,
    frustum: Frustum,
}

impl Camera {
    /// Create a camera at `eye` looking at `target`.
    ///
    /// - `fov_y`: vertical field of view in radians
    /// - `viewport`: size of the render target in pixels
    pub fn look_at(eye: DVec3, target: DVec3, up: DVec3, fov_y: f64, viewport: UVec2) -> Self {
        Self::with_clip_planes(eye, target, up, fov_y, viewport, DEFAULT_NEAR, DEFAULT_FAR)
    }

    /// Like [`Camera::look_at`], with explicit near and far clip distances.
    pub fn with_clip_planes(
        eye: DVec3,
        target: DVec3,
        up: DVec3,
        fov_y: f64,
        viewport: UVec2,
        near: f64,
        far: f64,
    ) -> Self {
        let viewport = viewport.max(UVec2::ONE);
        let aspect = viewport.x as f64 / viewport.y as f64;
        let view = DMat4::look_at_rh(eye, target, up);
        let projection = DMat4::perspective_rh(fov_y, aspect, near, far);
        let view_projection = projection * view;
        Self {
            position: eye,
            view_projection,
            viewport,
            frustum: Frustum::from_view_projection(&view_projection),
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    pub fn view_projection(&self) -> &DMat4 {
        &self.view_projection
    }

    /// The current view volume.
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Project a world-space point to pixel coordinates (origin top-left).
    /// Returns `None` for points on or behind the eye plane.
    pub fn point_to_pixel(&self, point: DVec3) -> Option<DVec2> {
        let clip = self.view_projection * point.extend(1.0);
        if clip.w <= f64::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let viewport = self.viewport.as_dvec2();
        Some(DVec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.x,
            (0.5 - ndc.y * 0.5) * viewport.y,
        ))
    }
}
