//! Geographic and camera-space geometry used by the globe tile engine: angles,
//! geodetic positions, sectors, bounding boxes, view frustums and cameras.

mod angle;
mod bounding_box;
mod camera;
mod extent;
mod frustum;
mod geodetic;
mod sector;

pub use angle::Angle;
pub use bounding_box::BoundingBox;
pub use camera::Camera;
pub use extent::Extent;
pub use frustum::Frustum;
pub use geodetic::{Geodetic2D, Geodetic3D};
pub use sector::Sector;
