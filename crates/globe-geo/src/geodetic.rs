//! Geodetic positions on a spherical planet.

use std::fmt;

use glam::DVec3;

use crate::Angle;

/// A latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Geodetic2D {
    pub latitude: Angle,
    pub longitude: Angle,
}

impl Geodetic2D {
    pub const fn new(latitude: Angle, longitude: Angle) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub const fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self::new(Angle::from_degrees(latitude), Angle::from_degrees(longitude))
    }

    /// Position on a sphere of the given radius, in an earth-centered frame
    /// with +Z through the north pole and +X through (0, 0).
    pub fn to_cartesian(&self, radius: f64) -> DVec3 {
        Geodetic3D::new(*self, 0.0).to_cartesian(radius)
    }
}

impl fmt::Display for Geodetic2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(lat={}, lon={})", self.latitude, self.longitude)
    }
}

/// A latitude/longitude pair plus a height above the surface.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Geodetic3D {
    pub position: Geodetic2D,
    /// Height above the surface, in the same unit as the planet radius.
    pub height: f64,
}

impl Geodetic3D {
    pub const fn new(position: Geodetic2D, height: f64) -> Self {
        Self { position, height }
    }

    pub const fn from_degrees(latitude: f64, longitude: f64, height: f64) -> Self {
        Self::new(Geodetic2D::from_degrees(latitude, longitude), height)
    }

    pub fn latitude(&self) -> Angle {
        self.position.latitude
    }

    pub fn longitude(&self) -> Angle {
        self.position.longitude
    }

    /// Position on (or above) a sphere of the given radius.
    pub fn to_cartesian(&self, radius: f64) -> DVec3 {
        let lat = self.position.latitude.radians();
        let lon = self.position.longitude.radians();
        let r = radius + self.height;
        DVec3::new(
            r * lat.cos() * lon.cos(),
            r * lat.cos() * lon.sin(),
            r * lat.sin(),
        )
    }
}

impl From<Geodetic2D> for Geodetic3D {
    fn from(position: Geodetic2D) -> Self {
        Self::new(position, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f64 = 6_378_137.0;

    #[test]
    fn test_equator_prime_meridian_is_on_x_axis() {
        let p = Geodetic2D::from_degrees(0.0, 0.0).to_cartesian(RADIUS);
        assert!((p - DVec3::new(RADIUS, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_north_pole_is_on_z_axis() {
        let p = Geodetic2D::from_degrees(90.0, 0.0).to_cartesian(RADIUS);
        assert!((p - DVec3::new(0.0, 0.0, RADIUS)).length() < 1e-6);
    }

    #[test]
    fn test_height_extends_radius() {
        let p = Geodetic3D::from_degrees(12.0, 34.0, 1000.0).to_cartesian(RADIUS);
        assert!((p.length() - (RADIUS + 1000.0)).abs() < 1e-6);
    }
}
