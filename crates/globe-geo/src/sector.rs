//! Latitude/longitude bounding rectangles.

use std::fmt;

use crate::{Angle, Geodetic2D};

/// A geographic rectangle bounded by a lower (south-west) and an upper
/// (north-east) corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    lower: Geodetic2D,
    upper: Geodetic2D,
}

impl Sector {
    /// The whole sphere: latitudes [-90, 90], longitudes [-180, 180].
    pub const FULL_SPHERE: Sector = Sector {
        lower: Geodetic2D::from_degrees(-90.0, -180.0),
        upper: Geodetic2D::from_degrees(90.0, 180.0),
    };

    pub const fn new(lower: Geodetic2D, upper: Geodetic2D) -> Self {
        Self { lower, upper }
    }

    pub const fn from_degrees(lower_lat: f64, lower_lon: f64, upper_lat: f64, upper_lon: f64) -> Self {
        Self::new(
            Geodetic2D::from_degrees(lower_lat, lower_lon),
            Geodetic2D::from_degrees(upper_lat, upper_lon),
        )
    }

    pub fn lower(&self) -> Geodetic2D {
        self.lower
    }

    pub fn upper(&self) -> Geodetic2D {
        self.upper
    }

    pub fn delta_latitude(&self) -> Angle {
        self.upper.latitude - self.lower.latitude
    }

    pub fn delta_longitude(&self) -> Angle {
        self.upper.longitude - self.lower.longitude
    }

    /// Returns true if the sector spans a non-zero area.
    pub fn is_degenerate(&self) -> bool {
        self.delta_latitude().degrees() <= 0.0 || self.delta_longitude().degrees() <= 0.0
    }

    /// Area in square degrees.
    pub fn area_degrees(&self) -> f64 {
        self.delta_latitude().degrees() * self.delta_longitude().degrees()
    }

    pub fn center(&self) -> Geodetic2D {
        Geodetic2D::new(
            Angle::mid_angle(self.lower.latitude, self.upper.latitude),
            Angle::mid_angle(self.lower.longitude, self.upper.longitude),
        )
    }

    /// Returns the point at normalized coordinates `(u, v)` inside the sector,
    /// where `u` runs along longitude and `v` along latitude.
    pub fn inner_point(&self, u: f64, v: f64) -> Geodetic2D {
        Geodetic2D::new(
            self.lower.latitude.lerp(self.upper.latitude, v),
            self.lower.longitude.lerp(self.upper.longitude, u),
        )
    }

    /// Closed containment: points on the border belong to the sector.
    pub fn contains(&self, position: &Geodetic2D) -> bool {
        position
            .latitude
            .is_between(self.lower.latitude, self.upper.latitude)
            && position
                .longitude
                .is_between(self.lower.longitude, self.upper.longitude)
    }

    /// Returns true if the two sectors overlap or share a border.
    pub fn touches_with(&self, other: &Sector) -> bool {
        self.lower.latitude <= other.upper.latitude
            && self.upper.latitude >= other.lower.latitude
            && self.lower.longitude <= other.upper.longitude
            && self.upper.longitude >= other.lower.longitude
    }

    /// Returns the four corners, south-west first and counter-clockwise.
    pub fn corners(&self) -> [Geodetic2D; 4] {
        [
            self.lower,
            Geodetic2D::new(self.lower.latitude, self.upper.longitude),
            self.upper,
            Geodetic2D::new(self.upper.latitude, self.lower.longitude),
        ]
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.lower, self.upper)
    }
}
