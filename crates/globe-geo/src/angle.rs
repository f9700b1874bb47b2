//! Angles stored in degrees.

use std::fmt;
use std::ops::{Add, Sub};

/// An angle, stored in degrees.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    /// Zero degrees.
    pub const ZERO: Self = Self { degrees: 0.0 };

    /// Create an angle from degrees.
    pub const fn from_degrees(degrees: f64) -> Self {
        Self { degrees }
    }

    /// Create an angle from radians.
    pub fn from_radians(radians: f64) -> Self {
        Self {
            degrees: radians.to_degrees(),
        }
    }

    pub fn degrees(self) -> f64 {
        self.degrees
    }

    pub fn radians(self) -> f64 {
        self.degrees.to_radians()
    }

    /// The angle halfway between `a` and `b`.
    pub fn mid_angle(a: Angle, b: Angle) -> Angle {
        Angle::from_degrees((a.degrees + b.degrees) * 0.5)
    }

    /// Linear interpolation between `self` and `other` (`t = 0` yields `self`).
    pub fn lerp(self, other: Angle, t: f64) -> Angle {
        Angle::from_degrees(self.degrees + (other.degrees - self.degrees) * t)
    }

    /// Returns true if this angle lies in the closed interval `[low, high]`.
    pub fn is_between(self, low: Angle, high: Angle) -> bool {
        self.degrees >= low.degrees && self.degrees <= high.degrees
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.degrees + rhs.degrees)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_degrees(self.degrees - rhs.degrees)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.degrees)
    }
}
