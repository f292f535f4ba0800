use std::ops::{Add, Mul, Neg, Sub};

/// Integer pixel coordinate in a layout's planar representation.
///
/// `x` is the column and `y` the row. May lie outside the picture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CoordI {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl CoordI {
    /// Build a coordinate from a column and a row.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sub-pixel coordinate in a layout's planar representation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordF {
    /// Column.
    pub x: f64,
    /// Row.
    pub y: f64,
}

impl CoordF {
    /// Build a coordinate from a column and a row.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<CoordI> for CoordF {
    fn from(c: CoordI) -> Self {
        Self::new(f64::from(c.x), f64::from(c.y))
    }
}

/// Cartesian point on (or near) the unit sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord3dCart {
    /// X axis: the default viewing direction.
    pub x: f64,
    /// Y axis: to the right of the default viewing direction.
    pub y: f64,
    /// Z axis: up.
    pub z: f64,
}

impl Coord3dCart {
    /// Build a point from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Dot product.
    pub fn dot(self, o: Self) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    /// Cross product `self × o`.
    pub fn cross(self, o: Self) -> Self {
        Self::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    /// Unit vector with the same direction; the zero vector is returned unchanged.
    pub fn normalized(self) -> Self {
        let n = self.norm();
        if n == 0.0 || n.is_nan() {
            return self;
        }
        self * (1.0 / n)
    }

    /// `true` for the zero vector or when any component is not-a-number.
    ///
    /// Such points mean "no physical surface maps here".
    pub fn is_degenerate(self) -> bool {
        let n = self.norm();
        n == 0.0 || n.is_nan()
    }
}

impl Add for Coord3dCart {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Coord3dCart {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Neg for Coord3dCart {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Coord3dCart {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Point expressed as `(radius, theta, phi)`.
///
/// `theta` is the azimuth measured in the XY plane from +X toward +Y, in `(-π, π]`.
/// `phi` is the polar angle measured from +Z, in `[0, π]` (the equator is `π/2`).
/// `radius` is informational; it only serves to detect the degenerate zero vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord3dSpherical {
    /// Distance from the origin.
    pub radius: f64,
    /// Azimuth.
    pub theta: f64,
    /// Polar angle.
    pub phi: f64,
}

impl Coord3dSpherical {
    /// Build a point from its three components.
    pub const fn new(radius: f64, theta: f64, phi: f64) -> Self {
        Self { radius, theta, phi }
    }

    /// Unit-radius point with the given angles.
    pub const fn on_unit_sphere(theta: f64, phi: f64) -> Self {
        Self::new(1.0, theta, phi)
    }

    /// Same as [`Coord3dCart::is_degenerate`].
    pub fn is_degenerate(self) -> bool {
        self.radius == 0.0 || self.radius.is_nan() || self.theta.is_nan() || self.phi.is_nan()
    }
}

impl From<Coord3dCart> for Coord3dSpherical {
    fn from(c: Coord3dCart) -> Self {
        let rho = c.x.hypot(c.y);
        Self {
            radius: c.norm(),
            theta: c.y.atan2(c.x),
            phi: rho.atan2(c.z),
        }
    }
}

impl From<Coord3dSpherical> for Coord3dCart {
    fn from(s: Coord3dSpherical) -> Self {
        let (sin_phi, cos_phi) = s.phi.sin_cos();
        let (sin_theta, cos_theta) = s.theta.sin_cos();
        Self::new(
            s.radius * sin_phi * cos_theta,
            s.radius * sin_phi * sin_theta,
            s.radius * cos_phi,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/coord.rs"]
mod tests;
