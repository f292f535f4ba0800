use std::ops::Mul;

use crate::geometry::coord::{Coord3dCart, Coord3dSpherical};

/// Unit quaternion expressing a rotation of the sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// Scalar part.
    pub w: f64,
    /// First vector component.
    pub x: f64,
    /// Second vector component.
    pub y: f64,
    /// Third vector component.
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Build a quaternion from raw components (not normalized).
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The rotation that does nothing.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Rotation of `angle` radians around `axis` (right-hand rule).
    pub fn from_axis_angle(axis: Coord3dCart, angle: f64) -> Self {
        let axis = axis.normalized();
        let (s, c) = (angle / 2.0).sin_cos();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Viewing rotation from yaw, pitch and roll (radians).
    ///
    /// Yaw turns the view center from +X toward +Y, pitch raises it toward +Z and roll spins the
    /// view around its own center. They are applied roll first, then pitch, then yaw.
    pub fn from_yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> Self {
        let qz = Self::from_axis_angle(Coord3dCart::new(0.0, 0.0, 1.0), yaw);
        let qy = Self::from_axis_angle(Coord3dCart::new(0.0, 1.0, 0.0), -pitch);
        let qx = Self::from_axis_angle(Coord3dCart::new(1.0, 0.0, 0.0), roll);
        qz * qy * qx
    }

    /// Quaternion norm.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 4D dot product.
    pub fn dot(self, o: Self) -> f64 {
        self.w * o.w + self.x * o.x + self.y * o.y + self.z * o.z
    }

    /// Unit quaternion with the same orientation. A zero quaternion becomes the identity.
    pub fn normalized(self) -> Self {
        let n = self.norm();
        if n == 0.0 || n.is_nan() {
            return Self::identity();
        }
        Self::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    /// Conjugate, i.e. the inverse rotation for a unit quaternion.
    pub fn inv(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Rotate a Cartesian point.
    pub fn rotate(self, p: Coord3dCart) -> Coord3dCart {
        // v' = v + 2w(u × v) + 2u × (u × v)
        let u = Coord3dCart::new(self.x, self.y, self.z);
        let t = u.cross(p) * 2.0;
        p + t * self.w + u.cross(t)
    }

    /// Spherical linear interpolation from `self` (`t = 0`) to `o` (`t = 1`) along the shortest
    /// arc.
    pub fn slerp(self, o: Self, t: f64) -> Self {
        let mut cos = self.dot(o);
        let mut o = o;
        if cos < 0.0 {
            cos = -cos;
            o = Self::new(-o.w, -o.x, -o.y, -o.z);
        }
        if cos > 1.0 - 1e-9 {
            return Self::new(
                self.w + (o.w - self.w) * t,
                self.x + (o.x - self.x) * t,
                self.y + (o.y - self.y) * t,
                self.z + (o.z - self.z) * t,
            )
            .normalized();
        }
        let angle = cos.acos();
        let sin = angle.sin();
        let a = ((1.0 - t) * angle).sin() / sin;
        let b = (t * angle).sin() / sin;
        Self::new(
            a * self.w + b * o.w,
            a * self.x + b * o.x,
            a * self.y + b * o.y,
            a * self.z + b * o.z,
        )
    }
}

impl Mul for Quaternion {
    type Output = Self;

    /// Hamilton product: `(a * b).rotate(p) == a.rotate(b.rotate(p))`.
    fn mul(self, o: Self) -> Self {
        Self::new(
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
        )
    }
}

/// Rotate a spherical point by `q`.
pub fn rotation(point: Coord3dSpherical, q: Quaternion) -> Coord3dSpherical {
    Coord3dSpherical::from(q.rotate(Coord3dCart::from(point)))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quaternion.rs"]
mod tests;
