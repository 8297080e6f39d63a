//! 2-D direction/offset, distinct from [`Point`] only in intent.

use super::point::Point;
use std::ops::{Add, Neg, Sub};

/// A direction or offset in the same coordinate space as [`Point`].
///
/// Wraps a `Point` by value (no back-references into it) so the reference-
/// aliased-field pattern of the original `Vector` is not reproduced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector {
    p: Point,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Vector { p: Point::new(x, y) }
    }

    pub fn x(&self) -> f64 {
        self.p.x
    }

    pub fn y(&self) -> f64 {
        self.p.y
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.p.x * other.p.x + self.p.y * other.p.y
    }

    pub fn square_length(&self) -> f64 {
        self.p.square_distance(&Point::ZERO)
    }

    pub fn length(&self) -> f64 {
        self.square_length().sqrt()
    }

    /// Length-normalized vector; the zero vector maps to itself.
    pub fn unit(&self) -> Vector {
        let l = self.length();
        if l == 0.0 {
            Vector::default()
        } else {
            Vector::new(self.p.x / l, self.p.y / l)
        }
    }

    /// 90-degree rotation: `(x, y) -> (y, -x)`. The zero vector maps to itself.
    pub fn normal(&self) -> Vector {
        if self.length() == 0.0 {
            Vector::default()
        } else {
            Vector::new(self.p.y, -self.p.x)
        }
    }

    pub fn abs(&self) -> Vector {
        Vector { p: self.p.abs() }
    }
}

impl Default for Vector {
    fn default() -> Self {
        Vector::new(0.0, 0.0)
    }
}

impl From<Point> for Vector {
    fn from(p: Point) -> Self {
        Vector { p }
    }
}

impl From<Vector> for Point {
    fn from(v: Vector) -> Self {
        v.p
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector { p: self.p + rhs.p }
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector { p: self.p - rhs.p }
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector { p: -self.p }
    }
}

impl std::ops::Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector { p: self.p * rhs }
    }
}

impl std::ops::Div<f64> for Vector {
    type Output = Vector;
    fn div(self, rhs: f64) -> Vector {
        Vector { p: self.p / rhs }
    }
}

impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, rhs: Vector) -> Point {
        Point::new(self.x + rhs.x(), self.y + rhs.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::point::EPS;

    #[test]
    fn unit_of_nonzero_vector_has_unit_length() {
        let v = Vector::new(3.0, 4.0);
        assert!((v.unit().length() - 1.0).abs() < EPS);
    }

    #[test]
    fn unit_of_zero_vector_is_zero() {
        let v = Vector::new(0.0, 0.0);
        assert_eq!(v.unit(), Vector::default());
    }

    #[test]
    fn normal_rotates_ninety_degrees() {
        let v = Vector::new(1.0, 0.0);
        let n = v.normal();
        assert!((n.x() - 0.0).abs() < EPS);
        assert!((n.y() - -1.0).abs() < EPS);
    }

    #[test]
    fn normal_of_zero_vector_is_zero() {
        assert_eq!(Vector::default().normal(), Vector::default());
    }
}
