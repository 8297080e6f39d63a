//! Infinite line in standard form `a*x + b*y + c = 0`.

use super::point::{Point, EPS};
use super::vector::Vector;

/// Which side of a line a point falls on, under epsilon tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSide {
    Above,
    Inside,
    Below,
}

/// An infinite line, kept in standard form plus two representative points
/// so parametric and directional queries (point-along, bisector) stay cheap.
#[derive(Debug, Clone, Copy)]
pub struct Line {
    a: f64,
    b: f64,
    c: f64,
    p1: Point,
    p2: Point,
}

impl Line {
    /// Construct from the line equation coefficients directly.
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Self {
        // Reconstruct two representative points along the line, picking
        // whichever axis is not near-degenerate to parametrize by.
        let (p1, p2) = if b.abs() > EPS {
            (
                Point::new(-1000.0, (-c - a * -1000.0) / b),
                Point::new(1000.0, (-c - a * 1000.0) / b),
            )
        } else if a.abs() > EPS {
            (
                Point::new((-c - b * -1000.0) / a, -1000.0),
                Point::new((-c - b * 1000.0) / a, 1000.0),
            )
        } else {
            (Point::ZERO, Point::new(1.0, 0.0))
        };
        Line { a, b, c, p1, p2 }
    }

    /// Construct from two distinct points.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let a = p1.y - p2.y;
        let b = p2.x - p1.x;
        let c = p1.x * p2.y - p2.x * p1.y;
        Line { a, b, c, p1, p2 }
    }

    /// Construct from a point and a direction vector.
    pub fn from_point_direction(p: Point, dir: Vector) -> Self {
        let p2 = p + dir;
        Line::from_points(p, p2)
    }

    pub fn a(&self) -> f64 {
        self.a
    }
    pub fn b(&self) -> f64 {
        self.b
    }
    pub fn c(&self) -> f64 {
        self.c
    }
    pub fn p1(&self) -> Point {
        self.p1
    }
    pub fn p2(&self) -> Point {
        self.p2
    }

    /// Signed perpendicular distance from `point` to this line.
    pub fn distance(&self, point: &Point) -> f64 {
        let m = (self.a * self.a + self.b * self.b).sqrt();
        (self.a * point.x + self.b * point.y + self.c) / m
    }

    /// Orthogonal projection of `point` onto this line.
    pub fn nearest_point(&self, point: &Point) -> Point {
        let dir = Vector::new(self.b, -self.a);
        let to_point = Vector::from(*point - self.p1);
        let u = to_point.dot(&dir) / dir.square_length();
        self.p1 + dir * u
    }

    /// Which side of the line `point` falls on, under epsilon tolerance.
    pub fn point_side(&self, point: &Point) -> PointSide {
        let v = self.a * (point.x - self.p1.x) + self.b * (point.y - self.p1.y);
        if v > EPS {
            PointSide::Above
        } else if v < -EPS {
            PointSide::Below
        } else {
            PointSide::Inside
        }
    }

    /// Evaluate the point reached after moving `t` distance units along the
    /// p1->p2 direction (unit-speed parametrization, not a [0,1] fraction).
    pub fn point_along(&self, t: f64) -> Point {
        self.p1 + Vector::from(self.p2 - self.p1).unit() * t
    }

    /// Intersection with another line. Fails (returns `None`) when the two
    /// lines are parallel (determinant is zero).
    pub fn cross_line(&self, other: &Line) -> Option<Point> {
        let det = self.a * other.b - other.a * self.b;
        if det == 0.0 {
            return None;
        }
        let x = (-self.c * other.b + other.c * self.b) / det;
        let y = (-self.a * other.c + other.a * self.c) / det;
        Some(Point::new(x, y))
    }

    pub fn is_same(&self, other: &Line) -> bool {
        self.point_side(&other.p1) == PointSide::Inside
            && self.point_side(&other.p2) == PointSide::Inside
    }

    /// The angular bisector of two lines; if the lines coincide, returns the
    /// first line unchanged.
    pub fn bisector(l1: &Line, l2: &Line) -> Line {
        if l1.is_same(l2) {
            return *l1;
        }
        let n1 = (l1.a * l1.a + l1.b * l1.b).sqrt();
        let n2 = (l2.a * l2.a + l2.b * l2.b).sqrt();
        Line::from_coefficients(
            l1.a / n1 - l2.a / n2,
            l1.b / n1 - l2.b / n2,
            l1.c / n1 - l2.c / n2,
        )
    }

    /// Tangent of the angle between two lines.
    pub fn tan_angle(l1: &Line, l2: &Line) -> f64 {
        (l1.a * l2.b - l2.a * l1.b) / (l1.a * l2.a + l1.b * l2.b)
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_matches_known_crossing() {
        let l1 = Line::from_points(Point::new(0.0, 0.0), Point::new(4.0, 4.0));
        let l2 = Line::from_points(Point::new(0.0, 4.0), Point::new(6.0, 0.0));
        let cross = l1.cross_line(&l2).expect("lines cross");
        assert!((cross.x - 2.4).abs() < 1e-6);
        assert!((cross.y - 2.4).abs() < 1e-6);
    }

    #[test]
    fn parallel_lines_do_not_cross() {
        let l1 = Line::from_points(Point::new(0.0, 0.0), Point::new(4.0, 4.0));
        let l2 = Line::from_points(Point::new(0.0, 4.0), Point::new(-4.0, 0.0));
        assert!(l1.cross_line(&l2).is_none());
    }

    #[test]
    fn point_along_moves_unit_distance() {
        let l = Line::from_points(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let p = l.point_along(3.0);
        assert!((p.x - 3.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn nearest_point_projects_orthogonally() {
        let l = Line::from_points(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let p = l.nearest_point(&Point::new(5.0, 3.0));
        assert!((p.x - 5.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }
}
