//! Bounded piece of a [`Line`] between two endpoints.

use super::line::Line;
use super::point::{Point, EPS};
use super::vector::Vector;

fn inside(v: f64, min: f64, max: f64) -> bool {
    min - EPS <= v && v <= max + EPS
}

/// A line segment. Owns its [`Line`] by value and derives `start`/`end` from
/// it rather than aliasing fields back into the line's representative
/// points — the source's `Segment` held `Point&` references into its `Line`,
/// which has no safe Rust equivalent and is not reproduced here.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    line: Line,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { line: Line::from_points(start, end) }
    }

    pub fn start(&self) -> Point {
        self.line.p1()
    }

    pub fn end(&self) -> Point {
        self.line.p2()
    }

    pub fn line(&self) -> &Line {
        &self.line
    }

    pub fn reverse(&self) -> Segment {
        Segment::new(self.end(), self.start())
    }

    pub fn square_length(&self) -> f64 {
        self.start().square_distance(&self.end())
    }

    fn bbox(&self) -> (f64, f64, f64, f64) {
        let (s, e) = (self.start(), self.end());
        (s.x.min(e.x), s.x.max(e.x), s.y.min(e.y), s.y.max(e.y))
    }

    fn in_bbox(&self, p: &Point) -> bool {
        let (min_x, max_x, min_y, max_y) = self.bbox();
        inside(p.x, min_x, max_x) && inside(p.y, min_y, max_y)
    }

    /// Point reached after moving `t` distance units from `start`, clamped
    /// to stay within the segment's bounding box.
    pub fn point_along(&self, t: f64) -> Point {
        let p = self.line.point_along(t);
        if self.in_bbox(&p) {
            p
        } else {
            self.nearest_point(&p)
        }
    }

    pub fn nearest_point(&self, point: &Point) -> Point {
        let p = self.line.nearest_point(point);
        if self.in_bbox(&p) {
            return p;
        }
        if point.square_distance(&self.start()) <= point.square_distance(&self.end()) {
            self.start()
        } else {
            self.end()
        }
    }

    /// Intersection with an infinite line, accepted only when the crossing
    /// point lies within this segment's parameter box.
    pub fn cross_line(&self, other: &Line) -> Option<Point> {
        let p = self.line.cross_line(other)?;
        if self.in_bbox(&p) {
            Some(p)
        } else {
            None
        }
    }

    /// Intersection with another segment, accepted only when the crossing
    /// point lies within both segments' parameter boxes.
    pub fn cross_segment(&self, other: &Segment) -> Option<Point> {
        let p = self.line.cross_line(&other.line)?;
        if self.in_bbox(&p) && other.in_bbox(&p) {
            Some(p)
        } else {
            None
        }
    }

    pub fn get_bisector(s1: &Segment, s2: &Segment) -> Line {
        Line::bisector(&s1.line, &s2.line)
    }

    pub fn get_tan_angle(s1: &Segment, other: &Line) -> f64 {
        Line::tan_angle(&s1.line, other)
    }
}

impl From<Segment> for Vector {
    fn from(s: Segment) -> Vector {
        Vector::from(s.end() - s.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_involution() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        let back = s.reverse().reverse();
        assert!(back.start().approx_eq(&s.start()));
        assert!(back.end().approx_eq(&s.end()));
    }

    #[test]
    fn point_along_clamps_to_bounding_box() {
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        let far = s.point_along(10.0);
        assert!(far.approx_eq(&Point::new(2.0, 0.0)));
    }

    #[test]
    fn cross_segment_requires_both_boxes() {
        let s1 = Segment::new(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        let s2 = Segment::new(Point::new(0.0, 2.0), Point::new(2.0, 0.0));
        let p = s1.cross_segment(&s2).expect("segments cross at midpoint");
        assert!(p.approx_eq(&Point::new(1.0, 1.0)));

        let s3 = Segment::new(Point::new(3.0, 3.0), Point::new(4.0, 2.0));
        assert!(s1.cross_segment(&s3).is_none());
    }
}
