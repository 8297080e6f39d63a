//! Ground-truth flag position sources used by the search controller's
//! detection check. Grounded on the source's `IFlag` hierarchy
//! (`FixedFlag`, `RandomFlag`, `RandomFlagPoly`).

use crate::geo::{Point, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Supplies the position a vehicle must come within detection range of.
pub trait FlagSource: Send + Sync {
    fn position(&self) -> Point;
}

/// A flag at a fixed, caller-supplied position.
#[derive(Debug, Clone, Copy)]
pub struct FixedFlag {
    position: Point,
}

impl FixedFlag {
    pub fn new(position: Point) -> Self {
        FixedFlag { position }
    }
}

impl FlagSource for FixedFlag {
    fn position(&self) -> Point {
        self.position
    }
}

/// A flag placed uniformly at random within a rectangular bounding box.
pub struct RandomFlag {
    position: Point,
}

impl RandomFlag {
    /// `min`/`max` describe the opposite corners of the sampling box.
    /// When `seed` is `Some`, sampling is reproducible across runs.
    pub fn new(min: Point, max: Point, seed: Option<u64>) -> Self {
        let mut rng = seeded_rng(seed);
        let x = rng.gen_range(min.x.min(max.x)..=min.x.max(max.x));
        let y = rng.gen_range(min.y.min(max.y)..=min.y.max(max.y));
        RandomFlag { position: Point::new(x, y) }
    }
}

impl FlagSource for RandomFlag {
    fn position(&self) -> Point {
        self.position
    }
}

/// A flag placed uniformly at random within an arbitrary polygon, via
/// rejection sampling against the polygon's bounding box.
pub struct RandomFlagPoly {
    position: Point,
}

impl RandomFlagPoly {
    pub fn new(area: &Polygon, seed: Option<u64>) -> Option<Self> {
        if area.size() < 3 {
            return None;
        }
        let (mut min_x, mut max_x, mut min_y, mut max_y) =
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
        for p in area.vertices() {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        let mut rng = seeded_rng(seed);
        for _ in 0..10_000 {
            let candidate = Point::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y));
            if area.is_point_inside(&candidate).unwrap_or(false) {
                return Some(RandomFlagPoly { position: candidate });
            }
        }
        None
    }
}

impl FlagSource for RandomFlagPoly {
    fn position(&self) -> Point {
        self.position
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Wraps any [`FlagSource`] so its position can be read from multiple
/// vehicle worker threads concurrently.
pub struct SharedFlag<F: FlagSource> {
    inner: Mutex<F>,
}

impl<F: FlagSource> SharedFlag<F> {
    pub fn new(flag: F) -> Self {
        SharedFlag { inner: Mutex::new(flag) }
    }

    pub fn position(&self) -> Point {
        self.inner.lock().unwrap().position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_flag_returns_configured_position() {
        let flag = FixedFlag::new(Point::new(47.397637, 8.545618));
        assert_eq!(flag.position(), Point::new(47.397637, 8.545618));
    }

    #[test]
    fn random_flag_is_reproducible_with_a_seed() {
        let a = RandomFlag::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0), Some(42));
        let b = RandomFlag::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0), Some(42));
        assert_eq!(a.position(), b.position());
    }

    #[test]
    fn random_flag_poly_stays_inside_the_polygon() {
        let area = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let flag = RandomFlagPoly::new(&area, Some(7)).expect("sampling should succeed");
        assert!(area.is_point_inside(&flag.position()).unwrap());
    }
}
