//! Composite ordering of points along one axis.
//!
//! A point is compared on the chosen axis first and on the other axis second,
//! then the whole comparison is repeated with the roles swapped. Distinct
//! points never compare equal, which keeps median selection and pruning well
//! defined when several points share a coordinate.

use crate::types::{Axis, Point};
use std::cmp::Ordering;

/// Lexicographic key over a primary and a secondary coordinate pair.
#[derive(Debug, Clone, Copy)]
pub struct CompositeKey {
    primary: [f64; 2],
    secondary: [f64; 2],
}

impl CompositeKey {
    /// Smallest possible key; lower edge of an unbounded region.
    pub const MIN: CompositeKey = CompositeKey {
        primary: [f64::NEG_INFINITY; 2],
        secondary: [f64::NEG_INFINITY; 2],
    };

    /// Largest possible key; upper edge of an unbounded region.
    pub const MAX: CompositeKey = CompositeKey {
        primary: [f64::INFINITY; 2],
        secondary: [f64::INFINITY; 2],
    };

    pub const fn new(primary: [f64; 2], secondary: [f64; 2]) -> Self {
        Self { primary, secondary }
    }

    /// Key of `point` when ordering along `axis`.
    pub fn for_point(point: Point, axis: Axis) -> Self {
        let (x, y) = (point.x(), point.y());
        match axis {
            Axis::X => Self::new([x, y], [y, x]),
            Axis::Y => Self::new([y, x], [x, y]),
        }
    }

    /// Key sorting before every point whose axis coordinate is `>= value`.
    pub fn lower_bound(value: f64) -> Self {
        Self::new(
            [value + 0.0, f64::NEG_INFINITY],
            [f64::NEG_INFINITY, f64::NEG_INFINITY],
        )
    }

    /// Key sorting after every point whose axis coordinate is `<= value`.
    pub fn upper_bound(value: f64) -> Self {
        Self::new(
            [value + 0.0, f64::INFINITY],
            [f64::INFINITY, f64::INFINITY],
        )
    }

    pub fn primary(&self) -> [f64; 2] {
        self.primary
    }

    pub fn secondary(&self) -> [f64; 2] {
        self.secondary
    }

    /// The coordinate on the key's own axis.
    pub fn leading(&self) -> f64 {
        self.primary[0]
    }
}

fn cmp_pair(a: &[f64; 2], b: &[f64; 2]) -> Ordering {
    a[0].total_cmp(&b[0]).then_with(|| a[1].total_cmp(&b[1]))
}

impl Ord for CompositeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_pair(&self.primary, &other.primary)
            .then_with(|| cmp_pair(&self.secondary, &other.secondary))
    }
}

impl PartialOrd for CompositeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CompositeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CompositeKey {}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: f64, y: f64, axis: Axis) -> CompositeKey {
        CompositeKey::for_point(Point::new(x, y), axis)
    }

    #[test]
    fn test_axis_layout() {
        let k = key(1.0, 2.0, Axis::X);
        assert_eq!(k.primary(), [1.0, 2.0]);
        assert_eq!(k.secondary(), [2.0, 1.0]);

        let k = key(1.0, 2.0, Axis::Y);
        assert_eq!(k.primary(), [2.0, 1.0]);
        assert_eq!(k.secondary(), [1.0, 2.0]);
        assert_eq!(k.leading(), 2.0);
    }

    #[test]
    fn test_tie_break_on_other_axis() {
        // Same x, different y: the secondary coordinate decides.
        assert!(key(4.0, 176.33, Axis::X) < key(4.0, 181.13, Axis::X));
        assert!(key(3.0, 500.0, Axis::X) < key(4.0, 0.0, Axis::X));
        assert!(key(3.0, 500.0, Axis::Y) > key(4.0, 0.0, Axis::Y));
    }

    #[test]
    fn test_distinct_points_never_tie() {
        let points = [(1.0, 1.0), (1.0, 2.0), (2.0, 1.0), (2.0, 2.0)];
        for axis in Axis::ALL {
            for (i, a) in points.iter().enumerate() {
                for (j, b) in points.iter().enumerate() {
                    let ordering = key(a.0, a.1, axis).cmp(&key(b.0, b.1, axis));
                    assert_eq!(ordering == Ordering::Equal, i == j);
                }
            }
        }
    }

    #[test]
    fn test_bounds_are_inclusive_on_leading_coordinate() {
        for axis in Axis::ALL {
            let on_edge = key(3.0, 3.0, axis);
            assert!(CompositeKey::lower_bound(3.0) <= on_edge);
            assert!(on_edge <= CompositeKey::upper_bound(3.0));
            assert!(CompositeKey::lower_bound(3.5) > on_edge);
            assert!(CompositeKey::upper_bound(2.5) < on_edge);
        }
    }

    #[test]
    fn test_min_max_enclose_everything() {
        let k = key(f64::MAX, f64::MIN, Axis::Y);
        assert!(CompositeKey::MIN < k);
        assert!(k < CompositeKey::MAX);
        assert!(CompositeKey::lower_bound(f64::NEG_INFINITY) >= CompositeKey::MIN);
        assert!(CompositeKey::upper_bound(f64::INFINITY) <= CompositeKey::MAX);
    }

    #[test]
    fn test_negative_zero_bound() {
        let k = key(0.0, 1.0, Axis::X);
        assert!(CompositeKey::lower_bound(-0.0) <= k);
        assert!(k <= CompositeKey::upper_bound(-0.0));
    }
}
