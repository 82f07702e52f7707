//! Point set, triangle and mesh value types.

use glam::Vec2;
use std::fmt;
use std::ops::Index;

/// Ordered sequence of 2D points.
///
/// The position of a point in the sequence is its index; triangles refer to
/// points by that index. Coordinates are stored as-is: coincident, collinear
/// and non-finite points are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Vec2>,
}

impl PointSet {
    pub fn new(points: Vec<Vec2>) -> Self {
        debug_assert!(
            points.len() <= u32::MAX as usize,
            "point count must fit in a u32"
        );
        Self { points }
    }

    /// Build a point set from raw `(x, y)` pairs.
    pub fn from_coords<I>(coords: I) -> Self
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        Self::new(coords.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    pub fn as_slice(&self) -> &[Vec2] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    pub fn into_inner(self) -> Vec<Vec2> {
        self.points
    }

    /// Bitwise comparison of coordinates, so NaN payloads compare equal to
    /// themselves.
    pub fn bitwise_eq(&self, other: &PointSet) -> bool {
        self.len() == other.len()
            && self.points.iter().zip(&other.points).all(|(a, b)| {
                a.x.to_bits() == b.x.to_bits() && a.y.to_bits() == b.y.to_bits()
            })
    }
}

impl From<Vec<Vec2>> for PointSet {
    fn from(points: Vec<Vec2>) -> Self {
        Self::new(points)
    }
}

impl Index<usize> for PointSet {
    type Output = Vec2;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Vec2;
    type IntoIter = std::slice::Iter<'a, Vec2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Three vertex indices into a [`PointSet`].
///
/// Indices are signed so that invalid caller input can be represented and
/// rejected by the mesh encoder instead of wrapping silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle(pub [i64; 3]);

impl Triangle {
    pub const fn new(i: i64, j: i64, k: i64) -> Self {
        Self([i, j, k])
    }

    pub fn indices(&self) -> [i64; 3] {
        self.0
    }

    /// Indices sorted ascending, for comparing triangles as unordered sets.
    pub fn sorted(&self) -> [i64; 3] {
        let mut indices = self.0;
        indices.sort_unstable();
        indices
    }
}

impl From<(i64, i64, i64)> for Triangle {
    fn from((i, j, k): (i64, i64, i64)) -> Self {
        Self::new(i, j, k)
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [i, j, k] = self.0;
        write!(f, "({}, {}, {})", i, j, k)
    }
}

/// A point set together with the triangles that reference it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub points: PointSet,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(points: PointSet, triangles: Vec<Triangle>) -> Self {
        Self { points, triangles }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_coords_preserves_order() {
        let set = PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(set.len(), 3);
        assert_eq!(set[1], Vec2::new(1.0, 0.0));
        assert_eq!(set.get(2), Some(Vec2::new(0.0, 1.0)));
        assert_eq!(set.get(3), None);
    }

    #[test]
    fn test_bitwise_eq_handles_nan() {
        let a = PointSet::from_coords([(f32::NAN, 1.0)]);
        let b = PointSet::from_coords([(f32::NAN, 1.0)]);
        assert_ne!(a, b);
        assert!(a.bitwise_eq(&b));
    }

    #[test]
    fn test_triangle_display_and_sorted() {
        let tri = Triangle::new(2, 0, 1);
        assert_eq!(tri.to_string(), "(2, 0, 1)");
        assert_eq!(tri.sorted(), [0, 1, 2]);
    }
}
