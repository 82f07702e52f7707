//! Point set triangulation.

use crate::{PointSet, Triangle};

/// Turns an ordered point set into triangles referencing it by index.
pub trait Triangulator: Send + Sync {
    fn triangulate(&self, points: &PointSet) -> Vec<Triangle>;
}

/// Fan triangulation anchored at the first point.
///
/// Emits `(0, i, i + 1)` for every `i` in `1..=n-2`. The result depends only
/// on the number of points, never on their coordinates: degenerate input
/// (coincident, collinear, NaN or infinite points) still yields `n - 2`
/// triangles. Fewer than three points yield no triangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FanTriangulator;

impl Triangulator for FanTriangulator {
    fn triangulate(&self, points: &PointSet) -> Vec<Triangle> {
        let n = points.len() as i64;
        if n < 3 {
            return Vec::new();
        }
        (1..n - 1).map(|i| Triangle::new(0, i, i + 1)).collect()
    }
}

/// Triangulate with [`FanTriangulator`].
///
/// # Example
///
/// ```
/// use mesh::{triangulate, PointSet, Triangle};
///
/// let square = PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
/// assert_eq!(
///     triangulate(&square),
///     vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]
/// );
/// ```
pub fn triangulate(points: &PointSet) -> Vec<Triangle> {
    FanTriangulator.triangulate(points)
}
