//! Fan triangulation behaviour tests
//!
//! Covers the count, coverage and distinctness laws plus the end-to-end
//! decode → triangulate → encode scenarios.

use mesh::codec::{decode_pointset, encode_mesh, encode_pointset};
use mesh::{triangulate, FanTriangulator, PointSet, Triangle, Triangulator};
use std::collections::HashSet;

/// Helper: Points laid out on a grid, `n` in total
fn grid_points(n: usize, width: usize) -> PointSet {
    PointSet::from_coords((0..n).map(|i| ((i % width) as f32, (i / width) as f32)))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[test]
fn test_fan_count_law() {
    for n in 0..50 {
        let triangles = triangulate(&grid_points(n, 7));
        assert_eq!(triangles.len(), n.saturating_sub(2), "n = {}", n);
    }
}

#[test]
fn test_coverage_law() {
    for n in 3..40 {
        let covered: HashSet<i64> = triangulate(&grid_points(n, 5))
            .iter()
            .flat_map(|t| t.indices())
            .collect();
        let expected: HashSet<i64> = (0..n as i64).collect();
        assert_eq!(covered, expected, "n = {}", n);
    }
}

#[test]
fn test_distinctness_law() {
    let triangles = triangulate(&grid_points(25, 5));

    for triangle in &triangles {
        let [i, j, k] = triangle.indices();
        assert!(i != j && j != k && i != k, "degenerate {}", triangle);
    }

    let unique: HashSet<[i64; 3]> = triangles.iter().map(Triangle::sorted).collect();
    assert_eq!(unique.len(), triangles.len());
}

#[test]
fn test_fan_anchored_at_zero() {
    let triangles = triangulate(&grid_points(6, 3));
    assert_eq!(
        triangles,
        vec![
            Triangle::new(0, 1, 2),
            Triangle::new(0, 2, 3),
            Triangle::new(0, 3, 4),
            Triangle::new(0, 4, 5),
        ]
    );
}

#[test]
fn test_determinism() {
    let points = grid_points(100, 10);
    assert_eq!(triangulate(&points), triangulate(&points));
    assert_eq!(
        FanTriangulator.triangulate(&points),
        triangulate(&points)
    );
}

#[test]
fn test_topology_ignores_coordinates() {
    let degenerate = PointSet::from_coords([
        (0.0, 0.0),
        (0.0, 0.0),
        (f32::NAN, f32::INFINITY),
        (1.0, 1.0),
        (2.0, 2.0),
    ]);
    assert_eq!(triangulate(&degenerate), triangulate(&grid_points(5, 5)));
}

#[test]
fn test_collinear_points_still_triangulated() {
    let collinear = PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_eq!(triangulate(&collinear), vec![Triangle::new(0, 1, 2)]);
}

#[test]
fn test_large_input() {
    let triangles = triangulate(&grid_points(10_000, 100));
    assert_eq!(triangles.len(), 9_998);
    assert_eq!(triangles.last(), Some(&Triangle::new(0, 9_998, 9_999)));
}

#[test]
fn test_end_to_end_single_triangle() {
    let input = encode_pointset(&PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]));

    let points = decode_pointset(&input).unwrap();
    let triangles = triangulate(&points);
    assert_eq!(triangles, vec![Triangle::new(0, 1, 2)]);

    let bytes = encode_mesh(&points, &triangles).unwrap();
    assert_eq!(bytes.len(), 44);
    assert_eq!(read_u32(&bytes, 0), 3);
    assert_eq!(read_u32(&bytes, 28), 1);
    assert_eq!(
        (read_u32(&bytes, 32), read_u32(&bytes, 36), read_u32(&bytes, 40)),
        (0, 1, 2)
    );
}

#[test]
fn test_end_to_end_unit_square() {
    let points = PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let triangles = triangulate(&points);
    assert_eq!(triangles, vec![Triangle::new(0, 1, 2), Triangle::new(0, 2, 3)]);

    let bytes = encode_mesh(&points, &triangles).unwrap();
    let offset = 4 + 8 * 4;
    assert_eq!(read_u32(&bytes, offset), 2);
    assert_eq!(bytes.len(), offset + 4 + 2 * 12);
}
