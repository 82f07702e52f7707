//! Serialization of point sets and meshes to the binary wire format.

use super::{encoded_mesh_len, encoded_pointset_len, CodecError};
use crate::{PointSet, Triangle};

/// Serialize a point set.
///
/// An empty point set encodes to exactly four zero bytes.
///
/// # Example
///
/// ```
/// use mesh::{codec::encode_pointset, PointSet};
///
/// assert_eq!(encode_pointset(&PointSet::default()), vec![0, 0, 0, 0]);
/// ```
pub fn encode_pointset(points: &PointSet) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(encoded_pointset_len(points.len()));
    write_pointset(&mut buffer, points);
    buffer
}

/// Serialize a point set followed by its triangles.
///
/// Every triangle is validated before anything is written, so the result is
/// either the complete buffer or an error.
pub fn encode_mesh(points: &PointSet, triangles: &[Triangle]) -> Result<Vec<u8>, CodecError> {
    validate_triangles(triangles, points.len())?;

    let mut buffer = Vec::with_capacity(encoded_mesh_len(points.len(), triangles.len()));
    write_pointset(&mut buffer, points);
    write_count(&mut buffer, triangles.len());
    for triangle in triangles {
        for index in triangle.indices() {
            // In range after validation: 0 <= index < point count <= u32::MAX.
            buffer.extend_from_slice(&(index as u32).to_be_bytes());
        }
    }

    Ok(buffer)
}

/// Check every triangle against a point set of `point_count` points.
///
/// Triangles are checked in order; a negative index is reported before an
/// out-of-range one within the same triangle.
pub(crate) fn validate_triangles(
    triangles: &[Triangle],
    point_count: usize,
) -> Result<(), CodecError> {
    let point_count = point_count as i64;

    for &triangle in triangles {
        let indices = triangle.indices();
        if indices.iter().any(|&index| index < 0) {
            return Err(CodecError::NegativeIndex { triangle });
        }
        if indices.iter().any(|&index| index >= point_count) {
            return Err(CodecError::IndexOutOfBounds {
                triangle,
                max_index: point_count - 1,
            });
        }
    }

    Ok(())
}

fn write_pointset(buffer: &mut Vec<u8>, points: &PointSet) {
    write_count(buffer, points.len());
    for point in points {
        buffer.extend_from_slice(&point.x.to_be_bytes());
        buffer.extend_from_slice(&point.y.to_be_bytes());
    }
}

fn write_count(buffer: &mut Vec<u8>, count: usize) {
    debug_assert!(count <= u32::MAX as usize, "count must fit in a u32");
    buffer.extend_from_slice(&(count as u32).to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_points() -> PointSet {
        PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)])
    }

    #[test]
    fn test_encode_single_point_layout() {
        let bytes = encode_pointset(&PointSet::from_coords([(1.0, -2.0)]));
        assert_eq!(
            bytes,
            vec![0, 0, 0, 1, 0x3F, 0x80, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_encode_mesh_layout() {
        let bytes = encode_mesh(&triangle_points(), &[Triangle::new(0, 1, 2)]).unwrap();
        assert_eq!(bytes.len(), 44);
        assert_eq!(&bytes[28..32], &[0, 0, 0, 1]);
        assert_eq!(&bytes[32..44], &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn test_validate_reports_first_bad_triangle() {
        let triangles = [
            Triangle::new(0, 1, 2),
            Triangle::new(0, 1, 7),
            Triangle::new(-1, 1, 2),
        ];
        assert_eq!(
            validate_triangles(&triangles, 3),
            Err(CodecError::IndexOutOfBounds {
                triangle: Triangle::new(0, 1, 7),
                max_index: 2,
            })
        );
    }

    #[test]
    fn test_negative_checked_before_bounds() {
        assert_eq!(
            validate_triangles(&[Triangle::new(-1, 5, 2)], 3),
            Err(CodecError::NegativeIndex {
                triangle: Triangle::new(-1, 5, 2),
            })
        );
    }

    #[test]
    fn test_empty_mesh_encodes_two_zero_counts() {
        let bytes = encode_mesh(&PointSet::default(), &[]).unwrap();
        assert_eq!(bytes, vec![0; 8]);
    }
}
