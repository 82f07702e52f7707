//! Deserialization of point sets and meshes from the binary wire format.

use super::constants::TRIANGLE_SIZE;
use super::serializer::validate_triangles;
use super::{encoded_pointset_len, CodecError};
use crate::{Mesh, PointSet, Triangle};
use glam::Vec2;

/// Parse a point set.
///
/// Bytes past the declared points are ignored, so a mesh buffer is also a
/// valid point set buffer.
///
/// # Example
///
/// ```
/// use mesh::codec::{decode_pointset, CodecError};
///
/// let points = decode_pointset(&[0, 0, 0, 1, 0x3F, 0x80, 0, 0, 0, 0, 0, 0]).unwrap();
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].x, 1.0);
///
/// assert!(matches!(decode_pointset(&[0, 0]), Err(CodecError::TooShort { .. })));
/// ```
pub fn decode_pointset(data: &[u8]) -> Result<PointSet, CodecError> {
    WireReader::new(data).read_pointset()
}

/// Parse a mesh: a point set followed by a triangle section.
///
/// Decoded triangles are checked against the point count.
pub fn decode_mesh(data: &[u8]) -> Result<Mesh, CodecError> {
    let mut reader = WireReader::new(data);
    let points = reader.read_pointset()?;

    let count = reader.read_u32()? as usize;
    reader.require(TRIANGLE_SIZE.saturating_mul(count))?;

    let mut triangles = Vec::with_capacity(count);
    for _ in 0..count {
        let i = reader.read_u32()?;
        let j = reader.read_u32()?;
        let k = reader.read_u32()?;
        triangles.push(Triangle::new(i64::from(i), i64::from(j), i64::from(k)));
    }

    validate_triangles(&triangles, points.len())?;
    Ok(Mesh::new(points, triangles))
}

/// Cursor over a big-endian byte buffer.
struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Fail unless `len` more bytes are available at the cursor.
    fn require(&self, len: usize) -> Result<(), CodecError> {
        let expected = self.offset.saturating_add(len);
        if expected > self.data.len() {
            return Err(CodecError::TooShort {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        self.require(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(bytes)
    }

    fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_bytes().map(u32::from_be_bytes)
    }

    fn read_f32(&mut self) -> Result<f32, CodecError> {
        // from_be_bytes goes through from_bits, so NaN payloads survive.
        self.read_bytes().map(f32::from_be_bytes)
    }

    /// Read a point set, leaving the cursor right after the declared points.
    fn read_pointset(&mut self) -> Result<PointSet, CodecError> {
        let count = self.read_u32()? as usize;
        if count == 0 {
            return Ok(PointSet::default());
        }

        let expected = encoded_pointset_len(count);
        if self.data.len() < expected {
            return Err(CodecError::TooShort {
                expected,
                actual: self.data.len(),
            });
        }

        let mut points = Vec::with_capacity(count);
        for _ in 0..count {
            let x = self.read_f32()?;
            let y = self.read_f32()?;
            points.push(Vec2::new(x, y));
        }

        Ok(PointSet::new(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_too_short() {
        assert_eq!(
            decode_pointset(&[]),
            Err(CodecError::TooShort {
                expected: 4,
                actual: 0
            })
        );
    }

    #[test]
    fn test_zero_count_ignores_trailing_bytes() {
        let points = decode_pointset(&[0, 0, 0, 0, 0xFF, 0xFF, 0xFF]).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_truncated_points_report_lengths() {
        let mut data = vec![0, 0, 0, 2];
        data.extend_from_slice(&[0; 8]);
        assert_eq!(
            decode_pointset(&data),
            Err(CodecError::TooShort {
                expected: 20,
                actual: 12
            })
        );
    }

    #[test]
    fn test_huge_declared_count_is_too_short() {
        let result = decode_pointset(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(CodecError::TooShort { actual: 4, .. })));
    }

    #[test]
    fn test_huge_declared_triangle_count_is_too_short() {
        let mut data = vec![0, 0, 0, 0];
        data.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        let expected = 8usize.saturating_add(TRIANGLE_SIZE.saturating_mul(u32::MAX as usize));
        assert_eq!(
            decode_mesh(&data),
            Err(CodecError::TooShort {
                expected,
                actual: 8
            })
        );
    }

    #[test]
    fn test_mesh_missing_triangle_count() {
        let data = [0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(
            decode_mesh(&data),
            Err(CodecError::TooShort {
                expected: 16,
                actual: 12
            })
        );
    }

    #[test]
    fn test_mesh_truncated_triangles() {
        let mut data = vec![0, 0, 0, 0];
        data.extend_from_slice(&[0, 0, 0, 1]);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(
            decode_mesh(&data),
            Err(CodecError::TooShort {
                expected: 20,
                actual: 16
            })
        );
    }

    #[test]
    fn test_mesh_with_dangling_index_rejected() {
        let mut data = vec![0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0];
        data.extend_from_slice(&[0, 0, 0, 1]);
        data.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
        assert_eq!(
            decode_mesh(&data),
            Err(CodecError::IndexOutOfBounds {
                triangle: Triangle::new(0, 0, 3),
                max_index: 0,
            })
        );
    }
}
