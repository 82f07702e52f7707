//! Binary codec for point sets and triangle meshes.
//!
//! # Format
//!
//! All integers are unsigned 32-bit big-endian; all coordinates are IEEE-754
//! single precision big-endian.
//!
//! ```text
//! [Point set]
//!   point_count N:   4 bytes
//!   points:          N × { x: f32, y: f32 }      (8 bytes each)
//!
//! [Mesh] = [Point set] followed by
//!   triangle_count M: 4 bytes
//!   triangles:        M × { i: u32, j: u32, k: u32 } (12 bytes each)
//! ```
//!
//! # Example
//!
//! ```
//! use mesh::{codec::{decode_pointset, encode_mesh}, triangulate, PointSet};
//!
//! let points = PointSet::from_coords([(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
//! let triangles = triangulate(&points);
//! let bytes = encode_mesh(&points, &triangles).unwrap();
//! assert_eq!(bytes.len(), 44);
//!
//! // The mesh buffer starts with a valid point set buffer.
//! assert_eq!(decode_pointset(&bytes).unwrap(), points);
//! ```

pub mod parser;
pub mod serializer;

use crate::Triangle;
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer is shorter than its header or declared counts require.
    #[error("data too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// A triangle references a negative vertex index.
    #[error("negative index in triangle {triangle}")]
    NegativeIndex { triangle: Triangle },

    /// A triangle references a vertex past the end of the point set.
    #[error("index out of bounds in triangle {triangle}, max index is {max_index}")]
    IndexOutOfBounds { triangle: Triangle, max_index: i64 },
}

/// Wire format constants.
pub mod constants {
    /// Size of a count field (point count or triangle count).
    pub const COUNT_SIZE: usize = 4;

    /// Size of one encoded point (x and y as f32).
    pub const POINT_SIZE: usize = 8;

    /// Size of one encoded triangle (three u32 indices).
    pub const TRIANGLE_SIZE: usize = 12;
}

/// Exact size of an encoded point set with `points` points, saturating at
/// `usize::MAX`.
pub const fn encoded_pointset_len(points: usize) -> usize {
    constants::COUNT_SIZE.saturating_add(constants::POINT_SIZE.saturating_mul(points))
}

/// Exact size of an encoded mesh, saturating at `usize::MAX`.
pub const fn encoded_mesh_len(points: usize, triangles: usize) -> usize {
    encoded_pointset_len(points)
        .saturating_add(constants::COUNT_SIZE)
        .saturating_add(constants::TRIANGLE_SIZE.saturating_mul(triangles))
}

pub use parser::{decode_mesh, decode_pointset};
pub use serializer::{encode_mesh, encode_pointset};
