//! Point set triangulation and its binary wire format.
//!
//! - [`codec`]: big-endian encoding of point sets and triangle meshes
//! - [`triangulation`]: deterministic fan triangulation
//!
//! Everything here is pure and synchronous; functions only read their input
//! and allocate their output, so they can be called from any number of tasks
//! at once.
//!
//! # Example
//!
//! ```
//! use mesh::{codec, triangulate};
//!
//! let input = codec::encode_pointset(&mesh::PointSet::from_coords([
//!     (0.0, 0.0),
//!     (1.0, 0.0),
//!     (0.0, 1.0),
//! ]));
//!
//! let points = codec::decode_pointset(&input).unwrap();
//! let triangles = triangulate(&points);
//! let output = codec::encode_mesh(&points, &triangles).unwrap();
//!
//! let mesh = codec::decode_mesh(&output).unwrap();
//! assert_eq!(mesh.triangles, triangles);
//! ```

pub mod codec;
pub mod triangulation;
mod types;

pub use codec::CodecError;
pub use glam::Vec2;
pub use triangulation::{triangulate, FanTriangulator, Triangulator};
pub use types::{Mesh, PointSet, Triangle};
