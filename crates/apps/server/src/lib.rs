//! Triangulator service crate.
//!
//! Serves `GET /triangulation/{pointset_id}`: the point set is fetched from
//! the point set manager, decoded, fan-triangulated and returned as a binary
//! mesh (see the `mesh` crate for the wire format). Failures are answered with
//! a JSON `{"code", "message"}` envelope and a matching status.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod metrics;
pub mod server;
pub mod source;

pub use config::ServerConfig;
pub use error::ServerError;
pub use handler::{Route, TriangulationHandler};
pub use http::{ErrorBody, Request, Response};
pub use metrics::ServerMetrics;
pub use server::TriangulatorServer;
pub use source::{FetchError, PointSetClient, PointSetSource, StaticPointSetSource};
