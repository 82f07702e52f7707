//! Route dispatch and the fetch → decode → triangulate → encode pipeline.

use crate::error::{Result, ServerError};
use crate::http::{Request, Response};
use crate::metrics::ServerMetrics;
use crate::source::PointSetSource;
use mesh::{codec, FanTriangulator, Triangulator};
use reqwest::Method;
use std::sync::Arc;
use std::time::Instant;

const TRIANGULATION_PREFIX: &str = "/triangulation/";

/// Routes known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    /// `/triangulation/{pointset_id}` with a single non-empty segment other
    /// than `.` or `..`.
    Triangulation(&'a str),
    NotFound,
}

impl<'a> Route<'a> {
    pub fn parse(path: &'a str) -> Self {
        match path.strip_prefix(TRIANGULATION_PREFIX) {
            Some(id) if is_pointset_id(id) => Route::Triangulation(id),
            _ => Route::NotFound,
        }
    }
}

fn is_pointset_id(id: &str) -> bool {
    !id.is_empty() && !id.contains('/') && id != "." && id != ".."
}

/// Answers requests using a point set source and a triangulator.
pub struct TriangulationHandler {
    source: Arc<dyn PointSetSource>,
    triangulator: Arc<dyn Triangulator>,
    metrics: Arc<ServerMetrics>,
}

impl TriangulationHandler {
    pub fn new(source: Arc<dyn PointSetSource>) -> Self {
        Self {
            source,
            triangulator: Arc::new(FanTriangulator),
            metrics: Arc::new(ServerMetrics::default()),
        }
    }

    pub fn with_triangulator(mut self, triangulator: Arc<dyn Triangulator>) -> Self {
        self.triangulator = triangulator;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ServerMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<ServerMetrics> {
        &self.metrics
    }

    /// Dispatch a request and build its response. Never fails: errors become
    /// JSON error responses.
    pub async fn handle(&self, request: &Request) -> Response {
        let start = Instant::now();

        let response = match Route::parse(&request.path) {
            Route::Triangulation(pointset_id) if request.method == Method::GET => {
                match self.triangulation(pointset_id).await {
                    Ok(bytes) => Response::octet_stream(bytes),
                    Err(err) => {
                        tracing::warn!("Triangulation of {} failed: {}", pointset_id, err);
                        err.to_response()
                    }
                }
            }
            Route::Triangulation(_) => {
                ServerError::MethodNotAllowed(request.method.clone()).to_response()
            }
            Route::NotFound => ServerError::NotFound(request.path.clone()).to_response(),
        };

        self.metrics.record(response.status, response.body.len());
        tracing::info!(
            "{} {} -> {} ({} bytes, {:?})",
            request.method,
            request.path,
            response.status.as_u16(),
            response.body.len(),
            start.elapsed()
        );

        response
    }

    /// Fetch a point set and return its encoded triangulation.
    pub async fn triangulation(&self, pointset_id: &str) -> Result<Vec<u8>> {
        let data = self.source.fetch(pointset_id).await?;

        let points = codec::decode_pointset(&data).map_err(ServerError::InvalidPointSet)?;
        if points.len() < 3 {
            return Err(ServerError::InsufficientPoints {
                count: points.len(),
            });
        }

        let triangles = self.triangulator.triangulate(&points);
        tracing::debug!(
            "Point set {}: {} points -> {} triangles",
            pointset_id,
            points.len(),
            triangles.len()
        );

        codec::encode_mesh(&points, &triangles).map_err(ServerError::Encode)
    }
}
