use reqwest::StatusCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Request counters
#[derive(Debug, Default)]
pub struct ServerMetrics {
    pub requests: AtomicU64,
    pub triangulations: AtomicU64,
    pub client_errors: AtomicU64,
    pub upstream_errors: AtomicU64,
    pub server_errors: AtomicU64,
    pub bytes_sent: AtomicU64,
}

impl ServerMetrics {
    /// Count one answered request
    pub fn record(&self, status: StatusCode, body_len: usize) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent
            .fetch_add(body_len as u64, Ordering::Relaxed);

        let counter = match status {
            s if s.is_success() => &self.triangulations,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => &self.upstream_errors,
            s if s.is_client_error() => &self.client_errors,
            _ => &self.server_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Print metrics to the log
    pub fn print_stats(&self) {
        tracing::info!(
            "Requests: {} | Triangulations: {} | Client errors: {} | Upstream errors: {} | Server errors: {} | Bytes sent: {}",
            self.requests.load(Ordering::Relaxed),
            self.triangulations.load(Ordering::Relaxed),
            self.client_errors.load(Ordering::Relaxed),
            self.upstream_errors.load(Ordering::Relaxed),
            self.server_errors.load(Ordering::Relaxed),
            self.bytes_sent.load(Ordering::Relaxed),
        );
    }
}

/// Start metrics reporting task
pub async fn start_metrics_reporter(metrics: Arc<ServerMetrics>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        metrics.print_stats();
    }
}
