use std::{env, time::Duration};

/// Configuration for the triangulator binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address and port the server binds to (e.g. `0.0.0.0:8080`).
    pub bind_address: String,
    /// Base URL of the point set manager that stores point sets.
    pub pointset_url: String,
    /// Per-request timeout for point set fetches.
    pub fetch_timeout: Duration,
    /// Retries for transient fetch failures (connection errors, 5xx).
    pub fetch_retries: u32,
    /// Base delay for exponential backoff between fetch retries.
    pub fetch_backoff: Duration,
    /// How often request counters are logged.
    pub metrics_interval: Duration,
    /// Time a client has to send a complete request head and body.
    pub request_timeout: Duration,
    /// How long shutdown waits for in-flight connections.
    pub shutdown_timeout: Duration,
    /// Serve a fixed point set instead of contacting the point set manager.
    pub use_mock: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            pointset_url: "http://pointset-manager:5000".to_string(),
            fetch_timeout: Duration::from_secs(10),
            fetch_retries: 2,
            fetch_backoff: Duration::from_millis(200),
            metrics_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(10),
            use_mock: false,
        }
    }
}

impl ServerConfig {
    /// Builds a configuration from `TRIANGULATOR_*` environment variables,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_address = lookup("TRIANGULATOR_BIND").unwrap_or(defaults.bind_address);
        let pointset_url = lookup("TRIANGULATOR_POINTSET_URL").unwrap_or(defaults.pointset_url);
        let fetch_timeout = lookup("TRIANGULATOR_FETCH_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);
        let fetch_retries = lookup("TRIANGULATOR_FETCH_RETRIES")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fetch_retries);
        let fetch_backoff = lookup("TRIANGULATOR_FETCH_BACKOFF_MS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.fetch_backoff);
        let metrics_interval = lookup("TRIANGULATOR_METRICS_INTERVAL_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.metrics_interval);
        let request_timeout = lookup("TRIANGULATOR_REQUEST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let shutdown_timeout = lookup("TRIANGULATOR_SHUTDOWN_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.shutdown_timeout);
        let use_mock = lookup("TRIANGULATOR_MOCK")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.use_mock);

        anyhow::ensure!(!fetch_timeout.is_zero(), "fetch timeout must be > 0");
        anyhow::ensure!(
            !metrics_interval.is_zero(),
            "metrics interval must be > 0"
        );
        anyhow::ensure!(!request_timeout.is_zero(), "request timeout must be > 0");

        Ok(Self {
            bind_address,
            pointset_url,
            fetch_timeout,
            fetch_retries,
            fetch_backoff,
            metrics_interval,
            request_timeout,
            shutdown_timeout,
            use_mock,
        })
    }
}
