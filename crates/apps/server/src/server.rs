use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use crate::handler::TriangulationHandler;
use crate::http::{read_request, write_response, HttpError, Response};
use crate::metrics::{start_metrics_reporter, ServerMetrics};
use crate::source::{PointSetClient, PointSetSource, StaticPointSetSource};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;

/// HTTP server answering triangulation requests.
pub struct TriangulatorServer {
    config: ServerConfig,
    listener: TcpListener,
    handler: Arc<TriangulationHandler>,
}

impl TriangulatorServer {
    /// Bind the configured address, serving point sets from `source`.
    pub async fn bind(config: ServerConfig, source: Arc<dyn PointSetSource>) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_address).await?;
        let handler = TriangulationHandler::new(source);
        Ok(Self {
            config,
            listener,
            handler: Arc::new(handler),
        })
    }

    /// Bind using the source the configuration asks for: the fixed mock point
    /// set or the point set manager client.
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let source = source_for(&config);
        Self::bind(config, source).await
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        self.handler.metrics().clone()
    }

    /// Serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve until `shutdown` completes, then stop accepting and wait up to
    /// `shutdown_timeout` for in-flight connections before aborting them.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(
            "Triangulator listening on {}",
            self.local_addr()?
        );

        let Self {
            config,
            listener,
            handler,
        } = self;

        let reporter = tokio::spawn(start_metrics_reporter(
            handler.metrics().clone(),
            config.metrics_interval,
        ));

        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    break;
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            tracing::warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    let handler = handler.clone();
                    let request_timeout = config.request_timeout;
                    connections.spawn(async move {
                        if let Err(e) = handle_connection(handler, stream, peer, request_timeout).await {
                            tracing::error!("Error handling connection from {}: {}", peer, e);
                        }
                    });
                }
            }
        }

        drop(listener);
        if !connections.is_empty() {
            tracing::info!("Waiting for {} in-flight connections", connections.len());
            let drained = tokio::time::timeout(config.shutdown_timeout, async {
                while connections.join_next().await.is_some() {}
            })
            .await;
            if drained.is_err() {
                tracing::warn!(
                    "Aborting {} connections still open after {:?}",
                    connections.len(),
                    config.shutdown_timeout
                );
                connections.shutdown().await;
            }
        }

        reporter.abort();
        handler.metrics().print_stats();
        Ok(())
    }
}

/// Pick the point set source described by the configuration.
pub fn source_for(config: &ServerConfig) -> Arc<dyn PointSetSource> {
    if config.use_mock {
        tracing::info!("Serving the built-in mock point set");
        Arc::new(StaticPointSetSource::default())
    } else {
        tracing::info!("Fetching point sets from {}", config.pointset_url);
        Arc::new(
            PointSetClient::new(config.pointset_url.clone())
                .with_timeout(config.fetch_timeout)
                .with_max_retries(config.fetch_retries)
                .with_base_delay_ms(config.fetch_backoff.as_millis() as u64),
        )
    }
}

/// Read one request from the connection, answer it, and close. A client that
/// has not sent a complete request within `request_timeout` gets a 408.
async fn handle_connection(
    handler: Arc<TriangulationHandler>,
    mut stream: TcpStream,
    peer: SocketAddr,
    request_timeout: Duration,
) -> Result<()> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let response = match tokio::time::timeout(request_timeout, read_request(&mut reader)).await {
        Ok(Ok(request)) => handler.handle(&request).await,
        Ok(Err(HttpError::ConnectionClosed)) => {
            tracing::debug!("Connection from {} closed without a request", peer);
            return Ok(());
        }
        Ok(Err(HttpError::Io(e))) => return Err(ServerError::Io(e)),
        Ok(Err(e)) => {
            tracing::debug!("Bad request from {}: {}", peer, e);
            rejected(&handler, ServerError::BadRequest(e))
        }
        Err(_) => {
            tracing::debug!("No request from {} within {:?}", peer, request_timeout);
            rejected(&handler, ServerError::RequestTimeout(request_timeout))
        }
    };

    write_response(&mut write_half, &response).await?;
    write_half.shutdown().await?;
    Ok(())
}

/// Build the response for a request that never reached the handler.
fn rejected(handler: &TriangulationHandler, err: ServerError) -> Response {
    let response = err.to_response();
    handler
        .metrics()
        .record(response.status, response.body.len());
    response
}
