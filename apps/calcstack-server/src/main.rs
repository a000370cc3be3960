//! CalcStack Server - expression calculations over HTTP.
//!
//! Evaluates arithmetic and boolean expressions and keeps the results as
//! records that can be listed, fetched, re-evaluated, and deleted.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:8080 calcstack-server
//! calcstack-server --health-check
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `127.0.0.1:8080` | Bind address |
//! | `CALC_MAX_DEPTH` | `128` | Maximum expression nesting depth (at most 256) |
//! | `CALC_MAX_BODY_BYTES` | `65536` | Maximum request body size |
//! | `CORS_ALLOW_ORIGIN` | `*` | `Access-Control-Allow-Origin` value |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod gateway;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use calcstack_core::{CalcStackConfig, CalcStackError};
use calcstack_http::dispatch::CalcHandler;
use calcstack_http::service::{CalcHttpConfig, CalcHttpService};
use calcstack_service::{CalcProvider, CalcStackHandler};

use crate::gateway::GatewayService;

/// Server version reported in health check responses.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Log configuration values that were rejected while loading.
fn report_rejected(rejected: &[CalcStackError]) {
    for err in rejected {
        warn!(error = %err, "ignoring invalid configuration value");
    }
}

/// Build the [`CalcHttpConfig`] from the application [`CalcStackConfig`].
fn build_http_config(config: &CalcStackConfig) -> CalcHttpConfig {
    CalcHttpConfig {
        max_body_bytes: config.max_body_bytes,
        cors_allow_origin: config.cors_allow_origin.clone(),
    }
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve<H: CalcHandler>(listener: TcpListener, service: GatewayService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting `/health`.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if is_healthy_response(&response) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// Whether a raw HTTP response is a successful health report.
fn is_healthy_response(response: &str) -> bool {
    response.starts_with("HTTP/1.1 200") && response.contains("\"status\":\"running\"")
}

/// Address to probe for `--health-check`: wildcard binds are reached via loopback.
fn probe_address(gateway_listen: &str) -> String {
    gateway_listen.replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for container health probes.
    if std::env::args().any(|a| a == "--health-check") {
        let config = CalcStackConfig::from_env();
        let healthy = run_health_check(&probe_address(&config.gateway_listen))
            .await
            .is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let (config, rejected) = CalcStackConfig::collect_from_env();

    init_tracing(&config.log_level)?;
    report_rejected(&rejected);
    config.validate().context("invalid configuration")?;

    info!(
        gateway_listen = %config.gateway_listen,
        max_depth = config.max_depth,
        max_body_bytes = config.max_body_bytes,
        cors_allow_origin = %config.cors_allow_origin,
        version = VERSION,
        "starting CalcStack server",
    );

    let provider = Arc::new(CalcProvider::new(&config));
    let handler = Arc::new(CalcStackHandler::new(provider));
    let service = CalcHttpService::new(handler, build_http_config(&config));
    let gateway = GatewayService::new(service, VERSION);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, gateway).await
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects formatted log output in memory.
    #[derive(Debug, Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_should_log_rejected_config_values_once_tracing_is_up() {
        let (config, rejected) = CalcStackConfig::collect_from_lookup(|key| {
            (key == "CALC_MAX_DEPTH").then(|| "very-deep".to_owned())
        });
        assert_eq!(config.max_depth, CalcStackConfig::default().max_depth);

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || report_rejected(&rejected));

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("ignoring invalid configuration value"), "{output}");
        assert!(output.contains("invalid value for CALC_MAX_DEPTH: very-deep"), "{output}");
    }

    #[test]
    fn test_should_build_http_config_from_calcstack_config() {
        let config = CalcStackConfig::builder()
            .max_body_bytes(128)
            .cors_allow_origin("https://example.com".to_owned())
            .build();
        let http_config = build_http_config(&config);

        assert_eq!(http_config.max_body_bytes, 128);
        assert_eq!(http_config.cors_allow_origin, "https://example.com");
    }

    #[test]
    fn test_should_probe_loopback_for_wildcard_bind() {
        assert_eq!(probe_address("0.0.0.0:8080"), "127.0.0.1:8080");
        assert_eq!(probe_address("10.1.2.3:9000"), "10.1.2.3:9000");
    }

    #[test]
    fn test_should_recognize_healthy_response() {
        let ok = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\r\n{\"status\":\"running\",\"version\":\"0.1.0\"}";
        assert!(is_healthy_response(ok));
        assert!(!is_healthy_response("HTTP/1.1 404 Not Found\r\n\r\n"));
    }
}
