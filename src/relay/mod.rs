//! Relay service - TCP listener to serial writer
//!
//! Composition root for the command path:
//!
//! ```text
//! client bytes -> connection handler -> codec -> command channel
//!              -> serial writer thread -> device bytes
//! ```
//!
//! The listener accepts each client onto its own task; all tasks feed the
//! single serial writer, so the device still sees one writer regardless of
//! how many clients are connected.

pub mod connection;
pub mod writer;

pub use writer::{CommandSink, SerialWriter};

use crate::config::Config;
use crate::constants::{ACCEPT_RETRY_DELAY_MS, SHUTDOWN_POLL_INTERVAL_MS};
use crate::error::{RelayError, Result};
use crate::serial::SerialChannel;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Run the relay service until shutdown
///
/// Serial unavailability at startup is non-fatal: the service binds and
/// accepts clients anyway, and every send retries opening the device. A
/// bind failure is fatal and returned to the caller.
///
/// On return the serial channel is guaranteed closed: the accept loop has
/// stopped, command senders are gone and the writer thread has been joined.
pub async fn run(config: &Config, shutdown: Arc<AtomicBool>) -> Result<()> {
    // Fail fast: no listener, no service
    let listener = bind(&config.bind_addr())?;

    let mut channel = SerialChannel::new(
        config.serial.port.as_str(),
        config.serial.baud_rate,
        Duration::from_millis(config.serial.timeout_ms),
    );
    if let Err(e) = channel.open() {
        warn!("{}", e);
        warn!("Continuing without serial connection...");
    }

    let (sink, serial_writer) = SerialWriter::spawn(channel);

    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on {}...", addr);
    }

    serve(listener, sink, shutdown).await;

    // All sinks are dropped once the handlers notice shutdown; the writer
    // then drains, closes the serial channel and exits.
    tokio::task::spawn_blocking(move || serial_writer.join())
        .await
        .map_err(|e| RelayError::Runtime {
            source: std::io::Error::other(e.to_string()),
        })?;

    info!("Relay stopped");
    Ok(())
}

/// Accept loop: one spawned handler task per client
///
/// Survives any single connection's failure. An unexpected accept error is
/// logged and retried after a short delay rather than propagated.
pub async fn serve(listener: TcpListener, sink: CommandSink, shutdown: Arc<AtomicBool>) {
    loop {
        // Checked on every iteration: a steady stream of connections must
        // not starve shutdown by always winning the select below
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(SHUTDOWN_POLL_INTERVAL_MS)) => {}

            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    tokio::spawn(connection::handle(
                        stream,
                        peer,
                        sink.clone(),
                        shutdown.clone(),
                    ));
                }
                Err(e) => {
                    warn!("Accept error: {}", e);
                    accept_backoff(&shutdown).await;
                }
            }
        }
    }
}

/// Brief delay after an unexpected accept error, cut short by shutdown
async fn accept_backoff(shutdown: &AtomicBool) {
    let mut waited = 0;
    while waited < ACCEPT_RETRY_DELAY_MS && !shutdown.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(SHUTDOWN_POLL_INTERVAL_MS)).await;
        waited += SHUTDOWN_POLL_INTERVAL_MS;
    }
}

/// Bind the TCP listener with SO_REUSEADDR for quick rebind after restart
pub fn bind(addr: &str) -> Result<TcpListener> {
    let sock_addr: SocketAddr = addr.parse().map_err(|e| RelayError::ConfigValidation {
        field: "server address",
        reason: format!("{}: {}", addr, e),
    })?;

    let map_err = |e| RelayError::Bind {
        addr: addr.to_string(),
        source: e,
    };

    let domain = Domain::for_address(sock_addr);
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(map_err)?;
    socket.set_reuse_address(true).map_err(map_err)?;
    socket.set_nonblocking(true).map_err(map_err)?;
    socket.bind(&sock_addr.into()).map_err(map_err)?;
    socket.listen(5).map_err(map_err)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener).map_err(map_err)
}
