//! Per-client connection handler
//!
//! Drives exactly one TCP connection to completion: reads chunks, splits
//! them into lines, decodes each line into a command and forwards it to
//! the serial writer. Malformed lines are logged and skipped; the
//! connection survives them.
//!
//! No error escapes this module. Disconnects and resets are expected
//! terminal conditions for a connection, never for the service. The
//! stream is dropped on every exit path.

use super::writer::CommandSink;
use crate::codec;
use crate::constants::{READ_BUFFER_SIZE, SHUTDOWN_POLL_INTERVAL_MS};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

/// Run one client connection until it closes, errors, or shutdown
pub async fn handle(
    mut stream: TcpStream,
    peer: SocketAddr,
    sink: CommandSink,
    shutdown: Arc<AtomicBool>,
) {
    info!("Client connected: {}", peer);

    let mut buf = [0u8; READ_BUFFER_SIZE];

    loop {
        // Checked on every iteration: a client that sends continuously
        // must not starve shutdown by always winning the select below
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let n = tokio::select! {
            // Wakes an idle connection so the check above still runs
            _ = tokio::time::sleep(Duration::from_millis(SHUTDOWN_POLL_INTERVAL_MS)) => continue,

            read = stream.read(&mut buf) => match read {
                Ok(0) => {
                    info!("Client {} disconnected", peer);
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    // Reset by peer and friends: terminal for this
                    // connection only
                    warn!("Client {} connection error: {}", peer, e);
                    break;
                }
            }
        };

        let text = match std::str::from_utf8(&buf[..n]) {
            Ok(text) => text,
            Err(e) => {
                // Tolerate malformed text: drop the chunk, keep reading
                warn!("Client {} sent invalid UTF-8: {}", peer, e);
                continue;
            }
        };

        debug!("Received from {}: {:?}", peer, text.trim());

        for line in text.trim().lines() {
            match codec::decode_line(line) {
                Some(cmd) => {
                    // Writer gone means the service is shutting down
                    if sink.send(cmd).await.is_err() {
                        debug!("Command sink closed, dropping client {}", peer);
                        return;
                    }
                }
                None => warn!("Ignoring invalid command from {}: {:?}", peer, line),
            }
        }
    }
}
