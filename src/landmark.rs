//! Landmark feed monitor
//!
//! The perception process publishes hand-landmark geometry as UDP JSON
//! datagrams on the loopback interface. Nothing in the relay consumes
//! them: the mapping from landmark coordinates to actuator angles is an
//! open integration question, so this module only observes the feed and
//! logs a per-frame summary for diagnostics.
//!
//! Disabled by default; enable with `--landmark-port` or the `[landmark]`
//! config section.

use crate::constants::LANDMARK_BUFFER_SIZE;
use crate::error::{RelayError, Result};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

/// One hand landmark in normalized camera space
#[derive(Debug, Clone, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub id: u32,
}

/// One datagram from the perception process
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkFrame {
    pub landmarks: Vec<Landmark>,
    pub timestamp: f64,
}

/// Receive landmark datagrams until shutdown
///
/// Bind failure is returned to the caller; everything after that is
/// non-fatal (malformed datagrams are logged and dropped).
pub async fn monitor(port: u16, shutdown: Arc<AtomicBool>) -> Result<()> {
    let socket = UdpSocket::bind(("127.0.0.1", port))
        .await
        .map_err(|e| RelayError::LandmarkBind { port, source: e })?;

    info!("Landmark monitor listening on UDP:{}", port);

    let mut buf = [0u8; LANDMARK_BUFFER_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        match tokio::time::timeout(Duration::from_millis(100), socket.recv_from(&mut buf)).await {
            Ok(Ok((len, _addr))) => match serde_json::from_slice::<LandmarkFrame>(&buf[..len]) {
                Ok(frame) => {
                    debug!(
                        "Landmark frame: {} points at t={:.3}",
                        frame.landmarks.len(),
                        frame.timestamp
                    );
                }
                Err(e) => warn!("Dropping malformed landmark datagram: {}", e),
            },
            Ok(Err(e)) => warn!("Landmark socket error: {}", e),
            Err(_) => {
                // Timeout - expected, allows checking the shutdown flag
            }
        }
    }

    Ok(())
}
