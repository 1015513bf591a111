//! Serial writer - the single consumer of the shared serial channel
//!
//! The servo controller has no multiplexing, so every command from every
//! connection funnels through one bounded channel into one blocking writer
//! thread that owns the `SerialChannel` outright. This serializes device
//! access without a lock and keeps per-connection command order (channel
//! send order).
//!
//! The thread exits when all command senders have been dropped, closing
//! the serial channel on the way out. In-flight writes are never
//! interrupted; shutdown waits for the current line to finish.

use crate::codec::{self, Command};
use crate::constants::COMMAND_CHANNEL_CAPACITY;
use crate::serial::SerialChannel;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Cloneable handle for feeding commands to the serial writer
pub type CommandSink = mpsc::Sender<Command>;

/// Handle to the running serial writer thread
pub struct SerialWriter {
    handle: JoinHandle<()>,
}

impl SerialWriter {
    /// Spawn the writer thread owning the serial channel
    ///
    /// Returns the command sink to clone into connection handlers. The
    /// thread runs until every sink clone is dropped.
    pub fn spawn(mut channel: SerialChannel) -> (CommandSink, Self) {
        let (tx, mut rx) = mpsc::channel::<Command>(COMMAND_CHANNEL_CAPACITY);

        let handle = std::thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                let line = codec::encode(&cmd);
                match channel.send(&line) {
                    Ok(()) => debug!("Sent to device: {}", line.trim_end()),
                    // Transient by policy: log and move on to the next command
                    Err(e) => warn!("{}", e),
                }
            }
            channel.close();
        });

        (tx, Self { handle })
    }

    /// Wait for the writer thread to drain and release the serial channel
    ///
    /// All `CommandSink` clones must be dropped first or this blocks
    /// forever. Called once during shutdown, guaranteeing the channel is
    /// closed before the process exits.
    pub fn join(self) {
        if self.handle.join().is_err() {
            warn!("Serial writer thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_writer_exits_when_sinks_drop() {
        let channel = SerialChannel::new(
            "/dev/does-not-exist-servo-relay",
            9600,
            Duration::from_secs(1),
        );
        let (tx, writer) = SerialWriter::spawn(channel);

        // A send toward a missing device is logged, not fatal
        tx.send(Command {
            actuator: "finger1".into(),
            angle: "90".into(),
        })
        .await
        .unwrap();

        drop(tx);
        tokio::task::spawn_blocking(move || writer.join())
            .await
            .unwrap();
    }
}
