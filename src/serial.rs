//! Serial channel to the servo controller
//!
//! Owns the single physical serial connection. The device has no
//! multiplexing, so exactly one `SerialChannel` exists process-wide and it
//! is never cloned; all writes go through the one writer that owns it
//! (see `relay::writer`).
//!
//! Availability policy:
//! - Startup open failure is non-fatal; the service runs without a device.
//! - A closed channel reopens lazily on the next `send`.
//! - Write failures are transient: logged by the caller, the channel stays
//!   open, the next command starts over.

use crate::error::{RelayError, Result};
use std::io::Write;
use std::time::Duration;
use tracing::info;

/// Exclusive handle to the servo controller's serial link
///
/// `Closed` is represented by `port == None`; `Open` holds the device
/// handle. Transitions: `Closed -> Open` on `open` (eager at startup or
/// lazy on `send`), `Open -> Closed` on `close`.
pub struct SerialChannel {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
    port: Option<Box<dyn serialport::SerialPort>>,
}

impl SerialChannel {
    /// Create a channel in the `Closed` state
    pub fn new(port_name: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout,
            port: None,
        }
    }

    /// Device path this channel is bound to
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Whether the device handle is currently held
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Acquire the device
    ///
    /// No-op when already open. Fails with `SerialOpen` when the device is
    /// missing, access is denied, or it is held exclusively elsewhere.
    pub fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }

        let port = serialport::new(self.port_name.as_str(), self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| RelayError::SerialOpen {
                port: self.port_name.clone(),
                source: std::io::Error::other(e.to_string()),
            })?;

        info!(
            "Serial port {} opened at {} baud",
            self.port_name, self.baud_rate
        );
        self.port = Some(port);
        Ok(())
    }

    /// Write one wire line to the device
    ///
    /// Opens the channel first if it is closed; an open failure is returned
    /// as-is and leaves the channel closed. A write failure is returned as
    /// `SerialWrite` and leaves the channel open - the error is treated as
    /// transient and the next send starts from scratch.
    pub fn send(&mut self, line: &str) -> Result<()> {
        self.open()?;

        // open() guarantees the handle exists here
        let port = self.port.as_mut().ok_or_else(|| RelayError::SerialOpen {
            port: self.port_name.clone(),
            source: std::io::Error::other("port closed"),
        })?;

        port.write_all(line.as_bytes())
            .map_err(|e| RelayError::SerialWrite {
                port: self.port_name.clone(),
                source: e,
            })
    }

    /// Release the device if held; idempotent
    pub fn close(&mut self) {
        if self.port.take().is_some() {
            info!("Serial port {} closed", self.port_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_device_channel() -> SerialChannel {
        SerialChannel::new(
            "/dev/does-not-exist-servo-relay",
            9600,
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_new_channel_is_closed() {
        let channel = missing_device_channel();
        assert!(!channel.is_open());
    }

    #[test]
    fn test_open_missing_device_fails() {
        let mut channel = missing_device_channel();
        let err = channel.open().unwrap_err();
        assert!(matches!(err, RelayError::SerialOpen { .. }));
        assert!(!channel.is_open());
    }

    #[test]
    fn test_send_on_closed_channel_attempts_open() {
        // Lazy reconnect: send on a closed channel tries to open first and
        // reports the open failure without changing state.
        let mut channel = missing_device_channel();
        let err = channel.send("finger1 90\n").unwrap_err();
        assert!(matches!(err, RelayError::SerialOpen { .. }));
        assert!(!channel.is_open());

        // A later send retries from scratch and fails the same way
        let err = channel.send("finger2 45\n").unwrap_err();
        assert!(matches!(err, RelayError::SerialOpen { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_leaves_channel_open() {
        use serialport::{SerialPort, TTYPort};

        // Pseudo-terminal pair stands in for the device; reopen the slave
        // end through the normal path
        let (master, slave) = TTYPort::pair().unwrap();
        let path = slave.name().unwrap();
        drop(slave);

        let mut channel = SerialChannel::new(path, 9600, Duration::from_millis(100));
        channel.open().unwrap();
        assert!(channel.is_open());

        // Hang up the device side; the next write fails
        drop(master);

        let err = channel.send("finger1 90\n").unwrap_err();
        assert!(matches!(err, RelayError::SerialWrite { .. }));
        // Transient by contract: the handle is kept
        assert!(channel.is_open());

        // No retry of the failed write; the next command starts over and
        // hits the same transient error
        let err = channel.send("finger2 45\n").unwrap_err();
        assert!(matches!(err, RelayError::SerialWrite { .. }));
        assert!(channel.is_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut channel = missing_device_channel();
        channel.close();
        channel.close();
        assert!(!channel.is_open());
    }
}
