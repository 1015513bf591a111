//! Centralized error types for the relay
//!
//! All relay errors are represented by the `RelayError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, RelayError>`.

use std::fmt;
use std::path::PathBuf;

/// All relay errors
#[derive(Debug)]
pub enum RelayError {
    // === Network ===
    /// Failed to bind the TCP command listener
    Bind {
        addr: String,
        source: std::io::Error,
    },
    /// Failed to bind the UDP landmark monitor socket
    LandmarkBind { port: u16, source: std::io::Error },

    // === Serial ===
    /// Failed to open the serial device
    SerialOpen {
        port: String,
        source: std::io::Error,
    },
    /// Failed to write a command line to the serial device
    SerialWrite {
        port: String,
        source: std::io::Error,
    },

    // === Config ===
    /// Failed to read the config file
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: std::io::Error },
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. }
            | Self::LandmarkBind { source, .. }
            | Self::SerialOpen { source, .. }
            | Self::SerialWrite { source, .. }
            | Self::ConfigRead { source, .. }
            | Self::Runtime { source } => Some(source),
            Self::ConfigValidation { .. } => None,
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "Cannot bind {}: {}", addr, source),
            Self::LandmarkBind { port, .. } => {
                write!(f, "Cannot bind landmark UDP port {}", port)
            }
            Self::SerialOpen { port, .. } => write!(f, "Cannot open serial port: {}", port),
            Self::SerialWrite { port, source } => {
                write!(f, "Serial write failed on {}: {}", port, source)
            }
            Self::ConfigRead { path, .. } => {
                write!(f, "Cannot read config: {}", path.display())
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

/// Alias for Result with RelayError
pub type Result<T> = std::result::Result<T, RelayError>;
