//! Configuration management
//!
//! Config is read from a TOML file (`--config <FILE>`), with CLI flags
//! overriding individual values. Without `--config` everything defaults.
//! An explicitly requested file that is missing or unparseable is a
//! startup error: the service does not start.

use crate::cli::Cli;
use crate::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_HOST, DEFAULT_LANDMARK_PORT, DEFAULT_SERIAL_PORT,
    DEFAULT_TCP_PORT, SERIAL_TIMEOUT_MS,
};
use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub serial: SerialConfig,
    pub landmark: LandmarkConfig,
}

/// TCP command listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address for the command listener
    pub host: String,
    /// TCP port for the command listener
    pub port: u16,
}

/// Serial device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device path (e.g., `/dev/ttyUSB0` or `COM6`)
    pub port: String,
    /// Baud rate for the servo controller
    pub baud_rate: u32,
    /// Read timeout in milliseconds
    pub timeout_ms: u64,
}

/// Landmark feed monitor configuration
///
/// Observes the perception process's UDP datagrams for diagnostics.
/// Disabled by default; the monitor never produces commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Enable the UDP landmark monitor
    pub enabled: bool,
    /// UDP port the perception process publishes on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_TCP_PORT,
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: SERIAL_TIMEOUT_MS,
        }
    }
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: DEFAULT_LANDMARK_PORT,
        }
    }
}

impl Config {
    /// Bind address string for the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load config from an explicitly requested file, or defaults without one
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(path).map_err(|e| RelayError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| RelayError::ConfigValidation {
        field: "config file",
        reason: format!("{}: {}", path.display(), e),
    })
}

/// Apply CLI overrides on top of file/default config
pub fn apply_cli(mut config: Config, cli: &Cli) -> Config {
    if let Some(ref host) = cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref serial_port) = cli.serial_port {
        config.serial.port = serial_port.clone();
    }
    if let Some(baud) = cli.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(landmark_port) = cli.landmark_port {
        config.landmark.enabled = true;
        config.landmark.port = landmark_port;
    }
    config
}

// ============================================================================
// Tests
// ============================================================================
