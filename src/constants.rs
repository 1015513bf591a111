//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Network
// =============================================================================

/// Default bind address for the TCP command listener
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default TCP port for the command listener
pub const DEFAULT_TCP_PORT: u16 = 8000;

/// Default UDP port the perception process publishes landmark frames on
pub const DEFAULT_LANDMARK_PORT: u16 = 5065;

/// Per-connection read buffer size
pub const READ_BUFFER_SIZE: usize = 1024;

/// UDP receive buffer size for landmark datagrams
pub const LANDMARK_BUFFER_SIZE: usize = 4096;

// =============================================================================
// Serial
// =============================================================================

/// Default baud rate for the servo controller
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default serial read timeout (milliseconds)
pub const SERIAL_TIMEOUT_MS: u64 = 1000;

/// Default serial device path
#[cfg(windows)]
pub const DEFAULT_SERIAL_PORT: &str = "COM6";
#[cfg(not(windows))]
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

// =============================================================================
// Timing
// =============================================================================

/// Delay before retrying after an unexpected accept-loop error (milliseconds)
pub const ACCEPT_RETRY_DELAY_MS: u64 = 1000;

/// Interval for shutdown-flag polling in blocking loops (milliseconds)
pub const SHUTDOWN_POLL_INTERVAL_MS: u64 = 100;

// =============================================================================
// Channels
// =============================================================================

/// Capacity of the command channel feeding the serial writer
pub const COMMAND_CHANNEL_CAPACITY: usize = 256;
