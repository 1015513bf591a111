//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.
//! Every flag overrides the corresponding config file value.

use clap::Parser;
use std::path::PathBuf;

/// TCP-to-serial command relay for a multi-servo hand rig
#[derive(Parser, Debug, Default)]
#[command(name = "servo-relay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bind address for the TCP listener (default: 127.0.0.1)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// TCP port for the command listener (default: 8000)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Serial device path (overrides config)
    #[arg(long, value_name = "PORT")]
    pub serial_port: Option<String>,

    /// Baud rate for the servo controller (default: 9600)
    #[arg(long, value_name = "BAUD")]
    pub baud: Option<u32>,

    /// Enable the UDP landmark monitor on the given port
    #[arg(long, value_name = "PORT")]
    pub landmark_port: Option<u16>,
}

// =============================================================================
// Tests
// =============================================================================
