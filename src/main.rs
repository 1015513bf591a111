//! servo-relay - TCP-to-serial command relay for a multi-servo hand rig
//!
//! Accepts newline-delimited `<actuator>,<angle>` commands over TCP and
//! forwards them to the servo controller's serial link as
//! `<actuator> <angle>\n`. The serial device is optional at startup and
//! reopened lazily on demand.
//!
//! Usage:
//!   servo-relay                          Run with defaults (127.0.0.1:8000)
//!   servo-relay --serial-port /dev/ttyUSB0 --baud 9600
//!   servo-relay --config relay.toml -v

use clap::Parser;
use servo_relay::cli::Cli;
use servo_relay::config::{self, Config};
use servo_relay::error::Result;
use servo_relay::{landmark, logging, relay};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, warn};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config::apply_cli(config, &cli),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<()> {
    // Signal handling sets a shared flag; every loop polls it
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_handler(shutdown.clone());

    if config.landmark.enabled {
        let port = config.landmark.port;
        let shutdown_monitor = shutdown.clone();
        tokio::spawn(async move {
            // Diagnostics only: a dead monitor never takes the relay down
            if let Err(e) = landmark::monitor(port, shutdown_monitor).await {
                warn!("{}", e);
            }
        });
    }

    relay::run(&config, shutdown).await
}

fn spawn_signal_handler(shutdown: Arc<AtomicBool>) {
    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        // Without handlers the shutdown flag can never be set; make the
        // degraded state visible instead of failing silently
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                error!("Cannot install SIGTERM handler: {}", e);
                return;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(s) => s,
            Err(e) => {
                error!("Cannot install SIGINT handler: {}", e);
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv() => {},
        }
        warn!("Shutdown requested");
        shutdown.store(true, Ordering::SeqCst);
    });

    #[cfg(windows)]
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        warn!("Shutdown requested");
        shutdown.store(true, Ordering::SeqCst);
    });
}
