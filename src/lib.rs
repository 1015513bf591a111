//! servo-relay - TCP-to-serial command relay for a multi-servo hand rig
//!
//! Relays newline-delimited `<actuator>,<angle>` commands from TCP clients
//! to the servo controller's exclusive serial link. The command path:
//!
//! ```text
//! client bytes -> connection handler -> codec -> command channel
//!              -> serial writer thread -> device bytes
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod landmark;
pub mod logging;
pub mod relay;
pub mod serial;
