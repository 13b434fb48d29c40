//! Domain layer for wii-bridge.
//!
//! Holds plain configuration types with no I/O.  Populating them from the
//! command line or environment is done in `main.rs`.

pub mod config;

pub use config::{BridgeConfig, DEFAULT_TRANSPORT_ADDRESS};
