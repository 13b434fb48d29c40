//! wii-bridge library crate.
//!
//! Forwards button input from up to four paired motion controllers to a
//! remote listener over a single outbound WebSocket.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Controllers (Bluetooth HID)
//!         ↓
//! [wii-bridge]
//!   ├── domain/           BridgeConfig
//!   ├── application/      Forwarding loop (depends on traits only)
//!   └── infrastructure/
//!         ├── wiimote/    HID device manager (hidapi) + scripted mock
//!         └── transport/  WebSocket client (tokio-tungstenite)
//!         ↓
//! Remote listener (protobuf update messages over WebSocket)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no external dependencies (no I/O, no async, no frameworks).
//! - `application` depends on `domain`, `wii-core`, and the device/transport
//!   traits, never on a concrete device or socket.
//! - `infrastructure` depends on all other layers plus `hidapi` and `tungstenite`.

/// Domain layer: runtime configuration.
pub mod domain;

/// Application layer: the forwarding loop.
pub mod application;

/// Infrastructure layer: HID device manager and WebSocket transport.
pub mod infrastructure;
