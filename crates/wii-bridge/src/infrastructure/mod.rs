//! Infrastructure layer for wii-bridge.
//!
//! Contains the OS-facing adapters: the HID device manager that talks to the
//! controllers and the WebSocket client that talks to the remote listener.
//!
//! **Dependency rule**: this layer may depend on `domain` and `wii_core`, but
//! the application layer only sees it through the [`wiimote::DeviceManager`]
//! trait and the transport traits.

pub mod transport;
pub mod wiimote;
