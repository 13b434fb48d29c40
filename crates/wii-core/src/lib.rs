//! # wii-core
//!
//! Shared library for Wii-Bridge containing the update-message codec and the
//! controller domain types.
//!
//! It has zero dependencies on OS APIs, HID libraries, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! Wii-Bridge reads button input from up to four motion-sensing handheld
//! controllers ("wiimotes") and forwards every button change to a remote
//! listener over a WebSocket.  This crate is the shared foundation:
//!
//! - **`protocol`** – How an update travels over the wire.  Each update is a
//!   small protocol-buffers message holding one nested, length-prefixed
//!   controller report.
//!
//! - **`domain`** – Pure controller state: slot numbering, button masks,
//!   per-slot connection state, and the indicator LED patterns.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `wii_core::ButtonMask` instead of `wii_core::domain::buttons::ButtonMask`.
pub use domain::buttons::{ButtonMask, ButtonState};
pub use domain::slot::{ControllerSlot, EventKind, LedPattern, SlotId, MAX_SLOTS};
pub use protocol::codec::{decode_update, encode_update, ProtocolError};
pub use protocol::messages::{ControllerReport, UpdateMessage};
