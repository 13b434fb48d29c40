//! Update message types forwarded to the remote listener.
//!
//! The schema is protocol-buffers compatible so any listener generated from
//! the same `.proto` definition can decode what the bridge sends:
//!
//! ```text
//! message Wiimote {
//!     uint32 id               = 1;
//!     uint32 buttons_pressed  = 2;
//!     uint32 buttons_released = 3;
//! }
//!
//! message Update {
//!     oneof payload {
//!         Wiimote wiimote = 1;
//!     }
//! }
//! ```

use std::fmt::Write as _;

use crate::domain::buttons::ButtonState;
use crate::domain::slot::SlotId;

// ── Message structs ───────────────────────────────────────────────────────────
//
// `prost` derives the wire encoding from the tags below; `Debug` and
// `Default` come from the derive as well.

/// Button change reported by one controller (`Wiimote` in the schema).
#[derive(Clone, Copy, PartialEq, Eq, prost::Message)]
pub struct ControllerReport {
    /// 1-based controller number (slot index + 1).
    #[prost(uint32, tag = "1")]
    pub controller_id: u32,
    /// Buttons currently held down.
    #[prost(uint32, tag = "2")]
    pub buttons_pressed: u32,
    /// Buttons that were down on the previous report and are now up.
    #[prost(uint32, tag = "3")]
    pub buttons_released: u32,
}

impl ControllerReport {
    /// Builds the report for `slot` from its latest button state.
    pub fn from_slot(slot: SlotId, buttons: &ButtonState) -> Self {
        Self {
            controller_id: slot.controller_id(),
            buttons_pressed: u32::from(buttons.pressed.bits()),
            buttons_released: u32::from(buttons.released.bits()),
        }
    }

    /// Renders the report in protocol-buffers text format, one field per line.
    ///
    /// ```rust
    /// use wii_core::ControllerReport;
    ///
    /// let report = ControllerReport { controller_id: 1, buttons_pressed: 5, buttons_released: 0 };
    /// assert_eq!(report.debug_string(), "id: 1\nbuttons_pressed: 5\nbuttons_released: 0\n");
    /// ```
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "id: {}", self.controller_id);
        let _ = writeln!(out, "buttons_pressed: {}", self.buttons_pressed);
        let _ = writeln!(out, "buttons_released: {}", self.buttons_released);
        out
    }
}

/// The outward update record.  Exactly one payload is defined today.
///
/// A single-member `oneof` and an optional message field share the same
/// encoding, so the payload is modelled as an `Option`.
#[derive(Clone, Copy, PartialEq, Eq, prost::Message)]
pub struct UpdateMessage {
    /// Nested controller report, absent in an empty update.
    #[prost(message, optional, tag = "1")]
    pub report: Option<ControllerReport>,
}

impl UpdateMessage {
    /// Wraps a single controller report.
    pub fn for_controller(report: ControllerReport) -> Self {
        Self {
            report: Some(report),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
