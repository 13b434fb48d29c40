//! Controller device management.
//!
//! A device manager owns the fixed array of [`MAX_SLOTS`] controller slots and
//! everything needed to fill them: discovery, connection, indicator LEDs,
//! rumble, polling for input, and teardown.
//!
//! # Testability
//!
//! The [`DeviceManager`] trait lets the forwarding loop run against
//! [`mock::ScriptedDeviceManager`] in tests instead of real hardware.
//!
//! [`MAX_SLOTS`]: wii_core::MAX_SLOTS

use std::time::Duration;

use wii_core::{ControllerSlot, LedPattern, SlotId};

pub mod hid;
pub mod mock;
pub mod report;

pub use hid::HidWiimoteManager;

/// Error type for device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("failed to initialise HID subsystem: {0}")]
    HidInit(#[source] hidapi::HidError),
    #[error("{slot} is not connected")]
    NotConnected { slot: SlotId },
    #[error("write to {slot} failed: {source}")]
    Write {
        slot: SlotId,
        #[source]
        source: hidapi::HidError,
    },
    #[error("poll failed: {0}")]
    Poll(String),
}

/// Trait abstracting the controller device layer.
///
/// The production implementation is [`HidWiimoteManager`]; tests use
/// [`mock::ScriptedDeviceManager`].
pub trait DeviceManager {
    /// Looks for controllers for up to `timeout` and returns how many were found.
    fn discover(&mut self, timeout: Duration) -> usize;

    /// Connects discovered controllers to free slots, in slot order, and
    /// returns how many connections succeeded.
    fn connect(&mut self) -> usize;

    /// Lights the given indicator LEDs on a connected controller.
    fn set_indicator(&mut self, slot: SlotId, pattern: LedPattern) -> Result<(), DeviceError>;

    /// Switches rumble on or off on a connected controller.
    fn set_haptic(&mut self, slot: SlotId, on: bool) -> Result<(), DeviceError>;

    /// Polls every slot once.  Returns `true` if any slot has an event.
    ///
    /// Each slot's event is reset before the poll, so after this returns the
    /// events in [`slots`](Self::slots) describe this poll only.
    fn poll(&mut self) -> Result<bool, DeviceError>;

    /// Current state of every slot, indexed by [`SlotId::index`].
    fn slots(&self) -> &[ControllerSlot];

    /// Disconnects every controller and releases its resources.
    fn release(&mut self);

    /// Number of slots currently connected.
    fn connected_count(&self) -> usize {
        self.slots().iter().filter(|s| s.is_connected()).count()
    }

    /// Connected slots in ascending order.
    fn connected_slots(&self) -> Vec<SlotId> {
        SlotId::all()
            .filter(|id| {
                self.slots()
                    .get(id.index())
                    .is_some_and(ControllerSlot::is_connected)
            })
            .collect()
    }
}
