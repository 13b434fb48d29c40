//! Scripted device manager for testing.
//!
//! Lets tests decide how many controllers are discovered and connected and
//! what each poll reports, without Bluetooth hardware.  Every call is
//! recorded so tests can assert on ordering.

use std::collections::VecDeque;
use std::time::Duration;

use wii_core::{ButtonMask, ButtonState, ControllerSlot, EventKind, LedPattern, SlotId, MAX_SLOTS};

use super::{DeviceError, DeviceManager};

/// One call made on a [`ScriptedDeviceManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Discover(Duration),
    Connect,
    SetIndicator(SlotId, LedPattern),
    SetHaptic(SlotId, bool),
    Poll,
    Release,
}

/// What a scripted poll reports for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedEvent {
    /// A generic event with the given masks.
    Buttons {
        pressed: ButtonMask,
        released: ButtonMask,
    },
    Disconnect,
    UnexpectedDisconnect,
}

#[derive(Debug, Clone)]
enum PollStep {
    Events(Vec<(SlotId, ScriptedEvent)>),
    Fail(String),
}

/// A [`DeviceManager`] that plays back a fixed script.
///
/// Once the script runs out, the next poll gracefully disconnects every slot
/// that is still connected, so a forwarding loop driven by it always ends.
#[derive(Debug, Clone)]
pub struct ScriptedDeviceManager {
    discoverable: usize,
    connectable: usize,
    discovered: usize,
    slots: [ControllerSlot; MAX_SLOTS],
    script: VecDeque<PollStep>,
    calls: Vec<DeviceCall>,
}

impl ScriptedDeviceManager {
    /// `discoverable` controllers will be found; `connectable` of them will
    /// accept a connection.
    pub fn new(discoverable: usize, connectable: usize) -> Self {
        Self {
            discoverable,
            connectable,
            discovered: 0,
            slots: [ControllerSlot::default(); MAX_SLOTS],
            script: VecDeque::new(),
            calls: Vec::new(),
        }
    }

    /// Appends a poll that reports `events`, given as `(slot index, event)`.
    /// Indices outside the slot range are dropped.
    pub fn then_poll(mut self, events: impl IntoIterator<Item = (usize, ScriptedEvent)>) -> Self {
        let events = events
            .into_iter()
            .filter_map(|(index, event)| SlotId::new(index).map(|slot| (slot, event)))
            .collect();
        self.script.push_back(PollStep::Events(events));
        self
    }

    /// Appends a poll that fails with `message`.
    pub fn then_poll_failure(mut self, message: &str) -> Self {
        self.script.push_back(PollStep::Fail(message.to_string()));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    fn require_connected(&self, slot: SlotId) -> Result<(), DeviceError> {
        if self.slots[slot.index()].is_connected() {
            Ok(())
        } else {
            Err(DeviceError::NotConnected { slot })
        }
    }

    fn apply(&mut self, slot: SlotId, event: ScriptedEvent) {
        let state = &mut self.slots[slot.index()];
        if !state.is_connected() {
            return;
        }
        match event {
            ScriptedEvent::Buttons { pressed, released } => {
                *state = ControllerSlot::Connected {
                    event: EventKind::Generic,
                    buttons: ButtonState {
                        pressed,
                        held: ButtonMask::NONE,
                        released,
                    },
                };
            }
            ScriptedEvent::Disconnect => state.disconnect(EventKind::Disconnect),
            ScriptedEvent::UnexpectedDisconnect => {
                state.disconnect(EventKind::UnexpectedDisconnect)
            }
        }
    }
}

impl DeviceManager for ScriptedDeviceManager {
    fn discover(&mut self, timeout: Duration) -> usize {
        self.calls.push(DeviceCall::Discover(timeout));
        self.discovered = self.discoverable.min(MAX_SLOTS);
        self.discovered
    }

    fn connect(&mut self) -> usize {
        self.calls.push(DeviceCall::Connect);
        let count = self.connectable.min(self.discovered);
        for slot in SlotId::all().take(count) {
            self.slots[slot.index()] = ControllerSlot::connected();
        }
        count
    }

    fn set_indicator(&mut self, slot: SlotId, pattern: LedPattern) -> Result<(), DeviceError> {
        self.calls.push(DeviceCall::SetIndicator(slot, pattern));
        self.require_connected(slot)
    }

    fn set_haptic(&mut self, slot: SlotId, on: bool) -> Result<(), DeviceError> {
        self.calls.push(DeviceCall::SetHaptic(slot, on));
        self.require_connected(slot)
    }

    fn poll(&mut self) -> Result<bool, DeviceError> {
        self.calls.push(DeviceCall::Poll);
        for slot in &mut self.slots {
            slot.clear_event();
        }
        match self.script.pop_front() {
            Some(PollStep::Events(events)) => {
                let any = !events.is_empty();
                for (slot, event) in events {
                    self.apply(slot, event);
                }
                Ok(any)
            }
            Some(PollStep::Fail(message)) => Err(DeviceError::Poll(message)),
            None => {
                let remaining = self.connected_slots();
                for slot in &remaining {
                    self.slots[slot.index()].disconnect(EventKind::Disconnect);
                }
                Ok(!remaining.is_empty())
            }
        }
    }

    fn slots(&self) -> &[ControllerSlot] {
        &self.slots
    }

    fn release(&mut self) {
        self.calls.push(DeviceCall::Release);
        self.slots = [ControllerSlot::default(); MAX_SLOTS];
    }
}
