//! Controller slots: the fixed set of connection attempts a bridge tracks.
//!
//! Every slot exists from startup whether or not a controller is ever found
//! for it.  A slot is either [`ControllerSlot::Disconnected`] or
//! [`ControllerSlot::Connected`]; both variants carry the [`EventKind`]
//! produced by the most recent poll, so a disconnect is still visible on the
//! poll that caused it.

use std::fmt;

use crate::domain::buttons::ButtonState;

/// Number of controller slots allocated at startup.
pub const MAX_SLOTS: usize = 4;

/// Index of a controller slot, always in `[0, MAX_SLOTS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u8);

impl SlotId {
    /// Returns `None` when `index` is outside `[0, MAX_SLOTS)`.
    pub fn new(index: usize) -> Option<Self> {
        (index < MAX_SLOTS).then_some(Self(index as u8))
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// The 1-based number used on the wire and in status lines.
    pub fn controller_id(self) -> u32 {
        u32::from(self.0) + 1
    }

    /// All slots in ascending order.
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..MAX_SLOTS as u8).map(SlotId)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wiimote {}", self.controller_id())
    }
}

/// What the most recent poll observed on a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventKind {
    /// Nothing happened on this slot.
    #[default]
    None,
    /// The controller sent a report that changed its state.
    Generic,
    /// The controller was disconnected on request (e.g. power button).
    Disconnect,
    /// The link was lost without warning.
    UnexpectedDisconnect,
}

impl EventKind {
    pub fn is_disconnect(self) -> bool {
        matches!(self, EventKind::Disconnect | EventKind::UnexpectedDisconnect)
    }
}

/// State of one slot after the most recent poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerSlot {
    Disconnected {
        event: EventKind,
    },
    Connected {
        event: EventKind,
        buttons: ButtonState,
    },
}

impl Default for ControllerSlot {
    fn default() -> Self {
        ControllerSlot::Disconnected {
            event: EventKind::None,
        }
    }
}

impl ControllerSlot {
    /// A freshly connected slot with no buttons down.
    pub fn connected() -> Self {
        ControllerSlot::Connected {
            event: EventKind::None,
            buttons: ButtonState::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ControllerSlot::Connected { .. })
    }

    pub fn event(&self) -> EventKind {
        match self {
            ControllerSlot::Disconnected { event } | ControllerSlot::Connected { event, .. } => {
                *event
            }
        }
    }

    /// Latest button state, only while connected.
    pub fn buttons(&self) -> Option<&ButtonState> {
        match self {
            ControllerSlot::Connected { buttons, .. } => Some(buttons),
            ControllerSlot::Disconnected { .. } => None,
        }
    }

    /// Resets the event to [`EventKind::None`], as at the start of each poll.
    pub fn clear_event(&mut self) {
        match self {
            ControllerSlot::Disconnected { event } | ControllerSlot::Connected { event, .. } => {
                *event = EventKind::None;
            }
        }
    }

    /// Moves the slot to disconnected, recording `kind` as this poll's event.
    pub fn disconnect(&mut self, kind: EventKind) {
        *self = ControllerSlot::Disconnected { event: kind };
    }
}

/// Indicator LED bits as carried in the LED output report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedPattern(pub u8);

impl LedPattern {
    pub const OFF: Self = Self(0x00);
    pub const LED_1: Self = Self(0x10);
    pub const LED_2: Self = Self(0x20);
    pub const LED_3: Self = Self(0x40);
    pub const LED_4: Self = Self(0x80);

    /// One lit LED per slot: slot 0 lights LED 1, slot 3 lights LED 4.
    pub fn for_slot(slot: SlotId) -> Self {
        Self(Self::LED_1.0 << slot.index())
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}
