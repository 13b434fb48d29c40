//! HID report layouts for the motion controller.
//!
//! Output reports (host → controller) are two or three bytes: the report id,
//! then a payload whose lowest bit always carries the rumble state.  Input
//! reports (controller → host) start with the report id followed, for most
//! ids, by the two core-button bytes in big-endian order.
//!
//! ```text
//! 0x10 [rumble]                    rumble only
//! 0x11 [leds | rumble]             indicator LEDs (high nibble)
//! 0x12 [continuous | rumble][mode] data reporting mode
//! 0x20 [buttons:2][flags][..][battery]   status (unsolicited after plug events)
//! 0x30 [buttons:2]                 core buttons
//! ```

use wii_core::{ButtonMask, ButtonState, ControllerSlot, EventKind, LedPattern};

/// Nintendo's USB/Bluetooth vendor id.
pub const VENDOR_ID: u16 = 0x057E;

/// Product ids of the original controller and the later -TR revision.
pub const PRODUCT_IDS: [u16; 2] = [0x0306, 0x0330];

pub const REPORT_RUMBLE: u8 = 0x10;
pub const REPORT_LEDS: u8 = 0x11;
pub const REPORT_MODE: u8 = 0x12;
pub const REPORT_STATUS: u8 = 0x20;

/// Reporting mode that sends only the core buttons, and only on change.
pub const MODE_CORE_BUTTONS: u8 = 0x30;

/// Largest input report the controller sends (id + 21 bytes).
pub const MAX_INPUT_REPORT_LEN: usize = 22;

const RUMBLE_BIT: u8 = 0x01;

/// Returns `true` if the HID ids belong to a supported controller.
pub fn is_wiimote(vendor_id: u16, product_id: u16) -> bool {
    vendor_id == VENDOR_ID && PRODUCT_IDS.contains(&product_id)
}

fn rumble_bit(rumble: bool) -> u8 {
    if rumble {
        RUMBLE_BIT
    } else {
        0
    }
}

/// Output report switching rumble on or off.
pub fn rumble_report(rumble: bool) -> [u8; 2] {
    [REPORT_RUMBLE, rumble_bit(rumble)]
}

/// Output report lighting `pattern` while keeping the rumble state.
pub fn led_report(pattern: LedPattern, rumble: bool) -> [u8; 2] {
    [REPORT_LEDS, (pattern.bits() & 0xF0) | rumble_bit(rumble)]
}

/// Output report requesting core-button reports on change only.
pub fn reporting_mode_report(rumble: bool) -> [u8; 3] {
    [REPORT_MODE, rumble_bit(rumble), MODE_CORE_BUTTONS]
}

/// A parsed input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputReport {
    /// A report carrying the core buttons.  `status` marks a status report,
    /// after which the reporting mode must be requested again.
    Buttons { buttons: ButtonMask, status: bool },
    /// A report without core buttons, or one too short to hold them.
    Ignored { id: u8 },
}

/// Parses the first input report in `bytes`.
pub fn parse_input_report(bytes: &[u8]) -> InputReport {
    let Some(&id) = bytes.first() else {
        return InputReport::Ignored { id: 0 };
    };
    let carries_buttons = matches!(id, 0x20..=0x22 | 0x30..=0x37 | 0x3E | 0x3F);
    if !carries_buttons || bytes.len() < 3 {
        return InputReport::Ignored { id };
    }
    InputReport::Buttons {
        buttons: ButtonMask::from_raw(u16::from_be_bytes([bytes[1], bytes[2]])),
        status: id == REPORT_STATUS,
    }
}

/// Result of one bounded read from a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome<'a> {
    /// Nothing arrived before the read timeout.
    Idle,
    /// One input report.
    Report(&'a [u8]),
    /// The read failed; the link is gone.
    Failed,
}

/// What applying a read did to a slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotUpdate {
    /// The slot now carries an event for this poll.
    pub event: bool,
    /// The controller sent a status report and must be told the reporting
    /// mode again before it sends more buttons.
    pub rerequest_mode: bool,
}

/// Applies one read to a slot.
///
/// A failed read disconnects the slot with [`EventKind::UnexpectedDisconnect`].
pub fn apply_read(slot: &mut ControllerSlot, read: ReadOutcome<'_>) -> SlotUpdate {
    match read {
        ReadOutcome::Idle => SlotUpdate::default(),
        ReadOutcome::Report(bytes) => apply_input(slot, parse_input_report(bytes)),
        ReadOutcome::Failed if slot.is_connected() => {
            slot.disconnect(EventKind::UnexpectedDisconnect);
            SlotUpdate {
                event: true,
                rerequest_mode: false,
            }
        }
        ReadOutcome::Failed => SlotUpdate::default(),
    }
}

/// Applies a parsed input report to a connected slot.
///
/// The slot gets [`EventKind::Generic`] only when the set of buttons down
/// differs from the previous report.
pub fn apply_input(slot: &mut ControllerSlot, input: InputReport) -> SlotUpdate {
    let InputReport::Buttons { buttons: now, status } = input else {
        return SlotUpdate::default();
    };
    let ControllerSlot::Connected { event, buttons } = slot else {
        return SlotUpdate::default();
    };
    let next = ButtonState::advance(buttons.pressed, now);
    let changed = next.pressed != buttons.pressed;
    *buttons = next;
    if changed {
        *event = EventKind::Generic;
    }
    SlotUpdate {
        event: changed,
        rerequest_mode: status,
    }
}
