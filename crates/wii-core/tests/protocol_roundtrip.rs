//! Integration tests for the wii-core update codec.
//!
//! These tests go through the public API only: controller state is turned
//! into a report, wrapped in an update, encoded, and decoded again.

use wii_core::{
    decode_update, encode_update, ButtonMask, ButtonState, ControllerReport, ProtocolError,
    SlotId, UpdateMessage,
};

#[test]
fn test_roundtrip_preserves_id_pressed_and_released() {
    let original = UpdateMessage::for_controller(ControllerReport {
        controller_id: 1,
        buttons_pressed: 0x01,
        buttons_released: 0x02,
    });

    let bytes = encode_update(&original);
    let decoded = decode_update(&bytes).expect("decode must succeed");

    let report = decoded.report.expect("report must survive the round trip");
    assert_eq!(report.controller_id, 1);
    assert_eq!(report.buttons_pressed, 0x01);
    assert_eq!(report.buttons_released, 0x02);
}

#[test]
fn test_roundtrip_from_slot_state() {
    let slot = SlotId::new(3).unwrap();
    let first = ButtonState::advance(ButtonMask::NONE, ButtonMask::ALL);
    let second = ButtonState::advance(first.pressed, ButtonMask::HOME);

    let original = UpdateMessage::for_controller(ControllerReport::from_slot(slot, &second));
    let decoded = decode_update(&encode_update(&original)).unwrap();

    assert_eq!(decoded, original);
    let report = decoded.report.unwrap();
    assert_eq!(report.controller_id, 4);
    assert_eq!(report.buttons_pressed, u32::from(ButtonMask::HOME.bits()));
    assert_eq!(
        report.buttons_released,
        u32::from((ButtonMask::ALL & !ButtonMask::HOME).bits())
    );
}

#[test]
fn test_every_truncation_of_a_valid_update_is_rejected() {
    let bytes = encode_update(&UpdateMessage::for_controller(ControllerReport {
        controller_id: 2,
        buttons_pressed: 0x1F9F,
        buttons_released: 0x0800,
    }));

    for cut in 1..bytes.len() {
        let result = decode_update(&bytes[..cut]);
        assert!(
            matches!(result, Err(ProtocolError::Decode(_))),
            "prefix of {cut} bytes must be rejected, got {result:?}"
        );
    }
}
