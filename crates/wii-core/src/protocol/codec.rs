//! Binary codec for encoding and decoding update messages.
//!
//! Wire format (protocol-buffers encoding, see [`crate::protocol::messages`]):
//! ```text
//! Update:  [key 0x0A][report_len:varint][report:N]
//! Report:  [key 0x08][id:varint] [key 0x10][pressed:varint] [key 0x18][released:varint]
//! ```
//! Scalars equal to zero are omitted on encode and read back as zero.  The
//! encoding itself is generated by `prost` from the message definitions.

use prost::Message;
use thiserror::Error;

use crate::protocol::messages::UpdateMessage;

/// Errors that can occur during message decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The bytes are not a valid `Update`: truncated, a bad varint or key,
    /// or a field with the wrong wire type.
    #[error("malformed update: {0}")]
    Decode(#[from] prost::DecodeError),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`UpdateMessage`] into its wire bytes.
///
/// An update without a report encodes to an empty buffer.
///
/// # Examples
///
/// ```rust
/// use wii_core::{decode_update, encode_update, ControllerReport, UpdateMessage};
///
/// let msg = UpdateMessage::for_controller(ControllerReport {
///     controller_id: 1,
///     buttons_pressed: 0x01,
///     buttons_released: 0x02,
/// });
/// let bytes = encode_update(&msg);
/// assert_eq!(decode_update(&bytes).unwrap(), msg);
/// ```
pub fn encode_update(msg: &UpdateMessage) -> Vec<u8> {
    msg.encode_to_vec()
}

/// Decodes an [`UpdateMessage`] occupying the whole of `bytes`.
///
/// Unknown fields are skipped so newer senders stay readable.  A repeated
/// report field is merged into the earlier one, as protobuf requires.
///
/// # Errors
///
/// Returns [`ProtocolError::Decode`] if the bytes are malformed.
pub fn decode_update(bytes: &[u8]) -> Result<UpdateMessage, ProtocolError> {
    Ok(UpdateMessage::decode(bytes)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::ControllerReport;

    fn report(controller_id: u32, pressed: u32, released: u32) -> UpdateMessage {
        UpdateMessage::for_controller(ControllerReport {
            controller_id,
            buttons_pressed: pressed,
            buttons_released: released,
        })
    }

    #[test]
    fn test_round_trip_preserves_all_three_fields() {
        let msg = report(1, 0x01, 0x02);
        assert_eq!(decode_update(&encode_update(&msg)).unwrap(), msg);
    }

    #[test]
    fn test_encode_produces_protobuf_bytes() {
        // Update{ wiimote: { id: 1, buttons_pressed: 5 } }
        let bytes = encode_update(&report(1, 0x05, 0x00));
        assert_eq!(bytes, vec![0x0A, 0x04, 0x08, 0x01, 0x10, 0x05]);
    }

    #[test]
    fn test_encode_all_three_fields() {
        let bytes = encode_update(&report(3, 0x08, 0x04));
        assert_eq!(bytes, vec![0x0A, 0x06, 0x08, 0x03, 0x10, 0x08, 0x18, 0x04]);
    }

    #[test]
    fn test_encode_multi_byte_varint() {
        // PLUS (0x1000) needs two varint bytes: 0x80 0x20
        let bytes = encode_update(&report(2, 0x1000, 0));
        assert_eq!(bytes, vec![0x0A, 0x05, 0x08, 0x02, 0x10, 0x80, 0x20]);
    }

    #[test]
    fn test_zero_fields_are_omitted_but_report_is_kept() {
        let bytes = encode_update(&report(0, 0, 0));
        assert_eq!(bytes, vec![0x0A, 0x00]);
        assert_eq!(decode_update(&bytes).unwrap(), report(0, 0, 0));
    }

    #[test]
    fn test_empty_update_encodes_to_nothing() {
        let bytes = encode_update(&UpdateMessage::default());
        assert!(bytes.is_empty());
        assert_eq!(decode_update(&bytes).unwrap(), UpdateMessage::default());
    }

    #[test]
    fn test_decode_skips_unknown_fields() {
        // field 9 varint, field 10 fixed32, then the report, then field 11 bytes
        let mut bytes = vec![0x48, 0x07, 0x55, 1, 2, 3, 4];
        bytes.extend_from_slice(&encode_update(&report(3, 0x08, 0)));
        bytes.extend_from_slice(&[0x5A, 0x02, 0xAA, 0xBB]);

        assert_eq!(decode_update(&bytes).unwrap(), report(3, 0x08, 0));
    }

    #[test]
    fn test_decode_skips_unknown_report_fields() {
        // Wiimote{ id: 1, field 4: 9 }
        let bytes = [0x0A, 0x04, 0x08, 0x01, 0x20, 0x09];
        assert_eq!(decode_update(&bytes).unwrap(), report(1, 0, 0));
    }

    #[test]
    fn test_decode_truncated_report_is_rejected() {
        let bytes = [0x0A, 0x04, 0x08, 0x01];
        assert!(matches!(decode_update(&bytes), Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_truncated_varint_is_rejected() {
        let bytes = [0x0A, 0x02, 0x08, 0x81];
        assert!(decode_update(&bytes).is_err());
    }

    #[test]
    fn test_decode_overlong_varint_is_rejected() {
        // unknown field 2 whose varint never terminates
        let mut bytes = vec![0x10];
        bytes.extend_from_slice(&[0xFF; 11]);
        assert!(decode_update(&bytes).is_err());
    }

    #[test]
    fn test_decode_report_with_wrong_wire_type_is_rejected() {
        // field 1 as a varint instead of a nested message
        let bytes = [0x08, 0x01];
        assert!(decode_update(&bytes).is_err());
    }

    #[test]
    fn test_decode_field_number_zero_is_rejected() {
        let bytes = [0x00, 0x01];
        assert!(decode_update(&bytes).is_err());
    }

    #[test]
    fn test_repeated_report_is_merged() {
        let mut bytes = encode_update(&report(1, 1, 0));
        bytes.extend_from_slice(&encode_update(&report(2, 0, 1)));

        // Later non-zero fields win; fields the later copy omits keep their value.
        assert_eq!(decode_update(&bytes).unwrap(), report(2, 1, 1));
    }

    #[test]
    fn test_error_message_mentions_update() {
        let err = decode_update(&[0x0A]).unwrap_err();
        assert!(err.to_string().starts_with("malformed update:"));
    }
}
