//! Protocol module containing the update message types and the binary codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_update, encode_update, ProtocolError};
pub use messages::*;
