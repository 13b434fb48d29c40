//! Application layer use cases for the bridge.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure configuration and controller state) and the infrastructure (HID
//! devices and sockets).  Use cases here orchestrate those pieces through
//! traits only, so tests can swap in scripted devices and recording
//! transports.
//!
//! # Sub-modules
//!
//! - **`forward_input`** – The bridge's one use case: connect controllers,
//!   then forward every button change to the listener until the last
//!   controller disconnects.

pub mod forward_input;

pub use forward_input::{
    slot_action, BridgeError, BridgeOutcome, ForwardInputUseCase, ForwardStats, SlotAction,
    TransportConnector, UpdateTransmitter,
};
