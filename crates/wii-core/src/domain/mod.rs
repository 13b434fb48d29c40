//! Domain layer: pure controller state with no I/O.
//!
//! - [`buttons`] – the core button bit layout and press/hold/release tracking.
//! - [`slot`]    – slot numbering, per-slot connection state, event kinds, and
//!   the indicator LED patterns used to tell controllers apart.

pub mod buttons;
pub mod slot;
