//! Bridge configuration types.
//!
//! [`BridgeConfig`] is the single source of truth for all runtime settings.
//! It is built from CLI arguments in production and from [`Default`] in tests.

use std::time::Duration;

/// Transport endpoint used when no address is given on the command line.
pub const DEFAULT_TRANSPORT_ADDRESS: &str = "ws://192.168.11.34:4567";

/// All runtime configuration for the bridge.
///
/// ```rust
/// use wii_bridge::domain::BridgeConfig;
///
/// let cfg = BridgeConfig::default();
/// assert_eq!(cfg.address, "ws://192.168.11.34:4567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// WebSocket URL of the remote listener, used verbatim.
    pub address: String,

    /// How long discovery keeps looking for controllers.
    pub discovery_timeout: Duration,

    /// How long the connect-confirmation rumble lasts.
    ///
    /// Users watch for this pulse to tell which controller got which slot.
    pub feedback_pulse: Duration,

    /// Upper bound on the WebSocket handshake.
    pub connect_timeout: Duration,

    /// Upper bound on each per-controller read during one poll.
    pub poll_timeout: Duration,

    /// Upper bound on handing one update to the socket, including the flush.
    /// A listener that stops reading costs at most this much per update.
    pub send_timeout: Duration,
}

impl Default for BridgeConfig {
    /// | Field             | Default                     |
    /// |-------------------|-----------------------------|
    /// | address           | `ws://192.168.11.34:4567`   |
    /// | discovery_timeout | 10 seconds                  |
    /// | feedback_pulse    | 200 milliseconds            |
    /// | connect_timeout   | 5 seconds                   |
    /// | poll_timeout      | 10 milliseconds             |
    /// | send_timeout      | 1 second                    |
    fn default() -> Self {
        Self {
            address: DEFAULT_TRANSPORT_ADDRESS.to_string(),
            discovery_timeout: Duration::from_secs(10),
            feedback_pulse: Duration::from_millis(200),
            connect_timeout: Duration::from_secs(5),
            poll_timeout: Duration::from_millis(10),
            send_timeout: Duration::from_secs(1),
        }
    }
}
