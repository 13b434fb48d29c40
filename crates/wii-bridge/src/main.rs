//! Wii-Bridge entry point.
//!
//! Connects up to four paired motion controllers and forwards every button
//! change to a remote listener as a protocol-buffers update over WebSocket.
//! Runs until the last controller disconnects.
//!
//! # Usage
//!
//! ```text
//! wii-bridge [OPTIONS] [ADDRESS]
//!
//! Arguments:
//!   [ADDRESS]  Listener WebSocket URL [default: ws://192.168.11.34:4567]
//!
//! Options:
//!   --discovery-timeout <SECS>  How long to search for controllers [default: 10]
//!   --connect-timeout   <SECS>  WebSocket handshake timeout [default: 5]
//!   --poll-timeout-ms   <MS>    Per-controller read timeout, at least 1 [default: 10]
//!   --send-timeout-ms   <MS>    Bound on each WebSocket write, at least 1 [default: 1000]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                       | Default | Description                  |
//! |--------------------------------|---------|------------------------------|
//! | `WII_BRIDGE_DISCOVERY_TIMEOUT` | `10`    | Discovery window (secs)      |
//! | `WII_BRIDGE_CONNECT_TIMEOUT`   | `5`     | Handshake timeout (secs)     |
//! | `WII_BRIDGE_POLL_TIMEOUT_MS`   | `10`    | Per-controller read (ms)     |
//! | `WII_BRIDGE_SEND_TIMEOUT_MS`   | `1000`  | WebSocket write bound (ms)   |
//!
//! # Output
//!
//! Status lines go to stdout, one update dump per forwarded message goes to
//! stderr, and `tracing` logs also go to stderr (`RUST_LOG`, default `info`).
//!
//! Exit status is 0 when no controller is found or none connects, as well as
//! after a normal session.  Failing to start HID access, reach the listener,
//! or keep the connection open exits non-zero.

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wii_bridge::application::{BridgeOutcome, ForwardInputUseCase};
use wii_bridge::domain::{BridgeConfig, DEFAULT_TRANSPORT_ADDRESS};
use wii_bridge::infrastructure::transport::WsConnector;
use wii_bridge::infrastructure::wiimote::HidWiimoteManager;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Motion-controller input bridge.
///
/// Forwards button presses from paired controllers to a WebSocket listener.
#[derive(Debug, Parser)]
#[command(
    name = "wii-bridge",
    about = "Forwards motion-controller button input to a remote listener over WebSocket",
    version
)]
struct Cli {
    /// WebSocket URL of the listener, used exactly as given.
    #[arg(default_value = DEFAULT_TRANSPORT_ADDRESS)]
    address: String,

    /// Seconds to search for controllers before giving up.
    #[arg(long, default_value_t = 10, env = "WII_BRIDGE_DISCOVERY_TIMEOUT")]
    discovery_timeout: u64,

    /// Seconds to wait for the WebSocket handshake.
    #[arg(long, default_value_t = 5, env = "WII_BRIDGE_CONNECT_TIMEOUT")]
    connect_timeout: u64,

    /// Milliseconds each poll waits on each controller for input.
    #[arg(
        long,
        default_value_t = 10,
        env = "WII_BRIDGE_POLL_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    poll_timeout_ms: u64,

    /// Milliseconds the listener gets to accept each update.
    #[arg(
        long,
        default_value_t = 1000,
        env = "WII_BRIDGE_SEND_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    send_timeout_ms: u64,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`BridgeConfig`].
    fn into_bridge_config(self) -> BridgeConfig {
        BridgeConfig {
            address: self.address,
            discovery_timeout: Duration::from_secs(self.discovery_timeout),
            connect_timeout: Duration::from_secs(self.connect_timeout),
            poll_timeout: Duration::from_millis(self.poll_timeout_ms),
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            ..BridgeConfig::default()
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// The forwarding loop is a single sequential task, so a current-thread
/// runtime is all it needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for status lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Cli::parse().into_bridge_config();
    info!(
        "Wii-Bridge starting, listener={} discovery={:?}",
        config.address, config.discovery_timeout
    );

    let devices = HidWiimoteManager::new(config.poll_timeout)
        .context("failed to initialise HID access to controllers")?;
    let connector = WsConnector::new(config.connect_timeout, config.send_timeout);

    let mut bridge = ForwardInputUseCase::new(devices, config, io::stdout(), io::stderr());
    let outcome = bridge.run(&connector).await?;

    match outcome {
        BridgeOutcome::NoControllers => info!("no controllers found, exiting"),
        BridgeOutcome::NoneConnected => info!("no controller connected, exiting"),
        BridgeOutcome::Finished(stats) => info!(
            "Wii-Bridge stopped: {} forwarded, {} send failure(s), {} poll failure(s)",
            stats.forwarded, stats.send_failures, stats.poll_failures
        ),
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_fallback_address() {
        // Arrange: parse with no arguments (all defaults apply)
        let cli = Cli::parse_from(["wii-bridge"]);

        // Assert
        assert_eq!(cli.address, "ws://192.168.11.34:4567");
    }

    #[test]
    fn test_cli_address_is_taken_verbatim() {
        let cli = Cli::parse_from(["wii-bridge", "not even a url"]);
        assert_eq!(cli.address, "not even a url");
    }

    #[test]
    fn test_cli_timeout_overrides() {
        let cli = Cli::parse_from([
            "wii-bridge",
            "--discovery-timeout",
            "3",
            "--connect-timeout",
            "7",
            "--poll-timeout-ms",
            "25",
        ]);
        assert_eq!(cli.discovery_timeout, 3);
        assert_eq!(cli.connect_timeout, 7);
        assert_eq!(cli.poll_timeout_ms, 25);
    }

    #[test]
    fn test_into_bridge_config_keeps_feedback_pulse() {
        // Arrange
        let cli = Cli::parse_from(["wii-bridge", "ws://10.0.0.2:9000"]);

        // Act
        let config = cli.into_bridge_config();

        // Assert
        assert_eq!(config.address, "ws://10.0.0.2:9000");
        assert_eq!(config.feedback_pulse, Duration::from_millis(200));
    }

    #[test]
    fn test_into_bridge_config_converts_units() {
        let cli = Cli {
            address: DEFAULT_TRANSPORT_ADDRESS.to_string(),
            discovery_timeout: 4,
            connect_timeout: 2,
            poll_timeout_ms: 50,
            send_timeout_ms: 750,
        };

        let config = cli.into_bridge_config();

        assert_eq!(config.discovery_timeout, Duration::from_secs(4));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.poll_timeout, Duration::from_millis(50));
        assert_eq!(config.send_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_cli_rejects_zero_poll_timeout() {
        let result = Cli::try_parse_from(["wii-bridge", "--poll-timeout-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_zero_send_timeout() {
        let result = Cli::try_parse_from(["wii-bridge", "--send-timeout-ms", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_send_timeout_defaults_to_one_second() {
        let config = Cli::parse_from(["wii-bridge"]).into_bridge_config();
        assert_eq!(config.send_timeout, Duration::from_secs(1));
    }
}
