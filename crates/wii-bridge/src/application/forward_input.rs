//! ForwardInputUseCase: forwards controller button changes to the listener.
//!
//! Runs the whole life of the bridge: discover controllers, connect them,
//! pulse each one so the user can see which slot it got, open the transport,
//! then forward every button change until no controller is left.
//!
//! # Architecture
//!
//! The use case depends only on the [`DeviceManager`], [`TransportConnector`]
//! and [`UpdateTransmitter`] traits plus two `io::Write` sinks: `status` for
//! the human-readable lines (stdout in production) and `diagnostics` for the
//! per-update dump (stderr).  Everything is injected, so the loop runs
//! unchanged against scripted devices and recording transports.

use std::io::{self, Write};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use wii_core::{
    encode_update, ControllerReport, ControllerSlot, EventKind, LedPattern, SlotId, UpdateMessage,
};

use crate::domain::BridgeConfig;
use crate::infrastructure::transport::TransportError;
use crate::infrastructure::wiimote::DeviceManager;

// ── Transport seams ───────────────────────────────────────────────────────────

/// Trait for sending encoded updates to the remote listener.
///
/// Infrastructure implementations use a WebSocket; test implementations record
/// calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpdateTransmitter: Send {
    /// Queues `bytes` as a single binary message.
    async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), TransportError>;

    /// Processes pending I/O without waiting for new inbound data.
    async fn pump(&mut self) -> Result<(), TransportError>;
}

/// Trait for opening the transport connection.
#[async_trait]
pub trait TransportConnector: Send + Sync {
    type Transmitter: UpdateTransmitter;

    /// Opens a connection to `address`, used verbatim.
    async fn open(&self, address: &str) -> Result<Self::Transmitter, TransportError>;
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Error type for the forward-input use case.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("transport unreachable at {address}")]
    TransportUnreachable {
        address: String,
        #[source]
        source: TransportError,
    },
    #[error("transport lost after {forwarded} update(s)")]
    TransportLost {
        forwarded: u64,
        #[source]
        source: TransportError,
    },
    #[error("failed to write status output: {0}")]
    Output(#[from] io::Error),
}

/// Counters for one forwarding session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStats {
    pub forwarded: u64,
    pub send_failures: u64,
    pub poll_failures: u64,
    pub disconnects: u64,
}

/// How a run ended, when it ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeOutcome {
    /// Discovery found nothing.
    NoControllers,
    /// Controllers were found but none accepted a connection.
    NoneConnected,
    /// Every connected controller has disconnected.
    Finished(ForwardStats),
}

/// What the loop does with one slot after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    AnnounceDisconnect,
    Forward(ControllerReport),
    Ignore,
}

/// Decides what to do with `state`, the slot's state after the latest poll.
///
/// A disconnect (graceful or not) is announced.  A generic event is forwarded
/// only if some button is pressed or released.
pub fn slot_action(slot: SlotId, state: &ControllerSlot) -> SlotAction {
    if state.event().is_disconnect() {
        return SlotAction::AnnounceDisconnect;
    }
    match state {
        ControllerSlot::Connected {
            event: EventKind::Generic,
            buttons,
        } if !buttons.is_idle() => SlotAction::Forward(ControllerReport::from_slot(slot, buttons)),
        _ => SlotAction::Ignore,
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// The Forward Input use case.
pub struct ForwardInputUseCase<D, O, E> {
    devices: D,
    config: BridgeConfig,
    status: O,
    diagnostics: E,
}

impl<D, O, E> ForwardInputUseCase<D, O, E>
where
    D: DeviceManager,
    O: Write,
    E: Write,
{
    pub fn new(devices: D, config: BridgeConfig, status: O, diagnostics: E) -> Self {
        Self {
            devices,
            config,
            status,
            diagnostics,
        }
    }

    pub fn devices(&self) -> &D {
        &self.devices
    }

    /// Consumes the use case, returning the device manager and both writers.
    pub fn into_parts(self) -> (D, O, E) {
        (self.devices, self.status, self.diagnostics)
    }

    /// Runs the bridge to completion.
    ///
    /// Devices are released exactly once before this returns, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::TransportUnreachable`] if the transport cannot be opened.
    /// - [`BridgeError::TransportLost`] if the listener goes away mid-session.
    /// - [`BridgeError::Output`] if a status line cannot be written.
    pub async fn run<C>(&mut self, connector: &C) -> Result<BridgeOutcome, BridgeError>
    where
        C: TransportConnector,
    {
        let outcome = self.run_phases(connector).await;
        self.devices.release();
        outcome
    }

    async fn run_phases<C>(&mut self, connector: &C) -> Result<BridgeOutcome, BridgeError>
    where
        C: TransportConnector,
    {
        let found = self.devices.discover(self.config.discovery_timeout);
        if found == 0 {
            writeln!(self.status, "No wiimotes found.")?;
            return Ok(BridgeOutcome::NoControllers);
        }

        let connected = self.devices.connect();
        if connected == 0 {
            warn!("none of the {found} discovered controller(s) accepted a connection");
            writeln!(self.status, "Failed to connect to any wiimote.")?;
            return Ok(BridgeOutcome::NoneConnected);
        }
        writeln!(
            self.status,
            "Connected to {connected} wiimotes (of {found} found)."
        )?;

        self.feedback_pulse().await;

        let address = self.config.address.clone();
        let mut transmitter = match connector.open(&address).await {
            Ok(transmitter) => transmitter,
            Err(source) => return Err(BridgeError::TransportUnreachable { address, source }),
        };
        info!("forwarding updates to {address}");

        let stats = self.forward_until_disconnected(&mut transmitter).await?;
        info!(
            "all controllers disconnected; forwarded {} update(s), {} send failure(s)",
            stats.forwarded, stats.send_failures
        );
        Ok(BridgeOutcome::Finished(stats))
    }

    /// Lights each connected controller's slot LED and rumbles it briefly.
    async fn feedback_pulse(&mut self) {
        let slots = self.devices.connected_slots();
        for &slot in &slots {
            if let Err(e) = self.devices.set_indicator(slot, LedPattern::for_slot(slot)) {
                warn!("{e}");
            }
            if let Err(e) = self.devices.set_haptic(slot, true) {
                warn!("{e}");
            }
        }
        tokio::time::sleep(self.config.feedback_pulse).await;
        for &slot in &slots {
            if let Err(e) = self.devices.set_haptic(slot, false) {
                warn!("{e}");
            }
        }
    }

    async fn forward_until_disconnected<T>(
        &mut self,
        transmitter: &mut T,
    ) -> Result<ForwardStats, BridgeError>
    where
        T: UpdateTransmitter,
    {
        let mut stats = ForwardStats::default();

        while self.devices.connected_count() > 0 {
            match self.devices.poll() {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("{e}");
                    stats.poll_failures += 1;
                    continue;
                }
            }

            for slot in SlotId::all() {
                let Some(state) = self.devices.slots().get(slot.index()).copied() else {
                    break;
                };
                match slot_action(slot, &state) {
                    SlotAction::AnnounceDisconnect => {
                        info!("{slot} disconnected ({:?})", state.event());
                        writeln!(
                            self.status,
                            "--- DISCONNECTED [wiimote id {}] ---",
                            slot.controller_id()
                        )?;
                        stats.disconnects += 1;
                    }
                    SlotAction::Forward(report) => {
                        match self.forward(transmitter, report).await {
                            Ok(true) => stats.forwarded += 1,
                            Ok(false) => stats.send_failures += 1,
                            Err(source) => {
                                return Err(BridgeError::TransportLost {
                                    forwarded: stats.forwarded,
                                    source,
                                })
                            }
                        }
                    }
                    SlotAction::Ignore => {}
                }
            }
        }
        Ok(stats)
    }

    /// Sends one report.  Returns `Ok(false)` for a failure the loop can
    /// survive and `Err` once the connection is gone.
    async fn forward<T>(
        &mut self,
        transmitter: &mut T,
        report: ControllerReport,
    ) -> Result<bool, TransportError>
    where
        T: UpdateTransmitter,
    {
        let bytes = encode_update(&UpdateMessage::for_controller(report));
        if let Err(e) = self.diagnostics.write_all(report.debug_string().as_bytes()) {
            debug!("diagnostic dump failed: {e}");
        }

        let sent = transmitter.send_binary(bytes).await;
        let pumped = match sent {
            Ok(()) => transmitter.pump().await,
            Err(e) => Err(e),
        };
        match pumped {
            Ok(()) => Ok(true),
            Err(e) if e.is_connection_lost() => Err(e),
            Err(e) => {
                warn!("failed to forward update for controller {}: {e}", report.controller_id);
                Ok(false)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
