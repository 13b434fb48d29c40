//! HID-backed device manager.
//!
//! Controllers must already be paired with the host's Bluetooth stack; they
//! then show up as ordinary HID devices, which this module enumerates and
//! talks to through `hidapi`.
//!
//! # Polling model
//!
//! Each [`poll`](DeviceManager::poll) reads at most one input report per
//! connected controller, waiting up to the configured poll timeout for each.
//! The controller is put in core-buttons mode on connect, so it only sends a
//! report when a button changes.  A failed read means the link is gone and
//! the slot reports [`wii_core::EventKind::UnexpectedDisconnect`].

use std::ffi::CString;
use std::thread;
use std::time::{Duration, Instant};

use hidapi::{HidApi, HidDevice};
use tracing::{debug, info, warn};

use wii_core::{ControllerSlot, LedPattern, SlotId, MAX_SLOTS};

use super::report::{self, ReadOutcome, MAX_INPUT_REPORT_LEN};
use super::{DeviceError, DeviceManager};

/// Delay between device-list rescans while discovery is waiting.
const RESCAN_INTERVAL: Duration = Duration::from_millis(500);

/// An open controller plus the output state that every report must repeat.
struct Link {
    device: HidDevice,
    rumble: bool,
    leds: LedPattern,
}

/// [`DeviceManager`] for controllers reachable through the OS HID layer.
pub struct HidWiimoteManager {
    api: HidApi,
    discovered: Vec<CString>,
    links: Vec<Option<Link>>,
    slots: [ControllerSlot; MAX_SLOTS],
    poll_timeout_ms: i32,
}

impl HidWiimoteManager {
    /// Initialises the HID library and allocates all slots, disconnected.
    /// A zero `poll_timeout` is raised to one millisecond.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::HidInit`] if the HID backend cannot start.
    pub fn new(poll_timeout: Duration) -> Result<Self, DeviceError> {
        let api = HidApi::new().map_err(DeviceError::HidInit)?;
        Ok(Self {
            api,
            discovered: Vec::new(),
            links: (0..MAX_SLOTS).map(|_| None).collect(),
            slots: [ControllerSlot::default(); MAX_SLOTS],
            poll_timeout_ms: poll_timeout_millis(poll_timeout),
        })
    }

    fn scan(&mut self) {
        if let Err(e) = self.api.refresh_devices() {
            warn!("HID device refresh failed: {e}");
        }
        let mut paths: Vec<CString> = Vec::new();
        for info in self.api.device_list() {
            if !report::is_wiimote(info.vendor_id(), info.product_id()) {
                continue;
            }
            let path = info.path().to_owned();
            if !paths.contains(&path) {
                debug!(
                    "found {} at {:?}",
                    info.product_string().unwrap_or("controller"),
                    path
                );
                paths.push(path);
            }
        }
        paths.truncate(MAX_SLOTS);
        self.discovered = paths;
    }

    fn link_mut(&mut self, slot: SlotId) -> Result<&mut Link, DeviceError> {
        self.links
            .get_mut(slot.index())
            .and_then(Option::as_mut)
            .ok_or(DeviceError::NotConnected { slot })
    }
}

/// Converts the poll timeout to the milliseconds `hidapi` takes, never zero.
fn poll_timeout_millis(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX).max(1)
}

/// Rescans until `MAX_SLOTS` controllers are visible or `timeout` passes,
/// pausing between scans.  Returns the count from the last scan.
fn rescan_until_full(
    timeout: Duration,
    mut scan: impl FnMut() -> usize,
    mut pause: impl FnMut(Duration),
) -> usize {
    let deadline = Instant::now() + timeout;
    loop {
        let found = scan();
        let now = Instant::now();
        if found >= MAX_SLOTS || now >= deadline {
            return found;
        }
        pause(RESCAN_INTERVAL.min(deadline - now));
    }
}

fn write_report(device: &HidDevice, slot: SlotId, bytes: &[u8]) -> Result<(), DeviceError> {
    device
        .write(bytes)
        .map(|_| ())
        .map_err(|source| DeviceError::Write { slot, source })
}

impl DeviceManager for HidWiimoteManager {
    fn discover(&mut self, timeout: Duration) -> usize {
        info!("searching for controllers for up to {timeout:?}");
        rescan_until_full(
            timeout,
            || {
                self.scan();
                self.discovered.len()
            },
            thread::sleep,
        );
        info!("discovered {} controller(s)", self.discovered.len());
        self.discovered.len()
    }

    fn connect(&mut self) -> usize {
        let paths = std::mem::take(&mut self.discovered);
        let mut connected = 0;
        for path in paths {
            let Some(slot) = SlotId::all().find(|s| self.links[s.index()].is_none()) else {
                break;
            };
            let device = match self.api.open_path(&path) {
                Ok(device) => device,
                Err(e) => {
                    warn!("failed to open controller at {path:?}: {e}");
                    continue;
                }
            };
            if let Err(e) = write_report(&device, slot, &report::reporting_mode_report(false)) {
                warn!("{e}; dropping controller at {path:?}");
                continue;
            }
            self.links[slot.index()] = Some(Link {
                device,
                rumble: false,
                leds: LedPattern::OFF,
            });
            self.slots[slot.index()] = ControllerSlot::connected();
            info!("{slot} connected ({path:?})");
            connected += 1;
        }
        connected
    }

    fn set_indicator(&mut self, slot: SlotId, pattern: LedPattern) -> Result<(), DeviceError> {
        let link = self.link_mut(slot)?;
        link.leds = pattern;
        write_report(&link.device, slot, &report::led_report(pattern, link.rumble))
    }

    fn set_haptic(&mut self, slot: SlotId, on: bool) -> Result<(), DeviceError> {
        let link = self.link_mut(slot)?;
        link.rumble = on;
        write_report(&link.device, slot, &report::rumble_report(on))
    }

    fn poll(&mut self) -> Result<bool, DeviceError> {
        let mut any_event = false;
        for slot in SlotId::all() {
            let i = slot.index();
            self.slots[i].clear_event();

            let Some(link) = self.links[i].as_ref() else {
                continue;
            };
            let mut buf = [0u8; MAX_INPUT_REPORT_LEN];
            let read = match link.device.read_timeout(&mut buf, self.poll_timeout_ms) {
                Ok(0) => ReadOutcome::Idle,
                Ok(n) => ReadOutcome::Report(&buf[..n]),
                Err(e) => {
                    warn!("{slot}: read failed, treating as disconnected: {e}");
                    ReadOutcome::Failed
                }
            };
            let update = report::apply_read(&mut self.slots[i], read);
            if update.rerequest_mode {
                debug!("{slot}: status report, re-requesting button reports");
                if let Err(e) =
                    write_report(&link.device, slot, &report::reporting_mode_report(link.rumble))
                {
                    warn!("{e}");
                }
            }
            if read == ReadOutcome::Failed {
                self.links[i] = None;
            }
            if let (true, Some(b)) = (update.event, self.slots[i].buttons()) {
                debug!("{slot}: pressed={} held={} released={}", b.pressed, b.held, b.released);
            }
            any_event |= update.event;
        }
        Ok(any_event)
    }

    fn slots(&self) -> &[ControllerSlot] {
        &self.slots
    }

    fn release(&mut self) {
        for slot in SlotId::all() {
            if let Some(link) = self.links[slot.index()].take() {
                if let Err(e) = write_report(&link.device, slot, &report::led_report(LedPattern::OFF, false)) {
                    debug!("{e} while releasing");
                }
                debug!("{slot} released (leds were {:#04x})", link.leds.bits());
            }
            self.slots[slot.index()] = ControllerSlot::default();
        }
        self.discovered.clear();
        info!("all controllers released");
    }
}
