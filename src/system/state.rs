//! System State Management
//!
//! Manages the monitor's global state:
//! - UI mode, sub-mode and menu selection
//! - Mirrored hub light state and timers
//! - Timer edit buffer
//! - Power channel readings and energy accumulators
//! - Ambient sensor mirror and availability flags
//!
//! The state is protected by a mutex so the orchestrator, sampler and
//! render tasks each see a consistent view. All of them run on the same
//! cooperative executor; critical sections are short (no awaits while
//! holding the lock).
//!
//! # State Access Pattern
//! ```ignore
//! let mut state = SYSTEM_STATE.lock().await;
//! // Read or modify state here
//! // Lock automatically released when the guard goes out of scope
//! ```

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::Instant;

use crate::system::routing::StateUpdate;
use crate::system::ui::{DisplayMode, PowerSubMode};

/// Default motion-activated light timer (ms)
pub const DEFAULT_MOTION_TIMER_MS: u32 = 10_000;

/// Default manual-override light timer (ms)
pub const DEFAULT_MANUAL_TIMER_MS: u32 = 300_000;

/// Global system state protected by a mutex
///
/// Boots into the overview screen with zeroed readings, light off and the
/// default timer durations; everything else arrives over the messaging link.
pub static SYSTEM_STATE: Mutex<CriticalSectionRawMutex, AppState> = Mutex::new(AppState::new());

/// The three monitored power channels, in display and topic order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerChannel {
    /// Channel 1: solar panel input
    Panel,
    /// Channel 2: battery, bidirectional
    Battery,
    /// Channel 3: load output
    Load,
}

impl PowerChannel {
    pub const ALL: [PowerChannel; 3] = [PowerChannel::Panel, PowerChannel::Battery, PowerChannel::Load];

    pub fn index(self) -> usize {
        match self {
            PowerChannel::Panel => 0,
            PowerChannel::Battery => 1,
            PowerChannel::Load => 2,
        }
    }

    /// Row label on the overview screen
    pub fn label(self) -> &'static str {
        match self {
            PowerChannel::Panel => "Solar Panel",
            PowerChannel::Battery => "Battery",
            PowerChannel::Load => "Load",
        }
    }

    /// Title on the detail screen
    pub fn title(self) -> &'static str {
        match self {
            PowerChannel::Panel => "PANEL",
            PowerChannel::Battery => "BATTERY",
            PowerChannel::Load => "LOAD",
        }
    }
}

/// Latest readings for one power channel
///
/// Instantaneous fields fluctuate; the energy integral only grows. Nothing
/// here survives a power cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerChannelReading {
    pub bus_voltage_v: f32,
    pub current_ma: f32,
    pub power_mw: f32,
    pub energy_wh: f32,
}

impl PowerChannelReading {
    pub const fn new() -> Self {
        Self {
            bus_voltage_v: 0.0,
            current_ma: 0.0,
            power_mw: 0.0,
            energy_wh: 0.0,
        }
    }
}

/// Battery energy split into charge and discharge directions
///
/// Both accumulators are monotonically non-decreasing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryEnergy {
    pub charged_wh: f32,
    pub discharged_wh: f32,
}

impl BatteryEnergy {
    pub const fn new() -> Self {
        Self {
            charged_wh: 0.0,
            discharged_wh: 0.0,
        }
    }
}

/// Ambient readings mirrored from the hub's sensor topics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmbientReadings {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub pressure_hpa: f32,
    pub illuminance_lux: f32,
}

impl AmbientReadings {
    pub const fn new() -> Self {
        Self {
            temperature_c: 0.0,
            humidity_pct: 0.0,
            pressure_hpa: 0.0,
            illuminance_lux: 0.0,
        }
    }
}

/// Mirror of the hub's light state, not locally authoritative
///
/// Written only by inbound update handling (plus the optimistic
/// `manual_override` set when the user turns the light on locally).
/// Last writer wins; the hub's echo is always trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightState {
    pub is_on: bool,
    pub manual_override: bool,
    pub occupancy: bool,
    /// When the light last transitioned to on
    pub on_since: Option<Instant>,
    pub timer_remaining_secs: u32,
    pub motion_timer_ms: u32,
    pub manual_timer_ms: u32,
}

impl LightState {
    pub const fn new() -> Self {
        Self {
            is_on: false,
            manual_override: false,
            occupancy: false,
            on_since: None,
            timer_remaining_secs: 0,
            motion_timer_ms: DEFAULT_MOTION_TIMER_MS,
            manual_timer_ms: DEFAULT_MANUAL_TIMER_MS,
        }
    }
}

/// Scratch values while a timer is being edited
///
/// Loaded from [`LightState`] on menu entry, committed only by the confirm
/// click; an inactivity reset abandons it without publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerEditBuffer {
    pub motion_ms: u32,
    pub manual_ms: u32,
}

impl TimerEditBuffer {
    pub const fn new() -> Self {
        Self {
            motion_ms: DEFAULT_MOTION_TIMER_MS,
            manual_ms: DEFAULT_MANUAL_TIMER_MS,
        }
    }
}

/// Complete runtime state, owned by the main loop via [`SYSTEM_STATE`]
///
/// No subsystem keeps a hidden copy: the UI machine mutates the mode
/// fields, the sampler mutates readings, inbound routing mutates the
/// mirrors, and the renderer only reads.
#[derive(Debug)]
pub struct AppState {
    /// Current top-level screen
    pub mode: DisplayMode,
    /// Nested live/placeholder state while on a channel detail screen
    pub power_submode: PowerSubMode,
    /// Selected row in the lights menu
    pub menu_selection: usize,
    pub light: LightState,
    pub edit: TimerEditBuffer,
    pub channels: [PowerChannelReading; 3],
    pub battery: BatteryEnergy,
    pub ambient: AmbientReadings,
    /// Per-channel boot-probe result; a channel absent at boot stays absent
    pub sensor_online: [bool; 3],
    /// Broker session currently established
    pub link_online: bool,
}

impl AppState {
    pub const fn new() -> Self {
        Self {
            mode: DisplayMode::Overview,
            power_submode: PowerSubMode::Live,
            menu_selection: 0,
            light: LightState::new(),
            edit: TimerEditBuffer::new(),
            channels: [PowerChannelReading::new(); 3],
            battery: BatteryEnergy::new(),
            ambient: AmbientReadings::new(),
            sensor_online: [false; 3],
            link_online: false,
        }
    }

    /// Inactivity reset: back to the overview, nested sub-mode live
    pub fn reset_view(&mut self) {
        self.mode = DisplayMode::Overview;
        self.power_submode = PowerSubMode::Live;
    }

    /// Applies one inbound state update to exactly one field
    ///
    /// Enforces the boundary invariant: a light that is off cannot carry a
    /// manual override.
    pub fn apply_update(&mut self, update: StateUpdate, now: Instant) {
        match update {
            StateUpdate::Light(on) => {
                if on && !self.light.is_on {
                    self.light.on_since = Some(now);
                }
                self.light.is_on = on;
                if !on {
                    self.light.manual_override = false;
                    self.light.on_since = None;
                }
            }
            StateUpdate::Occupancy(detected) => self.light.occupancy = detected,
            StateUpdate::TimerRemainingSecs(secs) => self.light.timer_remaining_secs = secs,
            StateUpdate::MotionTimerSecs(secs) => {
                self.light.motion_timer_ms = secs.saturating_mul(1000)
            }
            StateUpdate::ManualTimerSecs(secs) => {
                self.light.manual_timer_ms = secs.saturating_mul(1000)
            }
            StateUpdate::Temperature(v) => self.ambient.temperature_c = v,
            StateUpdate::Humidity(v) => self.ambient.humidity_pct = v,
            StateUpdate::Pressure(v) => self.ambient.pressure_hpa = v,
            StateUpdate::Illuminance(v) => self.ambient.illuminance_lux = v,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
