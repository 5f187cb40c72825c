//! Render Snapshot
//!
//! Immutable data handed to the renderer once per display tick. Capturing
//! happens under the state lock; rendering does not.

use embassy_time::Instant;

use crate::system::state::{AmbientReadings, AppState, BatteryEnergy, PowerChannelReading};
use crate::system::ui::{DisplayMode, PowerSubMode};

/// Light status as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightSnapshot {
    pub is_on: bool,
    pub manual_override: bool,
    pub occupancy: bool,
    /// Whole seconds since the light turned on, zero while off
    pub on_for_secs: u32,
    /// Hub-reported seconds until the active timer expires
    pub remaining_secs: u32,
}

/// Everything a frame needs, decoupled from live state
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub mode: DisplayMode,
    pub power_submode: PowerSubMode,
    pub menu_selection: usize,
    pub channels: [PowerChannelReading; 3],
    pub battery: BatteryEnergy,
    pub ambient: AmbientReadings,
    pub light: LightSnapshot,
    pub edit_motion_ms: u32,
    pub edit_manual_ms: u32,
    pub link_online: bool,
    pub sensor_online: [bool; 3],
}

impl RenderSnapshot {
    /// Packages the current state for one frame
    pub fn capture(state: &AppState, now: Instant) -> Self {
        let on_for_secs = match (state.light.is_on, state.light.on_since) {
            (true, Some(since)) => now
                .checked_duration_since(since)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0),
            _ => 0,
        };
        Self {
            mode: state.mode,
            power_submode: state.power_submode,
            menu_selection: state.menu_selection,
            channels: state.channels,
            battery: state.battery,
            ambient: state.ambient,
            light: LightSnapshot {
                is_on: state.light.is_on,
                manual_override: state.light.manual_override,
                occupancy: state.light.occupancy,
                on_for_secs,
                remaining_secs: state.light.timer_remaining_secs,
            },
            edit_motion_ms: state.edit.motion_ms,
            edit_manual_ms: state.edit.manual_ms,
            link_online: state.link_online,
            sensor_online: state.sensor_online,
        }
    }
}
