//! MQTT topic table
//!
//! One place for every topic string the device publishes or subscribes to.
//! The hub owns the light and both timers; this device owns availability and
//! all power telemetry.

/// Retained device online/offline status, also the last-will topic
pub const AVAILABILITY: &str = "shed/monitor/availability";

/// Availability payloads
pub const PAYLOAD_ONLINE: &str = "online";
pub const PAYLOAD_OFFLINE: &str = "offline";

// Light control (hub-owned state, device publishes commands)
pub const LIGHT_STATE: &str = "shed/monitor/light/state";
pub const LIGHT_COMMAND: &str = "shed/monitor/light/switch";
pub const OCCUPANCY_STATE: &str = "shed/monitor/occupancy/state";

// Timer control (values in whole seconds, 10..=3600)
pub const MOTION_TIMER_BASE: &str = "shed/monitor/light/motion_timer";
pub const MOTION_TIMER_STATE: &str = "shed/monitor/light/motion_timer/state";
pub const MOTION_TIMER_SET: &str = "shed/monitor/light/motion_timer/set";
pub const MANUAL_TIMER_BASE: &str = "shed/monitor/light/manual_timer";
pub const MANUAL_TIMER_STATE: &str = "shed/monitor/light/manual_timer/state";
pub const MANUAL_TIMER_SET: &str = "shed/monitor/light/manual_timer/set";
pub const TIMER_REMAINING_STATE: &str = "shed/monitor/light/timer_remaining/state";

// Ambient sensor mirror (published by the hub)
pub const TEMPERATURE_STATE: &str = "shed/monitor/temperature/state";
pub const HUMIDITY_STATE: &str = "shed/monitor/humidity/state";
pub const PRESSURE_STATE: &str = "shed/monitor/pressure/state";
pub const LUX_STATE: &str = "shed/monitor/lux/state";

/// Per-channel measurement topics, one topic per field
pub struct ChannelTopics {
    pub availability: &'static str,
    pub voltage: &'static str,
    pub current: &'static str,
    pub power: &'static str,
    pub energy: &'static str,
}

/// Channel order matches [`crate::system::state::PowerChannel`]
pub const CHANNELS: [ChannelTopics; 3] = [
    ChannelTopics {
        availability: "shed/monitor/power/ch1/availability",
        voltage: "shed/monitor/power/ch1/voltage",
        current: "shed/monitor/power/ch1/current",
        power: "shed/monitor/power/ch1/power",
        energy: "shed/monitor/power/ch1/energy",
    },
    ChannelTopics {
        availability: "shed/monitor/power/ch2/availability",
        voltage: "shed/monitor/power/ch2/voltage",
        current: "shed/monitor/power/ch2/current",
        power: "shed/monitor/power/ch2/power",
        energy: "shed/monitor/power/ch2/energy",
    },
    ChannelTopics {
        availability: "shed/monitor/power/ch3/availability",
        voltage: "shed/monitor/power/ch3/voltage",
        current: "shed/monitor/power/ch3/current",
        power: "shed/monitor/power/ch3/power",
        energy: "shed/monitor/power/ch3/energy",
    },
];

/// Battery charged/discharged energy split (channel 2 only)
pub const BATTERY_ENERGY_IN: &str = "shed/monitor/power/ch2/energy_in";
pub const BATTERY_ENERGY_OUT: &str = "shed/monitor/power/ch2/energy_out";

/// Retained capability announcement for the automation hub
pub const DISCOVERY: &str = "homeassistant/device/shed_power_monitor/config";

/// The full fixed subscription set, re-subscribed on every (re)connect
pub const SUBSCRIPTIONS: [&str; 9] = [
    LIGHT_STATE,
    MOTION_TIMER_STATE,
    MANUAL_TIMER_STATE,
    TIMER_REMAINING_STATE,
    OCCUPANCY_STATE,
    TEMPERATURE_STATE,
    HUMIDITY_STATE,
    PRESSURE_STATE,
    LUX_STATE,
];
