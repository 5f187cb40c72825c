//! Capability Announcement
//!
//! Builds the retained discovery document the automation hub consumes:
//! both timers as number entities with declared range and unit, every power
//! measurement as a sensor entity pointing at its own state topic. Uses the
//! hub's abbreviated key names.
//!
//! The document must fit the fixed buffer; when it does not, the publish is
//! skipped and logged, never fatal.

use serde::Serialize;

use crate::system::{config, topics};

/// Fixed buffer size for the serialized document
pub const DISCOVERY_PAYLOAD_SIZE: usize = 7168;

#[derive(Serialize)]
struct Device {
    name: &'static str,
    ids: &'static str,
    mf: &'static str,
    mdl: &'static str,
    suggested_area: &'static str,
}

#[derive(Serialize)]
struct Origin {
    name: &'static str,
    sw: &'static str,
}

#[derive(Serialize)]
struct NumberComponent {
    name: &'static str,
    p: &'static str,
    min: u16,
    max: u16,
    unit_of_meas: &'static str,
    uniq_id: &'static str,
    object_id: &'static str,
    #[serde(rename = "~")]
    base: &'static str,
    stat_t: &'static str,
    cmd_t: &'static str,
    avty_t: &'static str,
}

impl NumberComponent {
    fn timer(
        name: &'static str,
        uniq_id: &'static str,
        object_id: &'static str,
        base: &'static str,
    ) -> Self {
        Self {
            name,
            p: "number",
            min: 10,
            max: 3600,
            unit_of_meas: "s",
            uniq_id,
            object_id,
            base,
            stat_t: "~/state",
            cmd_t: "~/set",
            avty_t: topics::AVAILABILITY,
        }
    }
}

#[derive(Serialize)]
struct SensorComponent {
    name: &'static str,
    p: &'static str,
    dev_cla: &'static str,
    unit_of_meas: &'static str,
    stat_cla: &'static str,
    uniq_id: &'static str,
    object_id: &'static str,
    ic: &'static str,
    stat_t: &'static str,
    avty_t: &'static str,
    pl_avail: &'static str,
    pl_not_avail: &'static str,
}

impl SensorComponent {
    #[allow(clippy::too_many_arguments)]
    fn sensor(
        name: &'static str,
        dev_cla: &'static str,
        unit_of_meas: &'static str,
        stat_cla: &'static str,
        ic: &'static str,
        uniq_id: &'static str,
        object_id: &'static str,
        stat_t: &'static str,
    ) -> Self {
        Self {
            name,
            p: "sensor",
            dev_cla,
            unit_of_meas,
            stat_cla,
            uniq_id,
            object_id,
            ic,
            stat_t,
            avty_t: topics::AVAILABILITY,
            pl_avail: topics::PAYLOAD_ONLINE,
            pl_not_avail: topics::PAYLOAD_OFFLINE,
        }
    }
}

#[derive(Serialize)]
struct Components {
    #[serde(rename = "shed_light_motion_timer")]
    motion_timer: NumberComponent,
    #[serde(rename = "shed_light_override_timer")]
    override_timer: NumberComponent,
    #[serde(rename = "shed_solar_panel_voltage")]
    ch1_voltage: SensorComponent,
    #[serde(rename = "shed_solar_panel_current")]
    ch1_current: SensorComponent,
    #[serde(rename = "shed_solar_panel_power")]
    ch1_power: SensorComponent,
    #[serde(rename = "shed_solar_panel_energy")]
    ch1_energy: SensorComponent,
    #[serde(rename = "shed_battery_voltage")]
    ch2_voltage: SensorComponent,
    #[serde(rename = "shed_battery_current")]
    ch2_current: SensorComponent,
    #[serde(rename = "shed_battery_power")]
    ch2_power: SensorComponent,
    #[serde(rename = "shed_battery_energy_charged")]
    ch2_energy_in: SensorComponent,
    #[serde(rename = "shed_battery_energy_discharged")]
    ch2_energy_out: SensorComponent,
    #[serde(rename = "shed_load_voltage")]
    ch3_voltage: SensorComponent,
    #[serde(rename = "shed_load_current")]
    ch3_current: SensorComponent,
    #[serde(rename = "shed_load_power")]
    ch3_power: SensorComponent,
    #[serde(rename = "shed_load_energy")]
    ch3_energy: SensorComponent,
}

#[derive(Serialize)]
struct DiscoveryDoc {
    device: Device,
    o: Origin,
    cmps: Components,
}

fn document() -> DiscoveryDoc {
    DiscoveryDoc {
        device: Device {
            name: "Shed Solar Monitor",
            ids: config::DEVICE_ID,
            mf: "shed-monitor",
            mdl: "Pico 2 W Solar Core",
            suggested_area: "Shed",
        },
        o: Origin {
            name: "shed-monitor",
            sw: env!("CARGO_PKG_VERSION"),
        },
        cmps: Components {
            motion_timer: NumberComponent::timer(
                "Shed Motion Timer",
                "shed_power_monitor_light_motion_timer",
                "shed_light_motion_timer",
                topics::MOTION_TIMER_BASE,
            ),
            override_timer: NumberComponent::timer(
                "Shed Override Timer",
                "shed_power_monitor_light_override_timer",
                "shed_light_override_timer",
                topics::MANUAL_TIMER_BASE,
            ),
            ch1_voltage: SensorComponent::sensor(
                "Solar Panel Voltage",
                "voltage",
                "V",
                "measurement",
                "mdi:flash",
                "shed_power_monitor_ch1_voltage",
                "shed_solar_panel_voltage",
                topics::CHANNELS[0].voltage,
            ),
            ch1_current: SensorComponent::sensor(
                "Solar Panel Current",
                "current",
                "mA",
                "measurement",
                "mdi:current-dc",
                "shed_power_monitor_ch1_current",
                "shed_solar_panel_current",
                topics::CHANNELS[0].current,
            ),
            ch1_power: SensorComponent::sensor(
                "Solar Panel Power",
                "power",
                "mW",
                "measurement",
                "mdi:solar-power-variant",
                "shed_power_monitor_ch1_power",
                "shed_solar_panel_power",
                topics::CHANNELS[0].power,
            ),
            ch1_energy: SensorComponent::sensor(
                "Solar Panel Energy",
                "energy",
                "Wh",
                "total_increasing",
                "mdi:chart-histogram",
                "shed_power_monitor_ch1_energy",
                "shed_solar_panel_energy",
                topics::CHANNELS[0].energy,
            ),
            ch2_voltage: SensorComponent::sensor(
                "Battery Voltage",
                "voltage",
                "V",
                "measurement",
                "mdi:flash",
                "shed_power_monitor_ch2_voltage",
                "shed_battery_voltage",
                topics::CHANNELS[1].voltage,
            ),
            ch2_current: SensorComponent::sensor(
                "Battery Current",
                "current",
                "mA",
                "measurement",
                "mdi:current-dc",
                "shed_power_monitor_ch2_current",
                "shed_battery_current",
                topics::CHANNELS[1].current,
            ),
            ch2_power: SensorComponent::sensor(
                "Battery Power",
                "power",
                "mW",
                "measurement",
                "mdi:battery",
                "shed_power_monitor_ch2_power",
                "shed_battery_power",
                topics::CHANNELS[1].power,
            ),
            ch2_energy_in: SensorComponent::sensor(
                "Battery Energy Charged",
                "energy",
                "Wh",
                "total_increasing",
                "mdi:battery-arrow-up",
                "shed_power_monitor_ch2_energy_in",
                "shed_battery_energy_charged",
                topics::BATTERY_ENERGY_IN,
            ),
            ch2_energy_out: SensorComponent::sensor(
                "Battery Energy Discharged",
                "energy",
                "Wh",
                "total_increasing",
                "mdi:battery-arrow-down",
                "shed_power_monitor_ch2_energy_out",
                "shed_battery_energy_discharged",
                topics::BATTERY_ENERGY_OUT,
            ),
            ch3_voltage: SensorComponent::sensor(
                "Load Voltage",
                "voltage",
                "V",
                "measurement",
                "mdi:flash",
                "shed_power_monitor_ch3_voltage",
                "shed_load_voltage",
                topics::CHANNELS[2].voltage,
            ),
            ch3_current: SensorComponent::sensor(
                "Load Current",
                "current",
                "mA",
                "measurement",
                "mdi:current-dc",
                "shed_power_monitor_ch3_current",
                "shed_load_current",
                topics::CHANNELS[2].current,
            ),
            ch3_power: SensorComponent::sensor(
                "Load Power",
                "power",
                "mW",
                "measurement",
                "mdi:power-plug",
                "shed_power_monitor_ch3_power",
                "shed_load_power",
                topics::CHANNELS[2].power,
            ),
            ch3_energy: SensorComponent::sensor(
                "Load Energy",
                "energy",
                "Wh",
                "total_increasing",
                "mdi:chart-histogram",
                "shed_power_monitor_ch3_energy",
                "shed_load_energy",
                topics::CHANNELS[2].energy,
            ),
        },
    }
}

/// Serializes the announcement into `buf`
///
/// Returns the serialized length, or `None` when the document does not fit
/// the buffer.
pub fn discovery_payload(buf: &mut [u8]) -> Option<usize> {
    serde_json_core::to_slice(&document(), buf).ok()
}
