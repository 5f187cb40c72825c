//! Telemetry accumulation
//!
//! Pure arithmetic the sampler task applies under the state lock.

use crate::system::state::{BatteryEnergy, PowerChannelReading};

/// Energy contributed by holding `power_mw` for `interval_ms`
pub fn energy_delta_wh(power_mw: f32, interval_ms: u32) -> f32 {
    (power_mw / 1000.0) * (interval_ms as f32 / 3_600_000.0)
}

/// Folds one sample into a channel reading, returns the energy delta
pub fn accumulate(
    reading: &mut PowerChannelReading,
    bus_voltage_v: f32,
    current_ma: f32,
    power_mw: f32,
    interval_ms: u32,
) -> f32 {
    reading.bus_voltage_v = bus_voltage_v;
    reading.current_ma = current_ma;
    reading.power_mw = power_mw;
    let delta = energy_delta_wh(power_mw, interval_ms);
    reading.energy_wh += delta;
    delta
}

/// Splits a battery energy delta by flow direction
///
/// Positive deltas count as charge, negative as discharge; both
/// accumulators only ever grow.
pub fn split_battery(battery: &mut BatteryEnergy, delta_wh: f32) {
    if delta_wh > 0.0 {
        battery.charged_wh += delta_wh;
    } else {
        battery.discharged_wh += -delta_wh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_power_integrates_to_expected_energy() {
        // 5 W sustained over 3600 intervals of 250 ms = 15 min = 1.25 Wh
        let mut reading = PowerChannelReading::new();
        for _ in 0..3600 {
            accumulate(&mut reading, 12.0, 416.0, 5000.0, 250);
        }
        assert!((reading.energy_wh - 1.25).abs() < 1e-3);
    }

    #[test]
    fn instantaneous_fields_are_overwritten_not_summed() {
        let mut reading = PowerChannelReading::new();
        accumulate(&mut reading, 12.0, 100.0, 1200.0, 250);
        accumulate(&mut reading, 11.5, 90.0, 1035.0, 250);
        assert_eq!(reading.bus_voltage_v, 11.5);
        assert_eq!(reading.current_ma, 90.0);
        assert_eq!(reading.power_mw, 1035.0);
    }

    #[test]
    fn battery_split_directions_are_monotonic() {
        let mut battery = BatteryEnergy::new();
        split_battery(&mut battery, 0.5);
        split_battery(&mut battery, -0.2);
        split_battery(&mut battery, 0.25);
        assert!((battery.charged_wh - 0.75).abs() < 1e-6);
        assert!((battery.discharged_wh - 0.2).abs() < 1e-6);
    }

    #[test]
    fn negative_power_still_reduces_nothing() {
        let mut reading = PowerChannelReading::new();
        let delta = accumulate(&mut reading, 12.0, -400.0, -4800.0, 250);
        assert!(delta < 0.0);
        // net energy integral may shrink for the bidirectional channel,
        // the split accumulators below are what stay monotonic
        let mut battery = BatteryEnergy::new();
        split_battery(&mut battery, delta);
        assert!(battery.discharged_wh > 0.0);
        assert_eq!(battery.charged_wh, 0.0);
    }
}
