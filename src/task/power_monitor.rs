//! Power telemetry sampling
//!
//! Probes the three channel addresses at boot, then samples bus voltage,
//! current and power on a fixed cadence, integrates energy and publishes
//! every field retained. A channel that did not answer its boot probe is
//! skipped on every tick; only its availability topic says so.

use defmt::{info, warn};
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_rp::i2c::{Async as I2cAsync, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};

use crate::system::command::{self, OutboundMessage};
use crate::system::power_sensor::AnyPowerSensor;
use crate::system::resources::I2cBus;
use crate::system::state::{PowerChannel, SYSTEM_STATE};
use crate::system::telemetry;
use crate::system::topics;

/// Fixed sampling cadence, also the energy integration step (ms)
const SAMPLE_INTERVAL_MS: u32 = 250;

/// Channel addresses on the shared bus: panel, battery, load
const CHANNEL_ADDRESSES: [u8; 3] = [0x40, 0x41, 0x44];

/// Shunt resistance, identical on all three channels (ohms)
const CHANNEL_SHUNT_OHMS: f32 = 0.01;

type SensorBus = I2cDevice<'static, CriticalSectionRawMutex, I2c<'static, I2C0, I2cAsync>>;

/// Telemetry sampler task
#[embassy_executor::task]
pub async fn power_monitor(i2c_bus: &'static I2cBus) {
    let mut sensors: [Option<AnyPowerSensor<SensorBus>>; 3] = [None, None, None];
    for (slot, address) in sensors.iter_mut().zip(CHANNEL_ADDRESSES) {
        *slot = AnyPowerSensor::detect(I2cDevice::new(i2c_bus), address, CHANNEL_SHUNT_OHMS).await;
    }

    {
        let mut state = SYSTEM_STATE.lock().await;
        for (online, sensor) in state.sensor_online.iter_mut().zip(&sensors) {
            *online = sensor.is_some();
        }
    }
    for (channel, sensor) in PowerChannel::ALL.iter().zip(&sensors) {
        match sensor {
            Some(sensor) => info!("{}: {} online", channel.label(), sensor.kind()),
            None => info!("{}: no sensor found", channel.label()),
        }
    }

    let mut ticker = Ticker::every(Duration::from_millis(SAMPLE_INTERVAL_MS as u64));
    loop {
        ticker.next().await;
        for channel in PowerChannel::ALL {
            if let Some(sensor) = sensors[channel.index()].as_mut() {
                sample_channel(channel, sensor).await;
            }
        }
    }
}

/// Reads one channel, folds it into the shared state, publishes every field
async fn sample_channel(channel: PowerChannel, sensor: &mut AnyPowerSensor<SensorBus>) {
    let reads = (
        sensor.bus_voltage_v().await,
        sensor.current_ma().await,
        sensor.power_mw().await,
    );
    let (Ok(bus_voltage_v), Ok(current_ma), Ok(power_mw)) = reads else {
        warn!("{}: read failed, keeping last sample", channel.label());
        return;
    };

    let (reading, battery) = {
        let mut state = SYSTEM_STATE.lock().await;
        let delta_wh = telemetry::accumulate(
            &mut state.channels[channel.index()],
            bus_voltage_v,
            current_ma,
            power_mw,
            SAMPLE_INTERVAL_MS,
        );
        if channel == PowerChannel::Battery {
            telemetry::split_battery(&mut state.battery, delta_wh);
        }
        (state.channels[channel.index()], state.battery)
    };

    let channel_topics = &topics::CHANNELS[channel.index()];
    emit(command::measurement(channel_topics.voltage, reading.bus_voltage_v, 2));
    emit(command::measurement(channel_topics.current, reading.current_ma, 2));
    emit(command::measurement(channel_topics.power, reading.power_mw, 2));
    if channel == PowerChannel::Battery {
        emit(command::measurement(topics::BATTERY_ENERGY_IN, battery.charged_wh, 4));
        emit(command::measurement(topics::BATTERY_ENERGY_OUT, battery.discharged_wh, 4));
    } else {
        emit(command::measurement(channel_topics.energy, reading.energy_wh, 4));
    }
}

fn emit(message: OutboundMessage) {
    if !command::publish(message) {
        warn!("telemetry queue full, sample dropped");
    }
}
