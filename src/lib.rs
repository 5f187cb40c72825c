//! Shed power monitor firmware
//!
//! Samples three INA-family power channels (solar panel, battery, load),
//! drives a rotary-encoder OLED UI and mirrors light/timer state with the
//! sensor hub over MQTT.
//!
//! The crate is split so the logic runs in host tests: everything in
//! [`system`] compiles for any target, while the embassy tasks in [`task`]
//! and the firmware binary are gated behind the `embedded` feature.

#![cfg_attr(not(test), no_std)]

/// System core modules
pub mod system;
/// Task implementations
#[cfg(feature = "embedded")]
pub mod task;
