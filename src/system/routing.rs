//! Inbound Topic Routing
//!
//! Dispatches inbound broker messages by topic to a narrow, total parse.
//! Each successful parse yields a [`StateUpdate`] that writes exactly one
//! mirrored field; malformed payloads and unknown topics yield `None` and
//! the previous value stands.

use crate::system::topics;

/// One mirrored-field update parsed from an inbound publish
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateUpdate {
    Light(bool),
    Occupancy(bool),
    TimerRemainingSecs(u32),
    MotionTimerSecs(u32),
    ManualTimerSecs(u32),
    Temperature(f32),
    Humidity(f32),
    Pressure(f32),
    Illuminance(f32),
}

/// Routes an inbound publish to its state update
pub fn route(topic: &str, payload: &[u8]) -> Option<StateUpdate> {
    let text = core::str::from_utf8(payload).ok()?.trim();
    match topic {
        topics::LIGHT_STATE => parse_on_off(text).map(StateUpdate::Light),
        topics::OCCUPANCY_STATE => parse_on_off(text).map(StateUpdate::Occupancy),
        topics::TIMER_REMAINING_STATE => text.parse().ok().map(StateUpdate::TimerRemainingSecs),
        topics::MOTION_TIMER_STATE => text.parse().ok().map(StateUpdate::MotionTimerSecs),
        topics::MANUAL_TIMER_STATE => text.parse().ok().map(StateUpdate::ManualTimerSecs),
        topics::TEMPERATURE_STATE => text.parse().ok().map(StateUpdate::Temperature),
        topics::HUMIDITY_STATE => text.parse().ok().map(StateUpdate::Humidity),
        topics::PRESSURE_STATE => text.parse().ok().map(StateUpdate::Pressure),
        topics::LUX_STATE => text.parse().ok().map(StateUpdate::Illuminance),
        _ => None,
    }
}

fn parse_on_off(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("ON") {
        Some(true)
    } else if text.eq_ignore_ascii_case("OFF") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_state_tokens_are_case_insensitive() {
        assert_eq!(
            route(topics::LIGHT_STATE, b"ON"),
            Some(StateUpdate::Light(true))
        );
        assert_eq!(
            route(topics::LIGHT_STATE, b"off"),
            Some(StateUpdate::Light(false))
        );
        assert_eq!(
            route(topics::LIGHT_STATE, b" On "),
            Some(StateUpdate::Light(true))
        );
    }

    #[test]
    fn malformed_timer_payload_is_a_no_op() {
        assert_eq!(route(topics::MOTION_TIMER_STATE, b"soon"), None);
        assert_eq!(route(topics::MOTION_TIMER_STATE, b""), None);
        assert_eq!(route(topics::MOTION_TIMER_STATE, b"12.5"), None);
        assert_eq!(route(topics::MOTION_TIMER_STATE, b"\xff\xfe"), None);
    }

    #[test]
    fn timers_parse_as_whole_seconds() {
        assert_eq!(
            route(topics::MOTION_TIMER_STATE, b"90"),
            Some(StateUpdate::MotionTimerSecs(90))
        );
        assert_eq!(
            route(topics::MANUAL_TIMER_STATE, b"600"),
            Some(StateUpdate::ManualTimerSecs(600))
        );
        assert_eq!(
            route(topics::TIMER_REMAINING_STATE, b"42"),
            Some(StateUpdate::TimerRemainingSecs(42))
        );
    }

    #[test]
    fn ambient_values_parse_as_floats() {
        assert_eq!(
            route(topics::TEMPERATURE_STATE, b"21.4"),
            Some(StateUpdate::Temperature(21.4))
        );
        assert_eq!(
            route(topics::HUMIDITY_STATE, b"55"),
            Some(StateUpdate::Humidity(55.0))
        );
        assert_eq!(
            route(topics::LUX_STATE, b"1200.5"),
            Some(StateUpdate::Illuminance(1200.5))
        );
    }

    #[test]
    fn unknown_topic_is_ignored() {
        assert_eq!(route("shed/monitor/unknown", b"1"), None);
    }
}
