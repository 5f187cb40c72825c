//! Outbound Publish Queue
//!
//! The UI state machine and the telemetry sampler are the only producers of
//! outbound messages; the messaging task drains the queue into the broker
//! session. Queueing never blocks: when the link is down long enough for
//! the queue to fill, messages are dropped (delivery here is at-most-once).

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

use crate::system::topics;
use crate::system::ui::UiCommand;

/// Queue depth covers one full sampler burst plus pending UI commands
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, OutboundMessage, 32> = Channel::new();

/// Payload text, sized for the longest formatted measurement
pub type Payload = String<16>;

/// Hub-accepted timer command range (whole seconds)
pub const TIMER_COMMAND_MIN_SECS: u32 = 10;
pub const TIMER_COMMAND_MAX_SECS: u32 = 3600;

/// One message bound for the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: &'static str,
    pub payload: Payload,
    pub retain: bool,
}

/// Rejected at the composition boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComposeError {
    /// Timer value outside the hub's accepted range
    OutOfRange,
}

/// Queues a message without blocking
///
/// Returns false when the queue is full; the message is dropped.
pub fn publish(message: OutboundMessage) -> bool {
    COMMAND_CHANNEL.sender().try_send(message).is_ok()
}

/// Waits for the next queued message
pub async fn wait() -> OutboundMessage {
    COMMAND_CHANNEL.receiver().receive().await
}

/// Builds the wire message for a UI command
///
/// The edit buffer is pre-clamped, but the commit path validates the range
/// again before anything reaches the wire.
pub fn compose(command: UiCommand) -> Result<OutboundMessage, ComposeError> {
    match command {
        UiCommand::LightOn => Ok(text(topics::LIGHT_COMMAND, "ON", false)),
        UiCommand::LightOff => Ok(text(topics::LIGHT_COMMAND, "OFF", false)),
        UiCommand::SetMotionTimerSecs(secs) => timer_command(topics::MOTION_TIMER_SET, secs),
        UiCommand::SetManualTimerSecs(secs) => timer_command(topics::MANUAL_TIMER_SET, secs),
    }
}

/// Formats a measurement for its retained state topic
pub fn measurement(topic: &'static str, value: f32, decimals: usize) -> OutboundMessage {
    let mut payload = Payload::new();
    let _ = write!(payload, "{:.*}", decimals, value);
    OutboundMessage {
        topic,
        payload,
        retain: true,
    }
}

/// Retained online/offline flag for an availability topic
pub fn availability(topic: &'static str, online: bool) -> OutboundMessage {
    let payload = if online {
        topics::PAYLOAD_ONLINE
    } else {
        topics::PAYLOAD_OFFLINE
    };
    text(topic, payload, true)
}

fn timer_command(topic: &'static str, secs: u32) -> Result<OutboundMessage, ComposeError> {
    if !(TIMER_COMMAND_MIN_SECS..=TIMER_COMMAND_MAX_SECS).contains(&secs) {
        return Err(ComposeError::OutOfRange);
    }
    let mut payload = Payload::new();
    let _ = write!(payload, "{}", secs);
    Ok(OutboundMessage {
        topic,
        payload,
        retain: true,
    })
}

fn text(topic: &'static str, value: &str, retain: bool) -> OutboundMessage {
    let mut payload = Payload::new();
    let _ = payload.push_str(value);
    OutboundMessage {
        topic,
        payload,
        retain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_commands_are_not_retained() {
        let on = compose(UiCommand::LightOn).unwrap();
        assert_eq!(on.topic, topics::LIGHT_COMMAND);
        assert_eq!(on.payload.as_str(), "ON");
        assert!(!on.retain);

        let off = compose(UiCommand::LightOff).unwrap();
        assert_eq!(off.payload.as_str(), "OFF");
    }

    #[test]
    fn timer_commands_are_retained_whole_seconds() {
        let message = compose(UiCommand::SetMotionTimerSecs(90)).unwrap();
        assert_eq!(message.topic, topics::MOTION_TIMER_SET);
        assert_eq!(message.payload.as_str(), "90");
        assert!(message.retain);
    }

    #[test]
    fn out_of_range_timers_never_reach_the_wire() {
        assert_eq!(
            compose(UiCommand::SetMotionTimerSecs(9)),
            Err(ComposeError::OutOfRange)
        );
        assert_eq!(
            compose(UiCommand::SetManualTimerSecs(3601)),
            Err(ComposeError::OutOfRange)
        );
        assert!(compose(UiCommand::SetManualTimerSecs(10)).is_ok());
        assert!(compose(UiCommand::SetManualTimerSecs(3600)).is_ok());
    }

    #[test]
    fn measurement_formatting_matches_topic_convention() {
        assert_eq!(measurement("t", 12.345, 2).payload.as_str(), "12.35");
        assert_eq!(measurement("t", 0.1234, 4).payload.as_str(), "0.1234");
        assert_eq!(measurement("t", -250.0, 2).payload.as_str(), "-250.00");
    }

    #[test]
    fn availability_payloads() {
        assert_eq!(availability("t", true).payload.as_str(), "online");
        assert_eq!(availability("t", false).payload.as_str(), "offline");
    }
}
