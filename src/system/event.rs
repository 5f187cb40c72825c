//! System Events
//!
//! Defines events and channels for inter-task communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::system::routing::StateUpdate;

/// Multi-producer, single-consumer event channel with capacity of 16
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Events, 16> = Channel::new();

/// Sends an event to the system channel
pub async fn send(event: Events) {
    EVENT_CHANNEL.sender().send(event).await;
}

/// Receives the next event from the system channel
pub async fn wait() -> Events {
    EVENT_CHANNEL.receiver().receive().await
}

/// Combined user input for one poll tick
///
/// Produced once per input-poll tick and consumed exactly once by the UI
/// state machine. Empty events (no rotation, no click) are never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvent {
    /// Net encoder detents since the previous tick, negative counter-clockwise
    pub rotation_delta: i32,
    /// A debounced button click happened since the previous tick
    pub clicked: bool,
}

impl InputEvent {
    /// An event that would cause no transition
    pub fn is_empty(&self) -> bool {
        self.rotation_delta == 0 && !self.clicked
    }
}

/// System-wide events
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Events {
    /// User input arrived from the rotary encoder
    Input(InputEvent),
    /// An inbound broker message updated the mirrored hub state
    StateUpdate(StateUpdate),
    /// Messaging link came up or went down
    LinkStatus(bool),
    /// Reached inactivity timeout
    InactivityTimeout,
}
