//! Input polling
//!
//! Derives the per-tick [`InputEvent`] from the encoder primitives and
//! feeds the state machine through the event channel. Any non-empty input
//! also refreshes the activity clock.

use embassy_time::{Duration, Ticker};

use crate::system::activity;
use crate::system::event::{self, Events, InputEvent};
use crate::system::input;

/// Poll cadence; a human detent spans several ticks
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[embassy_executor::task]
pub async fn input_poll() {
    let mut ticker = Ticker::every(POLL_INTERVAL);
    let mut last_position = input::read_position();
    loop {
        ticker.next().await;
        let position = input::read_position();
        let event = InputEvent {
            rotation_delta: position.wrapping_sub(last_position),
            clicked: input::take_click(),
        };
        last_position = position;
        if event.is_empty() {
            continue;
        }
        activity::signal_activity();
        event::send(Events::Input(event)).await;
    }
}
