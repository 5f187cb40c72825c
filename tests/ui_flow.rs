//! End-to-end scenarios over the pure logic, driven exactly the way the
//! orchestrator drives it: inputs through the state machine, resulting
//! commands through composition, hub echoes through routing.

use embassy_time::Instant;
use shed_monitor::system::command::{self, OutboundMessage};
use shed_monitor::system::event::InputEvent;
use shed_monitor::system::routing;
use shed_monitor::system::state::{AppState, PowerChannel};
use shed_monitor::system::topics;
use shed_monitor::system::ui::{self, DisplayMode};

fn rotate(delta: i32) -> InputEvent {
    InputEvent {
        rotation_delta: delta,
        clicked: false,
    }
}

fn click() -> InputEvent {
    InputEvent {
        rotation_delta: 0,
        clicked: true,
    }
}

/// Feeds inputs through the machine, collecting everything that would be
/// published, like the orchestrator's process/handle pair does.
fn drive(state: &mut AppState, inputs: &[InputEvent]) -> Vec<OutboundMessage> {
    let mut published = Vec::new();
    for input in inputs {
        if let Some(cmd) = ui::apply_input(state, *input) {
            if let Ok(message) = command::compose(cmd) {
                published.push(message);
            }
        }
    }
    published
}

/// Applies an inbound broker message the way the messaging pump does.
fn inbound(state: &mut AppState, topic: &str, payload: &[u8], now_ms: u64) {
    if let Some(update) = routing::route(topic, payload) {
        state.apply_update(update, Instant::from_millis(now_ms));
    }
}

#[test]
fn overview_cycles_through_channels_and_wraps() {
    let mut state = AppState::new();

    let published = drive(&mut state, &[rotate(1), rotate(1), rotate(1), rotate(1)]);
    assert!(published.is_empty(), "navigation never publishes");
    assert_eq!(state.mode, DisplayMode::SensorsSummary);

    drive(&mut state, &[rotate(1)]);
    assert_eq!(state.mode, DisplayMode::Overview);
}

#[test]
fn light_toggle_scenario() {
    let mut state = AppState::new();
    assert!(!state.light.is_on);

    // click on overview opens the menu, second click toggles the light
    let published = drive(&mut state, &[click(), click()]);
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].topic, topics::LIGHT_COMMAND);
    assert_eq!(published[0].payload.as_str(), "ON");
    assert!(state.light.manual_override);
    assert!(!state.light.is_on, "only the hub echo turns the mirror on");

    // hub confirms
    inbound(&mut state, topics::LIGHT_STATE, b"ON", 5_000);
    assert!(state.light.is_on);
    assert_eq!(state.light.on_since, Some(Instant::from_millis(5_000)));

    // hub turns it off again later; the override falls with it
    inbound(&mut state, topics::LIGHT_STATE, b"OFF", 65_000);
    assert!(!state.light.is_on);
    assert!(!state.light.manual_override);
}

#[test]
fn edit_confirm_publishes_exactly_one_retained_command() {
    let mut state = AppState::new();
    // menu -> motion timer -> two increments -> confirm
    let published = drive(
        &mut state,
        &[click(), rotate(1), click(), rotate(1), rotate(1), click()],
    );

    assert_eq!(published.len(), 1);
    let message = &published[0];
    assert_eq!(message.topic, topics::MOTION_TIMER_SET);
    assert_eq!(message.payload.as_str(), "70"); // 10 s default + 2 x 30 s
    assert!(message.retain);
    assert_eq!(state.mode, DisplayMode::LightsMenu);
}

#[test]
fn abandoned_edit_publishes_nothing_and_preserves_the_mirror() {
    let mut state = AppState::new();
    inbound(&mut state, topics::MANUAL_TIMER_STATE, b"300", 0);

    // open the manual timer editor and wind it up, but never confirm
    let published = drive(&mut state, &[click(), rotate(1), rotate(1), click(), rotate(1)]);
    assert!(published.is_empty());
    assert_eq!(state.mode, DisplayMode::EditManualTimer);
    assert_eq!(state.edit.manual_ms, 330_000);

    // inactivity timeout fires instead of a confirm click
    state.reset_view();
    assert_eq!(state.mode, DisplayMode::Overview);
    assert_eq!(state.light.manual_timer_ms, 300_000);

    // re-entering the editor re-copies the committed value
    drive(&mut state, &[click(), rotate(1), rotate(1), click()]);
    assert_eq!(state.edit.manual_ms, 300_000);
}

#[test]
fn malformed_inbound_payload_is_ignored() {
    let mut state = AppState::new();
    inbound(&mut state, topics::MOTION_TIMER_STATE, b"90", 0);
    assert_eq!(state.light.motion_timer_ms, 90_000);

    inbound(&mut state, topics::MOTION_TIMER_STATE, b"banana", 0);
    assert_eq!(state.light.motion_timer_ms, 90_000);
}

#[test]
fn hub_updates_flow_into_the_ambient_mirror() {
    let mut state = AppState::new();
    inbound(&mut state, topics::TEMPERATURE_STATE, b"19.5", 0);
    inbound(&mut state, topics::HUMIDITY_STATE, b"61", 0);
    inbound(&mut state, topics::PRESSURE_STATE, b"1009.2", 0);
    inbound(&mut state, topics::LUX_STATE, b"834", 0);
    inbound(&mut state, topics::OCCUPANCY_STATE, b"ON", 0);
    inbound(&mut state, topics::TIMER_REMAINING_STATE, b"118", 0);

    assert_eq!(state.ambient.temperature_c, 19.5);
    assert_eq!(state.ambient.humidity_pct, 61.0);
    assert_eq!(state.ambient.pressure_hpa, 1009.2);
    assert_eq!(state.ambient.illuminance_lux, 834.0);
    assert!(state.light.occupancy);
    assert_eq!(state.light.timer_remaining_secs, 118);
}

#[test]
fn channel_detail_click_never_leaves_the_channel() {
    let mut state = AppState::new();
    drive(&mut state, &[rotate(1)]);
    assert_eq!(state.mode, DisplayMode::ChannelDetail(PowerChannel::Panel));

    let published = drive(&mut state, &[click(), click(), click()]);
    assert!(published.is_empty());
    assert_eq!(state.mode, DisplayMode::ChannelDetail(PowerChannel::Panel));
}
