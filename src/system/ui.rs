//! UI State Machine
//!
//! Hierarchical state machine over the display modes. Consumes the combined
//! per-tick [`InputEvent`] and mutates the mode fields of [`AppState`];
//! outbound publishes happen only at the click edges enumerated here, never
//! on pure navigation.
//!
//! The lights menu is reached by clicking on the overview screen; there is
//! no lights screen inside the cyclic ring.

use crate::system::event::InputEvent;
use crate::system::state::{AppState, PowerChannel};

/// Timer edit granularity (ms)
pub const TIMER_STEP_MS: u32 = 30_000;

/// Smallest editable timer duration (ms)
pub const TIMER_MIN_MS: u32 = 10_000;

/// Largest editable timer duration (ms)
pub const TIMER_MAX_MS: u32 = 3_600_000;

/// Lights menu rows: toggle light, motion timer, manual timer, back
pub const MENU_ITEM_COUNT: usize = 4;

/// Top-level display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// All three channels at a glance, the default screen
    Overview,
    /// Single-channel detail, carries a nested [`PowerSubMode`]
    ChannelDetail(PowerChannel),
    /// Ambient sensor summary
    SensorsSummary,
    /// Light control menu
    LightsMenu,
    /// Editing the motion-activated timer duration
    EditMotionTimer,
    /// Editing the manual-override timer duration
    EditManualTimer,
}

/// Nested state while on a channel detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerSubMode {
    /// Live readings
    Live,
    /// Placeholder sub-screen
    Placeholder,
}

/// Side effects requested by a transition, executed by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiCommand {
    LightOn,
    LightOff,
    /// Commit the motion timer, value in whole seconds
    SetMotionTimerSecs(u32),
    /// Commit the manual timer, value in whole seconds
    SetManualTimerSecs(u32),
}

/// The fixed cyclic order reachable by rotation, wrapping at both ends
const RING: [DisplayMode; 5] = [
    DisplayMode::Overview,
    DisplayMode::ChannelDetail(PowerChannel::Panel),
    DisplayMode::ChannelDetail(PowerChannel::Battery),
    DisplayMode::ChannelDetail(PowerChannel::Load),
    DisplayMode::SensorsSummary,
];

fn ring_step(mode: DisplayMode, step: i32) -> DisplayMode {
    let len = RING.len() as i32;
    let index = RING.iter().position(|m| *m == mode).unwrap_or(0) as i32;
    RING[(index + step).rem_euclid(len) as usize]
}

fn adjust_duration(value: u32, step: i32) -> u32 {
    if step > 0 {
        value.saturating_add(TIMER_STEP_MS).min(TIMER_MAX_MS)
    } else if step < 0 {
        value.saturating_sub(TIMER_STEP_MS).max(TIMER_MIN_MS)
    } else {
        value
    }
}

/// Runs one transition of the state machine
///
/// Rotation is applied before the click: a tick carrying both first
/// navigates, then acts on the screen it landed on.
pub fn apply_input(state: &mut AppState, input: InputEvent) -> Option<UiCommand> {
    let step = input.rotation_delta.signum();

    match state.mode {
        DisplayMode::Overview | DisplayMode::ChannelDetail(_) | DisplayMode::SensorsSummary => {
            if step != 0 {
                state.mode = ring_step(state.mode, step);
                state.power_submode = PowerSubMode::Live;
            }
            if input.clicked {
                match state.mode {
                    DisplayMode::Overview => {
                        state.mode = DisplayMode::LightsMenu;
                        state.menu_selection = 0;
                    }
                    DisplayMode::ChannelDetail(_) => {
                        state.power_submode = match state.power_submode {
                            PowerSubMode::Live => PowerSubMode::Placeholder,
                            PowerSubMode::Placeholder => PowerSubMode::Live,
                        };
                    }
                    DisplayMode::SensorsSummary => state.mode = DisplayMode::Overview,
                    _ => {}
                }
            }
            None
        }

        DisplayMode::LightsMenu => {
            if step != 0 {
                let count = MENU_ITEM_COUNT as i32;
                state.menu_selection =
                    (state.menu_selection as i32 + step).rem_euclid(count) as usize;
            }
            if input.clicked {
                return dispatch_menu_click(state);
            }
            None
        }

        DisplayMode::EditMotionTimer => {
            if step != 0 {
                state.edit.motion_ms = adjust_duration(state.edit.motion_ms, step);
            }
            if input.clicked {
                state.mode = DisplayMode::LightsMenu;
                return Some(UiCommand::SetMotionTimerSecs(state.edit.motion_ms / 1000));
            }
            None
        }

        DisplayMode::EditManualTimer => {
            if step != 0 {
                state.edit.manual_ms = adjust_duration(state.edit.manual_ms, step);
            }
            if input.clicked {
                state.mode = DisplayMode::LightsMenu;
                return Some(UiCommand::SetManualTimerSecs(state.edit.manual_ms / 1000));
            }
            None
        }
    }
}

/// Acts on the selected lights-menu row
fn dispatch_menu_click(state: &mut AppState) -> Option<UiCommand> {
    match state.menu_selection {
        0 => {
            if state.light.is_on {
                Some(UiCommand::LightOff)
            } else {
                // optimistic: mark the override before the hub echoes back
                state.light.manual_override = true;
                Some(UiCommand::LightOn)
            }
        }
        1 => {
            state.edit.motion_ms = state.light.motion_timer_ms;
            state.mode = DisplayMode::EditMotionTimer;
            None
        }
        2 => {
            state.edit.manual_ms = state.light.manual_timer_ms;
            state.mode = DisplayMode::EditManualTimer;
            None
        }
        _ => {
            state.mode = DisplayMode::Overview;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn ring_cycles_forward_through_all_screens() {
        let mut state = AppState::new();
        let expected = [
            DisplayMode::ChannelDetail(PowerChannel::Panel),
            DisplayMode::ChannelDetail(PowerChannel::Battery),
            DisplayMode::ChannelDetail(PowerChannel::Load),
            DisplayMode::SensorsSummary,
            DisplayMode::Overview,
        ];
        for mode in expected {
            assert_eq!(apply_input(&mut state, rotate(1)), None);
            assert_eq!(state.mode, mode);
        }
    }

    #[test]
    fn ring_wraps_backwards_from_overview() {
        let mut state = AppState::new();
        apply_input(&mut state, rotate(-1));
        assert_eq!(state.mode, DisplayMode::SensorsSummary);
    }

    #[test]
    fn ring_move_resets_submode_to_live() {
        let mut state = AppState::new();
        state.mode = DisplayMode::ChannelDetail(PowerChannel::Panel);
        state.power_submode = PowerSubMode::Placeholder;
        apply_input(&mut state, rotate(1));
        assert_eq!(state.power_submode, PowerSubMode::Live);
    }

    #[test]
    fn click_on_channel_toggles_submode() {
        let mut state = AppState::new();
        state.mode = DisplayMode::ChannelDetail(PowerChannel::Battery);
        apply_input(&mut state, click());
        assert_eq!(state.power_submode, PowerSubMode::Placeholder);
        apply_input(&mut state, click());
        assert_eq!(state.power_submode, PowerSubMode::Live);
    }

    #[test]
    fn click_on_sensors_returns_to_overview() {
        let mut state = AppState::new();
        state.mode = DisplayMode::SensorsSummary;
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::Overview);
    }

    #[test]
    fn menu_selection_wraps_both_ways() {
        let mut state = AppState::new();
        state.mode = DisplayMode::LightsMenu;
        apply_input(&mut state, rotate(-1));
        assert_eq!(state.menu_selection, MENU_ITEM_COUNT - 1);
        apply_input(&mut state, rotate(1));
        assert_eq!(state.menu_selection, 0);
    }

    #[test]
    fn light_toggle_from_menu_publishes_and_marks_override() {
        let mut state = AppState::new();
        // overview click opens the menu at the toggle row
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::LightsMenu);
        assert_eq!(state.menu_selection, 0);

        let command = apply_input(&mut state, click());
        assert_eq!(command, Some(UiCommand::LightOn));
        assert!(state.light.manual_override);
        // the machine stays in the menu, the hub's echo drives is_on
        assert_eq!(state.mode, DisplayMode::LightsMenu);
        assert!(!state.light.is_on);
    }

    #[test]
    fn light_off_does_not_touch_override() {
        let mut state = AppState::new();
        state.mode = DisplayMode::LightsMenu;
        state.light.is_on = true;
        let command = apply_input(&mut state, click());
        assert_eq!(command, Some(UiCommand::LightOff));
        assert!(!state.light.manual_override);
    }

    #[test]
    fn menu_back_returns_to_overview() {
        let mut state = AppState::new();
        state.mode = DisplayMode::LightsMenu;
        state.menu_selection = 3;
        assert_eq!(apply_input(&mut state, click()), None);
        assert_eq!(state.mode, DisplayMode::Overview);
    }

    #[test]
    fn edit_entry_copies_current_duration() {
        let mut state = AppState::new();
        state.light.motion_timer_ms = 120_000;
        state.mode = DisplayMode::LightsMenu;
        state.menu_selection = 1;
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::EditMotionTimer);
        assert_eq!(state.edit.motion_ms, 120_000);
    }

    #[test]
    fn decrement_saturates_at_minimum() {
        let mut state = AppState::new();
        state.mode = DisplayMode::EditMotionTimer;
        state.edit.motion_ms = 40_000;
        for _ in 0..10 {
            apply_input(&mut state, rotate(-1));
        }
        assert_eq!(state.edit.motion_ms, TIMER_MIN_MS);
    }

    #[test]
    fn increment_saturates_at_maximum() {
        let mut state = AppState::new();
        state.mode = DisplayMode::EditManualTimer;
        state.edit.manual_ms = TIMER_MAX_MS - TIMER_STEP_MS;
        for _ in 0..10 {
            apply_input(&mut state, rotate(1));
        }
        assert_eq!(state.edit.manual_ms, TIMER_MAX_MS);
    }

    #[test]
    fn confirm_publishes_once_in_whole_seconds() {
        let mut state = AppState::new();
        state.light.motion_timer_ms = 60_000;
        state.mode = DisplayMode::LightsMenu;
        state.menu_selection = 1;
        apply_input(&mut state, click());
        apply_input(&mut state, rotate(1));

        let command = apply_input(&mut state, click());
        assert_eq!(command, Some(UiCommand::SetMotionTimerSecs(90)));
        assert_eq!(state.mode, DisplayMode::LightsMenu);
        // committed value still only lives in the mirror, not locally forced
        assert_eq!(state.light.motion_timer_ms, 60_000);
    }

    #[test]
    fn abandoning_edit_keeps_committed_duration() {
        let mut state = AppState::new();
        state.light.manual_timer_ms = 300_000;
        state.mode = DisplayMode::LightsMenu;
        state.menu_selection = 2;
        apply_input(&mut state, click());
        apply_input(&mut state, rotate(1));
        assert_eq!(state.edit.manual_ms, 330_000);

        // inactivity fires instead of a confirm click
        state.reset_view();
        assert_eq!(state.mode, DisplayMode::Overview);
        assert_eq!(state.light.manual_timer_ms, 300_000);
    }

    #[test]
    fn every_state_reaches_overview() {
        // via explicit paths or the inactivity reset
        let all = [
            DisplayMode::Overview,
            DisplayMode::ChannelDetail(PowerChannel::Panel),
            DisplayMode::ChannelDetail(PowerChannel::Battery),
            DisplayMode::ChannelDetail(PowerChannel::Load),
            DisplayMode::SensorsSummary,
            DisplayMode::LightsMenu,
            DisplayMode::EditMotionTimer,
            DisplayMode::EditManualTimer,
        ];
        for mode in all {
            let mut state = AppState::new();
            state.mode = mode;
            state.reset_view();
            assert_eq!(state.mode, DisplayMode::Overview);
        }
    }

    #[test]
    fn every_state_reachable_from_overview() {
        let mut state = AppState::new();

        // ring states by rotation
        for expected in [
            DisplayMode::ChannelDetail(PowerChannel::Panel),
            DisplayMode::ChannelDetail(PowerChannel::Battery),
            DisplayMode::ChannelDetail(PowerChannel::Load),
            DisplayMode::SensorsSummary,
        ] {
            apply_input(&mut state, rotate(1));
            assert_eq!(state.mode, expected);
        }

        // menu and both edit screens by clicks
        let mut state = AppState::new();
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::LightsMenu);
        apply_input(&mut state, rotate(1));
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::EditMotionTimer);
        apply_input(&mut state, click()); // confirm back to the menu
        apply_input(&mut state, rotate(1));
        apply_input(&mut state, click());
        assert_eq!(state.mode, DisplayMode::EditManualTimer);
    }

    #[test]
    fn rotation_then_click_in_one_tick_acts_on_new_screen() {
        let mut state = AppState::new();
        state.mode = DisplayMode::ChannelDetail(PowerChannel::Load);
        // lands on the sensors summary, whose click action is "back"
        apply_input(
            &mut state,
            InputEvent {
                rotation_delta: 1,
                clicked: true,
            },
        );
        assert_eq!(state.mode, DisplayMode::Overview);
    }
}
