//! Orchestrator Module
//!
//! The orchestrator task is the sole consumer of the system event channel
//! and the sole mutator of UI state: input transitions, inbound state
//! updates, link status and the inactivity reset all land here.

use defmt::{info, warn};
use embassy_time::Instant;

use crate::system::command;
use crate::system::event::{self, Events};
use crate::system::state::SYSTEM_STATE;
use crate::system::ui::{self, UiCommand};

/// Main coordination task
#[embassy_executor::task]
pub async fn orchestrate() {
    info!("orchestrator started");
    loop {
        let event = event::wait().await;
        if let Some(command) = process_event(event).await {
            handle_command(command);
        }
    }
}

/// Processes one event against the shared state
///
/// Returns the outbound command if the transition produced one.
async fn process_event(event: Events) -> Option<UiCommand> {
    match event {
        Events::Input(input) => {
            let mut state = SYSTEM_STATE.lock().await;
            ui::apply_input(&mut state, input)
        }
        Events::StateUpdate(update) => {
            let mut state = SYSTEM_STATE.lock().await;
            state.apply_update(update, Instant::now());
            None
        }
        Events::LinkStatus(online) => {
            SYSTEM_STATE.lock().await.link_online = online;
            None
        }
        Events::InactivityTimeout => {
            let mut state = SYSTEM_STATE.lock().await;
            state.reset_view();
            None
        }
    }
}

/// Validates and queues a click-edge publish
fn handle_command(command: UiCommand) {
    match command::compose(command) {
        Ok(message) => {
            info!("publishing {}", message.topic);
            if !command::publish(message) {
                warn!("outbound queue full, command dropped");
            }
        }
        Err(_) => warn!("command value out of range, not published"),
    }
}
