//! Inactivity tracking
//!
//! Monitors user interaction and resets the view after timeout.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use crate::system::{activity, event};

/// View reset timeout
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30);

/// Inactivity monitoring task
#[embassy_executor::task]
pub async fn track_inactivity() {
    loop {
        match select(Timer::after(INACTIVITY_TIMEOUT), activity::wait()).await {
            Either::First(_) => {
                event::send(event::Events::InactivityTimeout).await;
            }
            Either::Second(_) => {
                continue;
            }
        }
    }
}
