//! Rotary encoder edge watcher
//!
//! Runs on the interrupt executor: awaits quadrature and button edges,
//! feeds the decoders and stores the results into the shared input
//! atomics. The cooperative side never sees anything but those two
//! primitives.

use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Pull};
use embassy_time::Instant;

use crate::system::input::{self, ClickDebouncer, QuadratureDecoder};
use crate::system::resources::EncoderResources;

/// Edge watcher task, spawned on the interrupt executor
#[embassy_executor::task]
pub async fn encoder_watch(r: EncoderResources) {
    let mut clk = Input::new(r.clk_pin, Pull::Up);
    let dt = Input::new(r.dt_pin, Pull::Up);
    let mut sw = Input::new(r.sw_pin, Pull::Up);

    let mut decoder = QuadratureDecoder::new(clk.is_high());
    let mut debounce = ClickDebouncer::new();

    loop {
        match select(clk.wait_for_any_edge(), sw.wait_for_falling_edge()).await {
            Either::First(()) => {
                let delta = decoder.update(clk.is_high(), dt.is_high());
                if delta != 0 {
                    input::record_rotation(delta);
                }
            }
            Either::Second(()) => {
                if debounce.on_press_edge(Instant::now().as_millis()) {
                    input::record_click();
                }
            }
        }
    }
}
