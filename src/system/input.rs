//! Rotary encoder and button primitives
//!
//! The only state shared between the interrupt context and the cooperative
//! world: a position counter and a pending-click flag, both atomics so the
//! consumer never observes a torn value and never loses an update.
//!
//! The edge-watcher task (interrupt executor) is the sole producer; the
//! input poll task consumes via [`read_position`] and [`take_click`].
//! Decoding itself is plain state kept in [`QuadratureDecoder`] and
//! [`ClickDebouncer`], which only the producer touches.

use core::sync::atomic::{AtomicBool, AtomicI32, Ordering};

/// Minimum spacing between accepted button edges (ms)
pub const DEBOUNCE_WINDOW_MS: u64 = 50;

static ENCODER_POSITION: AtomicI32 = AtomicI32::new(0);
static BUTTON_CLICKED: AtomicBool = AtomicBool::new(false);

/// Race-free snapshot of the encoder position counter
pub fn read_position() -> i32 {
    ENCODER_POSITION.load(Ordering::Acquire)
}

/// Test-and-clear of the pending click flag
///
/// At most one click is pending at a time; clicks landing inside the
/// debounce window were already dropped by the producer, never queued.
pub fn take_click() -> bool {
    BUTTON_CLICKED.swap(false, Ordering::AcqRel)
}

/// Producer side: apply a decoded detent to the position counter
pub fn record_rotation(delta: i32) {
    ENCODER_POSITION.fetch_add(delta, Ordering::AcqRel);
}

/// Producer side: latch an accepted button click
pub fn record_click() {
    BUTTON_CLICKED.store(true, Ordering::Release);
}

/// Single-edge quadrature decoder
///
/// Counts on the falling edge of CLK and resolves direction from the DT
/// level at that moment: DT high is clockwise, DT low counter-clockwise.
/// Less noise-immune than full 4x decoding but adequate at human turning
/// speeds; a bounce costs at most one ignored extra transition.
pub struct QuadratureDecoder {
    last_clk: bool,
}

impl QuadratureDecoder {
    /// Start decoding from the current CLK level
    pub fn new(clk: bool) -> Self {
        Self { last_clk: clk }
    }

    /// Feed the current pin levels, returns the detent delta (-1, 0 or +1)
    pub fn update(&mut self, clk: bool, dt: bool) -> i32 {
        if clk == self.last_clk {
            return 0;
        }
        self.last_clk = clk;
        if clk {
            // rising edge, direction is resolved on the fall
            return 0;
        }
        if dt {
            1
        } else {
            -1
        }
    }
}

/// Debounce window tracker for the encoder push button
///
/// An edge is accepted only if the window has fully elapsed since the last
/// accepted edge. Edges inside the window are coalesced into the click that
/// opened it.
pub struct ClickDebouncer {
    last_accepted_ms: Option<u64>,
}

impl ClickDebouncer {
    pub fn new() -> Self {
        Self {
            last_accepted_ms: None,
        }
    }

    /// Feed a falling (press) edge, returns whether it counts as a click
    pub fn on_press_edge(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_accepted_ms {
            if now_ms.wrapping_sub(last) < DEBOUNCE_WINDOW_MS {
                return false;
            }
        }
        self.last_accepted_ms = Some(now_ms);
        true
    }
}

impl Default for ClickDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Apply a full detent worth of CLK transitions in one direction
    fn turn(decoder: &mut QuadratureDecoder, clockwise: bool) -> i32 {
        // CLK falls (direction sampled), then rises back to idle
        let delta = decoder.update(false, clockwise);
        delta + decoder.update(true, clockwise)
    }

    #[test]
    fn net_position_matches_transition_count() {
        let mut decoder = QuadratureDecoder::new(true);
        let mut net = 0;
        for _ in 0..5 {
            net += turn(&mut decoder, true);
        }
        for _ in 0..2 {
            net += turn(&mut decoder, false);
        }
        assert_eq!(net, 3);
    }

    #[test]
    fn repeated_level_is_not_a_transition() {
        let mut decoder = QuadratureDecoder::new(true);
        assert_eq!(decoder.update(true, true), 0);
        assert_eq!(decoder.update(true, false), 0);
        // the actual fall still counts exactly once
        assert_eq!(decoder.update(false, true), 1);
        assert_eq!(decoder.update(false, true), 0);
    }

    #[test]
    fn rising_edge_does_not_count() {
        let mut decoder = QuadratureDecoder::new(false);
        assert_eq!(decoder.update(true, true), 0);
        assert_eq!(decoder.update(false, false), -1);
    }

    // Sole test touching the process-wide atomics: asserts deltas, not
    // absolute values, so it stays correct regardless of test ordering.
    #[test]
    fn shared_counters_read_and_clear() {
        let before = read_position();
        record_rotation(1);
        record_rotation(1);
        record_rotation(-1);
        assert_eq!(read_position() - before, 1);

        record_click();
        record_click(); // coalesced, not queued
        assert!(take_click());
        assert!(!take_click());
    }

    #[test]
    fn clicks_inside_window_are_dropped() {
        let mut debounce = ClickDebouncer::new();
        assert!(debounce.on_press_edge(1_000));
        assert!(!debounce.on_press_edge(1_000 + DEBOUNCE_WINDOW_MS - 1));
        assert!(debounce.on_press_edge(1_000 + DEBOUNCE_WINDOW_MS - 1 + DEBOUNCE_WINDOW_MS));
    }

    #[test]
    fn clicks_outside_window_both_count() {
        let mut debounce = ClickDebouncer::new();
        assert!(debounce.on_press_edge(0));
        assert!(debounce.on_press_edge(DEBOUNCE_WINDOW_MS));
    }
}
