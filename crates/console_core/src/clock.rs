//! Frame timing and the fixed-rate sampler tick.

use std::time::{Duration, Instant};

/// Per-frame timing for the render loop.
#[derive(Debug)]
pub struct FrameClock {
    start_time: Instant,
    last_frame: Instant,
    delta: Duration,
    elapsed: Duration,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame. Returns the frame delta.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.frame_count += 1;
        self.delta
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Wall-clock seconds since the console started. Drives the orbit
    /// camera so its rate is independent of frame rate.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

/// Fixed-cadence tick accumulator for the input sampler (16 ms, ~60 Hz).
///
/// Holding a key must produce evenly spaced control commands rather than
/// bursty event-driven ones, so the sampler runs off this accumulator
/// instead of key-event delivery. Catch-up after a stall is bounded so a
/// long hitch cannot flood the uplink with stale ticks.
#[derive(Debug)]
pub struct FixedTick {
    period: Duration,
    accumulator: Duration,
    max_catch_up: u32,
}

/// Sampler period: 16 ms.
pub const SAMPLER_PERIOD: Duration = Duration::from_millis(16);

impl Default for FixedTick {
    fn default() -> Self {
        Self::new(SAMPLER_PERIOD)
    }
}

impl FixedTick {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
            max_catch_up: 4,
        }
    }

    /// Feed elapsed frame time and return how many ticks are due, capped
    /// at the catch-up bound. Remainder time carries over.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.period && ticks < self.max_catch_up {
            self.accumulator -= self.period;
            ticks += 1;
        }
        if ticks == self.max_catch_up {
            // Drop the backlog after a stall instead of replaying it.
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    pub fn period_seconds(&self) -> f32 {
        self.period.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forty_seven_ms_yields_two_ticks_with_remainder() {
        let mut tick = FixedTick::default();
        assert_eq!(tick.advance(Duration::from_millis(47)), 2);
        // 15 ms carried over; 1 more ms completes the next tick.
        assert_eq!(tick.advance(Duration::from_millis(0)), 0);
        assert_eq!(tick.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn sub_period_accumulates() {
        let mut tick = FixedTick::default();
        assert_eq!(tick.advance(Duration::from_millis(8)), 0);
        assert_eq!(tick.advance(Duration::from_millis(8)), 1);
    }

    #[test]
    fn stall_catch_up_is_bounded() {
        let mut tick = FixedTick::default();
        assert_eq!(tick.advance(Duration::from_secs(2)), 4);
        // Backlog dropped; next small delta yields nothing.
        assert_eq!(tick.advance(Duration::from_millis(1)), 0);
    }
}
