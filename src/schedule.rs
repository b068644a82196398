//! Frame-rate cap.
//!
//! The loop measures how long a frame took and sleeps the rest of the
//! budget.  `frame_delay` is the pure part so it can be checked without a
//! clock.

use std::time::{Duration, Instant};

/// Time budget for one frame at `fps`.
pub fn frame_budget(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

/// How long to wait after a frame that took `elapsed` out of `budget`.
/// Overrunning frames get no delay and no catch-up.
pub fn frame_delay(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}

/// Something that paces frames.  Headless runs use `Unthrottled`.
pub trait Pacer {
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
}

pub struct FrameClock {
    budget: Duration,
    frame_start: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            budget: frame_budget(fps),
            frame_start: Instant::now(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }
}

impl Pacer for FrameClock {
    fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    fn end_frame(&mut self) {
        let delay = frame_delay(self.budget, self.frame_start.elapsed());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Runs frames back to back, counting them.
#[derive(Default)]
pub struct Unthrottled {
    pub frames: u64,
}

impl Pacer for Unthrottled {
    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}
