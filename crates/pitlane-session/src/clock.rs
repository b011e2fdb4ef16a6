//! Frame pacing for the drive loop.
//!
//! The simulation advances exactly one tick per rendered frame; there is no
//! accumulator and no catch-up. The clock only counts frames and reports
//! frames that blew their budget.

use std::time::{Duration, Instant};
use tracing::warn;

pub struct FrameClock {
    target_fps: u32,
    budget: Duration,
    frame_count: u64,
    slow_frames: u64,
    last_frame_time: Duration,
}

impl FrameClock {
    /// Clock for `target_fps`, warning on frames longer than `budget`.
    pub fn new(target_fps: u32, budget: Duration) -> Self {
        Self {
            target_fps: target_fps.max(1),
            budget,
            frame_count: 0,
            slow_frames: 0,
            last_frame_time: Duration::ZERO,
        }
    }

    /// Run `frame_fn` as one frame and time it.
    pub fn frame<R>(&mut self, frame_fn: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = frame_fn();
        self.record(start.elapsed());
        result
    }

    /// Account for a frame that took `elapsed`.
    pub fn record(&mut self, elapsed: Duration) {
        self.frame_count += 1;
        self.last_frame_time = elapsed;
        if elapsed > self.budget {
            self.slow_frames += 1;
            warn!(
                "Frame {} took {:.2}ms, budget {:.2}ms",
                self.frame_count,
                elapsed.as_secs_f64() * 1000.0,
                self.budget.as_secs_f64() * 1000.0
            );
        }
    }

    /// Total number of frames run.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn slow_frames(&self) -> u64 {
        self.slow_frames
    }

    pub fn last_frame_time(&self) -> Duration {
        self.last_frame_time
    }

    /// Simulated seconds, assuming every frame ran at the target rate.
    pub fn sim_time(&self) -> f64 {
        self.frame_count as f64 / f64::from(self.target_fps)
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }
}
