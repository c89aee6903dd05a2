//! Wall-clock frame timing.
//!
//! The sky is a pure function of its clock, so there is no fixed simulation
//! step: each redraw advances the scene by the measured frame time, clamped so
//! a stall (window drag, debugger pause) does not skip whole shooting-star
//! cycles.

use std::time::Instant;
use tracing::warn;

/// Longest frame time handed to the scene, in seconds.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Length of the frames-per-second averaging window, in seconds.
pub const FPS_WINDOW: f64 = 1.0;

pub struct FrameClock {
    previous_time: Instant,
    frame_count: u64,
    window_time: f64,
    window_frames: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            frame_count: 0,
            window_time: 0.0,
            window_frames: 0,
        }
    }

    /// Forget time spent before now, e.g. while the window was being created.
    pub fn restart(&mut self) {
        self.previous_time = Instant::now();
    }

    /// Measure the time since the previous call and return it as the next `dt`.
    pub fn tick(&mut self) -> f32 {
        let current_time = Instant::now();
        let frame_time = current_time
            .duration_since(self.previous_time)
            .as_secs_f64();
        self.previous_time = current_time;
        self.advance(frame_time)
    }

    fn advance(&mut self, mut frame_time: f64) -> f32 {
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.frame_count += 1;
        self.window_time += frame_time;
        self.window_frames += 1;
        frame_time as f32
    }

    /// Average frames per second over the last full window, once per window.
    pub fn take_fps(&mut self) -> Option<f64> {
        if self.window_time < FPS_WINDOW {
            return None;
        }
        let fps = f64::from(self.window_frames) / self.window_time;
        self.window_time = 0.0;
        self.window_frames = 0;
        Some(fps)
    }

    /// Total number of frames measured.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
