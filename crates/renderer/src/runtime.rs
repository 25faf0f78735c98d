use std::thread;
use std::time::{Duration, Instant};

/// Lifecycle of the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Drawing and presenting frames at the paced rate.
    Running,
    /// The window asked to close, or bootstrap failed; no more frames.
    Shutdown,
}

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("target frame rate must be a finite number greater than zero, got {0}")]
pub struct InvalidFrameRate(pub f32);

/// Fixed-interval pacing for the render loop.
///
/// Each iteration records its start time; after presenting, the loop sleeps
/// for whatever remains of the frame budget. Overruns sleep for zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    interval: Duration,
}

impl FramePacer {
    pub fn from_fps(fps: f32) -> Result<Self, InvalidFrameRate> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(InvalidFrameRate(fps));
        }
        let interval =
            Duration::try_from_secs_f64(1.0 / f64::from(fps)).map_err(|_| InvalidFrameRate(fps))?;
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left in the budget of a frame that started at `started`.
    pub fn remaining(&self, started: Instant, now: Instant) -> Duration {
        self.interval
            .saturating_sub(now.saturating_duration_since(started))
    }

    /// Sleeps out the rest of the frame and returns how long it slept.
    pub fn wait(&self, started: Instant) -> Duration {
        let remaining = self.remaining(started, Instant::now());
        if remaining.is_zero() {
            tracing::trace!(budget_ms = self.interval.as_millis(), "frame overran its budget");
        } else {
            thread::sleep(remaining);
        }
        remaining
    }
}
