//! Frame timing
//!
//! The host delivers one callback per rendered frame. [`Clock`] turns host
//! timestamps into a [`FrameDelta`] carrying both the frame-scale factor used
//! for movement and the elapsed milliseconds used by countdowns.

use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_EPSILON_MS, FRAME_MS, MAX_FRAME_MS};

/// Time elapsed during one simulation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameDelta {
    /// Frame-scale factor (1.0 = one 60 Hz frame); scales per-frame speeds
    pub scale: f32,
    /// Elapsed milliseconds; drives lifetimes and cooldowns
    pub ms: f32,
}

impl FrameDelta {
    /// Exactly one nominal 60 Hz frame
    pub const NOMINAL: Self = Self {
        scale: 1.0,
        ms: FRAME_MS,
    };

    pub fn from_ms(ms: f32) -> Self {
        Self {
            scale: ms / FRAME_MS,
            ms,
        }
    }

    pub fn from_scale(scale: f32) -> Self {
        Self {
            scale,
            ms: scale * FRAME_MS,
        }
    }
}

impl Default for FrameDelta {
    fn default() -> Self {
        Self::NOMINAL
    }
}

/// Converts monotonically increasing host timestamps into frame deltas
#[derive(Debug, Clone, Default)]
pub struct Clock {
    last_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Advance to `now_ms`. The first call yields a nominal frame; gaps larger
    /// than [`MAX_FRAME_MS`] (tab switches, debugger pauses) are clamped.
    pub fn advance(&mut self, now_ms: f64) -> FrameDelta {
        let delta = match self.last_ms {
            Some(last) => ((now_ms - last).max(0.0) as f32).min(MAX_FRAME_MS),
            None => FRAME_MS,
        };
        self.last_ms = Some(now_ms);
        FrameDelta::from_ms(delta)
    }

    /// Forget the last timestamp (e.g. after a pause)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Millisecond countdown driven by frame deltas.
///
/// Elapsed time is summed in f64 and compared against the duration with
/// [`COUNTDOWN_EPSILON_MS`] of slack, so a duration that is a whole number of
/// frames ends on exactly that frame even when the frame time is fractional.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    duration_ms: f64,
    elapsed_ms: f64,
}

impl Countdown {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms: duration_ms as f64,
            elapsed_ms: 0.0,
        }
    }

    /// Start over with a new duration
    pub fn restart(&mut self, duration_ms: f32) {
        *self = Self::new(duration_ms);
    }

    /// Count down one frame. Returns true once the countdown has finished.
    pub fn advance(&mut self, dt: FrameDelta) -> bool {
        if !self.is_finished() {
            self.elapsed_ms += dt.ms as f64;
        }
        self.is_finished()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms + COUNTDOWN_EPSILON_MS >= self.duration_ms
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.is_finished()
    }

    pub fn remaining_ms(&self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        (self.duration_ms - self.elapsed_ms) as f32
    }
}
