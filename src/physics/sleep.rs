//! Per-body sleep tracking.
//!
//! Stored in an array parallel to the body arena, keyed by the same index,
//! so removing a body drops its sleep state with it.

#[derive(Clone, Copy, Debug)]
pub struct SleepConfig {
    /// Bodies slower than this (units per second) accumulate sleep frames.
    pub speed_threshold: f32,
    /// Consecutive slow frames before a body falls asleep.
    pub frame_threshold: u32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            speed_threshold: 0.05,
            frame_threshold: 30,
        }
    }
}

impl SleepConfig {
    pub fn clamped(speed_threshold: f32, frame_threshold: u32) -> Self {
        Self {
            speed_threshold: if speed_threshold.is_finite() && speed_threshold >= 0.0 {
                speed_threshold
            } else {
                Self::default().speed_threshold
            },
            frame_threshold: frame_threshold.max(1),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct SleepState {
    pub frames_below: u32,
    pub sleeping: bool,
}

impl SleepState {
    /// Count one slow frame. Returns true exactly once, on the frame the
    /// body crosses into sleep.
    pub fn note_slow_frame(&mut self, config: &SleepConfig) -> bool {
        if self.sleeping {
            return false;
        }
        self.frames_below += 1;
        if self.frames_below >= config.frame_threshold {
            self.sleeping = true;
            return true;
        }
        false
    }

    /// Reset on any fast frame or forced wake. Returns true if the body was
    /// sleeping.
    pub fn wake(&mut self) -> bool {
        let was_sleeping = self.sleeping;
        self.sleeping = false;
        self.frames_below = 0;
        was_sleeping
    }
}
