use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the clock was created or last reset. Drives animated
    /// uniforms.
    pub elapsed: f64,
}

/// Frame clock producing `FrameTime` snapshots.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Moves the baseline to now.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }

    /// Samples the clock for the current frame.
    pub fn tick(&mut self) -> FrameTime {
        FrameTime {
            elapsed: Instant::now()
                .saturating_duration_since(self.start)
                .as_secs_f64(),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
