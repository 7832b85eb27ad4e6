//! Time management utilities

use std::time::{Duration, Instant};

/// Frame counter with accumulated simulation time
///
/// Unlike a wall-clock timer it is fed the delta the scheduler actually used,
/// so statistics agree with what systems observed.
#[derive(Debug, Default, Clone)]
pub struct Timer {
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame that advanced by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }

    /// Get the time of the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total accumulated time
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Get the elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_timer_tick() {
        let mut timer = Timer::new();
        timer.tick(0.5);
        timer.tick(0.5);

        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.total_time(), 1.0);
        assert_relative_eq!(timer.average_fps(), 2.0);
    }

    #[test]
    fn test_stopwatch_accumulates_only_while_running() {
        let mut stopwatch = Stopwatch::start_new();
        stopwatch.stop();
        let first = stopwatch.elapsed();
        assert_eq!(stopwatch.elapsed(), first);
    }
}
