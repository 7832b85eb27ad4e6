//! Frame statistics

use crate::ecs::{System, SystemContext, SystemError};
use crate::foundation::time::Timer;

/// Counts frames and periodically logs the frame rate
pub struct StatsSystem {
    priority: i32,
    interval: f32,
    since_report: f32,
    timer: Timer,
}

impl StatsSystem {
    /// Report every `interval` seconds of frame time
    pub fn new(priority: i32, interval: f32) -> Self {
        Self {
            priority,
            interval,
            since_report: 0.0,
            timer: Timer::new(),
        }
    }

    /// Accumulated frame timing
    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

impl System for StatsSystem {
    fn name(&self) -> &str {
        "StatsSystem"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) -> Result<(), SystemError> {
        self.timer.tick(delta_time);
        self.since_report += delta_time;

        if self.interval > 0.0 && self.since_report >= self.interval {
            self.since_report = 0.0;
            log::info!(
                "Frame {}: {:.1} FPS average, {} entities",
                self.timer.frame_count(),
                self.timer.average_fps(),
                ctx.world.entities().len()
            );
        }
        Ok(())
    }

    fn on_stop(&mut self, _ctx: &mut SystemContext<'_>) {
        log::info!(
            "{} frames in {:.2}s ({:.1} FPS average)",
            self.timer.frame_count(),
            self.timer.total_time(),
            self.timer.average_fps()
        );
    }
}
