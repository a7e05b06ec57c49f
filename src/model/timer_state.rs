use std::time::{Duration, SystemTime};

use serde_with::serde_as;
use serde_with::TimestampSecondsWithFrac;

use crate::helpers::format_time;

/// Stopwatch for one attempt. `start_time` is set exactly while `running`.
///
/// The host redraws on its own schedule and asks [`TimerState::current_elapsed`]
/// each time; nothing here sleeps or waits.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimerState {
    pub running: bool,
    #[serde_as(as = "Option<TimestampSecondsWithFrac<f64>>")]
    pub start_time: Option<SystemTime>,
    pub last_elapsed: f64,
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts when idle (returns `None`), stops when running and returns the
    /// measured seconds.
    pub fn toggle(&mut self, now: SystemTime) -> Option<f64> {
        if self.running {
            let elapsed = self.elapsed_until(now);
            self.last_elapsed = elapsed;
            self.running = false;
            self.start_time = None;
            Some(elapsed)
        } else {
            self.start_time = Some(now);
            self.running = true;
            self.last_elapsed = 0.0;
            None
        }
    }

    pub fn current_elapsed(&self, now: SystemTime) -> f64 {
        if self.running {
            self.elapsed_until(now)
        } else {
            self.last_elapsed
        }
    }

    pub fn display(&self, now: SystemTime) -> String {
        format_time(self.current_elapsed(now))
    }

    // A missing start while running, or a clock that went backwards, counts as zero.
    fn elapsed_until(&self, now: SystemTime) -> f64 {
        self.start_time
            .and_then(|start| now.duration_since(start).ok())
            .unwrap_or(Duration::default())
            .as_secs_f64()
    }
}
