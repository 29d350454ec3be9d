// ABOUTME: Wall-clock timing for engine passes
// ABOUTME: A drop guard that reports how long a pass took and flags slow ones

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Logs the duration of a pass when dropped: a debug record normally, a
/// warning once it runs past `slow_after`.
pub struct PassTimer {
    pass: &'static str,
    started: Instant,
    slow_after: Duration,
}

impl PassTimer {
    pub fn start(pass: &'static str, slow_after: Duration) -> Self {
        Self {
            pass,
            started: Instant::now(),
            slow_after,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for PassTimer {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if elapsed > self.slow_after {
            warn!(
                pass = self.pass,
                elapsed_ms,
                slow_after_ms = self.slow_after.as_millis() as u64,
                "Slow pass"
            );
        } else {
            debug!(pass = self.pass, elapsed_ms, "Pass finished");
        }
    }
}
