pub mod convert;
pub mod minifb_display;
pub mod std_fs;
pub mod writer_bus;

use std::time::{Duration, Instant};

/// Wall clock measured from construction.
pub struct StdClock {
    origin: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        StdClock {
            origin: Instant::now(),
        }
    }
}

impl pixelpush_core::display::Clock for StdClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
