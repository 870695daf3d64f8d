use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Trait for reading the current time so cache expiry is testable
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> SystemTime;
}

/// Real clock backed by the system time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Mock clock for testing (starts at the creation instant, advances manually)
#[allow(dead_code)]
pub struct MockClock {
    now: Mutex<SystemTime>,
}

#[allow(dead_code)]
impl MockClock {
    /// Create a mock clock pinned to the current time
    pub fn new() -> Self {
        Self {
            now: Mutex::new(SystemTime::now()),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}
