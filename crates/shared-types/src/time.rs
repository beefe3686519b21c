//! Time source abstraction so domain logic never reads the system clock
//! directly.

/// Provider of the current time in epoch milliseconds.
pub trait TimeSource: Send + Sync {
    /// Current time, epoch milliseconds.
    fn now_millis(&self) -> u64;
}

/// Default time source using system time.
#[derive(Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_millis(&self) -> u64 {
        epoch_millis()
    }
}

/// Current system time as epoch milliseconds.
#[must_use]
pub fn epoch_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
