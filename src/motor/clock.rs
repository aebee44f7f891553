//! Monotonic time source for step scheduling.

/// Something which reports monotonic time in nanoseconds.
///
/// The reference point is arbitrary (device start-up, a timer reset) but must not move
/// while a motor is using the clock. Resolution should be well below the shortest step
/// interval expected at top speed.
pub trait Clock {
    /// Nanoseconds elapsed since the clock's reference point.
    fn now_ns(&self) -> u64;
}

impl<F> Clock for F
where
    F: Fn() -> u64,
{
    fn now_ns(&self) -> u64 {
        self()
    }
}

/// A monotonically non-decreasing clock backed by the operating system.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Create a clock whose reference point is now.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}
