use chrono::{DateTime, Local};

/// Source of "now" for stamping.
///
/// The binary uses [`SystemClock`]; tests pin the time with [`FixedClock`].
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the host wall clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
