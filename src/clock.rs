//! Sources of the current time.
//!
//! The driver needs "now" to place an alarm in the right month and to set the
//! chip from the host clock. Clocks report naive UTC; the driver converts to
//! the register domain itself.

use chrono::NaiveDateTime;

/// Provides the current time as naive UTC.
pub trait Clock {
    fn now_utc(&self) -> NaiveDateTime;
}

/// A clock stopped at a given UTC instant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> NaiveDateTime {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> NaiveDateTime,
{
    fn now_utc(&self) -> NaiveDateTime {
        self()
    }
}

/// The host system clock.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now_utc(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}
