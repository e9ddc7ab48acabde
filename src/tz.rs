//! UTC/local conversion and the time storage configuration.
//!
//! The RTC registers hold naive wall-clock values. With [`TimeStorage::Utc`]
//! they hold UTC and every read/write converts at the driver boundary, so the
//! chip keeps correct time across daylight-saving changes. With
//! [`TimeStorage::Local`] they hold local time directly.
//!
//! Conversions work with any `chrono::TimeZone`, so offsets follow the zone's
//! rules for the given date rather than a fixed offset.
//!
//! # DST edge cases
//!
//! Local times inside a DST overlap are ambiguous and map to the earlier
//! instant. Local times inside a DST gap do not exist and are interpreted
//! with the offset in effect before the gap. In both cases
//! `to_local(to_utc(t))` is not `t`.

use chrono::{Duration, LocalResult, NaiveDateTime, TimeZone};

use crate::Clock;

/// Time domain of the values held in the clock registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeStorage {
    /// Registers hold UTC, converted to and from local time by the driver.
    Utc,
    /// Registers hold local time.
    Local,
}

/// Driver configuration, fixed at construction.
#[derive(Clone, Debug)]
pub struct Config<Tz: TimeZone> {
    /// Time domain of the registers
    pub time_storage: TimeStorage,
    /// Host timezone rules used for UTC/local conversion
    pub zone: Tz,
}

impl<Tz: TimeZone> Config<Tz> {
    /// Registers hold UTC, the host observes time in `zone`.
    pub fn utc_storage(zone: Tz) -> Self {
        Self {
            time_storage: TimeStorage::Utc,
            zone,
        }
    }

    /// Registers hold local time in `zone`.
    pub fn local_storage(zone: Tz) -> Self {
        Self {
            time_storage: TimeStorage::Local,
            zone,
        }
    }

    /// Converts a local value to the register domain.
    pub(crate) fn to_register(&self, local: &NaiveDateTime) -> Option<NaiveDateTime> {
        match self.time_storage {
            TimeStorage::Utc => to_utc(&self.zone, local),
            TimeStorage::Local => Some(*local),
        }
    }

    /// Converts a register-domain value to local time.
    pub(crate) fn from_register(&self, value: &NaiveDateTime) -> NaiveDateTime {
        match self.time_storage {
            TimeStorage::Utc => to_local(&self.zone, value),
            TimeStorage::Local => *value,
        }
    }

    /// Current time in the register domain.
    pub(crate) fn register_now<C: Clock>(&self, clock: &C) -> NaiveDateTime {
        let now = clock.now_utc();
        match self.time_storage {
            TimeStorage::Utc => now,
            TimeStorage::Local => to_local(&self.zone, &now),
        }
    }
}

#[cfg(feature = "std")]
impl Config<chrono::Local> {
    /// UTC storage with the host's local timezone rules.
    pub fn system() -> Self {
        Self::utc_storage(chrono::Local)
    }
}

/// Converts a naive local time in `zone` to naive UTC.
///
/// Returns `None` only if the local time cannot be resolved even with the
/// pre-gap offset.
pub fn to_utc<Tz: TimeZone>(zone: &Tz, local: &NaiveDateTime) -> Option<NaiveDateTime> {
    match zone.from_local_datetime(local) {
        LocalResult::Single(datetime) => Some(datetime.naive_utc()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.naive_utc()),
        LocalResult::None => {
            let hour = Duration::hours(1);
            let before = local.checked_sub_signed(hour)?;
            zone.from_local_datetime(&before)
                .earliest()
                .and_then(|datetime| datetime.naive_utc().checked_add_signed(hour))
        }
    }
}

/// Converts a naive UTC time to naive local time in `zone`.
pub fn to_local<Tz: TimeZone>(zone: &Tz, utc: &NaiveDateTime) -> NaiveDateTime {
    zone.from_utc_datetime(utc).naive_local()
}
