//! Date/time register model for the PCF85063A RTC.
//!
//! The PCF85063A stores the clock in seven consecutive registers starting at
//! 0x04: seconds, minutes, hours, day of month, day of week, month and a
//! two-digit year. Reads decode a raw snapshot of those registers into
//! chrono's `NaiveDateTime`. Writes go through [`DateTimeFields`], one
//! register at a time, validating each field just before it is written.
//!
//! # Error Handling
//!
//! Out-of-range field values are reported via [`ValidationError`], which names
//! the offending [`Field`] and its valid range.

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{bcd, Days, Hours, Minutes, Months, RegAddr, Seconds, Weekdays, Years};

/// One writable date/time field, listed in write order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Seconds (0-59)
    Seconds,
    /// Minutes (0-59)
    Minutes,
    /// Hours (0-23)
    Hours,
    /// Two-digit year (0-99)
    Year,
    /// Month (1-12)
    Month,
    /// Day of month (1-31)
    DayOfMonth,
    /// Day of week (1-7, Monday = 1)
    DayOfWeek,
}

impl Field {
    /// Name of the field as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Seconds => "seconds",
            Field::Minutes => "minutes",
            Field::Hours => "hours",
            Field::Year => "year",
            Field::Month => "month",
            Field::DayOfMonth => "day_of_month",
            Field::DayOfWeek => "day_of_week",
        }
    }

    /// Inclusive `(min, max)` range accepted by the register.
    pub const fn range(self) -> (u32, u32) {
        match self {
            Field::Seconds | Field::Minutes => (0, 59),
            Field::Hours => (0, 23),
            Field::Year => (0, 99),
            Field::Month => (1, 12),
            Field::DayOfMonth => (1, 31),
            Field::DayOfWeek => (1, 7),
        }
    }

    /// Register holding the field.
    pub const fn register(self) -> RegAddr {
        match self {
            Field::Seconds => RegAddr::Seconds,
            Field::Minutes => RegAddr::Minutes,
            Field::Hours => RegAddr::Hours,
            Field::Year => RegAddr::Years,
            Field::Month => RegAddr::Months,
            Field::DayOfMonth => RegAddr::Days,
            Field::DayOfWeek => RegAddr::Weekdays,
        }
    }

    /// Range-checks `value` and encodes it as the register byte.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `value` is outside [`Field::range`].
    pub fn encode(self, value: u32) -> Result<u8, ValidationError> {
        let (min, max) = self.range();
        if value < min || value > max {
            error!(
                "PCF85063A: {} value {} out of range [{}, {}]",
                self.name(),
                value,
                min,
                max
            );
            return Err(ValidationError {
                field: self,
                value,
                min,
                max,
            });
        }
        let value = u8::try_from(value).map_err(|_| ValidationError {
            field: self,
            value,
            min,
            max,
        })?;
        Ok(bcd::encode(value))
    }
}

/// A field value outside the range its register can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValidationError {
    /// The rejected field
    pub field: Field,
    /// The rejected value
    pub value: u32,
    /// Smallest accepted value
    pub min: u32,
    /// Largest accepted value
    pub max: u32,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is out of range [{}, {}]",
            self.field.name(),
            self.min,
            self.max
        )
    }
}

/// Individually writable date/time fields.
///
/// Fields left as `None` are not written. The year is the two-digit register
/// value, not the calendar year.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DateTimeFields {
    pub seconds: Option<u32>,
    pub minutes: Option<u32>,
    pub hours: Option<u32>,
    pub day_of_week: Option<u32>,
    pub day_of_month: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<u32>,
}

impl DateTimeFields {
    /// Register writes in bus order: seconds, minutes, hours, year, month,
    /// day of month, day of week.
    ///
    /// Each item is validated lazily, so a consumer that stops at the first
    /// error has already written every field before it.
    pub(crate) fn register_writes(
        &self,
    ) -> impl Iterator<Item = Result<(RegAddr, u8), ValidationError>> {
        [
            (Field::Seconds, self.seconds),
            (Field::Minutes, self.minutes),
            (Field::Hours, self.hours),
            (Field::Year, self.year),
            (Field::Month, self.month),
            (Field::DayOfMonth, self.day_of_month),
            (Field::DayOfWeek, self.day_of_week),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value.map(|value| field.encode(value).map(|raw| (field.register(), raw)))
        })
    }
}

impl From<&NaiveDateTime> for DateTimeFields {
    fn from(datetime: &NaiveDateTime) -> Self {
        Self {
            seconds: Some(datetime.second()),
            minutes: Some(datetime.minute()),
            hours: Some(datetime.hour()),
            day_of_week: Some(datetime.weekday().number_from_monday()),
            day_of_month: Some(datetime.day()),
            month: Some(datetime.month()),
            year: Some(datetime.year().rem_euclid(100).unsigned_abs()),
        }
    }
}

/// Raw snapshot of the seven date/time registers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct PCF85063ADateTime {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    days: Days,
    weekdays: Weekdays,
    months: Months,
    years: Years,
}

impl PCF85063ADateTime {
    pub(crate) fn oscillator_stopped(&self) -> bool {
        self.seconds.oscillator_stop()
    }

    /// Decodes the snapshot, masking flag and reserved bits.
    ///
    /// Returns `None` if the registers do not hold a real calendar date/time.
    pub(crate) fn into_datetime(self) -> Option<NaiveDateTime> {
        let year = 2000 + i32::from(self.years.value());
        let month = u32::from(self.months.value());
        let day = u32::from(self.days.value());
        let hour = u32::from(self.hours.value());
        let minute = u32::from(self.minutes.value());
        let second = u32::from(self.seconds.value());
        debug!(
            "PCF85063A: raw datetime {}-{}-{} {}:{}:{} weekday={}",
            year,
            month,
            day,
            hour,
            minute,
            second,
            self.weekdays.value()
        );

        let datetime = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, second))?;
        if datetime.weekday().number_from_monday() != u32::from(self.weekdays.value()) {
            debug!(
                "PCF85063A: weekday register {} disagrees with date",
                self.weekdays.value()
            );
        }
        Some(datetime)
    }
}

impl From<[u8; 7]> for PCF85063ADateTime {
    fn from(data: [u8; 7]) -> Self {
        PCF85063ADateTime {
            seconds: Seconds::from(data[0]),
            minutes: Minutes::from(data[1]),
            hours: Hours::from(data[2]),
            days: Days::from(data[3]),
            weekdays: Weekdays::from(data[4]),
            months: Months::from(data[5]),
            years: Years::from(data[6]),
        }
    }
}
