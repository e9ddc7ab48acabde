//! One-shot alarm support for the PCF85063A RTC.
//!
//! The chip matches its alarm against day of month, hour, minute and second
//! only. Recurring alarms (leaving some of those fields disabled) and the
//! weekday alarm are not supported: every write programs all four fields and
//! disables the weekday register.
//!
//! Because the registers hold no month or year, [`reconstruct_alarm`] recovers
//! the calendar date/time an alarm refers to from the current time and the
//! alarm flag:
//!
//! - an alarm that has not fired yet is the soonest future occurrence,
//! - an alarm that has fired is the most recent past occurrence.
//!
//! The second case is a best guess. An alarm that fired more than a month ago
//! is reported in the wrong month, and nothing in the hardware can tell.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{Control2, Field, RegAddr, ValidationError, WEEKDAY_ALARM_DISABLED};

/// Alarm time as stored by the hardware: no month, no year.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmTime {
    /// Day of month (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl AlarmTime {
    /// Creates an alarm time, validating every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first field out of range.
    pub fn new(day: u8, hour: u8, minute: u8, second: u8) -> Result<Self, ValidationError> {
        let time = Self {
            day,
            hour,
            minute,
            second,
        };
        time.register_values()?;
        Ok(time)
    }

    /// BCD register bytes for second, minute, hour and day, disable bits clear.
    fn register_values(&self) -> Result<[u8; 4], ValidationError> {
        Ok([
            Field::Seconds.encode(u32::from(self.second))?,
            Field::Minutes.encode(u32::from(self.minute))?,
            Field::Hours.encode(u32::from(self.hour))?,
            Field::DayOfMonth.encode(u32::from(self.day))?,
        ])
    }

    /// Register writes programming this alarm, in bus order. The weekday
    /// alarm register is always written disabled.
    pub(crate) fn register_writes(&self) -> Result<[(RegAddr, u8); 5], ValidationError> {
        let [second, minute, hour, day] = self.register_values()?;
        Ok([
            (RegAddr::SecondAlarm, second),
            (RegAddr::MinuteAlarm, minute),
            (RegAddr::HourAlarm, hour),
            (RegAddr::DayAlarm, day),
            (RegAddr::WeekdayAlarm, WEEKDAY_ALARM_DISABLED),
        ])
    }

    fn in_month(&self, year: i32, month: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(year, month, u32::from(self.day)).and_then(|date| {
            date.and_hms_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
            )
        })
    }
}

impl From<&NaiveDateTime> for AlarmTime {
    /// Keeps day of month, hour, minute and second; month and year are
    /// dropped since the hardware cannot store them.
    fn from(datetime: &NaiveDateTime) -> Self {
        // chrono guarantees day <= 31, hour <= 23, minute and second <= 59
        Self {
            day: datetime.day() as u8,
            hour: datetime.hour() as u8,
            minute: datetime.minute() as u8,
            second: datetime.second() as u8,
        }
    }
}

/// Alarm bits of the control 2 register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmState {
    /// Alarm interrupt enabled (AIE)
    pub enabled: bool,
    /// Alarm has matched since the flag was last cleared (AF)
    pub fired: bool,
}

impl From<Control2> for AlarmState {
    fn from(control: Control2) -> Self {
        Self {
            enabled: control.alarm_interrupt_enable(),
            fired: control.alarm_flag(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn toward_alarm(fired: bool) -> Self {
        if fired {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

fn shift_month(year: i32, month: u32, direction: Direction) -> (i32, u32) {
    match direction {
        Direction::Forward if month >= 12 => (year + 1, 1),
        Direction::Forward => (year, month + 1),
        Direction::Backward if month <= 1 => (year - 1, 12),
        Direction::Backward => (year, month - 1),
    }
}

/// Builds the alarm in `(year, month)`, or one month toward the alarm if the
/// day does not exist there (e.g. the 31st in April).
fn place(
    time: &AlarmTime,
    year: i32,
    month: u32,
    direction: Direction,
) -> Option<(i32, u32, NaiveDateTime)> {
    if let Some(candidate) = time.in_month(year, month) {
        return Some((year, month, candidate));
    }
    let (year, month) = shift_month(year, month, direction);
    time.in_month(year, month)
        .map(|candidate| (year, month, candidate))
}

/// Recovers the full date/time of an alarm from its register fields.
///
/// `now` must be in the same time domain as the alarm registers. Returns the
/// soonest occurrence at or after `now` when `fired` is false, and the latest
/// occurrence at or before `now` when it is true (best effort, see the module
/// docs).
///
/// Returns `None` only for field values that form no calendar date/time in
/// any month, which the hardware never accepts from [`AlarmTime::new`].
pub fn reconstruct_alarm(
    time: &AlarmTime,
    fired: bool,
    now: &NaiveDateTime,
) -> Option<NaiveDateTime> {
    let direction = Direction::toward_alarm(fired);

    // first try: the alarm is in the current month
    let (year, month, candidate) = place(time, now.year(), now.month(), direction)?;

    let misaligned = match direction {
        Direction::Forward => *now > candidate,
        Direction::Backward => *now < candidate,
    };
    if !misaligned {
        debug!(
            "PCF85063A: alarm placed in {}-{}, fired={}",
            year, month, fired
        );
        return Some(candidate);
    }

    // second try: one month toward the alarm
    let (year, month) = shift_month(year, month, direction);
    let (year, month, candidate) = place(time, year, month, direction)?;
    debug!(
        "PCF85063A: alarm moved to {}-{}, fired={}",
        year, month, fired
    );
    Some(candidate)
}
