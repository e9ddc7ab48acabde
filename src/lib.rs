//! A platform-agnostic driver for the PCF85063A real-time clock.
//!
//! The driver reads and writes the calendar clock, programs a single one-shot
//! alarm (day of month, hour, minute, second) and converts between UTC and
//! local time so the chip can keep UTC while the host works in local time.
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::FixedOffset;
//! use pcf85063a::{Config, FixedClock, PCF85063A, DEFAULT_ADDRESS};
//!
//! let zone = FixedOffset::east_opt(3600).unwrap();
//! let mut rtc = PCF85063A::new(i2c, DEFAULT_ADDRESS, Config::utc_storage(zone), FixedClock(now));
//!
//! let datetime = rtc.datetime()?;
//! rtc.set_alarm(&(datetime + chrono::Duration::hours(1)))?;
//! rtc.clear_alarm_fired()?;
//! rtc.set_alarm_enabled(true)?;
//! ```
//!
//! # Features
//!
//! - `async`: async driver in [`asynch`] over `embedded-hal-async`
//! - `log` / `defmt`: debug logging through the chosen backend
//! - `std`: [`SystemClock`] and `Config::system()` using the host timezone
#![cfg_attr(not(feature = "std"), no_std)]

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);
    }};
}

macro_rules! error {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);
    }};
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "log", feature = "defmt"))] {
        compile_error!("features `log` and `defmt` are mutually exclusive");
    }
}

mod alarm;
pub mod bcd;
mod clock;
mod datetime;
mod dump;
mod registers;
pub mod tz;

#[cfg(feature = "async")]
pub mod asynch;

use chrono::{NaiveDateTime, TimeZone};
use embedded_hal::i2c::I2c;
use paste::paste;

pub use crate::alarm::{reconstruct_alarm, AlarmState, AlarmTime};
pub use crate::clock::{Clock, FixedClock};
pub use crate::datetime::{DateTimeFields, Field, ValidationError};
pub use crate::dump::{RegisterDump, RegisterGroup};
pub use crate::registers::*;
pub use crate::tz::{Config, TimeStorage};

cfg_if::cfg_if! {
    if #[cfg(feature = "std")] {
        pub use crate::clock::SystemClock;
    }
}

use crate::datetime::PCF85063ADateTime;

/// Default I2C address of the PCF85063A.
pub const DEFAULT_ADDRESS: u8 = 0x51;

/// Errors returned by the driver.
#[derive(Debug)]
pub enum PCF85063AError<I2CE> {
    /// Bus transfer failed (device absent, NACK, arbitration loss)
    I2c(I2CE),
    /// A field value is outside its register's range
    Validation(ValidationError),
    /// Registers hold no valid calendar date/time, or a local time could
    /// not be mapped to UTC
    InvalidDateTime,
}

impl<I2CE> From<I2CE> for PCF85063AError<I2CE> {
    fn from(e: I2CE) -> Self {
        PCF85063AError::I2c(e)
    }
}

/// PCF85063A Real-Time Clock driver.
///
/// Every operation is a sequence of blocking register transfers with no
/// atomicity across registers. Callers sharing the chip must serialize access
/// to the whole driver.
pub struct PCF85063A<I2C: I2c, Tz: TimeZone, C: Clock> {
    i2c: I2C,
    address: u8,
    config: Config<Tz>,
    clock: C,
}

impl<I2C: I2c, Tz: TimeZone, C: Clock> PCF85063A<I2C, Tz, C> {
    /// Creates a new driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I2C bus implementation
    /// * `address` - The I2C address of the device (typically [`DEFAULT_ADDRESS`])
    /// * `config` - Time storage mode and timezone rules
    /// * `clock` - Source of the current time
    pub fn new(i2c: I2C, address: u8, config: Config<Tz>, clock: C) -> Self {
        Self {
            i2c,
            address,
            config,
            clock,
        }
    }

    /// Releases the I2C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn config(&self) -> &Config<Tz> {
        &self.config
    }

    fn read_register(&mut self, reg: u8) -> Result<u8, PCF85063AError<I2C::Error>> {
        let mut data = [0];
        self.i2c.write_read(self.address, &[reg], &mut data)?;
        debug!("PCF85063A: read reg {} = {}", reg, data[0]);
        Ok(data[0])
    }

    fn write_register(&mut self, reg: u8, value: u8) -> Result<(), PCF85063AError<I2C::Error>> {
        debug!("PCF85063A: write reg {} = {}", reg, value);
        self.i2c.write(self.address, &[reg, value])?;
        Ok(())
    }

    fn read_raw_datetime(&mut self) -> Result<PCF85063ADateTime, PCF85063AError<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        Ok(data.into())
    }

    /// Gets the current date and time, in local time.
    ///
    /// # Errors
    /// * `InvalidDateTime` if the registers do not hold a valid date/time
    pub fn datetime(&mut self) -> Result<NaiveDateTime, PCF85063AError<I2C::Error>> {
        let raw = self.read_raw_datetime()?;
        let datetime = raw
            .into_datetime()
            .ok_or(PCF85063AError::InvalidDateTime)?;
        Ok(self.config.from_register(&datetime))
    }

    /// Returns true if the oscillator has stopped since the seconds register
    /// was last written, i.e. the clock may be wrong.
    pub fn oscillator_stopped(&mut self) -> Result<bool, PCF85063AError<I2C::Error>> {
        Ok(self.read_raw_datetime()?.oscillator_stopped())
    }

    /// Sets the date and time from a local value.
    ///
    /// The seven registers are written one at a time; see [`Self::set_fields`].
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        let datetime = self
            .config
            .to_register(datetime)
            .ok_or(PCF85063AError::InvalidDateTime)?;
        self.set_fields(&DateTimeFields::from(&datetime))
    }

    /// Sets the date and time from the clock source.
    pub fn set_datetime_now(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let now = self.config.register_now(&self.clock);
        self.set_fields(&DateTimeFields::from(&now))
    }

    /// Writes individual date/time fields as given, without time conversion.
    ///
    /// Fields are validated and written in the order seconds, minutes, hours,
    /// year, month, day of month, day of week. The first invalid field aborts
    /// the operation; fields before it have already been written and are not
    /// rolled back.
    ///
    /// # Errors
    /// * `Validation` naming the first out-of-range field
    pub fn set_fields(&mut self, fields: &DateTimeFields) -> Result<(), PCF85063AError<I2C::Error>> {
        for write in fields.register_writes() {
            let (reg, value) = write.map_err(PCF85063AError::Validation)?;
            self.write_register(reg.into(), value)?;
        }
        Ok(())
    }

    /// Programs the alarm from a local date/time.
    ///
    /// Only day of month, hour, minute and second reach the chip. The weekday
    /// alarm is disabled.
    pub fn set_alarm(&mut self, datetime: &NaiveDateTime) -> Result<(), PCF85063AError<I2C::Error>> {
        let datetime = self
            .config
            .to_register(datetime)
            .ok_or(PCF85063AError::InvalidDateTime)?;
        self.set_alarm_time(&AlarmTime::from(&datetime))
    }

    /// Programs the alarm to the current time of the clock source.
    pub fn set_alarm_now(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let now = self.config.register_now(&self.clock);
        self.set_alarm_time(&AlarmTime::from(&now))
    }

    /// Programs the alarm registers with a register-domain alarm time.
    pub fn set_alarm_time(&mut self, time: &AlarmTime) -> Result<(), PCF85063AError<I2C::Error>> {
        let writes = time
            .register_writes()
            .map_err(PCF85063AError::Validation)?;
        for (reg, value) in writes {
            self.write_register(reg.into(), value)?;
        }
        Ok(())
    }

    /// Reads the alarm registers without reconstructing a date.
    ///
    /// Returns `None` as soon as a register has its disable bit set.
    pub fn alarm_time_fields(&mut self) -> Result<Option<AlarmTime>, PCF85063AError<I2C::Error>> {
        let second = self.second_alarm()?;
        if second.alarm_disabled() {
            return Ok(None);
        }
        let minute = self.minute_alarm()?;
        if minute.alarm_disabled() {
            return Ok(None);
        }
        let hour = self.hour_alarm()?;
        if hour.alarm_disabled() {
            return Ok(None);
        }
        let day = self.day_alarm()?;
        if day.alarm_disabled() {
            return Ok(None);
        }
        Ok(Some(AlarmTime {
            day: day.value(),
            hour: hour.value(),
            minute: minute.value(),
            second: second.value(),
        }))
    }

    /// Gets the full local date/time the alarm refers to.
    ///
    /// The hardware keeps no month or year, so the date is reconstructed:
    /// the next occurrence if the alarm has not fired, the last one if it
    /// has. Returns `None` if no alarm is set.
    pub fn alarm_time(&mut self) -> Result<Option<NaiveDateTime>, PCF85063AError<I2C::Error>> {
        let Some(time) = self.alarm_time_fields()? else {
            return Ok(None);
        };
        let state = self.alarm_state()?;
        let now = self.config.register_now(&self.clock);
        let alarm =
            reconstruct_alarm(&time, state.fired, &now).ok_or(PCF85063AError::InvalidDateTime)?;
        Ok(Some(self.config.from_register(&alarm)))
    }

    /// Reads the alarm enable and fired bits.
    pub fn alarm_state(&mut self) -> Result<AlarmState, PCF85063AError<I2C::Error>> {
        Ok(self.control2()?.into())
    }

    /// Clears the alarm fired flag, leaving every other control bit as is.
    pub fn clear_alarm_fired(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let mut control = self.control2()?;
        control.set_alarm_flag(false);
        self.set_control2(control)
    }

    /// Enables or disables the alarm interrupt, leaving every other control
    /// bit as is.
    pub fn set_alarm_enabled(&mut self, enabled: bool) -> Result<(), PCF85063AError<I2C::Error>> {
        let mut control = self.control2()?;
        control.set_alarm_interrupt_enable(enabled);
        self.set_control2(control)
    }

    /// Reads any register for display.
    pub fn dump_register(
        &mut self,
        reg: impl Into<u8>,
    ) -> Result<RegisterDump, PCF85063AError<I2C::Error>> {
        Ok(RegisterDump(self.read_register(reg.into())?))
    }

    /// Reads every register of `group`, passing each labelled value to `f`.
    pub fn dump_group<F>(
        &mut self,
        group: RegisterGroup,
        mut f: F,
    ) -> Result<(), PCF85063AError<I2C::Error>>
    where
        F: FnMut(&'static str, RegAddr, RegisterDump),
    {
        for &(label, reg) in group.registers() {
            let dump = self.dump_register(reg)?;
            f(label, reg, dump);
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl<I2C: I2c> PCF85063A<I2C, chrono::Local, SystemClock> {
    /// Creates a driver storing UTC, using the host clock and timezone.
    pub fn with_system_clock(i2c: I2C, address: u8) -> Self {
        Self::new(i2c, address, Config::system(), SystemClock)
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c, Tz: TimeZone, C: Clock> PCF85063A<I2C, Tz, C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub fn $name(&mut self) -> Result<$typ, PCF85063AError<I2C::Error>> {
                        let value = self.read_register($regaddr as u8)?;
                        Ok(<$typ>::from(value))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    pub fn [<set_ $name>](&mut self, value: $typ) -> Result<(), PCF85063AError<I2C::Error>> {
                        self.write_register($regaddr as u8, value.into())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
    (control2, RegAddr::Control2, Control2),
    (seconds, RegAddr::Seconds, Seconds),
    (minutes, RegAddr::Minutes, Minutes),
    (hours, RegAddr::Hours, Hours),
    (days, RegAddr::Days, Days),
    (weekdays, RegAddr::Weekdays, Weekdays),
    (months, RegAddr::Months, Months),
    (years, RegAddr::Years, Years),
    (second_alarm, RegAddr::SecondAlarm, AlarmSeconds),
    (minute_alarm, RegAddr::MinuteAlarm, AlarmMinutes),
    (hour_alarm, RegAddr::HourAlarm, AlarmHours),
    (day_alarm, RegAddr::DayAlarm, AlarmDays),
    (weekday_alarm, RegAddr::WeekdayAlarm, AlarmWeekday)
);

#[cfg(test)]
mod tests {
    extern crate alloc;
    use super::*;
    use alloc::{format, string::String, vec, vec::Vec};
    use chrono::{FixedOffset, NaiveDate};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const DEVICE_ADDRESS: u8 = 0x51;

    fn ndt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn zone(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    fn local_rtc(
        expectations: &[I2cTrans],
        now: NaiveDateTime,
    ) -> PCF85063A<I2cMock, FixedOffset, FixedClock> {
        PCF85063A::new(
            I2cMock::new(expectations),
            DEVICE_ADDRESS,
            Config::local_storage(zone(0)),
            FixedClock(now),
        )
    }

    fn utc_rtc(
        expectations: &[I2cTrans],
        offset_hours: i32,
        now_utc: NaiveDateTime,
    ) -> PCF85063A<I2cMock, FixedOffset, FixedClock> {
        PCF85063A::new(
            I2cMock::new(expectations),
            DEVICE_ADDRESS,
            Config::utc_storage(zone(offset_hours)),
            FixedClock(now_utc),
        )
    }

    fn read(reg: RegAddr, value: u8) -> I2cTrans {
        I2cTrans::write_read(DEVICE_ADDRESS, vec![reg as u8], vec![value])
    }

    fn write(reg: RegAddr, value: u8) -> I2cTrans {
        I2cTrans::write(DEVICE_ADDRESS, vec![reg as u8, value])
    }

    fn alarm_reads(day: u8, hour: u8, minute: u8, second: u8) -> [I2cTrans; 4] {
        [
            read(RegAddr::SecondAlarm, second),
            read(RegAddr::MinuteAlarm, minute),
            read(RegAddr::HourAlarm, hour),
            read(RegAddr::DayAlarm, day),
        ]
    }

    #[test]
    fn test_read_datetime_local_storage() {
        // 2024-03-14 15:30:00, Thursday
        let expectations = [I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x15, 0x14, 0x04, 0x03, 0x24],
        )];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert_eq!(rtc.datetime().unwrap(), ndt(2024, 3, 14, 15, 30, 0));
        rtc.release().done();
    }

    #[test]
    fn test_read_datetime_masks_flag_bits() {
        let expectations = [I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x80 | 0x12, 0x34, 0xC0 | 0x08, 0xC0 | 0x01, 0x01, 0xE0 | 0x01, 0x25],
        )];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert_eq!(rtc.datetime().unwrap(), ndt(2025, 1, 1, 8, 34, 12));
        rtc.release().done();
    }

    #[test]
    fn test_read_datetime_utc_storage_converts_to_local() {
        let expectations = [I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x30, 0x23, 0x31, 0x02, 0x12, 0x24],
        )];
        let mut rtc = utc_rtc(&expectations, 2, ndt(2024, 1, 1, 0, 0, 0));

        // 2024-12-31 23:30 UTC is 2025-01-01 01:30 at UTC+2
        assert_eq!(rtc.datetime().unwrap(), ndt(2025, 1, 1, 1, 30, 0));
        rtc.release().done();
    }

    #[test]
    fn test_read_datetime_invalid_registers() {
        let expectations = [I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        )];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert!(matches!(
            rtc.datetime(),
            Err(PCF85063AError::InvalidDateTime)
        ));
        rtc.release().done();
    }

    #[test]
    fn test_oscillator_stopped() {
        let expectations = [I2cTrans::write_read(
            DEVICE_ADDRESS,
            vec![RegAddr::Seconds as u8],
            vec![0x80, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00],
        )];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert!(rtc.oscillator_stopped().unwrap());
        rtc.release().done();
    }

    #[test]
    fn test_set_datetime_local_storage() {
        let expectations = [
            write(RegAddr::Seconds, 0x00),
            write(RegAddr::Minutes, 0x30),
            write(RegAddr::Hours, 0x15),
            write(RegAddr::Years, 0x24),
            write(RegAddr::Months, 0x03),
            write(RegAddr::Days, 0x14),
            write(RegAddr::Weekdays, 0x04),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        rtc.set_datetime(&ndt(2024, 3, 14, 15, 30, 0)).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_datetime_utc_storage_converts_first() {
        // 2024-03-14 00:30 at UTC+1 is Wednesday 2024-03-13 23:30 UTC
        let expectations = [
            write(RegAddr::Seconds, 0x00),
            write(RegAddr::Minutes, 0x30),
            write(RegAddr::Hours, 0x23),
            write(RegAddr::Years, 0x24),
            write(RegAddr::Months, 0x03),
            write(RegAddr::Days, 0x13),
            write(RegAddr::Weekdays, 0x03),
        ];
        let mut rtc = utc_rtc(&expectations, 1, ndt(2024, 1, 1, 0, 0, 0));

        rtc.set_datetime(&ndt(2024, 3, 14, 0, 30, 0)).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_datetime_now() {
        // clock says 2024-06-01 10:00 UTC, registers hold local UTC+2
        let expectations = [
            write(RegAddr::Seconds, 0x00),
            write(RegAddr::Minutes, 0x00),
            write(RegAddr::Hours, 0x12),
            write(RegAddr::Years, 0x24),
            write(RegAddr::Months, 0x06),
            write(RegAddr::Days, 0x01),
            write(RegAddr::Weekdays, 0x06),
        ];
        let mut rtc = PCF85063A::new(
            I2cMock::new(&expectations),
            DEVICE_ADDRESS,
            Config::local_storage(zone(2)),
            FixedClock(ndt(2024, 6, 1, 10, 0, 0)),
        );

        rtc.set_datetime_now().unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_fields_rejects_seconds_60_without_writing() {
        let mut rtc = local_rtc(&[], ndt(2024, 1, 1, 0, 0, 0));
        let fields = DateTimeFields {
            seconds: Some(60),
            minutes: Some(0),
            ..Default::default()
        };

        match rtc.set_fields(&fields) {
            Err(PCF85063AError::Validation(err)) => {
                assert_eq!(err.field, Field::Seconds);
                assert_eq!((err.min, err.max), (0, 59));
                assert_eq!(format!("{}", err), "seconds is out of range [0, 59]");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        rtc.release().done();
    }

    #[test]
    fn test_set_fields_keeps_earlier_writes_on_failure() {
        let expectations = [
            write(RegAddr::Seconds, 0x01),
            write(RegAddr::Minutes, 0x02),
            write(RegAddr::Hours, 0x03),
            write(RegAddr::Years, 0x24),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));
        let fields = DateTimeFields {
            seconds: Some(1),
            minutes: Some(2),
            hours: Some(3),
            year: Some(24),
            month: Some(13),
            day_of_month: Some(1),
            day_of_week: Some(1),
        };

        let err = rtc.set_fields(&fields).unwrap_err();
        assert!(matches!(
            err,
            PCF85063AError::Validation(ValidationError {
                field: Field::Month,
                min: 1,
                max: 12,
                ..
            })
        ));
        rtc.release().done();
    }

    #[test]
    fn test_set_fields_partial() {
        let expectations = [write(RegAddr::Hours, 0x07), write(RegAddr::Weekdays, 0x02)];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));
        let fields = DateTimeFields {
            hours: Some(7),
            day_of_week: Some(2),
            ..Default::default()
        };

        rtc.set_fields(&fields).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_alarm_local_storage() {
        let expectations = [
            write(RegAddr::SecondAlarm, 0x00),
            write(RegAddr::MinuteAlarm, 0x00),
            write(RegAddr::HourAlarm, 0x09),
            write(RegAddr::DayAlarm, 0x15),
            write(RegAddr::WeekdayAlarm, 0x80),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        rtc.set_alarm(&ndt(2024, 3, 15, 9, 0, 0)).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_alarm_utc_storage_converts_first() {
        // 2024-03-01 00:30 at UTC+1 is 2024-02-29 23:30 UTC
        let expectations = [
            write(RegAddr::SecondAlarm, 0x00),
            write(RegAddr::MinuteAlarm, 0x30),
            write(RegAddr::HourAlarm, 0x23),
            write(RegAddr::DayAlarm, 0x29),
            write(RegAddr::WeekdayAlarm, 0x80),
        ];
        let mut rtc = utc_rtc(&expectations, 1, ndt(2024, 1, 1, 0, 0, 0));

        rtc.set_alarm(&ndt(2024, 3, 1, 0, 30, 0)).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_alarm_now() {
        let expectations = [
            write(RegAddr::SecondAlarm, 0x45),
            write(RegAddr::MinuteAlarm, 0x10),
            write(RegAddr::HourAlarm, 0x06),
            write(RegAddr::DayAlarm, 0x02),
            write(RegAddr::WeekdayAlarm, 0x80),
        ];
        let mut rtc = utc_rtc(&expectations, 3, ndt(2024, 2, 2, 6, 10, 45));

        rtc.set_alarm_now().unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_alarm_time_rejects_invalid_fields() {
        let mut rtc = local_rtc(&[], ndt(2024, 1, 1, 0, 0, 0));
        let time = AlarmTime {
            day: 0,
            hour: 0,
            minute: 0,
            second: 0,
        };

        assert!(matches!(
            rtc.set_alarm_time(&time),
            Err(PCF85063AError::Validation(ValidationError {
                field: Field::DayOfMonth,
                ..
            }))
        ));
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_none_when_seconds_disabled() {
        // short-circuits after the first register
        let expectations = [read(RegAddr::SecondAlarm, 0x80)];
        let mut rtc = local_rtc(&expectations, ndt(2024, 3, 10, 8, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), None);
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_none_when_day_disabled() {
        let expectations = alarm_reads(0x80 | 0x15, 0x09, 0x00, 0x00);
        let mut rtc = local_rtc(&expectations, ndt(2024, 3, 10, 8, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), None);
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_pending_this_month() {
        let mut expectations = Vec::from(alarm_reads(0x15, 0x09, 0x00, 0x00));
        expectations.push(read(RegAddr::Control2, 0b1000_0000));
        let mut rtc = local_rtc(&expectations, ndt(2024, 3, 10, 8, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), Some(ndt(2024, 3, 15, 9, 0, 0)));
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_pending_next_month() {
        let mut expectations = Vec::from(alarm_reads(0x15, 0x09, 0x00, 0x00));
        expectations.push(read(RegAddr::Control2, 0b1000_0000));
        let mut rtc = local_rtc(&expectations, ndt(2024, 3, 20, 8, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), Some(ndt(2024, 4, 15, 9, 0, 0)));
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_fired_previous_year() {
        let mut expectations = Vec::from(alarm_reads(0x20, 0x00, 0x00, 0x00));
        expectations.push(read(RegAddr::Control2, 0b1100_0000));
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 5, 0, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), Some(ndt(2023, 12, 20, 0, 0, 0)));
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_utc_storage() {
        // registers and clock in UTC, result at UTC+1
        let mut expectations = Vec::from(alarm_reads(0x15, 0x09, 0x00, 0x00));
        expectations.push(read(RegAddr::Control2, 0b1000_0000));
        let mut rtc = utc_rtc(&expectations, 1, ndt(2024, 3, 10, 8, 0, 0));

        assert_eq!(rtc.alarm_time().unwrap(), Some(ndt(2024, 3, 15, 10, 0, 0)));
        rtc.release().done();
    }

    #[test]
    fn test_alarm_time_fields() {
        let expectations = alarm_reads(0x31, 0x23, 0x59, 0x58);
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert_eq!(
            rtc.alarm_time_fields().unwrap(),
            Some(AlarmTime {
                day: 31,
                hour: 23,
                minute: 59,
                second: 58,
            })
        );
        rtc.release().done();
    }

    #[test]
    fn test_alarm_state() {
        let expectations = [
            read(RegAddr::Control2, 0b1000_0000),
            read(RegAddr::Control2, 0b0100_0000),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert_eq!(
            rtc.alarm_state().unwrap(),
            AlarmState {
                enabled: true,
                fired: false
            }
        );
        assert_eq!(
            rtc.alarm_state().unwrap(),
            AlarmState {
                enabled: false,
                fired: true
            }
        );
        rtc.release().done();
    }

    #[test]
    fn test_clear_alarm_fired_only_touches_bit_6() {
        let expectations = [
            read(RegAddr::Control2, 0b1100_0000),
            write(RegAddr::Control2, 0b1000_0000),
            read(RegAddr::Control2, 0b0111_1111),
            write(RegAddr::Control2, 0b0011_1111),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        rtc.clear_alarm_fired().unwrap();
        rtc.clear_alarm_fired().unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_set_alarm_enabled_only_touches_bit_7() {
        let expectations = [
            read(RegAddr::Control2, 0b0100_0001),
            write(RegAddr::Control2, 0b1100_0001),
            read(RegAddr::Control2, 0b1100_0000),
            write(RegAddr::Control2, 0b0100_0000),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        rtc.set_alarm_enabled(true).unwrap();
        rtc.set_alarm_enabled(false).unwrap();
        rtc.release().done();
    }

    #[test]
    fn test_dump_register() {
        let expectations = [
            read(RegAddr::Control2, 0x51),
            I2cTrans::write_read(DEVICE_ADDRESS, vec![0x03], vec![0xFF]),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        let dump = rtc.dump_register(RegAddr::Control2).unwrap();
        assert_eq!(format!("{}", dump), "0x51 0b01010001");
        // any address can be dumped, not only mapped registers
        let dump = rtc.dump_register(0x03).unwrap();
        assert_eq!(format!("{}", dump), "0xFF 0b11111111");
        rtc.release().done();
    }

    #[test]
    fn test_dump_group() {
        let expectations = [
            read(RegAddr::SecondAlarm, 0x80),
            read(RegAddr::MinuteAlarm, 0x30),
            read(RegAddr::HourAlarm, 0x09),
            read(RegAddr::DayAlarm, 0x15),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        let mut lines: Vec<String> = Vec::new();
        rtc.dump_group(RegisterGroup::Alarm, |label, _, dump| {
            lines.push(format!("{}: {}", label, dump));
        })
        .unwrap();
        assert_eq!(
            lines,
            [
                "sec: 0x80 0b10000000",
                "min: 0x30 0b00110000",
                "hour: 0x09 0b00001001",
                "day: 0x15 0b00010101",
            ]
        );
        rtc.release().done();
    }

    #[test]
    fn test_bus_error_is_surfaced() {
        let expectations =
            [read(RegAddr::Control2, 0).with_error(ErrorKind::Other)];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert!(matches!(
            rtc.alarm_state(),
            Err(PCF85063AError::I2c(ErrorKind::Other))
        ));
        rtc.release().done();
    }

    #[test]
    fn test_bus_error_stops_multi_register_write() {
        let expectations = [
            write(RegAddr::SecondAlarm, 0x00),
            write(RegAddr::MinuteAlarm, 0x00).with_error(ErrorKind::Other),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        assert!(matches!(
            rtc.set_alarm(&ndt(2024, 3, 15, 9, 0, 0)),
            Err(PCF85063AError::I2c(_))
        ));
        rtc.release().done();
    }

    #[test]
    fn test_register_accessors() {
        let expectations = [
            read(RegAddr::Seconds, 0x80 | 0x42),
            write(RegAddr::Seconds, 0x30),
            read(RegAddr::WeekdayAlarm, 0x80),
        ];
        let mut rtc = local_rtc(&expectations, ndt(2024, 1, 1, 0, 0, 0));

        let seconds = rtc.seconds().unwrap();
        assert!(seconds.oscillator_stop());
        assert_eq!(seconds.value(), 42);
        rtc.set_seconds(Seconds::from_value(30)).unwrap();
        assert!(rtc.weekday_alarm().unwrap().alarm_disabled());
        rtc.release().done();
    }
}
