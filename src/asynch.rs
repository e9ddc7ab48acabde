//! Async implementation of the PCF85063A driver.
//!
//! This module provides an async interface to the PCF85063A RTC using
//! `embedded-hal-async` traits. It is only available when the `async` feature
//! is enabled. Register semantics, validation and time conversion are shared
//! with the blocking driver.
//!
//! # Example
//!
//! ```rust,ignore
//! use pcf85063a::asynch::PCF85063A;
//!
//! let mut rtc = PCF85063A::new(i2c, DEFAULT_ADDRESS, Config::utc_storage(zone), clock);
//!
//! let datetime = rtc.datetime().await?;
//! if let Some(alarm) = rtc.alarm_time().await? {
//!     // ...
//! }
//! ```

use chrono::{NaiveDateTime, TimeZone};
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::datetime::PCF85063ADateTime;
use crate::{
    reconstruct_alarm, AlarmDays, AlarmHours, AlarmMinutes, AlarmSeconds, AlarmState, AlarmTime,
    AlarmWeekday, Clock, Config, Control2, DateTimeFields, Days, Hours, Minutes, Months,
    PCF85063AError, RegAddr, RegisterDump, RegisterGroup, Seconds, Weekdays, Years,
};

/// PCF85063A Real-Time Clock async driver.
pub struct PCF85063A<I2C: I2c, Tz: TimeZone, C: Clock> {
    i2c: I2C,
    address: u8,
    config: Config<Tz>,
    clock: C,
}

impl<I2C: I2c, Tz: TimeZone, C: Clock> PCF85063A<I2C, Tz, C> {
    /// Creates a new async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I2C bus implementation
    /// * `address` - The I2C address of the device (typically 0x51)
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

    async fn read_register(&mut self, reg: u8) -> Result<u8, PCF85063AError<I2C::Error>> {
        let mut data = [0];
        self.i2c.write_read(self.address, &[reg], &mut data).await?;
        debug!("PCF85063A: read reg {} = {}", reg, data[0]);
        Ok(data[0])
    }

    async fn write_register(
        &mut self,
        reg: u8,
        value: u8,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        debug!("PCF85063A: write reg {} = {}", reg, value);
        self.i2c.write(self.address, &[reg, value]).await?;
        Ok(())
    }

    async fn read_raw_datetime(
        &mut self,
    ) -> Result<PCF85063ADateTime, PCF85063AError<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
        Ok(data.into())
    }

    /// Gets the current date and time, in local time.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, PCF85063AError<I2C::Error>> {
        let raw = self.read_raw_datetime().await?;
        let datetime = raw
            .into_datetime()
            .ok_or(PCF85063AError::InvalidDateTime)?;
        Ok(self.config.from_register(&datetime))
    }

    pub async fn oscillator_stopped(&mut self) -> Result<bool, PCF85063AError<I2C::Error>> {
        Ok(self.read_raw_datetime().await?.oscillator_stopped())
    }

    /// Sets the date and time from a local value.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        let datetime = self
            .config
            .to_register(datetime)
            .ok_or(PCF85063AError::InvalidDateTime)?;
        self.set_fields(&DateTimeFields::from(&datetime)).await
    }

    /// Sets the date and time from the clock source.
    pub async fn set_datetime_now(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let now = self.config.register_now(&self.clock);
        self.set_fields(&DateTimeFields::from(&now)).await
    }

    /// Writes individual date/time fields as given. Fields before the first
    /// invalid one stay written.
    pub async fn set_fields(
        &mut self,
        fields: &DateTimeFields,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        for write in fields.register_writes() {
            let (reg, value) = write.map_err(PCF85063AError::Validation)?;
            self.write_register(reg.into(), value).await?;
        }
        Ok(())
    }

    /// Programs the alarm from a local date/time.
    pub async fn set_alarm(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        let datetime = self
            .config
            .to_register(datetime)
            .ok_or(PCF85063AError::InvalidDateTime)?;
        self.set_alarm_time(&AlarmTime::from(&datetime)).await
    }

    pub async fn set_alarm_now(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let now = self.config.register_now(&self.clock);
        self.set_alarm_time(&AlarmTime::from(&now)).await
    }

    pub async fn set_alarm_time(
        &mut self,
        time: &AlarmTime,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        let writes = time
            .register_writes()
            .map_err(PCF85063AError::Validation)?;
        for (reg, value) in writes {
            self.write_register(reg.into(), value).await?;
        }
        Ok(())
    }

    /// Reads the alarm registers, stopping at the first disabled one.
    pub async fn alarm_time_fields(
        &mut self,
    ) -> Result<Option<AlarmTime>, PCF85063AError<I2C::Error>> {
        let second = self.second_alarm().await?;
        if second.alarm_disabled() {
            return Ok(None);
        }
        let minute = self.minute_alarm().await?;
        if minute.alarm_disabled() {
            return Ok(None);
        }
        let hour = self.hour_alarm().await?;
        if hour.alarm_disabled() {
            return Ok(None);
        }
        let day = self.day_alarm().await?;
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

    /// Gets the reconstructed local date/time of the alarm, if one is set.
    pub async fn alarm_time(
        &mut self,
    ) -> Result<Option<NaiveDateTime>, PCF85063AError<I2C::Error>> {
        let Some(time) = self.alarm_time_fields().await? else {
            return Ok(None);
        };
        let state = self.alarm_state().await?;
        let now = self.config.register_now(&self.clock);
        let alarm =
            reconstruct_alarm(&time, state.fired, &now).ok_or(PCF85063AError::InvalidDateTime)?;
        Ok(Some(self.config.from_register(&alarm)))
    }

    pub async fn alarm_state(&mut self) -> Result<AlarmState, PCF85063AError<I2C::Error>> {
        Ok(self.control2().await?.into())
    }

    pub async fn clear_alarm_fired(&mut self) -> Result<(), PCF85063AError<I2C::Error>> {
        let mut control = self.control2().await?;
        control.set_alarm_flag(false);
        self.set_control2(control).await
    }

    pub async fn set_alarm_enabled(
        &mut self,
        enabled: bool,
    ) -> Result<(), PCF85063AError<I2C::Error>> {
        let mut control = self.control2().await?;
        control.set_alarm_interrupt_enable(enabled);
        self.set_control2(control).await
    }

    pub async fn dump_register(
        &mut self,
        reg: impl Into<u8>,
    ) -> Result<RegisterDump, PCF85063AError<I2C::Error>> {
        Ok(RegisterDump(self.read_register(reg.into()).await?))
    }

    pub async fn dump_group<F>(
        &mut self,
        group: RegisterGroup,
        mut f: F,
    ) -> Result<(), PCF85063AError<I2C::Error>>
    where
        F: FnMut(&'static str, RegAddr, RegisterDump),
    {
        for &(label, reg) in group.registers() {
            let dump = self.dump_register(reg).await?;
            f(label, reg, dump);
        }
        Ok(())
    }
}

// Register access implementations
macro_rules! impl_async_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c, Tz: TimeZone, C: Clock> PCF85063A<I2C, Tz, C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, PCF85063AError<I2C::Error>> {
                        let value = self.read_register($regaddr as u8).await?;
                        Ok(<$typ>::from(value))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), PCF85063AError<I2C::Error>> {
                        self.write_register($regaddr as u8, value.into()).await
                    }
                }
            )+
        }
    }
}

impl_async_register_access!(
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
