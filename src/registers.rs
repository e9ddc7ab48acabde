//! Register definitions and bitfield structures for the PCF85063A RTC.
//!
//! This module contains the register addresses used by the driver and one
//! bitfield wrapper per register. Registers carrying a BCD value expose the
//! raw digits through `bcd()` and the decoded number through `value()`; any
//! flag bits sharing the byte are named separately so they never leak into
//! the decoded value.

use bitfield::bitfield;

use crate::bcd;

/// Register addresses for the PCF85063A RTC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Control 2 register (alarm enable, alarm flag)
    Control2 = 0x01,
    /// Seconds register (0-59) and oscillator stop flag
    Seconds = 0x04,
    /// Minutes register (0-59)
    Minutes = 0x05,
    /// Hours register (0-23)
    Hours = 0x06,
    /// Day of month register (1-31)
    Days = 0x07,
    /// Day of week register (1-7)
    Weekdays = 0x08,
    /// Month register (1-12)
    Months = 0x09,
    /// Two-digit year register (0-99)
    Years = 0x0A,
    /// Second alarm register
    SecondAlarm = 0x0B,
    /// Minute alarm register
    MinuteAlarm = 0x0C,
    /// Hour alarm register
    HourAlarm = 0x0D,
    /// Day of month alarm register
    DayAlarm = 0x0E,
    /// Day of week alarm register
    WeekdayAlarm = 0x0F,
}

impl From<RegAddr> for u8 {
    fn from(reg: RegAddr) -> Self {
        reg as u8
    }
}

/// Value written to the weekday alarm register: disable bit set, weekday
/// matching never triggers.
pub const WEEKDAY_ALARM_DISABLED: u8 = 0x80;

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

// Decoded access for registers with a `bcd` field
macro_rules! bcd_value {
    ($typ:ty) => {
        impl $typ {
            /// Decoded value of the BCD digits, flag bits excluded.
            pub fn value(&self) -> u8 {
                bcd::decode(self.bcd())
            }

            /// Builds the register from a binary value, all flag bits clear.
            pub fn from_value(value: u8) -> Self {
                let mut reg = Self::default();
                reg.set_bcd(bcd::encode(value));
                reg
            }
        }
    };
}

bitfield! {
    /// Control 2 register: alarm and timer interrupt control.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control2(u8);
    impl Debug;
    /// Alarm interrupt enable (AIE)
    pub alarm_interrupt_enable, set_alarm_interrupt_enable: 7;
    /// Alarm flag (AF), set by the chip on match, cleared by software
    pub alarm_flag, set_alarm_flag: 6;
    /// Minute interrupt enable (MI)
    pub minute_interrupt, set_minute_interrupt: 5;
    /// Half minute interrupt enable (HMI)
    pub half_minute_interrupt, set_half_minute_interrupt: 4;
    /// Timer flag (TF)
    pub timer_flag, set_timer_flag: 3;
    /// CLKOUT frequency selection (COF)
    pub clock_output, set_clock_output: 2, 0;
}
from_register_u8!(Control2);

#[cfg(feature = "defmt")]
impl defmt::Format for Control2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Control2(");
        if self.alarm_interrupt_enable() {
            defmt::write!(f, "AIE ");
        }
        if self.alarm_flag() {
            defmt::write!(f, "AF ");
        }
        defmt::write!(f, "COF={})", self.clock_output());
    }
}

bitfield! {
    /// Seconds register (0-59) with oscillator stop flag.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// Oscillator stop flag (OS), clock integrity is not guaranteed when set
    pub oscillator_stop, set_oscillator_stop: 7;
    /// BCD seconds
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(Seconds);
bcd_value!(Seconds);

bitfield! {
    /// Minutes register (0-59).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// BCD minutes
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(Minutes);
bcd_value!(Minutes);

bitfield! {
    /// Hours register (0-23, 24-hour mode). Bits 7:6 are unused.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// BCD hours
    pub bcd, set_bcd: 5, 0;
}
from_register_u8!(Hours);
bcd_value!(Hours);

bitfield! {
    /// Day of month register (1-31). Bits 7:6 are unused.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Days(u8);
    impl Debug;
    /// BCD day of month
    pub bcd, set_bcd: 5, 0;
}
from_register_u8!(Days);
bcd_value!(Days);

bitfield! {
    /// Day of week register (1-7, Monday = 1).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Weekdays(u8);
    impl Debug;
    /// Day of week
    pub bcd, set_bcd: 2, 0;
}
from_register_u8!(Weekdays);
bcd_value!(Weekdays);

bitfield! {
    /// Month register (1-12). Bits 7:5 are unused.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Months(u8);
    impl Debug;
    /// BCD month
    pub bcd, set_bcd: 4, 0;
}
from_register_u8!(Months);
bcd_value!(Months);

bitfield! {
    /// Two-digit year register (0-99), always read as 20xx.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Years(u8);
    impl Debug;
    /// BCD year
    pub bcd, set_bcd: 7, 0;
}
from_register_u8!(Years);
bcd_value!(Years);

// Alarm registers: bit 7 set means the field does not take part in matching

bitfield! {
    /// Second alarm register with disable bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmSeconds(u8);
    impl Debug;
    /// Second alarm disabled (AEN_S)
    pub alarm_disabled, set_alarm_disabled: 7;
    /// BCD seconds
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(AlarmSeconds);
bcd_value!(AlarmSeconds);

bitfield! {
    /// Minute alarm register with disable bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmMinutes(u8);
    impl Debug;
    /// Minute alarm disabled (AEN_M)
    pub alarm_disabled, set_alarm_disabled: 7;
    /// BCD minutes
    pub bcd, set_bcd: 6, 0;
}
from_register_u8!(AlarmMinutes);
bcd_value!(AlarmMinutes);

bitfield! {
    /// Hour alarm register with disable bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmHours(u8);
    impl Debug;
    /// Hour alarm disabled (AEN_H)
    pub alarm_disabled, set_alarm_disabled: 7;
    /// BCD hours
    pub bcd, set_bcd: 5, 0;
}
from_register_u8!(AlarmHours);
bcd_value!(AlarmHours);

bitfield! {
    /// Day of month alarm register with disable bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmDays(u8);
    impl Debug;
    /// Day alarm disabled (AEN_D)
    pub alarm_disabled, set_alarm_disabled: 7;
    /// BCD day of month
    pub bcd, set_bcd: 5, 0;
}
from_register_u8!(AlarmDays);
bcd_value!(AlarmDays);

bitfield! {
    /// Day of week alarm register with disable bit. Always written disabled.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct AlarmWeekday(u8);
    impl Debug;
    /// Weekday alarm disabled (AEN_W)
    pub alarm_disabled, set_alarm_disabled: 7;
    /// Day of week
    pub bcd, set_bcd: 2, 0;
}
from_register_u8!(AlarmWeekday);
bcd_value!(AlarmWeekday);

macro_rules! defmt_value {
    ($(($typ:ty, $fmt:literal)),+) => {
        $(
            #[cfg(feature = "defmt")]
            impl defmt::Format for $typ {
                fn format(&self, f: defmt::Formatter) {
                    defmt::write!(f, $fmt, self.value());
                }
            }
        )+
    };
}

defmt_value!(
    (Seconds, "Seconds({}s)"),
    (Minutes, "Minutes({}m)"),
    (Hours, "Hours({}h)"),
    (Days, "Days({})"),
    (Weekdays, "Weekdays({})"),
    (Months, "Months({})"),
    (Years, "Years({})"),
    (AlarmSeconds, "AlarmSeconds({}s)"),
    (AlarmMinutes, "AlarmMinutes({}m)"),
    (AlarmHours, "AlarmHours({}h)"),
    (AlarmDays, "AlarmDays({})"),
    (AlarmWeekday, "AlarmWeekday({})")
);
