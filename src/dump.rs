//! Register dumps for inspection.
//!
//! Rendering is side-effect free; the only bus traffic is the read of the
//! register itself.

use core::fmt;

use crate::RegAddr;

/// A raw register value, displayed as hex and binary (`0x51 0b01010001`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDump(pub u8);

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} 0b{:08b}", self.0, self.0)
    }
}

/// Bundles of related registers for dumping together.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterGroup {
    /// Control 2 register
    Control,
    /// The seven date/time registers
    DateTime,
    /// The four alarm registers in use (weekday alarm excluded)
    Alarm,
}

impl RegisterGroup {
    /// Every group, in dump order.
    pub const ALL: [RegisterGroup; 3] = [
        RegisterGroup::Control,
        RegisterGroup::DateTime,
        RegisterGroup::Alarm,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            RegisterGroup::Control => "control",
            RegisterGroup::DateTime => "date",
            RegisterGroup::Alarm => "alarm",
        }
    }

    /// Labelled registers of the group, in dump order.
    pub const fn registers(self) -> &'static [(&'static str, RegAddr)] {
        match self {
            RegisterGroup::Control => &[("control", RegAddr::Control2)],
            RegisterGroup::DateTime => &[
                ("sec", RegAddr::Seconds),
                ("min", RegAddr::Minutes),
                ("hour", RegAddr::Hours),
                ("weekday", RegAddr::Weekdays),
                ("day", RegAddr::Days),
                ("month", RegAddr::Months),
                ("year", RegAddr::Years),
            ],
            RegisterGroup::Alarm => &[
                ("sec", RegAddr::SecondAlarm),
                ("min", RegAddr::MinuteAlarm),
                ("hour", RegAddr::HourAlarm),
                ("day", RegAddr::DayAlarm),
            ],
        }
    }
}
