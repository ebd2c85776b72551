use crate::registers::{TimeField, TimeRegisters, YEAR_BASE};

/// Day names indexed by the weekday register, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sonntag",
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
];

/// Name for a weekday index, or `None` outside 0..=6.
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAY_NAMES.get(usize::from(weekday)).copied()
}

/// A full date and time to program into the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// Calendar year, 2000..=2099.
    pub year: u16,
    pub month: u8,
    /// 0 = Sunday.
    pub weekday: u8,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl DateTime {
    pub fn field(&self, field: TimeField) -> u16 {
        match field {
            TimeField::Seconds => self.seconds.into(),
            TimeField::Minutes => self.minutes.into(),
            TimeField::Hours => self.hours.into(),
            TimeField::Day => self.day.into(),
            TimeField::Weekday => self.weekday.into(),
            TimeField::Month => self.month.into(),
            TimeField::Year => self.year,
        }
    }

    /// Checks every field against its range, year first.
    pub fn validate(&self) -> Result<(), TimeField> {
        const CHECK_ORDER: [TimeField; 7] = [
            TimeField::Year,
            TimeField::Month,
            TimeField::Weekday,
            TimeField::Day,
            TimeField::Hours,
            TimeField::Minutes,
            TimeField::Seconds,
        ];
        match CHECK_ORDER.into_iter().find(|f| !f.contains(self.field(*f))) {
            Some(field) => Err(field),
            None => Ok(()),
        }
    }
}

/// The last date and time read from the device.
///
/// Replaced as a whole on every refresh, never field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockSnapshot {
    pub year: u16,
    pub month: u8,
    pub weekday: u8,
    /// Empty when the weekday register holds something other than 0..=6.
    /// The name from the previous refresh is not carried over.
    pub weekday_name: &'static str,
    pub day: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl ClockSnapshot {
    /// The state before the first refresh.
    pub const fn new() -> Self {
        Self {
            year: 0,
            month: 0,
            weekday: 0,
            weekday_name: "",
            day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub(crate) fn from_registers(raw: &TimeRegisters) -> Self {
        Self {
            year: YEAR_BASE + u16::from(raw.year),
            month: raw.month,
            weekday: raw.weekday,
            weekday_name: weekday_name(raw.weekday).unwrap_or(""),
            day: raw.day,
            hours: raw.hours,
            minutes: raw.minutes,
            seconds: raw.seconds,
        }
    }
}

impl Default for ClockSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
