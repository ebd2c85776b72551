//! Fixed-width text for snapshot fields.

use core::fmt::Write;

use heapless::String;

use crate::clock::ClockSnapshot;

/// Owned text for one formatted field, time or date.
///
/// Sixteen bytes holds the widest output, a date built from garbage
/// registers (`165.165.2165`).
pub type Text = String<16>;

/// A single piece of the date and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DateTimePart {
    /// Day of the month.
    Date,
    Month,
    Year,
    Hour,
    Minute,
    Second,
    /// Weekday index, 0 = Sunday.
    Day,
    /// Weekday name.
    WeekDay,
}

fn push_padded(out: &mut Text, value: u16, width: usize) {
    // Never overflows, see `Text`.
    let _ = write!(out, "{:0width$}", value, width = width);
}

impl ClockSnapshot {
    pub fn part_number(&self, part: DateTimePart) -> u16 {
        match part {
            DateTimePart::Date => self.day.into(),
            DateTimePart::Month => self.month.into(),
            DateTimePart::Year => self.year,
            DateTimePart::Hour => self.hours.into(),
            DateTimePart::Minute => self.minutes.into(),
            DateTimePart::Second => self.seconds.into(),
            DateTimePart::Day | DateTimePart::WeekDay => self.weekday.into(),
        }
    }

    /// Zero padded to two digits, four for the year. The weekday index is
    /// not padded and the weekday name is returned as is.
    pub fn part_text(&self, part: DateTimePart) -> Text {
        let mut out = Text::new();
        match part {
            DateTimePart::Year => push_padded(&mut out, self.year, 4),
            DateTimePart::Day => push_padded(&mut out, self.weekday.into(), 1),
            DateTimePart::WeekDay => {
                let _ = out.push_str(self.weekday_name);
            }
            _ => push_padded(&mut out, self.part_number(part), 2),
        }
        out
    }

    /// `HH:MM:SS`
    pub fn time_text(&self) -> Text {
        let mut out = Text::new();
        push_padded(&mut out, self.hours.into(), 2);
        let _ = out.push(':');
        push_padded(&mut out, self.minutes.into(), 2);
        let _ = out.push(':');
        push_padded(&mut out, self.seconds.into(), 2);
        out
    }

    /// `DD.MM.YYYY`
    pub fn date_text(&self) -> Text {
        let mut out = Text::new();
        push_padded(&mut out, self.day.into(), 2);
        let _ = out.push('.');
        push_padded(&mut out, self.month.into(), 2);
        let _ = out.push('.');
        push_padded(&mut out, self.year, 4);
        out
    }
}
