//! PCF85063TP register map and the transaction sequences that walk it.
//!
//! The device is driven through its auto-incrementing address pointer: a
//! write sends `[register, value]`, a read receives one big-endian word of
//! which only the low byte is meaningful, and every read moves the pointer on
//! by one register. All sequences below start and end with the pointer at the
//! same resting position, so they can follow each other in any order.

use core::ops::RangeInclusive;

use bitflags::bitflags;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::bcd::{from_bcd, to_bcd_u8};
use crate::clock::DateTime;

/// 7-bit I2C address of the PCF85063TP.
pub const DEVICE_ADDRESS: u8 = 0x51;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Control0 = 0x00,
    Control1 = 0x01,
    Seconds = 0x04,
    Minutes = 0x05,
    Hours = 0x06,
    Day = 0x07,
    Weekday = 0x08,
    Month = 0x09,
    Year = 0x0a,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

bitflags! {
    /// Control-0 bits the driver touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Control0: u8 {
        /// Freezes the time counters while the clock is being set.
        const STOP = 0b0010_0000;
        /// 12.5 pF quartz load capacitance, fitted on the Grove module.
        const CAP_SEL = 0b0000_0001;
    }
}

const fn command(register: Register, bits: Control0) -> u16 {
    ((register.addr() as u16) << 8) | bits.bits() as u16
}

/// Halts the oscillator so the seven time registers update as one.
pub const STOP_COMMAND: u16 = command(Register::Control0, Control0::STOP.union(Control0::CAP_SEL));
/// Restarts the oscillator.
pub const START_COMMAND: u16 = command(Register::Control0, Control0::CAP_SEL);

/// Reads that land before the seconds register in a snapshot burst.
const LEADING_READS: usize = 2;
/// Reads after the year register that bring the pointer back to rest.
const TRAILING_READS: usize = 2;
/// Reads that skip the time registers before the control pair.
const CONTROL_SKIP_READS: usize = 9;
/// Reads that return the pointer to rest after a control-1 write.
const REALIGN_READS: usize = 10;

/// Offset between the device's two-digit year and the calendar year.
pub const YEAR_BASE: u16 = 2000;

/// A decimal time field and its register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeField {
    Seconds,
    Minutes,
    Hours,
    Day,
    Weekday,
    Month,
    Year,
}

impl TimeField {
    /// Register order of a full clock write.
    pub const WRITE_ORDER: [TimeField; 7] = [
        TimeField::Seconds,
        TimeField::Minutes,
        TimeField::Hours,
        TimeField::Day,
        TimeField::Weekday,
        TimeField::Month,
        TimeField::Year,
    ];

    pub const fn register(self) -> Register {
        match self {
            TimeField::Seconds => Register::Seconds,
            TimeField::Minutes => Register::Minutes,
            TimeField::Hours => Register::Hours,
            TimeField::Day => Register::Day,
            TimeField::Weekday => Register::Weekday,
            TimeField::Month => Register::Month,
            TimeField::Year => Register::Year,
        }
    }

    /// Accepted decimal values. The year is the full calendar year.
    pub const fn range(self) -> RangeInclusive<u16> {
        match self {
            TimeField::Seconds | TimeField::Minutes => 0..=59,
            TimeField::Hours => 0..=23,
            TimeField::Day => 1..=31,
            TimeField::Weekday => 0..=6,
            TimeField::Month => 1..=12,
            TimeField::Year => YEAR_BASE..=YEAR_BASE + 99,
        }
    }

    pub fn contains(self, value: u16) -> bool {
        self.range().contains(&value)
    }
}

/// Decoded contents of the seven time registers, year still two-digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TimeRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day: u8,
    pub weekday: u8,
    pub month: u8,
    pub year: u8,
}

/// Register-level access to the device.
pub(crate) struct RegisterBus<I2C> {
    i2c: I2C,
}

impl<I2C, E> RegisterBus<I2C>
where
    I2C: Read<Error = E> + Write<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_unit(&mut self) -> Result<u8, E> {
        let mut word = [0u8; 2];
        self.i2c.read(DEVICE_ADDRESS, &mut word)?;
        Ok((u16::from_be_bytes(word) % 256) as u8)
    }

    fn read_decimal(&mut self) -> Result<u8, E> {
        let raw = self.read_unit()?;
        Ok(from_bcd(u16::from(raw)) as u8)
    }

    fn discard(&mut self, count: usize) -> Result<(), E> {
        for _ in 0..count {
            self.read_unit()?;
        }
        Ok(())
    }

    fn write_word(&mut self, word: u16) -> Result<(), E> {
        self.i2c.write(DEVICE_ADDRESS, &word.to_be_bytes())
    }

    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), E> {
        self.write_word(u16::from_be_bytes([register.addr(), value]))
    }

    /// One full pass over the clock: 11 reads, pointer back at rest.
    pub fn read_time(&mut self) -> Result<TimeRegisters, E> {
        self.discard(LEADING_READS)?;
        let time = TimeRegisters {
            seconds: self.read_decimal()?,
            minutes: self.read_decimal()?,
            hours: self.read_decimal()?,
            day: self.read_decimal()?,
            weekday: self.read_decimal()?,
            month: self.read_decimal()?,
            year: self.read_decimal()?,
        };
        self.discard(TRAILING_READS)?;
        Ok(time)
    }

    /// Writes all seven fields between a stop and a start command.
    ///
    /// `time` must already be validated.
    pub fn write_time(&mut self, time: &DateTime) -> Result<(), E> {
        self.write_word(STOP_COMMAND)?;
        for field in TimeField::WRITE_ORDER {
            let value = match field {
                TimeField::Year => (time.year - YEAR_BASE) as u8,
                _ => time.field(field) as u8,
            };
            self.write_register(field.register(), to_bcd_u8(value))?;
        }
        self.write_word(START_COMMAND)
    }

    /// Raw control-0 and control-1, read as a pair.
    pub fn read_control(&mut self) -> Result<(u8, u8), E> {
        self.discard(CONTROL_SKIP_READS)?;
        let control0 = self.read_unit()?;
        let control1 = self.read_unit()?;
        Ok((control0, control1))
    }

    /// Writes control-1 and walks the pointer back to rest.
    pub fn write_control1(&mut self, value: u8) -> Result<(), E> {
        self.write_register(Register::Control1, value)?;
        self.discard(REALIGN_READS)
    }
}
