//! CLKOUT frequency selection.
//!
//! The frequency selector lives in the three low bits of control-1. The five
//! bits above it belong to other functions of the chip and are carried over
//! unchanged on every update.

use embedded_hal::blocking::i2c::{Read, Write};

use crate::driver::Pcf85063tp;
use crate::error::Error;

/// Frequency on the CLKOUT pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClkOut {
    Hz32768 = 0,
    Hz16384 = 1,
    Hz8192 = 2,
    Hz4096 = 3,
    Hz2048 = 4,
    Hz1024 = 5,
    Hz1 = 6,
    Off = 7,
}

impl ClkOut {
    pub const ALL: [ClkOut; 8] = [
        ClkOut::Hz32768,
        ClkOut::Hz16384,
        ClkOut::Hz8192,
        ClkOut::Hz4096,
        ClkOut::Hz2048,
        ClkOut::Hz1024,
        ClkOut::Hz1,
        ClkOut::Off,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Self {
        Self::ALL[usize::from(code & Control1::FREQUENCY_MASK)]
    }

    /// The following setting, wrapping from `Off` to 32768 Hz.
    pub fn next(self) -> Self {
        Self::from_code(self.code().wrapping_add(1))
    }
}

/// Control-1 split into the frequency selector (bits 2..0) and the reserved
/// bits above it (7..3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Control1(u8);

impl Control1 {
    const FREQUENCY_MASK: u8 = 0b0000_0111;
    const RESERVED_MASK: u8 = !Self::FREQUENCY_MASK;

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn frequency(self) -> ClkOut {
        ClkOut::from_code(self.0)
    }

    /// Bits 7..3, still in place.
    pub const fn reserved(self) -> u8 {
        self.0 & Self::RESERVED_MASK
    }

    pub const fn with_frequency(self, frequency: ClkOut) -> Self {
        Self(self.reserved() | frequency.code())
    }
}

/// Control-0 and control-1 as read in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegisters {
    pub control0: u8,
    pub control1: Control1,
}

impl<I2C, E> Pcf85063tp<I2C>
where
    I2C: Read<Error = E> + Write<Error = E>,
{
    pub fn control_registers(&self) -> Result<ControlRegisters, Error<E>> {
        let (control0, control1) = self.bus()?.read_control().map_err(Error::I2c)?;
        Ok(ControlRegisters {
            control0,
            control1: Control1::from_bits(control1),
        })
    }

    /// Selects the CLKOUT frequency, keeping the other control-1 bits.
    pub fn set_clk(&self, frequency: ClkOut) -> Result<(), Error<E>> {
        let mut bus = self.bus()?;
        let (_, control1) = bus.read_control().map_err(Error::I2c)?;
        let control1 = Control1::from_bits(control1).with_frequency(frequency);

        #[cfg(feature = "defmt")]
        defmt::debug!("clkout {} (control-1 {=u8:#b})", frequency, control1.bits());
        bus.write_control1(control1.bits()).map_err(Error::I2c)
    }
}
