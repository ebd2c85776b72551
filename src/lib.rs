//! Driver for the NXP PCF85063TP real-time clock (Grove RTC module).
//!
//! The chip is the only clock: every read goes to the device and fills a
//! cached [`ClockSnapshot`], every write programs the registers directly.
//! On top of that, [`MinuteMonitor`] turns 2 Hz polling into one event per
//! minute, and [`Pcf85063tp::set_clk`] picks the CLKOUT frequency.
//!
//! The driver is written against the blocking `embedded-hal` 0.2 I2C traits.
//!
//! ## Features
//!
//! - **`defmt`**: `defmt::Format` on public types and driver logging.
//! - **`firmware`**: the Raspberry Pi Pico demo binary.

#![cfg_attr(not(test), no_std)]

pub mod bcd;
mod clkout;
mod clock;
mod driver;
mod error;
mod format;
mod monitor;
pub mod registers;

#[cfg(test)]
mod testing;

pub use clkout::{ClkOut, Control1, ControlRegisters};
pub use clock::{weekday_name, ClockSnapshot, DateTime, WEEKDAY_NAMES};
pub use driver::Pcf85063tp;
pub use error::Error;
pub use format::{DateTimePart, Text};
pub use monitor::{MinuteMonitor, Poll, NOTIFY_HOLDOFF_MS, POLL_INTERVAL_MS};
pub use registers::{TimeField, DEVICE_ADDRESS};
