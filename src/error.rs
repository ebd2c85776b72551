use crate::registers::TimeField;

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The I2C transaction failed.
    I2c(E),
    /// A field passed to `set_clock` was outside its range. Nothing was
    /// written to the device.
    OutOfRange(TimeField),
    /// The bus is already in use by an operation further up the call stack.
    Busy,
}
