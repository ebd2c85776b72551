//! The PCF85063TP driver object.

use core::cell::{Cell, RefCell, RefMut};

use embedded_hal::blocking::i2c::{Read, Write};

use crate::clock::{ClockSnapshot, DateTime};
use crate::error::Error;
use crate::format::{DateTimePart, Text};
use crate::registers::RegisterBus;

/// PCF85063TP real-time clock on an I2C bus.
///
/// All operations take `&self` so a handler that was given a shared
/// reference can call back into the driver. A `refresh` started while
/// another one is still on the bus does nothing.
pub struct Pcf85063tp<I2C> {
    bus: RefCell<RegisterBus<I2C>>,
    snapshot: Cell<ClockSnapshot>,
    refreshing: Cell<bool>,
}

impl<I2C, E> Pcf85063tp<I2C>
where
    I2C: Read<Error = E> + Write<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            bus: RefCell::new(RegisterBus::new(i2c)),
            snapshot: Cell::new(ClockSnapshot::new()),
            refreshing: Cell::new(false),
        }
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.bus.into_inner().release()
    }

    pub(crate) fn bus(&self) -> Result<RefMut<'_, RegisterBus<I2C>>, Error<E>> {
        self.bus.try_borrow_mut().map_err(|_| Error::Busy)
    }

    /// Re-reads the clock into the cached snapshot.
    ///
    /// Returns `Ok(false)` without touching the bus when called from inside
    /// another refresh or while the bus is in use. On a bus error the
    /// snapshot keeps its previous value.
    pub fn refresh(&self) -> Result<bool, Error<E>> {
        if self.refreshing.replace(true) {
            #[cfg(feature = "defmt")]
            defmt::trace!("refresh skipped, already in progress");
            return Ok(false);
        }

        let raw = match self.bus.try_borrow_mut() {
            Ok(mut bus) => bus.read_time().map(Some),
            Err(_) => Ok(None),
        };
        self.refreshing.set(false);

        match raw.map_err(Error::I2c)? {
            Some(raw) => {
                self.snapshot.set(ClockSnapshot::from_registers(&raw));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The cached snapshot, without bus traffic.
    pub fn snapshot(&self) -> ClockSnapshot {
        self.snapshot.get()
    }

    /// Refreshes, then formats `HH:MM:SS`.
    pub fn time(&self) -> Result<Text, Error<E>> {
        self.refresh()?;
        Ok(self.snapshot().time_text())
    }

    /// Refreshes, then formats `DD.MM.YYYY`.
    pub fn date(&self) -> Result<Text, Error<E>> {
        self.refresh()?;
        Ok(self.snapshot().date_text())
    }

    pub fn part_number(&self, part: DateTimePart) -> Result<u16, Error<E>> {
        self.refresh()?;
        Ok(self.snapshot().part_number(part))
    }

    pub fn part_text(&self, part: DateTimePart) -> Result<Text, Error<E>> {
        self.refresh()?;
        Ok(self.snapshot().part_text(part))
    }

    /// Programs a full date and time.
    ///
    /// Every field is checked first; if any is out of range nothing is sent
    /// and `Error::OutOfRange` names the first offender. Ignoring the result
    /// gives the silent all-or-nothing behaviour. The cached snapshot is not
    /// touched until the next refresh.
    pub fn set_clock(&self, time: &DateTime) -> Result<(), Error<E>> {
        if let Err(field) = time.validate() {
            #[cfg(feature = "defmt")]
            defmt::warn!("set_clock rejected, {} out of range", field);
            return Err(Error::OutOfRange(field));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("set_clock {}", time);
        self.bus()?.write_time(time).map_err(Error::I2c)
    }
}
