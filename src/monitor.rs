//! Minute boundary detection by polling.
//!
//! The clock is sampled every [`POLL_INTERVAL_MS`]. A minute is reported
//! when a sample shows a minute later than the last reported one with the
//! seconds at exactly zero. A minute whose zero second falls between two
//! samples is not reported.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::clock::ClockSnapshot;
use crate::driver::Pcf85063tp;
use crate::error::Error;

/// Pause between two samples.
pub const POLL_INTERVAL_MS: u32 = 500;
/// Extra pause after a notification, so the same zero second is not seen
/// twice.
pub const NOTIFY_HOLDOFF_MS: u32 = 500;

/// Outcome of one poll-and-compare cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Poll {
    /// A new minute started; notify once.
    pub fired: bool,
}

impl Poll {
    /// How long to wait before the next cycle.
    pub const fn pause_ms(self) -> u32 {
        if self.fired {
            NOTIFY_HOLDOFF_MS + POLL_INTERVAL_MS
        } else {
            POLL_INTERVAL_MS
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinuteMonitor {
    /// Last reported minute, -1 right after minute 59 was reported.
    last_minute: i16,
}

impl MinuteMonitor {
    pub const fn new() -> Self {
        Self { last_minute: 0 }
    }

    pub fn last_minute(&self) -> i16 {
        self.last_minute
    }

    /// Compares one sample against the last reported minute.
    ///
    /// A second sample inside the 59:00 second reports again. One report per
    /// boundary holds only if the caller waits [`NOTIFY_HOLDOFF_MS`] on top of
    /// [`POLL_INTERVAL_MS`] after a report, as `run` and [`Poll::pause_ms`] do.
    pub fn observe(&mut self, snapshot: &ClockSnapshot) -> bool {
        let minute = i16::from(snapshot.minutes);
        if minute > self.last_minute && snapshot.seconds == 0 {
            self.last_minute = if minute == 59 { -1 } else { minute };
            true
        } else {
            false
        }
    }

    /// Refreshes the driver and compares once.
    ///
    /// A refresh skipped by the driver's guard leaves the snapshot as it was,
    /// and the old value is compared again.
    pub fn poll<I2C, E>(&mut self, rtc: &Pcf85063tp<I2C>) -> Result<Poll, Error<E>>
    where
        I2C: Read<Error = E> + Write<Error = E>,
    {
        rtc.refresh()?;
        Ok(Poll {
            fired: self.observe(&rtc.snapshot()),
        })
    }

    /// Polls until `stop` is set, calling `on_minute` once per reported
    /// minute.
    ///
    /// `stop` is checked once per wake-up, before the next refresh. Bus
    /// errors end the loop.
    pub fn run<I2C, E, D, F>(
        &mut self,
        rtc: &Pcf85063tp<I2C>,
        delay: &mut D,
        stop: &AtomicBool,
        mut on_minute: F,
    ) -> Result<(), Error<E>>
    where
        I2C: Read<Error = E> + Write<Error = E>,
        D: DelayMs<u32>,
        F: FnMut(&ClockSnapshot),
    {
        while !stop.load(Ordering::Acquire) {
            if self.poll(rtc)?.fired {
                #[cfg(feature = "defmt")]
                defmt::debug!("minute {=u8}", rtc.snapshot().minutes);
                on_minute(&rtc.snapshot());
                delay.delay_ms(NOTIFY_HOLDOFF_MS);
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }
        Ok(())
    }
}

impl Default for MinuteMonitor {
    fn default() -> Self {
        Self::new()
    }
}
