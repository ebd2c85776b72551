//! Simulated PCF85063TP for host tests.
//!
//! Eleven registers in a ring behind an auto-incrementing pointer. A read
//! returns one register in the low byte of a big-endian word and advances the
//! pointer by one; a write stores `[register, value]` and leaves the pointer
//! two past the written register. The pointer rests at 0x02, where every
//! sequence in `registers` starts and ends.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};

use crate::bcd::{from_bcd, to_bcd_u8};
use crate::registers::{Control0, Register, DEVICE_ADDRESS};

pub(crate) const REGISTER_COUNT: usize = 11;
const REST_POINTER: usize = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BusError;

struct Device {
    registers: [u8; REGISTER_COUNT],
    pointer: usize,
    high_byte: u8,
    writes: Vec<[u8; 2]>,
    reads: usize,
    fail_at_read: Option<usize>,
    millis: u32,
}

impl Device {
    fn decimal(&self, register: Register) -> u8 {
        from_bcd(u16::from(self.registers[usize::from(register.addr())])) as u8
    }

    fn set_decimal(&mut self, register: Register, value: u8) {
        self.registers[usize::from(register.addr())] = to_bcd_u8(value);
    }

    fn stopped(&self) -> bool {
        Control0::from_bits_retain(self.registers[0]).contains(Control0::STOP)
    }

    fn tick_second(&mut self) {
        let mut seconds = self.decimal(Register::Seconds) + 1;
        let mut minutes = self.decimal(Register::Minutes);
        let mut hours = self.decimal(Register::Hours);
        if seconds == 60 {
            seconds = 0;
            minutes += 1;
        }
        if minutes == 60 {
            minutes = 0;
            hours = (hours + 1) % 24;
        }
        self.set_decimal(Register::Seconds, seconds);
        self.set_decimal(Register::Minutes, minutes);
        self.set_decimal(Register::Hours, hours);
    }

    fn advance(&mut self, ms: u32) {
        if self.stopped() {
            return;
        }
        self.millis += ms;
        while self.millis >= 1000 {
            self.millis -= 1000;
            self.tick_second();
        }
    }
}

type Hook = Box<dyn FnMut()>;

/// Cloneable handle; all clones share one device.
#[derive(Clone)]
pub(crate) struct FakeBus {
    device: Rc<RefCell<Device>>,
    hook: Rc<RefCell<Option<Hook>>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            device: Rc::new(RefCell::new(Device {
                registers: [0; REGISTER_COUNT],
                pointer: REST_POINTER,
                high_byte: 0,
                writes: Vec::new(),
                reads: 0,
                fail_at_read: None,
                millis: 0,
            })),
            hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Loads the time registers directly, without bus traffic.
    #[allow(clippy::too_many_arguments)]
    pub fn set_time(&self, year: u16, month: u8, weekday: u8, day: u8, h: u8, m: u8, s: u8) {
        let mut device = self.device.borrow_mut();
        device.set_decimal(Register::Year, (year - 2000) as u8);
        device.set_decimal(Register::Month, month);
        device.set_decimal(Register::Weekday, weekday);
        device.set_decimal(Register::Day, day);
        device.set_decimal(Register::Hours, h);
        device.set_decimal(Register::Minutes, m);
        device.set_decimal(Register::Seconds, s);
    }

    pub fn set_register(&self, register: Register, value: u8) {
        self.device.borrow_mut().registers[usize::from(register.addr())] = value;
    }

    pub fn register(&self, register: Register) -> u8 {
        self.device.borrow().registers[usize::from(register.addr())]
    }

    pub fn registers(&self) -> [u8; REGISTER_COUNT] {
        self.device.borrow().registers
    }

    /// Noise placed in the ignored high byte of every read word.
    pub fn set_high_byte(&self, value: u8) {
        self.device.borrow_mut().high_byte = value;
    }

    pub fn pointer(&self) -> usize {
        self.device.borrow().pointer
    }

    pub fn reset_pointer(&self) {
        self.device.borrow_mut().pointer = REST_POINTER;
    }

    pub fn writes(&self) -> Vec<[u8; 2]> {
        self.device.borrow().writes.clone()
    }

    /// Successful read transactions so far.
    pub fn reads(&self) -> usize {
        self.device.borrow().reads
    }

    /// Makes the `n`th read transaction (counting from 1) fail.
    pub fn fail_at_read(&self, n: usize) {
        self.device.borrow_mut().fail_at_read = Some(n);
    }

    pub fn clear_failure(&self) {
        self.device.borrow_mut().fail_at_read = None;
    }

    /// Runs `hook` after every successful read.
    pub fn on_read(&self, hook: impl FnMut() + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn clear_hook(&self) {
        self.hook.borrow_mut().take();
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay {
            device: self.device.clone(),
            slept: Vec::new(),
            budget: None,
        }
    }

    fn run_hook(&self) {
        // Taken out while it runs so it may use the bus handle itself.
        let hook = self.hook.borrow_mut().take();
        if let Some(mut hook) = hook {
            hook();
            let mut slot = self.hook.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }
}

impl Read for FakeBus {
    type Error = BusError;

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        assert_eq!(address, DEVICE_ADDRESS);
        assert_eq!(buffer.len(), 2);
        {
            let mut device = self.device.borrow_mut();
            if device.fail_at_read == Some(device.reads + 1) {
                return Err(BusError);
            }
            buffer[0] = device.high_byte;
            buffer[1] = device.registers[device.pointer];
            device.pointer = (device.pointer + 1) % REGISTER_COUNT;
            device.reads += 1;
        }
        self.run_hook();
        Ok(())
    }
}

impl Write for FakeBus {
    type Error = BusError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        assert_eq!(address, DEVICE_ADDRESS);
        let [register, value] = <[u8; 2]>::try_from(bytes).expect("register writes are two bytes");
        let register = usize::from(register);
        assert!(register < REGISTER_COUNT);

        let mut device = self.device.borrow_mut();
        device.registers[register] = value;
        if register == usize::from(Register::Seconds.addr()) {
            device.millis = 0;
        }
        device.pointer = (register + 2) % REGISTER_COUNT;
        device.writes.push([register as u8, value]);
        Ok(())
    }
}

/// Delay that moves the simulated clock forward instead of sleeping.
pub(crate) struct FakeDelay {
    device: Rc<RefCell<Device>>,
    slept: Vec<u32>,
    budget: Option<(u32, Rc<AtomicBool>)>,
}

impl FakeDelay {
    /// Sets `stop` once `ms` of simulated time have passed.
    pub fn stop_after(&mut self, ms: u32, stop: Rc<AtomicBool>) {
        self.budget = Some((ms, stop));
    }

    pub fn slept(&self) -> &[u32] {
        &self.slept
    }
}

impl DelayMs<u32> for FakeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.device.borrow_mut().advance(ms);
        self.slept.push(ms);
        if let Some((limit, stop)) = &self.budget {
            if self.slept.iter().sum::<u32>() >= *limit {
                stop.store(true, Ordering::Release);
            }
        }
    }
}
