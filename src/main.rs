#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use pcf85063tp::DateTime;

/// Programmed into the RTC at boot when set. Leave `None` to keep the time
/// the module has been holding on its backup cell.
const SET_ON_BOOT: Option<DateTime> = None;

/// I2C0 bus speed. The PCF85063TP supports up to 400 kHz.
const I2C_FREQ_KHZ: u32 = 100;

#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [SPI0_IRQ])]
mod app {
    use super::*;
    use embedded_hal::digital::v2::ToggleableOutputPin;
    use pcf85063tp::{ClkOut, ClockSnapshot, MinuteMonitor, Pcf85063tp, POLL_INTERVAL_MS};
    use rp_pico::hal::{
        self,
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{
            bank0::{Gpio15, Gpio25, Gpio4, Gpio5},
            FunctionI2C, FunctionSio, Interrupt, Pin, PullDown, PullUp, SioInput, SioOutput,
        },
        sio::Sio,
        timer::{Alarm, Alarm0, Timer},
        watchdog::Watchdog,
        I2C,
    };

    type RtcBus = I2C<
        hal::pac::I2C0,
        (
            Pin<Gpio4, FunctionI2C, PullUp>,
            Pin<Gpio5, FunctionI2C, PullUp>,
        ),
    >;
    type Rtc = Pcf85063tp<RtcBus>;

    // Shared resources (accessed by multiple tasks)
    #[shared]
    struct Shared {
        rtc: Rtc,
    }

    // Local resources (accessed by single tasks)
    #[local]
    struct Local {
        monitor: MinuteMonitor,
        alarm: Alarm0,
        led: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>,
        button: Pin<Gpio15, FunctionSio<SioInput>, PullUp>,
        clkout: ClkOut,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let button = pins.gpio15.into_pull_up_input();
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);

        let sda = pins.gpio4.reconfigure::<FunctionI2C, PullUp>();
        let scl = pins.gpio5.reconfigure::<FunctionI2C, PullUp>();
        let i2c = I2C::i2c0(
            pac.I2C0,
            sda,
            scl,
            I2C_FREQ_KHZ.kHz(),
            &mut pac.RESETS,
            clocks.system_clock.freq(),
        );

        let rtc = Pcf85063tp::new(i2c);
        if let Some(time) = SET_ON_BOOT {
            if let Err(e) = rtc.set_clock(&time) {
                defmt::warn!("could not set clock: {}", defmt::Debug2Format(&e));
            }
        }

        let clkout = match rtc.control_registers() {
            Ok(regs) => regs.control1.frequency(),
            Err(e) => {
                defmt::warn!("control registers unreadable: {}", defmt::Debug2Format(&e));
                ClkOut::Hz32768
            }
        };
        match (rtc.date(), rtc.time()) {
            (Ok(date), Ok(time)) => {
                defmt::info!("rtc {=str} {=str}, clkout {}", date.as_str(), time.as_str(), clkout)
            }
            _ => defmt::warn!("rtc not responding"),
        }

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        alarm.schedule(POLL_INTERVAL_MS.millis()).unwrap();
        alarm.enable_interrupt();

        (
            Shared { rtc },
            Local {
                monitor: MinuteMonitor::new(),
                alarm,
                led,
                button,
                clkout,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: Timer Interrupt, one RTC poll per wake-up
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [rtc], local = [alarm, monitor])]
    fn poll_rtc(mut ctx: poll_rtc::Context) {
        ctx.local.alarm.clear_interrupt();

        let monitor = ctx.local.monitor;
        let pause_ms = match ctx.shared.rtc.lock(|rtc| monitor.poll(rtc).map(|p| (p, rtc.snapshot()))) {
            Ok((poll, snapshot)) => {
                if poll.fired {
                    minute_event::spawn(snapshot).ok();
                }
                poll.pause_ms()
            }
            Err(e) => {
                defmt::warn!("rtc poll failed: {}", defmt::Debug2Format(&e));
                POLL_INTERVAL_MS
            }
        };

        ctx.local.alarm.schedule(pause_ms.millis()).unwrap();
    }

    // Software Task: one per minute boundary
    #[task(local = [led])]
    fn minute_event(ctx: minute_event::Context, snapshot: ClockSnapshot) {
        ctx.local.led.toggle().unwrap();

        let mut buf = [0u8; 40];
        match format_no_std::show(
            &mut buf,
            format_args!(
                "{} {} {}",
                snapshot.weekday_name,
                snapshot.date_text(),
                snapshot.time_text()
            ),
        ) {
            Ok(line) => defmt::info!("{=str}", line),
            Err(_) => defmt::info!("minute {=u8}", snapshot.minutes),
        }
    }

    // Hardware Task: GPIO Interrupt (Button Press), next CLKOUT frequency
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [rtc], local = [button, clkout])]
    fn button_press(mut ctx: button_press::Context) {
        ctx.local.button.clear_interrupt(Interrupt::EdgeLow);

        let next = ctx.local.clkout.next();
        match ctx.shared.rtc.lock(|rtc| rtc.set_clk(next)) {
            Ok(()) => {
                *ctx.local.clkout = next;
                defmt::info!("clkout {}", next);
            }
            Err(e) => defmt::warn!("clkout unchanged: {}", defmt::Debug2Format(&e)),
        }
    }
}
