#![no_std]
#![no_main]

use core::cell::RefCell;
use cortex_m::delay::Delay;
use critical_section::Mutex;
use fugit::MicrosDurationU64;
use panic_halt as _;
use rp_pico::entry;
use rp_pico::hal::gpio::{self, InOutPin};
use rp_pico::hal::pac::{self, interrupt};
use rp_pico::hal::timer::{Alarm, Alarm0, Instant};
use rp_pico::hal::{Clock, Sio, Timer, clocks::init_clocks_and_plls, watchdog::Watchdog};
use rp_pico_tracker::{HardwareClock, Tm1637};
use rtt_target::{rprintln, rtt_init_print};
use sidereal_drive::{
    Acceleration, DriveConfig, DriveController, DriveState, StepPulseGenerator, SteppingFlag,
};

type StepPin = gpio::Pin<gpio::bank0::Gpio2, gpio::FunctionSioOutput, gpio::PullDown>;
type DirPin = gpio::Pin<gpio::bank0::Gpio3, gpio::FunctionSioOutput, gpio::PullDown>;

/// Written by the control loop, read by the step interrupt.
static STEPPING: SteppingFlag = SteppingFlag::new();

/// Everything the step interrupt owns; handed over once before the alarm is armed.
struct StepTask {
    generator: StepPulseGenerator<'static, StepPin, DirPin, Timer>,
    alarm: Alarm0,
    next_due: Instant,
}

static STEP_TASK: Mutex<RefCell<Option<StepTask>>> = Mutex::new(RefCell::new(None));

#[entry]
fn main() -> ! {
    rtt_init_print!();

    // Get peripherals
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();

    // Set up watchdog driver
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    // Configure clocks (125 MHz)
    let clocks = init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    // Set up the Single Cycle IO (for GPIO access)
    let sio = Sio::new(pac.SIO);

    // Set the pins to their default state
    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let config = DriveConfig::default();

    // The button level at power-on picks the time scale
    let mut button = pins.gpio15.into_pull_up_input();
    let acceleration = Acceleration::from_boot_button(&mut button, &config);
    rprintln!(
        "sidereal-drive: {}x, run {} s wall time",
        acceleration.factor(),
        acceleration.raw_duration_ms(config.max_run_duration_ms()) / 1_000
    );

    // Driver enable is active-low; the controller releases it on construction
    let enable = pins.gpio4.into_push_pull_output();

    let generator = StepPulseGenerator::new(
        pins.gpio2.into_push_pull_output(),
        pins.gpio3.into_push_pull_output(),
        timer,
        &STEPPING,
        &config,
        acceleration,
    );
    let interval = MicrosDurationU64::micros(generator.interval_us() as u64);
    rprintln!("microstep interval {} us", generator.interval_us());

    let display = Tm1637::new(
        pins.gpio6.into_push_pull_output(),
        InOutPin::new(pins.gpio7),
        timer,
    );

    let mut controller = DriveController::new(
        HardwareClock::new(timer),
        display,
        button,
        enable,
        &STEPPING,
        config,
        acceleration,
    );

    // Arm the step alarm on absolute deadlines so interrupt latency never accumulates
    let mut alarm = timer.alarm_0().unwrap();
    let next_due = timer.get_counter() + interval;
    alarm.enable_interrupt();
    let _ = alarm.schedule_at(next_due);

    critical_section::with(|cs| {
        STEP_TASK.borrow(cs).replace(Some(StepTask {
            generator,
            alarm,
            next_due,
        }));
    });

    unsafe {
        pac::NVIC::unmask(pac::Interrupt::TIMER_IRQ_0);
    }

    // Set up delay for the control loop cadence
    let mut delay = Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let mut last_state = DriveState::Init;
    loop {
        let state = controller.poll();
        if state != last_state {
            rprintln!("{:?} -> {:?}", last_state, state);
            last_state = state;
        }
        delay.delay_ms(config.loop_period_ms());
    }
}

#[interrupt]
fn TIMER_IRQ_0() {
    critical_section::with(|cs| {
        if let Some(task) = STEP_TASK.borrow_ref_mut(cs).as_mut() {
            task.alarm.clear_interrupt();
            task.next_due += MicrosDurationU64::micros(task.generator.interval_us() as u64);
            let _ = task.alarm.schedule_at(task.next_due);
            task.generator.fire();
        }
    });
}
