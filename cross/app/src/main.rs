#![deny(unsafe_code)]
#![no_std]
#![no_main]

use panic_probe as _;
// use panic_halt as _;

mod board;
mod error;

use crate::board::Board;
use crate::error::Error;

use core::convert::Infallible;
use cortex_m_rt::entry;
use fugit::MicrosDurationU32;
use pulse_servo::{pulse_width_us, FRAME_PERIOD};
use rtt_target::rprintln;
use rtt_target::rtt_init_print;
use stm32f1xx_hal::pac;

const CENTER_ANGLE: f32 = 90.0;

// Button is polled between holds, so this is also the button latency.
const HOLD_TIME: MicrosDurationU32 = MicrosDurationU32::millis(200);
const HOLD_FRAMES: u32 = HOLD_TIME.ticks() / FRAME_PERIOD.ticks();

#[entry]
fn main() -> ! {
    rtt_init_print!();

    let cp = pac::CorePeripherals::take().unwrap();
    let dp = pac::Peripherals::take().unwrap();

    match run(cp, dp) {
        Ok(never) => match never {},
        Err(error) => panic!("{:?}", error),
    }
}

fn run(cp: pac::CorePeripherals, dp: pac::Peripherals) -> Result<Infallible, Error> {
    let Board {
        mut servo,
        mut led,
        button,
    } = Board::new(cp, dp)?;

    rprintln!(
        "center {} us, hold {} frames",
        pulse_width_us(CENTER_ANGLE),
        HOLD_FRAMES
    );

    loop {
        if button.is_high() {
            rprintln!("spin");
            led.set_high();
            servo.spin()?;
            led.set_low();
            rprintln!("spin done");
        } else {
            // Servo drifts unless the pulse is refreshed every frame.
            servo.hold(CENTER_ANGLE, HOLD_FRAMES)?;
        }
    }
}
