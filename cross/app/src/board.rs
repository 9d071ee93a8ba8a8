#![deny(unsafe_code)]

use crate::error::Error;

use board::{Button, Led, ServoDelay, ServoPin};
use pulse_servo::{Config, Servo};
use rtt_target::rprintln;
use stm32f1xx_hal::pac;
use stm32f1xx_hal::prelude::*;

const STEP_DELAY_MS: i32 = 15;

pub type SweepServo = Servo<ServoPin, ServoDelay>;

pub struct Board {
    pub servo: SweepServo,
    pub led: Led,
    pub button: Button,
}

impl Board {
    pub fn new(cp: pac::CorePeripherals, dp: pac::Peripherals) -> Result<Self, Error> {
        // Configure the clock.
        let mut flash = dp.FLASH.constrain();
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(64.MHz()).freeze(&mut flash.acr);

        let mut afio = dp.AFIO.constrain();

        // Acquire the GPIO peripherals.
        let mut gpioa = dp.GPIOA.split();
        let mut gpiob = dp.GPIOB.split();

        // Disable JTAG to get PB3 (mistake in board design)
        let (_, pb3, _) = afio.mapr.disable_jtag(gpioa.pa15, gpiob.pb3, gpiob.pb4);

        let led: Led = pb3.into_push_pull_output(&mut gpiob.crl);
        let button: Button = gpiob.pb5.into_pull_down_input(&mut gpiob.crl);

        let servo_pin: ServoPin = gpioa.pa8.into_push_pull_output(&mut gpioa.crh);
        // SysTick is busy-waited for both the pulse and the step pauses.
        let delay: ServoDelay = cp.SYST.delay(&clocks);

        let mut servo = Servo::with_config(servo_pin, delay, Config::new().strict());
        servo.set_step_delay(STEP_DELAY_MS)?;
        rprintln!("servo {}", servo.get_config());

        Ok(Board { servo, led, button })
    }
}
