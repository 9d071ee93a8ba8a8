#![no_std]
#![deny(unsafe_code)]

use stm32f1xx_hal::gpio::{Input, Output};
use stm32f1xx_hal::gpio::{PullDown, PushPull};
use stm32f1xx_hal::gpio::{PA8, PB3, PB5};
use stm32f1xx_hal::timer::SysDelay;

// Servo signal is bit-banged, so a plain GPIO output is enough.
pub type ServoPin = PA8<Output<PushPull>>;
pub type ServoDelay = SysDelay;

pub type Led = PB3<Output<PushPull>>;
pub type Button = PB5<Input<PullDown>>;
