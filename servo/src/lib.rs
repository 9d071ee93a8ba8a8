//! Bit-banged driver for a single analog servo on a digital output line.
//!
//! Each [`Servo::go_to`] emits exactly one pulse. Analog servos expect the
//! pulse to repeat every 20 ms to keep holding their position; repeating it
//! is the caller's job, either by calling `go_to` again, from a timer, or
//! with [`Servo::hold`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

use core::fmt::{Display, Formatter};

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::digital::v2::OutputPin;
use fugit::MicrosDurationU32;
use num::ToPrimitive;

pub const MIN_ANGLE: f32 = 0.0;
pub const MAX_ANGLE: f32 = 180.0;

// The servo over-travels: commanding 150 degrees already reaches the
// physical 180 degree stop, so commands are compressed into [0, 150].
pub const CALIBRATED_MAX_ANGLE: f32 = 150.0;

// 500 us is 0 degrees, 2500 us is 180 degrees before calibration.
pub const MIN_PULSE_US: f32 = 500.0;
pub const PULSE_SPAN_US: f32 = 2000.0;

pub const DEFAULT_STEP_DELAY_MS: i32 = 25;

/// Standard 50 Hz servo refresh period.
pub const FRAME_PERIOD: MicrosDurationU32 = MicrosDurationU32::millis(20);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Error<E> {
    Pin(E),
    InvalidAngle,
    InvalidDelay,
}

impl<E> From<E> for Error<E> {
    fn from(pin_error: E) -> Self {
        Error::Pin(pin_error)
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Pin(error) => error.fmt(f),
            Error::InvalidAngle => f.pad("angle out of range"),
            Error::InvalidDelay => f.pad("negative step delay"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Any angle and delay is accepted and passed through the arithmetic.
    Permissive,
    /// Angles outside [0, 180] and negative delays are rejected.
    Strict,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.pad(match *self {
            Mode::Permissive => "permissive",
            Mode::Strict => "strict",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    pub step_delay_ms: i32,
    pub mode: Mode,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            mode: Mode::Permissive,
        }
    }

    pub const fn step_delay_ms(self, step_delay_ms: i32) -> Self {
        Self {
            step_delay_ms,
            ..self
        }
    }

    pub const fn strict(self) -> Self {
        Self {
            mode: Mode::Strict,
            ..self
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "step delay {} ms, {}", self.step_delay_ms, self.mode)
    }
}

/// Converts an angle in degrees into the pulse width in microseconds.
///
/// Inputs are not clamped. 0 maps to 500 us, 180 maps to 2166 us because of
/// the calibration compression. The fractional part is truncated.
pub fn pulse_width_us(angle: f32) -> i32 {
    let us_per_degree = PULSE_SPAN_US / MAX_ANGLE;
    let compensated = angle * (CALIBRATED_MAX_ANGLE / MAX_ANGLE);

    (us_per_degree * compensated + MIN_PULSE_US) as i32
}

pub struct Servo<PIN, DELAY> {
    pin: PIN,
    delay: DELAY,
    config: Config,
}

impl<PIN, DELAY> Servo<PIN, DELAY> {
    pub fn new(pin: PIN, delay: DELAY) -> Self {
        Self::with_config(pin, delay, Config::default())
    }

    pub fn with_config(pin: PIN, delay: DELAY, config: Config) -> Self {
        Servo { pin, delay, config }
    }

    pub fn get_config(&self) -> Config {
        self.config
    }

    /// Returns the pause between sweep steps in milliseconds.
    pub fn get_step_delay(&self) -> i32 {
        self.config.step_delay_ms
    }

    pub fn release(self) -> (PIN, DELAY) {
        (self.pin, self.delay)
    }
}

impl<PIN, DELAY, E> Servo<PIN, DELAY>
where
    PIN: OutputPin<Error = E>,
    DELAY: DelayUs<u32> + DelayMs<u32>,
{
    pub fn set_step_delay(&mut self, step_delay_ms: i32) -> Result<(), Error<E>> {
        self.check_delay(step_delay_ms)?;
        self.config.step_delay_ms = step_delay_ms;

        Ok(())
    }

    /// Emits a single pulse for `angle`, blocking for the whole pulse.
    ///
    /// The driver keeps no position, so repeating the same angle repeats
    /// the same pulse.
    pub fn go_to(&mut self, angle: f32) -> Result<(), Error<E>> {
        self.check_angle(angle)?;
        self.pulse(pulse_width_us(angle))
    }

    /// Emits `frames` pulses for `angle`, one per 20 ms frame.
    pub fn hold(&mut self, angle: f32, frames: u32) -> Result<(), Error<E>> {
        self.check_angle(angle)?;

        let width = pulse_width_us(angle);
        let idle = FRAME_PERIOD
            .ticks()
            .saturating_sub(width.to_u32().unwrap_or(0));

        for _ in 0..frames {
            self.pulse(width)?;
            self.delay.delay_us(idle);
        }

        Ok(())
    }

    /// Steps one degree at a time from `from` to `to`, both inclusive,
    /// pausing for the step delay after every pulse.
    pub fn sweep(&mut self, from: i32, to: i32) -> Result<(), Error<E>> {
        self.check_angle(from as f32)?;
        self.check_angle(to as f32)?;
        // A strict config may still carry a negative delay from with_config().
        self.check_delay(self.config.step_delay_ms)?;

        let step = if to >= from { 1 } else { -1 };
        let mut angle = from;

        loop {
            self.go_to(angle as f32)?;
            self.pause();

            if angle == to {
                break;
            }
            angle += step;
        }

        Ok(())
    }

    /// Full sweep 0 to 180 and back, 362 pulses in total.
    pub fn spin(&mut self) -> Result<(), Error<E>> {
        self.sweep(0, MAX_ANGLE as i32)?;
        self.sweep(MAX_ANGLE as i32, 0)
    }

    fn pulse(&mut self, width_us: i32) -> Result<(), Error<E>> {
        self.pin.set_high()?;
        // Negative widths degrade to an immediate falling edge.
        self.delay.delay_us(width_us.to_u32().unwrap_or(0));
        self.pin.set_low()?;

        Ok(())
    }

    fn pause(&mut self) {
        let ms = self.config.step_delay_ms.to_u32().unwrap_or(0);
        self.delay.delay_ms(ms);
    }

    fn check_angle(&self, angle: f32) -> Result<(), Error<E>> {
        if self.config.mode == Mode::Strict && !(MIN_ANGLE..=MAX_ANGLE).contains(&angle) {
            return Err(Error::InvalidAngle);
        }

        Ok(())
    }

    fn check_delay(&self, step_delay_ms: i32) -> Result<(), Error<E>> {
        if self.config.mode == Mode::Strict && step_delay_ms < 0 {
            return Err(Error::InvalidDelay);
        }

        Ok(())
    }
}
