#![deny(unsafe_code)]

use core::convert::Infallible;

#[derive(Debug)]
pub enum Error {
    Servo(pulse_servo::Error<Infallible>),
}

impl From<pulse_servo::Error<Infallible>> for Error {
    fn from(servo_error: pulse_servo::Error<Infallible>) -> Self {
        Error::Servo(servo_error)
    }
}
