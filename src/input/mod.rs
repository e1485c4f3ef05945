//! # Input Vocabulary Module
//!
//! The closed set of logical gamepad inputs padcmd can bind, and their
//! mapping to and from configuration strings.
//!
//! ## Configuration Names
//!
//! | Name | Input |
//! |------|-------|
//! | `a`, `b`, `x`, `y` | Face buttons |
//! | `leftshoulder`, `rightshoulder` | Shoulder buttons (L1/R1) |
//! | `lefttrigger`, `righttrigger` | Trigger axes (L2/R2, analog) |
//! | `up`, `down`, `left`, `right` | D-pad |
//! | `start`, `back`, `guide` | System buttons |
//! | `leftstick`, `rightstick` | Stick clicks (L3/R3) |
//!
//! Face button names follow the Xbox layout: `a` is the bottom button,
//! `b` right, `x` left, `y` top.

use std::fmt;
use std::str::FromStr;

use crate::error::{PadcmdError, Result};

/// A named gamepad button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    Guide,
    LeftStick,
    RightStick,
}

/// A named analog trigger axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadAxis {
    LeftTrigger,
    RightTrigger,
}

/// One logical input a mapping can require: a button or a trigger axis.
///
/// A button is active while pressed; an axis is active while its reading is
/// away from rest by more than the configured threshold.
///
/// # Examples
///
/// ```
/// use padcmd::input::{PadButton, PadInput};
///
/// let input: PadInput = "leftshoulder".parse()?;
/// assert_eq!(input, PadInput::Button(PadButton::LeftShoulder));
/// assert!("fire".parse::<PadInput>().is_err());
/// # Ok::<(), padcmd::error::PadcmdError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadInput {
    Button(PadButton),
    Axis(PadAxis),
}

/// Every recognized input, in vocabulary order.
///
/// Used by tests to enumerate the vocabulary; matching itself never iterates
/// this list.
pub const ALL_INPUTS: [PadInput; 17] = [
    PadInput::Button(PadButton::A),
    PadInput::Button(PadButton::B),
    PadInput::Button(PadButton::X),
    PadInput::Button(PadButton::Y),
    PadInput::Button(PadButton::LeftShoulder),
    PadInput::Button(PadButton::RightShoulder),
    PadInput::Axis(PadAxis::LeftTrigger),
    PadInput::Axis(PadAxis::RightTrigger),
    PadInput::Button(PadButton::DpadUp),
    PadInput::Button(PadButton::DpadDown),
    PadInput::Button(PadButton::DpadLeft),
    PadInput::Button(PadButton::DpadRight),
    PadInput::Button(PadButton::Start),
    PadInput::Button(PadButton::Back),
    PadInput::Button(PadButton::Guide),
    PadInput::Button(PadButton::LeftStick),
    PadInput::Button(PadButton::RightStick),
];

impl FromStr for PadInput {
    type Err = PadcmdError;

    /// Parse a configuration name into a logical input.
    ///
    /// Total over the fixed vocabulary; every other string fails with
    /// [`PadcmdError::UnknownInput`].
    fn from_str(name: &str) -> Result<Self> {
        use PadButton::*;
        use PadInput::{Axis, Button};

        match name {
            "a" => Ok(Button(A)),
            "b" => Ok(Button(B)),
            "x" => Ok(Button(X)),
            "y" => Ok(Button(Y)),
            "leftshoulder" => Ok(Button(LeftShoulder)),
            "rightshoulder" => Ok(Button(RightShoulder)),
            "lefttrigger" => Ok(Axis(PadAxis::LeftTrigger)),
            "righttrigger" => Ok(Axis(PadAxis::RightTrigger)),
            "up" => Ok(Button(DpadUp)),
            "down" => Ok(Button(DpadDown)),
            "left" => Ok(Button(DpadLeft)),
            "right" => Ok(Button(DpadRight)),
            "start" => Ok(Button(Start)),
            "back" => Ok(Button(Back)),
            "guide" => Ok(Button(Guide)),
            "leftstick" => Ok(Button(LeftStick)),
            "rightstick" => Ok(Button(RightStick)),
            other => Err(PadcmdError::UnknownInput(other.to_string())),
        }
    }
}

impl fmt::Display for PadInput {
    /// Format as the canonical configuration name (inverse of `from_str`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PadButton::*;

        let name = match self {
            PadInput::Button(A) => "a",
            PadInput::Button(B) => "b",
            PadInput::Button(X) => "x",
            PadInput::Button(Y) => "y",
            PadInput::Button(LeftShoulder) => "leftshoulder",
            PadInput::Button(RightShoulder) => "rightshoulder",
            PadInput::Axis(PadAxis::LeftTrigger) => "lefttrigger",
            PadInput::Axis(PadAxis::RightTrigger) => "righttrigger",
            PadInput::Button(DpadUp) => "up",
            PadInput::Button(DpadDown) => "down",
            PadInput::Button(DpadLeft) => "left",
            PadInput::Button(DpadRight) => "right",
            PadInput::Button(Start) => "start",
            PadInput::Button(Back) => "back",
            PadInput::Button(Guide) => "guide",
            PadInput::Button(LeftStick) => "leftstick",
            PadInput::Button(RightStick) => "rightstick",
        };
        f.write_str(name)
    }
}

/// A per-device snapshot answering activity queries for any logical input.
///
/// The matching engine only ever borrows an implementation for the duration
/// of one scan; it never retains device state. Inputs a device cannot report
/// simply read as inactive.
pub trait InputState {
    /// Is this input currently active on the device?
    ///
    /// Button: currently pressed. Axis: magnitude away from rest exceeds the
    /// configured threshold.
    fn is_active(&self, input: PadInput) -> bool;
}
