//! Controller input handed to an emulation core.
//!
//! Two families of controllers exist: digital joysticks, whose state is
//! latched once and held, and analog paddles, whose resistance has to be
//! updated every tick while a paddle moves.

use serde::{Deserialize, Serialize};

/// Directions and button of one digital joystick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joystick {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl Joystick {
    /// No direction and no button pressed.
    pub const RELEASED: Joystick = Joystick {
        up: false,
        down: false,
        left: false,
        right: false,
        fire: false,
    };

    pub fn is_released(&self) -> bool {
        *self == Self::RELEASED
    }
}

/// Console front-panel switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSwitches {
    pub reset: bool,
    pub select: bool,
}

/// Full digital input state for both controller ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalInput {
    pub player_a: Joystick,
    pub player_b: Joystick,
    pub switches: ConsoleSwitches,
}

/// Full analog input state for both paddles.
///
/// Resistances are opaque positions in the paddle range; the core decides how
/// they translate into the potentiometer timing it emulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogInput {
    pub left_resistance: i32,
    pub right_resistance: i32,
    pub left_fire: bool,
    pub right_fire: bool,
    pub switches: ConsoleSwitches,
}
