//! Action enumeration shared by agents, title adapters and the environment.
//!
//! The integer values are stable: player A owns `0..18`, player B owns the same
//! eighteen actions at `18..36`, and control values sit above both blocks.

use ale_core::input::Joystick;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of actions in one player block.
pub const PLAYER_ACTIONS: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum Action {
    PlayerANoop = 0,
    PlayerAFire = 1,
    PlayerAUp = 2,
    PlayerARight = 3,
    PlayerALeft = 4,
    PlayerADown = 5,
    PlayerAUpRight = 6,
    PlayerAUpLeft = 7,
    PlayerADownRight = 8,
    PlayerADownLeft = 9,
    PlayerAUpFire = 10,
    PlayerARightFire = 11,
    PlayerALeftFire = 12,
    PlayerADownFire = 13,
    PlayerAUpRightFire = 14,
    PlayerAUpLeftFire = 15,
    PlayerADownRightFire = 16,
    PlayerADownLeftFire = 17,
    PlayerBNoop = 18,
    PlayerBFire = 19,
    PlayerBUp = 20,
    PlayerBRight = 21,
    PlayerBLeft = 22,
    PlayerBDown = 23,
    PlayerBUpRight = 24,
    PlayerBUpLeft = 25,
    PlayerBDownRight = 26,
    PlayerBDownLeft = 27,
    PlayerBUpFire = 28,
    PlayerBRightFire = 29,
    PlayerBLeftFire = 30,
    PlayerBDownFire = 31,
    PlayerBUpRightFire = 32,
    PlayerBUpLeftFire = 33,
    PlayerBDownRightFire = 34,
    PlayerBDownLeftFire = 35,
    /// Console reset switch. Not accepted as a step action.
    Reset = 40,
    Undefined = 41,
    Random = 42,
    SaveState = 43,
    LoadState = 44,
    SystemReset = 45,
    /// Console select switch, used internally to pick game modes.
    Select = 46,
}

use Action::*;

/// Player A block in enumeration order.
pub const PLAYER_A_ACTIONS: [Action; 18] = [
    PlayerANoop,
    PlayerAFire,
    PlayerAUp,
    PlayerARight,
    PlayerALeft,
    PlayerADown,
    PlayerAUpRight,
    PlayerAUpLeft,
    PlayerADownRight,
    PlayerADownLeft,
    PlayerAUpFire,
    PlayerARightFire,
    PlayerALeftFire,
    PlayerADownFire,
    PlayerAUpRightFire,
    PlayerAUpLeftFire,
    PlayerADownRightFire,
    PlayerADownLeftFire,
];

/// Player B block in enumeration order.
pub const PLAYER_B_ACTIONS: [Action; 18] = [
    PlayerBNoop,
    PlayerBFire,
    PlayerBUp,
    PlayerBRight,
    PlayerBLeft,
    PlayerBDown,
    PlayerBUpRight,
    PlayerBUpLeft,
    PlayerBDownRight,
    PlayerBDownLeft,
    PlayerBUpFire,
    PlayerBRightFire,
    PlayerBLeftFire,
    PlayerBDownFire,
    PlayerBUpRightFire,
    PlayerBUpLeftFire,
    PlayerBDownRightFire,
    PlayerBDownLeftFire,
];

const CONTROL_ACTIONS: [Action; 7] = [Reset, Undefined, Random, SaveState, LoadState, SystemReset, Select];

// (up, down, left, right, fire) for each offset within a player block.
#[rustfmt::skip]
const JOYSTICK_TABLE: [(bool, bool, bool, bool, bool); 18] = [
    (false, false, false, false, false), // NOOP
    (false, false, false, false, true),  // FIRE
    (true,  false, false, false, false), // UP
    (false, false, false, true,  false), // RIGHT
    (false, false, true,  false, false), // LEFT
    (false, true,  false, false, false), // DOWN
    (true,  false, false, true,  false), // UPRIGHT
    (true,  false, true,  false, false), // UPLEFT
    (false, true,  false, true,  false), // DOWNRIGHT
    (false, true,  true,  false, false), // DOWNLEFT
    (true,  false, false, false, true),  // UPFIRE
    (false, false, false, true,  true),  // RIGHTFIRE
    (false, false, true,  false, true),  // LEFTFIRE
    (false, true,  false, false, true),  // DOWNFIRE
    (true,  false, false, true,  true),  // UPRIGHTFIRE
    (true,  false, true,  false, true),  // UPLEFTFIRE
    (false, true,  false, true,  true),  // DOWNRIGHTFIRE
    (false, true,  true,  false, true),  // DOWNLEFTFIRE
];

const BLOCK_NAMES: [&str; 18] = [
    "NOOP",
    "FIRE",
    "UP",
    "RIGHT",
    "LEFT",
    "DOWN",
    "UPRIGHT",
    "UPLEFT",
    "DOWNRIGHT",
    "DOWNLEFT",
    "UPFIRE",
    "RIGHTFIRE",
    "LEFTFIRE",
    "DOWNFIRE",
    "UPRIGHTFIRE",
    "UPLEFTFIRE",
    "DOWNRIGHTFIRE",
    "DOWNLEFTFIRE",
];

impl Action {
    /// Stable integer value.
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0..=17 => Some(PLAYER_A_ACTIONS[index as usize]),
            18..=35 => Some(PLAYER_B_ACTIONS[(index - PLAYER_ACTIONS) as usize]),
            40..=46 => Some(CONTROL_ACTIONS[(index - 40) as usize]),
            _ => None,
        }
    }

    pub fn is_player_a(self) -> bool {
        (0..PLAYER_ACTIONS).contains(&self.index())
    }

    pub fn is_player_b(self) -> bool {
        (PLAYER_ACTIONS..2 * PLAYER_ACTIONS).contains(&self.index())
    }

    /// Offset inside a player block, `None` for control actions.
    fn block_offset(self) -> Option<usize> {
        match self.index() {
            i @ 0..=17 => Some(i as usize),
            i @ 18..=35 => Some((i - PLAYER_ACTIONS) as usize),
            _ => None,
        }
    }

    /// The same move expressed in the player A block.
    pub fn as_player_a(self) -> Option<Self> {
        self.block_offset().map(|o| PLAYER_A_ACTIONS[o])
    }

    /// Joystick state for a player action; control actions press nothing.
    pub fn joystick(self) -> Joystick {
        match self.block_offset() {
            Some(o) => {
                let (up, down, left, right, fire) = JOYSTICK_TABLE[o];
                Joystick {
                    up,
                    down,
                    left,
                    right,
                    fire,
                }
            }
            None => Joystick::RELEASED,
        }
    }

    /// Paddle direction: `1` to move left, `-1` to move right, `0` otherwise.
    pub fn paddle_direction(self) -> i32 {
        let stick = self.joystick();
        if stick.right {
            -1
        } else if stick.left {
            1
        } else {
            0
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Reset => "RESET",
            Undefined => "UNDEFINED",
            Random => "RANDOM",
            SaveState => "SAVE_STATE",
            LoadState => "LOAD_STATE",
            SystemReset => "SYSTEM_RESET",
            Select => "SELECT",
            _ => match self.block_offset() {
                Some(o) => PLAYER_NAMES[usize::from(self.is_player_b())][o],
                None => "UNDEFINED",
            },
        }
    }
}

// Full names per block, so `name()` can hand out static strings.
const PLAYER_NAMES: [[&str; 18]; 2] = [
    [
        "PLAYER_A_NOOP",
        "PLAYER_A_FIRE",
        "PLAYER_A_UP",
        "PLAYER_A_RIGHT",
        "PLAYER_A_LEFT",
        "PLAYER_A_DOWN",
        "PLAYER_A_UPRIGHT",
        "PLAYER_A_UPLEFT",
        "PLAYER_A_DOWNRIGHT",
        "PLAYER_A_DOWNLEFT",
        "PLAYER_A_UPFIRE",
        "PLAYER_A_RIGHTFIRE",
        "PLAYER_A_LEFTFIRE",
        "PLAYER_A_DOWNFIRE",
        "PLAYER_A_UPRIGHTFIRE",
        "PLAYER_A_UPLEFTFIRE",
        "PLAYER_A_DOWNRIGHTFIRE",
        "PLAYER_A_DOWNLEFTFIRE",
    ],
    [
        "PLAYER_B_NOOP",
        "PLAYER_B_FIRE",
        "PLAYER_B_UP",
        "PLAYER_B_RIGHT",
        "PLAYER_B_LEFT",
        "PLAYER_B_DOWN",
        "PLAYER_B_UPRIGHT",
        "PLAYER_B_UPLEFT",
        "PLAYER_B_DOWNRIGHT",
        "PLAYER_B_DOWNLEFT",
        "PLAYER_B_UPFIRE",
        "PLAYER_B_RIGHTFIRE",
        "PLAYER_B_LEFTFIRE",
        "PLAYER_B_DOWNFIRE",
        "PLAYER_B_UPRIGHTFIRE",
        "PLAYER_B_UPLEFTFIRE",
        "PLAYER_B_DOWNRIGHTFIRE",
        "PLAYER_B_DOWNLEFTFIRE",
    ],
];

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Short move name without the player prefix (`"UPFIRE"`).
pub fn move_name(action: Action) -> Option<&'static str> {
    action.block_offset().map(|o| BLOCK_NAMES[o])
}
