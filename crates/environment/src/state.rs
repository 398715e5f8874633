//! Controller positions, frame counters and captured machine snapshots.

use crate::action::Action;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter, Decode, Encode};
use ale_core::input::{AnalogInput, ConsoleSwitches, DigitalInput};

/// Paddle movement per tick.
pub const PADDLE_DELTA: i32 = 23000;
pub const PADDLE_MIN: i32 = 27450;
pub const PADDLE_MAX: i32 = 790196;
pub const PADDLE_DEFAULT: i32 = (PADDLE_MAX - PADDLE_MIN) / 2 + PADDLE_MIN;

/// Controller state and frame bookkeeping owned by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    left_paddle: i32,
    right_paddle: i32,
    frame_number: u64,
    episode_frame_number: u64,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            left_paddle: PADDLE_DEFAULT,
            right_paddle: PADDLE_DEFAULT,
            frame_number: 0,
            episode_frame_number: 0,
        }
    }
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new episode. The global frame counter is kept.
    pub fn reset_episode(&mut self) {
        self.left_paddle = PADDLE_DEFAULT;
        self.right_paddle = PADDLE_DEFAULT;
        self.episode_frame_number = 0;
    }

    pub fn increment_frames(&mut self, frames: u64) {
        self.frame_number += frames;
        self.episode_frame_number += frames;
    }

    pub fn left_paddle(&self) -> i32 {
        self.left_paddle
    }

    pub fn right_paddle(&self) -> i32 {
        self.right_paddle
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn episode_frame_number(&self) -> u64 {
        self.episode_frame_number
    }

    /// Move both paddles one tick and return the input to latch.
    ///
    /// Player A drives the left paddle, player B the right one.
    pub fn paddle_input(&mut self, a: Action, b: Action) -> AnalogInput {
        let mut input = AnalogInput {
            switches: switches_for(a, b),
            ..Default::default()
        };

        if a.is_player_a() {
            self.left_paddle = move_paddle(self.left_paddle, a);
            input.left_fire = a.joystick().fire;
        }
        if b.is_player_b() {
            self.right_paddle = move_paddle(self.right_paddle, b);
            input.right_fire = b.joystick().fire;
        }

        input.left_resistance = self.left_paddle;
        input.right_resistance = self.right_paddle;
        input
    }

    /// Joystick state for the two ports. Actions outside a player's own
    /// block press nothing on that port.
    pub fn joystick_input(&self, a: Action, b: Action) -> DigitalInput {
        let mut input = DigitalInput {
            switches: switches_for(a, b),
            ..Default::default()
        };
        if a.is_player_a() {
            input.player_a = a.joystick();
        }
        if b.is_player_b() {
            input.player_b = b.joystick();
        }
        input
    }
}

fn move_paddle(position: i32, action: Action) -> i32 {
    (position + action.paddle_direction() * PADDLE_DELTA).clamp(PADDLE_MIN, PADDLE_MAX)
}

fn switches_for(a: Action, b: Action) -> ConsoleSwitches {
    ConsoleSwitches {
        reset: a == Action::Reset || b == Action::Reset,
        select: a == Action::Select || b == Action::Select,
    }
}

/// Point-in-time copy of the whole environment.
///
/// The payload holds the core's state blob followed by the title adapter's
/// bookkeeping. A snapshot can only be restored into an environment running
/// the same cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSnapshot {
    controllers: ControllerState,
    cartridge_md5: String,
    payload: Vec<u8>,
}

impl MachineSnapshot {
    pub(crate) fn new(controllers: ControllerState, cartridge_md5: String, payload: Vec<u8>) -> Self {
        Self {
            controllers,
            cartridge_md5,
            payload,
        }
    }

    pub fn left_paddle(&self) -> i32 {
        self.controllers.left_paddle
    }

    pub fn right_paddle(&self) -> i32 {
        self.controllers.right_paddle
    }

    pub fn frame_number(&self) -> u64 {
        self.controllers.frame_number
    }

    pub fn episode_frame_number(&self) -> u64 {
        self.controllers.episode_frame_number
    }

    pub fn cartridge_md5(&self) -> &str {
        &self.cartridge_md5
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub(crate) fn controllers(&self) -> ControllerState {
        self.controllers
    }

    /// Serialize into the binary archive format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = ArchiveWriter::new();
        out.write(self);
        out.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArchiveError> {
        ArchiveReader::new(bytes).read()
    }
}

impl Encode for MachineSnapshot {
    fn encode(&self, out: &mut ArchiveWriter) {
        out.write(&self.controllers.left_paddle)
            .write(&self.controllers.right_paddle)
            .write(&self.controllers.frame_number)
            .write(&self.controllers.episode_frame_number)
            .write(self.cartridge_md5.as_str())
            .write_bytes(&self.payload);
    }
}

impl Decode for MachineSnapshot {
    fn decode(input: &mut ArchiveReader<'_>) -> Result<Self, ArchiveError> {
        let controllers = ControllerState {
            left_paddle: input.read()?,
            right_paddle: input.read()?,
            frame_number: input.read()?,
            episode_frame_number: input.read()?,
        };
        let cartridge_md5 = input.read()?;
        let payload = input.read_bytes()?;
        Ok(Self {
            controllers,
            cartridge_md5,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action::*;

    #[test]
    fn test_default_paddles_centered() {
        let state = ControllerState::new();
        assert_eq!(state.left_paddle(), 408823);
        assert_eq!(state.right_paddle(), PADDLE_DEFAULT);
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut state = ControllerState::new();
        let input = state.paddle_input(PlayerARight, PlayerBLeftFire);
        assert_eq!(input.left_resistance, PADDLE_DEFAULT - PADDLE_DELTA);
        assert_eq!(input.right_resistance, PADDLE_DEFAULT + PADDLE_DELTA);
        assert!(!input.left_fire);
        assert!(input.right_fire);

        for _ in 0..100 {
            state.paddle_input(PlayerARight, PlayerBLeft);
        }
        assert_eq!(state.left_paddle(), PADDLE_MIN);
        assert_eq!(state.right_paddle(), PADDLE_MAX);
    }

    #[test]
    fn test_paddle_ignores_foreign_block() {
        let mut state = ControllerState::new();
        let input = state.paddle_input(PlayerBLeft, PlayerARight);
        assert_eq!(input.left_resistance, PADDLE_DEFAULT);
        assert_eq!(input.right_resistance, PADDLE_DEFAULT);
    }

    #[test]
    fn test_joystick_input_and_switches() {
        let state = ControllerState::new();
        let input = state.joystick_input(PlayerAUpFire, PlayerBDown);
        assert!(input.player_a.up && input.player_a.fire);
        assert!(input.player_b.down);
        assert!(!input.switches.reset);

        let input = state.joystick_input(Reset, PlayerBNoop);
        assert!(input.switches.reset);
        assert!(input.player_a.is_released());

        let input = state.joystick_input(Select, PlayerBNoop);
        assert!(input.switches.select);
    }

    #[test]
    fn test_reset_episode_keeps_global_counter() {
        let mut state = ControllerState::new();
        state.paddle_input(PlayerALeft, PlayerBNoop);
        state.increment_frames(5);
        state.reset_episode();
        assert_eq!(state.frame_number(), 5);
        assert_eq!(state.episode_frame_number(), 0);
        assert_eq!(state.left_paddle(), PADDLE_DEFAULT);
    }

    #[test]
    fn test_snapshot_byte_layout() {
        let mut controllers = ControllerState::new();
        controllers.increment_frames(3);
        let snapshot = MachineSnapshot::new(controllers, "abc".to_string(), vec![9, 8]);
        let bytes = snapshot.to_bytes();

        let mut expected = Vec::new();
        expected.extend_from_slice(&PADDLE_DEFAULT.to_ne_bytes());
        expected.extend_from_slice(&PADDLE_DEFAULT.to_ne_bytes());
        expected.extend_from_slice(&3u64.to_ne_bytes());
        expected.extend_from_slice(&3u64.to_ne_bytes());
        expected.extend_from_slice(&3u64.to_ne_bytes());
        expected.extend_from_slice(b"abc");
        expected.extend_from_slice(&2u64.to_ne_bytes());
        expected.extend_from_slice(&[9, 8]);
        assert_eq!(bytes, expected);

        assert_eq!(MachineSnapshot::from_bytes(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_truncated_snapshot_is_rejected() {
        let snapshot = MachineSnapshot::new(ControllerState::new(), "abc".into(), vec![1; 16]);
        let bytes = snapshot.to_bytes();
        assert!(matches!(
            MachineSnapshot::from_bytes(&bytes[..bytes.len() - 4]),
            Err(ArchiveError::UnexpectedEof { .. })
        ));
    }
}
