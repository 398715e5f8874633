use super::{read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const CPU_SCORE: u8 = 13;
const PLAYER_SCORE: u8 = 14;
const WINNING_SCORE: u8 = 21;

/// Pong: the reward is the change in point difference against the computer.
#[derive(Debug, Clone, Default)]
pub struct Pong {
    reward: Reward,
    score: Reward,
    terminal: bool,
}

impl Pong {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleAdapter for Pong {
    fn name(&self) -> &'static str {
        "pong"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let cpu = read_ram(mem, CPU_SCORE);
        let player = read_ram(mem, PLAYER_SCORE);
        let score = Reward::from(player) - Reward::from(cpu);
        self.reward = score - self.score;
        self.score = score;
        self.terminal = cpu == WINNING_SCORE || player == WINNING_SCORE;
    }

    fn reward(&self) -> Reward {
        self.reward
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn is_minimal(&self, action: Action) -> bool {
        matches!(
            action,
            Action::PlayerANoop | Action::PlayerARight | Action::PlayerALeft
        )
    }

    fn max_frames(&self) -> u64 {
        65000
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn save_state(&self, out: &mut ArchiveWriter) {
        out.write(&self.reward).write(&self.score).write(&self.terminal);
    }

    fn load_state(&mut self, input: &mut ArchiveReader<'_>) -> Result<(), ArchiveError> {
        self.reward = input.read()?;
        self.score = input.read()?;
        self.terminal = input.read()?;
        Ok(())
    }
}
