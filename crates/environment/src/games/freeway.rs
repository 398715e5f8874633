use super::{decimal_score, read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const SCORE: u8 = 103;
const TIMER: u8 = 22;

/// Freeway: one point per crossing, episode ends when the timer expires.
#[derive(Debug, Clone, Default)]
pub struct Freeway {
    reward: Reward,
    score: Reward,
    terminal: bool,
}

impl Freeway {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleAdapter for Freeway {
    fn name(&self) -> &'static str {
        "freeway"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let score = decimal_score(mem, &[SCORE]);
        // The score display is cleared at game over.
        self.reward = (score - self.score).max(0);
        self.score = score;
        self.terminal = read_ram(mem, TIMER) == 1;
    }

    fn reward(&self) -> Reward {
        self.reward
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn min_reward(&self) -> Reward {
        0
    }

    fn is_minimal(&self, action: Action) -> bool {
        matches!(
            action,
            Action::PlayerANoop | Action::PlayerAUp | Action::PlayerADown
        )
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
