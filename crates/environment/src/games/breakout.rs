use super::{read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const SCORE_LOW: u8 = 77;
const SCORE_HIGH: u8 = 76;
const LIVES: u8 = 57;
const STARTING_LIVES: i32 = 5;

/// Breakout. The lives byte reads 0 before the first serve, so the episode
/// only counts as over once a full set of lives has been seen.
#[derive(Debug, Clone)]
pub struct Breakout {
    reward: Reward,
    score: Reward,
    terminal: bool,
    started: bool,
    lives: i32,
}

impl Default for Breakout {
    fn default() -> Self {
        Self {
            reward: 0,
            score: 0,
            terminal: false,
            started: false,
            lives: STARTING_LIVES,
        }
    }
}

impl Breakout {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleAdapter for Breakout {
    fn name(&self) -> &'static str {
        "breakout"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let low = read_ram(mem, SCORE_LOW);
        let high = read_ram(mem, SCORE_HIGH);
        let score = Reward::from(low & 0x0F)
            + 10 * Reward::from(low >> 4)
            + 100 * Reward::from(high & 0x0F);
        self.reward = score - self.score;
        self.score = score;

        let lives = i32::from(read_ram(mem, LIVES));
        if !self.started && lives == STARTING_LIVES {
            self.started = true;
        }
        self.terminal = self.started && lives == 0;
        self.lives = lives;
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
            Action::PlayerANoop | Action::PlayerAFire | Action::PlayerARight | Action::PlayerALeft
        )
    }

    fn lives(&self) -> i32 {
        self.lives
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn save_state(&self, out: &mut ArchiveWriter) {
        out.write(&self.reward)
            .write(&self.score)
            .write(&self.terminal)
            .write(&self.started)
            .write(&self.lives);
    }

    fn load_state(&mut self, input: &mut ArchiveReader<'_>) -> Result<(), ArchiveError> {
        self.reward = input.read()?;
        self.score = input.read()?;
        self.terminal = input.read()?;
        self.started = input.read()?;
        self.lives = input.read()?;
        Ok(())
    }
}
