use super::{decimal_score, read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const SCORE_LOW: u8 = 0xE8;
const SCORE_HIGH: u8 = 0xE6;
const LIVES: u8 = 0xC9;
const GAME_FLAGS: u8 = 0x98;
/// The four digit counter rolls over past this value.
const SCORE_WRAP: Reward = 10000;

#[derive(Debug, Clone, Default)]
pub struct SpaceInvaders {
    reward: Reward,
    score: Reward,
    terminal: bool,
    lives: i32,
}

impl SpaceInvaders {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleAdapter for SpaceInvaders {
    fn name(&self) -> &'static str {
        "space_invaders"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let score = decimal_score(mem, &[SCORE_LOW, SCORE_HIGH]);
        let mut reward = score - self.score;
        if reward < 0 {
            reward += SCORE_WRAP;
        }
        self.reward = reward;
        self.score = score;

        self.lives = i32::from(read_ram(mem, LIVES));
        let game_over = read_ram(mem, GAME_FLAGS) & 0x80 != 0;
        self.terminal = game_over || self.lives == 0;
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
            Action::PlayerANoop
                | Action::PlayerALeft
                | Action::PlayerARight
                | Action::PlayerAFire
                | Action::PlayerALeftFire
                | Action::PlayerARightFire
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
            .write(&self.lives);
    }

    fn load_state(&mut self, input: &mut ArchiveReader<'_>) -> Result<(), ArchiveError> {
        self.reward = input.read()?;
        self.score = input.read()?;
        self.terminal = input.read()?;
        self.lives = input.read()?;
        Ok(())
    }
}
