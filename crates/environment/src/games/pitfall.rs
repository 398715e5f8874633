use super::{decimal_score, read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const SCORE_LOW: u8 = 0xD7;
const SCORE_MID: u8 = 0xD6;
const SCORE_HIGH: u8 = 0xD5;
const LIVES: u8 = 0x80;
const DEATH_TIMER: u8 = 0x9E;
const STARTING_SCORE: Reward = 2000;

/// Pitfall Harry starts with 2000 points and loses some on every hazard.
#[derive(Debug, Clone)]
pub struct Pitfall {
    reward: Reward,
    score: Reward,
    terminal: bool,
    lives: i32,
}

impl Default for Pitfall {
    fn default() -> Self {
        Self {
            reward: 0,
            score: STARTING_SCORE,
            terminal: false,
            lives: 3,
        }
    }
}

impl Pitfall {
    pub fn new() -> Self {
        Self::default()
    }
}

// Spare lives are shown as tally marks in the high nibble.
fn lives_from_nibble(nibble: u8) -> i32 {
    match nibble {
        0xA => 3,
        0x8 => 2,
        _ => 1,
    }
}

impl TitleAdapter for Pitfall {
    fn name(&self) -> &'static str {
        "pitfall"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let score = decimal_score(mem, &[SCORE_LOW, SCORE_MID, SCORE_HIGH]);
        self.reward = score - self.score;
        self.score = score;

        let nibble = read_ram(mem, LIVES) >> 4;
        self.lives = lives_from_nibble(nibble);
        // Last life gone: the death sequence runs with no tally marks left.
        self.terminal = nibble == 0 && read_ram(mem, DEATH_TIMER) != 0;
    }

    fn reward(&self) -> Reward {
        self.reward
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn is_minimal(&self, action: Action) -> bool {
        action.is_player_a()
    }

    fn lives(&self) -> i32 {
        self.lives
    }

    fn starting_actions(&self) -> Vec<Action> {
        vec![Action::PlayerAUp]
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

#[cfg(test)]
mod tests {
    use super::*;

    struct Ram([u8; 128]);

    impl MemoryView for Ram {
        fn peek(&self, address: u16) -> u8 {
            self.0[usize::from(address & 0x7F)]
        }
    }

    fn fresh_game() -> Ram {
        let mut ram = Ram([0; 128]);
        ram.0[0x00] = 0xA0;
        ram.0[0x56] = 0x20;
        ram
    }

    #[test]
    fn test_starting_score_gives_no_reward() {
        let mut pitfall = Pitfall::new();
        let mut ram = fresh_game();
        pitfall.step(&ram);
        assert_eq!(pitfall.reward(), 0);
        assert_eq!(pitfall.lives(), 3);

        ram.0[0x56] = 0x19;
        ram.0[0x57] = 0x00;
        pitfall.step(&ram);
        assert_eq!(pitfall.reward(), -100);
    }

    #[test]
    fn test_last_life() {
        let mut pitfall = Pitfall::new();
        let mut ram = fresh_game();
        ram.0[0x00] = 0x00;
        pitfall.step(&ram);
        assert_eq!(pitfall.lives(), 1);
        assert!(!pitfall.is_terminal());
        ram.0[0x1E] = 4;
        pitfall.step(&ram);
        assert!(pitfall.is_terminal());
    }

    #[test]
    fn test_starts_by_pressing_up() {
        assert_eq!(Pitfall::new().starting_actions(), vec![Action::PlayerAUp]);
    }
}
