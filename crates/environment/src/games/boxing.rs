use super::{decimal_score, read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const MY_SCORE: u8 = 0x92;
const OPPONENT_SCORE: u8 = 0x93;
const CLOCK_MINUTES: u8 = 0x90;
const CLOCK_SECONDS: u8 = 0x91;
/// Score byte shown as "KO".
const KNOCKOUT: u8 = 0xC0;
const KNOCKOUT_POINTS: Reward = 100;

/// Boxing: reward is the change in punch difference; a knockout or the end of
/// the two minute round finishes the episode.
#[derive(Debug, Clone, Default)]
pub struct Boxing {
    reward: Reward,
    score: Reward,
    terminal: bool,
}

impl Boxing {
    pub fn new() -> Self {
        Self::default()
    }
}

fn points(mem: &dyn MemoryView, offset: u8) -> Reward {
    if read_ram(mem, offset) == KNOCKOUT {
        KNOCKOUT_POINTS
    } else {
        decimal_score(mem, &[offset])
    }
}

impl TitleAdapter for Boxing {
    fn name(&self) -> &'static str {
        "boxing"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let mine = points(mem, MY_SCORE);
        let theirs = points(mem, OPPONENT_SCORE);
        let score = mine - theirs;
        self.reward = score - self.score;
        self.score = score;

        let clock_out = read_ram(mem, CLOCK_MINUTES) == 0 && read_ram(mem, CLOCK_SECONDS) == 0;
        self.terminal = mine == KNOCKOUT_POINTS || theirs == KNOCKOUT_POINTS || clock_out;
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
