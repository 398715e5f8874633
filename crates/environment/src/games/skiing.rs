use super::{decimal_score, read_ram, TitleAdapter};
use crate::action::Action;
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

const CENTISECONDS_LOW: u8 = 0xEA;
const CENTISECONDS_HIGH: u8 = 0xE9;
const MINUTES: u8 = 0xE8;
const END_FLAG: u8 = 0x91;

/// Skiing is scored on elapsed time, so every step costs the centiseconds that
/// passed. The skier has no button.
#[derive(Debug, Clone, Default)]
pub struct Skiing {
    reward: Reward,
    elapsed: Reward,
    terminal: bool,
}

impl Skiing {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TitleAdapter for Skiing {
    fn name(&self) -> &'static str {
        "skiing"
    }

    fn step(&mut self, mem: &dyn MemoryView) {
        let centiseconds = decimal_score(mem, &[CENTISECONDS_LOW, CENTISECONDS_HIGH]);
        let minutes = Reward::from(read_ram(mem, MINUTES));
        let elapsed = minutes * 6000 + centiseconds;
        self.reward = self.elapsed - elapsed;
        self.elapsed = elapsed;
        self.terminal = read_ram(mem, END_FLAG) == 0xFF;
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

    fn is_legal(&self, action: Action) -> bool {
        !action.joystick().fire
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn save_state(&self, out: &mut ArchiveWriter) {
        out.write(&self.reward).write(&self.elapsed).write(&self.terminal);
    }

    fn load_state(&mut self, input: &mut ArchiveReader<'_>) -> Result<(), ArchiveError> {
        self.reward = input.read()?;
        self.elapsed = input.read()?;
        self.terminal = input.read()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ActionSets;

    struct Ram([u8; 128]);

    impl MemoryView for Ram {
        fn peek(&self, address: u16) -> u8 {
            self.0[usize::from(address & 0x7F)]
        }
    }

    #[test]
    fn test_time_is_a_penalty() {
        let mut skiing = Skiing::new();
        let mut ram = Ram([0; 128]);
        ram.0[0x6A] = 0x50;
        skiing.step(&ram);
        assert_eq!(skiing.reward(), -50);

        ram.0[0x68] = 1;
        ram.0[0x69] = 0x01;
        ram.0[0x6A] = 0x00;
        skiing.step(&ram);
        assert_eq!(skiing.reward(), -(6100 - 50));
    }

    #[test]
    fn test_fire_is_illegal() {
        let sets = ActionSets::new(&Skiing::new());
        assert_eq!(sets.legal().len(), 9);
        assert!(!sets.legal().contains(&Action::PlayerAFire));
        assert!(sets.legal().contains(&Action::PlayerADownLeft));
    }

    #[test]
    fn test_finish_line() {
        let mut skiing = Skiing::new();
        let mut ram = Ram([0; 128]);
        ram.0[0x11] = 0xFF;
        skiing.step(&ram);
        assert!(skiing.is_terminal());
    }
}
