//! Single-player facade with the conventions of the 0.4 library interface.

use crate::action::Action;
use crate::config::{EnvironmentConfig, SaveDiscipline};
use crate::environment::Environment;
use crate::error::Result;
use crate::state::MachineSnapshot;
use crate::Reward;
use ale_core::graphics::{IndexedPalette, NtscPalette};
use ale_core::types::{Ram, Screen};
use ale_core::EmulationCore;

pub const VERSION: (u32, u32) = (0, 4);

/// Agent-facing wrapper around an [`Environment`].
///
/// Colour averaging is always off and `save_state` keeps a single snapshot
/// that can be loaded any number of times.
pub struct AleInterface<C: EmulationCore> {
    environment: Environment<C>,
    max_num_frames: u64,
}

impl<C: EmulationCore> AleInterface<C> {
    pub fn new(core: C, rom_path: &str) -> Result<Self> {
        Self::with_config(core, rom_path, EnvironmentConfig::default())
    }

    /// Like [`AleInterface::new`], with `color_averaging` and
    /// `save_discipline` overridden.
    pub fn with_config(core: C, rom_path: &str, config: EnvironmentConfig) -> Result<Self> {
        let config = EnvironmentConfig {
            color_averaging: false,
            save_discipline: SaveDiscipline::LegacySingleton,
            ..config
        };
        let mut environment = Environment::new(core, rom_path, config)?;
        environment.reset();
        Ok(Self {
            environment,
            max_num_frames: 0,
        })
    }

    pub fn version() -> (u32, u32) {
        VERSION
    }

    pub fn reset_game(&mut self) {
        self.environment.reset();
    }

    /// True once the episode ended or ran for `max_num_frames` frames.
    pub fn game_over(&self) -> bool {
        self.environment.is_terminal()
            || (self.max_num_frames > 0
                && self.environment.episode_frame_number() >= self.max_num_frames)
    }

    pub fn act(&mut self, action: Action) -> Reward {
        self.environment.act(action, Action::PlayerBNoop)
    }

    pub fn legal_action_set(&self) -> Vec<Action> {
        self.environment.legal_action_set().to_vec()
    }

    pub fn minimal_action_set(&self) -> Vec<Action> {
        self.environment.minimal_action_set().to_vec()
    }

    pub fn frame_number(&self) -> u64 {
        self.environment.frame_number()
    }

    pub fn episode_frame_number(&self) -> u64 {
        self.environment.episode_frame_number()
    }

    /// Cap on the frames of each episode, 0 for none.
    pub fn set_max_num_frames(&mut self, frames: u64) {
        self.max_num_frames = frames;
    }

    pub fn min_reward(&self) -> Reward {
        self.environment.min_reward()
    }

    pub fn max_reward(&self) -> Reward {
        self.environment.max_reward()
    }

    pub fn lives(&self) -> i32 {
        self.environment.lives()
    }

    pub fn screen(&self) -> &Screen {
        self.environment.screen()
    }

    pub fn ram(&self) -> &Ram {
        self.environment.ram()
    }

    pub fn save_state(&mut self) {
        self.environment.save();
    }

    pub fn load_state(&mut self) -> Result<bool> {
        self.environment.load()
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        self.environment.clone_state()
    }

    pub fn restore_snapshot(&mut self, snapshot: &MachineSnapshot) -> Result<()> {
        self.environment.restore_state(snapshot)
    }

    /// RGB (`0x00RRGGBB`) of a screen pixel value.
    pub fn get_rgb(pixel: u8) -> u32 {
        NtscPalette.get_color(usize::from(pixel))
    }

    pub fn environment(&self) -> &Environment<C> {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment<C> {
        &mut self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action::*;
    use crate::testing::ToyCore;

    fn interface() -> AleInterface<ToyCore> {
        let config = EnvironmentConfig {
            random_seed: Some(3),
            color_averaging: true,
            ..Default::default()
        };
        AleInterface::with_config(ToyCore::new(), "pong.bin", config).unwrap()
    }

    #[test]
    fn test_facade_overrides_config() {
        let ale = interface();
        let config = ale.environment().config();
        assert!(!config.color_averaging);
        assert_eq!(config.save_discipline, SaveDiscipline::LegacySingleton);
        assert_eq!(config.random_seed, Some(3));
    }

    #[test]
    fn test_starts_reset() {
        let ale = interface();
        assert!(!ale.game_over());
        assert_eq!(ale.environment().core().ticks(), 64);
    }

    #[test]
    fn test_frame_cap_applies_per_episode() {
        let mut ale = interface();
        ale.set_max_num_frames(2);
        ale.act(PlayerANoop);
        assert!(!ale.game_over());
        ale.act(PlayerANoop);
        assert!(ale.game_over());

        ale.reset_game();
        assert!(!ale.game_over());
        assert_eq!(ale.frame_number(), 2);
        let mut played = 0;
        while !ale.game_over() {
            ale.act(PlayerARight);
            played += 1;
        }
        assert_eq!(played, 2);
        assert_eq!(ale.frame_number(), 4);
    }

    #[test]
    fn test_save_state_is_reusable() {
        let mut ale = interface();
        ale.save_state();
        ale.act(PlayerALeft);
        assert!(ale.load_state().unwrap());
        assert_eq!(ale.frame_number(), 0);
        ale.act(PlayerALeft);
        assert!(ale.load_state().unwrap());
        assert_eq!(ale.frame_number(), 0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut ale = interface();
        ale.act(PlayerARight);
        let snapshot = ale.snapshot();
        ale.act(PlayerARight);
        ale.restore_snapshot(&snapshot).unwrap();
        assert_eq!(ale.frame_number(), 1);
        assert_eq!(ale.episode_frame_number(), 1);
    }

    #[test]
    fn test_metadata() {
        let ale = interface();
        assert_eq!(AleInterface::<ToyCore>::version(), (0, 4));
        assert_eq!(ale.minimal_action_set(), vec![PlayerANoop, PlayerARight, PlayerALeft]);
        assert_eq!(ale.legal_action_set().len(), 18);
        assert_eq!(ale.lives(), 0);
        assert!(ale.min_reward() < ale.max_reward());
        assert_eq!(ale.screen().pixels().len(), 24);
        assert_eq!(ale.ram().len(), 128);
    }

    #[test]
    fn test_get_rgb() {
        assert_eq!(AleInterface::<ToyCore>::get_rgb(0x0E), 0xececec);
        assert_eq!(AleInterface::<ToyCore>::get_rgb(0x0F), 0x000000);
    }
}
