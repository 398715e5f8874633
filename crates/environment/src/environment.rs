//! The episode state machine driving an emulation core.

use crate::action::Action;
use crate::config::EnvironmentConfig;
use crate::error::{EnvironmentError, Result};
use crate::games::{select_title, ActionSets, TitleAdapter};
use crate::phosphor::ScreenProcessor;
use crate::stack::SnapshotStack;
use crate::state::{ControllerState, MachineSnapshot};
use crate::Reward;
use ale_core::archive::{ArchiveReader, ArchiveWriter};
use ale_core::types::{Ram, Screen, RAM_SIZE};
use ale_core::EmulationCore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ticks of no-op input after a power cycle, before the game is reset.
const NOOP_WARMUP_TICKS: u32 = 60;
/// Upper bound (exclusive) of the extra warm-up added by a stochastic start.
const RANDOM_WARMUP_TICKS: u32 = 500;

/// Lifecycle of an [`Environment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `reset()` not called yet.
    Uninitialized,
    Ready,
    /// Derived from [`Environment::is_terminal`]; left only through `reset()`.
    Terminal,
}

/// A running cartridge plus the title adapter that scores it.
pub struct Environment<C: EmulationCore> {
    core: C,
    adapter: Box<dyn TitleAdapter>,
    action_sets: ActionSets,
    snapshots: SnapshotStack,
    controllers: ControllerState,
    processor: ScreenProcessor,
    screen: Screen,
    ram: Ram,
    rng: StdRng,
    config: EnvironmentConfig,
    use_paddles: bool,
    initialized: bool,
}

impl<C: EmulationCore> Environment<C> {
    /// Build an environment for the cartridge at `rom_path`, picking the
    /// title adapter from the file name.
    pub fn new(core: C, rom_path: &str, config: EnvironmentConfig) -> Result<Self> {
        let adapter = select_title(rom_path)?;
        Ok(Self::with_adapter(core, adapter, config))
    }

    pub fn with_adapter(mut core: C, adapter: Box<dyn TitleAdapter>, config: EnvironmentConfig) -> Self {
        let use_paddles = core.uses_paddles();
        if adapter.swap_ports() {
            log::debug!("swapping controller ports for {}", adapter.name());
            core.swap_ports();
        }

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let screen = Screen::new(core.screen_height(), core.screen_width());
        log::info!(
            "environment for {} ({} controllers, cartridge {})",
            adapter.name(),
            if use_paddles { "paddle" } else { "joystick" },
            core.cartridge_md5()
        );

        Self {
            action_sets: ActionSets::new(adapter.as_ref()),
            snapshots: SnapshotStack::new(config.save_discipline),
            controllers: ControllerState::new(),
            processor: ScreenProcessor::from_config(&config),
            screen,
            ram: Ram::new(),
            rng,
            core,
            adapter,
            config,
            use_paddles,
            initialized: false,
        }
    }

    /// Start a new episode.
    pub fn reset(&mut self) {
        self.controllers.reset_episode();
        self.core.reset();

        let mut warmup = NOOP_WARMUP_TICKS;
        if self.config.stochastic_start {
            warmup += self.rng.gen_range(0..RANDOM_WARMUP_TICKS);
        }
        log::debug!("reset: {} warm-up ticks", warmup);

        self.emulate(Action::PlayerANoop, Action::PlayerBNoop, warmup);
        self.emulate(Action::Reset, Action::PlayerBNoop, self.config.system_reset_steps);

        // Rewards seen while warming up do not belong to the episode.
        self.adapter.reset();

        if self.config.use_starting_actions {
            for action in self.adapter.starting_actions() {
                self.emulate(action, Action::PlayerBNoop, 1);
            }
        }
        self.initialized = true;
    }

    /// Apply one action per player for `frame_skip` ticks and return the
    /// reward. Does nothing and returns 0 once the episode is over.
    ///
    /// # Panics
    /// If called before [`Environment::reset`], or if the title reports a
    /// reward outside its declared range.
    pub fn act(&mut self, player_a: Action, player_b: Action) -> Reward {
        assert!(self.initialized, "reset() must be called before act()");
        if self.is_terminal() {
            return 0;
        }

        let (player_a, player_b) = self.legalize(player_a, player_b);
        let ticks = self.config.frame_skip;
        self.emulate(player_a, player_b, ticks);
        self.controllers.increment_frames(u64::from(ticks));

        let reward = self.adapter.reward();
        assert!(
            (self.adapter.min_reward()..=self.adapter.max_reward()).contains(&reward),
            "{} reported reward {} outside [{}, {}]",
            self.adapter.name(),
            reward,
            self.adapter.min_reward(),
            self.adapter.max_reward()
        );
        reward
    }

    /// Replace actions the title does not accept with NOOP. A raw RESET is
    /// never passed through: `reset()` is the only way to restart.
    fn legalize(&self, player_a: Action, player_b: Action) -> (Action, Action) {
        let player_a = if (player_a.is_player_a() && !self.adapter.is_legal(player_a))
            || player_a == Action::Reset
        {
            Action::PlayerANoop
        } else {
            player_a
        };

        let b_illegal = player_b
            .as_player_a()
            .filter(|_| player_b.is_player_b())
            .is_some_and(|a| !self.adapter.is_legal(a));
        let player_b = if b_illegal || player_b == Action::Reset {
            Action::PlayerBNoop
        } else {
            player_b
        };
        (player_a, player_b)
    }

    fn emulate(&mut self, player_a: Action, player_b: Action, ticks: u32) {
        if self.use_paddles {
            // Paddles keep moving for as long as the action is held.
            for _ in 0..ticks {
                let input = self.controllers.paddle_input(player_a, player_b);
                self.core.set_analog_input(&input);
                self.core.advance(1);
            }
        } else {
            let input = self.controllers.joystick_input(player_a, player_b);
            self.core.set_digital_input(&input);
            self.core.advance(ticks);
        }

        self.refresh_observations();
        self.adapter.step(&self.core);
    }

    /// Recompute the screen and RAM views from the core.
    pub fn refresh_observations(&mut self) {
        self.screen = self.processor.process(self.core.framebuffer(), &self.screen);
        for i in 0..RAM_SIZE {
            self.ram.set(i, self.core.peek(0x80 + i as u16));
        }
    }

    pub fn is_terminal(&self) -> bool {
        let episode = self.controllers.episode_frame_number();
        let env_cap = u64::from(self.config.max_num_frames_per_episode);
        let title_cap = self.adapter.max_frames();
        self.adapter.is_terminal()
            || (env_cap > 0 && episode >= env_cap)
            || (title_cap > 0 && episode >= title_cap)
    }

    pub fn phase(&self) -> Phase {
        if !self.initialized {
            Phase::Uninitialized
        } else if self.is_terminal() {
            Phase::Terminal
        } else {
            Phase::Ready
        }
    }

    /// Capture the current state onto the snapshot stack.
    pub fn save(&mut self) {
        let snapshot = self.clone_state();
        log::debug!("save at frame {}", snapshot.frame_number());
        self.snapshots.save(snapshot);
    }

    /// Restore the most recent saved snapshot. Returns `Ok(false)` when
    /// nothing has been saved.
    pub fn load(&mut self) -> Result<bool> {
        match self.snapshots.take_for_load() {
            Some(snapshot) => {
                log::debug!("load frame {}", snapshot.frame_number());
                self.restore_state(&snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Snapshot of the current state, leaving the stack alone.
    pub fn clone_state(&self) -> MachineSnapshot {
        let mut payload = ArchiveWriter::new();
        payload.write_bytes(&self.core.capture_state());
        self.adapter.save_state(&mut payload);
        MachineSnapshot::new(
            self.controllers,
            self.core.cartridge_md5().to_string(),
            payload.into_bytes(),
        )
    }

    /// Restore a snapshot. Screen and RAM views keep their current contents
    /// until [`Environment::refresh_observations`] or the next step.
    ///
    /// On error the environment is left as it was.
    ///
    /// # Panics
    /// If the snapshot was captured from a different cartridge.
    pub fn restore_state(&mut self, snapshot: &MachineSnapshot) -> Result<()> {
        assert_eq!(
            snapshot.cartridge_md5(),
            self.core.cartridge_md5(),
            "snapshot was captured from a different cartridge"
        );

        let mut payload = ArchiveReader::new(snapshot.payload());
        let blob = payload.read_bytes()?;

        let mut previous = ArchiveWriter::new();
        self.adapter.save_state(&mut previous);
        if let Err(e) = self.adapter.load_state(&mut payload) {
            self.rollback_adapter(previous.as_bytes());
            return Err(e.into());
        }
        if let Err(e) = self.core.restore_state(&blob) {
            self.rollback_adapter(previous.as_bytes());
            return Err(EnvironmentError::Core(Box::new(e)));
        }

        self.controllers = snapshot.controllers();
        self.initialized = true;
        Ok(())
    }

    fn rollback_adapter(&mut self, previous: &[u8]) {
        if let Err(e) = self.adapter.load_state(&mut ArchiveReader::new(previous)) {
            log::warn!("could not roll back {} bookkeeping: {}", self.adapter.name(), e);
        }
    }

    /// Serialized form of [`Environment::clone_state`].
    pub fn export_snapshot(&self) -> Vec<u8> {
        self.clone_state().to_bytes()
    }

    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<()> {
        let snapshot = MachineSnapshot::from_bytes(bytes)?;
        log::debug!(
            "importing snapshot at frame {} ({} byte payload)",
            snapshot.frame_number(),
            snapshot.payload().len()
        );
        self.restore_state(&snapshot)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn frame_number(&self) -> u64 {
        self.controllers.frame_number()
    }

    pub fn episode_frame_number(&self) -> u64 {
        self.controllers.episode_frame_number()
    }

    pub fn minimal_action_set(&self) -> &[Action] {
        self.action_sets.minimal()
    }

    pub fn legal_action_set(&self) -> &[Action] {
        self.action_sets.legal()
    }

    pub fn min_reward(&self) -> Reward {
        self.adapter.min_reward()
    }

    pub fn max_reward(&self) -> Reward {
        self.adapter.max_reward()
    }

    pub fn lives(&self) -> i32 {
        self.adapter.lives()
    }

    pub fn title(&self) -> &'static str {
        self.adapter.name()
    }

    pub fn set_max_num_frames_per_episode(&mut self, frames: u32) {
        self.config.max_num_frames_per_episode = frames;
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn core(&self) -> &C {
        &self.core
    }

    /// Direct access to the core, e.g. to load a cartridge or poke memory.
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    /// Number of snapshots waiting on the stack.
    pub fn saved_states(&self) -> usize {
        self.snapshots.len()
    }
}
