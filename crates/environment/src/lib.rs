//! Reinforcement-learning environment on top of an Atari 2600 emulation core.
//!
//! [`Environment`] drives an [`ale_core::EmulationCore`] through episodes:
//! it resets the console, turns agent actions into controller input, advances
//! the machine, and asks the [`TitleAdapter`] for the cartridge what the step
//! was worth. [`AleInterface`] wraps it for single-player agents.
//!
//! ```no_run
//! # fn run<C: ale_core::EmulationCore>(core: C) -> ale_environment::Result<()> {
//! use ale_environment::{Action, AleInterface};
//!
//! let mut ale = AleInterface::new(core, "roms/pong.bin")?;
//! let mut total = 0;
//! while !ale.game_over() {
//!     total += ale.act(Action::PlayerARight);
//! }
//! println!("episode return: {}", total);
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod config;
pub mod environment;
pub mod error;
pub mod games;
pub mod interface;
pub mod phosphor;
pub mod stack;
pub mod state;

#[cfg(test)]
mod testing;

/// Reward reported by a title adapter for one step.
pub type Reward = i32;

pub use action::Action;
pub use config::{EnvironmentConfig, SaveDiscipline};
pub use environment::{Environment, Phase};
pub use error::{EnvironmentError, Result};
pub use games::{ActionSets, TitleAdapter};
pub use interface::AleInterface;
pub use phosphor::{PhosphorBlend, ScreenProcessor};
pub use stack::SnapshotStack;
pub use state::MachineSnapshot;
