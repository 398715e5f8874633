//! Per-title adapters and the registry used to pick one for a cartridge.
//!
//! An adapter only observes memory: after each step of the environment it
//! reads the score bytes of its title and derives the reward, the terminal
//! flag and the remaining lives. Adapters never write to the machine.

mod boxing;
mod breakout;
mod freeway;
mod pitfall;
mod pong;
mod skiing;
mod space_invaders;

pub use boxing::Boxing;
pub use breakout::Breakout;
pub use freeway::Freeway;
pub use pitfall::Pitfall;
pub use pong::Pong;
pub use skiing::Skiing;
pub use space_invaders::SpaceInvaders;

use crate::action::{Action, PLAYER_A_ACTIONS};
use crate::error::{EnvironmentError, Result};
use crate::Reward;
use ale_core::archive::{ArchiveError, ArchiveReader, ArchiveWriter};
use ale_core::MemoryView;

/// Title-specific interpretation of machine memory.
pub trait TitleAdapter: Send {
    /// Registry name, matched against the cartridge file stem.
    fn name(&self) -> &'static str;

    /// Observe memory after a step and update reward and terminal status.
    fn step(&mut self, mem: &dyn MemoryView);

    /// Reward gathered by the last `step`.
    fn reward(&self) -> Reward;

    fn is_terminal(&self) -> bool;

    fn min_reward(&self) -> Reward {
        Reward::MIN
    }

    fn max_reward(&self) -> Reward {
        Reward::MAX
    }

    fn is_minimal(&self, action: Action) -> bool;

    fn is_legal(&self, _action: Action) -> bool {
        true
    }

    fn lives(&self) -> i32 {
        0
    }

    /// Actions applied for one tick each right after a reset.
    fn starting_actions(&self) -> Vec<Action> {
        Vec::new()
    }

    /// Episode cap in frames, 0 for none.
    fn max_frames(&self) -> u64 {
        0
    }

    fn reset(&mut self);

    fn save_state(&self, out: &mut ArchiveWriter);

    fn load_state(&mut self, input: &mut ArchiveReader<'_>) -> std::result::Result<(), ArchiveError>;

    /// Whether the cartridge expects its controllers in swapped ports.
    fn swap_ports(&self) -> bool {
        false
    }
}

/// Minimal and legal player A action sets, computed once per adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSets {
    minimal: Vec<Action>,
    legal: Vec<Action>,
}

impl ActionSets {
    pub fn new(adapter: &dyn TitleAdapter) -> Self {
        let legal: Vec<Action> = PLAYER_A_ACTIONS
            .iter()
            .copied()
            .filter(|&a| adapter.is_legal(a))
            .collect();
        let minimal = legal
            .iter()
            .copied()
            .filter(|&a| adapter.is_minimal(a))
            .collect();
        Self { minimal, legal }
    }

    pub fn minimal(&self) -> &[Action] {
        &self.minimal
    }

    pub fn legal(&self) -> &[Action] {
        &self.legal
    }
}

/// A registered title.
pub struct TitleEntry {
    pub name: &'static str,
    pub build: fn() -> Box<dyn TitleAdapter>,
}

static REGISTRY: &[TitleEntry] = &[
    TitleEntry {
        name: "boxing",
        build: boxed::<Boxing>,
    },
    TitleEntry {
        name: "breakout",
        build: boxed::<Breakout>,
    },
    TitleEntry {
        name: "freeway",
        build: boxed::<Freeway>,
    },
    TitleEntry {
        name: "pitfall",
        build: boxed::<Pitfall>,
    },
    TitleEntry {
        name: "pong",
        build: boxed::<Pong>,
    },
    TitleEntry {
        name: "skiing",
        build: boxed::<Skiing>,
    },
    TitleEntry {
        name: "space_invaders",
        build: boxed::<SpaceInvaders>,
    },
];

fn boxed<T: TitleAdapter + Default + 'static>() -> Box<dyn TitleAdapter> {
    Box::new(T::default())
}

pub fn registry() -> &'static [TitleEntry] {
    REGISTRY
}

/// File name without directories and without anything from the first `.`.
pub fn title_stem(rom_path: &str) -> &str {
    let file = rom_path.rsplit(['/', '\\']).next().unwrap_or(rom_path);
    file.split('.').next().unwrap_or(file)
}

/// Look a title up by its exact registry name.
pub fn lookup(name: &str) -> Option<Box<dyn TitleAdapter>> {
    REGISTRY
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| (entry.build)())
}

/// Registered name closest to `name` and its edit distance.
pub fn closest_title(name: &str) -> Option<(&'static str, usize)> {
    REGISTRY
        .iter()
        .map(|entry| (entry.name, edit_distance(name, entry.name)))
        .min_by_key(|&(_, dist)| dist)
}

/// Pick the adapter for a cartridge path.
pub fn select_title(rom_path: &str) -> Result<Box<dyn TitleAdapter>> {
    let searched = title_stem(rom_path);
    if let Some(adapter) = lookup(searched) {
        log::info!("found supported title: {}", adapter.name());
        return Ok(adapter);
    }

    let suggestion = closest_title(searched)
        .filter(|&(_, dist)| dist < rom_path.len())
        .map(|(name, _)| name.to_string());
    log::warn!("no title adapter for {} (searched for {})", rom_path, searched);
    if let Some(name) = &suggestion {
        log::warn!("is {} the title you meant to use?", name);
    }
    Err(EnvironmentError::UnsupportedTitle {
        rom: rom_path.to_string(),
        searched: searched.to_string(),
        suggestion,
    })
}

/// Levenshtein distance over characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[b.len()]
}

/// Byte of console RAM, `offset` wrapping inside the 128 bytes at 0x80.
pub fn read_ram(mem: &dyn MemoryView, offset: u8) -> u8 {
    mem.peek(0x80 + u16::from(offset & 0x7F))
}

/// Decode a BCD score stored two digits per byte, least significant byte
/// first.
pub fn decimal_score(mem: &dyn MemoryView, offsets: &[u8]) -> i32 {
    let mut score = 0;
    let mut scale = 1;
    for &offset in offsets {
        let byte = read_ram(mem, offset);
        score += scale * (10 * i32::from(byte >> 4) + i32::from(byte & 0x0F));
        scale *= 100;
    }
    score
}
