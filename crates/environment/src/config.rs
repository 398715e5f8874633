//! Environment settings.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How `save()` and `load()` treat the snapshot stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveDiscipline {
    /// Save pushes, load pops.
    #[default]
    Stacked,
    /// Save keeps exactly one snapshot, load restores it without removing it.
    LegacySingleton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Core ticks per `act()` call.
    pub frame_skip: u32,
    /// Episode length cap in frames, 0 for none.
    pub max_num_frames_per_episode: u32,
    /// Ticks the console RESET switch stays pressed during `reset()`.
    pub system_reset_steps: u32,
    pub use_starting_actions: bool,
    /// Blend consecutive frames to simulate phosphor persistence.
    pub color_averaging: bool,
    /// Percentage weight of the brighter channel, clamped to 100.
    pub phosphor_blend_ratio: u8,
    /// Randomize the warm-up length on each reset.
    pub stochastic_start: bool,
    /// Seed for the environment RNG, OS entropy when absent.
    pub random_seed: Option<u64>,
    pub save_discipline: SaveDiscipline,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            max_num_frames_per_episode: 0,
            system_reset_steps: 4,
            use_starting_actions: true,
            color_averaging: false,
            phosphor_blend_ratio: 77,
            stochastic_start: false,
            random_seed: None,
            save_discipline: SaveDiscipline::Stacked,
        }
    }
}

impl EnvironmentConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.frame_skip, 1);
        assert_eq!(config.max_num_frames_per_episode, 0);
        assert_eq!(config.system_reset_steps, 4);
        assert!(config.use_starting_actions);
        assert!(!config.color_averaging);
        assert_eq!(config.phosphor_blend_ratio, 77);
        assert_eq!(config.save_discipline, SaveDiscipline::Stacked);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EnvironmentConfig::from_json(
            r#"{ "frame_skip": 4, "save_discipline": "legacy_singleton", "random_seed": 7 }"#,
        )
        .unwrap();
        assert_eq!(config.frame_skip, 4);
        assert_eq!(config.save_discipline, SaveDiscipline::LegacySingleton);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.system_reset_steps, 4);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EnvironmentConfig {
            color_averaging: true,
            phosphor_blend_ratio: 50,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EnvironmentConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EnvironmentConfig::from_json("{ frame_skip: }").is_err());
    }
}
