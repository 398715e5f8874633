use ale_environment::games::{self, ActionSets};
use ale_environment::{EnvironmentConfig, EnvironmentError, MachineSnapshot};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ale", about = "Inspect titles, snapshots and environment settings")]
struct Args {
    /// Environment settings as JSON (missing fields keep their defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported titles and their minimal action sets
    Titles,
    /// Show which title adapter a ROM path resolves to
    Lookup { rom: String },
    /// Describe a snapshot written by `Environment::export_snapshot`
    Snapshot {
        path: PathBuf,
        /// Print as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective environment settings as JSON
    Config,
}

#[derive(Debug, Serialize, PartialEq)]
struct TitleSummary {
    name: &'static str,
    minimal_actions: Vec<String>,
    legal_actions: usize,
    starting_actions: Vec<String>,
    max_frames: u64,
}

fn summarize_titles() -> Vec<TitleSummary> {
    games::registry()
        .iter()
        .map(|entry| {
            let adapter = (entry.build)();
            let sets = ActionSets::new(adapter.as_ref());
            TitleSummary {
                name: entry.name,
                minimal_actions: sets.minimal().iter().map(|a| a.to_string()).collect(),
                legal_actions: sets.legal().len(),
                starting_actions: adapter
                    .starting_actions()
                    .iter()
                    .map(|a| a.to_string())
                    .collect(),
                max_frames: adapter.max_frames(),
            }
        })
        .collect()
}

#[derive(Debug, Serialize, PartialEq)]
struct SnapshotSummary {
    cartridge_md5: String,
    frame_number: u64,
    episode_frame_number: u64,
    left_paddle: i32,
    right_paddle: i32,
    payload_bytes: usize,
}

fn summarize_snapshot(bytes: &[u8]) -> Result<SnapshotSummary> {
    let snapshot = MachineSnapshot::from_bytes(bytes).context("Failed to decode snapshot")?;
    Ok(SnapshotSummary {
        cartridge_md5: snapshot.cartridge_md5().to_string(),
        frame_number: snapshot.frame_number(),
        episode_frame_number: snapshot.episode_frame_number(),
        left_paddle: snapshot.left_paddle(),
        right_paddle: snapshot.right_paddle(),
        payload_bytes: snapshot.payload().len(),
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<EnvironmentConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = EnvironmentConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            log::info!("loaded settings from {}", path.display());
            Ok(config)
        }
        None => Ok(EnvironmentConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Titles => {
            for title in summarize_titles() {
                println!("{}", title.name);
                println!("  minimal: {}", title.minimal_actions.join(", "));
                println!("  legal actions: {}", title.legal_actions);
                if !title.starting_actions.is_empty() {
                    println!("  starting actions: {}", title.starting_actions.join(", "));
                }
                if title.max_frames > 0 {
                    println!("  frame cap: {}", title.max_frames);
                }
            }
        }
        Command::Lookup { rom } => match games::select_title(&rom) {
            Ok(adapter) => println!("{} -> {}", rom, adapter.name()),
            Err(EnvironmentError::UnsupportedTitle {
                searched,
                suggestion: Some(name),
                ..
            }) => anyhow::bail!("No title named '{}' (did you mean '{}'?)", searched, name),
            Err(e) => return Err(e.into()),
        },
        Command::Snapshot { path, json } => {
            let bytes = fs::read(&path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            let summary = summarize_snapshot(&bytes)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("cartridge:     {}", summary.cartridge_md5);
                println!(
                    "frame:         {} (episode {})",
                    summary.frame_number, summary.episode_frame_number
                );
                println!(
                    "paddles:       {} / {}",
                    summary.left_paddle, summary.right_paddle
                );
                println!("payload bytes: {}", summary.payload_bytes);
            }
        }
        Command::Config => {
            println!("{}", config.to_json()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ale_core::archive::ArchiveWriter;

    #[test]
    fn test_title_summaries_cover_registry() {
        let titles = summarize_titles();
        assert_eq!(titles.len(), games::registry().len());
        let pong = titles.iter().find(|t| t.name == "pong").unwrap();
        assert_eq!(
            pong.minimal_actions,
            vec!["PLAYER_A_NOOP", "PLAYER_A_RIGHT", "PLAYER_A_LEFT"]
        );
        assert_eq!(pong.max_frames, 65000);
        let pitfall = titles.iter().find(|t| t.name == "pitfall").unwrap();
        assert_eq!(pitfall.starting_actions, vec!["PLAYER_A_UP"]);
    }

    #[test]
    fn test_snapshot_summary() {
        let mut out = ArchiveWriter::new();
        out.write(&100i32)
            .write(&200i32)
            .write(&7u64)
            .write(&3u64)
            .write("cafe")
            .write_bytes(&[1, 2, 3]);
        let summary = summarize_snapshot(out.as_bytes()).unwrap();
        assert_eq!(
            summary,
            SnapshotSummary {
                cartridge_md5: "cafe".to_string(),
                frame_number: 7,
                episode_frame_number: 3,
                left_paddle: 100,
                right_paddle: 200,
                payload_bytes: 3,
            }
        );
        assert!(summarize_snapshot(&out.as_bytes()[..6]).is_err());
    }

    #[test]
    fn test_default_config_without_file() {
        assert_eq!(load_config(None).unwrap(), EnvironmentConfig::default());
    }
}
