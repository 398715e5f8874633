use ale_core::archive::ArchiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// No registered adapter matches the cartridge file name.
    #[error("unsupported title for ROM '{rom}' (searched '{searched}'){}", suggestion_hint(.suggestion))]
    UnsupportedTitle {
        rom: String,
        searched: String,
        suggestion: Option<String>,
    },
    #[error("emulation core error: {0}")]
    Core(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!("; did you mean '{}'?", name),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, EnvironmentError>;
