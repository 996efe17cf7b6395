use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Setup failures. Nothing past setup returns errors; per-frame problems are
/// reported as draw outcomes instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("native renderer reports it is unsupported on this device")]
    RendererUnsupported,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Process exit code for the CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RendererUnsupported => 3,
            Self::Config(_) => 2,
        }
    }
}
