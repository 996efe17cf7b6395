use std::path::PathBuf;

use surfswitch_core::surface::SurfaceRole;
use surfswitch_runtime::HarnessError;
use thiserror::Error;

use crate::script::ScriptError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Harness(#[from] HarnessError),

    #[error("failed to read script {path}: {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Script(#[from] ScriptError),

    #[error("step {step} (`{action}`): no {role} surface has been created")]
    NoSurface {
        step: usize,
        action: String,
        role: SurfaceRole,
    },

    #[error("step {step} (`{action}`): expected label {expected}, got {actual}")]
    Expectation {
        step: usize,
        action: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Harness(err) => err.exit_code(),
            Self::ReadScript { .. } | Self::Script(_) | Self::NoSurface { .. } => 2,
            Self::Expectation { .. } => 1,
        }
    }
}
