//! Error types for configuration loading and validation.

use thiserror::Error;

use crate::ids::{PhaseId, ScreenId};

/// A structural problem found while validating a [`crate::GameConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("config declares no phases")]
    NoPhases,

    #[error("phase id {id} is declared more than once")]
    DuplicatePhase { id: PhaseId },

    #[error("phase {phase} declares no allowed actions")]
    NoAllowedActions { phase: PhaseId },

    #[error("phase {phase} references screen {screen} which is not in the screen map")]
    DanglingScreen { phase: PhaseId, screen: ScreenId },

    #[error("invalid player bounds: min {min}, max {max}")]
    InvalidPlayerBounds { min: u32, max: u32 },

    #[error("invalid room bounds: min {min}, max {max}")]
    InvalidRoomBounds { min: u32, max: u32 },
}

/// Failure to produce a usable [`crate::GameConfig`] from a source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ConfigValidationError),
}
