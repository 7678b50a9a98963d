//! Unified error types surfaced by the runtime API.
//!
//! Bootstrap failures (config, module resolution, init) are fatal to
//! starting a run and surface before `LIFECYCLE/READY`. Once running, the
//! router reports recoverable failures through `ERROR` events instead and
//! leaves its state unchanged.

use thiserror::Error;
use tokio::sync::oneshot;

use parlor_core::{ConfigError, ModuleId, PhaseId, ScreenId};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("module {id} is already registered")]
    DuplicateModule { id: ModuleId },

    #[error("module {id} is not registered")]
    ModuleNotFound { id: ModuleId },

    #[error("module {id} failed to initialize")]
    ModuleInit {
        id: ModuleId,
        #[source]
        source: anyhow::Error,
    },

    #[error("module is not ready: {reason}")]
    ModuleNotReady { reason: String },

    #[error("no controller registered for phase {phase}")]
    MissingController { phase: PhaseId },

    #[error("screen {screen} for phase {phase} is not registered by the module")]
    MissingScreen { phase: PhaseId, screen: ScreenId },

    #[error("unknown phase {phase}")]
    UnknownPhase { phase: PhaseId },

    #[error("transition failed: {0}")]
    Transition(String),

    #[error("host requires a module registry before building")]
    MissingRegistry,

    #[error("host requires a game config before building")]
    MissingConfig,

    #[error("router command channel closed")]
    CommandChannelClosed,

    #[error("router reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("router worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
