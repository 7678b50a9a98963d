//! Shared data model and contracts for the party-game hosting shell.
//!
//! This crate holds everything a game module and the runtime agree on:
//! configuration ([`GameConfig`]), the phase and action vocabulary, the
//! [`TransitionResult`] sum type the phase router switches over, and the
//! narrow collaborator traits ([`ContentProvider`], [`Storage`]) the core
//! consumes but never implements with real I/O.
//!
//! The runtime crate builds the state machine on top of these types; screen
//! rendering, networking, and persistence live entirely outside.

pub mod action;
pub mod config;
pub mod error;
pub mod ids;
pub mod phase;
pub mod provider;
pub mod storage;
pub mod transition;

pub use action::{ActionKind, ActionMeta, ActionSource, GameAction};
pub use config::{ContentSource, GameConfig, MultiplayerCaps};
pub use error::{ConfigError, ConfigValidationError};
pub use ids::{ModuleId, PhaseId, ScreenId};
pub use phase::{PhaseDescriptor, ScreenRef};
pub use provider::{ContentProvider, Progress, VecContentProvider};
pub use storage::{MemoryStorage, Storage};
pub use transition::TransitionResult;
