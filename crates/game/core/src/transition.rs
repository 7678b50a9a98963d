//! The result a phase controller returns from `transition`.

use serde::{Deserialize, Serialize};

use crate::ids::PhaseId;

/// Outcome of routing one action through the active phase controller.
///
/// The router's match over this enum is exhaustive, so adding a variant is a
/// compile-time change for every dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionResult {
    /// Remain in the current phase.
    Stay,
    /// Move to another phase; the id must exist in the active config.
    Goto(PhaseId),
    /// The module run has ended. The router selects no next phase.
    Complete,
    /// The controller rejected the action; state is left unchanged.
    Error(String),
}

impl TransitionResult {
    pub fn goto(phase: impl Into<PhaseId>) -> Self {
        Self::Goto(phase.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}
