//! Event and topic types published on the bus.

use serde::{Deserialize, Serialize};

use parlor_core::{GameAction, PhaseId};

/// Topics for event routing.
///
/// Each event belongs to exactly one topic; subscribers filter by topic or
/// observe everything through the wildcard filter.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Topic {
    /// Host lifecycle (init, ready).
    Lifecycle,
    /// Phase enter/exit transitions.
    Phase,
    /// Action dispatches, including rejected ones.
    Action,
    /// Run-level events (completion).
    Game,
    /// Non-fatal errors reported by the router or by misbehaving handlers.
    Error,
}

/// Event envelope carrying the topic and typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    /// Host bootstrap started.
    #[serde(rename = "LIFECYCLE/INIT")]
    LifecycleInit,

    /// Module init and registration completed; the router is about to seed
    /// the initial phase.
    #[serde(rename = "LIFECYCLE/READY")]
    LifecycleReady,

    /// Published after `current_phase_id` changed to `phase_id`.
    #[serde(rename = "PHASE/ENTER")]
    PhaseEnter { phase_id: PhaseId },

    /// Published before `current_phase_id` moves away from `phase_id`.
    #[serde(rename = "PHASE/EXIT")]
    PhaseExit { phase_id: PhaseId },

    /// Published for every dispatched action, even ones that end up rejected.
    #[serde(rename = "ACTION/DISPATCH")]
    ActionDispatch { action: GameAction },

    /// A controller ended the run.
    #[serde(rename = "GAME/COMPLETE")]
    GameComplete,

    /// A recoverable error: missing controller, unknown target phase,
    /// controller-reported failure, or a handler error inside `publish`.
    #[serde(rename = "ERROR")]
    Error { message: String },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::LifecycleInit | Event::LifecycleReady => Topic::Lifecycle,
            Event::PhaseEnter { .. } | Event::PhaseExit { .. } => Topic::Phase,
            Event::ActionDispatch { .. } => Topic::Action,
            Event::GameComplete => Topic::Game,
            Event::Error { .. } => Topic::Error,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }
}
