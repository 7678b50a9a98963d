//! Actions: typed intent messages submitted to the dispatcher.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of action kinds understood by the router.
///
/// Modules that need vocabulary beyond the built-in kinds use
/// [`ActionKind::Custom`]; the router treats custom kinds exactly like the
/// built-in ones when checking a phase's allowed actions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Advance,
    Back,
    SelectTarget,
    Reveal,
    Restart,
    Custom(String),
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Advance => f.write_str("ADVANCE"),
            ActionKind::Back => f.write_str("BACK"),
            ActionKind::SelectTarget => f.write_str("SELECT_TARGET"),
            ActionKind::Reveal => f.write_str("REVEAL"),
            ActionKind::Restart => f.write_str("RESTART"),
            ActionKind::Custom(kind) => f.write_str(kind),
        }
    }
}

/// Where an action originated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActionSource {
    #[default]
    User,
    System,
}

/// Metadata attached to every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMeta {
    pub timestamp: DateTime<Utc>,
    pub source: ActionSource,
    pub priority: u8,
}

impl ActionMeta {
    pub fn now(source: ActionSource) -> Self {
        Self {
            timestamp: Utc::now(),
            source,
            priority: 0,
        }
    }
}

impl Default for ActionMeta {
    fn default() -> Self {
        Self::now(ActionSource::User)
    }
}

/// A typed intent message: kind, metadata, and an optional open payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    #[serde(default)]
    pub meta: ActionMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl GameAction {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            meta: ActionMeta::default(),
            payload: None,
        }
    }

    /// System-originated action (e.g. a timer firing).
    pub fn system(kind: ActionKind) -> Self {
        Self {
            kind,
            meta: ActionMeta::now(ActionSource::System),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.meta.priority = priority;
        self
    }
}
