//! Phase descriptors: the states of the per-module state machine.

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::ids::{PhaseId, ScreenId};

/// One state in a module's state machine.
///
/// A phase binds exactly one screen and a non-empty set of legal action
/// kinds. Actions outside `allowed_actions` are ignored by the router while
/// this phase is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseDescriptor {
    pub id: PhaseId,
    pub screen_id: ScreenId,
    pub allowed_actions: Vec<ActionKind>,
}

impl PhaseDescriptor {
    pub fn new(
        id: impl Into<PhaseId>,
        screen_id: impl Into<ScreenId>,
        allowed_actions: Vec<ActionKind>,
    ) -> Self {
        Self {
            id: id.into(),
            screen_id: screen_id.into(),
            allowed_actions,
        }
    }

    /// Whether `kind` is legal while this phase is active.
    pub fn allows(&self, kind: &ActionKind) -> bool {
        self.allowed_actions.contains(kind)
    }
}

/// Opaque reference to a screen implementation.
///
/// The core never interprets this value; the rendering layer resolves it to
/// an actual component when the phase becomes active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenRef(String);

impl ScreenRef {
    pub fn new(component: impl Into<String>) -> Self {
        Self(component.into())
    }

    pub fn component(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScreenRef {
    fn from(component: &str) -> Self {
        Self(component.to_owned())
    }
}
