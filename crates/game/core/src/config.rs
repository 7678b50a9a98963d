//! Game configuration: identity, phases, screens, and capability flags.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigValidationError};
use crate::ids::{ModuleId, PhaseId, ScreenId};
use crate::phase::{PhaseDescriptor, ScreenRef};

/// Static description of one game module, loaded once per session.
///
/// Configs are persisted as JSON. Unknown fields are ignored on load so
/// newer configs keep working against older hosts. Once loaded and validated
/// the config is immutable; the host shares it behind an `Arc` for the
/// lifetime of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub id: ModuleId,
    pub title: String,
    pub version: String,
    pub min_players: u32,
    pub max_players: u32,
    /// Ordered: `phases[0]` is the initial phase of every run.
    pub phases: Vec<PhaseDescriptor>,
    pub screens: HashMap<ScreenId, ScreenRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentSource>,
    #[serde(default)]
    pub features: HashMap<String, bool>,
    #[serde(default)]
    pub multiplayer: MultiplayerCaps,
}

impl GameConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check the structural invariants the router relies on.
    ///
    /// The router never starts on a config that fails validation, so it can
    /// assume a non-empty phase list and resolvable screen ids afterwards.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.phases.is_empty() {
            return Err(ConfigValidationError::NoPhases);
        }

        if self.min_players == 0 || self.max_players < self.min_players {
            return Err(ConfigValidationError::InvalidPlayerBounds {
                min: self.min_players,
                max: self.max_players,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for phase in &self.phases {
            if !seen.insert(&phase.id) {
                return Err(ConfigValidationError::DuplicatePhase {
                    id: phase.id.clone(),
                });
            }
            if phase.allowed_actions.is_empty() {
                return Err(ConfigValidationError::NoAllowedActions {
                    phase: phase.id.clone(),
                });
            }
            if !self.screens.contains_key(&phase.screen_id) {
                return Err(ConfigValidationError::DanglingScreen {
                    phase: phase.id.clone(),
                    screen: phase.screen_id.clone(),
                });
            }
        }

        if self.multiplayer.supported && self.multiplayer.max_room_size < self.multiplayer.min_room_size
        {
            return Err(ConfigValidationError::InvalidRoomBounds {
                min: self.multiplayer.min_room_size,
                max: self.multiplayer.max_room_size,
            });
        }

        Ok(())
    }

    /// The initial phase of a run.
    ///
    /// Valid configs always have one; callers holding a validated config can
    /// rely on `phases[0]`.
    pub fn initial_phase(&self) -> Option<&PhaseDescriptor> {
        self.phases.first()
    }

    pub fn phase(&self, id: &PhaseId) -> Option<&PhaseDescriptor> {
        self.phases.iter().find(|phase| &phase.id == id)
    }

    pub fn has_phase(&self, id: &PhaseId) -> bool {
        self.phase(id).is_some()
    }

    pub fn feature(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

/// Declarative description of the content provider a module should attach.
///
/// Only module `init` code interprets this; the core carries it opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSource {
    pub kind: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Multiplayer capability flags.
///
/// When `supported` is false the host never threads `player_id`/`room_id`
/// into the module context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiplayerCaps {
    pub supported: bool,
    #[serde(default = "default_room_size")]
    pub min_room_size: u32,
    #[serde(default = "default_room_size")]
    pub max_room_size: u32,
}

fn default_room_size() -> u32 {
    1
}

impl Default for MultiplayerCaps {
    fn default() -> Self {
        Self {
            supported: false,
            min_room_size: 1,
            max_room_size: 1,
        }
    }
}
