//! The game module contract and the context handed to module code.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use parlor_core::{GameAction, GameConfig, ModuleId, PhaseId, ScreenId, ScreenRef, TransitionResult};

use crate::events::EventBus;
use crate::worker::Dispatcher;

/// A self-contained game definition: screens, phase controllers, and
/// optional content/localization hooks.
///
/// Initialization order is strict: the host awaits [`GameModule::init`] and
/// collects screens/controllers before the router seeds the first phase.
#[async_trait]
pub trait GameModule: Send + Sync {
    /// Unique module id; also used as the registry key.
    fn id(&self) -> ModuleId;

    /// One-time initialization: load content, warm caches. Runs before any
    /// phase is entered; a failure here aborts the bootstrap.
    async fn init(&self, ctx: &ModuleContext) -> anyhow::Result<()>;

    /// Screen references keyed by screen id. Every `screen_id` referenced by
    /// the config's phases must resolve here.
    fn screens(&self) -> HashMap<ScreenId, ScreenRef>;

    /// Phase controllers keyed by phase id.
    fn phase_controllers(&self) -> HashMap<PhaseId, Arc<dyn PhaseController>>;

    /// Translation tables, keyed by locale then message key.
    fn translations(&self) -> Option<HashMap<String, HashMap<String, String>>> {
        None
    }

    /// Theme extension consumed by the rendering layer.
    fn theme(&self) -> Option<serde_json::Value> {
        None
    }

    /// Namespace for the module-local store, when the module persists state.
    fn store_namespace(&self) -> Option<String> {
        None
    }
}

/// Per-phase policy object.
///
/// `transition` is the only place business logic decides the next result and
/// must return synchronously; asynchronous work (prefetching the next
/// content item, cleanup) belongs in the enter/exit hooks. Controllers
/// express intent purely through the return value — they never reach into
/// the router.
#[async_trait]
pub trait PhaseController: Send + Sync {
    /// Side effects on entering the phase.
    async fn on_enter(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Cleanup on leaving the phase. Runs before `current_phase_id` changes.
    async fn on_exit(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
        Ok(())
    }

    /// Decide the outcome for `action`. Only called for actions the current
    /// phase allows.
    fn transition(&self, action: &GameAction, ctx: &ModuleContext) -> TransitionResult;
}

/// Capability bundle handed to a module's `init` and phase controllers.
///
/// `player_id`/`room_id` are present only for multiplayer-capable modules;
/// they are never defaulted to placeholder values.
#[derive(Clone)]
pub struct ModuleContext {
    config: Arc<GameConfig>,
    dispatcher: Dispatcher,
    event_bus: EventBus,
    player_id: Option<String>,
    room_id: Option<String>,
}

impl ModuleContext {
    pub(crate) fn new(
        config: Arc<GameConfig>,
        dispatcher: Dispatcher,
        event_bus: EventBus,
        player_id: Option<String>,
        room_id: Option<String>,
    ) -> Self {
        Self {
            config,
            dispatcher,
            event_bus,
            player_id,
            room_id,
        }
    }

    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    /// Queue-based dispatcher; enqueued actions are processed after the
    /// in-flight dispatch completes.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }
}
