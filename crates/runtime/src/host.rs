//! Host bootstrap: wires config, module, and router together and emits the
//! top-level lifecycle.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use parlor_core::{GameConfig, ModuleId};

use crate::api::{GameHandle, Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::module::{GameModule, ModuleContext};
use crate::registry::ModuleRegistry;
use crate::router::PhaseRouter;
use crate::worker::{Command, Dispatcher, RouterWorker};

const DEFAULT_COMMAND_BUFFER: usize = 32;

/// A loaded, running game module.
///
/// Owns the router worker; [`GameHost::handle`] hands out cloneable facades
/// for screens and other clients.
pub struct GameHost {
    handle: GameHandle,
    command_tx: mpsc::Sender<Command>,
    module: Arc<dyn GameModule>,
    worker_handle: JoinHandle<()>,
}

impl GameHost {
    pub fn builder() -> GameHostBuilder {
        GameHostBuilder::new()
    }

    /// A cloneable handle — the context provider for the rendering layer.
    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    pub fn module(&self) -> &Arc<dyn GameModule> {
        &self.module
    }

    /// Reset the router to `config.phases[0]` and republish `PHASE/ENTER`,
    /// e.g. to play again after `GAME/COMPLETE`.
    pub async fn restart(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Restart { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Tear down the module: stop the worker, join it, and clear the bus so
    /// discarded subscribers stop receiving events.
    pub async fn shutdown(self) -> Result<()> {
        self.send(Command::Shutdown).await?;
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        self.handle.event_bus().clear();
        info!("game host shut down");
        Ok(())
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}

enum ConfigSource {
    Value(GameConfig),
    File(PathBuf),
}

/// Builder running the bootstrap pipeline, each step a suspension point:
///
/// `LIFECYCLE/INIT` → load config → resolve module → `module.init` →
/// register screens/controllers → `LIFECYCLE/READY` → seed initial phase
/// (`PHASE/ENTER`).
///
/// Any failure surfaces before `LIFECYCLE/READY`; the router never starts
/// in an invalid state.
pub struct GameHostBuilder {
    registry: Option<ModuleRegistry>,
    module_id: Option<ModuleId>,
    config: Option<ConfigSource>,
    event_bus: Option<EventBus>,
    player_id: Option<String>,
    room_id: Option<String>,
    command_buffer: usize,
}

impl GameHostBuilder {
    fn new() -> Self {
        Self {
            registry: None,
            module_id: None,
            config: None,
            event_bus: None,
            player_id: None,
            room_id: None,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }

    /// The registry to resolve the module from. Required.
    pub fn registry(mut self, registry: ModuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Module to load. Defaults to the config's `id`.
    pub fn module(mut self, id: impl Into<ModuleId>) -> Self {
        self.module_id = Some(id.into());
        self
    }

    /// Use an already-loaded config.
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = Some(ConfigSource::Value(config));
        self
    }

    /// Load the config from a JSON file during `build`.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(ConfigSource::File(path.into()));
        self
    }

    /// Share a pre-existing bus so observers can subscribe before the
    /// lifecycle events fire.
    pub fn event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Local player identity, honored only for multiplayer-capable configs.
    pub fn player_id(mut self, player_id: impl Into<String>) -> Self {
        self.player_id = Some(player_id.into());
        self
    }

    /// Room identity, honored only for multiplayer-capable configs.
    pub fn room_id(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }

    /// Run the bootstrap sequence.
    pub async fn build(self) -> Result<GameHost> {
        let event_bus = self.event_bus.unwrap_or_default();
        event_bus.publish(&Event::LifecycleInit);

        let config = match self.config.ok_or(RuntimeError::MissingConfig)? {
            ConfigSource::Value(config) => {
                config.validate().map_err(parlor_core::ConfigError::from)?;
                config
            }
            ConfigSource::File(path) => GameConfig::from_json_file(&path)?,
        };
        let config = Arc::new(config);

        let registry = self.registry.ok_or(RuntimeError::MissingRegistry)?;
        let module_id = self.module_id.unwrap_or_else(|| config.id.clone());
        let module = registry
            .get(&module_id)
            .ok_or_else(|| RuntimeError::ModuleNotFound {
                id: module_id.clone(),
            })?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.command_buffer);

        // Multiplayer identifiers are only threaded through for modules that
        // declare the capability; everything else sees None, never a
        // placeholder.
        let (player_id, room_id) = if config.multiplayer.supported {
            (self.player_id, self.room_id)
        } else {
            if self.player_id.is_some() || self.room_id.is_some() {
                warn!(module = %module_id, "ignoring player/room ids for single-device module");
            }
            (None, None)
        };

        let ctx = ModuleContext::new(
            Arc::clone(&config),
            Dispatcher::new(command_tx.clone()),
            event_bus.clone(),
            player_id,
            room_id,
        );

        info!(module = %module_id, title = %config.title, "initializing game module");
        module
            .init(&ctx)
            .await
            .map_err(|source| RuntimeError::ModuleInit {
                id: module_id.clone(),
                source,
            })?;

        // Screens and controllers must be registered before the router seeds
        // the first phase.
        let screens = module.screens();
        for phase in &config.phases {
            if !screens.contains_key(&phase.screen_id) {
                return Err(RuntimeError::MissingScreen {
                    phase: phase.id.clone(),
                    screen: phase.screen_id.clone(),
                });
            }
        }
        let controllers = module.phase_controllers();

        let mut router = PhaseRouter::new(Arc::clone(&config), controllers, ctx)?;

        event_bus.publish(&Event::LifecycleReady);

        router.start().await?;
        let (phase_tx, phase_rx) = watch::channel(router.current_phase_id().clone());

        let worker = RouterWorker::new(router, command_rx, phase_tx);
        let worker_handle = tokio::spawn(worker.run());

        let handle = GameHandle::new(config, command_tx.clone(), event_bus, phase_rx);

        Ok(GameHost {
            handle,
            command_tx,
            module,
            worker_handle,
        })
    }
}
