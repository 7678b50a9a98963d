//! Cloneable façade over the router worker — the context provider handed to
//! the rendering layer.
//!
//! A handle exposes exactly what screens may touch: the immutable config,
//! the current phase id, `dispatch`, and the event bus. It performs no logic
//! of its own; the phase id is a read-only mirror the worker keeps in sync.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use parlor_core::{GameAction, GameConfig, PhaseId};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Subscription, SubscriptionFilter};
use crate::router::DispatchOutcome;
use crate::worker::Command;

/// Client-facing handle to a running game.
#[derive(Clone)]
pub struct GameHandle {
    config: Arc<GameConfig>,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    phase_rx: watch::Receiver<PhaseId>,
}

impl GameHandle {
    pub(crate) fn new(
        config: Arc<GameConfig>,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        phase_rx: watch::Receiver<PhaseId>,
    ) -> Self {
        Self {
            config,
            command_tx,
            event_bus,
            phase_rx,
        }
    }

    /// The immutable config of the running module.
    pub fn config(&self) -> &Arc<GameConfig> {
        &self.config
    }

    /// The phase the router is currently in.
    ///
    /// Screens select components from this; it only changes after the
    /// corresponding `PHASE/ENTER` event has been published.
    pub fn current_phase_id(&self) -> PhaseId {
        self.phase_rx.borrow().clone()
    }

    /// Route an action through the current phase controller and await the
    /// outcome.
    pub async fn dispatch(&self, action: GameAction) -> Result<DispatchOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Dispatch {
                action,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe a handler on the bus; see [`EventBus::subscribe`].
    pub fn subscribe(
        &self,
        filter: impl Into<SubscriptionFilter>,
        handler: impl FnMut(&Event) -> anyhow::Result<()> + Send + 'static,
    ) -> Subscription {
        self.event_bus.subscribe(filter, handler)
    }

    /// The bus itself, for `once`/wildcard/advanced usage.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
