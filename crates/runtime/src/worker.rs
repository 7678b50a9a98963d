//! Background task that owns the [`PhaseRouter`].
//!
//! Commands arrive over an mpsc channel and are processed strictly in FIFO
//! order; each dispatch runs to completion before the next begins, which is
//! the no-interleaving guarantee the state machine relies on.

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use parlor_core::{GameAction, PhaseId};

use crate::router::{DispatchOutcome, PhaseRouter};

/// Commands understood by the router worker.
pub enum Command {
    /// Route an action through the current phase controller. The reply is
    /// optional so fire-and-forget dispatchers can reuse the same channel.
    Dispatch {
        action: GameAction,
        reply: Option<oneshot::Sender<DispatchOutcome>>,
    },
    /// Reset to the initial phase and republish `PHASE/ENTER`.
    Restart { reply: oneshot::Sender<()> },
    /// Stop the worker loop.
    Shutdown,
}

/// Fire-and-forget dispatcher handed to module code.
///
/// `transition` must stay synchronous, so module-initiated dispatches are
/// enqueued instead of awaited: they run after the in-flight dispatch
/// finishes, preserving FIFO order.
#[derive(Clone)]
pub struct Dispatcher {
    command_tx: mpsc::Sender<Command>,
}

impl Dispatcher {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Enqueue an action without waiting for the outcome.
    ///
    /// A full or closed queue drops the action with a warning; module code
    /// has no recovery path for either, and the bus timeline makes the drop
    /// observable by omission.
    pub fn dispatch(&self, action: GameAction) {
        if let Err(error) = self.command_tx.try_send(Command::Dispatch {
            action,
            reply: None,
        }) {
            tracing::warn!(%error, "dropping dispatched action");
        }
    }
}

/// Owns the router and processes commands until shutdown.
pub struct RouterWorker {
    router: PhaseRouter,
    command_rx: mpsc::Receiver<Command>,
    phase_tx: watch::Sender<PhaseId>,
}

impl RouterWorker {
    pub(crate) fn new(
        router: PhaseRouter,
        command_rx: mpsc::Receiver<Command>,
        phase_tx: watch::Sender<PhaseId>,
    ) -> Self {
        Self {
            router,
            command_rx,
            phase_tx,
        }
    }

    /// Main worker loop. Exits when a [`Command::Shutdown`] arrives or every
    /// sender is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Dispatch { action, reply } => {
                    let outcome = self.router.dispatch(&action).await;
                    self.sync_phase();
                    if let Some(reply) = reply
                        && reply.send(outcome).is_err()
                    {
                        debug!("dispatch reply channel closed (caller dropped)");
                    }
                }
                Command::Restart { reply } => {
                    self.router.reset().await;
                    self.sync_phase();
                    if reply.send(()).is_err() {
                        debug!("restart reply channel closed (caller dropped)");
                    }
                }
                Command::Shutdown => break,
            }
        }
        debug!("router worker stopped");
    }

    /// Mirror the router-owned phase into the watch channel so handles read
    /// a value that is always consistent with the worker's state.
    fn sync_phase(&self) {
        self.phase_tx
            .send_replace(self.router.current_phase_id().clone());
    }
}
