//! Phase router: the per-module state machine engine.
//!
//! The router owns `current_phase` — the only mutable state in the core —
//! and applies controller decisions to it. Everything observable happens
//! through bus events, in the fixed order documented on [`PhaseRouter::dispatch`].

use std::collections::HashMap;
use std::sync::Arc;

use parlor_core::{GameAction, GameConfig, PhaseId, TransitionResult};
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus};
use crate::module::{ModuleContext, PhaseController};

/// Reply for one dispatch call.
///
/// Events on the bus carry the same information; the outcome exists so
/// programmatic callers get an answer without subscribing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Controller returned `Stay`; no phase change.
    Stayed,
    /// Transitioned into the contained phase.
    Moved(PhaseId),
    /// The run ended.
    Completed,
    /// Action was not in the current phase's allowed set (or the run had
    /// already completed). Silently ignored beyond the `ACTION/DISPATCH`
    /// event.
    Rejected,
    /// A recoverable failure, already reported as an `ERROR` event.
    Failed(String),
}

/// The state machine engine for one module run.
pub struct PhaseRouter {
    config: Arc<GameConfig>,
    controllers: HashMap<PhaseId, Arc<dyn PhaseController>>,
    ctx: ModuleContext,
    event_bus: EventBus,
    current_phase: PhaseId,
    started: bool,
    completed: bool,
}

impl PhaseRouter {
    /// Build a router over a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ModuleNotReady`] when the config has no
    /// phases or no controller was registered for the initial phase — the
    /// router fails closed rather than entering an undefined phase.
    pub fn new(
        config: Arc<GameConfig>,
        controllers: HashMap<PhaseId, Arc<dyn PhaseController>>,
        ctx: ModuleContext,
    ) -> Result<Self> {
        let initial = config
            .initial_phase()
            .ok_or_else(|| RuntimeError::ModuleNotReady {
                reason: "config declares no phases".into(),
            })?
            .id
            .clone();

        if !controllers.contains_key(&initial) {
            return Err(RuntimeError::ModuleNotReady {
                reason: format!("no controller registered for initial phase {initial}"),
            });
        }

        let event_bus = ctx.event_bus().clone();
        Ok(Self {
            config,
            controllers,
            ctx,
            event_bus,
            current_phase: initial,
            started: false,
            completed: false,
        })
    }

    pub fn current_phase_id(&self) -> &PhaseId {
        &self.current_phase
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Seed the initial phase: run its `on_enter` hook and publish
    /// `PHASE/ENTER` for `config.phases[0]`.
    pub async fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let phase = self.current_phase.clone();
        self.run_enter_hook(&phase).await;
        self.event_bus.publish(&Event::PhaseEnter { phase_id: phase });
        Ok(())
    }

    /// Reset to the initial phase and republish `PHASE/ENTER`, e.g. after a
    /// completed run.
    pub async fn reset(&mut self) {
        let initial = self
            .config
            .initial_phase()
            .expect("validated config has phases")
            .id
            .clone();

        debug!(phase = %initial, "resetting router to initial phase");
        self.completed = false;
        self.started = true;
        self.current_phase = initial.clone();
        self.run_enter_hook(&initial).await;
        self.event_bus.publish(&Event::PhaseEnter { phase_id: initial });
    }

    /// Route one action through the current phase controller.
    ///
    /// Event order within a call is fixed:
    /// `ACTION/DISPATCH` always comes first; a `Goto` publishes
    /// `PHASE/EXIT` (and runs `on_exit`) strictly before the phase variable
    /// changes, and `PHASE/ENTER` (after `on_enter`) strictly after.
    pub async fn dispatch(&mut self, action: &GameAction) -> DispatchOutcome {
        // Published unconditionally for observability, even when the action
        // is ultimately rejected.
        self.event_bus.publish(&Event::ActionDispatch {
            action: action.clone(),
        });

        if !self.started {
            return self.fail(RuntimeError::ModuleNotReady {
                reason: "dispatch before the router was started".into(),
            });
        }

        if self.completed {
            debug!(kind = %action.kind, "dispatch after completion ignored");
            return DispatchOutcome::Rejected;
        }

        let Some(descriptor) = self.config.phase(&self.current_phase) else {
            // Unreachable on a validated config; guard anyway.
            return self.fail(RuntimeError::UnknownPhase {
                phase: self.current_phase.clone(),
            });
        };

        // Controller resolution comes before the allowed-actions gate: a
        // phase without a controller is a module bug worth reporting no
        // matter which action exposed it.
        let Some(controller) = self.controllers.get(&self.current_phase).cloned() else {
            return self.fail(RuntimeError::MissingController {
                phase: self.current_phase.clone(),
            });
        };

        // Stray UI events from a previous phase are expected noise, not
        // faults: ignore without an ERROR event.
        if !descriptor.allows(&action.kind) {
            debug!(
                kind = %action.kind,
                phase = %self.current_phase,
                "action not allowed in current phase"
            );
            return DispatchOutcome::Rejected;
        }

        match controller.transition(action, &self.ctx) {
            TransitionResult::Stay => DispatchOutcome::Stayed,
            TransitionResult::Goto(next) => self.apply_goto(controller, next).await,
            TransitionResult::Complete => {
                self.completed = true;
                self.event_bus.publish(&Event::GameComplete);
                DispatchOutcome::Completed
            }
            TransitionResult::Error(message) => self.fail(RuntimeError::Transition(message)),
        }
    }

    async fn apply_goto(
        &mut self,
        current_controller: Arc<dyn PhaseController>,
        next: PhaseId,
    ) -> DispatchOutcome {
        if !self.config.has_phase(&next) {
            return self.fail(RuntimeError::UnknownPhase { phase: next });
        }

        let previous = self.current_phase.clone();
        self.event_bus.publish(&Event::PhaseExit {
            phase_id: previous.clone(),
        });
        if let Err(error) = current_controller.on_exit(&self.ctx).await {
            warn!(phase = %previous, %error, "on_exit hook failed");
            self.event_bus
                .publish(&Event::error(format!("on_exit for phase {previous} failed: {error}")));
        }

        self.current_phase = next.clone();

        self.run_enter_hook(&next).await;
        self.event_bus.publish(&Event::PhaseEnter {
            phase_id: next.clone(),
        });

        debug!(from = %previous, to = %next, "phase transition applied");
        DispatchOutcome::Moved(next)
    }

    async fn run_enter_hook(&self, phase: &PhaseId) {
        if let Some(controller) = self.controllers.get(phase)
            && let Err(error) = controller.on_enter(&self.ctx).await
        {
            warn!(phase = %phase, %error, "on_enter hook failed");
            self.event_bus
                .publish(&Event::error(format!("on_enter for phase {phase} failed: {error}")));
        }
    }

    /// Report a recoverable failure: one `ERROR` event, state unchanged.
    fn fail(&self, error: RuntimeError) -> DispatchOutcome {
        let message = error.to_string();
        warn!(%message, phase = %self.current_phase, "dispatch failed");
        self.event_bus.publish(&Event::error(message.clone()));
        DispatchOutcome::Failed(message)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parlor_core::{ActionKind, PhaseDescriptor, ScreenId, ScreenRef};
    use tokio::sync::mpsc;

    use super::*;
    use crate::worker::Dispatcher;

    /// Controller that always answers with a fixed result and counts calls.
    struct ScriptController {
        result: TransitionResult,
        calls: Arc<AtomicUsize>,
        name: &'static str,
        hook_log: Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl PhaseController for ScriptController {
        async fn on_enter(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
            self.hook_log.lock().unwrap().push(format!("enter:{}", self.name));
            Ok(())
        }

        async fn on_exit(&self, _ctx: &ModuleContext) -> anyhow::Result<()> {
            self.hook_log.lock().unwrap().push(format!("exit:{}", self.name));
            Ok(())
        }

        fn transition(&self, _action: &GameAction, _ctx: &ModuleContext) -> TransitionResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    struct Fixture {
        router: PhaseRouter,
        bus: EventBus,
        events: Arc<StdMutex<Vec<Event>>>,
        hook_log: Arc<StdMutex<Vec<String>>>,
        calls: HashMap<&'static str, Arc<AtomicUsize>>,
        // Keeps the command channel open for the dispatcher.
        _command_rx: mpsc::Receiver<crate::worker::Command>,
        _subscription: crate::events::Subscription,
    }

    fn config() -> GameConfig {
        GameConfig {
            id: "test".into(),
            title: "Test Game".into(),
            version: "0.0.1".into(),
            min_players: 1,
            max_players: 4,
            phases: vec![
                PhaseDescriptor::new("intro", "s-intro", vec![ActionKind::Advance]),
                PhaseDescriptor::new(
                    "play",
                    "s-play",
                    vec![ActionKind::Advance, ActionKind::Back],
                ),
                PhaseDescriptor::new("summary", "s-summary", vec![ActionKind::Restart]),
            ],
            screens: HashMap::from([
                (ScreenId::from("s-intro"), ScreenRef::from("Intro")),
                (ScreenId::from("s-play"), ScreenRef::from("Play")),
                (ScreenId::from("s-summary"), ScreenRef::from("Summary")),
            ]),
            content: None,
            features: HashMap::new(),
            multiplayer: Default::default(),
        }
    }

    /// Build a router whose controllers answer with the scripted results.
    /// Phases omitted from `script` get no controller at all.
    fn fixture(script: &[(&'static str, TransitionResult)]) -> Fixture {
        let config = Arc::new(config());
        let bus = EventBus::new();
        let (command_tx, command_rx) = mpsc::channel(8);
        let ctx = ModuleContext::new(
            Arc::clone(&config),
            Dispatcher::new(command_tx),
            bus.clone(),
            None,
            None,
        );

        let hook_log = Arc::new(StdMutex::new(Vec::new()));
        let mut calls = HashMap::new();
        let mut controllers: HashMap<PhaseId, Arc<dyn PhaseController>> = HashMap::new();
        for (name, result) in script {
            let counter = Arc::new(AtomicUsize::new(0));
            calls.insert(*name, Arc::clone(&counter));
            controllers.insert(
                PhaseId::from(*name),
                Arc::new(ScriptController {
                    result: result.clone(),
                    calls: counter,
                    name,
                    hook_log: Arc::clone(&hook_log),
                }),
            );
        }

        let router = PhaseRouter::new(config, controllers, ctx).unwrap();

        let events = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let subscription =
            bus.subscribe(crate::events::SubscriptionFilter::All, move |event| {
                sink.lock().unwrap().push(event.clone());
                Ok(())
            });

        Fixture {
            router,
            bus,
            events,
            hook_log,
            calls,
            _command_rx: command_rx,
            _subscription: subscription,
        }
    }

    fn advance() -> GameAction {
        GameAction::new(ActionKind::Advance)
    }

    #[tokio::test]
    async fn start_seeds_initial_phase() {
        let mut fx = fixture(&[("intro", TransitionResult::Stay)]);
        fx.router.start().await.unwrap();

        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("intro"));
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![Event::PhaseEnter { phase_id: "intro".into() }]
        );
        assert_eq!(*fx.hook_log.lock().unwrap(), vec!["enter:intro"]);
    }

    #[tokio::test]
    async fn missing_initial_controller_fails_closed() {
        let config = Arc::new(config());
        let bus = EventBus::new();
        let (command_tx, _command_rx) = mpsc::channel(8);
        let ctx = ModuleContext::new(
            Arc::clone(&config),
            Dispatcher::new(command_tx),
            bus,
            None,
            None,
        );

        let err = PhaseRouter::new(config, HashMap::new(), ctx).err().unwrap();
        assert!(matches!(err, RuntimeError::ModuleNotReady { .. }));
    }

    #[tokio::test]
    async fn goto_publishes_exit_before_enter() {
        let mut fx = fixture(&[
            ("intro", TransitionResult::goto("play")),
            ("play", TransitionResult::Stay),
        ]);
        fx.router.start().await.unwrap();
        fx.events.lock().unwrap().clear();
        fx.hook_log.lock().unwrap().clear();

        let action = advance();
        let outcome = fx.router.dispatch(&action).await;

        assert_eq!(outcome, DispatchOutcome::Moved("play".into()));
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("play"));
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![
                Event::ActionDispatch { action },
                Event::PhaseExit { phase_id: "intro".into() },
                Event::PhaseEnter { phase_id: "play".into() },
            ]
        );
        assert_eq!(*fx.hook_log.lock().unwrap(), vec!["exit:intro", "enter:play"]);
    }

    #[tokio::test]
    async fn disallowed_action_is_a_silent_no_op() {
        let mut fx = fixture(&[("intro", TransitionResult::goto("play"))]);
        fx.router.start().await.unwrap();
        fx.events.lock().unwrap().clear();

        let action = GameAction::new(ActionKind::Reveal);
        let outcome = fx.router.dispatch(&action).await;

        assert_eq!(outcome, DispatchOutcome::Rejected);
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("intro"));
        assert_eq!(fx.calls["intro"].load(Ordering::SeqCst), 0, "transition never ran");
        // Only the observability event, no ERROR.
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![Event::ActionDispatch { action }]
        );
    }

    #[tokio::test]
    async fn controller_error_reports_once_and_keeps_state() {
        let mut fx = fixture(&[("intro", TransitionResult::error("not yet"))]);
        fx.router.start().await.unwrap();
        fx.events.lock().unwrap().clear();

        let outcome = fx.router.dispatch(&advance()).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("intro"));
        let events = fx.events.lock().unwrap();
        let errors: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, Event::Error { .. }))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            &Event::error("transition failed: not yet")
        );
    }

    #[tokio::test]
    async fn goto_unknown_phase_reports_error_and_keeps_state() {
        let mut fx = fixture(&[("intro", TransitionResult::goto("nowhere"))]);
        fx.router.start().await.unwrap();
        fx.events.lock().unwrap().clear();

        let outcome = fx.router.dispatch(&advance()).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("intro"));
        let events = fx.events.lock().unwrap();
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Error { message } if message.contains("unknown phase nowhere")
        )));
    }

    #[tokio::test]
    async fn missing_controller_is_non_fatal() {
        // "play" has no controller; reach it via intro.
        let mut fx = fixture(&[("intro", TransitionResult::goto("play"))]);
        fx.router.start().await.unwrap();
        fx.router.dispatch(&advance()).await;
        fx.events.lock().unwrap().clear();

        let outcome = fx.router.dispatch(&advance()).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("play"));
        let events = fx.events.lock().unwrap();
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Error { message } if message.contains("no controller registered for phase play")
        )));
    }

    #[tokio::test]
    async fn missing_controller_outranks_the_allowed_actions_gate() {
        // "play" allows ADVANCE and BACK but has no controller; even an
        // action the phase does not allow must surface the missing
        // controller instead of being silently ignored.
        let mut fx = fixture(&[("intro", TransitionResult::goto("play"))]);
        fx.router.start().await.unwrap();
        fx.router.dispatch(&advance()).await;
        fx.events.lock().unwrap().clear();

        let action = GameAction::new(ActionKind::Reveal);
        let outcome = fx.router.dispatch(&action).await;

        assert!(matches!(outcome, DispatchOutcome::Failed(_)));
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("play"));
        let events = fx.events.lock().unwrap();
        assert!(events.iter().any(|event| matches!(
            event,
            Event::Error { message } if message.contains("no controller registered for phase play")
        )));
    }

    #[tokio::test]
    async fn complete_ends_the_run_until_reset() {
        let mut fx = fixture(&[("intro", TransitionResult::Complete)]);
        fx.router.start().await.unwrap();
        fx.events.lock().unwrap().clear();

        assert_eq!(fx.router.dispatch(&advance()).await, DispatchOutcome::Completed);
        assert!(fx.router.is_completed());
        assert!(fx.events.lock().unwrap().contains(&Event::GameComplete));

        // Post-completion dispatches are ignored.
        assert_eq!(fx.router.dispatch(&advance()).await, DispatchOutcome::Rejected);
        assert_eq!(fx.calls["intro"].load(Ordering::SeqCst), 1);

        fx.events.lock().unwrap().clear();
        fx.router.reset().await;
        assert!(!fx.router.is_completed());
        assert_eq!(fx.router.current_phase_id(), &PhaseId::from("intro"));
        assert_eq!(
            *fx.events.lock().unwrap(),
            vec![Event::PhaseEnter { phase_id: "intro".into() }]
        );
    }

    #[tokio::test]
    async fn bus_clear_detaches_observers() {
        let mut fx = fixture(&[("intro", TransitionResult::Stay)]);
        fx.router.start().await.unwrap();
        fx.bus.clear();
        fx.events.lock().unwrap().clear();

        fx.router.dispatch(&advance()).await;
        assert!(fx.events.lock().unwrap().is_empty());
    }
}
