//! Orchestration runtime for the party-game hosting shell.
//!
//! This crate wires the module contract, event bus, and phase state machine
//! into a cohesive API. A host embeds [`GameHost`] to load one game module,
//! drive its phases through [`GameHandle::dispatch`], and observe lifecycle
//! and transition events on the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`host`] runs the bootstrap pipeline and owns the router worker
//! - [`router`] is the state machine engine (the dispatcher)
//! - [`registry`] holds installed game modules
//! - [`module`] defines the contract game modules implement
//! - [`events`] provides the synchronous topic-based event bus
//! - [`api`] exposes the types downstream clients interact with

pub mod api;
pub mod events;
pub mod host;
pub mod module;
pub mod registry;
pub mod router;
pub mod telemetry;

mod worker;

pub use api::{GameHandle, Result, RuntimeError};
pub use events::{Event, EventBus, Subscription, SubscriptionFilter, Topic};
pub use host::{GameHost, GameHostBuilder};
pub use module::{GameModule, ModuleContext, PhaseController};
pub use registry::ModuleRegistry;
pub use router::{DispatchOutcome, PhaseRouter};
pub use worker::Dispatcher;
