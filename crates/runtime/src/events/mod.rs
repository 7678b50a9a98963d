//! Synchronous event bus for lifecycle and transition notifications.
//!
//! Events are grouped into topics; consumers subscribe to a single topic or
//! to everything via the wildcard filter. Delivery is synchronous and in
//! subscription order so observers see one deterministic timeline per
//! dispatch.

mod bus;
mod types;

pub use bus::{EventBus, EventHandler, Subscription, SubscriptionFilter};
pub use types::{Event, Topic};
