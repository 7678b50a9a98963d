//! Public runtime API surface.
//!
//! Gathers the types consumers of the runtime crate interact with so the
//! other modules can stay focused on orchestration.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::GameHandle;
