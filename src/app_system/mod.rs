//! System orchestration, startup, and shutdown logic.

pub mod fulfillment_system;
pub mod tracing;

pub use fulfillment_system::*;
pub use tracing::*;
