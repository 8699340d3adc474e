//! The `subscription` module lets consumers observe a selection store
//! without polling.
//!
//! - [`ListenerRegistry`]: ordered callback list with per-listener failure isolation.
//! - [`Subscription`]: handle that deregisters a callback, explicitly or on drop.
//! - [`LiveSelection`]: a per-consumer view that mirrors the current members
//!   and forwards mutations to the shared store.

pub mod handle;
pub mod live;
pub mod registry;

pub use handle::Subscription;
pub use live::LiveSelection;
pub use registry::{Callback, ListenerRegistry, SubscriberId};

#[cfg(test)]
mod tests;
