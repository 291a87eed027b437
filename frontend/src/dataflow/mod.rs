//! Actor+Relay primitives the panel's state flows through.
//!
//! - [`Relay`] carries events from UI handlers to an actor.
//! - [`Actor`] owns one piece of state and applies events to it sequentially.
//! - [`Atom`] is an actor with a built-in setter, for view-local state.
//!
//! UI code never mutates state directly; it sends through a relay and renders
//! from the actor's signals.

pub mod actor;
pub mod atom;
pub mod relay;

pub use actor::Actor;
pub use atom::Atom;
pub use relay::{Relay, relay};
