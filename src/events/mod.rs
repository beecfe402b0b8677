//! Event data model and delivery surface.
//!
//! This module groups the stream **data model** and the **sink** used to
//! deliver it:
//! - [`Event`] — value / failure / completion, with terminal predicates;
//! - [`Observer`] + [`Callbacks`] — the one-method delivery capability and
//!   its per-kind callback constructor;
//! - [`EventSink`] — boundary trait for bridging foreign consumer shapes.
//!
//! Producers push events; the fan-out machinery behind
//! [`Signal`](crate::Signal) serializes and distributes them.

mod event;
mod observer;

pub use event::Event;
pub use observer::{Callbacks, EventSink, Observer};
