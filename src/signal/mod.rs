//! Stream engine: hot signals, cold producers, and their derived forms.
//!
//! This module contains the core of the crate:
//! - [`Bag`] — token-addressed observer registry (externally locked);
//! - [`Signal`] — hot multicast stream with serialized, re-entrant-safe
//!   fan-out;
//! - [`SignalProducer`] — cold factory; one independent run per start,
//!   with [`lift`](SignalProducer::lift) for reusable signal transforms;
//! - [`buffer`] — bounded, oldest-evicting replay log over shared state;
//! - [`Effects`] / [`SignalProducer::on`] — side-effect injection;
//! - [`SignalProducer::first`] — blocking single-value extraction.
//!
//! See `signal.rs` for the delivery model all of these share.

mod bag;
mod buffer;
mod effects;
mod first;
mod producer;
#[allow(clippy::module_inception)]
mod signal;

pub use bag::{Bag, Token};
pub use buffer::buffer;
pub use effects::Effects;
pub use producer::SignalProducer;
pub use signal::{Pipe, Signal};
