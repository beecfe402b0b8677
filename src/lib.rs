//! # fluxion
//!
//! **Fluxion** is a small library of synchronous, push-driven
//! reactive-stream primitives: hot signals, cold producers, and the
//! disposal trees that tie every run's resources together.
//!
//! It provides the engine only: events, observers, fan-out, cancellation,
//! a bounded replay buffer, a periodic timer over an external scheduler,
//! side-effect injection, and a blocking first-value bridge. There is no
//! built-in executor and no back-pressure: producers run on whichever
//! thread starts them, and fast producers simply push.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     SignalProducer (cold: a start routine, no work yet)
//!           │ start()                       ×N independent runs
//!           ▼
//!     ┌───────────────────────────────────────────────────────┐
//!     │ run                                                   │
//!     │   Signal (hot) ◄── input Observer ◄── start routine   │
//!     │     │ fan-out (serialized drain, lock never held      │
//!     │     │          across a callback)                     │
//!     │     ├──► observer #1                                  │
//!     │     ├──► observer #2                                  │
//!     │     └──► termination watcher ──► composite.dispose()  │
//!     │                                                       │
//!     │   CompositeDisposable (the run's cancellation handle) │
//!     │     ├─ signal lifetime handle                         │
//!     │     ├─ subscription removals                          │
//!     │     ├─ scheduler handles (timer)                      │
//!     │     └─ cleanup actions (first, on(..disposed..))      │
//!     └───────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! build producer ──► start() ──► setup attaches observers
//!                      │
//!                      ├─► start routine emits Next* (Failed | Completed)?
//!                      │         └─► fan-out to every observer, in order
//!                      │
//!                      ├─► terminal event ──► observers freed,
//!                      │                      run auto-disposed
//!                      └─► dispose() at any time ──► whole tree cancelled,
//!                                                    exactly once each
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / functions                    |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Events**        | Value / failure / completion data model and sink surface.    | [`Event`], [`Observer`], [`Callbacks`]   |
//! | **Cancellation**  | Idempotent handles composing into disposal trees.            | [`Disposable`], [`CompositeDisposable`]  |
//! | **Hot streams**   | Multicast fan-out with strict per-subscription order.        | [`Signal`], [`Pipe`], [`Bag`]            |
//! | **Cold streams**  | Re-runnable factories, lifting, one-shot operations.         | [`SignalProducer`]                       |
//! | **Replay**        | Bounded oldest-evicting log replayed to new subscribers.     | [`buffer`]                               |
//! | **Time**          | Periodic ticks over a caller-supplied scheduler.             | [`timer`], [`Scheduler`], [`ThreadScheduler`] |
//! | **Side effects**  | Lifecycle and per-event hooks around a producer.             | [`Effects`], [`SignalProducer::on`]      |
//! | **Extraction**    | Block for exactly one value or failure.                      | [`SignalProducer::first`], [`FirstError`] |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use fluxion::{Callbacks, SignalProducer};
//!
//! let producer = SignalProducer::<u32, String>::from_sequence(vec![1, 2, 3]);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let run = producer.start_callbacks(
//!     Callbacks::default().with_next(move |v| sink.lock().unwrap().push(v)),
//! );
//!
//! // the sequence completed synchronously, so the run is already cleaned up
//! assert!(run.is_disposed());
//! assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
//! ```

mod dispose;
mod error;
mod events;
mod signal;
mod time;

// ---- Public re-exports ----

pub use dispose::{CompositeDisposable, Disposable};
pub use error::{FirstError, TryError};
pub use events::{Callbacks, Event, EventSink, Observer};
pub use signal::{buffer, Bag, Effects, Pipe, Signal, SignalProducer, Token};
pub use time::{timer, Scheduler, ThreadScheduler, TickFn};
