//! # Observer: the event sink.
//!
//! An [`Observer`] is the single delivery surface of the engine: one method,
//! [`Observer::put`], accepting one [`Event`] at a time. Everything that
//! consumes a stream (user callbacks, the fan-out core of a
//! [`Signal`](crate::Signal), a replay buffer) is an observer.
//!
//! ## Construction
//! - [`Observer::new`] wraps a raw event callback.
//! - [`Observer::from_callbacks`] splits handling into independent
//!   per-kind callbacks ([`Callbacks`]), each defaulting to a no-op.
//! - [`Observer::from_sink`] bridges any [`EventSink`] capability.
//!
//! ## Rules
//! - An observer is **not** inherently thread-safe. Components that expose
//!   one observer to multiple producers ([`Signal`](crate::Signal), the
//!   replay buffer) serialize deliveries themselves.
//! - Callbacks must not panic; stream failure is expressed as
//!   [`Event::Failed`], never as an unwind across the observer boundary.

use crate::events::Event;

/// External sink capability: anything accepting one event at a time.
///
/// Implement this to bridge an existing consumer shape into the engine
/// without writing closure glue; [`Observer::from_sink`] does the wrapping.
pub trait EventSink<T, E> {
    /// Accepts a single event.
    fn accept(&self, event: Event<T, E>);
}

/// Per-kind event callbacks, each optional and defaulting to a no-op.
///
/// Built in the usual `with_*` style and consumed by
/// [`Observer::from_callbacks`]. The `any` callback, when set, fires for
/// every delivery **before** the kind-specific dispatch.
///
/// ## Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use fluxion::{Callbacks, Event, Observer};
///
/// let hits = Arc::new(AtomicU32::new(0));
/// let seen = Arc::clone(&hits);
/// let observer = Observer::from_callbacks(
///     Callbacks::<u32, String>::default().with_next(move |v| {
///         seen.fetch_add(v, Ordering::SeqCst);
///     }),
/// );
///
/// observer.put(Event::Next(2));
/// observer.put(Event::Completed);
/// assert_eq!(hits.load(Ordering::SeqCst), 2);
/// ```
pub struct Callbacks<T, E> {
    pub(crate) next: Option<Box<dyn Fn(T) + Send + Sync>>,
    pub(crate) failed: Option<Box<dyn Fn(E) + Send + Sync>>,
    pub(crate) completed: Option<Box<dyn Fn() + Send + Sync>>,
    pub(crate) any: Option<Box<dyn Fn(&Event<T, E>) + Send + Sync>>,
}

impl<T, E> Default for Callbacks<T, E> {
    fn default() -> Self {
        Self {
            next: None,
            failed: None,
            completed: None,
            any: None,
        }
    }
}

impl<T, E> Callbacks<T, E> {
    /// Sets the callback for [`Event::Next`]; receives the delivered value.
    #[must_use]
    pub fn with_next<F>(mut self, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.next = Some(Box::new(f));
        self
    }

    /// Sets the callback for [`Event::Failed`]; receives the stream error.
    #[must_use]
    pub fn with_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(E) + Send + Sync + 'static,
    {
        self.failed = Some(Box::new(f));
        self
    }

    /// Sets the callback for [`Event::Completed`].
    #[must_use]
    pub fn with_completed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.completed = Some(Box::new(f));
        self
    }

    /// Sets a raw callback fired for **every** event, before kind dispatch.
    #[must_use]
    pub fn with_any<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<T, E>) + Send + Sync + 'static,
    {
        self.any = Some(Box::new(f));
        self
    }
}

/// Single-method event sink wrapping a boxed delivery callback.
pub struct Observer<T, E> {
    action: Box<dyn Fn(Event<T, E>) + Send + Sync>,
}

impl<T, E> Observer<T, E> {
    /// Wraps a raw event callback.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(Event<T, E>) + Send + Sync + 'static,
    {
        Self {
            action: Box::new(action),
        }
    }

    /// Builds an observer from per-kind callbacks.
    ///
    /// Dispatch order per delivery: `any` (if set), then the callback
    /// matching the event's kind (if set).
    pub fn from_callbacks(callbacks: Callbacks<T, E>) -> Self
    where
        T: 'static,
        E: 'static,
    {
        Self::new(move |event| {
            if let Some(any) = &callbacks.any {
                any(&event);
            }
            match event {
                Event::Next(value) => {
                    if let Some(next) = &callbacks.next {
                        next(value);
                    }
                }
                Event::Failed(error) => {
                    if let Some(failed) = &callbacks.failed {
                        failed(error);
                    }
                }
                Event::Completed => {
                    if let Some(completed) = &callbacks.completed {
                        completed();
                    }
                }
            }
        })
    }

    /// Bridges an [`EventSink`] into an observer.
    pub fn from_sink<S>(sink: S) -> Self
    where
        S: EventSink<T, E> + Send + Sync + 'static,
        T: 'static,
        E: 'static,
    {
        Self::new(move |event| sink.accept(event))
    }

    /// Delivers one event.
    #[inline]
    pub fn put(&self, event: Event<T, E>) {
        (self.action)(event);
    }

    /// Shorthand for `put(Event::Next(value))`.
    #[inline]
    pub fn send_next(&self, value: T) {
        self.put(Event::Next(value));
    }

    /// Shorthand for `put(Event::Failed(error))`.
    #[inline]
    pub fn send_failed(&self, error: E) {
        self.put(Event::Failed(error));
    }

    /// Shorthand for `put(Event::Completed)`.
    #[inline]
    pub fn send_completed(&self) {
        self.put(Event::Completed);
    }
}
