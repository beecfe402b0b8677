//! # Side-effect injection for producers.
//!
//! [`SignalProducer::on`] wraps a producer so that lifecycle moments and
//! passing events additionally trigger caller-supplied callbacks, without
//! altering the stream: every event is forwarded unchanged, and the
//! callbacks only ever see references.
//!
//! ## Callback order, per start
//! ```text
//! started ─► (wrapped start routine runs)
//!    per event: event ─► next | failed | completed ─► terminated? ─► forward
//! cancellation/termination: disposed
//! ```

use std::sync::Arc;

use crate::events::Event;
use crate::events::Observer;
use crate::signal::producer::SignalProducer;

type Hook = Arc<dyn Fn() + Send + Sync>;
type EventHook<T, E> = Arc<dyn Fn(&Event<T, E>) + Send + Sync>;
type ValueHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type ErrorHook<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Optional side-effect callbacks attached by [`SignalProducer::on`].
///
/// Built in the usual `with_*` style; every callback defaults to a no-op.
/// Callbacks receive references and cannot alter the events flowing past.
///
/// ## Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use fluxion::{Callbacks, Effects, SignalProducer};
///
/// let starts = Arc::new(AtomicU32::new(0));
/// let probe = Arc::clone(&starts);
///
/// let producer = SignalProducer::<u32, ()>::value(1)
///     .on(Effects::default().with_started(move || {
///         probe.fetch_add(1, Ordering::SeqCst);
///     }));
///
/// producer.start_callbacks(Callbacks::default());
/// producer.start_callbacks(Callbacks::default());
/// assert_eq!(starts.load(Ordering::SeqCst), 2);
/// ```
pub struct Effects<T, E> {
    pub(crate) started: Option<Hook>,
    pub(crate) event: Option<EventHook<T, E>>,
    pub(crate) next: Option<ValueHook<T>>,
    pub(crate) failed: Option<ErrorHook<E>>,
    pub(crate) completed: Option<Hook>,
    pub(crate) terminated: Option<Hook>,
    pub(crate) disposed: Option<Hook>,
}

impl<T, E> Default for Effects<T, E> {
    fn default() -> Self {
        Self {
            started: None,
            event: None,
            next: None,
            failed: None,
            completed: None,
            terminated: None,
            disposed: None,
        }
    }
}

impl<T, E> Clone for Effects<T, E> {
    fn clone(&self) -> Self {
        Self {
            started: self.started.clone(),
            event: self.event.clone(),
            next: self.next.clone(),
            failed: self.failed.clone(),
            completed: self.completed.clone(),
            terminated: self.terminated.clone(),
            disposed: self.disposed.clone(),
        }
    }
}

impl<T, E> Effects<T, E> {
    /// Fires before the wrapped start routine runs, once per start.
    #[must_use]
    pub fn with_started<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.started = Some(Arc::new(f));
        self
    }

    /// Fires for every passing event, before kind dispatch.
    #[must_use]
    pub fn with_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&Event<T, E>) + Send + Sync + 'static,
    {
        self.event = Some(Arc::new(f));
        self
    }

    /// Fires for every passing `Next`, with the value.
    #[must_use]
    pub fn with_next<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(f));
        self
    }

    /// Fires for a passing `Failed`, with the error.
    #[must_use]
    pub fn with_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.failed = Some(Arc::new(f));
        self
    }

    /// Fires for a passing `Completed`.
    #[must_use]
    pub fn with_completed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.completed = Some(Arc::new(f));
        self
    }

    /// Fires for either terminal event, after its kind callback.
    #[must_use]
    pub fn with_terminated<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.terminated = Some(Arc::new(f));
        self
    }

    /// Registered into the run's composite; fires when the run is disposed
    /// (on cancellation, or automatically after termination).
    #[must_use]
    pub fn with_disposed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.disposed = Some(Arc::new(f));
        self
    }
}

impl<T, E> SignalProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wraps this producer with side-effect callbacks.
    ///
    /// Per start of the returned producer: `started` fires before the
    /// wrapped routine runs; `disposed` is registered into the composite;
    /// every passing event is routed to `event`, then its kind callback,
    /// then `terminated` when terminating, then forwarded unchanged.
    #[must_use]
    pub fn on(&self, effects: Effects<T, E>) -> SignalProducer<T, E> {
        let source = self.clone();
        SignalProducer::new(move |observer, run| {
            if let Some(started) = &effects.started {
                started();
            }
            if let Some(disposed) = &effects.disposed {
                let disposed = Arc::clone(disposed);
                run.add_action(move || disposed());
            }

            let effects = effects.clone();
            let inner = source.start_with(move |signal, inner_run| {
                let tap = Observer::new(move |event: Event<T, E>| {
                    if let Some(hook) = &effects.event {
                        hook(&event);
                    }
                    match &event {
                        Event::Next(value) => {
                            if let Some(hook) = &effects.next {
                                hook(value);
                            }
                        }
                        Event::Failed(error) => {
                            if let Some(hook) = &effects.failed {
                                hook(error);
                            }
                        }
                        Event::Completed => {
                            if let Some(hook) = &effects.completed {
                                hook();
                            }
                        }
                    }
                    if event.is_terminating() {
                        if let Some(hook) = &effects.terminated {
                            hook();
                        }
                    }
                    observer.put(event);
                });
                inner_run.add(signal.observe(tap));
            });
            run.add(inner.as_disposable());
        })
    }
}
