//! # SignalProducer: a cold, re-runnable stream factory.
//!
//! A [`SignalProducer`] performs no work until started. Each call to
//! [`SignalProducer::start_with`] (or one of its sugared forms) builds a
//! fresh [`Signal`]/[`CompositeDisposable`] pair, lets the caller attach
//! observers, and only then invokes the stored start routine, so a value
//! emitted synchronously by the routine can never be missed.
//!
//! ## Architecture
//! ```text
//! start_with(setup):
//!   1. composite ◄── fresh CompositeDisposable (the run's handle)
//!   2. pipe      ◄── fresh Signal + input Observer + lifetime handle
//!   3. composite.add(pipe.disposable)        (cancel ⇒ silence)
//!   4. setup(&signal, &composite)            (caller attaches observers)
//!   5. watcher: signal termination ⇒ composite.dispose()
//!   6. start_routine(input, composite)       (events flow from here on)
//!   7. return composite
//! ```
//!
//! ## Rules
//! - Every run is independent: no state leaks between `start` calls except
//!   through data the routine itself captured (e.g. a shared buffer).
//! - The start routine runs on the calling thread; the engine supplies no
//!   executor.
//! - Cancellation is cooperative: routines that loop must check the
//!   composite's `is_disposed()` before each emission.
//! - A run's composite is disposed automatically once its signal
//!   terminates, releasing scheduler handles and cleanup actions without
//!   caller involvement.

use std::sync::Arc;

use crate::dispose::CompositeDisposable;
use crate::error::TryError;
use crate::events::{Callbacks, Event, Observer};
use crate::signal::signal::{Pipe, Signal};

type StartFn<T, E> = dyn Fn(Observer<T, E>, CompositeDisposable) + Send + Sync;

/// Cold stream factory; each start is an independent run.
///
/// Cheap to clone; clones share the (immutable) start routine.
pub struct SignalProducer<T, E> {
    start: Arc<StartFn<T, E>>,
}

impl<T, E> Clone for SignalProducer<T, E> {
    fn clone(&self) -> Self {
        Self {
            start: Arc::clone(&self.start),
        }
    }
}

impl<T, E> SignalProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wraps a start routine.
    ///
    /// The routine receives the run's input observer and composite; it is
    /// invoked once per `start`, after the caller's observers are attached.
    pub fn new<F>(start: F) -> Self
    where
        F: Fn(Observer<T, E>, CompositeDisposable) + Send + Sync + 'static,
    {
        Self {
            start: Arc::new(start),
        }
    }

    /// Emits one `Next(value)` then `Completed`.
    pub fn value(value: T) -> Self
    where
        T: Sync,
    {
        Self::new(move |observer, _run| {
            observer.send_next(value.clone());
            observer.send_completed();
        })
    }

    /// Emits one `Failed(error)`, no values.
    pub fn error(error: E) -> Self
    where
        E: Sync,
    {
        Self::new(move |observer, _run| {
            observer.send_failed(error.clone());
        })
    }

    /// Delegates to [`SignalProducer::value`] or [`SignalProducer::error`]
    /// based on the result's case.
    pub fn from_result(result: Result<T, E>) -> Self
    where
        T: Sync,
        E: Sync,
    {
        match result {
            Ok(value) => Self::value(value),
            Err(error) => Self::error(error),
        }
    }

    /// Emits every element of `items` in iteration order, then `Completed`.
    ///
    /// The cancellation flag is checked before **every** emission: a run
    /// disposed mid-sequence emits nothing further, including the
    /// completion.
    pub fn from_sequence<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Self::new(move |observer, run| {
            for item in items.clone() {
                if run.is_disposed() {
                    return;
                }
                observer.send_next(item);
            }
            if !run.is_disposed() {
                observer.send_completed();
            }
        })
    }

    /// Emits `Completed` immediately, no values.
    pub fn empty() -> Self {
        Self::new(|observer, _run| observer.send_completed())
    }

    /// Emits nothing, ever, and schedules no cleanup.
    ///
    /// Callers are responsible for cancelling runs of this producer.
    pub fn never() -> Self {
        Self::new(|_observer, _run| {})
    }

    /// Starts a fresh run, handing the caller the signal and its handle
    /// before any event can be emitted.
    ///
    /// `setup` attaches observation; after it returns (unless it disposed
    /// the composite) the start routine runs on the calling thread.
    /// Returns the run's cancellation handle.
    pub fn start_with<F>(&self, setup: F) -> CompositeDisposable
    where
        F: FnOnce(&Signal<T, E>, &CompositeDisposable),
    {
        let composite = CompositeDisposable::new();
        let Pipe {
            signal,
            input,
            disposable,
        } = Signal::pipe();
        composite.add(disposable);

        setup(&signal, &composite);

        if !composite.is_disposed() {
            // Registered after the caller's observers so they see the
            // terminal event before the run's resources are torn down.
            let run = composite.clone();
            composite.add(signal.observe(Observer::new(move |event: Event<T, E>| {
                if event.is_terminating() {
                    run.dispose();
                }
            })));
            tracing::trace!("producer run starting");
            (self.start)(input, composite.clone());
        }
        composite
    }

    /// Starts a fresh run with `observer` as its sole subscriber.
    pub fn start(&self, observer: Observer<T, E>) -> CompositeDisposable {
        self.start_with(move |signal, run| {
            run.add(signal.observe(observer));
        })
    }

    /// Starts a fresh run observed through per-kind callbacks.
    pub fn start_callbacks(&self, callbacks: Callbacks<T, E>) -> CompositeDisposable {
        self.start(Observer::from_callbacks(callbacks))
    }

    /// Lifts a signal-level transform into a producer-level one.
    ///
    /// The returned producer, per start: starts `self`, applies `transform`
    /// to the produced signal, pipes the transformed signal into the outer
    /// observer, and ties the inner run's handle into the outer composite:
    /// cancelling the outer run cancels the inner one.
    pub fn lift<U, F, G>(&self, transform: G) -> SignalProducer<U, F>
    where
        U: Clone + Send + 'static,
        F: Clone + Send + 'static,
        G: Fn(Signal<T, E>) -> Signal<U, F> + Send + Sync + 'static,
    {
        let source = self.clone();
        SignalProducer::new(move |observer, run| {
            let inner = source.start_with(|signal, inner_run| {
                let transformed = transform(signal.clone());
                inner_run.add(transformed.observe(observer));
            });
            run.add(inner.as_disposable());
        })
    }
}

impl<T, E> SignalProducer<T, TryError<E>>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// One-shot fallible operation, invoked once per start.
    ///
    /// - `Ok(Some(value))` — emits `Next(value)` then `Completed`;
    /// - `Ok(None)` — emits `Failed(TryError::Empty)` (no value, no
    ///   explicit error);
    /// - `Err(error)` — emits `Failed(TryError::Inner(error))`.
    pub fn attempt<F>(operation: F) -> Self
    where
        F: Fn() -> Result<Option<T>, E> + Send + Sync + 'static,
    {
        SignalProducer::new(move |observer, _run| match operation() {
            Ok(Some(value)) => {
                observer.send_next(value);
                observer.send_completed();
            }
            Ok(None) => observer.send_failed(TryError::Empty),
            Err(error) => observer.send_failed(TryError::Inner(error)),
        })
    }
}
