//! # Blocking extraction of the first value.
//!
//! [`SignalProducer::first`] starts one run and parks the calling thread
//! until the run produces its first event or terminates. The wait is
//! released by a cleanup action registered in the run's composite, so
//! every exit path (first value, failure, completion, cancellation)
//! releases the caller exactly once.
//!
//! This is the only blocking point in the engine. A producer that never
//! emits and never terminates ([`SignalProducer::never`]) will block the
//! caller indefinitely.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crate::error::FirstError;
use crate::events::{Event, Observer};
use crate::signal::producer::SignalProducer;

struct Wait<T, E> {
    outcome: Option<Result<T, FirstError<E>>>,
    released: bool,
}

impl<T, E> SignalProducer<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Starts one run and blocks until it yields its first value or
    /// terminates.
    ///
    /// - first `Next(value)` — records `Ok(value)` and disposes the run
    ///   immediately, before any further value can be produced;
    /// - `Failed(error)` — records `Err(FirstError::Failed(error))`;
    /// - `Completed` with no prior value — records
    ///   `Err(FirstError::Empty)`.
    ///
    /// ## Example
    /// ```
    /// use fluxion::SignalProducer;
    ///
    /// let producer = SignalProducer::<u32, String>::from_sequence(vec![5, 6, 7]);
    /// assert_eq!(producer.first(), Ok(5));
    /// ```
    pub fn first(&self) -> Result<T, FirstError<E>> {
        let gate: Arc<(Mutex<Wait<T, E>>, Condvar)> = Arc::new((
            Mutex::new(Wait {
                outcome: None,
                released: false,
            }),
            Condvar::new(),
        ));

        let handle = self.start_with(|signal, run| {
            let observer_gate = Arc::clone(&gate);
            let observer_run = run.clone();
            run.add(signal.observe(Observer::new(move |event: Event<T, E>| {
                let (state, _) = &*observer_gate;
                let mut wait = state.lock().unwrap_or_else(PoisonError::into_inner);
                match event {
                    Event::Next(value) => {
                        if wait.outcome.is_none() {
                            wait.outcome = Some(Ok(value));
                        }
                        drop(wait);
                        // Stop the run before it can produce anything else.
                        observer_run.dispose();
                    }
                    Event::Failed(error) => {
                        if wait.outcome.is_none() {
                            wait.outcome = Some(Err(FirstError::Failed(error)));
                        }
                    }
                    Event::Completed => {
                        if wait.outcome.is_none() {
                            wait.outcome = Some(Err(FirstError::Empty));
                        }
                    }
                }
            })));

            // Disposal wakes the waiting caller, on every path.
            let release_gate = Arc::clone(&gate);
            run.add_action(move || {
                let (state, ready) = &*release_gate;
                let mut wait = state.lock().unwrap_or_else(PoisonError::into_inner);
                wait.released = true;
                ready.notify_all();
            });
        });

        let (state, ready) = &*gate;
        let mut wait = state.lock().unwrap_or_else(PoisonError::into_inner);
        while !wait.released {
            wait = ready.wait(wait).unwrap_or_else(PoisonError::into_inner);
        }
        let outcome = wait.outcome.take();
        drop(wait);
        drop(handle);

        // A run disposed without ever emitting degenerates to "no value".
        outcome.unwrap_or(Err(FirstError::Empty))
    }
}
