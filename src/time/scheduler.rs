//! # Scheduler: the clock-and-ticks capability.
//!
//! The engine never owns an executor; anything periodic is delegated to a
//! [`Scheduler`] supplied by the caller. The contract is deliberately
//! small: a clock, and "run this repeatedly, cancellable".
//!
//! [`ThreadScheduler`] is the built-in backend: one plain thread per
//! scheduled action, sleeping between ticks and exiting once its handle is
//! disposed. Callers with their own timing wheel or runtime implement
//! [`Scheduler`] over it instead.

use std::time::{Duration, SystemTime};

use crate::dispose::Disposable;

/// Repeating-action callback handed to a scheduler.
pub type TickFn = Box<dyn Fn() + Send + Sync>;

/// Clock plus repeating-action scheduling, consumed by
/// [`timer`](crate::timer).
pub trait Scheduler: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;

    /// Schedules `action` to run repeatedly: first after `interval`, then
    /// every `interval` thereafter, with `leeway` as a coalescing hint.
    ///
    /// Returns the cancellation handle; disposing it stops future ticks.
    /// A tick already executing completes.
    fn schedule_repeating(
        &self,
        interval: Duration,
        leeway: Duration,
        action: TickFn,
    ) -> Disposable;
}

/// Thread-per-action scheduler backend.
///
/// Each scheduled action gets a dedicated thread that sleeps for the
/// interval, checks its handle, and fires. The sleep backend treats
/// `leeway` as zero (it is a coalescing hint, and plain sleeps do not
/// coalesce). Disposal is observed at the next wakeup, so a stopped
/// action's thread lingers for at most one interval.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use fluxion::{Scheduler, ThreadScheduler};
///
/// let scheduler = Arc::new(ThreadScheduler);
/// let handle = scheduler.schedule_repeating(
///     Duration::from_millis(100),
///     Duration::ZERO,
///     Box::new(|| println!("tick")),
/// );
/// // ...
/// handle.dispose();
/// ```
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn schedule_repeating(
        &self,
        interval: Duration,
        _leeway: Duration,
        action: TickFn,
    ) -> Disposable {
        let handle = Disposable::new();
        let flag = handle.clone();

        let spawned = std::thread::Builder::new()
            .name("fluxion-timer".to_string())
            .spawn(move || loop {
                std::thread::sleep(interval);
                if flag.is_disposed() {
                    break;
                }
                action();
            });
        if spawned.is_err() {
            tracing::error!("failed to spawn timer thread");
            return Disposable::disposed();
        }
        handle
    }
}
