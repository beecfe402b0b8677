//! # Periodic timer producer.
//!
//! [`timer`] lifts a [`Scheduler`](crate::Scheduler) tick stream into a
//! producer: each start schedules its own repeating action, each tick
//! delivers `Next(now)`, and the stream never completes; cancelling the
//! run is the only way to stop it.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::signal::SignalProducer;
use crate::time::scheduler::Scheduler;

/// Creates a producer delivering the scheduler's current time on every
/// tick.
///
/// Per start: a repeating action is scheduled on `scheduler` (first tick
/// after `interval`, `leeway` passed through as a coalescing hint), and the
/// scheduler's cancellation handle is registered into the run's composite:
/// disposing the run stops future ticks. The stream never completes.
///
/// Durations are unsigned by construction; there is no negative-interval
/// case to guard.
///
/// ## Example
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use fluxion::{timer, Callbacks, ThreadScheduler};
///
/// let ticks = timer::<String>(
///     Duration::from_millis(250),
///     Arc::new(ThreadScheduler),
///     Duration::ZERO,
/// );
/// let run = ticks.start_callbacks(
///     Callbacks::default().with_next(|at| println!("tick at {at:?}")),
/// );
/// // ...
/// run.dispose();
/// ```
pub fn timer<E>(
    interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    leeway: Duration,
) -> SignalProducer<SystemTime, E>
where
    E: Clone + Send + 'static,
{
    SignalProducer::new(move |observer, run| {
        let clock = Arc::clone(&scheduler);
        let handle = scheduler.schedule_repeating(
            interval,
            leeway,
            Box::new(move || observer.send_next(clock.now())),
        );
        run.add(handle);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispose::Disposable;
    use crate::events::Event;
    use crate::events::Observer;
    use crate::time::scheduler::TickFn;
    use std::sync::{Mutex as StdMutex, PoisonError};

    /// Deterministic scheduler: ticks only when the test says so.
    struct ManualScheduler {
        now: StdMutex<SystemTime>,
        scheduled: StdMutex<Vec<(TickFn, Disposable)>>,
    }

    impl ManualScheduler {
        fn new() -> Self {
            Self {
                now: StdMutex::new(SystemTime::UNIX_EPOCH),
                scheduled: StdMutex::new(Vec::new()),
            }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *now += by;
        }

        fn tick(&self) {
            let scheduled = self.scheduled.lock().unwrap_or_else(PoisonError::into_inner);
            for (action, handle) in scheduled.iter() {
                if !handle.is_disposed() {
                    action();
                }
            }
        }
    }

    impl Scheduler for ManualScheduler {
        fn now(&self) -> SystemTime {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn schedule_repeating(
            &self,
            _interval: Duration,
            _leeway: Duration,
            action: TickFn,
        ) -> Disposable {
            let handle = Disposable::new();
            self.scheduled
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((action, handle.clone()));
            handle
        }
    }

    #[test]
    fn test_each_tick_delivers_current_time() {
        let scheduler = Arc::new(ManualScheduler::new());
        let producer = timer::<()>(
            Duration::from_secs(1),
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
            Duration::ZERO,
        );

        let log = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        producer.start(Observer::new(move |event: Event<SystemTime, ()>| {
            sink.lock().unwrap().push(event);
        }));

        let t0 = scheduler.now();
        scheduler.tick();
        scheduler.advance(Duration::from_secs(1));
        let t1 = scheduler.now();
        scheduler.tick();

        assert_eq!(
            *log.lock().unwrap(),
            vec![Event::Next(t0), Event::Next(t1)],
            "every tick must carry the scheduler's clock"
        );
    }

    #[test]
    fn test_timer_never_completes() {
        let scheduler = Arc::new(ManualScheduler::new());
        let producer = timer::<()>(
            Duration::from_secs(1),
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
            Duration::ZERO,
        );

        let log = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        producer.start(Observer::new(move |event: Event<SystemTime, ()>| {
            sink.lock().unwrap().push(event);
        }));

        for _ in 0..3 {
            scheduler.tick();
        }
        assert!(log.lock().unwrap().iter().all(Event::is_next));
    }

    #[test]
    fn test_disposing_the_run_stops_future_ticks() {
        let scheduler = Arc::new(ManualScheduler::new());
        let producer = timer::<()>(
            Duration::from_secs(1),
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
            Duration::ZERO,
        );

        let log = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let run = producer.start(Observer::new(move |event: Event<SystemTime, ()>| {
            sink.lock().unwrap().push(event);
        }));

        scheduler.tick();
        run.dispose();
        scheduler.tick();
        scheduler.tick();

        assert_eq!(log.lock().unwrap().len(), 1, "no ticks after disposal");
    }

    #[test]
    fn test_independent_runs_tick_independently() {
        let scheduler = Arc::new(ManualScheduler::new());
        let producer = timer::<()>(
            Duration::from_secs(1),
            Arc::clone(&scheduler) as Arc<dyn Scheduler>,
            Duration::ZERO,
        );

        let count = |log: &Arc<StdMutex<Vec<Event<SystemTime, ()>>>>| log.lock().unwrap().len();

        let log_a = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log_a);
        let run_a = producer.start(Observer::new(move |event: Event<SystemTime, ()>| {
            sink.lock().unwrap().push(event);
        }));

        scheduler.tick();

        let log_b = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log_b);
        producer.start(Observer::new(move |event: Event<SystemTime, ()>| {
            sink.lock().unwrap().push(event);
        }));

        scheduler.tick();
        run_a.dispose();
        scheduler.tick();

        assert_eq!(count(&log_a), 2);
        assert_eq!(count(&log_b), 2);
    }
}
