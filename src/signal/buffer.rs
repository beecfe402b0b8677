//! # Replay buffer: a bounded, oldest-evicting event log with live fan-out.
//!
//! [`buffer`] returns a paired producer and observer over shared state:
//! the observer appends every event to a bounded log and fans it out to the
//! live subscribers; the producer, per start, replays the retained log to
//! the new subscriber and then attaches it live.
//!
//! ## Architecture
//! ```text
//!  input Observer ──► push ──► pending op queue ──► drain loop
//!                                                      │
//!                               ┌── Deliver(event): append → evict → fan out
//!                               └── Attach(observer): replay log → go live
//! ```
//!
//! ## Rules
//! - At most `capacity` non-terminal events are retained, oldest evicted
//!   first. A terminating event freezes the log: it is appended (exempt
//!   from eviction) and nothing is accepted afterwards.
//! - A terminating event also discards the live subscriber set; late
//!   subscribers still receive the full retained log, terminal included.
//! - Replay-then-live order is exact per subscriber even when subscription
//!   races concurrent pushes: attachment is an op in the same serialized
//!   queue as delivery, and an entry stays inactive until its replay is
//!   done.
//! - As everywhere in the engine, the lock is never held across a
//!   subscriber callback, so same-thread re-entrant pushes and
//!   subscriptions cannot deadlock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::dispose::Disposable;
use crate::events::{Event, Observer};
use crate::signal::bag::{Bag, Token};
use crate::signal::producer::SignalProducer;

struct Entry<T, E> {
    observer: Arc<Observer<T, E>>,
    /// False until the entry's replay has completed; inactive entries are
    /// skipped by live fan-out so replay order cannot be overtaken.
    active: bool,
}

enum Op<T, E> {
    Deliver(Event<T, E>),
    Attach(Token),
}

struct Shared<T, E> {
    capacity: usize,
    log: VecDeque<Event<T, E>>,
    subscribers: Bag<Entry<T, E>>,
    pending: VecDeque<Op<T, E>>,
    draining: bool,
    /// Set once a terminating event is accepted; further pushes are refused.
    frozen: bool,
}

struct BufferCore<T, E> {
    shared: Mutex<Shared<T, E>>,
}

impl<T, E> BufferCore<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn new(capacity: usize) -> Self {
        Self {
            shared: Mutex::new(Shared {
                capacity,
                log: VecDeque::new(),
                subscribers: Bag::new(),
                pending: VecDeque::new(),
                draining: false,
                frozen: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared<T, E>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: Event<T, E>) {
        let mut shared = self.lock();
        if shared.frozen {
            return;
        }
        if event.is_terminating() {
            shared.frozen = true;
        }
        shared.pending.push_back(Op::Deliver(event));
        if shared.draining {
            return;
        }
        shared.draining = true;
        self.drain(shared);
    }

    fn attach(core: &Arc<Self>, observer: Observer<T, E>) -> Disposable {
        let mut shared = core.lock();
        let token = shared.subscribers.insert(Entry {
            observer: Arc::new(observer),
            active: false,
        });
        shared.pending.push_back(Op::Attach(token));

        let weak: Weak<Self> = Arc::downgrade(core);
        let removal = Disposable::action(move || {
            if let Some(core) = weak.upgrade() {
                core.detach(token);
            }
        });

        if !shared.draining {
            shared.draining = true;
            core.drain(shared);
        }
        removal
    }

    fn detach(&self, token: Token) {
        let mut shared = self.lock();
        shared.subscribers.remove(token);
    }

    /// Serialized op loop; one thread at a time, lock released around every
    /// subscriber callback.
    fn drain<'a>(&'a self, mut shared: MutexGuard<'a, Shared<T, E>>) {
        loop {
            let Some(op) = shared.pending.pop_front() else {
                shared.draining = false;
                return;
            };
            match op {
                Op::Deliver(event) => {
                    shared.log.push_back(event.clone());
                    if !event.is_terminating() {
                        while shared.log.len() > shared.capacity {
                            shared.log.pop_front();
                            tracing::trace!("buffer evicted oldest retained event");
                        }
                    }
                    let snapshot: Vec<Arc<Observer<T, E>>> = shared
                        .subscribers
                        .iter()
                        .filter(|entry| entry.active)
                        .map(|entry| Arc::clone(&entry.observer))
                        .collect();
                    if event.is_terminating() {
                        // Frozen log keeps the terminal. Live subscribers are
                        // done after this delivery; entries still waiting for
                        // replay survive until their turn.
                        shared.subscribers.retain(|entry| !entry.active);
                    }
                    drop(shared);
                    for observer in &snapshot {
                        observer.put(event.clone());
                    }
                    shared = self.lock();
                }
                Op::Attach(token) => {
                    // A registration cancelled before its replay gets nothing.
                    let observer = match shared.subscribers.get_mut(token) {
                        Some(entry) => Arc::clone(&entry.observer),
                        None => continue,
                    };
                    let replay: Vec<Event<T, E>> = shared.log.iter().cloned().collect();
                    drop(shared);
                    for event in replay {
                        observer.put(event);
                    }
                    shared = self.lock();
                    if shared.frozen {
                        // Nothing live will ever follow; drop the entry.
                        shared.subscribers.remove(token);
                    } else if let Some(entry) = shared.subscribers.get_mut(token) {
                        entry.active = true;
                    }
                }
            }
        }
    }
}

/// Creates a bounded replay buffer.
///
/// Returns a paired `(producer, observer)`:
/// - feeding events to the **observer** appends them to the shared log
///   (evicting the oldest past `capacity`) and fans them out to every live
///   subscriber;
/// - each start of the **producer** replays the full retained log to the
///   new subscriber, in original order, then attaches it live (unless the
///   buffer has already terminated). Cancelling the run detaches it.
///
/// ## Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use fluxion::{buffer, Callbacks};
///
/// let (producer, input) = buffer::<u32, String>(2);
/// input.send_next(1);
/// input.send_next(2);
/// input.send_next(3); // evicts 1
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// producer.start_callbacks(
///     Callbacks::default().with_next(move |v| sink.lock().unwrap().push(v)),
/// );
/// assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
/// ```
pub fn buffer<T, E>(capacity: usize) -> (SignalProducer<T, E>, Observer<T, E>)
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    let core = Arc::new(BufferCore::new(capacity));

    let feed = Arc::clone(&core);
    let input = Observer::new(move |event| feed.push(event));

    let producer = SignalProducer::new(move |observer, run| {
        run.add(BufferCore::attach(&core, observer));
    });

    (producer, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    type Log<T, E> = Arc<StdMutex<Vec<Event<T, E>>>>;

    fn recording<T, E>() -> (Observer<T, E>, Log<T, E>)
    where
        T: Clone + Send + 'static,
        E: Clone + Send + 'static,
    {
        let log: Log<T, E> = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let observer = Observer::new(move |event| sink.lock().unwrap().push(event));
        (observer, log)
    }

    #[test]
    fn test_eviction_keeps_newest_within_capacity() {
        let (producer, input) = buffer::<u32, ()>(2);
        input.send_next(1);
        input.send_next(2);
        input.send_next(3);

        let (obs, log) = recording();
        producer.start(obs);
        assert_eq!(
            *log.lock().unwrap(),
            vec![Event::Next(2), Event::Next(3)],
            "oldest event past capacity must be evicted"
        );
    }

    #[test]
    fn test_terminal_freezes_the_log() {
        let (producer, input) = buffer::<u32, ()>(8);
        input.send_next(1);
        input.send_completed();
        input.send_next(2); // refused

        let (obs, log) = recording();
        producer.start(obs);
        assert_eq!(
            *log.lock().unwrap(),
            vec![Event::Next(1), Event::Completed]
        );
    }

    #[test]
    fn test_live_subscriber_sees_replay_then_live() {
        let (producer, input) = buffer::<u32, ()>(4);
        input.send_next(1);

        let (obs, log) = recording();
        producer.start(obs);
        input.send_next(2);

        assert_eq!(
            *log.lock().unwrap(),
            vec![Event::Next(1), Event::Next(2)]
        );
    }

    #[test]
    fn test_late_subscriber_after_termination_gets_full_replay() {
        let (producer, input) = buffer::<u32, &str>(4);
        input.send_next(1);
        input.send_failed("halt");

        let (obs, log) = recording();
        producer.start(obs);
        assert_eq!(
            *log.lock().unwrap(),
            vec![Event::Next(1), Event::Failed("halt")]
        );
    }

    #[test]
    fn test_cancelling_a_run_detaches_the_subscriber() {
        let (producer, input) = buffer::<u32, ()>(4);

        let (obs, log) = recording();
        let run = producer.start(obs);
        input.send_next(1);
        run.dispose();
        input.send_next(2);

        assert_eq!(*log.lock().unwrap(), vec![Event::Next(1)]);
    }

    #[test]
    fn test_zero_capacity_retains_nothing_but_delivers_live() {
        let (producer, input) = buffer::<u32, ()>(0);

        let (live, live_log) = recording();
        producer.start(live);
        input.send_next(1);
        input.send_next(2);

        assert_eq!(
            *live_log.lock().unwrap(),
            vec![Event::Next(1), Event::Next(2)],
            "live fan-out is unaffected by retention"
        );

        let (late, late_log) = recording();
        producer.start(late);
        assert!(late_log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_zero_capacity_still_retains_the_terminal() {
        let (producer, input) = buffer::<u32, ()>(0);
        input.send_next(1);
        input.send_completed();

        let (obs, log) = recording();
        producer.start(obs);
        assert_eq!(*log.lock().unwrap(), vec![Event::Completed]);
    }

    #[test]
    fn test_run_cancelled_before_replay_sees_nothing() {
        let (producer, input) = buffer::<u32, ()>(4);
        input.send_next(1);

        let nested_log: Log<u32, ()> = Arc::new(StdMutex::new(Vec::new()));
        let nested_ref = Arc::clone(&nested_log);
        let producer_ref = producer.clone();

        // Subscribe from inside a delivery callback (its replay is queued
        // behind the in-progress drain), then cancel before the replay runs.
        producer.start(Observer::new(move |event: Event<u32, ()>| {
            if event == Event::Next(2) {
                let sink = Arc::clone(&nested_ref);
                let run =
                    producer_ref.start(Observer::new(move |ev| sink.lock().unwrap().push(ev)));
                run.dispose();
            }
        }));

        input.send_next(2);
        input.send_next(3);
        assert!(
            nested_log.lock().unwrap().is_empty(),
            "a run cancelled before its replay must observe nothing"
        );
    }

    #[test]
    fn test_reentrant_subscribe_during_delivery() {
        let (producer, input) = buffer::<u32, ()>(4);
        input.send_next(1);

        let nested_log: Log<u32, ()> = Arc::new(StdMutex::new(Vec::new()));
        let nested_ref = Arc::clone(&nested_log);
        let producer_ref = producer.clone();

        let (obs, outer_log) = recording::<u32, ()>();
        producer.start(Observer::new(move |event: Event<u32, ()>| {
            if event == Event::Next(2) {
                // subscribe from inside a delivery callback
                let sink = Arc::clone(&nested_ref);
                producer_ref.start(Observer::new(move |ev| sink.lock().unwrap().push(ev)));
            }
            obs.put(event);
        }));

        input.send_next(2);
        input.send_next(3);

        assert_eq!(
            *outer_log.lock().unwrap(),
            vec![Event::Next(1), Event::Next(2), Event::Next(3)]
        );
        // the nested subscriber replays [1, 2] and then follows live
        assert_eq!(
            *nested_log.lock().unwrap(),
            vec![Event::Next(1), Event::Next(2), Event::Next(3)]
        );
    }
}
