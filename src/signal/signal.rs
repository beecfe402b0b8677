//! # Signal: a hot, multicast event stream.
//!
//! A [`Signal`] is already running: its generator executed exactly once at
//! construction, and every event it pushes is fanned out to however many
//! observers are currently registered. The first terminating event pins the
//! signal in its terminal state and frees all observers.
//!
//! ## Architecture
//! ```text
//! generator ──► input Observer ──► Core.push(event)
//!                                     │  (single mutex: state + pending queue)
//!                                     ▼
//!                               drain loop (one thread at a time)
//!                                     │  snapshot bag under lock,
//!                                     │  deliver outside it
//!                      ┌──────────────┼──────────────┐
//!                      ▼              ▼              ▼
//!                 observer #1    observer #2    observer #N
//! ```
//!
//! ## Rules
//! - **Per-subscription order**: deliveries are serialized by a single
//!   drain loop; a second producer thread enqueues and returns while the
//!   current drainer delivers, so each observer sees events in queue order.
//! - **Re-entrancy**: the lock is never held across an observer callback.
//!   A callback may push, observe, or cancel a subscription on the same
//!   signal from the same thread without deadlocking; nested pushes are
//!   queued and drained by the outer delivery pass.
//! - **Termination finality**: the terminal event is retained; observers
//!   arriving later receive it immediately (and nothing else; past values
//!   are not replayed). External disposal retains no event: late observers
//!   receive silence.
//! - **Disposal vs. delivery**: disposing the signal's lifetime handle
//!   stops future fan-out; a delivery pass already working through its
//!   snapshot completes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dispose::Disposable;
use crate::events::{Callbacks, Event, Observer};
use crate::signal::bag::{Bag, Token};

enum State<T, E> {
    /// Accepting events; the bag holds the registered observers.
    Alive(Bag<Arc<Observer<T, E>>>),
    /// Terminated; the retained terminal event is redelivered to late
    /// observers. `None` after external disposal (nothing to redeliver).
    Terminated(Option<Event<T, E>>),
}

struct Shared<T, E> {
    state: State<T, E>,
    pending: VecDeque<Event<T, E>>,
    draining: bool,
    /// Set once a terminating event is accepted; everything after it is
    /// refused at the door, even while the terminal is still queued.
    closing: bool,
}

struct Core<T, E> {
    shared: Mutex<Shared<T, E>>,
}

impl<T, E> Core<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn lock(&self) -> MutexGuard<'_, Shared<T, E>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: Event<T, E>) {
        let mut shared = self.lock();
        if shared.closing || matches!(shared.state, State::Terminated(_)) {
            return;
        }
        if event.is_terminating() {
            shared.closing = true;
        }
        shared.pending.push_back(event);
        if shared.draining {
            return;
        }
        shared.draining = true;
        self.drain(shared);
    }

    /// Serialized delivery loop. Exactly one thread drains at a time; the
    /// lock is released around every observer callback.
    fn drain<'a>(&'a self, mut shared: MutexGuard<'a, Shared<T, E>>) {
        loop {
            let Some(event) = shared.pending.pop_front() else {
                shared.draining = false;
                return;
            };
            let snapshot = match &shared.state {
                State::Alive(bag) => bag.iter().map(Arc::clone).collect::<Vec<_>>(),
                State::Terminated(_) => {
                    // Disposed while a callback ran; drop the rest.
                    shared.pending.clear();
                    shared.draining = false;
                    return;
                }
            };
            if event.is_terminating() {
                tracing::trace!("signal terminated");
                shared.state = State::Terminated(Some(event.clone()));
                shared.pending.clear();
            }
            drop(shared);
            for observer in &snapshot {
                observer.put(event.clone());
            }
            shared = self.lock();
        }
    }

    /// External disposal: no further fan-out, no terminal event retained.
    fn silence(&self) {
        let mut shared = self.lock();
        if matches!(shared.state, State::Alive(_)) {
            tracing::debug!("signal disposed before termination");
            shared.state = State::Terminated(None);
            shared.pending.clear();
        }
    }

    fn detach(&self, token: Token) {
        let mut shared = self.lock();
        if let State::Alive(bag) = &mut shared.state {
            bag.remove(token);
        }
    }
}

/// The aggregate produced by [`Signal::pipe`]: the signal, its sole input
/// observer, and its lifetime handle, built atomically.
///
/// A partially wired signal is never observable: by the time any of the
/// three parts is handed out, all of them exist.
pub struct Pipe<T, E> {
    /// The hot stream itself.
    pub signal: Signal<T, E>,
    /// The only way to feed events into `signal`.
    pub input: Observer<T, E>,
    /// Disposing this silences the signal (no further fan-out).
    pub disposable: Disposable,
}

/// Hot multicast stream. Cheap to clone; clones share the same core.
pub struct Signal<T, E> {
    core: Arc<Core<T, E>>,
}

impl<T, E> Clone for Signal<T, E> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T, E> Signal<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Builds an unstarted signal with its input observer and lifetime
    /// handle.
    ///
    /// This is the primitive constructor; [`Signal::new`] layers the
    /// generator-invocation contract on top of it.
    #[must_use]
    pub fn pipe() -> Pipe<T, E> {
        let core = Arc::new(Core {
            shared: Mutex::new(Shared {
                state: State::Alive(Bag::new()),
                pending: VecDeque::new(),
                draining: false,
                closing: false,
            }),
        });

        let signal = Signal {
            core: Arc::clone(&core),
        };
        let push = Arc::clone(&core);
        let input = Observer::new(move |event| push.push(event));
        let silence = Arc::downgrade(&core);
        let disposable = Disposable::action(move || {
            if let Some(core) = silence.upgrade() {
                core.silence();
            }
        });

        Pipe {
            signal,
            input,
            disposable,
        }
    }

    /// Runs `generator` exactly once with the signal's input observer and
    /// lifetime handle, then returns the live signal.
    ///
    /// The generator may emit synchronously; observers registered before
    /// those emissions (there are none yet at construction) would see them
    /// in order. To attach observers *before* the generator runs, use
    /// [`Signal::pipe`] or start through a
    /// [`SignalProducer`](crate::SignalProducer).
    pub fn new<G>(generator: G) -> Self
    where
        G: FnOnce(Observer<T, E>, Disposable),
    {
        let Pipe {
            signal,
            input,
            disposable,
        } = Signal::pipe();
        generator(input, disposable);
        signal
    }

    /// Registers an observer; the returned handle removes exactly that
    /// registration.
    ///
    /// If the signal has already terminated, the retained terminal event
    /// (if any) is delivered immediately and an already-disposed handle is
    /// returned. Past values are never replayed.
    pub fn observe(&self, observer: Observer<T, E>) -> Disposable {
        let mut shared = self.core.lock();
        match &mut shared.state {
            State::Alive(bag) => {
                let token = bag.insert(Arc::new(observer));
                let core = Arc::downgrade(&self.core);
                Disposable::action(move || {
                    if let Some(core) = core.upgrade() {
                        core.detach(token);
                    }
                })
            }
            State::Terminated(retained) => {
                let redeliver = retained.clone();
                drop(shared);
                if let Some(event) = redeliver {
                    observer.put(event);
                }
                Disposable::disposed()
            }
        }
    }

    /// Sugar: builds an [`Observer`] from per-kind callbacks and observes.
    pub fn observe_with(&self, callbacks: Callbacks<T, E>) -> Disposable {
        self.observe(Observer::from_callbacks(callbacks))
    }
}
