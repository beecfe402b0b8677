//! # CompositeDisposable: an owning set of cancellation handles.
//!
//! A [`CompositeDisposable`] collects the resources of one producer run
//! (the signal's lifetime handle, subscription removals, scheduler handles,
//! cleanup actions) and cancels the whole tree with a single `dispose()`.
//!
//! ## Rules
//! - Members are disposed **exactly once**, in registration order.
//! - `add` after the composite is disposed does not retain: the new member
//!   is disposed synchronously, immediately.
//! - Composites nest: [`CompositeDisposable::as_disposable`] adapts one
//!   composite into a member of another, which is how cancellation
//!   propagates through [`lift`](crate::SignalProducer::lift).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::dispose::Disposable;

struct Inner {
    disposed: AtomicBool,
    members: Mutex<Vec<Disposable>>,
}

/// Owning, mutable set of [`Disposable`]s disposed together.
///
/// Cheap to clone; all clones share the same member set and flag.
///
/// ## Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use fluxion::{CompositeDisposable, Disposable};
///
/// let runs = Arc::new(AtomicU32::new(0));
/// let composite = CompositeDisposable::new();
///
/// let probe = Arc::clone(&runs);
/// composite.add_action(move || {
///     probe.fetch_add(1, Ordering::SeqCst);
/// });
///
/// composite.dispose();
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
///
/// // late members are disposed on the spot
/// let late = Disposable::new();
/// composite.add(late.clone());
/// assert!(late.is_disposed());
/// ```
#[derive(Clone)]
pub struct CompositeDisposable {
    inner: Arc<Inner>,
}

impl CompositeDisposable {
    /// Creates an empty, live composite.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                members: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Adds a member.
    ///
    /// Retained until the composite is disposed; if the composite is already
    /// disposed, `member` is disposed synchronously and not retained.
    pub fn add(&self, member: Disposable) {
        let mut members = self
            .inner
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // The flag is checked under the member lock: dispose() flips the flag
        // before draining, so a member either lands in the drained list or is
        // disposed here; never neither.
        if self.inner.disposed.load(Ordering::Acquire) {
            drop(members);
            member.dispose();
            return;
        }
        members.push(member);
    }

    /// Adds a plain cleanup action as a member.
    pub fn add_action<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.add(Disposable::action(action));
    }

    /// Disposes every retained member, in registration order.
    ///
    /// Idempotent; racing callers dispose the member set exactly once.
    pub fn dispose(&self) {
        if self
            .inner
            .disposed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let members = {
                let mut members = self
                    .inner
                    .members
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut *members)
            };
            for member in members {
                member.dispose();
            }
        }
    }

    /// True once any clone of this composite has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Number of currently retained members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .members
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no members are currently retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adapts the composite into a plain [`Disposable`] member.
    ///
    /// Disposing the returned handle disposes this composite; registering it
    /// into another composite links the two trees.
    #[must_use]
    pub fn as_disposable(&self) -> Disposable {
        let me = self.clone();
        Disposable::action(move || me.dispose())
    }
}

impl Default for CompositeDisposable {
    fn default() -> Self {
        Self::new()
    }
}
