//! # Disposable: an idempotent cancellation handle.
//!
//! [`Disposable`] is the leaf of every disposal tree: a boolean that flips
//! `false → true` exactly once, running an optional cleanup action on the
//! winning transition. Handles are cheap to clone; all clones share the same
//! state, so any clone can cancel and every clone observes the flip.
//!
//! ## Rules
//! - `dispose()` is safe to race from multiple threads; the cleanup action
//!   runs **at most once**, on the call that wins the flip.
//! - Cleanup actions never raise; a disposal failure has nowhere to go.
//! - `is_disposed()` turns true at the start of the winning call, before the
//!   cleanup action has necessarily finished.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Action = Box<dyn FnOnce() + Send>;

struct Inner {
    disposed: AtomicBool,
    action: Mutex<Option<Action>>,
}

/// Shared cancellation handle with an optional one-shot cleanup action.
///
/// ## Example
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::sync::Arc;
/// use fluxion::Disposable;
///
/// let runs = Arc::new(AtomicU32::new(0));
/// let probe = Arc::clone(&runs);
/// let handle = Disposable::action(move || {
///     probe.fetch_add(1, Ordering::SeqCst);
/// });
///
/// handle.dispose();
/// handle.dispose(); // second call is a no-op
/// assert!(handle.is_disposed());
/// assert_eq!(runs.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Disposable {
    inner: Arc<Inner>,
}

impl Disposable {
    /// Creates a live handle with no cleanup action.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(None),
            }),
        }
    }

    /// Creates a live handle that runs `action` on the winning `dispose()`.
    #[must_use]
    pub fn action<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(false),
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// Creates a handle that is already disposed.
    ///
    /// Used where a subscription is refused (e.g. observing a signal that
    /// has already terminated) but a handle must still be returned.
    #[must_use]
    pub fn disposed() -> Self {
        Self {
            inner: Arc::new(Inner {
                disposed: AtomicBool::new(true),
                action: Mutex::new(None),
            }),
        }
    }

    /// Flips the handle to disposed and runs the cleanup action.
    ///
    /// Idempotent: every call after the first is a no-op, and the cleanup
    /// action runs exactly once across all racing callers.
    pub fn dispose(&self) {
        if self
            .inner
            .disposed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            let action = self
                .inner
                .action
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(action) = action {
                action();
            }
        }
    }

    /// True once any clone of this handle has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl Default for Disposable {
    fn default() -> Self {
        Self::new()
    }
}
