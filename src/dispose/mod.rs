//! Cancellation and deterministic cleanup.
//!
//! Every producer run owns a tree of resources; this module provides the
//! two nodes the tree is built from:
//! - [`Disposable`] — idempotent leaf handle with a one-shot cleanup action;
//! - [`CompositeDisposable`] — owning set that disposes its members exactly
//!   once, in registration order, and nests into larger trees.
//!
//! Cancellation is cooperative: producers poll `is_disposed()` between
//! emissions, schedulers register their own handles, and disposing the root
//! of a tree propagates to every leaf.

mod composite;
mod disposable;

pub use composite::CompositeDisposable;
pub use disposable::Disposable;
