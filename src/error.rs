//! Error types produced by the derived stream constructs.
//!
//! This module defines two error enums:
//!
//! - [`TryError`] — failures surfaced by one-shot fallible producers
//!   ([`SignalProducer::attempt`](crate::SignalProducer::attempt));
//! - [`FirstError`] — failures surfaced by the blocking extraction bridge
//!   ([`SignalProducer::first`](crate::SignalProducer::first)).
//!
//! Failure inside a stream is always **data**: an
//! [`Event::Failed`](crate::Event::Failed) carrying one of these (or the
//! caller's own error type), never an unwind crossing the observer
//! boundary. Both enums provide `as_label` for stable log/metric keys.

use thiserror::Error;

/// # Errors produced by one-shot fallible operations.
///
/// A fallible operation may succeed with a value, fail with an explicit
/// error, or yield **neither**: the distinguished [`TryError::Empty`] case.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TryError<E> {
    /// The operation returned no value and supplied no explicit error.
    #[error("operation produced neither a value nor an error")]
    Empty,

    /// The operation failed with an explicit error.
    #[error("operation failed")]
    Inner(E),
}

impl<E> TryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fluxion::TryError;
    ///
    /// let err: TryError<String> = TryError::Empty;
    /// assert_eq!(err.as_label(), "try_empty");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TryError::Empty => "try_empty",
            TryError::Inner(_) => "try_inner",
        }
    }

    /// Returns the wrapped error for [`TryError::Inner`], `None` otherwise.
    pub fn into_inner(self) -> Option<E> {
        match self {
            TryError::Inner(error) => Some(error),
            TryError::Empty => None,
        }
    }
}

/// # Errors produced by blocking single-value extraction.
///
/// [`first`](crate::SignalProducer::first) resolves to exactly one value or
/// exactly one of these failures.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FirstError<E> {
    /// The stream completed without delivering a single value.
    #[error("expected exactly one value, stream completed with none")]
    Empty,

    /// The stream terminated with a failure before delivering a value.
    #[error("stream terminated with a failure")]
    Failed(E),
}

impl<E> FirstError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fluxion::FirstError;
    ///
    /// let err: FirstError<String> = FirstError::Empty;
    /// assert_eq!(err.as_label(), "first_empty");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FirstError::Empty => "first_empty",
            FirstError::Failed(_) => "first_failed",
        }
    }

    /// Returns the wrapped error for [`FirstError::Failed`], `None` otherwise.
    pub fn into_inner(self) -> Option<E> {
        match self {
            FirstError::Failed(error) => Some(error),
            FirstError::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TryError::<()>::Empty.as_label(), "try_empty");
        assert_eq!(TryError::Inner(()).as_label(), "try_inner");
        assert_eq!(FirstError::<()>::Empty.as_label(), "first_empty");
        assert_eq!(FirstError::Failed(()).as_label(), "first_failed");
    }

    #[test]
    fn test_into_inner() {
        assert_eq!(TryError::Inner("e").into_inner(), Some("e"));
        assert_eq!(TryError::<&str>::Empty.into_inner(), None);
        assert_eq!(FirstError::Failed(7).into_inner(), Some(7));
        assert_eq!(FirstError::<i32>::Empty.into_inner(), None);
    }
}
