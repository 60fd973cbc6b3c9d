// src/error.rs

use core::fmt;

/// Error returned when a [`BoundedQueue`](crate::BoundedQueue) cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
  /// The requested capacity is negative or does not fit in a `usize`.
  #[error("invalid argument: queue capacity must be a non-negative integer, got {capacity}")]
  InvalidArgument { capacity: String },
}

macro_rules! impl_error_for_enum_with_inner {
  (
    $enum_name:ident < $generic_param:ident >,
    $($variant:ident ( $message:expr ) ),+
    $(,)?
  ) => {
    impl<$generic_param> $enum_name<$generic_param> {
      /// Consumes the error, returning the item that was not enqueued.
      #[inline]
      pub fn into_inner(self) -> $generic_param {
        match self {
          $( $enum_name::$variant(v) => v, )+
        }
      }
    }

    impl<$generic_param> fmt::Display for $enum_name<$generic_param> {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
          $( $enum_name::$variant(_) => f.write_str($message), )+
        }
      }
    }

    impl<$generic_param: fmt::Debug> std::error::Error for $enum_name<$generic_param> {}
  };
}

/// Error returned by `try_enqueue` and `enqueue_timeout` when the item could
/// not be accepted. The queue never takes ownership of a rejected item, so it
/// is handed back to the caller.
#[derive(PartialEq, Eq, Clone)]
pub enum TryEnqueueError<T> {
  /// The queue was full and the call did not wait.
  Full(T),
  /// The queue stayed full for the whole timeout.
  Timeout(T),
}

impl<T> TryEnqueueError<T> {
  /// Returns `true` if the error came from an expired timeout.
  #[inline]
  pub fn is_timeout(&self) -> bool {
    matches!(self, TryEnqueueError::Timeout(_))
  }
}

impl<T> fmt::Debug for TryEnqueueError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryEnqueueError::Full(_) => write!(f, "TryEnqueueError::Full(..)"),
      TryEnqueueError::Timeout(_) => write!(f, "TryEnqueueError::Timeout(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(
  TryEnqueueError<T>,
  Full("queue full"),
  Timeout("enqueue operation timed out"),
);
