//! Utilities for synchronous blocking and parking.
//! Thin helpers around std::thread::park/park_timeout with an optional deadline.

use std::thread;
use std::time::Instant;

/// Returns `true` once `deadline` has passed. `None` never expires.
#[inline]
pub(crate) fn deadline_passed(deadline: Option<Instant>) -> bool {
  matches!(deadline, Some(d) if Instant::now() >= d)
}

/// Parks the current thread until `stop_condition` holds or `deadline` passes.
///
/// Returns the final value of `stop_condition`. Spurious unparks and stale
/// unpark tokens just re-check and park again.
pub(crate) fn park_until<F>(deadline: Option<Instant>, stop_condition: F) -> bool
where
  F: Fn() -> bool,
{
  loop {
    if stop_condition() {
      return true;
    }
    match deadline {
      None => thread::park(),
      Some(d) => {
        let now = Instant::now();
        if now >= d {
          return stop_condition();
        }
        thread::park_timeout(d - now);
      }
    }
  }
}
