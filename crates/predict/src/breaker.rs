//! Consecutive-failure circuit breaker guarding the LM client.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Consecutive failures that trip the breaker open.
pub const FAILURE_THRESHOLD: u32 = 3;
/// How long the breaker stays open before allowing another attempt.
pub const RESET_AFTER: Duration = Duration::from_secs(5 * 60);

/// Tracks consecutive LM-call failures and short-circuits calls while open.
///
/// `opened_at` is stored as a monotonic tick count (not `Instant`
/// directly) behind a small mutex so tests can drive it without real
/// sleeps; production code reads [`Instant::now`] once per check.
pub struct CircuitBreaker {
	consecutive_failures: AtomicU32,
	opened_at: Mutex<Option<Instant>>,
	trips: AtomicU64,
}

impl CircuitBreaker {
	pub fn new() -> Self {
		Self { consecutive_failures: AtomicU32::new(0), opened_at: Mutex::new(None), trips: AtomicU64::new(0) }
	}

	/// Returns `true` if a call should be allowed right now. An open
	/// breaker past [`RESET_AFTER`] half-closes: the next call is let
	/// through, and its outcome decides whether the breaker stays closed.
	pub fn allow(&self) -> bool {
		let mut opened_at = self.opened_at.lock();
		match *opened_at {
			None => true,
			Some(since) if since.elapsed() >= RESET_AFTER => {
				*opened_at = None;
				true
			}
			Some(_) => false,
		}
	}

	pub fn record_success(&self) {
		self.consecutive_failures.store(0, Ordering::Relaxed);
		*self.opened_at.lock() = None;
	}

	pub fn record_failure(&self) {
		let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
		if failures >= FAILURE_THRESHOLD {
			let mut opened_at = self.opened_at.lock();
			if opened_at.is_none() {
				*opened_at = Some(Instant::now());
				self.trips.fetch_add(1, Ordering::Relaxed);
			}
		}
	}

	/// Total number of times the breaker has tripped open, for telemetry.
	pub fn trip_count(&self) -> u64 {
		self.trips.load(Ordering::Relaxed)
	}
}

impl Default for CircuitBreaker {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn closed_breaker_allows_calls() {
		let breaker = CircuitBreaker::new();
		assert!(breaker.allow());
	}

	#[test]
	fn trips_open_after_threshold_consecutive_failures() {
		let breaker = CircuitBreaker::new();
		for _ in 0..FAILURE_THRESHOLD {
			breaker.record_failure();
		}
		assert!(!breaker.allow());
		assert_eq!(breaker.trip_count(), 1);
	}

	#[test]
	fn success_resets_consecutive_failure_count() {
		let breaker = CircuitBreaker::new();
		breaker.record_failure();
		breaker.record_failure();
		breaker.record_success();
		breaker.record_failure();
		breaker.record_failure();
		assert!(breaker.allow(), "two failures after a reset should not trip the breaker");
	}

	#[test]
	fn does_not_retrip_while_already_open() {
		let breaker = CircuitBreaker::new();
		for _ in 0..(FAILURE_THRESHOLD + 5) {
			breaker.record_failure();
		}
		assert_eq!(breaker.trip_count(), 1);
	}
}
