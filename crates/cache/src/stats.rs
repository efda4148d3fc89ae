//! Historical command usage, keyed by leading token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Frecency record for a command, keyed by its leading token.
///
/// The on-disk and in-memory key is the command's leading token (the
/// first whitespace-delimited word), not the full command line — this
/// is the canonical key fixed by the design to avoid the cross-path
/// drift the source implementation suffered from (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandStats {
	/// Canonical full command line last associated with this key.
	pub command: String,
	pub accept_count: u64,
	pub execute_count: u64,
	pub suggestion_accept_count: u64,
	pub last_used: DateTime<Utc>,
}

impl CommandStats {
	pub fn new(command: impl Into<String>, now: DateTime<Utc>) -> Self {
		Self { command: command.into(), accept_count: 0, execute_count: 0, suggestion_accept_count: 0, last_used: now }
	}

	/// `weight = (2*accept + 3*execute + 1*suggest) * recency_factor`,
	/// `recency_factor = max(0.1, 1 - days_since_use/30)`, evaluated at
	/// the current wall-clock time.
	pub fn weight(&self) -> f64 {
		self.weight_at(Utc::now())
	}

	/// [`Self::weight`] evaluated at an explicit `now`, for deterministic tests.
	pub fn weight_at(&self, now: DateTime<Utc>) -> f64 {
		let days_since_use = (now - self.last_used).num_seconds() as f64 / 86_400.0;
		let recency_factor = (1.0 - days_since_use / 30.0).max(0.1);
		let raw = 2.0 * self.accept_count as f64 + 3.0 * self.execute_count as f64 + self.suggestion_accept_count as f64;
		raw * recency_factor
	}
}

#[cfg(test)]
mod tests {
	use chrono::Duration;
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn fresh_stats_have_full_recency_factor() {
		let now = Utc::now();
		let mut stats = CommandStats::new("git status", now);
		stats.accept_count = 1;
		assert_eq!(stats.weight_at(now), 2.0);
	}

	#[test]
	fn recency_decays_linearly_over_thirty_days() {
		let now = Utc::now();
		let mut stats = CommandStats::new("git status", now - Duration::days(15));
		stats.execute_count = 1;
		let weight = stats.weight_at(now);
		assert!((weight - 1.5).abs() < 1e-6);
	}

	#[test]
	fn recency_floors_at_one_tenth() {
		let now = Utc::now();
		let mut stats = CommandStats::new("git status", now - Duration::days(365));
		stats.execute_count = 1;
		assert!((stats.weight_at(now) - 0.3).abs() < 1e-6);
	}
}
