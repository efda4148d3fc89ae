//! Short-TTL cache of AI-provided completions, keyed by full input fragment.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// How long a cached prediction stays fresh after insertion.
pub const PREDICTION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
struct CachedPrediction {
	prediction: String,
	inserted_at: Instant,
}

/// A concurrent, TTL-bounded map of `input -> prediction`.
#[derive(Default)]
pub struct PredictionCache {
	entries: RwLock<FxHashMap<String, CachedPrediction>>,
}

impl PredictionCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&self, input: &str, prediction: String) {
		self.entries.write().insert(input.to_string(), CachedPrediction { prediction, inserted_at: Instant::now() });
	}

	/// Returns the cached prediction for `input` if present and not yet
	/// past [`PREDICTION_TTL`]. Expired entries are lazily evicted.
	pub fn get(&self, input: &str) -> Option<String> {
		{
			let entries = self.entries.read();
			match entries.get(input) {
				Some(entry) if entry.inserted_at.elapsed() <= PREDICTION_TTL => return Some(entry.prediction.clone()),
				Some(_) => {}
				None => return None,
			}
		}
		self.entries.write().remove(input);
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_prediction_is_returned() {
		let cache = PredictionCache::new();
		cache.insert("gst", "git status".to_string());
		assert_eq!(cache.get("gst"), Some("git status".to_string()));
	}

	#[test]
	fn missing_prediction_returns_none() {
		let cache = PredictionCache::new();
		assert_eq!(cache.get("nope"), None);
	}

	#[test]
	fn expired_prediction_is_evicted() {
		let cache = PredictionCache::new();
		cache.entries.write().insert(
			"gst".to_string(),
			CachedPrediction { prediction: "git status".to_string(), inserted_at: Instant::now() - Duration::from_secs(4) },
		);
		assert_eq!(cache.get("gst"), None);
		assert!(cache.entries.read().get("gst").is_none());
	}
}
