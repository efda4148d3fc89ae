//! Ultra-hot slab (linear-scan top tier) and hot map (bounded, promoted tier).

use std::collections::VecDeque;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Number of slots in the ultra-hot slab.
pub const ULTRA_HOT_CAP: usize = 20;
/// Maximum number of distinct prefixes held in the hot map.
pub const HOT_MAP_CAP: usize = 100;

/// Top cache tier: a small array of `(prefix, completions)` pairs scanned
/// linearly. At N=20 a linear scan beats a hashmap — no hashing cost, no
/// pointer chasing, branch-predictor friendly. Never "upgrade" this to a map.
#[derive(Default)]
pub struct UltraHotSlab {
	slots: RwLock<Vec<(String, Vec<String>)>>,
}

impl UltraHotSlab {
	pub fn new() -> Self {
		Self::default()
	}

	/// Case-insensitive exact-prefix lookup.
	pub fn get(&self, prefix_lower: &str) -> Option<Vec<String>> {
		self.slots.read().iter().find(|(p, _)| p == prefix_lower).map(|(_, c)| c.clone())
	}

	/// Moves `prefix` into slot 0, shifting existing entries down and
	/// evicting the tail if the slab is full. This is the slab's entire
	/// eviction discipline — a straightforward LRU with no extra bookkeeping.
	pub fn promote(&self, prefix_lower: String, completions: Vec<String>) {
		let mut slots = self.slots.write();
		slots.retain(|(p, _)| p != &prefix_lower);
		slots.insert(0, (prefix_lower, completions));
		slots.truncate(ULTRA_HOT_CAP);
	}
}

/// Second cache tier: a bounded map of recently-promoted prefixes.
#[derive(Default)]
pub struct HotMap {
	entries: RwLock<FxHashMap<String, Vec<String>>>,
	/// FIFO eviction order. The spec permits FIFO or access-recency
	/// eviction; FIFO is simpler and sufficient.
	order: RwLock<VecDeque<String>>,
}

impl HotMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, prefix_lower: &str) -> Option<Vec<String>> {
		self.entries.read().get(prefix_lower).cloned()
	}

	pub fn insert(&self, prefix_lower: String, completions: Vec<String>) {
		let mut entries = self.entries.write();
		if !entries.contains_key(&prefix_lower) {
			let mut order = self.order.write();
			if entries.len() >= HOT_MAP_CAP {
				if let Some(oldest) = order.pop_front() {
					entries.remove(&oldest);
				}
			}
			order.push_back(prefix_lower.clone());
		}
		entries.insert(prefix_lower, completions);
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Snapshot of the whole map, for persistence.
	pub fn snapshot(&self) -> FxHashMap<String, Vec<String>> {
		self.entries.read().clone()
	}

	/// Bulk-loads entries from a persisted snapshot, capped at [`HOT_MAP_CAP`].
	pub fn load(&self, snapshot: FxHashMap<String, Vec<String>>) {
		for (prefix, completions) in snapshot.into_iter().take(HOT_MAP_CAP) {
			self.insert(prefix, completions);
		}
	}
}
