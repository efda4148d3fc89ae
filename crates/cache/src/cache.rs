//! Ties the trie, the two promoted tiers, the prediction cache, and
//! persistent frecency stats into the single tiered lookup the engine
//! queries.

use std::sync::atomic::{AtomicU64, Ordering};

use augur_trie::{CompletionKind, Trie};
use chrono::Utc;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::fallback;
use crate::hot::{HotMap, UltraHotSlab};
use crate::prediction::PredictionCache;
use crate::seed::{SEED_ENTRIES, ULTRA_HOT_SEED_PREFIXES};
use crate::stats::CommandStats;

/// Every `TRIE_HIT_PROMOTE_EVERY`th trie hit for a given prefix promotes
/// that prefix into the hot map, per the tiering rule in the design.
const TRIE_HIT_PROMOTE_EVERY: u64 = 10;

/// The full tiered completion cache: ultra-hot slab, hot map, prediction
/// TTL cache, trie, and static fallback, plus the frecency stats that
/// feed the trie's scores.
pub struct TieredCache {
	ultra_hot: UltraHotSlab,
	hot_map: HotMap,
	predictions: PredictionCache,
	trie: Trie,
	stats: RwLock<FxHashMap<String, CommandStats>>,
	trie_hits: RwLock<FxHashMap<String, u64>>,
	prediction_hits: AtomicU64,
}

impl TieredCache {
	/// Builds a freshly seeded cache: canonical verb-prefix and
	/// single-letter completions at low scores, with a handful of the
	/// most common ones promoted straight to the ultra-hot slab.
	pub fn new() -> Self {
		let cache = Self {
			ultra_hot: UltraHotSlab::new(),
			hot_map: HotMap::new(),
			predictions: PredictionCache::new(),
			trie: Trie::new(),
			stats: RwLock::new(FxHashMap::default()),
			trie_hits: RwLock::new(FxHashMap::default()),
			prediction_hits: AtomicU64::new(0),
		};
		cache.seed();
		cache
	}

	fn seed(&self) {
		for (prefix, completions) in SEED_ENTRIES {
			for (text, score) in *completions {
				self.trie.insert(prefix, text, *score);
			}
		}
		for prefix in ULTRA_HOT_SEED_PREFIXES {
			let completions = self.trie.lookup(prefix, crate::hot::ULTRA_HOT_CAP);
			if !completions.is_empty() {
				self.ultra_hot.promote((*prefix).to_string(), completions);
			}
		}
	}

	/// Looks up completions for `prefix`, walking tiers from fastest to
	/// slowest and stopping at the first hit: ultra-hot slab, hot map,
	/// prediction TTL cache, trie, then the static fallback table. Every
	/// path lowercases the prefix for matching but returns completions in
	/// their stored casing.
	pub fn get_completions(&self, prefix: &str, max: usize) -> Vec<String> {
		let lower = prefix.to_ascii_lowercase();

		if let Some(hit) = self.ultra_hot.get(&lower) {
			return hit.into_iter().take(max).collect();
		}
		if let Some(hit) = self.hot_map.get(&lower) {
			self.ultra_hot.promote(lower.clone(), hit.clone());
			return hit.into_iter().take(max).collect();
		}
		if let Some(prediction) = self.get_prediction(&lower) {
			return vec![prediction];
		}

		let hit = self.trie.lookup(&lower, max);
		if !hit.is_empty() {
			self.note_trie_hit(&lower, &hit);
			return hit;
		}

		fallback::lookup(&lower).into_iter().take(max).collect()
	}

	/// Records a trie hit for `prefix`; every [`TRIE_HIT_PROMOTE_EVERY`]th
	/// hit promotes the prefix into the hot map.
	fn note_trie_hit(&self, prefix_lower: &str, completions: &[String]) {
		let mut hits = self.trie_hits.write();
		let count = hits.entry(prefix_lower.to_string()).or_insert(0);
		*count += 1;
		if *count % TRIE_HIT_PROMOTE_EVERY == 0 {
			self.hot_map.insert(prefix_lower.to_string(), completions.to_vec());
		}
	}

	/// Caches an AI-provided prediction for `input`, short-TTL, and also
	/// writes it into the trie at score 1.0 so it still surfaces (at a
	/// lower rank) once the TTL entry expires. Keyed case-insensitively,
	/// like every other tier, so a prediction cached for one casing of an
	/// input is still found when the same fragment comes back differently cased.
	pub fn cache_prediction(&self, input: &str, prediction: String) {
		let lower = input.to_ascii_lowercase();
		self.trie.insert_with_kind(&lower, &prediction, 1.0, CompletionKind::Ai);
		self.predictions.insert(&lower, prediction);
	}

	/// Returns a cached prediction for `input`, if still fresh.
	pub fn get_prediction(&self, input: &str) -> Option<String> {
		let hit = self.predictions.get(&input.to_ascii_lowercase());
		if hit.is_some() {
			self.prediction_hits.fetch_add(1, Ordering::Relaxed);
		}
		hit
	}

	/// Records that the user accepted `command_line` as a completion:
	/// bumps its frecency stats and inserts it into the trie at a score
	/// reflecting real usage.
	pub fn record_acceptance(&self, command_line: &str) {
		self.bump_stats(command_line, |s| s.accept_count += 1);
		self.reinsert(command_line);
	}

	/// Records that the user executed `command_line` directly (not via a
	/// suggestion): bumps its frecency stats and inserts it into the trie.
	pub fn record_execution(&self, command_line: &str) {
		self.bump_stats(command_line, |s| s.execute_count += 1);
		self.reinsert(command_line);
	}

	/// Records that an AI-predicted suggestion was accepted.
	pub fn record_suggestion_acceptance(&self, suggestion: &str) {
		self.bump_stats(suggestion, |s| s.suggestion_accept_count += 1);
		self.reinsert(suggestion);
	}

	/// Indexes a plain history line (e.g. from shell history replay) at a
	/// low baseline score, without touching frecency stats.
	pub fn add_history_item(&self, line: &str) {
		let prefixes = key_prefixes(line);
		for prefix in prefixes {
			self.trie.insert(&prefix, line, 0.5);
		}
	}

	fn bump_stats(&self, command_line: &str, update: impl FnOnce(&mut CommandStats)) {
		let key = leading_token(command_line);
		let now = Utc::now();
		let mut stats = self.stats.write();
		let entry = stats.entry(key).or_insert_with(|| CommandStats::new(command_line, now));
		entry.command = command_line.to_string();
		entry.last_used = now;
		update(entry);
	}

	/// Re-inserts `command_line` into the trie at its current frecency
	/// weight, under every prefix length from 1 up to the full line.
	fn reinsert(&self, command_line: &str) {
		let key = leading_token(command_line);
		let weight = self.stats.read().get(&key).map(CommandStats::weight).unwrap_or(1.0);
		self.reinsert_at_weight(command_line, weight);
	}

	/// Inserts `command_line` into the trie at an explicit `weight`, under
	/// every prefix length from 1 up to the full line. Shared by
	/// [`Self::reinsert`] (live usage) and [`Self::load_stats`] (warm-start
	/// from a persisted snapshot), which already knows the weight and has
	/// no need to re-read it back out of the stats map.
	fn reinsert_at_weight(&self, command_line: &str, weight: f64) {
		for prefix in key_prefixes(command_line) {
			self.trie.insert(&prefix, command_line, weight);
		}
	}

	/// Snapshot of all frecency stats, for persistence.
	pub fn stats_snapshot(&self) -> FxHashMap<String, CommandStats> {
		self.stats.read().clone()
	}

	/// Bulk-loads frecency stats from a persisted snapshot, re-inserting
	/// each command into the trie at its current `weight()` so that
	/// previously-learned commands are recoverable via `get_completions`
	/// immediately after a restart, not just after being used again.
	pub fn load_stats(&self, snapshot: FxHashMap<String, CommandStats>) {
		for stats in snapshot.values() {
			self.reinsert_at_weight(&stats.command, stats.weight());
		}
		*self.stats.write() = snapshot;
	}

	/// Snapshot of the hot map, for persistence.
	pub fn hot_map_snapshot(&self) -> FxHashMap<String, Vec<String>> {
		self.hot_map.snapshot()
	}

	/// Bulk-loads the hot map from a persisted snapshot.
	pub fn load_hot_map(&self, snapshot: FxHashMap<String, Vec<String>>) {
		self.hot_map.load(snapshot);
	}
}

impl Default for TieredCache {
	fn default() -> Self {
		Self::new()
	}
}

/// The leading whitespace-delimited token of a command line, used as the
/// frecency-stats key.
fn leading_token(command_line: &str) -> String {
	command_line.split_whitespace().next().unwrap_or(command_line).to_ascii_lowercase()
}

/// Every non-empty prefix of `command_line`, up to and including the
/// full line, lowercased — the set of trie keys a single insert touches.
fn key_prefixes(command_line: &str) -> Vec<String> {
	let lower = command_line.to_ascii_lowercase();
	(1..=lower.chars().count()).map(|n| lower.chars().take(n).collect()).collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn cold_start_returns_seeded_completions_in_rank_order() {
		let cache = TieredCache::new();
		let hits = cache.get_completions("Get-", 5);
		assert_eq!(hits, vec!["Get-ChildItem", "Get-Content", "Get-Process", "Get-Service", "Get-Help"]);
	}

	#[test]
	fn unknown_prefix_falls_back_to_static_table() {
		let cache = TieredCache::new();
		let hits = cache.get_completions("docker", 3);
		assert_eq!(hits, vec!["docker ps", "docker images", "docker compose up"]);
	}

	#[test]
	fn accepted_command_outranks_seed_after_reinsert() {
		let cache = TieredCache::new();
		for _ in 0..3 {
			cache.record_execution("git status");
		}
		let hits = cache.get_completions("git", 3);
		assert_eq!(hits.first().map(String::as_str), Some("git status"));
	}

	#[test]
	fn tenth_trie_hit_promotes_prefix_into_hot_map() {
		let cache = TieredCache::new();
		cache.record_execution("npm install");
		for _ in 0..TRIE_HIT_PROMOTE_EVERY {
			cache.get_completions("npm", 5);
		}
		assert!(cache.hot_map.get("npm").is_some());
	}

	#[test]
	fn prediction_roundtrips_through_cache() {
		let cache = TieredCache::new();
		cache.cache_prediction("gst", "git status".to_string());
		assert_eq!(cache.get_prediction("gst"), Some("git status".to_string()));
	}

	#[test]
	fn cached_prediction_is_served_by_get_completions() {
		let cache = TieredCache::new();
		cache.cache_prediction("gst", "git status".to_string());
		assert_eq!(cache.get_completions("gst", 3), vec!["git status".to_string()]);
	}

	#[test]
	fn cache_prediction_also_seeds_the_trie_for_after_ttl_recall() {
		let cache = TieredCache::new();
		cache.cache_prediction("gst", "git status".to_string());
		// Written into the trie at score 1.0 alongside the TTL entry, so the
		// completion is still recoverable once the TTL layer expires (P4).
		let scored = cache.trie.lookup_scored("gst", 5);
		assert!(scored.iter().any(|(text, score)| text == "git status" && *score == 1.0));
	}

	#[test]
	fn hot_map_hit_promotes_into_ultra_hot() {
		let cache = TieredCache::new();
		cache.hot_map.insert("npm".to_string(), vec!["npm install".to_string()]);
		assert!(cache.ultra_hot.get("npm").is_none());
		cache.get_completions("npm", 3);
		assert_eq!(cache.ultra_hot.get("npm"), Some(vec!["npm install".to_string()]));
	}

	#[test]
	fn stats_and_hot_map_snapshots_roundtrip() {
		let cache = TieredCache::new();
		cache.record_acceptance("git status");
		let stats = cache.stats_snapshot();
		let reloaded = TieredCache::new();
		reloaded.load_stats(stats);
		assert!(reloaded.stats_snapshot().contains_key("git"));
	}

	#[test]
	fn load_stats_reinserts_commands_into_trie_for_immediate_recall() {
		let cache = TieredCache::new();
		cache.record_acceptance("git status");
		let stats = cache.stats_snapshot();

		let reloaded = TieredCache::new();
		reloaded.load_stats(stats);

		// Recoverable straight after load, before any fresh accept/execute.
		assert!(reloaded.get_completions("git", 3).contains(&"git status".to_string()));
	}
}
