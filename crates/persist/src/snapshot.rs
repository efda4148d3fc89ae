//! Serializes the tiered cache's durable state to JSON and reloads it
//! at startup, and runs the periodic persistence tick.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use augur_cache::{CommandStats, TieredCache};
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::io::{read_if_present, write_atomic};
use crate::paths::{history_path, hot_cache_path};

/// How often the background task flushes a snapshot to disk.
pub const PERSIST_INTERVAL: Duration = Duration::from_secs(60);

/// Writes both snapshot files. Errors are logged, never propagated —
/// a failed tick simply retries on the next one.
pub fn flush(cache: &TieredCache, state_dir: &Path) {
	if let Err(error) = write_history(cache, state_dir) {
		error!(%error, "failed to write history snapshot");
	}
	if let Err(error) = write_hot_cache(cache, state_dir) {
		error!(%error, "failed to write hot cache snapshot");
	}
}

fn write_history(cache: &TieredCache, state_dir: &Path) -> Result<(), crate::error::PersistError> {
	let snapshot = cache.stats_snapshot();
	let bytes = serde_json::to_vec_pretty(&snapshot)?;
	write_atomic(&history_path(state_dir), &bytes)
}

fn write_hot_cache(cache: &TieredCache, state_dir: &Path) -> Result<(), crate::error::PersistError> {
	let snapshot = cache.hot_map_snapshot();
	let bytes = serde_json::to_vec_pretty(&snapshot)?;
	write_atomic(&hot_cache_path(state_dir), &bytes)
}

/// Loads both snapshot files into `cache` if present. A missing or
/// malformed file degrades to an empty map rather than failing startup.
pub fn load(cache: &TieredCache, state_dir: &Path) {
	match load_history(state_dir) {
		Ok(Some(stats)) => cache.load_stats(stats),
		Ok(None) => {}
		Err(error) => error!(%error, "history snapshot was malformed, starting empty"),
	}
	match load_hot_cache(state_dir) {
		Ok(Some(hot)) => cache.load_hot_map(hot),
		Ok(None) => {}
		Err(error) => error!(%error, "hot cache snapshot was malformed, starting empty"),
	}
}

fn load_history(state_dir: &Path) -> Result<Option<FxHashMap<String, CommandStats>>, crate::error::PersistError> {
	let Some(bytes) = read_if_present(&history_path(state_dir))? else {
		return Ok(None);
	};
	Ok(Some(serde_json::from_slice(&bytes)?))
}

fn load_hot_cache(state_dir: &Path) -> Result<Option<FxHashMap<String, Vec<String>>>, crate::error::PersistError> {
	let Some(bytes) = read_if_present(&hot_cache_path(state_dir))? else {
		return Ok(None);
	};
	Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Spawns the periodic persistence task: flushes every
/// [`PERSIST_INTERVAL`] and once more when `cancel` fires, then exits.
pub fn spawn(cache: Arc<TieredCache>, state_dir: std::path::PathBuf, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(PERSIST_INTERVAL);
		ticker.tick().await; // first tick fires immediately; skip it
		loop {
			tokio::select! {
				_ = cancel.cancelled() => break,
				_ = ticker.tick() => flush(&cache, &state_dir),
			}
		}
		info!("final persistence flush on shutdown");
		flush(&cache, &state_dir);
	})
}
