//! Per-user state directory resolution.

use std::path::PathBuf;

const APP_DIR: &str = "augur";

/// Returns the default state directory (`$XDG_DATA_HOME/augur` on
/// Linux), falling back to the current directory if the platform data
/// directory can't be resolved.
pub fn default_state_dir() -> PathBuf {
	dirs::data_dir().map(|p| p.join(APP_DIR)).unwrap_or_else(|| PathBuf::from("."))
}

pub fn history_path(state_dir: &std::path::Path) -> PathBuf {
	state_dir.join("history.json")
}

pub fn hot_cache_path(state_dir: &std::path::Path) -> PathBuf {
	state_dir.join("hotcache.json")
}

pub fn logs_dir(state_dir: &std::path::Path) -> PathBuf {
	state_dir.join("logs")
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn history_path_is_under_state_dir() {
		let dir = std::path::Path::new("/tmp/augur-state");
		assert_eq!(history_path(dir), dir.join("history.json"));
	}

	#[test]
	fn hot_cache_path_is_under_state_dir() {
		let dir = std::path::Path::new("/tmp/augur-state");
		assert_eq!(hot_cache_path(dir), dir.join("hotcache.json"));
	}
}
