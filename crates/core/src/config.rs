//! Configuration loading: a TOML file under the user's config
//! directory, layered under environment-variable overrides, layered
//! under compiled-in defaults.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AugurError;

const CONFIG_SUBDIR: &str = "augur";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LM_ENDPOINT: &str = "http://127.0.0.1:11434/api/generate";
const DEFAULT_LM_MODEL: &str = "augur-complete";

/// The externally tunable knobs. Every field has a compiled-in default,
/// so a missing or partially-specified config file degrades gracefully
/// rather than failing startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
	pub log_level: String,
	pub lm_endpoint: String,
	pub lm_model: String,
	pub state_dir: PathBuf,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			log_level: DEFAULT_LOG_LEVEL.to_string(),
			lm_endpoint: DEFAULT_LM_ENDPOINT.to_string(),
			lm_model: DEFAULT_LM_MODEL.to_string(),
			state_dir: augur_persist::default_state_dir(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
	logging: Option<RawLogging>,
	lm: Option<RawLm>,
	state: Option<RawState>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLogging {
	level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLm {
	endpoint: Option<String>,
	model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawState {
	dir: Option<String>,
}

impl EngineConfig {
	/// Loads configuration from `<config_dir>/augur/config.toml`, then
	/// applies `AUGUR_*` environment variable overrides. A missing file
	/// is not an error; a present-but-malformed file is.
	pub fn load() -> Result<Self, AugurError> {
		let mut config = Self::default();

		if let Some(path) = default_config_path() {
			if let Ok(text) = std::fs::read_to_string(&path) {
				let raw: RawConfig = toml::from_str(&text).map_err(AugurError::Config)?;
				config.apply_raw(raw);
			}
		}

		config.apply_env();
		Ok(config)
	}

	fn apply_raw(&mut self, raw: RawConfig) {
		if let Some(level) = raw.logging.and_then(|l| l.level) {
			self.log_level = level;
		}
		if let Some(lm) = raw.lm {
			if let Some(endpoint) = lm.endpoint {
				self.lm_endpoint = endpoint;
			}
			if let Some(model) = lm.model {
				self.lm_model = model;
			}
		}
		if let Some(dir) = raw.state.and_then(|s| s.dir) {
			self.state_dir = expand_tilde(&dir);
		}
	}

	fn apply_env(&mut self) {
		if let Ok(level) = std::env::var("AUGUR_LOG_LEVEL") {
			self.log_level = level;
		}
		if let Ok(endpoint) = std::env::var("AUGUR_LM_ENDPOINT") {
			self.lm_endpoint = endpoint;
		}
		if let Ok(model) = std::env::var("AUGUR_LM_MODEL") {
			self.lm_model = model;
		}
		if let Ok(dir) = std::env::var("AUGUR_STATE_DIR") {
			self.state_dir = expand_tilde(&dir);
		}
	}
}

fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join(CONFIG_SUBDIR).join(CONFIG_FILE))
}

fn expand_tilde(path: &str) -> PathBuf {
	if let Some(rest) = path.strip_prefix("~/") {
		if let Some(home) = dirs::home_dir() {
			return home.join(rest);
		}
	}
	PathBuf::from(path)
}
