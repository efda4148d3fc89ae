//! Wires the trie-backed tiered cache, the suggestion engine, the
//! prediction pipeline, and persistence/telemetry into the five-method
//! host embedding contract.

use std::sync::Arc;
use std::time::Duration;

use augur_cache::TieredCache;
use augur_predict::{LmClient, ReqwestLmClient};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::EngineConfig;
use crate::extract::current_fragment;

/// Suggestions returned per keystroke.
const SUGGESTIONS_PER_KEYSTROKE: usize = 3;
/// Grace period `dispose` waits for background tasks before abandoning them.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The engine's public surface: one instance per interactive shell session.
pub struct Augur {
	cache: Arc<TieredCache>,
	config: EngineConfig,
	prediction_queue: augur_predict::PredictionQueue,
	prediction_worker: tokio::task::JoinHandle<()>,
	persistence: tokio::task::JoinHandle<()>,
	telemetry: Option<augur_persist::TelemetryHandle>,
	cancel: CancellationToken,
	disposed: std::sync::atomic::AtomicBool,
}

impl Augur {
	/// Builds a new engine: loads config, initializes telemetry, loads
	/// any persisted history/hot-cache snapshot, and spawns the
	/// prediction worker and persistence tick.
	pub fn start(config: EngineConfig) -> Self {
		std::fs::create_dir_all(&config.state_dir).ok();
		let telemetry = augur_persist::init_telemetry(&config.state_dir, &config.log_level);

		let cache = Arc::new(TieredCache::new());
		augur_persist::load(&cache, &config.state_dir);

		let cancel = CancellationToken::new();
		let client: Arc<dyn LmClient> = Arc::new(ReqwestLmClient::new(config.lm_endpoint.clone(), config.lm_model.clone()));
		let (prediction_queue, prediction_worker) = augur_predict::spawn(Arc::clone(&cache), client, cancel.clone());
		let persistence = augur_persist::spawn(Arc::clone(&cache), config.state_dir.clone(), cancel.clone());

		info!("augur engine started");

		Self {
			cache,
			config,
			prediction_queue,
			prediction_worker,
			persistence,
			telemetry: Some(telemetry),
			cancel,
			disposed: std::sync::atomic::AtomicBool::new(false),
		}
	}

	/// Returns up to [`SUGGESTIONS_PER_KEYSTROKE`] `(text, tooltip)` pairs
	/// for the command fragment at `cursor_offset` within `input`.
	/// Respects `cancel`: returns empty immediately if already cancelled.
	/// Never blocks on network I/O — a prediction request for the
	/// fragment is enqueued non-blockingly for background enrichment.
	pub fn get_suggestion(&self, input: &str, cursor_offset: usize, cancel: &CancellationToken) -> Vec<(String, String)> {
		if cancel.is_cancelled() {
			return Vec::new();
		}
		let fragment = current_fragment(input, cursor_offset);
		if fragment.is_empty() {
			return Vec::new();
		}

		let cwd_name = current_dir_name();
		self.prediction_queue.submit(fragment, cwd_name);

		augur_engine::suggest(&self.cache, fragment, SUGGESTIONS_PER_KEYSTROKE)
			.into_iter()
			.map(|s| (s.text, s.tooltip))
			.collect()
	}

	/// The host accepted `line` for execution (e.g. pressed Enter).
	pub fn on_command_accepted(&self, line: &str) {
		self.cache.record_acceptance(line);
	}

	/// `line` finished running.
	pub fn on_command_executed(&self, line: &str) {
		self.cache.record_execution(line);
	}

	/// The user picked a displayed suggestion.
	pub fn on_suggestion_accepted(&self, text: &str) {
		self.cache.record_suggestion_acceptance(text);
	}

	/// A historical line was observed (e.g. replayed from shell history at startup).
	pub fn on_history_observed(&self, line: &str) {
		self.cache.add_history_item(line);
	}

	/// Cancels background tasks, performs one final persistence flush,
	/// and releases telemetry. Idempotent and safe to call from any
	/// thread; a second call observes the cancellation token already
	/// fired and returns immediately.
	pub async fn dispose(&mut self) {
		if self.disposed.swap(true, std::sync::atomic::Ordering::SeqCst) {
			return;
		}
		self.cancel.cancel();

		let _ = tokio::time::timeout(SHUTDOWN_GRACE, &mut self.prediction_worker).await;
		let _ = tokio::time::timeout(SHUTDOWN_GRACE, &mut self.persistence).await;

		if let Some(telemetry) = self.telemetry.take() {
			let _ = tokio::time::timeout(SHUTDOWN_GRACE, telemetry.shutdown()).await;
		}
	}
}

fn current_dir_name() -> String {
	std::env::current_dir()
		.ok()
		.and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
		.unwrap_or_else(|| "~".to_string())
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn test_config(dir: &std::path::Path) -> EngineConfig {
		EngineConfig { state_dir: dir.to_path_buf(), ..EngineConfig::default() }
	}

	#[tokio::test]
	async fn cold_start_returns_seeded_suggestions() {
		let dir = tempfile::tempdir().unwrap();
		let mut augur = Augur::start(test_config(dir.path()));
		let cancel = CancellationToken::new();
		let suggestions = augur.get_suggestion("Get-", 4, &cancel);
		assert_eq!(suggestions[0].0, "Get-ChildItem");
		augur.dispose().await;
	}

	#[tokio::test]
	async fn cancelled_token_short_circuits_to_empty() {
		let dir = tempfile::tempdir().unwrap();
		let mut augur = Augur::start(test_config(dir.path()));
		let cancel = CancellationToken::new();
		cancel.cancel();
		assert!(augur.get_suggestion("git", 3, &cancel).is_empty());
		augur.dispose().await;
	}

	#[tokio::test]
	async fn dispose_is_idempotent() {
		let dir = tempfile::tempdir().unwrap();
		let mut augur = Augur::start(test_config(dir.path()));
		augur.dispose().await;
		augur.dispose().await;
	}

	#[tokio::test]
	async fn accepted_command_is_reflected_in_later_suggestions() {
		let dir = tempfile::tempdir().unwrap();
		let mut augur = Augur::start(test_config(dir.path()));
		let cancel = CancellationToken::new();
		for _ in 0..3 {
			augur.on_command_executed("git status");
		}
		let suggestions = augur.get_suggestion("git", 3, &cancel);
		assert!(suggestions.iter().any(|(text, _)| text == "git status"));
		augur.dispose().await;
	}
}
