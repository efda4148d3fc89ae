//! Asynchronous telemetry sink: a `tracing_subscriber::Layer` that
//! forwards formatted events over an unbounded channel to a dedicated
//! tokio task, which batches them into a daily-rotated log file.

use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;

/// The unit of the telemetry channel: one formatted log line.
#[derive(Debug, Clone)]
pub struct TelemetryEntry {
	pub timestamp: DateTime<Utc>,
	pub level: Level,
	pub thread_id: String,
	pub message: String,
}

impl TelemetryEntry {
	fn render(&self) -> String {
		format!("{} {:<5} [{}] {}\n", self.timestamp.to_rfc3339(), self.level, self.thread_id, self.message)
	}
}

/// Flush thresholds for the batching task.
const FLUSH_BYTES: usize = 8 * 1024;
const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
		if field.name() == "message" {
			self.0 = format!("{value:?}");
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.0 = value.to_string();
		}
	}
}

/// Forwards tracing events to the telemetry channel. Never blocks a log
/// call site: the channel is unbounded, so a slow flusher only grows
/// memory, never stalls the caller.
struct TelemetryLayer {
	sender: mpsc::UnboundedSender<TelemetryEntry>,
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for TelemetryLayer {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut visitor = MessageVisitor::default();
		event.record(&mut visitor);
		let message = if visitor.0.is_empty() { event.metadata().name().to_string() } else { visitor.0 };

		let entry = TelemetryEntry {
			timestamp: Utc::now(),
			level: *event.metadata().level(),
			thread_id: format!("{:?}", thread::current().id()),
			message,
		};
		// Send failures mean the flusher task is gone (shutdown); drop silently.
		let _ = self.sender.send(entry);
	}
}

/// Handle to the running telemetry sink, returned by [`init`].
pub struct TelemetryHandle {
	level_handle: reload::Handle<EnvFilter, tracing_subscriber::Registry>,
	flusher: tokio::task::JoinHandle<()>,
	cancel: CancellationToken,
}

impl TelemetryHandle {
	/// Changes the minimum log level at runtime without restarting the process.
	pub fn set_level(&self, level: LevelFilter) {
		if let Err(error) = self.level_handle.reload(EnvFilter::new(level.to_string())) {
			eprintln!("augur: failed to reload log level: {error}");
		}
	}

	/// Cancels the flusher task and waits for its final flush.
	pub async fn shutdown(self) {
		self.cancel.cancel();
		let _ = self.flusher.await;
	}
}

/// Initializes the global tracing subscriber: an `EnvFilter`-gated
/// stdout layer for interactive use, plus the telemetry layer writing
/// to `<state_dir>/logs/augur_<YYYYMMDD>.log` via a daily rolling
/// appender. Returns a handle for runtime level changes and shutdown.
pub fn init(state_dir: &Path, default_level: &str) -> TelemetryHandle {
	let logs_dir = crate::paths::logs_dir(state_dir);
	let _ = std::fs::create_dir_all(&logs_dir);

	let (filter, level_handle) = reload::Layer::new(EnvFilter::new(default_level));
	let (sender, receiver) = mpsc::unbounded_channel();
	let cancel = CancellationToken::new();
	let flusher = spawn_flusher(receiver, logs_dir, cancel.clone());

	let stdout_layer = tracing_subscriber::fmt::layer().with_target(false);
	let telemetry_layer = TelemetryLayer { sender };

	// `try_init` rather than `init`: a host embedding multiple engine
	// instances (or running our own test suite) may call this more than
	// once per process: the global subscriber can only be installed once.
	let _ = tracing_subscriber::registry().with(filter).with(stdout_layer).with(telemetry_layer).try_init();

	TelemetryHandle { level_handle, flusher, cancel }
}

/// Runs the batching loop: buffers rendered entries in memory and
/// writes them to the rolling appender on an 8 KiB threshold or a 1 s
/// timer, whichever comes first. The appender's own file I/O is plain
/// buffered `std::io::Write`, cheap enough to call inline from the task
/// without a `spawn_blocking` hop.
fn spawn_flusher(mut receiver: mpsc::UnboundedReceiver<TelemetryEntry>, logs_dir: std::path::PathBuf, cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
	tokio::spawn(async move {
		let mut appender = tracing_appender::rolling::daily(&logs_dir, "augur");
		let mut buffer = String::new();
		let mut ticker = tokio::time::interval(FLUSH_INTERVAL);

		loop {
			tokio::select! {
				_ = cancel.cancelled() => break,
				entry = receiver.recv() => match entry {
					Some(entry) => {
						buffer.push_str(&entry.render());
						if buffer.len() >= FLUSH_BYTES {
							flush_buffer(&mut appender, &mut buffer);
						}
					}
					None => break,
				},
				_ = ticker.tick() => flush_buffer(&mut appender, &mut buffer),
			}
		}

		// Drain anything still queued, then do the final flush.
		while let Ok(entry) = receiver.try_recv() {
			buffer.push_str(&entry.render());
		}
		flush_buffer(&mut appender, &mut buffer);
	})
}

fn flush_buffer(appender: &mut tracing_appender::rolling::RollingFileAppender, buffer: &mut String) {
	if buffer.is_empty() {
		return;
	}
	if let Err(error) = appender.write_all(buffer.as_bytes()) {
		eprintln!("augur: failed to write telemetry log: {error}");
	}
	let _ = appender.flush();
	buffer.clear();
}
