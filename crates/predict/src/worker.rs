//! Bounded request queue and the single background worker draining it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use augur_cache::TieredCache;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::breaker::CircuitBreaker;
use crate::lm_client::LmClient;
use crate::prompt::{build_prompt, resolve_completion};

/// Capacity of the pending-request queue; `submit` drops on overflow
/// rather than blocking the synchronous caller.
pub const QUEUE_CAPACITY: usize = 10;
/// Per-call LM deadline.
pub const CALL_TIMEOUT: Duration = Duration::from_millis(500);
/// Requests older than this when picked up by the worker are discarded.
pub const STALE_AFTER: Duration = Duration::from_millis(500);

struct PredictionRequest {
	input: String,
	cwd_name: String,
	enqueued_at: Instant,
}

/// Handle for submitting prediction requests from the synchronous path.
#[derive(Clone)]
pub struct PredictionQueue {
	sender: mpsc::Sender<PredictionRequest>,
}

impl PredictionQueue {
	/// Non-blocking enqueue. Returns `false` if the queue is full and the
	/// request was dropped — never blocks the caller.
	pub fn submit(&self, input: impl Into<String>, cwd_name: impl Into<String>) -> bool {
		let request = PredictionRequest { input: input.into(), cwd_name: cwd_name.into(), enqueued_at: Instant::now() };
		match self.sender.try_send(request) {
			Ok(()) => true,
			Err(_) => {
				debug!("prediction queue full, dropping request");
				false
			}
		}
	}
}

/// Spawns the queue and its single background worker. The worker runs
/// until `cancel` fires, at which point it finishes its current drain
/// pass and exits.
pub fn spawn(cache: Arc<TieredCache>, client: Arc<dyn LmClient>, cancel: CancellationToken) -> (PredictionQueue, tokio::task::JoinHandle<()>) {
	let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
	let breaker = Arc::new(CircuitBreaker::new());
	let outbound = Arc::new(Semaphore::new(1));

	let handle = tokio::spawn(run_worker(receiver, cache, client, breaker, outbound, cancel));
	(PredictionQueue { sender }, handle)
}

async fn run_worker(
	mut receiver: mpsc::Receiver<PredictionRequest>,
	cache: Arc<TieredCache>,
	client: Arc<dyn LmClient>,
	breaker: Arc<CircuitBreaker>,
	outbound: Arc<Semaphore>,
	cancel: CancellationToken,
) {
	loop {
		let request = tokio::select! {
			_ = cancel.cancelled() => break,
			request = receiver.recv() => match request {
				Some(request) => request,
				None => break,
			},
		};

		let mut batch = vec![request];
		while let Ok(next) = receiver.try_recv() {
			batch.push(next);
		}

		for request in batch {
			if request.enqueued_at.elapsed() > STALE_AFTER {
				debug!(input = %request.input, "dropping stale prediction request");
				continue;
			}
			if !breaker.allow() {
				continue;
			}

			let Ok(_permit) = outbound.acquire().await else { break };
			let prompt = build_prompt(&request.input, &request.cwd_name);
			match client.complete(&prompt, CALL_TIMEOUT).await {
				Ok(response) => {
					breaker.record_success();
					let completion = resolve_completion(&request.input, &response);
					cache.cache_prediction(&request.input, completion);
				}
				Err(error) => {
					breaker.record_failure();
					warn!(input = %request.input, %error, "prediction request failed");
				}
			}
		}
	}
}
