//! Background prediction pipeline: a bounded try-and-drop queue, a
//! single worker, a circuit breaker, and the LM client seam.

mod breaker;
mod lm_client;
mod prompt;
mod worker;

pub use breaker::CircuitBreaker;
pub use lm_client::{LmClient, LmError, ReqwestLmClient};
pub use worker::{CALL_TIMEOUT, PredictionQueue, QUEUE_CAPACITY, STALE_AFTER, spawn};
