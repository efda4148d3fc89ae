//! Top-level facade: wires the trie, tiered cache, suggestion engine,
//! prediction pipeline, and persistence/telemetry into the five-method
//! host embedding contract.

mod config;
mod engine;
mod error;
mod extract;

pub use config::EngineConfig;
pub use engine::Augur;
pub use error::AugurError;
