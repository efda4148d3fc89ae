//! Atomic JSON snapshotting of history and hot cache, plus the async
//! telemetry log sink.

mod error;
mod io;
mod paths;
mod snapshot;
mod telemetry;

pub use error::PersistError;
pub use paths::{default_state_dir, history_path, hot_cache_path, logs_dir};
pub use snapshot::{PERSIST_INTERVAL, flush, load, spawn};
pub use telemetry::{TelemetryEntry, TelemetryHandle, init as init_telemetry};
