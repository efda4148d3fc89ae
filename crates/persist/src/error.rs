//! Typed errors for the persistence and telemetry layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
	#[error("persistence I/O failed: {0}")]
	Io(#[from] std::io::Error),
	#[error("snapshot was malformed: {0}")]
	Malformed(#[from] serde_json::Error),
}
