//! The crate's typed error enum. None of these cross into the
//! synchronous `get_suggestion` path, which remains total and
//! panic-free; they surface only from the small number of fallible
//! constructors (config load, persistence directory creation).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AugurError {
	#[error("persistence failed: {0}")]
	Persistence(#[from] augur_persist::PersistError),
	#[error("lock could not be acquired")]
	Lock,
	#[error("config file was malformed: {0}")]
	Config(#[from] toml::de::Error),
	#[error("language model call failed: {0}")]
	Lm(#[from] augur_predict::LmError),
}
