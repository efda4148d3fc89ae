//! Atomic file writing: write to a temp file in the same directory,
//! fsync, then rename over the target. A crash mid-write leaves the
//! original file untouched; a concurrent reader never observes a
//! partial file.

use std::io;
use std::path::Path;

use crate::error::PersistError;

pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
	let parent = path.parent().unwrap_or(Path::new("."));
	let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
	io::Write::write_all(&mut tmp, bytes)?;
	tmp.as_file().sync_all()?;
	tmp.persist(path).map_err(|e| e.error)?;
	Ok(())
}

/// Reads `path` as UTF-8 bytes, returning `None` if it is missing. Any
/// other I/O error is propagated so the caller can log it.
pub fn read_if_present(path: &Path) -> Result<Option<Vec<u8>>, PersistError> {
	match std::fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e.into()),
	}
}
