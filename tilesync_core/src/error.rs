//! Typed error kinds.
//!
//! Functions in tilesync return [`anyhow::Result`]. When a caller needs to react to a
//! specific failure it can recover the kind with `err.downcast_ref::<TileSyncError>()`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileSyncError {
	/// `open` was called with a driver name that is not registered.
	#[error("unknown driver '{0}'")]
	DriverNotFound(String),

	/// The requested layer does not exist, or a single-layer store was asked for another name.
	#[error("layer '{0}' not found")]
	LayerNotFound(String),

	/// Encoding or decoding was requested for a format outside png/jpg.
	#[error("unsupported tile format '{0}', only 'png' and 'jpg' are allowed")]
	UnsupportedFormat(String),

	/// The driver opened a source that cannot create layers.
	#[error("tile source '{0}' does not allow writing")]
	NotWritable(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::anyhow;

	#[test]
	fn messages() {
		assert_eq!(
			TileSyncError::DriverNotFound("wms".into()).to_string(),
			"unknown driver 'wms'"
		);
		assert_eq!(
			TileSyncError::LayerNotFound("roads".into()).to_string(),
			"layer 'roads' not found"
		);
		assert_eq!(
			TileSyncError::UnsupportedFormat("webp".into()).to_string(),
			"unsupported tile format 'webp', only 'png' and 'jpg' are allowed"
		);
	}

	#[test]
	fn survives_anyhow_context() {
		let err = anyhow!(TileSyncError::LayerNotFound("x".into())).context("opening layer");
		assert_eq!(
			err.downcast_ref::<TileSyncError>(),
			Some(&TileSyncError::LayerNotFound("x".into()))
		);
	}
}
