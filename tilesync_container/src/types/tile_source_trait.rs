//! The capability contracts every tile store is used through.
//!
//! A store opened by a driver is a [`TileSourceTrait`]: it lists layers and opens them for
//! reading. A store that also accepts writes answers [`TileSourceTrait::as_writable`] with a
//! [`WritableTileSourceTrait`], which creates layers for writing.
//!
//! All implementations must be safe for concurrent use by multiple callers.

use anyhow::Result;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tilesync_core::{Blob, TileCoord, TileFormat};

/// Reads encoded tiles of one layer.
#[async_trait]
pub trait TileReaderTrait: Debug + Send + Sync {
	/// Human-readable origin of the tiles, e.g. a path or URL.
	fn source_name(&self) -> &str;

	/// Encoding of every tile in this layer.
	fn tile_format(&self) -> TileFormat;

	/// Returns the encoded tile, or `None` if the layer has no tile at `coord`.
	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>>;

	async fn contains(&self, coord: &TileCoord) -> Result<bool>;
}

/// Writes encoded tiles of one layer. Bytes are stored as given, the format is not checked.
#[async_trait]
pub trait TileWriterTrait: TileReaderTrait {
	async fn set_raw(&self, coord: &TileCoord, blob: Blob) -> Result<()>;

	/// Removes every tile at `level`.
	async fn clear(&self, level: u8) -> Result<()>;
}

#[async_trait]
pub trait TileSourceTrait: Debug + Send + Sync {
	async fn list_layers(&self) -> Result<Vec<String>>;

	async fn open_layer(&self, name: &str) -> Result<Arc<dyn TileReaderTrait>>;

	/// Capability probe for writing. Read-only stores keep the default.
	fn as_writable(&self) -> Option<&dyn WritableTileSourceTrait> {
		None
	}
}

#[async_trait]
pub trait WritableTileSourceTrait: TileSourceTrait {
	/// Creates the layer `name` if it is absent, and opens it for writing.
	async fn create_layer(&self, name: &str) -> Result<Arc<dyn TileWriterTrait>>;
}
