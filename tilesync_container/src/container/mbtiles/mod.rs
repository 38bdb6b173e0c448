//! MBTiles (SQLite) stores.
//!
//! An MBTiles file holds a single layer named by its `name` metadata entry. Opening a file
//! that does not exist creates it with an empty schema.

mod store;
pub use store::{MBTilesMetadata, MBTilesStore};

use crate::{TileDriverTrait, TileReaderTrait, TileSourceTrait, TileWriterTrait, WritableTileSourceTrait};
use anyhow::Result;
use async_trait::async_trait;
use std::{path::Path, sync::Arc};
use tilesync_core::TileSyncError;

/// Opens `*.mbtiles` files.
#[derive(Debug)]
pub struct MBTilesDriver;

#[async_trait]
impl TileDriverTrait for MBTilesDriver {
	fn can_open(&self, location: &str) -> bool {
		Path::new(location).extension().is_some_and(|ext| ext == "mbtiles")
	}

	async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		Ok(Box::new(MBTilesSource::open(Path::new(location))?))
	}
}

#[derive(Debug)]
pub struct MBTilesSource {
	store: Arc<MBTilesStore>,
}

impl MBTilesSource {
	pub fn open(path: &Path) -> Result<MBTilesSource> {
		Ok(MBTilesSource {
			store: Arc::new(MBTilesStore::open(path)?),
		})
	}

	pub fn store(&self) -> &Arc<MBTilesStore> {
		&self.store
	}

	fn layer_not_found(&self, name: &str) -> anyhow::Error {
		TileSyncError::LayerNotFound(format!("{name} in {}", self.store.source_name())).into()
	}
}

#[async_trait]
impl TileSourceTrait for MBTilesSource {
	async fn list_layers(&self) -> Result<Vec<String>> {
		Ok(vec![self.store.layer_name()])
	}

	async fn open_layer(&self, name: &str) -> Result<Arc<dyn TileReaderTrait>> {
		if self.store.layer_name() == name {
			Ok(self.store.clone())
		} else {
			Err(self.layer_not_found(name))
		}
	}

	fn as_writable(&self) -> Option<&dyn WritableTileSourceTrait> {
		Some(self)
	}
}

#[async_trait]
impl WritableTileSourceTrait for MBTilesSource {
	/// Opens the single layer if `name` matches it. An unnamed file takes `name` as its name.
	async fn create_layer(&self, name: &str) -> Result<Arc<dyn TileWriterTrait>> {
		if self.store.claim_layer_name(name)? {
			Ok(self.store.clone())
		} else {
			Err(self.layer_not_found(name))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use rstest::rstest;

	#[rstest]
	#[case("world.mbtiles", true)]
	#[case("/data/world.mbtiles", true)]
	#[case("world.gpkg", false)]
	#[case("world.mbtiles.zip", false)]
	#[case("mbtiles", false)]
	fn can_open(#[case] location: &str, #[case] expected: bool) {
		assert_eq!(MBTilesDriver.can_open(location), expected);
	}

	#[tokio::test]
	async fn single_layer_rules() -> Result<()> {
		let dir = TempDir::new()?;
		let source = MBTilesDriver
			.open_tile_source(dir.path().join("a.mbtiles").to_str().unwrap())
			.await?;
		assert_eq!(source.list_layers().await?, [""]);
		assert!(source.open_layer("data").await.is_err());

		let writable = source.as_writable().unwrap();
		writable.create_layer("data").await?;
		assert_eq!(source.list_layers().await?, ["data"]);
		assert!(source.open_layer("data").await.is_ok());

		let err = writable.create_layer("other").await.unwrap_err();
		assert!(matches!(
			err.downcast_ref::<TileSyncError>(),
			Some(TileSyncError::LayerNotFound(_))
		));
		Ok(())
	}

	#[tokio::test]
	async fn name_survives_reopen() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("b.mbtiles");
		MBTilesSource::open(&path)?.create_layer("berlin").await?;
		let source = MBTilesSource::open(&path)?;
		assert_eq!(source.list_layers().await?, ["berlin"]);
		Ok(())
	}
}
