//! In-memory stores for tests.
//!
//! [`MockTileStore`] is a single layer that keeps tiles in a map and counts calls.
//! Writes can be set up to fail after a number of successful writes. [`MockTileSource`]
//! is a writable multi-layer source of such stores.

use crate::{TileReaderTrait, TileSourceTrait, TileWriterTrait, WritableTileSourceTrait};
use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
	collections::BTreeMap,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
use tilesync_core::{Blob, TileCoord, TileFormat, TileSyncError};

#[derive(Debug)]
pub struct MockTileStore {
	name: String,
	format: TileFormat,
	tiles: Mutex<BTreeMap<TileCoord, Blob>>,
	fail_after_writes: Option<usize>,
	writes: AtomicUsize,
	reads: AtomicUsize,
}

impl MockTileStore {
	pub fn new(name: &str, format: TileFormat) -> MockTileStore {
		MockTileStore {
			name: name.to_string(),
			format,
			tiles: Mutex::new(BTreeMap::new()),
			fail_after_writes: None,
			writes: AtomicUsize::new(0),
			reads: AtomicUsize::new(0),
		}
	}

	pub fn new_png(name: &str) -> MockTileStore {
		MockTileStore::new(name, TileFormat::PNG)
	}

	pub fn new_jpg(name: &str) -> MockTileStore {
		MockTileStore::new(name, TileFormat::JPG)
	}

	/// Every write after the first `count` successful ones fails.
	#[must_use]
	pub fn failing_after(mut self, count: usize) -> MockTileStore {
		self.fail_after_writes = Some(count);
		self
	}

	/// Stores `blob` at every coordinate.
	#[must_use]
	pub fn with_tiles(self, coords: impl IntoIterator<Item = TileCoord>, blob: &Blob) -> MockTileStore {
		{
			let mut tiles = self.tiles.lock();
			for coord in coords {
				tiles.insert(coord, blob.clone());
			}
		}
		self
	}

	pub fn tile(&self, coord: &TileCoord) -> Option<Blob> {
		self.tiles.lock().get(coord).cloned()
	}

	pub fn coords(&self) -> Vec<TileCoord> {
		self.tiles.lock().keys().copied().collect()
	}

	pub fn len(&self) -> usize {
		self.tiles.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tiles.lock().is_empty()
	}

	/// Number of `set_raw` calls, including failed ones.
	pub fn write_count(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	/// Number of `get_raw` calls.
	pub fn read_count(&self) -> usize {
		self.reads.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl TileReaderTrait for MockTileStore {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn tile_format(&self) -> TileFormat {
		self.format
	}

	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		Ok(self.tile(coord))
	}

	async fn contains(&self, coord: &TileCoord) -> Result<bool> {
		Ok(self.tiles.lock().contains_key(coord))
	}
}

#[async_trait]
impl TileWriterTrait for MockTileStore {
	async fn set_raw(&self, coord: &TileCoord, blob: Blob) -> Result<()> {
		let previous = self.writes.fetch_add(1, Ordering::SeqCst);
		if let Some(limit) = self.fail_after_writes
			&& previous >= limit
		{
			bail!("mock write #{} of {coord} failed", previous + 1);
		}
		self.tiles.lock().insert(*coord, blob);
		Ok(())
	}

	async fn clear(&self, level: u8) -> Result<()> {
		self.tiles.lock().retain(|coord, _| coord.level != level);
		Ok(())
	}
}

/// A writable source whose layers are [`MockTileStore`]s. New layers are png.
#[derive(Debug)]
pub struct MockTileSource {
	name: String,
	layers: Mutex<BTreeMap<String, Arc<MockTileStore>>>,
}

impl MockTileSource {
	pub fn new(name: &str) -> MockTileSource {
		MockTileSource {
			name: name.to_string(),
			layers: Mutex::new(BTreeMap::new()),
		}
	}

	pub fn insert_layer(&self, name: &str, store: MockTileStore) -> Arc<MockTileStore> {
		let store = Arc::new(store);
		self.layers.lock().insert(name.to_string(), store.clone());
		store
	}

	pub fn layer(&self, name: &str) -> Option<Arc<MockTileStore>> {
		self.layers.lock().get(name).cloned()
	}
}

#[async_trait]
impl TileSourceTrait for MockTileSource {
	async fn list_layers(&self) -> Result<Vec<String>> {
		Ok(self.layers.lock().keys().cloned().collect())
	}

	async fn open_layer(&self, name: &str) -> Result<Arc<dyn TileReaderTrait>> {
		match self.layer(name) {
			Some(store) => Ok(store),
			None => Err(TileSyncError::LayerNotFound(format!("{name} in {}", self.name)).into()),
		}
	}

	fn as_writable(&self) -> Option<&dyn WritableTileSourceTrait> {
		Some(self)
	}
}

#[async_trait]
impl WritableTileSourceTrait for MockTileSource {
	async fn create_layer(&self, name: &str) -> Result<Arc<dyn TileWriterTrait>> {
		let store = self
			.layers
			.lock()
			.entry(name.to_string())
			.or_insert_with(|| Arc::new(MockTileStore::new_png(name)))
			.clone();
		Ok(store)
	}
}
