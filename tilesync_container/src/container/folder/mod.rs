//! Tile folders.
//!
//! Every sub-directory of the root is a layer, and tiles are plain files:
//! ```text
//! <root>/<layer>/<level>/<x>/<y>.<png|jpg>
//! ```
//! Rows are stored in TMS order. The `folder` driver writes png tiles, `jpgfolder` writes jpg.

use crate::{TileDriverTrait, TileReaderTrait, TileSourceTrait, TileWriterTrait, WritableTileSourceTrait};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
	sync::Arc,
};
use tilesync_core::{Blob, TileCoord, TileFormat, TileSyncError};
use tilesync_derive::context;

/// Opens existing directories as tile folders of a fixed format.
#[derive(Debug)]
pub struct TileFolderDriver {
	format: TileFormat,
}

impl TileFolderDriver {
	pub fn new(format: TileFormat) -> TileFolderDriver {
		TileFolderDriver { format }
	}
}

#[async_trait]
impl TileDriverTrait for TileFolderDriver {
	fn can_open(&self, location: &str) -> bool {
		Path::new(location).is_dir()
	}

	async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		Ok(Box::new(TileFolderSource::open(Path::new(location), self.format)?))
	}
}

#[derive(Debug)]
pub struct TileFolderSource {
	root: PathBuf,
	format: TileFormat,
}

impl TileFolderSource {
	#[context("opening tile folder {:?}", root)]
	pub fn open(root: &Path, format: TileFormat) -> Result<TileFolderSource> {
		ensure!(root.is_dir(), "directory {root:?} does not exist");
		Ok(TileFolderSource {
			root: root.to_path_buf(),
			format,
		})
	}

	fn layer(&self, name: &str) -> Result<Arc<TileFolder>> {
		let valid = !name.is_empty() && Path::new(name).file_name().is_some_and(|n| n == name);
		if !valid {
			return Err(TileSyncError::LayerNotFound(format!("{name} in {}", self.root.display())).into());
		}
		Ok(Arc::new(TileFolder::new(self.root.join(name), self.format)))
	}
}

#[async_trait]
impl TileSourceTrait for TileFolderSource {
	async fn list_layers(&self) -> Result<Vec<String>> {
		let mut entries = tokio::fs::read_dir(&self.root)
			.await
			.with_context(|| format!("reading directory {:?}", self.root))?;
		let mut names = Vec::new();
		while let Some(entry) = entries.next_entry().await? {
			if entry.file_type().await?.is_dir() {
				names.push(entry.file_name().to_string_lossy().to_string());
			}
		}
		names.sort();
		Ok(names)
	}

	async fn open_layer(&self, name: &str) -> Result<Arc<dyn TileReaderTrait>> {
		let layer = self.layer(name)?;
		if !layer.path.is_dir() {
			return Err(TileSyncError::LayerNotFound(format!("{name} in {}", self.root.display())).into());
		}
		Ok(layer)
	}

	fn as_writable(&self) -> Option<&dyn WritableTileSourceTrait> {
		Some(self)
	}
}

#[async_trait]
impl WritableTileSourceTrait for TileFolderSource {
	async fn create_layer(&self, name: &str) -> Result<Arc<dyn TileWriterTrait>> {
		let layer = self.layer(name)?;
		tokio::fs::create_dir_all(&layer.path)
			.await
			.with_context(|| format!("creating layer directory {:?}", layer.path))?;
		Ok(layer)
	}
}

/// One layer directory.
#[derive(Debug)]
pub struct TileFolder {
	name: String,
	path: PathBuf,
	format: TileFormat,
}

impl TileFolder {
	pub fn new(path: PathBuf, format: TileFormat) -> TileFolder {
		TileFolder {
			name: path.to_string_lossy().to_string(),
			path,
			format,
		}
	}

	pub fn tile_path(&self, coord: &TileCoord) -> PathBuf {
		self.path
			.join(coord.level.to_string())
			.join(coord.x.to_string())
			.join(format!("{}{}", coord.y, self.format.as_extension()))
	}
}

#[async_trait]
impl TileReaderTrait for TileFolder {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn tile_format(&self) -> TileFormat {
		self.format
	}

	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let path = self.tile_path(coord);
		match tokio::fs::read(&path).await {
			Ok(data) => Ok(Some(Blob::from(data))),
			Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
			Err(e) => Err(e).with_context(|| format!("reading tile {path:?}")),
		}
	}

	async fn contains(&self, coord: &TileCoord) -> Result<bool> {
		Ok(tokio::fs::try_exists(self.tile_path(coord)).await?)
	}
}

#[async_trait]
impl TileWriterTrait for TileFolder {
	async fn set_raw(&self, coord: &TileCoord, blob: Blob) -> Result<()> {
		let path = self.tile_path(coord);
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&path, blob.as_slice())
			.await
			.with_context(|| format!("writing tile {path:?}"))
	}

	async fn clear(&self, level: u8) -> Result<()> {
		let path = self.path.join(level.to_string());
		log::debug!("remove {path:?}");
		match tokio::fs::remove_dir_all(&path).await {
			Err(e) if e.kind() != ErrorKind::NotFound => Err(e).with_context(|| format!("removing {path:?}")),
			_ => Ok(()),
		}
	}
}
