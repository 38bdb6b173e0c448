//! Opening the layers named by a [`SourceConfig`].

use crate::config::SourceConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tilesync_container::{DriverRegistry, TileReaderTrait, TileWriterTrait, open_layer_at};
use tilesync_core::TileSyncError;

/// Opens the configured layer for reading, or the first layer if none is named.
pub async fn open_reader(registry: &DriverRegistry, config: &SourceConfig) -> Result<Arc<dyn TileReaderTrait>> {
	let path = config.path.as_deref().context("no source path given")?;
	let source = registry.open_auto(config.driver.as_deref(), path).await?;
	let reader = match config.layer.as_deref().filter(|layer| !layer.is_empty()) {
		Some(layer) => source.open_layer(layer).await?,
		None => open_layer_at(source.as_ref(), 0).await?,
	};
	log::info!("connected to '{}' ({})", reader.source_name(), reader.tile_format());
	Ok(reader)
}

/// Opens or creates the configured layer for writing. `default_layer` is used if none is named.
pub async fn open_writer(
	registry: &DriverRegistry,
	config: &SourceConfig,
	default_layer: &str,
) -> Result<Arc<dyn TileWriterTrait>> {
	let path = config.path.as_deref().context("no destination path given")?;
	let source = registry.open_auto(config.driver.as_deref(), path).await?;
	let writable = source
		.as_writable()
		.ok_or_else(|| TileSyncError::NotWritable(path.to_string()))?;
	let layer = config.layer.as_deref().unwrap_or(default_layer);
	writable.create_layer(layer).await
}
