use crate::TileSourceTrait;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// Opens one kind of tile store from a connection string (a path or URL).
#[async_trait]
pub trait TileDriverTrait: Debug + Send + Sync {
	/// Cheap check whether `location` looks like something this driver opens.
	fn can_open(&self, location: &str) -> bool;

	async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>>;
}
