use crate::TileReaderTrait;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tilesync_core::{TileCoord, filter::TileFilterTrait};

/// Excludes tiles that `reader` already contains.
#[derive(Debug)]
pub struct ContainedFilter {
	reader: Arc<dyn TileReaderTrait>,
}

impl ContainedFilter {
	pub fn new(reader: Arc<dyn TileReaderTrait>) -> ContainedFilter {
		ContainedFilter { reader }
	}
}

#[async_trait]
impl TileFilterTrait for ContainedFilter {
	async fn excludes(&self, coord: &TileCoord) -> Result<bool> {
		self.reader.contains(coord).await
	}
}
