use crate::AreaOfInterest;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tilesync_core::{TileCoord, filter::TileFilterTrait};

/// Excludes tiles that do not touch the area of interest.
#[derive(Debug, Clone)]
pub struct IntersectsFilter {
	area: Arc<AreaOfInterest>,
}

impl IntersectsFilter {
	pub fn new(area: Arc<AreaOfInterest>) -> IntersectsFilter {
		IntersectsFilter { area }
	}
}

#[async_trait]
impl TileFilterTrait for IntersectsFilter {
	async fn excludes(&self, coord: &TileCoord) -> Result<bool> {
		Ok(!self.area.intersects_tile(coord))
	}
}
