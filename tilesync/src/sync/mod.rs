//! Level-by-level synchronisation of one layer into another.
//!
//! For every level between `min_level` and `max_level` the tile block covering the bounding
//! box of the area of interest is copied. Tiles outside the area itself are skipped. Without
//! `replace`, tiles the destination already holds are skipped as well. With `replace`, each
//! level is cleared first.

use anyhow::{Context, Result, ensure};
use std::sync::Arc;
use tilesync_container::{ContainedFilter, TileCopier, TileReaderTrait, TileWriterTrait};
use tilesync_core::{
	TileBlock, TileCoord,
	filter::{AnyFilter, TileFilterTrait},
	progress::get_progress_bar,
};
use tilesync_geometry::{AreaOfInterest, IntersectsFilter};

pub const DEFAULT_MIN_LEVEL: u8 = 0;
pub const DEFAULT_MAX_LEVEL: u8 = 3;

#[derive(Clone, Debug)]
pub struct SyncParameters {
	pub min_level: u8,
	pub max_level: u8,
	pub area: Arc<AreaOfInterest>,
	pub replace: bool,
}

impl Default for SyncParameters {
	fn default() -> Self {
		SyncParameters {
			min_level: DEFAULT_MIN_LEVEL,
			max_level: DEFAULT_MAX_LEVEL,
			area: Arc::new(AreaOfInterest::world()),
			replace: false,
		}
	}
}

/// What happened at one level.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelReport {
	pub level: u8,
	pub block: TileBlock,
	pub processed: u64,
}

/// Copies `from` into `to` for every level of `parameters`.
///
/// Stops at the first failing level. Levels already finished and tiles already written stay.
pub async fn sync_layer(
	from: Arc<dyn TileReaderTrait>,
	to: Arc<dyn TileWriterTrait>,
	parameters: &SyncParameters,
) -> Result<Vec<LevelReport>> {
	let SyncParameters {
		min_level,
		max_level,
		replace,
		..
	} = *parameters;
	ensure!(min_level <= max_level, "min level ({min_level}) must be <= max level ({max_level})");
	ensure!(max_level <= 31, "max level ({max_level}) must be <= 31");

	let bbox = parameters.area.bounding_box()?;
	log::debug!("area of interest {:?}", parameters.area);

	let area_filter = IntersectsFilter::new(parameters.area.clone());
	let filter: Box<dyn TileFilterTrait> = if replace {
		Box::new(area_filter)
	} else {
		let contained: Arc<dyn TileReaderTrait> = to.clone();
		Box::new(AnyFilter::new(vec![
			Box::new(ContainedFilter::new(contained)),
			Box::new(area_filter),
		]))
	};
	let copier = TileCopier::new(from, to.clone(), Some(filter));

	let mut reports = Vec::new();
	for level in min_level..=max_level {
		log::info!("level {level}");

		if replace {
			log::info!("clearing level {level}");
			to.clear(level)
				.await
				.with_context(|| format!("clearing level {level}"))?;
		}

		let block = TileBlock::from_geo_bbox(level, &bbox);
		log::info!("tiles in bbox: {block:?}");
		log::info!("number of tiles in bbox: {}", block.count());

		let progress = get_progress_bar(&format!("level {level}"), block.count());
		let mut on_tile = |_: &TileCoord, _: bool| progress.inc(1);
		let processed = copier
			.copy_block(&block, Some(&mut on_tile))
			.await
			.with_context(|| format!("syncing level {level}"))?;
		progress.finish();

		log::info!("number of tiles processed: {processed}");
		reports.push(LevelReport {
			level,
			block,
			processed,
		});
	}
	Ok(reports)
}
