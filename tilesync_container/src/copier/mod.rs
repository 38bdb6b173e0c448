//! Copies tiles from a reader to a writer.
//!
//! A [`TileCopier`] is bound to one reader, one writer and an optional filter. The
//! [`Transcoder`] between the two tile formats is resolved once at construction.
//!
//! For every tile, [`TileCopier::copy_one`] runs the filter, reads the tile, transcodes it and
//! writes it, in that order. [`TileCopier::copy_block`] does this for a whole [`TileBlock`] and
//! stops at the first error.

mod contained_filter;
pub use contained_filter::ContainedFilter;

use crate::{TileReaderTrait, TileWriterTrait};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tilesync_core::{TileBlock, TileCoord, filter::TileFilterTrait};
use tilesync_image::Transcoder;

/// The first error of a block copy, with the number of tiles written before it.
#[derive(Debug, Error)]
#[error("copy aborted after {processed} tiles: {source}")]
pub struct CopyBlockError {
	pub processed: u64,
	#[source]
	pub source: anyhow::Error,
}

#[derive(Debug)]
pub struct TileCopier {
	from: Arc<dyn TileReaderTrait>,
	to: Arc<dyn TileWriterTrait>,
	transcoder: Transcoder,
	filter: Option<Box<dyn TileFilterTrait>>,
}

impl TileCopier {
	pub fn new(
		from: Arc<dyn TileReaderTrait>,
		to: Arc<dyn TileWriterTrait>,
		filter: Option<Box<dyn TileFilterTrait>>,
	) -> TileCopier {
		let transcoder = Transcoder::new(from.tile_format(), to.tile_format());
		log::debug!(
			"copier from '{}' to '{}' using {transcoder:?}",
			from.source_name(),
			to.source_name()
		);
		TileCopier {
			from,
			to,
			transcoder,
			filter,
		}
	}

	pub fn transcoder(&self) -> &Transcoder {
		&self.transcoder
	}

	/// Copies a single tile. Returns `false` if the filter excluded it or the source has no
	/// tile at `coord`, and `true` once the tile is written.
	pub async fn copy_one(&self, coord: &TileCoord) -> Result<bool> {
		if let Some(filter) = &self.filter
			&& filter.excludes(coord).await?
		{
			log::trace!("{coord} excluded");
			return Ok(false);
		}

		let Some(blob) = self.from.get_raw(coord).await? else {
			log::trace!("{coord} missing in source");
			return Ok(false);
		};

		let blob = self.transcoder.run(blob)?;
		self.to.set_raw(coord, blob).await?;
		log::trace!("{coord} copied");
		Ok(true)
	}

	/// Copies every tile of `block`, x in the outer loop and y in the inner loop.
	///
	/// `progress` is called after each tile with the coordinate and whether it was processed.
	/// On the first error the copy stops. Tiles that were already written stay.
	pub async fn copy_block(
		&self,
		block: &TileBlock,
		mut progress: Option<&mut (dyn FnMut(&TileCoord, bool) + Send)>,
	) -> Result<u64, CopyBlockError> {
		log::debug!("copy block {block:?}");
		let mut processed: u64 = 0;
		for coord in block.iter_coords() {
			let done = match self.copy_one(&coord).await {
				Ok(done) => done,
				Err(source) => {
					log::debug!("copy of {coord} failed after {processed} tiles");
					return Err(CopyBlockError { processed, source });
				}
			};
			if let Some(progress) = progress.as_mut() {
				progress(&coord, done);
			}
			if done {
				processed += 1;
			}
		}
		Ok(processed)
	}
}
