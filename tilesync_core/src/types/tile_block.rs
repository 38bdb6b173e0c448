//! Rectangular ranges of tiles at a single zoom level.
//!
//! A [`TileBlock`] is the closed range `[x_min, x_max] × [y_min, y_max]` at one level. Blocks
//! are usually derived from a geographic bounding box with [`TileBlock::from_geo_bbox`], and
//! copied tile by tile in the order given by [`TileBlock::iter_coords`].
//!
//! ```
//! use tilesync_core::{GeoBBox, TileBlock};
//!
//! let block = TileBlock::from_geo_bbox(0, &GeoBBox::world());
//! assert_eq!(block.count(), 1);
//!
//! let block = TileBlock::new(2, 0, 1, 0, 1).unwrap();
//! assert_eq!(block.count(), 4);
//! ```

use crate::{GeoBBox, TileCoord, mercator};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileBlock {
	pub level: u8,
	pub x_min: u32,
	pub x_max: u32,
	pub y_min: u32,
	pub y_max: u32,
}

impl TileBlock {
	/// Creates a block and checks that it is normalized and inside the level.
	pub fn new(level: u8, x_min: u32, x_max: u32, y_min: u32, y_max: u32) -> Result<TileBlock> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = (1u32 << level) - 1;
		ensure!(x_min <= x_max, "x_min ({x_min}) must be <= x_max ({x_max})");
		ensure!(y_min <= y_max, "y_min ({y_min}) must be <= y_max ({y_max})");
		ensure!(x_max <= max, "x_max ({x_max}) must be <= {max}");
		ensure!(y_max <= max, "y_max ({y_max}) must be <= {max}");
		Ok(TileBlock {
			level,
			x_min,
			x_max,
			y_min,
			y_max,
		})
	}

	/// Every tile at `level`.
	pub fn new_full(level: u8) -> TileBlock {
		let max = (1u32 << level) - 1;
		TileBlock {
			level,
			x_min: 0,
			x_max: max,
			y_min: 0,
			y_max: max,
		}
	}

	/// The block of tiles covering `bbox` at `level`.
	///
	/// The latitude-derived rows are swapped if they come out inverted. If the east edge of
	/// `bbox` lies exactly on a column boundary, the column starting there is left out.
	/// Antimeridian-crossing boxes are not supported.
	pub fn from_geo_bbox(level: u8, bbox: &GeoBBox) -> TileBlock {
		let mut x_min = mercator::lon_to_x(level, bbox.x_min);
		let mut x_max = mercator::lon_to_x(level, bbox.x_max);
		let mut y_min = mercator::lat_to_y(level, bbox.y_min);
		let mut y_max = mercator::lat_to_y(level, bbox.y_max);

		if y_min > y_max {
			std::mem::swap(&mut y_min, &mut y_max);
		}

		if mercator::x_to_lon(level, x_max) == bbox.x_max {
			x_max -= 1;
		}

		let max = mercator::tiles_per_axis(level) - 1;
		x_min = x_min.clamp(0, max);
		x_max = x_max.clamp(x_min, max);
		y_min = y_min.clamp(0, max);
		y_max = y_max.clamp(y_min, max);

		TileBlock {
			level,
			x_min: x_min as u32,
			x_max: x_max as u32,
			y_min: y_min as u32,
			y_max: y_max as u32,
		}
	}

	pub fn width(&self) -> u64 {
		u64::from(self.x_max - self.x_min) + 1
	}

	pub fn height(&self) -> u64 {
		u64::from(self.y_max - self.y_min) + 1
	}

	/// Number of tiles in the block.
	pub fn count(&self) -> u64 {
		self.width() * self.height()
	}

	pub fn contains(&self, coord: &TileCoord) -> bool {
		coord.level == self.level
			&& (self.x_min..=self.x_max).contains(&coord.x)
			&& (self.y_min..=self.y_max).contains(&coord.y)
	}

	/// Iterates all coordinates, x in the outer loop and y in the inner loop.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		(self.x_min..=self.x_max).flat_map(move |x| {
			(self.y_min..=self.y_max).map(move |y| TileCoord { level: self.level, x, y })
		})
	}
}

impl Debug for TileBlock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: [{},{},{},{}] ({})",
			self.level,
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.count()
		)
	}
}
