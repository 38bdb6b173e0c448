//! Tile addresses in a Web Mercator pyramid.
//!
//! A [`TileCoord`] uses the bottom-left (TMS) convention: `y = 0` is the southern-most row.
//! Consumers that expect OSM-style rows (row 0 at the top) use [`TileCoord::flip_y`].
//!
//! ```
//! use tilesync_core::TileCoord;
//!
//! let coord = TileCoord::new(3, 4, 5).unwrap();
//! assert_eq!(coord.flip_y().y, 2);
//! assert!(TileCoord::new(3, 8, 0).is_err());
//! ```

use crate::{GeoBBox, mercator};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug, Display};

/// A tile address: zoom level plus column and row.
#[derive(Eq, PartialEq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column, counted from the west.
	pub x: u32,
	/// The row, counted from the south.
	pub y: u32,
}

impl TileCoord {
	/// Creates a `TileCoord`, checking that `x` and `y` lie in `[0, 2^level)`.
	///
	/// # Errors
	/// Returns an error if `level` > 31 or an index is out of bounds.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= 31, "level ({level}) must be <= 31");
		let max = 1u32 << level;
		ensure!(x < max, "x ({x}) out of bounds for level {level}");
		ensure!(y < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// Highest valid column or row index at this level.
	pub fn max_index(&self) -> u32 {
		(1u32 << self.level) - 1
	}

	/// Returns the same tile addressed with the opposite row convention (`y' = 2^level - y - 1`).
	#[must_use]
	pub fn flip_y(&self) -> TileCoord {
		TileCoord {
			level: self.level,
			x: self.x,
			y: self.max_index() - self.y,
		}
	}

	/// Geographic extent of the tile.
	pub fn as_geo_bbox(&self) -> GeoBBox {
		let x = i64::from(self.x);
		let y = i64::from(self.y);
		GeoBBox {
			x_min: mercator::x_to_lon(self.level, x),
			y_min: mercator::y_to_lat(self.level, y),
			x_max: mercator::x_to_lon(self.level, x + 1),
			y_max: mercator::y_to_lat(self.level, y + 1),
		}
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}
