//! The closed set of raster encodings a tile store can hold.
//!
//! ```
//! use tilesync_core::TileFormat;
//!
//! assert_eq!(TileFormat::try_from_str("JPEG").unwrap(), TileFormat::JPG);
//! assert_eq!(TileFormat::PNG.as_extension(), ".png");
//! assert!(TileFormat::try_from_str("webp").is_err());
//! ```

use crate::TileSyncError;
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::ValueEnum;
use std::fmt::{Display, Formatter};

#[allow(clippy::upper_case_acronyms)]
#[cfg_attr(feature = "cli", derive(ValueEnum))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TileFormat {
	JPG,
	PNG,
}

impl TileFormat {
	/// Lowercase identifier, also used as file extension and as the MBTiles `format` value.
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::JPG => "jpg",
			TileFormat::PNG => "png",
		}
	}

	pub fn as_extension(&self) -> &'static str {
		match self {
			TileFormat::JPG => ".jpg",
			TileFormat::PNG => ".png",
		}
	}

	pub fn as_mime_str(&self) -> &'static str {
		match self {
			TileFormat::JPG => "image/jpeg",
			TileFormat::PNG => "image/png",
		}
	}

	/// Parses a format name or extension, case-insensitive, with or without leading dot.
	///
	/// # Errors
	/// Fails with [`TileSyncError::UnsupportedFormat`] for anything but png, jpg and jpeg.
	pub fn try_from_str(value: &str) -> Result<Self> {
		Ok(match value.trim().trim_start_matches('.').to_lowercase().as_str() {
			"jpeg" | "jpg" => TileFormat::JPG,
			"png" => TileFormat::PNG,
			_ => return Err(TileSyncError::UnsupportedFormat(value.to_string()).into()),
		})
	}

	/// Guesses the format from the first bytes of an encoded tile.
	pub fn sniff(data: &[u8]) -> Option<Self> {
		if data.starts_with(b"\x89PNG\r\n\x1a\n") {
			Some(TileFormat::PNG)
		} else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
			Some(TileFormat::JPG)
		} else {
			None
		}
	}
}

impl Display for TileFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
