//! Encoders and decoders per [`TileFormat`].

pub mod jpeg;
pub mod png;

use anyhow::Result;
use image::DynamicImage;
use tilesync_core::{Blob, TileFormat};

/// Encodes `image` with the default settings of `format`.
pub fn encode(image: &DynamicImage, format: TileFormat) -> Result<Blob> {
	match format {
		TileFormat::JPG => jpeg::encode(image, None),
		TileFormat::PNG => png::encode(image),
	}
}

pub fn decode(blob: &Blob, format: TileFormat) -> Result<DynamicImage> {
	match format {
		TileFormat::JPG => jpeg::decode(blob),
		TileFormat::PNG => png::decode(blob),
	}
}
