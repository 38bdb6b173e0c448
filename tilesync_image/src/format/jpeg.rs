//! JPEG encoding and decoding.
//!
//! JPEG has no transparency, so images with an alpha channel are flattened to Grey or RGB
//! before encoding.

use anyhow::{Result, anyhow, ensure};
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::jpeg::JpegEncoder, load_from_memory_with_format};
use std::borrow::Cow;
use tilesync_core::Blob;
use tilesync_derive::context;

pub const DEFAULT_QUALITY: u8 = 90;

/// Encodes `image` as JPEG. `quality` must be below 100 and defaults to [`DEFAULT_QUALITY`].
#[context("encoding {}x{} {:?} as JPEG (q={:?})", image.width(), image.height(), image.color(), quality)]
pub fn encode(image: &DynamicImage, quality: Option<u8>) -> Result<Blob> {
	let quality = quality.unwrap_or(DEFAULT_QUALITY);
	ensure!(quality < 100, "JPEG does not support lossless compression, use a quality < 100");

	let image: Cow<DynamicImage> = match image {
		DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => Cow::Borrowed(image),
		DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
			Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
		}
		_ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
	};

	let mut buffer: Vec<u8> = Vec::new();
	JpegEncoder::new_with_quality(&mut buffer, quality).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}

#[context("decoding JPEG image ({} bytes)", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Jpeg).map_err(|e| anyhow!("failed to decode JPEG image: {e}"))
}
