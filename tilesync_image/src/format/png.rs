use anyhow::{Result, anyhow, bail};
use image::{
	DynamicImage, ImageEncoder, ImageFormat,
	codecs::png::{CompressionType, FilterType, PngEncoder},
	load_from_memory_with_format,
};
use tilesync_core::Blob;
use tilesync_derive::context;

/// Encodes an 8-bit Grey, GreyA, RGB or RGBA image as PNG.
#[context("encoding {}x{} {:?} as PNG", image.width(), image.height(), image.color())]
pub fn encode(image: &DynamicImage) -> Result<Blob> {
	match image {
		DynamicImage::ImageLuma8(_)
		| DynamicImage::ImageLumaA8(_)
		| DynamicImage::ImageRgb8(_)
		| DynamicImage::ImageRgba8(_) => {}
		_ => bail!("PNG encoding only supports 8-bit Grey, GreyA, RGB or RGBA images"),
	}

	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive).write_image(
		image.as_bytes(),
		image.width(),
		image.height(),
		image.color().into(),
	)?;

	Ok(Blob::from(buffer))
}

#[context("decoding PNG image ({} bytes)", blob.len())]
pub fn decode(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Png).map_err(|e| anyhow!("failed to decode PNG image: {e}"))
}
