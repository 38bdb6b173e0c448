use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

/// A single-colour RGBA image.
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
	DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// 256×256 RGB gradient.
pub fn test_image_rgb() -> DynamicImage {
	DynamicImage::ImageRgb8(RgbImage::from_fn(256, 256, |x, y| {
		Rgb([x as u8, (255 - x) as u8, y as u8])
	}))
}

/// 256×256 RGBA gradient with alpha falling off along y.
pub fn test_image_rgba() -> DynamicImage {
	DynamicImage::ImageRgba8(RgbaImage::from_fn(256, 256, |x, y| {
		Rgba([x as u8, (255 - x) as u8, y as u8, (255 - y) as u8])
	}))
}

/// 256×256 grey ramp from black to white.
pub fn test_image_grey() -> DynamicImage {
	DynamicImage::ImageLuma8(GrayImage::from_fn(256, 256, |x, _y| Luma([x as u8])))
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::GenericImageView;

	#[test]
	fn solid() {
		let image = solid_image(3, 2, [96, 96, 96, 255]);
		assert_eq!(image.dimensions(), (3, 2));
		assert!(image.pixels().all(|(_, _, p)| p.0 == [96, 96, 96, 255]));
	}

	#[test]
	fn gradients() {
		assert_eq!(test_image_rgb().get_pixel(255, 0).0, [255, 0, 0, 255]);
		assert_eq!(test_image_rgba().get_pixel(0, 255).0, [0, 255, 255, 0]);
		assert_eq!(test_image_grey().get_pixel(128, 7).0, [128, 128, 128, 255]);
	}
}
