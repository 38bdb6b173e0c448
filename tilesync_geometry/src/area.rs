use crate::{geojson::parse_geojson, wkt::parse_wkt};
use anyhow::{Context, Result, ensure};
use geo::{BoundingRect, Intersects, MultiPolygon, Rect, coord};
use std::{fmt, path::Path, str::FromStr};
use tilesync_core::{GeoBBox, TileCoord};
use tilesync_derive::context;

/// Latitude limit of the default area of interest.
const WORLD_LAT: f64 = 85.0511;

/// A region in longitude/latitude degrees, stored as a multipolygon.
#[derive(Clone, PartialEq)]
pub struct AreaOfInterest {
	shape: MultiPolygon<f64>,
}

impl AreaOfInterest {
	pub fn new(shape: MultiPolygon<f64>) -> Result<AreaOfInterest> {
		ensure!(!shape.0.is_empty(), "area of interest must contain at least one polygon");
		Ok(AreaOfInterest { shape })
	}

	/// The whole Web Mercator world, `POLYGON((-180 -85.0511, 180 -85.0511, 180 85.0511, -180 85.0511, -180 -85.0511))`.
	pub fn world() -> AreaOfInterest {
		AreaOfInterest::from_bbox(&GeoBBox {
			x_min: -180.0,
			y_min: -WORLD_LAT,
			x_max: 180.0,
			y_max: WORLD_LAT,
		})
	}

	pub fn from_bbox(bbox: &GeoBBox) -> AreaOfInterest {
		let rect = Rect::new(
			coord! { x: bbox.x_min, y: bbox.y_min },
			coord! { x: bbox.x_max, y: bbox.y_max },
		);
		AreaOfInterest {
			shape: MultiPolygon::new(vec![rect.to_polygon()]),
		}
	}

	pub fn from_wkt(text: &str) -> Result<AreaOfInterest> {
		AreaOfInterest::new(parse_wkt(text)?)
	}

	pub fn from_geojson(json: &str) -> Result<AreaOfInterest> {
		AreaOfInterest::new(parse_geojson(json)?)
	}

	/// Reads a file holding either GeoJSON or WKT.
	#[context("reading area of interest from {:?}", path)]
	pub fn from_file(path: &Path) -> Result<AreaOfInterest> {
		let text = std::fs::read_to_string(path)?;
		text.parse()
	}

	/// Treats `value` as a file path if such a file exists, otherwise as inline WKT or GeoJSON.
	pub fn from_path_or_text(value: &str) -> Result<AreaOfInterest> {
		let path = Path::new(value);
		if path.is_file() {
			AreaOfInterest::from_file(path)
		} else {
			value.parse()
		}
	}

	pub fn multi_polygon(&self) -> &MultiPolygon<f64> {
		&self.shape
	}

	/// The bounding box of all polygons, clamped to the valid longitude and latitude range.
	pub fn bounding_box(&self) -> Result<GeoBBox> {
		let rect = self
			.shape
			.bounding_rect()
			.context("area of interest has no extent")?;
		GeoBBox::new(
			rect.min().x.max(-180.0),
			rect.min().y.max(-90.0),
			rect.max().x.min(180.0),
			rect.max().y.min(90.0),
		)
	}

	/// Whether the tile's longitude/latitude rectangle touches the area.
	pub fn intersects_tile(&self, coord: &TileCoord) -> bool {
		let bbox = coord.as_geo_bbox();
		let rect = Rect::new(
			coord! { x: bbox.x_min, y: bbox.y_min },
			coord! { x: bbox.x_max, y: bbox.y_max },
		);
		self.shape.intersects(&rect)
	}
}

impl Default for AreaOfInterest {
	fn default() -> Self {
		AreaOfInterest::world()
	}
}

impl FromStr for AreaOfInterest {
	type Err = anyhow::Error;

	/// Parses GeoJSON if the text starts with `{`, otherwise WKT.
	fn from_str(text: &str) -> Result<Self> {
		if text.trim_start().starts_with('{') {
			AreaOfInterest::from_geojson(text)
		} else {
			AreaOfInterest::from_wkt(text)
		}
	}
}

impl fmt::Debug for AreaOfInterest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let bbox = self.bounding_box().map(|b| b.to_string()).unwrap_or_default();
		write!(f, "AreaOfInterest({} polygons, [{bbox}])", self.shape.0.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use assert_fs::{NamedTempFile, prelude::*};
	use rstest::rstest;

	const SWITZERLAND: &str = "POLYGON((5.9 45.8, 10.5 45.8, 10.5 47.8, 5.9 47.8, 5.9 45.8))";

	#[test]
	fn world_covers_every_tile() {
		let world = AreaOfInterest::world();
		for level in 0..=4u8 {
			for x in 0..(1u32 << level) {
				for y in 0..(1u32 << level) {
					assert!(world.intersects_tile(&TileCoord::new(level, x, y).unwrap()));
				}
			}
		}
		let bbox = world.bounding_box().unwrap();
		assert_eq!(bbox.as_tuple(), (-180.0, -85.0511, 180.0, 85.0511));
	}

	#[rstest]
	#[case(3, 4, 5, true)]
	#[case(3, 3, 5, false)]
	#[case(3, 4, 4, false)]
	#[case(6, 33, 41, true)]
	#[case(6, 35, 41, false)]
	#[case(0, 0, 0, true)]
	fn intersects(#[case] level: u8, #[case] x: u32, #[case] y: u32, #[case] expected: bool) {
		let aoi = AreaOfInterest::from_wkt(SWITZERLAND).unwrap();
		assert_eq!(aoi.intersects_tile(&TileCoord::new(level, x, y).unwrap()), expected);
	}

	#[test]
	fn bounding_box_of_multipolygon() {
		let aoi: AreaOfInterest = "MULTIPOLYGON(((0 0, 1 0, 1 1, 0 0)), ((-20 -5, -10 -5, -10 30, -20 -5)))"
			.parse()
			.unwrap();
		let bbox = aoi.bounding_box().unwrap();
		assert_relative_eq!(bbox.x_min, -20.0);
		assert_relative_eq!(bbox.y_min, -5.0);
		assert_relative_eq!(bbox.x_max, 1.0);
		assert_relative_eq!(bbox.y_max, 30.0);
	}

	#[test]
	fn bounding_box_is_clamped() {
		let aoi = AreaOfInterest::from_wkt("POLYGON((-200 -95, 200 -95, 200 95, -200 -95))").unwrap();
		assert_eq!(aoi.bounding_box().unwrap().as_tuple(), (-180.0, -90.0, 180.0, 90.0));
	}

	#[test]
	fn from_bbox_matches_wkt() {
		let from_bbox = AreaOfInterest::from_bbox(&"5.9,45.8,10.5,47.8".parse().unwrap());
		let from_wkt = AreaOfInterest::from_wkt(SWITZERLAND).unwrap();
		for (x, y) in [(33, 41), (34, 41), (35, 41), (33, 40)] {
			let coord = TileCoord::new(6, x, y).unwrap();
			assert_eq!(from_bbox.intersects_tile(&coord), from_wkt.intersects_tile(&coord));
		}
	}

	#[test]
	fn from_files() -> Result<()> {
		let wkt = NamedTempFile::new("aoi.wkt")?;
		wkt.write_str(SWITZERLAND)?;
		let geojson = NamedTempFile::new("aoi.geojson")?;
		geojson.write_str(r#"{"type":"Polygon","coordinates":[[[5.9,45.8],[10.5,45.8],[10.5,47.8],[5.9,47.8],[5.9,45.8]]]}"#)?;

		let a = AreaOfInterest::from_path_or_text(wkt.path().to_str().unwrap())?;
		let b = AreaOfInterest::from_path_or_text(geojson.path().to_str().unwrap())?;
		let c = AreaOfInterest::from_path_or_text(SWITZERLAND)?;
		assert_eq!(a, b);
		assert_eq!(a, c);

		assert!(AreaOfInterest::from_file(Path::new("/does/not/exist.wkt")).is_err());
		Ok(())
	}

	#[test]
	fn empty_is_rejected() {
		assert!(AreaOfInterest::new(MultiPolygon::new(vec![])).is_err());
		assert!(AreaOfInterest::from_geojson(r#"{"type":"MultiPolygon","coordinates":[]}"#).is_err());
	}

	#[test]
	fn debug() {
		let aoi = AreaOfInterest::from_wkt(SWITZERLAND).unwrap();
		assert_eq!(format!("{aoi:?}"), "AreaOfInterest(1 polygons, [5.9,45.8,10.5,47.8])");
	}
}
