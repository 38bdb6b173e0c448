//! Web Mercator transform between tile indices and longitude/latitude in degrees.
//!
//! Rows follow the bottom-left (TMS) convention: row 0 is the southern-most row.
//! All functions are pure and follow the formulas described at
//! <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>.
//!
//! ```
//! use tilesync_core::mercator::*;
//!
//! assert_eq!(lon_to_x(3, 7.27), 4);
//! assert_eq!(lat_to_y(3, 47.4), 5);
//! assert_eq!(x_to_lon(1, 1), 0.0);
//! ```

use std::f64::consts::PI;

/// Highest latitude representable in Web Mercator, in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Number of tiles along one axis at `level`.
#[inline]
pub fn tiles_per_axis(level: u8) -> i64 {
	1i64 << level
}

/// Longitude of the western edge of column `x`.
pub fn x_to_lon(level: u8, x: i64) -> f64 {
	x as f64 / tiles_per_axis(level) as f64 * 360.0 - 180.0
}

/// Column containing longitude `lon`. The result is truncated and not clamped, so
/// `lon = 180` yields `2^level`.
pub fn lon_to_x(level: u8, lon: f64) -> i64 {
	(tiles_per_axis(level) as f64 * (lon + 180.0) / 360.0) as i64
}

/// Latitude of the southern edge of row `y` (TMS).
pub fn y_to_lat(level: u8, y: i64) -> f64 {
	let n = tiles_per_axis(level) as f64;
	let lat_rad = (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan();
	-(lat_rad * 180.0 / PI)
}

/// Row (TMS) containing latitude `lat`.
///
/// The latitude is clamped to ±[`MAX_MERCATOR_LAT`] first. The OSM row is truncated toward
/// the pole and then inverted so that row 0 is the southern-most row. The result always lies
/// in `[0, 2^level)`.
pub fn lat_to_y(level: u8, lat: f64) -> i64 {
	let n = tiles_per_axis(level);
	let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
	let y_osm = (n as f64 * (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0) as i64;
	(n - y_osm - 1).clamp(0, n - 1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(7.27, 47.4, 0, 0, 0)]
	#[case(7.27, 47.4, 1, 1, 1)]
	#[case(7.27, 47.4, 2, 2, 2)]
	#[case(7.27, 47.4, 3, 4, 5)]
	#[case(7.27, 47.4, 4, 8, 10)]
	#[case(7.27, 47.4, 5, 16, 20)]
	#[case(7.27, 47.4, 6, 33, 41)]
	fn geo_to_tile(#[case] lon: f64, #[case] lat: f64, #[case] level: u8, #[case] x: i64, #[case] y: i64) {
		assert_eq!(lon_to_x(level, lon), x);
		assert_eq!(lat_to_y(level, lat), y);
	}

	#[rstest]
	#[case(-180.0, -85.05112947, 0, 0, 0)]
	#[case(0.0, 0.0, 1, 1, 1)]
	#[case(0.0, 0.0, 2, 2, 2)]
	#[case(0.0, 40.979898, 3, 4, 5)]
	#[case(0.0, 40.979898, 4, 8, 10)]
	#[case(0.0, 40.979898, 5, 16, 20)]
	#[case(5.625, 45.089036, 6, 33, 41)]
	fn tile_to_geo(#[case] lon: f64, #[case] lat: f64, #[case] level: u8, #[case] x: i64, #[case] y: i64) {
		let out_lat = y_to_lat(level, y);
		assert!((out_lat - lat).powi(2) <= 1e-5, "y_to_lat({level}, {y}) = {out_lat}, want {lat}");
		assert_eq!(x_to_lon(level, x), lon);
	}

	#[test]
	fn lon_round_trip_on_every_column() {
		for level in 0..=12u8 {
			for x in 0..tiles_per_axis(level) {
				assert_eq!(lon_to_x(level, x_to_lon(level, x)), x, "level {level}, x {x}");
			}
		}
	}

	#[test]
	fn lat_round_trip_on_every_row() {
		for level in 0..=10u8 {
			for y in 0..tiles_per_axis(level) {
				let south = y_to_lat(level, y);
				let north = y_to_lat(level, y + 1);
				let centre = (south + north) / 2.0;
				assert_eq!(lat_to_y(level, centre), y, "level {level}, y {y}");
			}
		}
	}

	#[rstest]
	#[case(0, 90.0, 0)]
	#[case(0, -90.0, 0)]
	#[case(4, 90.0, 15)]
	#[case(4, MAX_MERCATOR_LAT, 15)]
	#[case(4, -MAX_MERCATOR_LAT, 0)]
	#[case(4, -89.0, 0)]
	#[case(12, -90.0, 0)]
	#[case(31, -90.0, 0)]
	#[case(31, 90.0, (1 << 31) - 1)]
	fn poles_are_clamped(#[case] level: u8, #[case] lat: f64, #[case] y: i64) {
		assert_eq!(lat_to_y(level, lat), y);
	}

	#[test]
	fn antimeridian_is_not_wrapped() {
		assert_eq!(lon_to_x(2, 180.0), 4);
		assert_eq!(lon_to_x(2, -180.0), 0);
	}
}
