use anyhow::{Result, bail, ensure};
use std::{
	fmt::{self, Debug, Display},
	str::FromStr,
};
use tilesync_derive::context;

/// A geographic bounding box in degrees.
///
/// - `x_min` (west): minimum longitude
/// - `y_min` (south): minimum latitude
/// - `x_max` (east): maximum longitude
/// - `y_max` (north): maximum latitude
///
/// ```
/// use tilesync_core::GeoBBox;
///
/// let bbox: GeoBBox = "5.9,45.8,10.5,47.8".parse().unwrap();
/// assert_eq!(bbox.as_tuple(), (5.9, 45.8, 10.5, 47.8));
/// assert!(GeoBBox::new(10.0, 0.0, -10.0, 1.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// Creates a bounding box from `west, south, east, north` and validates it.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<GeoBBox> {
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
		.checked()
	}

	/// The whole world, `-180,-90,180,90`.
	pub fn world() -> GeoBBox {
		GeoBBox {
			x_min: -180.0,
			y_min: -90.0,
			x_max: 180.0,
			y_max: 90.0,
		}
	}

	#[must_use]
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.x_min, self.y_min, self.x_max, self.y_max)
	}

	/// Validates ranges and ordering.
	#[context("invalid bounding box {:?}", self)]
	pub fn checked(self) -> Result<GeoBBox> {
		ensure!(self.x_min >= -180.0, "x_min ({}) must be >= -180", self.x_min);
		ensure!(self.y_min >= -90.0, "y_min ({}) must be >= -90", self.y_min);
		ensure!(self.x_max <= 180.0, "x_max ({}) must be <= 180", self.x_max);
		ensure!(self.y_max <= 90.0, "y_max ({}) must be <= 90", self.y_max);
		ensure!(
			self.x_min <= self.x_max,
			"x_min ({}) must be <= x_max ({})",
			self.x_min,
			self.x_max
		);
		ensure!(
			self.y_min <= self.y_max,
			"y_min ({}) must be <= y_max ({})",
			self.y_min,
			self.y_max
		);
		Ok(self)
	}
}

impl TryFrom<Vec<f64>> for GeoBBox {
	type Error = anyhow::Error;

	fn try_from(input: Vec<f64>) -> Result<Self> {
		if input.len() != 4 {
			bail!("bounding box must have exactly 4 values, got {}", input.len());
		}
		GeoBBox::new(input[0], input[1], input[2], input[3])
	}
}

impl FromStr for GeoBBox {
	type Err = anyhow::Error;

	/// Parses `lon_min,lat_min,lon_max,lat_max`. Commas, semicolons and spaces are accepted as separators.
	fn from_str(text: &str) -> Result<Self> {
		log::trace!("parsing bbox {text:?}");
		let values = text
			.split([' ', ',', ';'])
			.filter(|s| !s.is_empty())
			.map(|s| s.parse::<f64>())
			.collect::<Result<Vec<f64>, _>>()
			.map_err(|e| anyhow::anyhow!("bbox {text:?} contains a value that is not a number: {e}"))?;
		GeoBBox::try_from(values)
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoBBox({}, {}, {}, {})", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

impl Display for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("-10,-5,10,5", (-10.0, -5.0, 10.0, 5.0))]
	#[case("-10 -5 10 5", (-10.0, -5.0, 10.0, 5.0))]
	#[case(" 1; 2; 3; 4 ", (1.0, 2.0, 3.0, 4.0))]
	fn parse_ok(#[case] text: &str, #[case] expected: (f64, f64, f64, f64)) {
		assert_eq!(text.parse::<GeoBBox>().unwrap().as_tuple(), expected);
	}

	#[rstest]
	#[case("1,2,3")]
	#[case("a,b,c,d")]
	#[case("10,0,-10,1")]
	#[case("0,10,1,-10")]
	#[case("-181,0,0,1")]
	#[case("0,0,0,91")]
	fn parse_err(#[case] text: &str) {
		assert!(text.parse::<GeoBBox>().is_err());
	}

	#[test]
	fn error_has_context() {
		let err = GeoBBox::new(5.0, 0.0, 1.0, 1.0).unwrap_err();
		assert!(err.to_string().starts_with("invalid bounding box GeoBBox(5, 0, 1, 1)"));
		assert_eq!(err.root_cause().to_string(), "x_min (5) must be <= x_max (1)");
	}

	#[test]
	fn world_is_valid() {
		assert_eq!(GeoBBox::world().checked().unwrap().to_string(), "-180,-90,180,90");
	}
}
