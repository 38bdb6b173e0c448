//! Polygons from GeoJSON documents.
//!
//! A document may be a bare `Polygon` or `MultiPolygon` geometry, a `Feature`, or a
//! `FeatureCollection`. All polygons found are collected into one [`MultiPolygon`]. Other
//! geometry types are rejected. Positions may carry an altitude, which is ignored.

use anyhow::{Context, Result, anyhow, ensure};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;

type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Document {
	FeatureCollection { features: Vec<Feature> },
	Feature(Feature),
	Polygon { coordinates: Vec<Ring> },
	MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

#[derive(Debug, Deserialize)]
struct Feature {
	geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
	Polygon { coordinates: Vec<Ring> },
	MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

/// Parses `json` and collects all of its polygons.
pub fn parse_geojson(json: &str) -> Result<MultiPolygon<f64>> {
	let document: Document = serde_json::from_str(json)
		.context("GeoJSON must be a Polygon, MultiPolygon, Feature or FeatureCollection of polygons")?;

	let geometries = match document {
		Document::FeatureCollection { features } => features.into_iter().filter_map(|f| f.geometry).collect(),
		Document::Feature(feature) => feature.geometry.into_iter().collect(),
		Document::Polygon { coordinates } => vec![Geometry::Polygon { coordinates }],
		Document::MultiPolygon { coordinates } => vec![Geometry::MultiPolygon { coordinates }],
	};

	let mut polygons = Vec::new();
	for geometry in geometries {
		match geometry {
			Geometry::Polygon { coordinates } => polygons.push(to_polygon(coordinates)?),
			Geometry::MultiPolygon { coordinates } => {
				for polygon in coordinates {
					polygons.push(to_polygon(polygon)?);
				}
			}
		}
	}
	ensure!(!polygons.is_empty(), "GeoJSON contains no polygons");
	log::trace!("parsed {} polygons from GeoJSON", polygons.len());
	Ok(MultiPolygon::new(polygons))
}

fn to_polygon(rings: Vec<Ring>) -> Result<Polygon<f64>> {
	let mut rings = rings.into_iter().map(to_ring);
	let exterior = rings.next().ok_or_else(|| anyhow!("polygon has no rings"))??;
	Ok(Polygon::new(exterior, rings.collect::<Result<_>>()?))
}

fn to_ring(points: Ring) -> Result<LineString<f64>> {
	ensure!(points.len() >= 4, "a ring needs at least 4 positions, found {}", points.len());
	let coords = points.iter().map(|p| to_coord(p)).collect::<Result<Vec<_>>>()?;
	ensure!(coords.first() == coords.last(), "ring is not closed");
	Ok(LineString::new(coords))
}

fn to_coord(position: &[f64]) -> Result<Coord<f64>> {
	match position {
		[x, y, ..] => Ok(Coord { x: *x, y: *y }),
		_ => Err(anyhow!("a position needs at least 2 values, found {position:?}")),
	}
}
