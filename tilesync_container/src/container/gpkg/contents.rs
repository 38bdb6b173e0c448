use anyhow::Result;
use r2d2_sqlite::rusqlite::{Connection, Row};

/// One row of `gpkg_contents`.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPackageContents {
	pub table_name: String,
	pub data_type: String,
	pub identifier: Option<String>,
	pub description: Option<String>,
	pub last_change: Option<String>,
	pub min_x: Option<f64>,
	pub min_y: Option<f64>,
	pub max_x: Option<f64>,
	pub max_y: Option<f64>,
	pub srs_id: Option<i64>,
}

impl GeoPackageContents {
	pub(super) fn list(conn: &Connection) -> Result<Vec<GeoPackageContents>> {
		let mut stmt = conn.prepare(
			"SELECT table_name, data_type, identifier, description, last_change, min_x, min_y, max_x, max_y, srs_id
			FROM gpkg_contents ORDER BY table_name",
		)?;
		let rows = stmt.query_map([], Self::from_row)?;
		Ok(rows.collect::<Result<Vec<_>, _>>()?)
	}

	fn from_row(row: &Row) -> r2d2_sqlite::rusqlite::Result<GeoPackageContents> {
		Ok(GeoPackageContents {
			table_name: row.get(0)?,
			data_type: row.get(1)?,
			identifier: row.get(2)?,
			description: row.get(3)?,
			last_change: row.get(4)?,
			min_x: row.get(5)?,
			min_y: row.get(6)?,
			max_x: row.get(7)?,
			max_y: row.get(8)?,
			srs_id: row.get(9)?,
		})
	}
}

/// One row of `gpkg_tile_matrix_set`. Bounds are in the units of `srs_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMatrixSet {
	pub table_name: String,
	pub srs_id: i64,
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl TileMatrixSet {
	pub(super) fn list(conn: &Connection) -> Result<Vec<TileMatrixSet>> {
		let mut stmt = conn.prepare(
			"SELECT table_name, srs_id, min_x, min_y, max_x, max_y FROM gpkg_tile_matrix_set ORDER BY table_name",
		)?;
		let rows = stmt.query_map([], |row| {
			Ok(TileMatrixSet {
				table_name: row.get(0)?,
				srs_id: row.get(1)?,
				min_x: row.get(2)?,
				min_y: row.get(3)?,
				max_x: row.get(4)?,
				max_y: row.get(5)?,
			})
		})?;
		Ok(rows.collect::<Result<Vec<_>, _>>()?)
	}
}
