//! Read-only access to the tile tables of a GeoPackage.
//!
//! Every `gpkg_tile_matrix_set` entry is a layer. GeoPackage counts tile rows from the top,
//! so rows are flipped on every lookup. The tile format of a layer is sniffed from its first
//! tile and defaults to jpg for empty tables.

mod contents;
pub use contents::{GeoPackageContents, TileMatrixSet};

use crate::{TileDriverTrait, TileReaderTrait, TileSourceTrait};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension, params},
};
use std::{fmt, path::Path, sync::Arc};
use tilesync_core::{Blob, TileCoord, TileFormat, TileSyncError};
use tilesync_derive::context;

/// Opens `*.gpkg` files.
#[derive(Debug)]
pub struct GeoPackageDriver;

#[async_trait]
impl TileDriverTrait for GeoPackageDriver {
	fn can_open(&self, location: &str) -> bool {
		Path::new(location).extension().is_some_and(|ext| ext == "gpkg")
	}

	async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		Ok(Box::new(GeoPackageSource::open(Path::new(location))?))
	}
}

pub struct GeoPackageSource {
	name: String,
	pool: Pool<SqliteConnectionManager>,
}

impl GeoPackageSource {
	#[context("opening GeoPackage '{}'", path.display())]
	pub fn open(path: &Path) -> Result<GeoPackageSource> {
		log::debug!("open {path:?}");
		ensure!(path.is_file(), "file {path:?} does not exist");

		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder().max_size(10).build(manager)?;

		Ok(GeoPackageSource {
			name: path.to_string_lossy().to_string(),
			pool,
		})
	}

	/// All rows of `gpkg_contents`.
	#[context("listing contents of '{}'", self.name)]
	pub fn contents(&self) -> Result<Vec<GeoPackageContents>> {
		GeoPackageContents::list(&*self.pool.get()?)
	}

	/// All rows of `gpkg_tile_matrix_set`.
	#[context("listing tile matrix sets of '{}'", self.name)]
	pub fn tile_matrix_sets(&self) -> Result<Vec<TileMatrixSet>> {
		TileMatrixSet::list(&*self.pool.get()?)
	}
}

#[async_trait]
impl TileSourceTrait for GeoPackageSource {
	async fn list_layers(&self) -> Result<Vec<String>> {
		Ok(self.tile_matrix_sets()?.into_iter().map(|set| set.table_name).collect())
	}

	async fn open_layer(&self, name: &str) -> Result<Arc<dyn TileReaderTrait>> {
		if !self.list_layers().await?.iter().any(|layer| layer == name) {
			return Err(TileSyncError::LayerNotFound(format!("{name} in {}", self.name)).into());
		}
		Ok(Arc::new(GeoPackageLayer::open(&self.name, self.pool.clone(), name)?))
	}
}

impl fmt::Debug for GeoPackageSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GeoPackageSource").field("name", &self.name).finish()
	}
}

/// One tile table of a GeoPackage.
pub struct GeoPackageLayer {
	name: String,
	pool: Pool<SqliteConnectionManager>,
	format: TileFormat,
	sql_select: String,
	sql_contains: String,
}

impl GeoPackageLayer {
	/// `table` must be a known tile table, it is quoted but not otherwise checked.
	fn open(source_name: &str, pool: Pool<SqliteConnectionManager>, table: &str) -> Result<GeoPackageLayer> {
		let quoted = format!("\"{}\"", table.replace('"', "\"\""));
		let first: Option<Vec<u8>> = pool
			.get()?
			.query_row(&format!("SELECT tile_data FROM {quoted} LIMIT 1"), [], |row| row.get(0))
			.optional()
			.with_context(|| format!("reading first tile of table '{table}'"))?;
		let format = first
			.and_then(|data| TileFormat::sniff(&data))
			.unwrap_or(TileFormat::JPG);
		log::debug!("layer '{table}' of '{source_name}' has format {format}");

		let filter = "WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3";
		Ok(GeoPackageLayer {
			name: format!("{source_name}:{table}"),
			pool,
			format,
			sql_select: format!("SELECT tile_data FROM {quoted} {filter}"),
			sql_contains: format!("SELECT COUNT(*) FROM {quoted} {filter}"),
		})
	}
}

#[async_trait]
impl TileReaderTrait for GeoPackageLayer {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn tile_format(&self) -> TileFormat {
		self.format
	}

	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		// gpkg rows count from the top. Assumes each tile matrix covers the whole world with 2^level rows.
		let row = coord.flip_y();
		let data = self
			.pool
			.get()?
			.query_row(&self.sql_select, params![row.level, row.x, row.y], |row| {
				row.get::<_, Vec<u8>>(0)
			})
			.optional()
			.with_context(|| format!("reading tile {coord} from '{}'", self.name))?;
		Ok(data.map(Blob::from))
	}

	async fn contains(&self, coord: &TileCoord) -> Result<bool> {
		let row = coord.flip_y();
		let count: i64 = self
			.pool
			.get()?
			.query_row(&self.sql_contains, params![row.level, row.x, row.y], |row| row.get(0))?;
		Ok(count > 0)
	}
}

impl fmt::Debug for GeoPackageLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GeoPackageLayer")
			.field("name", &self.name)
			.field("format", &self.format)
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use assert_fs::TempDir;
	use pretty_assertions::assert_eq;
	use r2d2_sqlite::rusqlite::Connection;
	use std::path::PathBuf;
	use tilesync_image::{encode, solid_image};

	/// Creates a GeoPackage with a png table `relief` (tile 2/1/0 in TMS rows) and an empty table `empty`.
	pub(crate) fn create_fixture(dir: &TempDir) -> PathBuf {
		let path = dir.path().join("fixture.gpkg");
		let conn = Connection::open(&path).unwrap();
		conn.execute_batch(
			"CREATE TABLE gpkg_contents (table_name TEXT PRIMARY KEY, data_type TEXT NOT NULL, identifier TEXT, description TEXT DEFAULT '', last_change TEXT, min_x DOUBLE, min_y DOUBLE, max_x DOUBLE, max_y DOUBLE, srs_id INTEGER);
			CREATE TABLE gpkg_tile_matrix_set (table_name TEXT PRIMARY KEY, srs_id INTEGER NOT NULL, min_x DOUBLE NOT NULL, min_y DOUBLE NOT NULL, max_x DOUBLE NOT NULL, max_y DOUBLE NOT NULL);
			CREATE TABLE relief (id INTEGER PRIMARY KEY AUTOINCREMENT, zoom_level INTEGER NOT NULL, tile_column INTEGER NOT NULL, tile_row INTEGER NOT NULL, tile_data BLOB NOT NULL, UNIQUE (zoom_level, tile_column, tile_row));
			CREATE TABLE empty (id INTEGER PRIMARY KEY AUTOINCREMENT, zoom_level INTEGER NOT NULL, tile_column INTEGER NOT NULL, tile_row INTEGER NOT NULL, tile_data BLOB NOT NULL);
			INSERT INTO gpkg_contents (table_name, data_type, identifier, min_x, min_y, max_x, max_y, srs_id) VALUES ('relief', 'tiles', 'Relief', -180, -85, 180, 85, 3857);
			INSERT INTO gpkg_contents (table_name, data_type) VALUES ('empty', 'tiles');
			INSERT INTO gpkg_tile_matrix_set VALUES ('relief', 3857, -20037508.34, -20037508.34, 20037508.34, 20037508.34);
			INSERT INTO gpkg_tile_matrix_set VALUES ('empty', 3857, -20037508.34, -20037508.34, 20037508.34, 20037508.34);",
		)
		.unwrap();
		let png = encode(&solid_image(4, 4, [10, 20, 30, 255]), TileFormat::PNG).unwrap();
		// TMS row 0 at level 2 is GeoPackage row 3
		conn.execute(
			"INSERT INTO relief (zoom_level, tile_column, tile_row, tile_data) VALUES (2, 1, 3, ?1)",
			params![png.as_slice()],
		)
		.unwrap();
		path
	}

	#[tokio::test]
	async fn layers_and_tiles() -> Result<()> {
		let dir = TempDir::new()?;
		let source = GeoPackageDriver
			.open_tile_source(create_fixture(&dir).to_str().unwrap())
			.await?;
		assert_eq!(source.list_layers().await?, ["empty", "relief"]);
		assert!(source.as_writable().is_none());

		let layer = source.open_layer("relief").await?;
		assert_eq!(layer.tile_format(), TileFormat::PNG);
		let coord = TileCoord::new(2, 1, 0)?;
		assert!(layer.contains(&coord).await?);
		assert!(layer.get_raw(&coord).await?.is_some());
		assert!(!layer.contains(&coord.flip_y()).await?);
		assert_eq!(layer.get_raw(&coord.flip_y()).await?, None);

		let empty = source.open_layer("empty").await?;
		assert_eq!(empty.tile_format(), TileFormat::JPG);
		Ok(())
	}

	#[tokio::test]
	async fn unknown_layer() -> Result<()> {
		let dir = TempDir::new()?;
		let source = GeoPackageSource::open(&create_fixture(&dir))?;
		let err = source.open_layer("relief\"; DROP TABLE relief; --").await.unwrap_err();
		assert!(matches!(
			err.downcast_ref::<TileSyncError>(),
			Some(TileSyncError::LayerNotFound(_))
		));
		Ok(())
	}

	#[test]
	fn missing_file() {
		assert!(GeoPackageSource::open(Path::new("/does/not/exist.gpkg")).is_err());
	}

	#[rstest::rstest]
	#[case("a.gpkg", true)]
	#[case("a.GPKG", false)]
	#[case("a.mbtiles", false)]
	fn can_open(#[case] location: &str, #[case] expected: bool) {
		assert_eq!(GeoPackageDriver.can_open(location), expected);
	}
}
