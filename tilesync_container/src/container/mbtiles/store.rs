//! Tile access and metadata of a single MBTiles file.
//!
//! Rows are stored in TMS order, so `tile_row` equals [`TileCoord::y`]. Missing `type` and
//! `format` metadata entries read as `baselayer` and `png`. They are only written to new files
//! and to files opened for writing, so reading a file never modifies it.

use crate::{TileReaderTrait, TileWriterTrait};
use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use parking_lot::RwLock;
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OptionalExtension, params},
};
use std::{collections::BTreeMap, fmt, path::Path, time::Duration};
use tilesync_core::{Blob, GeoBBox, TileCoord, TileFormat};
use tilesync_derive::context;

const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// The metadata entries tilesync reads. Entries that are missing in the file stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MBTilesMetadata {
	pub name: Option<String>,
	pub kind: String,
	pub format: String,
	pub version: Option<String>,
	pub description: Option<String>,
	pub attribution: Option<String>,
	pub bounds: Option<GeoBBox>,
}

impl MBTilesMetadata {
	fn from_entries(mut entries: BTreeMap<String, String>) -> Result<MBTilesMetadata> {
		let bounds = match entries.remove("bounds") {
			Some(text) => Some(text.parse::<GeoBBox>()?),
			None => None,
		};
		Ok(MBTilesMetadata {
			name: entries.remove("name"),
			kind: entries.remove("type").unwrap_or_else(|| String::from("baselayer")),
			format: entries.remove("format").unwrap_or_else(|| String::from("png")),
			version: entries.remove("version"),
			description: entries.remove("description"),
			attribution: entries.remove("attribution"),
			bounds,
		})
	}
}

pub struct MBTilesStore {
	name: String,
	pool: Pool<SqliteConnectionManager>,
	format: TileFormat,
	metadata: RwLock<MBTilesMetadata>,
}

impl MBTilesStore {
	/// Opens the MBTiles file at `path`, creating it and its tables if needed.
	#[context("opening MBTiles '{}'", path.display())]
	pub fn open(path: &Path) -> Result<MBTilesStore> {
		log::debug!("open {path:?}");
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			ensure!(parent.is_dir(), "directory {parent:?} does not exist");
		}

		let manager = SqliteConnectionManager::file(path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
		let pool = Pool::builder().max_size(10).build(manager)?;

		let has_schema = has_schema(&pool)?;
		if !has_schema {
			log::debug!("create schema in {path:?}");
			pool.get()?.execute_batch(
				"CREATE TABLE IF NOT EXISTS metadata (name TEXT, value TEXT, UNIQUE (name));
				CREATE TABLE IF NOT EXISTS tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB, UNIQUE (zoom_level, tile_column, tile_row));
				CREATE UNIQUE INDEX IF NOT EXISTS tile_index ON tiles (zoom_level, tile_column, tile_row);",
			)?;
		}

		let metadata = MBTilesMetadata::from_entries(read_metadata(&pool)?)?;
		let format = TileFormat::try_from_str(&metadata.format)?;

		let store = MBTilesStore {
			name: path.to_string_lossy().to_string(),
			pool,
			format,
			metadata: RwLock::new(metadata),
		};
		if !has_schema {
			store.write_metadata_defaults()?;
		}
		Ok(store)
	}

	pub fn metadata(&self) -> MBTilesMetadata {
		self.metadata.read().clone()
	}

	/// Name of the single layer, empty if the file has no `name` entry.
	pub fn layer_name(&self) -> String {
		self.metadata.read().name.clone().unwrap_or_default()
	}

	/// Accepts `name` as layer name if it matches the stored one or no name is stored yet.
	/// In the second case `name` is written to the metadata table.
	pub(super) fn claim_layer_name(&self, name: &str) -> Result<bool> {
		self.write_metadata_defaults()?;
		let mut metadata = self.metadata.write();
		match metadata.name.as_deref() {
			Some(stored) if !stored.is_empty() => Ok(stored == name),
			_ => {
				self.set_metadata("name", name)?;
				metadata.name = Some(name.to_string());
				Ok(true)
			}
		}
	}

	#[context("setting metadata '{}' = '{}'", key, value)]
	pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
		self.pool.get()?.execute(
			"INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)",
			params![key, value],
		)?;
		Ok(())
	}

	/// Stores `type` and `format` unless the file already has them.
	fn write_metadata_defaults(&self) -> Result<()> {
		let conn = self.pool.get()?;
		let kind = self.metadata.read().kind.clone();
		for (key, value) in [("type", kind.as_str()), ("format", self.format.as_str())] {
			conn.execute(
				"INSERT OR IGNORE INTO metadata (name, value) VALUES (?1, ?2)",
				params![key, value],
			)?;
		}
		Ok(())
	}

	/// Number of stored tiles at `level`.
	pub fn count_tiles(&self, level: u8) -> Result<u64> {
		let count: i64 = self.pool.get()?.query_row(
			"SELECT COUNT(*) FROM tiles WHERE zoom_level = ?1",
			params![level],
			|row| row.get(0),
		)?;
		Ok(count as u64)
	}
}

fn has_schema(pool: &Pool<SqliteConnectionManager>) -> Result<bool> {
	let count: i64 = pool.get()?.query_row(
		"SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name IN ('metadata', 'tiles')",
		[],
		|row| row.get(0),
	)?;
	Ok(count == 2)
}

fn read_metadata(pool: &Pool<SqliteConnectionManager>) -> Result<BTreeMap<String, String>> {
	let conn = pool.get()?;
	let mut stmt = conn.prepare("SELECT name, value FROM metadata WHERE name IS NOT NULL AND value IS NOT NULL")?;
	let entries = stmt
		.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
		.collect::<Result<BTreeMap<_, _>, _>>()?;
	log::trace!("metadata: {entries:?}");
	Ok(entries)
}

#[async_trait]
impl TileReaderTrait for MBTilesStore {
	fn source_name(&self) -> &str {
		&self.name
	}

	fn tile_format(&self) -> TileFormat {
		self.format
	}

	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let conn = self.pool.get()?;
		let data = conn
			.query_row(
				"SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				params![coord.level, coord.x, coord.y],
				|row| row.get::<_, Vec<u8>>(0),
			)
			.optional()
			.with_context(|| format!("reading tile {coord} from '{}'", self.name))?;
		Ok(data.map(Blob::from))
	}

	async fn contains(&self, coord: &TileCoord) -> Result<bool> {
		let conn = self.pool.get()?;
		let found = conn
			.query_row(
				"SELECT 1 FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				params![coord.level, coord.x, coord.y],
				|_| Ok(()),
			)
			.optional()?;
		Ok(found.is_some())
	}
}

#[async_trait]
impl TileWriterTrait for MBTilesStore {
	async fn set_raw(&self, coord: &TileCoord, blob: Blob) -> Result<()> {
		self.pool
			.get()?
			.execute(
				"INSERT OR REPLACE INTO tiles (zoom_level, tile_column, tile_row, tile_data) VALUES (?1, ?2, ?3, ?4)",
				params![coord.level, coord.x, coord.y, blob.as_slice()],
			)
			.with_context(|| format!("writing tile {coord} to '{}'", self.name))?;
		Ok(())
	}

	async fn clear(&self, level: u8) -> Result<()> {
		let deleted = self
			.pool
			.get()?
			.execute("DELETE FROM tiles WHERE zoom_level = ?1", params![level])
			.with_context(|| format!("clearing level {level} of '{}'", self.name))?;
		log::debug!("deleted {deleted} tiles at level {level} of '{}'", self.name);
		Ok(())
	}
}

impl fmt::Debug for MBTilesStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MBTilesStore")
			.field("name", &self.name)
			.field("format", &self.format)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_fs::{NamedTempFile, TempDir};
	use pretty_assertions::assert_eq;
	use r2d2_sqlite::rusqlite::Connection;
	use tilesync_core::TileSyncError;

	#[tokio::test]
	async fn new_file_gets_defaults() -> Result<()> {
		let file = NamedTempFile::new("new.mbtiles")?;
		let store = MBTilesStore::open(file.path())?;
		assert_eq!(store.tile_format(), TileFormat::PNG);
		assert_eq!(
			store.metadata(),
			MBTilesMetadata {
				kind: String::from("baselayer"),
				format: String::from("png"),
				..Default::default()
			}
		);
		assert_eq!(read_metadata(&store.pool)?.get("format").map(String::as_str), Some("png"));
		Ok(())
	}

	#[tokio::test]
	async fn read_write_clear() -> Result<()> {
		let file = NamedTempFile::new("rw.mbtiles")?;
		let store = MBTilesStore::open(file.path())?;
		let a = TileCoord::new(3, 1, 2)?;
		let b = TileCoord::new(4, 1, 2)?;

		assert_eq!(store.get_raw(&a).await?, None);
		assert!(!store.contains(&a).await?);

		store.set_raw(&a, Blob::from("first")).await?;
		store.set_raw(&a, Blob::from("second")).await?;
		store.set_raw(&b, Blob::from("other")).await?;
		assert_eq!(store.get_raw(&a).await?, Some(Blob::from("second")));
		assert!(store.contains(&a).await?);
		assert_eq!(store.count_tiles(3)?, 1);

		store.clear(3).await?;
		assert!(!store.contains(&a).await?);
		assert!(store.contains(&b).await?);
		Ok(())
	}

	#[tokio::test]
	async fn existing_metadata_is_read() -> Result<()> {
		let file = NamedTempFile::new("meta.mbtiles")?;
		{
			let store = MBTilesStore::open(file.path())?;
			store.set_metadata("format", "jpg")?;
			store.set_metadata("name", "alps")?;
			store.set_metadata("bounds", "5.9,45.8,10.5,47.8")?;
			store.set_metadata("description", "test")?;
		}
		let store = MBTilesStore::open(file.path())?;
		assert_eq!(store.tile_format(), TileFormat::JPG);
		assert_eq!(store.layer_name(), "alps");
		let metadata = store.metadata();
		assert_eq!(metadata.description.as_deref(), Some("test"));
		assert_eq!(metadata.bounds.map(|b| b.as_tuple()), Some((5.9, 45.8, 10.5, 47.8)));
		assert_eq!(metadata.attribution, None);
		Ok(())
	}

	#[test]
	fn unsupported_format() -> Result<()> {
		let file = NamedTempFile::new("pbf.mbtiles")?;
		MBTilesStore::open(file.path())?.set_metadata("format", "pbf")?;
		let err = MBTilesStore::open(file.path()).unwrap_err();
		assert_eq!(
			err.downcast_ref::<TileSyncError>(),
			Some(&TileSyncError::UnsupportedFormat(String::from("pbf")))
		);
		Ok(())
	}

	#[test]
	fn missing_directory() {
		let dir = TempDir::new().unwrap();
		let err = MBTilesStore::open(&dir.path().join("nope/x.mbtiles")).unwrap_err();
		assert!(err.root_cause().to_string().ends_with("does not exist"));
	}

	/// A file with the schema but only a `name` entry, as written by other tools.
	fn create_foreign_file(path: &Path) -> Result<()> {
		let conn = Connection::open(path)?;
		conn.execute_batch(
			"CREATE TABLE metadata (name TEXT, value TEXT);
			CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER, tile_data BLOB);
			INSERT INTO metadata VALUES ('name', 'alps');
			INSERT INTO tiles VALUES (1, 0, 1, x'0102');",
		)?;
		Ok(())
	}

	fn metadata_rows(path: &Path) -> Result<Vec<(String, String)>> {
		let conn = Connection::open(path)?;
		let mut stmt = conn.prepare("SELECT name, value FROM metadata ORDER BY name")?;
		let rows = stmt
			.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
			.collect::<Result<Vec<_>, _>>()?;
		Ok(rows)
	}

	#[tokio::test]
	async fn reading_leaves_the_file_untouched() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("alps.mbtiles");
		create_foreign_file(&path)?;
		let before = std::fs::read(&path)?;

		let store = MBTilesStore::open(&path)?;
		assert_eq!(store.layer_name(), "alps");
		assert_eq!(store.tile_format(), TileFormat::PNG);
		assert_eq!(store.metadata().kind, "baselayer");
		assert_eq!(store.get_raw(&TileCoord::new(1, 0, 1)?).await?, Some(Blob::from(&[1u8, 2])));
		drop(store);

		assert_eq!(metadata_rows(&path)?, [(String::from("name"), String::from("alps"))]);
		assert_eq!(std::fs::read(&path)?, before);
		Ok(())
	}

	#[test]
	fn writing_stores_the_defaults() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("alps.mbtiles");
		create_foreign_file(&path)?;

		let store = MBTilesStore::open(&path)?;
		assert!(store.claim_layer_name("alps")?);
		drop(store);

		let rows = metadata_rows(&path)?;
		let keys: Vec<&str> = rows.iter().map(|(key, _)| key.as_str()).collect();
		assert_eq!(keys, ["format", "name", "type"]);
		Ok(())
	}

	#[tokio::test]
	async fn claim_name() -> Result<()> {
		let file = NamedTempFile::new("claim.mbtiles")?;
		let store = MBTilesStore::open(file.path())?;
		assert!(store.claim_layer_name("data")?);
		assert!(store.claim_layer_name("data")?);
		assert!(!store.claim_layer_name("other")?);
		assert_eq!(store.layer_name(), "data");
		Ok(())
	}
}
