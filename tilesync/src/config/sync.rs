use super::SourceConfig;
use serde::Deserialize;
use std::path::Path;

/// Parameters of a `sync` run. Missing values fall back to the command line defaults.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
	#[serde(default)]
	pub destination: SourceConfig,

	pub min_level: Option<u8>,

	pub max_level: Option<u8>,

	/// Area of interest: inline WKT or GeoJSON, or a path to a file holding either.
	pub aoi: Option<String>,

	/// `lon_min,lat_min,lon_max,lat_max`, used instead of `aoi`.
	pub bbox: Option<String>,

	/// Clear every level before copying and overwrite existing tiles.
	pub replace: Option<bool>,
}

impl SyncConfig {
	pub fn resolve_paths(&mut self, base: &Path) {
		self.destination.resolve_paths(base);
		if let Some(aoi) = &self.aoi
			&& base.join(aoi).is_file()
		{
			self.aoi = Some(base.join(aoi).to_string_lossy().to_string());
		}
	}
}
