use super::{ServerConfig, SourceConfig, SyncConfig};
use anyhow::Result;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
	time::Duration,
};
use tilesync_container::DEFAULT_HTTP_TIMEOUT;
use tilesync_derive::context;

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// The store tiles are read from
	#[serde(default)]
	pub source: SourceConfig,

	/// Destination and extent of a sync
	#[serde(default)]
	pub sync: SyncConfig,

	/// Request timeout of the zxy driver. Default: 30
	pub http_timeout_seconds: Option<u64>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a file and resolves relative paths against the file's directory.
	#[context("reading config file {:?}", path)]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		let mut config = Config::from_reader(BufReader::new(file))?;
		if let Some(base) = path.parent() {
			config.resolve_paths(base);
		}
		Ok(config)
	}

	/// Reads `path` if given, otherwise returns the defaults.
	pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
		path.map_or_else(|| Ok(Config::default()), Config::from_path)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		self.source.resolve_paths(base);
		self.sync.resolve_paths(base);
	}

	pub fn http_timeout(&self) -> Duration {
		self.http_timeout_seconds.map_or(DEFAULT_HTTP_TIMEOUT, Duration::from_secs)
	}
}
