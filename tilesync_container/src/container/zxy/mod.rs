//! Read-only access to remote tile servers addressed by a URL template.
//!
//! The template holds three `%d` slots that take level, column and row in that order. Rows
//! are sent in OSM order (row 0 at the top).
//!
//! ```
//! use tilesync_container::{TileReaderTrait, ZxyServer};
//! use tilesync_core::{TileCoord, TileFormat};
//! use std::time::Duration;
//!
//! let server = ZxyServer::new("https://tiles.example.org/%d/%d/%d.jpg", Duration::from_secs(5)).unwrap();
//! assert_eq!(server.tile_format(), TileFormat::JPG);
//! assert_eq!(
//! 	server.get_url(&TileCoord::new(3, 4, 5).unwrap()),
//! 	"https://tiles.example.org/3/4/2.jpg"
//! );
//! ```

use crate::{TileDriverTrait, TileReaderTrait, TileSourceTrait};
use anyhow::{Context, Result, bail, ensure};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::{sync::Arc, time::Duration};
use tilesync_core::{Blob, TileCoord, TileFormat};
use tilesync_derive::context;

const SLOT: &str = "%d";

/// Opens `http(s)` URL templates with exactly three `%d` slots.
#[derive(Debug)]
pub struct ZxyDriver {
	timeout: Duration,
}

impl ZxyDriver {
	pub fn new(timeout: Duration) -> ZxyDriver {
		ZxyDriver { timeout }
	}
}

#[async_trait]
impl TileDriverTrait for ZxyDriver {
	fn can_open(&self, location: &str) -> bool {
		location.starts_with("http") && location.matches(SLOT).count() == 3
	}

	async fn open_tile_source(&self, location: &str) -> Result<Box<dyn TileSourceTrait>> {
		Ok(Box::new(ZxySource {
			server: Arc::new(ZxyServer::new(location, self.timeout)?),
		}))
	}
}

/// The single-layer source around a [`ZxyServer`]. Any layer name opens the server.
#[derive(Debug)]
pub struct ZxySource {
	server: Arc<ZxyServer>,
}

#[async_trait]
impl TileSourceTrait for ZxySource {
	async fn list_layers(&self) -> Result<Vec<String>> {
		Ok(vec![self.server.url.clone()])
	}

	async fn open_layer(&self, _name: &str) -> Result<Arc<dyn TileReaderTrait>> {
		Ok(self.server.clone())
	}
}

#[derive(Debug)]
pub struct ZxyServer {
	url: String,
	client: Client,
	format: TileFormat,
}

impl ZxyServer {
	#[context("creating tile server client for '{url}'")]
	pub fn new(url: &str, timeout: Duration) -> Result<ZxyServer> {
		ensure!(
			url.matches(SLOT).count() == 3,
			"URL template must contain exactly three '{SLOT}'"
		);
		let client = Client::builder().timeout(timeout).build()?;
		Ok(ZxyServer {
			url: url.to_string(),
			client,
			format: format_from_url(url),
		})
	}

	/// The tile URL, with the row flipped to OSM order.
	pub fn get_url(&self, coord: &TileCoord) -> String {
		let osm = coord.flip_y();
		let mut url = self.url.clone();
		for value in [u32::from(osm.level), osm.x, osm.y] {
			url = url.replacen(SLOT, &value.to_string(), 1);
		}
		url
	}
}

fn format_from_url(url: &str) -> TileFormat {
	let path = url.split(['?', '#']).next().unwrap_or(url);
	path
		.rsplit_once('.')
		.and_then(|(_, ext)| TileFormat::try_from_str(ext).ok())
		.unwrap_or(TileFormat::PNG)
}

#[async_trait]
impl TileReaderTrait for ZxyServer {
	fn source_name(&self) -> &str {
		&self.url
	}

	fn tile_format(&self) -> TileFormat {
		self.format
	}

	async fn get_raw(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let url = self.get_url(coord);
		log::trace!("GET {url}");
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.with_context(|| format!("requesting {url}"))?;
		let status = response.status();
		if status == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !status.is_success() {
			bail!("request {url} failed with status {status}");
		}
		let bytes = response.bytes().await.with_context(|| format!("reading body of {url}"))?;
		Ok(Some(Blob::from(bytes.to_vec())))
	}

	async fn contains(&self, coord: &TileCoord) -> Result<bool> {
		let url = self.get_url(coord);
		log::trace!("HEAD {url}");
		let response = self
			.client
			.head(&url)
			.send()
			.await
			.with_context(|| format!("requesting {url}"))?;
		Ok(response.status().is_success())
	}
}
