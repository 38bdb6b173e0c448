use super::handlers::{TileHandlerState, serve_index, serve_tile};
use crate::config::ServerConfig;
use anyhow::Result;
use axum::{Router, routing::get};
use std::sync::Arc;
use tilesync_container::TileReaderTrait;
use tilesync_core::TileFormat;
use tilesync_derive::context;
use tilesync_image::{encode, solid_image};
use tokio::sync::oneshot::Sender;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8085;

/// Colour of the tile served for missing tiles.
const PLACEHOLDER_COLOR: [u8; 4] = [96, 96, 96, 255];

pub struct TileServer {
	ip: String,
	port: u16,
	bound_port: Option<u16>,
	reader: Arc<dyn TileReaderTrait>,
	zero_is_top: bool,
	exit_signal: Option<Sender<()>>,
}

impl TileServer {
	pub fn new(ip: &str, port: u16, reader: Arc<dyn TileReaderTrait>, zero_is_top: bool) -> TileServer {
		TileServer {
			ip: ip.to_owned(),
			port,
			bound_port: None,
			reader,
			zero_is_top,
			exit_signal: None,
		}
	}

	pub fn from_config(config: &ServerConfig, reader: Arc<dyn TileReaderTrait>) -> TileServer {
		TileServer::new(
			config.ip.as_deref().unwrap_or(DEFAULT_IP),
			config.port.unwrap_or(DEFAULT_PORT),
			reader,
			config.zero_is_top.unwrap_or(false),
		)
	}

	/// The listening port. With port 0 this is the port picked by the OS once the server runs.
	pub fn port(&self) -> u16 {
		self.bound_port.unwrap_or(self.port)
	}

	pub fn is_running(&self) -> bool {
		self.exit_signal.is_some()
	}

	#[context("starting tile server on {}:{}", self.ip, self.port)]
	pub async fn start(&mut self) -> Result<()> {
		if self.is_running() {
			self.stop().await;
		}

		log::info!("starting server");

		let state = TileHandlerState {
			reader: self.reader.clone(),
			zero_is_top: self.zero_is_top,
			placeholder: encode(&solid_image(256, 256, PLACEHOLDER_COLOR), TileFormat::PNG)?,
		};

		let router = Router::new()
			.route("/status", get(|| async { "ready!" }))
			.route("/tiles/{*path}", get(serve_tile))
			.route("/", get(serve_index))
			.with_state(state);

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = tokio::net::TcpListener::bind(&addr).await?;
		let port = listener.local_addr()?.port();
		self.bound_port = Some(port);
		log::info!("server listening on {}:{port}", self.ip);

		let (tx, rx) = tokio::sync::oneshot::channel::<()>();

		tokio::spawn(async move {
			let served = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await;
			if let Err(err) = served {
				log::error!("server stopped with error: {err}");
			}
		});

		self.exit_signal = Some(tx);

		Ok(())
	}

	pub async fn stop(&mut self) {
		let Some(exit_signal) = self.exit_signal.take() else {
			return;
		};
		log::info!("stopping server");
		self.bound_port = None;
		if exit_signal.send(()).is_err() {
			log::warn!("server was already stopped");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::bail;
	use async_trait::async_trait;
	use pretty_assertions::assert_eq;
	use tilesync_container::MockTileStore;
	use tilesync_core::{Blob, TileCoord};

	#[derive(Debug)]
	struct BrokenReader;

	#[async_trait]
	impl TileReaderTrait for BrokenReader {
		fn source_name(&self) -> &str {
			"broken"
		}

		fn tile_format(&self) -> TileFormat {
			TileFormat::JPG
		}

		async fn get_raw(&self, _coord: &TileCoord) -> Result<Option<Blob>> {
			bail!("disk on fire")
		}

		async fn contains(&self, _coord: &TileCoord) -> Result<bool> {
			Ok(false)
		}
	}

	async fn start(reader: Arc<dyn TileReaderTrait>, zero_is_top: bool) -> TileServer {
		let mut server = TileServer::new("127.0.0.1", 0, reader, zero_is_top);
		server.start().await.unwrap();
		server
	}

	async fn get(server: &TileServer, path: &str) -> (u16, String, Vec<u8>) {
		let response = reqwest::get(format!("http://127.0.0.1:{}{path}", server.port()))
			.await
			.unwrap();
		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get("content-type")
			.map(|v| v.to_str().unwrap().to_string())
			.unwrap_or_default();
		(status, content_type, response.bytes().await.unwrap().to_vec())
	}

	fn store() -> Arc<MockTileStore> {
		Arc::new(MockTileStore::new_png("berlin").with_tiles([TileCoord::new(2, 1, 0).unwrap()], &Blob::from("tile")))
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn serves_tiles_and_placeholders() {
		let mut server = start(store(), false).await;

		assert_eq!(get(&server, "/tiles/2/1/0.png").await, (200, "image/png".into(), b"tile".to_vec()));
		assert_eq!(get(&server, "/tiles/some/prefix/2/1/0.jpeg").await.2, b"tile");

		let (status, content_type, body) = get(&server, "/tiles/2/1/1.png").await;
		assert_eq!((status, content_type.as_str()), (200, "image/png"));
		let placeholder = tilesync_image::decode(&Blob::from(body), TileFormat::PNG).unwrap();
		assert_eq!((placeholder.width(), placeholder.height()), (256, 256));
		assert_eq!(placeholder.to_rgba8().get_pixel(17, 200).0, PLACEHOLDER_COLOR);

		assert_eq!(get(&server, "/tiles/2/4/0.png").await.0, 404);
		assert_eq!(get(&server, "/tiles/2/1/0.gif").await.0, 404);
		assert_eq!(get(&server, "/tiles/0.png").await.0, 404);
		assert_eq!(get(&server, "/status").await.2, b"ready!");

		server.stop().await;
		assert!(!server.is_running());
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn zero_is_top_flips_rows() {
		let mut server = start(store(), true).await;
		assert_eq!(get(&server, "/tiles/2/1/3.png").await.2, b"tile");
		let page = String::from_utf8(get(&server, "/").await.2).unwrap();
		assert!(page.contains("/tiles/{z}/{x}/{y}.png"), "{page}");
		assert!(page.contains("<title>berlin - tilesync</title>"));
		server.stop().await;
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn store_errors_are_500() {
		let mut server = start(Arc::new(BrokenReader), false).await;
		assert_eq!(get(&server, "/tiles/0/0/0.jpeg").await.0, 500);
		let page = String::from_utf8(get(&server, "/").await.2).unwrap();
		assert!(page.contains("/tiles/{z}/{x}/{-y}.jpeg"));
		server.stop().await;
	}

	#[tokio::test(flavor = "multi_thread")]
	async fn restart() {
		let mut server = start(store(), false).await;
		server.start().await.unwrap();
		assert!(server.is_running());
		assert_eq!(get(&server, "/status").await.0, 200);
		server.stop().await;
		server.stop().await;
	}

	#[test]
	fn from_config_defaults() {
		let server = TileServer::from_config(&ServerConfig::default(), store());
		assert_eq!((server.ip.as_str(), server.port()), (DEFAULT_IP, DEFAULT_PORT));
		assert!(!server.zero_is_top);
	}
}
