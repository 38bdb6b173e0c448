use axum::{
	body::Body,
	extract::State,
	http::{StatusCode, Uri, header},
	response::{Html, IntoResponse, Response},
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tilesync_container::TileReaderTrait;
use tilesync_core::{Blob, TileCoord, TileFormat};

static TILE_PATH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A/.*/(\d+)/(\d+)/(\d+)\.(png|jpeg)\z").unwrap());

const INDEX_PAGE: &str = include_str!("index.html");

#[derive(Clone)]
pub struct TileHandlerState {
	pub reader: Arc<dyn TileReaderTrait>,
	pub zero_is_top: bool,
	pub placeholder: Blob,
}

/// Extracts the tile address from `…/level/x/y.png` or `…/level/x/y.jpeg`.
///
/// With `zero_is_top` the requested row counts from the top and is flipped. Returns `None`
/// for paths that do not match or addresses outside the pyramid.
pub fn parse_tile_path(path: &str, zero_is_top: bool) -> Option<TileCoord> {
	let captures = TILE_PATH.captures(path)?;
	let level = captures[1].parse::<u8>().ok()?;
	let x = captures[2].parse::<u32>().ok()?;
	let y = captures[3].parse::<u32>().ok()?;
	let coord = TileCoord::new(level, x, y).ok()?;
	Some(if zero_is_top { coord.flip_y() } else { coord })
}

pub async fn serve_tile(uri: Uri, State(state): State<TileHandlerState>) -> Response<Body> {
	let path = uri.path();
	let Some(coord) = parse_tile_path(path, state.zero_is_top) else {
		log::debug!("invalid tile path: {path}");
		return error_404();
	};

	match state.reader.get_raw(&coord).await {
		Ok(Some(blob)) => {
			log::debug!("send tile {coord}");
			ok_tile(blob, state.reader.tile_format())
		}
		Ok(None) => {
			log::debug!("tile {coord} not found, send placeholder");
			ok_tile(state.placeholder.clone(), TileFormat::PNG)
		}
		Err(err) => {
			log::warn!("send 500 for tile {coord}: {err:#}");
			error_500()
		}
	}
}

pub async fn serve_index(State(state): State<TileHandlerState>) -> Html<String> {
	let format = state.reader.tile_format();
	let row = if state.zero_is_top { "{y}" } else { "{-y}" };
	let extension = match format {
		TileFormat::PNG => "png",
		TileFormat::JPG => "jpeg",
	};
	Html(
		INDEX_PAGE
			.replace("{name}", state.reader.source_name())
			.replace("{row}", row)
			.replace("{extension}", extension),
	)
}

fn ok_tile(blob: Blob, format: TileFormat) -> Response<Body> {
	([(header::CONTENT_TYPE, format.as_mime_str())], blob.into_vec()).into_response()
}

fn error_404() -> Response<Body> {
	(StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn error_500() -> Response<Body> {
	(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
