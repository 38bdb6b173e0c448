use crate::{decode, encode};
use anyhow::Result;
use std::fmt::{self, Debug};
use tilesync_core::{Blob, TileFormat};

/// Converts tiles from one format to another.
///
/// Built once per copy job. When both formats are equal the bytes pass through untouched,
/// otherwise each tile is decoded with the source decoder and re-encoded with the
/// destination encoder.
///
/// ```
/// use tilesync_core::{Blob, TileFormat};
/// use tilesync_image::Transcoder;
///
/// let transcoder = Transcoder::new(TileFormat::PNG, TileFormat::PNG);
/// assert!(transcoder.is_passthrough());
/// let blob = Blob::from("any bytes");
/// assert_eq!(transcoder.run(blob.clone()).unwrap(), blob);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Transcoder {
	Passthrough,
	Reencode { from: TileFormat, to: TileFormat },
}

impl Transcoder {
	pub fn new(from: TileFormat, to: TileFormat) -> Transcoder {
		if from == to {
			Transcoder::Passthrough
		} else {
			Transcoder::Reencode { from, to }
		}
	}

	pub fn is_passthrough(&self) -> bool {
		matches!(self, Transcoder::Passthrough)
	}

	pub fn run(&self, blob: Blob) -> Result<Blob> {
		match self {
			Transcoder::Passthrough => Ok(blob),
			Transcoder::Reencode { from, to } => {
				log::trace!("transcode {} bytes from {from} to {to}", blob.len());
				encode(&decode(&blob, *from)?, *to)
			}
		}
	}
}

impl Debug for Transcoder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Transcoder::Passthrough => write!(f, "Transcoder(passthrough)"),
			Transcoder::Reencode { from, to } => write!(f, "Transcoder({from} -> {to})"),
		}
	}
}
