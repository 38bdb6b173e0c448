//! Raster decoding and encoding for png and jpg tiles, and the [`Transcoder`] that converts
//! tiles between the two.

pub mod format;
pub use format::{decode, encode};

mod helper;
pub use helper::*;

mod transcoder;
pub use transcoder::Transcoder;
