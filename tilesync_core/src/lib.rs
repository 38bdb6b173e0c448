//! Core types of tilesync: tile addresses, tile blocks, bounding boxes, tile formats,
//! the Web Mercator transform, error kinds, tile filters and progress reporting.

mod error;
pub use error::*;

pub mod filter;

pub mod mercator;

pub mod progress;

pub mod types;
pub use types::*;
