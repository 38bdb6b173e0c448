//! Terminal progress reporting for long-running copy jobs.
//!
//! ```rust
//! use tilesync_core::progress::get_progress_bar;
//!
//! let progress = get_progress_bar("copying level 3", 64);
//! progress.inc(10);
//! progress.finish();
//! ```

mod progress_bar;
pub use progress_bar::ProgressBar;

/// Creates a progress bar that draws to stderr when stderr is a terminal.
#[must_use]
pub fn get_progress_bar(message: &str, max_value: u64) -> ProgressBar {
	ProgressBar::new(message, max_value)
}
