//! A small stderr progress bar: message, bar, `pos/len`, percentage, rate and ETA.
//!
//! Drawing is skipped when stderr is not a terminal or the `test` feature is enabled, so
//! the counters still work in pipelines and test runs.

use parking_lot::Mutex;
use std::{
	fmt::Write as _,
	io::{self, IsTerminal, Write},
	sync::Arc,
	time::{Duration, Instant},
};

const BAR_WIDTH: usize = 30;
const MIN_REDRAW_INTERVAL: Duration = Duration::from_millis(100);

struct State {
	message: String,
	len: u64,
	pos: u64,
	start: Instant,
	last_draw: Option<Instant>,
	visible: bool,
}

impl State {
	fn render(&self) -> String {
		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let secs = self.start.elapsed().as_secs_f64();
		let per_sec = if secs > 0.0 { pos as f64 / secs } else { 0.0 };
		let eta = if per_sec > 0.0 {
			Duration::from_secs_f64((len - pos) as f64 / per_sec)
		} else {
			Duration::ZERO
		};

		let filled = (pos as usize * BAR_WIDTH) / len as usize;
		let mut line = String::new();
		let _ = write!(
			line,
			"{}▕{}{}▏{}/{} ({:>3}%) {:.0}/s {}",
			self.message,
			"█".repeat(filled),
			" ".repeat(BAR_WIDTH - filled),
			self.pos,
			self.len,
			pos * 100 / len,
			per_sec,
			format_duration(eta)
		);
		line
	}

	fn draw(&mut self, force: bool) {
		if !self.visible {
			return;
		}
		if !force && self.last_draw.is_some_and(|t| t.elapsed() < MIN_REDRAW_INTERVAL) {
			return;
		}
		self.last_draw = Some(Instant::now());
		let mut stderr = io::stderr();
		let _ = write!(stderr, "\r\x1b[2K{}", self.render());
		let _ = stderr.flush();
	}
}

fn format_duration(duration: Duration) -> String {
	let secs = duration.as_secs();
	format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// A cloneable, thread-safe progress bar handle.
#[derive(Clone)]
pub struct ProgressBar {
	state: Arc<Mutex<State>>,
}

impl ProgressBar {
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		let visible = !cfg!(any(test, feature = "test")) && io::stderr().is_terminal();
		let progress = ProgressBar {
			state: Arc::new(Mutex::new(State {
				message: message.to_string(),
				len: max_value,
				pos: 0,
				start: Instant::now(),
				last_draw: None,
				visible,
			})),
		};
		progress.state.lock().draw(true);
		progress
	}

	pub fn position(&self) -> u64 {
		self.state.lock().pos
	}

	pub fn max_value(&self) -> u64 {
		self.state.lock().len
	}

	pub fn set_position(&self, value: u64) {
		let mut state = self.state.lock();
		state.pos = value.min(state.len);
		state.draw(false);
	}

	pub fn set_max_value(&self, value: u64) {
		let mut state = self.state.lock();
		state.len = value;
		state.pos = state.pos.min(value);
		state.draw(false);
	}

	pub fn inc(&self, value: u64) {
		let mut state = self.state.lock();
		state.pos = state.pos.saturating_add(value).min(state.len);
		state.draw(false);
	}

	/// Jumps to the end and leaves the final line on screen.
	pub fn finish(&self) {
		let mut state = self.state.lock();
		state.pos = state.len;
		state.draw(true);
		if state.visible {
			let _ = io::stderr().write_all(b"\n");
		}
	}

	/// Clears the bar line without jumping to the end.
	pub fn remove(&self) {
		let state = self.state.lock();
		if state.visible {
			let mut stderr = io::stderr();
			let _ = stderr.write_all(b"\r\x1b[2K");
			let _ = stderr.flush();
		}
	}
}
