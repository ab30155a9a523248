//! Lightweight terminal progress bar without external dependencies.
//!
//! Renders message, bar, pos/len, percentage, rate and ETA to stderr on a
//! single line, redrawn in place.

use std::env;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct State {
	message: String,
	len: u64,
	pos: u64,
	start: Instant,
}

impl State {
	fn render(&self) -> String {
		let len = self.len.max(1);
		let pos = self.pos.min(len);
		let percent = pos * 100 / len;

		let elapsed = self.start.elapsed().as_secs_f64();
		let rate = if elapsed > 0.0 { pos as f64 / elapsed } else { 0.0 };
		let eta = if rate > 0.0 {
			Duration::from_secs_f64((len - pos) as f64 / rate)
		} else {
			Duration::ZERO
		};

		let right = format!(
			"▏{pos}/{len} ({percent:>3}%) {:>7} {:>5}",
			format_rate(rate),
			format_eta(eta)
		);

		let width = bar_width(self.message.chars().count() + right.chars().count() + 1);
		let filled = ((pos * width as u64) / len) as usize;

		let mut line = String::new();
		let _ = write!(&mut line, "{}▕", self.message);
		for _ in 0..filled {
			line.push('█');
		}
		for _ in filled..width {
			line.push(' ');
		}
		line.push_str(&right);
		line
	}

	fn redraw(&self) {
		let mut stderr = io::stderr();
		let _ = write!(stderr, "\r\x1b[2K{}", self.render());
		let _ = stderr.flush();
	}
}

/// A terminal progress bar handle, cloneable and thread-safe.
#[derive(Clone)]
pub struct ProgressBar {
	state: Arc<Mutex<State>>,
}

impl ProgressBar {
	/// Initialize the bar with a message and maximum value.
	pub fn new(message: &str, max_value: u64) -> ProgressBar {
		let progress = ProgressBar {
			state: Arc::new(Mutex::new(State {
				message: message.to_string(),
				len: max_value,
				pos: 0,
				start: Instant::now(),
			})),
		};
		progress.state.lock().unwrap().redraw();
		progress
	}

	/// Set the absolute position.
	pub fn set_position(&self, value: u64) {
		let mut state = self.state.lock().unwrap();
		state.pos = value.min(state.len);
		state.redraw();
	}

	/// Increment by `value`.
	pub fn inc(&self, value: u64) {
		let mut state = self.state.lock().unwrap();
		state.pos = state.pos.saturating_add(value).min(state.len);
		state.redraw();
	}

	/// Current position, mainly for tests.
	pub fn position(&self) -> u64 {
		self.state.lock().unwrap().pos
	}

	/// Finish the bar, set position to len and print a final newline.
	pub fn finish(&self) {
		let mut state = self.state.lock().unwrap();
		state.pos = state.len;
		state.redraw();
		drop(state);
		let _ = io::stderr().write_all(b"\n");
		let _ = io::stderr().flush();
	}
}

// Characters available for the bar itself, given the decoration width.
// Prefers $COLUMNS, falls back to 80.
fn bar_width(taken: usize) -> usize {
	let total = env::var("COLUMNS")
		.ok()
		.and_then(|cols| cols.parse::<usize>().ok())
		.unwrap_or(80)
		.max(10);
	const MIN_BAR: usize = 10;
	if total > taken + MIN_BAR { total - taken } else { MIN_BAR }
}

fn format_rate(per_sec: f64) -> String {
	if per_sec >= 1_000_000.0 {
		format!("{:.1}M/s", per_sec / 1_000_000.0)
	} else if per_sec >= 1_000.0 {
		format!("{:.1}k/s", per_sec / 1_000.0)
	} else {
		format!("{per_sec:.0}/s")
	}
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let h = total / 3600;
	let m = (total % 3600) / 60;
	let s = total % 60;
	if h > 0 {
		format!("{h:02}:{m:02}:{s:02}")
	} else {
		format!("{m:02}:{s:02}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_at_zero() {
		let progress = ProgressBar::new("Test", 100);
		assert_eq!(progress.position(), 0);
	}

	#[test]
	fn set_position_clamps_to_len() {
		let progress = ProgressBar::new("Test", 100);
		progress.set_position(50);
		assert_eq!(progress.position(), 50);
		progress.set_position(500);
		assert_eq!(progress.position(), 100);
	}

	#[test]
	fn inc_accumulates() {
		let progress = ProgressBar::new("Test", 100);
		progress.set_position(10);
		progress.inc(20);
		assert_eq!(progress.position(), 30);
	}

	#[test]
	fn finish_moves_to_len() {
		let progress = ProgressBar::new("Test", 100);
		progress.set_position(50);
		progress.finish();
		assert_eq!(progress.position(), 100);
	}

	#[test]
	fn render_contains_counts() {
		let state = State {
			message: "msg".to_string(),
			len: 4,
			pos: 1,
			start: Instant::now(),
		};
		let line = state.render();
		assert!(line.contains("1/4"));
		assert!(line.contains("( 25%)"));
	}

	#[test]
	fn format_eta_variants() {
		assert_eq!(format_eta(Duration::from_secs(59)), "00:59");
		assert_eq!(format_eta(Duration::from_secs(61)), "01:01");
		assert_eq!(format_eta(Duration::from_secs(3661)), "01:01:01");
	}

	#[test]
	fn format_rate_variants() {
		assert_eq!(format_rate(12.0), "12/s");
		assert_eq!(format_rate(1200.0), "1.2k/s");
		assert_eq!(format_rate(2_500_000.0), "2.5M/s");
	}
}
