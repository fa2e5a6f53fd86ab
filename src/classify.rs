use std::ffi::CString;

use crate::config::Markers;
use crate::types::Mode;

fn is(word: &CString, marker: &str) -> bool {
	word.as_bytes() == marker.as_bytes()
}

/// Picks the execution mode for `words`.
///
/// Only one marker is honored: a trailing background marker wins over a
/// redirect, and a redirect wins over a pipe.
pub fn classify(words: &[CString], markers: &Markers) -> Mode {
	let count = words.len();
	match words.last() {
		None => Mode::Plain,
		Some(last) if is(last, &markers.background) => Mode::Background,
		Some(_) if count > 2 && is(&words[count - 2], &markers.redirect) => Mode::Redirect,
		Some(_) => {
			match words.iter().skip(1).position(|w| is(w, &markers.pipe)) {
				Some(i) => Mode::Pipeline(i + 1),
				None => Mode::Plain,
			}
		},
	}
}
