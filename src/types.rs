use std::ffi::{CString, NulError};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Mode {
	Plain,
	Background,
	Redirect,
	/// Index of the pipe marker among the words.
	Pipeline(usize),
}

/// One command line, already split into words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
	words: Vec<CString>,
}

/// Argument vectors for the processes a command turns into, built before
/// anything is forked.
#[derive(Debug, PartialEq, Eq)]
pub enum Plan {
	Single { argv: Vec<CString>, stdout: Option<CString>, background: bool },
	Pipeline { left: Vec<CString>, right: Vec<CString> },
}

impl Command {
	pub fn from_words<I, T>(words: I) -> Result<Command, NulError>
		where I: IntoIterator<Item = T>, T: Into<Vec<u8>> {
		let words: Result<Vec<CString>, NulError> = words.into_iter().map(CString::new).collect();
		Ok(Command { words: words? })
	}

	pub fn words(&self) -> &[CString] {
		&self.words
	}

	pub fn plan(self, mode: Mode) -> Plan {
		let mut words = self.words;
		match mode {
			Mode::Plain => Plan::Single { argv: words, stdout: None, background: false },
			Mode::Background => {
				words.pop();
				Plan::Single { argv: words, stdout: None, background: true }
			},
			Mode::Redirect => {
				let target = words.pop();
				words.pop();
				Plan::Single { argv: words, stdout: target, background: false }
			},
			Mode::Pipeline(sep) => {
				let right = words.split_off(sep + 1);
				words.truncate(sep);
				Plan::Pipeline { left: words, right: right }
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn command(words: &[&str]) -> Command {
		Command::from_words(words.iter().map(|w| w.as_bytes())).unwrap()
	}

	fn cstrings(words: &[&str]) -> Vec<CString> {
		words.iter().map(|w| CString::new(*w).unwrap()).collect()
	}

	#[test]
	fn rejects_interior_nul() {
		assert!(Command::from_words(vec![&b"ec\0ho"[..]]).is_err());
	}

	#[test]
	fn background_drops_marker() {
		let plan = command(&["echo", "hi", "&"]).plan(Mode::Background);
		assert_eq!(plan, Plan::Single { argv: cstrings(&["echo", "hi"]), stdout: None, background: true });
	}

	#[test]
	fn redirect_drops_marker_and_target() {
		let plan = command(&["ls", "-l", ">", "out.txt"]).plan(Mode::Redirect);
		assert_eq!(plan, Plan::Single {
			argv: cstrings(&["ls", "-l"]),
			stdout: Some(CString::new("out.txt").unwrap()),
			background: false,
		});
	}

	#[test]
	fn pipeline_splits_around_separator() {
		let plan = command(&["ls", "|", "wc", "-l"]).plan(Mode::Pipeline(1));
		assert_eq!(plan, Plan::Pipeline { left: cstrings(&["ls"]), right: cstrings(&["wc", "-l"]) });
	}

	#[test]
	fn pipeline_with_missing_right_side() {
		let plan = command(&["ls", "|"]).plan(Mode::Pipeline(1));
		assert_eq!(plan, Plan::Pipeline { left: cstrings(&["ls"]), right: vec![] });
	}
}
