use std::{io, process};
use io::BufRead;
use io::Write;

use log::{debug, error};
use nix::unistd;

use ish::config::Config;
use ish::eval::{self, ExecError};
use ish::{global, logging, parser, signal};
use ish::types::Command;

fn main() {
	let config = match Config::load() {
		Ok(config) => config,
		Err(e) => {
			let _ = writeln!(io::stderr(), "ish: {}", e);
			process::exit(1);
		},
	};
	if let Ok(level) = config.level() {
		logging::init(level);
	}
	if let Err(e) = signal::prepare() {
		error!("installing signal dispositions failed");
		let _ = writeln!(io::stderr(), "ish: {}", e);
		process::exit(1);
	}

	let interactive = unistd::isatty(libc::STDIN_FILENO).unwrap_or(false);
	let state = global::State::new(config);
	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	let mut line: Vec<u8> = vec![];
	loop {
		if interactive {
			let _ = stdout.write_all(state.config.prompt.as_bytes());
			let _ = stdout.flush();
		}
		line.clear();
		match stdin_locked.read_until(b'\n', &mut line) {
			Ok(0) => break,
			Ok(_) => {},
			Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => {
				let _ = writeln!(io::stderr(), "ish: {}", e);
				break;
			},
		}
		let words = parser::parse(&line);
		if words.is_empty() {
			continue;
		}
		let command = match Command::from_words(words) {
			Ok(command) => command,
			Err(e) => {
				eval::report(&ExecError::from(e));
				continue;
			},
		};
		let _ = stdout.flush();
		if let eval::EvalResult::Running(job) = eval::eval(&state, command) {
			debug!("left {:?} running", job.processes);
		}
	}

	if interactive {
		let _ = stdout.write_all(b"\n");
	}
	if let Err(e) = signal::finalize() {
		let _ = writeln!(io::stderr(), "ish: {}", e);
		process::exit(1);
	}
}
