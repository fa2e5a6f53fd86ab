// Kept to a single test: counting this process' descriptors only works when
// nothing else in the binary opens files at the same time.
#![cfg(target_os = "linux")]

use std::fs;

use ish::global::State;
use ish::{eval, signal, Command, EvalResult};

fn open_descriptors() -> usize {
	// read_dir holds one descriptor of its own while listing, in both calls.
	fs::read_dir("/proc/self/fd").unwrap().count()
}

fn run(words: &[&str]) {
	let command = Command::from_words(words.iter().map(|w| w.as_bytes())).unwrap();
	match eval(&State::default(), command) {
		EvalResult::Done => {},
		r => panic!("unexpected {:?}", r),
	}
}

#[test]
fn commands_leave_no_descriptors_behind() {
	signal::prepare().unwrap();
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("out.txt");
	let out = out.to_str().unwrap();

	let before = open_descriptors();
	run(&["true", "|", "true"]);
	run(&["printf", "abc", "|", "sh", "-c", "cat > /dev/null"]);
	run(&["ish-test-no-such-program", "|", "true"]);
	assert_eq!(open_descriptors(), before);

	run(&["echo", "x", ">", out]);
	assert_eq!(open_descriptors(), before);
	assert_eq!(fs::read_to_string(out).unwrap(), "x\n");
}
