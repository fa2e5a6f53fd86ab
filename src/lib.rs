//! Process orchestration core of `ish`, a minimal shell.
//!
//! A command line arrives as a list of words. [`eval::eval`] classifies it
//! as plain, background, redirected or a two-stage pipeline, forks and wires
//! the processes, and waits for foreground jobs. [`signal::prepare`] must
//! have run once before the first command.

pub mod classify;
pub mod config;
pub mod eval;
pub mod global;
pub mod job;
pub mod logging;
pub mod parser;
pub mod signal;
pub mod types;

pub use eval::{eval, EvalResult};
pub use types::{Command, Mode};
