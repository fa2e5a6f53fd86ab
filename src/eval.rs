use crate::classify;
use crate::global;
use crate::job;
use crate::signal;
use crate::types::{Command, Plan};

use std::{error, fmt, fs, ffi, io};
use std::convert::Infallible;
use std::ffi::{CString, OsStr};
use std::io::Write;
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;

use log::debug;
use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::unistd::{self, ForkResult};

#[derive(Debug)]
pub enum ExecError {
	NixError(nix::Error),
	NulError(ffi::NulError),
	OpenError(CString, io::Error),
	ExecFailed(CString, nix::Error),
	EmptyCommand,
}
impl From<nix::Error> for ExecError {
	fn from(e: nix::Error) -> ExecError {
		ExecError::NixError(e)
	}
}
impl From<ffi::NulError> for ExecError {
	fn from(e: ffi::NulError) -> ExecError {
		ExecError::NulError(e)
	}
}
impl fmt::Display for ExecError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ExecError::NixError(ref e) => write!(f, "{}", e),
			ExecError::NulError(ref e) => write!(f, "{}", e),
			ExecError::OpenError(ref path, ref e) => write!(f, "{}: {}", path.to_string_lossy(), e),
			ExecError::ExecFailed(ref name, ref e) => write!(f, "{}: {}", name.to_string_lossy(), e.desc()),
			ExecError::EmptyCommand => write!(f, "missing command"),
		}
	}
}
impl error::Error for ExecError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			ExecError::NixError(ref e) => Some(e),
			ExecError::NulError(ref e) => Some(e),
			ExecError::OpenError(_, ref e) => Some(e),
			ExecError::ExecFailed(_, ref e) => Some(e),
			ExecError::EmptyCommand => None,
		}
	}
}

pub fn report(e: &ExecError) {
	let _ = writeln!(&mut io::stderr(), "ish: {}", e);
}

fn close(fd: OwnedFd) -> nix::Result<()> {
	unistd::close(fd.into_raw_fd())
}

/// Makes `fd` the process' descriptor `target`, then closes the original.
fn move_fd(fd: OwnedFd, target: RawFd) -> nix::Result<()> {
	if fd.as_raw_fd() == target {
		// Already in place; only the close-on-exec flag has to go.
		fcntl::fcntl(target, FcntlArg::F_SETFD(FdFlag::empty()))?;
		let _ = fd.into_raw_fd();
		return Ok(());
	}
	unistd::dup2(fd.as_raw_fd(), target)?;
	close(fd)
}

fn do_exec_command<F>(argv: &[CString], background: bool, wire: F) -> Result<Infallible, ExecError>
	where F: FnOnce() -> nix::Result<()> {
	signal::enter_child(background)?;
	wire()?;
	let name = argv.first().ok_or(ExecError::EmptyCommand)?;
	unistd::execvp(name, argv).map_err(|e| ExecError::ExecFailed(name.clone(), e))
}

fn exec_command<F>(argv: &[CString], background: bool, wire: F) -> !
	where F: FnOnce() -> nix::Result<()> {
	match do_exec_command(argv, background, wire) {
		Ok(never) => match never {},
		Err(e) => {
			report(&e);
			unsafe { libc::_exit(libc::EXIT_FAILURE) }
		},
	}
}

fn open_target(path: &CString) -> Result<fs::File, ExecError> {
	fs::OpenOptions::new()
		.read(true)
		.write(true)
		.create(true)
		.truncate(true)
		.mode(0o700)
		.open(OsStr::from_bytes(path.as_bytes()))
		.map_err(|e| ExecError::OpenError(path.clone(), e))
}

fn spawn_single(argv: &[CString], stdout: Option<fs::File>, background: bool) -> Result<job::Job, ExecError> {
	let mut job_builder = job::JobBuilder::new(1, background);
	match job_builder.push_fork()? {
		ForkResult::Parent { .. } => {
			drop(stdout);
		},
		ForkResult::Child => {
			exec_command(argv, background, move || {
				match stdout {
					Some(file) => move_fd(OwnedFd::from(file), libc::STDOUT_FILENO),
					None => Ok(()),
				}
			});
		},
	}
	Ok(job_builder.build())
}

fn spawn_pipeline(left: &[CString], right: &[CString]) -> Result<job::Job, ExecError> {
	let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC)?;
	let mut job_builder = job::JobBuilder::new(2, false);

	match job_builder.push_fork()? {
		ForkResult::Parent { .. } => {},
		ForkResult::Child => {
			exec_command(left, false, move || {
				close(pipe_read)?;
				move_fd(pipe_write, libc::STDOUT_FILENO)
			});
		},
	}

	match job_builder.push_fork() {
		Ok(ForkResult::Parent { .. }) => {},
		Ok(ForkResult::Child) => {
			exec_command(right, false, move || {
				close(pipe_write)?;
				move_fd(pipe_read, libc::STDIN_FILENO)
			});
		},
		Err(e) => {
			drop(pipe_read);
			drop(pipe_write);
			let _ = job_builder.build().wait();
			return Err(e.into());
		},
	}

	drop(pipe_read);
	drop(pipe_write);
	Ok(job_builder.build())
}

fn spawn_plan(plan: &Plan) -> Result<job::Job, ExecError> {
	match *plan {
		Plan::Single { ref argv, ref stdout, background } => {
			let stdout = match *stdout {
				Some(ref path) => Some(open_target(path)?),
				None => None,
			};
			spawn_single(argv, stdout, background)
		},
		Plan::Pipeline { ref left, ref right } => spawn_pipeline(left, right),
	}
}

#[derive(Debug)]
pub enum EvalResult {
	/// The foreground job ran to completion.
	Done,
	/// A background job that was left running.
	Running(job::Job),
	/// Nothing (or only part of a pipeline) could be started; already reported.
	Failed,
}

pub fn eval(state: &global::State, command: Command) -> EvalResult {
	let mode = classify::classify(command.words(), &state.config.markers);
	debug!("{:?}: {:?}", command.words(), mode);
	let plan = command.plan(mode);

	let mut job = match spawn_plan(&plan) {
		Ok(job) => job,
		Err(e) => {
			report(&e);
			return EvalResult::Failed;
		},
	};
	if job.is_background() {
		return EvalResult::Running(job);
	}
	match job.wait() {
		Ok(()) => EvalResult::Done,
		Err(e) => {
			report(&ExecError::from(e));
			EvalResult::Failed
		},
	}
}
