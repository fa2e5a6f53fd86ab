use log::{debug, trace};
use nix::errno::Errno;
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum State { Active, Terminated }

trait WaitStatusExt {
	fn state(self) -> State;
}

impl WaitStatusExt for WaitStatus {
	fn state(self) -> State {
		match self {
			WaitStatus::Exited(..) => State::Terminated,
			WaitStatus::Signaled(..) => State::Terminated,
			_ => State::Active,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub state: State,
}

/// The processes spawned for one command line.
///
/// Exit statuses are not kept: with SIGCHLD ignored the kernel may reap a
/// child before we get to it, so the only thing known for sure is whether it
/// is gone.
#[derive(Debug)]
pub struct Job {
	pub processes: Vec<Process>,
	background: bool,
}

impl Job {
	pub fn state(&self) -> State {
		self.processes.iter().map(|pr| pr.state).min().unwrap_or(State::Terminated)
	}

	pub fn is_background(&self) -> bool {
		self.background
	}

	/// Blocks until every process has terminated, in spawn order.
	///
	/// ECHILD means the kernel already reaped the child and EINTR just means
	/// try again; neither is an error here.
	pub fn wait(&mut self) -> nix::Result<()> {
		for pr in self.processes.iter_mut() {
			while pr.state == State::Active {
				match wait::waitpid(pr.pid, None) {
					Ok(status) => {
						trace!("pid {}: {:?}", pr.pid, status);
						pr.state = status.state();
					},
					Err(Errno::ECHILD) => pr.state = State::Terminated,
					Err(Errno::EINTR) => {},
					Err(e) => return Err(e),
				}
			}
			debug!("pid {} done", pr.pid);
		}
		Ok(())
	}

	/// Non-blocking check, for detached jobs.
	pub fn poll(&mut self) -> nix::Result<State> {
		for pr in self.processes.iter_mut().filter(|pr| pr.state == State::Active) {
			match wait::waitpid(pr.pid, Some(WaitPidFlag::WNOHANG)) {
				Ok(status) => pr.state = status.state(),
				Err(Errno::ECHILD) => pr.state = State::Terminated,
				Err(Errno::EINTR) => {},
				Err(e) => return Err(e),
			}
		}
		Ok(self.state())
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize, background: bool) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint), background: background }
		}
	}

	/// Forks and records the child in the parent. The child gets
	/// `ForkResult::Child` back and must exec or `_exit`.
	pub fn push_fork(&mut self) -> nix::Result<ForkResult> {
		// The child only touches signal dispositions and descriptors before exec.
		let r = unsafe { unistd::fork()? };
		if let ForkResult::Parent { child: pid } = r {
			debug!("spawned pid {}{}", pid, if self.imp.background { " (background)" } else { "" });
			self.imp.processes.push(Process { pid: pid, state: State::Active });
		}
		Ok(r)
	}

	pub fn build(self) -> Job {
		assert!(!self.imp.processes.is_empty());
		self.imp
	}
}
