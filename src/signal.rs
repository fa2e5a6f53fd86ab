use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

fn disposition(handler: SigHandler) -> SigAction {
	SigAction::new(handler, SaFlags::SA_RESTART, SigSet::empty())
}

fn install(sig: Signal, handler: SigHandler) -> nix::Result<()> {
	// Only SIG_IGN and SIG_DFL are ever installed, no handler code runs.
	let _previous = unsafe { signal::sigaction(sig, &disposition(handler))? };
	Ok(())
}

/// Shell-wide dispositions, set once before the first command.
///
/// SIGINT is ignored so ^C never takes the shell down. SIGCHLD is ignored so
/// the kernel reaps children nobody waits for, which is what keeps detached
/// background jobs from piling up as zombies.
pub fn prepare() -> nix::Result<()> {
	install(Signal::SIGCHLD, SigHandler::SigIgn)?;
	install(Signal::SIGINT, SigHandler::SigIgn)
}

/// Runs in a freshly forked child, before exec.
///
/// An ignored disposition survives exec, so SIGCHLD and SIGPIPE are always
/// put back; the Rust runtime ignores SIGPIPE in the shell itself.
/// Background children keep SIGINT ignored to stay out of reach of a ^C
/// meant for the foreground job.
pub fn enter_child(background: bool) -> nix::Result<()> {
	install(Signal::SIGCHLD, SigHandler::SigDfl)?;
	install(Signal::SIGPIPE, SigHandler::SigDfl)?;
	if !background {
		install(Signal::SIGINT, SigHandler::SigDfl)?;
	}
	Ok(())
}

pub fn finalize() -> nix::Result<()> {
	Ok(())
}
