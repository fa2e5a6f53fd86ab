use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Diagnostics go to stderr so they never mix with command output.
/// A second call is a no-op.
pub fn init(level: LevelFilter) {
	let config = ConfigBuilder::new()
		.set_time_level(LevelFilter::Off)
		.set_target_level(LevelFilter::Debug)
		.build();
	let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
