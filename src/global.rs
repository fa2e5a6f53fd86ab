use crate::config::Config;

pub struct State {
	pub config: Config,
}

impl State {
	pub fn new(config: Config) -> State {
		State { config: config }
	}
}

impl Default for State {
	fn default() -> State {
		State::new(Config::default())
	}
}
