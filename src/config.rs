use std::{env, error, fmt, fs, io};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;

const CONFIG_ENV: &str = "ISH_CONFIG";
const LOG_ENV: &str = "ISH_LOG";
const DEFAULT_PATH: &str = ".config/ish/config.toml";

#[derive(Debug)]
pub enum ConfigError {
	IoError(PathBuf, io::Error),
	TomlError(toml::de::Error),
	InvalidMarker(&'static str),
	InvalidLogLevel(String),
}
impl From<toml::de::Error> for ConfigError {
	fn from(e: toml::de::Error) -> ConfigError {
		ConfigError::TomlError(e)
	}
}
impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			ConfigError::IoError(ref path, ref e) => write!(f, "{}: {}", path.display(), e),
			ConfigError::TomlError(ref e) => write!(f, "config: {}", e),
			ConfigError::InvalidMarker(which) => write!(f, "config: {} marker must be a non-empty word distinct from the others", which),
			ConfigError::InvalidLogLevel(ref s) => write!(f, "config: unknown log level '{}'", s),
		}
	}
}
impl error::Error for ConfigError {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			ConfigError::IoError(_, ref e) => Some(e),
			ConfigError::TomlError(ref e) => Some(e),
			_ => None,
		}
	}
}

/// The words that switch a command into background, redirect or pipeline mode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Markers {
	pub background: String,
	pub redirect: String,
	pub pipe: String,
}

impl Default for Markers {
	fn default() -> Markers {
		Markers { background: "&".to_string(), redirect: ">".to_string(), pipe: "|".to_string() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
	pub prompt: String,
	pub log_level: String,
	pub markers: Markers,
}

impl Default for Config {
	fn default() -> Config {
		Config { prompt: "ish> ".to_string(), log_level: "warn".to_string(), markers: Markers::default() }
	}
}

impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Config, ConfigError> {
		let config: Config = toml::from_str(s)?;
		config.validate()?;
		Ok(config)
	}
}

impl Config {
	/// `$ISH_CONFIG` if set, otherwise `~/.config/ish/config.toml` when it
	/// exists, otherwise the defaults. `$ISH_LOG` overrides `log_level`.
	pub fn load() -> Result<Config, ConfigError> {
		let mut config = match config_path() {
			Some(path) => Config::from_file(&path)?,
			None => Config::default(),
		};
		if let Ok(level) = env::var(LOG_ENV) {
			config.log_level = level;
		}
		config.validate()?;
		Ok(config)
	}

	pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
		let text = fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_owned(), e))?;
		text.parse()
	}

	pub fn level(&self) -> Result<LevelFilter, ConfigError> {
		LevelFilter::from_str(self.log_level.trim()).map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let m = &self.markers;
		let blank = |s: &str| s.is_empty() || s.chars().any(char::is_whitespace);
		if blank(&m.background) {
			return Err(ConfigError::InvalidMarker("background"));
		}
		if blank(&m.redirect) || m.redirect == m.background {
			return Err(ConfigError::InvalidMarker("redirect"));
		}
		if blank(&m.pipe) || m.pipe == m.background || m.pipe == m.redirect {
			return Err(ConfigError::InvalidMarker("pipe"));
		}
		self.level().map(|_| ())
	}
}

fn config_path() -> Option<PathBuf> {
	if let Some(path) = env::var_os(CONFIG_ENV) {
		return Some(PathBuf::from(path));
	}
	let home = env::var_os("HOME")?;
	let path = Path::new(&home).join(DEFAULT_PATH);
	if path.is_file() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_file_gives_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.level().unwrap(), LevelFilter::Warn);
	}

	#[test]
	fn partial_markers_keep_other_defaults() {
		let config: Config = "prompt = \"$ \"\n[markers]\npipe = \"=>\"\n".parse().unwrap();
		assert_eq!(config.prompt, "$ ");
		assert_eq!(config.markers.pipe, "=>");
		assert_eq!(config.markers.background, "&");
		assert_eq!(config.markers.redirect, ">");
	}

	#[test]
	fn rejects_empty_marker() {
		match "[markers]\nbackground = \"\"\n".parse::<Config>() {
			Err(ConfigError::InvalidMarker("background")) => {},
			r => panic!("unexpected {:?}", r),
		}
	}

	#[test]
	fn rejects_clashing_markers() {
		match "[markers]\npipe = \">\"\n".parse::<Config>() {
			Err(ConfigError::InvalidMarker("pipe")) => {},
			r => panic!("unexpected {:?}", r),
		}
	}

	#[test]
	fn rejects_unknown_level() {
		assert!("log_level = \"loud\"".parse::<Config>().is_err());
		let config: Config = "log_level = \"debug\"".parse().unwrap();
		assert_eq!(config.level().unwrap(), LevelFilter::Debug);
	}

	#[test]
	fn rejects_bad_toml() {
		match "prompt = ".parse::<Config>() {
			Err(ConfigError::TomlError(_)) => {},
			r => panic!("unexpected {:?}", r),
		}
	}

	#[test]
	fn missing_file_names_the_path() {
		let e = Config::from_file(Path::new("/nonexistent/ish.toml")).unwrap_err();
		assert!(e.to_string().starts_with("/nonexistent/ish.toml: "));
	}
}
