use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::ConfigError;

/// Looked for in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "ankify.toml";

#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	// Prepended to the input file name to name the output file
	pub output_prefix: String,

	// Deck passed to the importer instead of the one declared in the file
	pub default_deck: Option<String>,

	// Accept every warning without prompting
	pub assume_yes: bool,

	pub import: ImportConfig,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			output_prefix: "anki-".to_string(),
			default_deck:  None,
			assume_yes:    false,
			import:        ImportConfig::default(),
		}
	}
}

#[derive(Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
	pub enabled: bool,
	pub program: String,
	// The output file and `-d <deck>` are appended after these
	pub args:    Vec<String>,
}

impl Default for ImportConfig {
	fn default() -> Self {
		Self { enabled: true, program: "apy".to_string(), args: vec!["add-from-file".to_string()] }
	}
}

impl Config {
	pub fn parse(content: &str) -> Result<Self, ConfigError> { Ok(toml::from_str(content)?) }

	#[instrument]
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		debug!("Loading config from {:?}", path);
		let content = fs_err::read_to_string(path)?;
		Self::parse(&content)
	}

	/// Loads `path` if given, else `ankify.toml` when it exists, else the
	/// defaults.
	pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
		if let Some(path) = path {
			return Self::load(path);
		}

		let fallback = Path::new(DEFAULT_CONFIG_FILE);
		if fallback.is_file() {
			info!("Using {}", DEFAULT_CONFIG_FILE);
			return Self::load(fallback);
		}

		Ok(Self::default())
	}

	/// `notes/bio.md` becomes `notes/anki-bio.md`.
	pub fn output_path(&self, input: &Path) -> PathBuf {
		let file_name = input.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
		input.with_file_name(format!("{}{}", self.output_prefix, file_name))
	}
}
