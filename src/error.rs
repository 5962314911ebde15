use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvertError>;

#[derive(Debug, Error)]
pub enum ConvertError {
	#[error(
		"Deck name cannot be found. Please include a `# deck: <deckName>` at the start of your cards"
	)]
	MissingDeckDeclaration,

	#[error("Template '{0}' not found")]
	TemplateNotFound(String),

	#[error("Process stopped by user: {0}")]
	UserAborted(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Failed to read config: {0}")]
	Read(#[from] std::io::Error),

	#[error("Invalid config: {0}")]
	Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum ImportError {
	#[error("Import command is empty")]
	EmptyCommand,

	#[error("Failed to run '{command}': {source}")]
	Spawn {
		command: String,
		#[source]
		source:  std::io::Error,
	},

	#[error("'{command}' exited with {status}:\n{output}")]
	Failed { command: String, status: std::process::ExitStatus, output: String },
}
