use std::{path::Path, process::Command};

use tracing::{info, instrument};

use crate::{config::ImportConfig, error::ImportError};

/// The full argument vector: program, configured args, file, `-d <deck>`.
pub fn import_command(config: &ImportConfig, file: &Path, deck: &str) -> Vec<String> {
	let mut command = Vec::with_capacity(config.args.len() + 4);
	command.push(config.program.clone());
	command.extend(config.args.iter().cloned());
	command.push(file.to_string_lossy().into_owned());
	if !deck.is_empty() {
		command.push("-d".to_string());
		command.push(deck.to_string());
	}
	command
}

/// Hands the converted file to the import command and returns its combined
/// output.
#[instrument(skip(config))]
pub fn run_import(config: &ImportConfig, file: &Path, deck: &str) -> Result<String, ImportError> {
	let command = import_command(config, file, deck);
	let (program, args) = command.split_first().ok_or(ImportError::EmptyCommand)?;
	if program.is_empty() {
		return Err(ImportError::EmptyCommand);
	}

	let joined = command.join(" ");
	info!("Running {}", joined);

	let output = Command::new(program)
		.args(args)
		.output()
		.map_err(|source| ImportError::Spawn { command: joined.clone(), source })?;

	let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
	combined.push_str(&String::from_utf8_lossy(&output.stderr));

	if !output.status.success() {
		return Err(ImportError::Failed { command: joined, status: output.status, output: combined });
	}
	Ok(combined)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn command_appends_file_and_deck() {
		let command = import_command(&ImportConfig::default(), Path::new("anki-bio.md"), "Biology");
		assert_eq!(command, vec!["apy", "add-from-file", "anki-bio.md", "-d", "Biology"]);
	}

	#[test]
	fn empty_program_is_rejected() {
		let config = ImportConfig { program: String::new(), ..ImportConfig::default() };
		assert!(matches!(
			run_import(&config, Path::new("x.md"), "Deck"),
			Err(ImportError::EmptyCommand)
		));
	}
}
