use std::{collections::VecDeque, io::{self, BufRead, Write}};

use tracing::{info, warn};

use crate::{diagnostic, types::warning::Warning};

/// Asks a human whether to carry on past a warning. Returning `false` stops the
/// conversion.
pub trait Confirm {
	fn confirm(&mut self, warning: &Warning) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for &mut C {
	fn confirm(&mut self, warning: &Warning) -> bool { (**self).confirm(warning) }
}

/// Prints the warning and reads a `y`/`N` answer from the terminal
pub struct TerminalConfirm {
	source_name: String,
}

impl TerminalConfirm {
	pub fn new(source_name: impl Into<String>) -> Self { Self { source_name: source_name.into() } }
}

impl Confirm for TerminalConfirm {
	fn confirm(&mut self, warning: &Warning) -> bool {
		eprint!("{}", diagnostic::render(warning, &self.source_name, true));
		eprint!("Continue processing? (y/N): ");
		let _ = io::stderr().flush();

		let mut response = String::new();
		if let Err(e) = io::stdin().lock().read_line(&mut response) {
			warn!("Could not read confirmation: {}", e);
			return false;
		}

		matches!(response.trim(), "y" | "Y")
	}
}

/// Accepts every warning, logging each one
#[derive(Debug, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
	fn confirm(&mut self, warning: &Warning) -> bool {
		info!("Auto-confirming: {}", warning);
		true
	}
}

/// Answers from a fixed script and records what it was asked. Once the script
/// runs out every further warning is accepted.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
	answers:  VecDeque<bool>,
	pub seen: Vec<Warning>,
}

impl ScriptedConfirm {
	pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
		Self { answers: answers.into_iter().collect(), seen: Vec::new() }
	}
}

impl Confirm for ScriptedConfirm {
	fn confirm(&mut self, warning: &Warning) -> bool {
		self.seen.push(warning.clone());
		self.answers.pop_front().unwrap_or(true)
	}
}
