use std::fmt;

/// A finished note block, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
	Basic { front: String, back: String },
	Cloze { text: String, back_extra: String },
}

impl Note {
	pub fn is_cloze(&self) -> bool { matches!(self, Note::Cloze { .. }) }
}

impl fmt::Display for Note {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Note::Basic { front, back } => {
				write!(f, "# Note\n\n## Front\n\n{}\n\n## Back\n\n{}\n\n", front, back)
			}
			Note::Cloze { text, back_extra } => {
				write!(f, "# Note\nmodel: Cloze\n\n## Text\n\n{}\n\n## Back Extra\n\n", text)?;
				if !back_extra.is_empty() {
					write!(f, "{}\n\n", back_extra)?;
				}
				Ok(())
			}
		}
	}
}

/// The in-progress card. Lines are joined with `\n`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CardBuffer {
	front: String,
	back:  String,
}

impl CardBuffer {
	pub fn new() -> Self { Self::default() }

	pub fn is_pending(&self) -> bool { !self.front.is_empty() || !self.back.is_empty() }

	pub fn front(&self) -> &str { &self.front }

	pub fn push_front(&mut self, line: &str) { push_line(&mut self.front, line) }

	pub fn push_back(&mut self, line: &str) { push_line(&mut self.back, line) }

	/// A front whose trimmed text ends in `?` is waiting for its answer
	pub fn has_open_question(&self) -> bool { self.front.trim_end().ends_with('?') }

	/// Drains both regions together.
	pub fn take(&mut self) -> (String, String) {
		(std::mem::take(&mut self.front), std::mem::take(&mut self.back))
	}
}

fn push_line(region: &mut String, line: &str) {
	if !region.is_empty() {
		region.push('\n');
	}
	region.push_str(line);
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn basic_block_layout() {
		let note = Note::Basic { front: "What is Rust?".into(), back: "A language".into() };
		assert_eq!(
			note.to_string(),
			"# Note\n\n## Front\n\nWhat is Rust?\n\n## Back\n\nA language\n\n"
		);
	}

	#[test]
	fn cloze_block_omits_empty_back_extra() {
		let note = Note::Cloze { text: "{{c1::Rust}} is fast".into(), back_extra: String::new() };
		assert_eq!(
			note.to_string(),
			"# Note\nmodel: Cloze\n\n## Text\n\n{{c1::Rust}} is fast\n\n## Back Extra\n\n"
		);
	}

	#[test]
	fn buffer_take_drains_both_regions() {
		let mut buffer = CardBuffer::new();
		buffer.push_front("What?");
		buffer.push_back("this");
		buffer.push_back("and that");
		assert!(buffer.has_open_question());

		let (front, back) = buffer.take();
		assert_eq!(front, "What?");
		assert_eq!(back, "this\nand that");
		assert!(!buffer.is_pending());
	}
}
