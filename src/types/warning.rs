use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
	/// A lone line with no question, cloze or list, followed by a blank line
	IsolatedLine,
	IsolatedLineAtEof,
	/// A basic note whose front is not phrased as a question
	MissingQuestionMark,
}

/// Something suspicious in the input that needs a human to sign off on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
	pub kind: WarningKind,
	/// 1-based line number the warning refers to
	pub line: usize,
	pub text: String,
}

impl Warning {
	pub fn new(kind: WarningKind, line: usize, text: impl Into<String>) -> Self {
		Self { kind, line, text: text.into() }
	}

	pub fn message(&self) -> &'static str {
		match self.kind {
			WarningKind::IsolatedLine => "Isolated line found",
			WarningKind::IsolatedLineAtEof => "Isolated line at end of file",
			WarningKind::MissingQuestionMark => "Basic note front does not end with a question mark",
		}
	}

	pub fn help(&self) -> &'static str {
		match self.kind {
			WarningKind::IsolatedLine | WarningKind::IsolatedLineAtEof => {
				"end it with `?`, add `-cloze-` markers, or join it to a neighbouring line"
			}
			WarningKind::MissingQuestionMark => "end the front with `?` or mark a cloze with `-text-`",
		}
	}
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (line {}): {}", self.message(), self.line, self.text)
	}
}
