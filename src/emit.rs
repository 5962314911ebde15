use std::{collections::HashMap, io::Write};

use tracing::{debug, instrument};

use crate::{classify::delimiters, confirm::Confirm, error::{ConvertError, Result}, types::{note::Note, section::SectionStack, warning::{Warning, WarningKind}}};

const SECTION_PREFIX: &str = "Section:";

/// Cloze numbers for a single note. Grouped spans share the number their group
/// was first given; everything draws from the same counter.
#[derive(Debug, Default)]
struct ClozeNumbering {
	counter: u32,
	groups:  HashMap<char, u32>,
}

impl ClozeNumbering {
	fn next(&mut self) -> u32 {
		self.counter += 1;
		self.counter
	}

	fn for_group(&mut self, key: char) -> u32 {
		if let Some(&number) = self.groups.get(&key) {
			return number;
		}
		let number = self.next();
		self.groups.insert(key, number);
		number
	}
}

fn unescape(text: &str) -> String { text.replace("\\-", "-") }

/// A single-character group label directly before the opening hyphen, as in
/// `1.-cat-`. Returns the label and the text with `1.` removed.
fn split_group_label(before: &str) -> Option<(char, &str)> {
	let without_dot = before.strip_suffix('.')?;
	let key = without_dot.chars().next_back()?;
	if key.is_whitespace() {
		return None;
	}
	Some((key, &without_dot[..without_dot.len() - key.len_utf8()]))
}

/// Turns `-span-` pairs into numbered `{{cN::span}}` deletions.
pub fn number_clozes(text: &str) -> String {
	let mut numbering = ClozeNumbering::default();
	let mut out = String::with_capacity(text.len() + 16);
	let mut cursor = 0;

	for pair in delimiters(text).chunks_exact(2) {
		let (start, end) = (pair[0], pair[1]);
		let before = &text[cursor..start];
		let span = &text[start + 1..end];

		let number = match split_group_label(before) {
			Some((key, rest)) => {
				out.push_str(&unescape(rest));
				numbering.for_group(key)
			}
			None => {
				out.push_str(&unescape(before));
				numbering.next()
			}
		};

		debug!("Cloze c{} for {:?}", number, span);
		out.push_str(&format!("{{{{c{}::{}}}}}", number, unescape(span)));
		cursor = end + 1;
	}

	// An unmatched hyphen is left as written
	out.push_str(&unescape(&text[cursor..]));
	out
}

fn with_section_label(content: &str, sections: &SectionStack) -> String {
	match sections.render() {
		Some(label) if !content.starts_with(SECTION_PREFIX) => format!("{}\n\n{}", label, content),
		_ => content.to_string(),
	}
}

/// Writes finished notes to the output stream
pub struct NoteEmitter<W: Write> {
	writer:  W,
	written: usize,
}

impl<W: Write> NoteEmitter<W> {
	pub fn new(writer: W) -> Self { Self { writer, written: 0 } }

	/// Number of note blocks written so far
	pub fn written(&self) -> usize { self.written }

	/// Writes a question/answer note. A front that is not a question needs a
	/// confirmation first.
	#[instrument(skip(self, back, sections, confirm))]
	pub fn emit_basic(
		&mut self,
		front: &str,
		back: &str,
		sections: &SectionStack,
		line: usize,
		confirm: &mut dyn Confirm,
	) -> Result<()> {
		let front = front.trim();
		if !front.ends_with('?') {
			let warning = Warning::new(WarningKind::MissingQuestionMark, line, front);
			if !confirm.confirm(&warning) {
				return Err(ConvertError::UserAborted(warning.to_string()));
			}
		}

		self.write(&Note::Basic {
			front: with_section_label(&unescape(front), sections),
			back:  unescape(back.trim()),
		})
	}

	#[instrument(skip(self, back_extra, sections))]
	pub fn emit_cloze(&mut self, front: &str, back_extra: &str, sections: &SectionStack) -> Result<()> {
		let text = number_clozes(front.trim());

		self.write(&Note::Cloze {
			text:       with_section_label(&text, sections),
			back_extra: unescape(back_extra.trim()),
		})
	}

	fn write(&mut self, note: &Note) -> Result<()> {
		debug!("Writing {} note", if note.is_cloze() { "cloze" } else { "basic" });
		write!(self.writer, "{}", note)?;
		self.written += 1;
		Ok(())
	}

	/// Flushes and hands back the writer.
	pub fn finish(mut self) -> Result<W> {
		self.writer.flush()?;
		Ok(self.writer)
	}
}
