//! Line classification for the note scanner.
//!
//! A cloze span is text between two hyphen delimiters, `-like this-`. A hyphen
//! is not a delimiter when it is escaped (`\-`) or stands alone between two
//! spaces (` - `), so ordinary dashes can still be written.

use crate::types::template::TemplateRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
	Blank,
	Section { level: usize, title: &'a str },
	BackExtra(&'a str),
	Cloze,
	Question,
	Continuation,
}

/// Classifies a raw line. Earlier kinds take priority over later ones.
pub fn classify(line: &str) -> LineKind<'_> {
	if line.trim().is_empty() {
		return LineKind::Blank;
	}

	if line.starts_with('#') {
		let level = line.chars().take_while(|&c| c == '#').count();
		return LineKind::Section { level, title: line[level..].trim() };
	}

	if let Some(rest) = line.strip_prefix('>') {
		return LineKind::BackExtra(rest.trim());
	}

	if is_cloze_front(line) {
		LineKind::Cloze
	} else if is_basic_front(line) {
		LineKind::Question
	} else {
		LineKind::Continuation
	}
}

/// Byte offsets of every hyphen that opens or closes a cloze span.
pub fn delimiters(text: &str) -> Vec<usize> {
	let bytes = text.as_bytes();

	bytes
		.iter()
		.enumerate()
		.filter(|&(i, &b)| {
			if b != b'-' {
				return false;
			}
			let prev = i.checked_sub(1).map(|p| bytes[p]);
			let next = bytes.get(i + 1).copied();

			prev != Some(b'\\') && !(prev == Some(b' ') && next == Some(b' '))
		})
		.map(|(i, _)| i)
		.collect()
}

pub fn is_cloze_front(text: &str) -> bool {
	// A rendered section chain is not a cloze
	if text.contains("Sub-section:") && text.contains(" > ") {
		return false;
	}

	let count = delimiters(text).len();
	count >= 2 && count % 2 == 0
}

pub fn is_basic_front(text: &str) -> bool { text.trim().ends_with('?') }

/// Flags a line that stands on its own with nothing marking it as part of a
/// card. The caller still has to check what follows it.
pub fn is_isolated_line(
	line: &str,
	front_is_empty: bool,
	previous_was_blank: bool,
	templates: &TemplateRegistry,
) -> bool {
	let line = line.trim();

	!line.is_empty()
		&& front_is_empty
		&& previous_was_blank
		&& !is_cloze_front(line)
		&& !is_basic_front(line)
		&& !templates.is_invocation(line)
		&& !line.contains(',')
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn classifies_in_priority_order() {
		assert_eq!(classify("   "), LineKind::Blank);
		assert_eq!(classify("### Trees "), LineKind::Section { level: 3, title: "Trees" });
		assert_eq!(classify("> extra -detail-"), LineKind::BackExtra("extra -detail-"));
		assert_eq!(classify("The -sun- is a star?"), LineKind::Cloze);
		assert_eq!(classify("What is a star? "), LineKind::Question);
		assert_eq!(classify("a plain line"), LineKind::Continuation);
	}

	#[test]
	fn escaped_and_spaced_hyphens_are_not_delimiters() {
		assert_eq!(delimiters(r"a \-b\- c"), Vec::<usize>::new());
		assert_eq!(delimiters("one - two"), Vec::<usize>::new());
		assert_eq!(delimiters("-x-"), vec![0, 2]);
		assert!(!is_cloze_front(r"well\-known \-ish"));
	}

	#[test]
	fn cloze_needs_even_non_zero_delimiters() {
		assert!(!is_cloze_front("well-known"));
		assert!(is_cloze_front("-a- and -b-"));
		assert!(!is_cloze_front("-a- and -b"));
		assert!(!is_cloze_front("Sub-section: a-b > c-d"));
	}

	#[test]
	fn isolated_line_heuristic() {
		let mut templates = TemplateRegistry::new();
		templates.parse_definition("def: What is {}? | {}");

		assert!(is_isolated_line("Lonely words", true, true, &templates));
		assert!(!is_isolated_line("Lonely words", false, true, &templates));
		assert!(!is_isolated_line("Lonely words", true, false, &templates));
		assert!(!is_isolated_line("apples, pears", true, true, &templates));
		assert!(!is_isolated_line("def Algorithm", true, true, &templates));
		assert!(!is_isolated_line("Why?", true, true, &templates));
		assert!(!is_isolated_line("", true, true, &templates));
	}
}
