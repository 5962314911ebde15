//! The single forward scan that turns study notes into note blocks.
//!
//! Lines are pulled lazily from a [`LineSource`]. Anything the scanner reads
//! ahead of time (template parameters, the isolated-line check, the line that
//! ends template collection) is either consumed or pushed back, so every line
//! is classified exactly once.

use std::{io::{self, BufRead, BufReader, BufWriter, Write}, path::Path};

use tracing::{debug, info, instrument, warn};

use crate::{classify::{LineKind, classify, is_cloze_front, is_isolated_line}, confirm::Confirm, emit::NoteEmitter, error::{ConvertError, Result}, types::{note::CardBuffer, section::SectionStack, template::{TemplateRegistry, inline_params}, warning::{Warning, WarningKind}}};

const DECK_MARKER: &str = "# deck:";

/// Lines with 1-based numbers and a pushback stack
pub struct LineSource<R: BufRead> {
	lines:    io::Lines<R>,
	pushback: Vec<(usize, String)>,
	line_no:  usize,
}

impl<R: BufRead> LineSource<R> {
	pub fn new(reader: R) -> Self { Self { lines: reader.lines(), pushback: Vec::new(), line_no: 0 } }

	pub fn next_line(&mut self) -> Result<Option<(usize, String)>> {
		if let Some(entry) = self.pushback.pop() {
			return Ok(Some(entry));
		}

		match self.lines.next() {
			Some(line) => {
				self.line_no += 1;
				Ok(Some((self.line_no, line?)))
			}
			None => Ok(None),
		}
	}

	pub fn push_back(&mut self, line_no: usize, line: String) { self.pushback.push((line_no, line)) }
}

/// Scans forward to the `# deck:` line (case-insensitive) and returns the deck
/// name. Lines before it are skipped.
#[instrument(skip(source))]
pub fn find_deck<R: BufRead>(source: &mut LineSource<R>) -> Result<String> {
	while let Some((line_no, line)) = source.next_line()? {
		let trimmed = line.trim_start();
		let is_marker = trimmed.get(..DECK_MARKER.len()).is_some_and(|p| p.eq_ignore_ascii_case(DECK_MARKER));
		if !is_marker {
			continue;
		}

		let name = trimmed[DECK_MARKER.len()..].trim();
		if name.is_empty() {
			break;
		}
		info!("Found deck {:?} on line {}", name, line_no);
		return Ok(name.to_string());
	}

	Err(ConvertError::MissingDeckDeclaration)
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
	pub deck:  String,
	pub notes: usize,
}

/// Converts in-memory input. Nothing is written when the deck line is
/// missing.
pub fn convert<R: BufRead, W: Write, C: Confirm>(reader: R, writer: W, confirm: C) -> Result<Conversion> {
	let mut source = LineSource::new(reader);
	let deck = find_deck(&mut source)?;
	let notes = Converter::new(source, writer, confirm).run()?;
	Ok(Conversion { deck, notes })
}

/// Converts `input` into `output`. The output file is only created once the
/// deck line has been found.
#[instrument(skip(confirm))]
pub fn convert_file<C: Confirm>(input: &Path, output: &Path, confirm: C) -> Result<Conversion> {
	info!("Starting conversion: {:?} -> {:?}", input, output);

	let mut source = LineSource::new(BufReader::new(fs_err::File::open(input)?));
	let deck = find_deck(&mut source)?;

	let writer = BufWriter::new(fs_err::File::create(output)?);
	let notes = Converter::new(source, writer, confirm).run()?;

	info!("Wrote {} notes for deck {:?}", notes, deck);
	Ok(Conversion { deck, notes })
}

/// Parser state for one conversion
pub struct Converter<R: BufRead, W: Write, C: Confirm> {
	source:         LineSource<R>,
	emitter:        NoteEmitter<W>,
	confirm:        C,
	sections:       SectionStack,
	templates:      TemplateRegistry,
	card:           CardBuffer,
	// Line the pending card started on, for warnings
	card_line:      usize,
	previous_blank: bool,
}

impl<R: BufRead, W: Write, C: Confirm> Converter<R, W, C> {
	/// `source` must already be positioned after the deck line.
	pub fn new(source: LineSource<R>, writer: W, confirm: C) -> Self {
		Self {
			source,
			emitter: NoteEmitter::new(writer),
			confirm,
			sections: SectionStack::new(),
			templates: TemplateRegistry::new(),
			card: CardBuffer::new(),
			card_line: 0,
			previous_blank: true,
		}
	}

	/// Runs the scan to the end of input and returns the number of notes
	/// written.
	pub fn run(mut self) -> Result<usize> {
		self.collect_templates()?;

		while let Some((line_no, line)) = self.source.next_line()? {
			self.process_line(line_no, &line)?;
		}

		self.flush()?;
		let written = self.emitter.written();
		self.emitter.finish()?;
		Ok(written)
	}

	/// Registers the definitions directly after the deck line. The first line
	/// that is not one goes back to the scan.
	fn collect_templates(&mut self) -> Result<()> {
		debug!("Starting template collection phase");

		while let Some((line_no, line)) = self.source.next_line()? {
			if line.trim().is_empty() || !self.templates.parse_definition(&line) {
				self.source.push_back(line_no, line);
				break;
			}
		}

		for template in self.templates.iter() {
			debug!(
				"Template: {}, Content: {}, Has Cloze: {}",
				template.name, template.body, template.has_grouped_cloze
			);
		}
		info!("Collected {} templates", self.templates.len());
		Ok(())
	}

	fn process_line(&mut self, line_no: usize, line: &str) -> Result<()> {
		if !line.trim().is_empty() {
			if let Some(name) = self.templates.match_line(line).map(str::to_string) {
				if self.apply_template(line_no, &name, line)? {
					return Ok(());
				}
			}
		}

		let kind = classify(line);
		debug!("Line {}: {:?}", line_no, kind);

		match kind {
			LineKind::Blank => self.flush()?,

			LineKind::Section { level, title } => {
				self.flush()?;
				self.sections.push(level, title);
			}

			LineKind::BackExtra(extra) => self.push_back_text(line_no, extra),

			LineKind::Cloze => {
				if self.card.has_open_question() {
					self.push_back_text(line_no, line);
				} else {
					self.push_front_text(line_no, line);
				}
			}

			LineKind::Question => {
				self.flush()?;
				self.push_front_text(line_no, line);
			}

			LineKind::Continuation => {
				if self.card.has_open_question() {
					self.push_back_text(line_no, line);
				} else {
					self.check_isolated(line_no, line)?;
					self.push_front_text(line_no, line);
				}
			}
		}

		self.previous_blank = kind == LineKind::Blank;
		Ok(())
	}

	/// Asks for confirmation when a line stands alone between blank lines.
	/// The line after it is pushed back either way.
	fn check_isolated(&mut self, line_no: usize, line: &str) -> Result<()> {
		if !is_isolated_line(line, self.card.front().is_empty(), self.previous_blank, &self.templates) {
			return Ok(());
		}

		let kind = match self.source.next_line()? {
			None => WarningKind::IsolatedLineAtEof,
			Some((next_no, next)) => {
				let next_blank = next.trim().is_empty();
				self.source.push_back(next_no, next);
				if !next_blank {
					return Ok(());
				}
				WarningKind::IsolatedLine
			}
		};

		let warning = Warning::new(kind, line_no, line.trim());
		warn!("{}", warning);
		if !self.confirm.confirm(&warning) {
			return Err(ConvertError::UserAborted(warning.to_string()));
		}
		Ok(())
	}

	/// Collects the parameters of a template invocation, expands it and writes
	/// the result as its own note. Returns `false` if the template is unknown.
	fn apply_template(&mut self, line_no: usize, name: &str, line: &str) -> Result<bool> {
		// Resolve before any parameter line is consumed
		if self.templates.get(name).is_none() {
			debug!("Template {:?} not found; treating line as content", name);
			return Ok(false);
		}

		let mut params = inline_params(line, name);

		while let Some((_, next)) = self.source.next_line()? {
			let next = next.trim();
			if next.is_empty() {
				break;
			}
			params.push(next.to_string());
		}

		// Hyphens typed as parameters are text, not cloze markers. Already
		// escaped ones are normalised first so they are escaped exactly once.
		let params: Vec<String> =
			params.iter().map(|p| p.replace("\\-", "-").replace('-', "\\-")).collect();

		let result = self.templates.expand(name, &params)?;

		self.flush()?;
		debug!("Template {:?} expanded to {:?}", name, result);

		if result.contains("{{c") || is_cloze_front(&result) {
			self.emitter.emit_cloze(&result, "", &self.sections)?;
		} else {
			let (front, back) = result.split_once('|').unwrap_or((result.as_str(), ""));
			self.emitter.emit_basic(front, back, &self.sections, line_no, &mut self.confirm)?;
		}

		self.previous_blank = true;
		Ok(true)
	}

	fn push_front_text(&mut self, line_no: usize, text: &str) {
		self.mark_start(line_no);
		self.card.push_front(text);
	}

	fn push_back_text(&mut self, line_no: usize, text: &str) {
		self.mark_start(line_no);
		self.card.push_back(text);
	}

	fn mark_start(&mut self, line_no: usize) {
		if !self.card.is_pending() {
			self.card_line = line_no;
		}
	}

	/// Writes the pending card, if any, and empties the buffer.
	fn flush(&mut self) -> Result<()> {
		if !self.card.is_pending() {
			return Ok(());
		}

		let (front, back) = self.card.take();
		if is_cloze_front(&front) {
			self.emitter.emit_cloze(&front, &back, &self.sections)
		} else {
			self.emitter.emit_basic(&front, &back, &self.sections, self.card_line, &mut self.confirm)
		}
	}
}
