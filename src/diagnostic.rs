use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::types::warning::Warning;

/// Renders a warning as a labelled source report.
pub fn render(warning: &Warning, source_name: &str, color: bool) -> String {
	// The source holds only the offending line, so the header's own position
	// would always read 1:1. The real line number lives in the label.
	let span = 0..warning.text.len();
	let config = Config::default().with_color(color).with_index_type(IndexType::Byte);

	let mut out = Vec::new();
	let written = Report::build(ReportKind::Warning, (source_name, span.clone()))
		.with_config(config)
		.with_message(warning.message())
		.with_label(
			Label::new((source_name, span))
				.with_message(format!("line {}", warning.line))
				.with_color(Color::Yellow),
		)
		.with_help(warning.help())
		.finish()
		.write((source_name, Source::from(warning.text.as_str())), &mut out);

	match written {
		Ok(()) => String::from_utf8_lossy(&out).into_owned(),
		// Fall back to the one-line form if the report cannot be laid out
		Err(_) => warning.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::warning::WarningKind;

	#[test]
	fn report_names_the_problem_and_the_line() {
		let warning = Warning::new(WarningKind::IsolatedLine, 12, "Photosynthesis");
		let report = render(&warning, "notes.md", false);

		assert!(report.contains("Isolated line found"));
		assert!(report.contains("Photosynthesis"));
		assert!(report.contains("notes.md"));
		assert!(report.contains("line 12"));
		assert!(!report.contains("notes.md:12"));
	}

	#[test]
	fn non_ascii_line_keeps_snippet_and_help() {
		let warning = Warning::new(WarningKind::IsolatedLine, 3, "Größe über alles");
		let report = render(&warning, "notes.md", false);

		assert!(report.contains("Größe über alles"));
		assert!(report.contains("line 3"));
		assert!(report.contains(warning.help()));
	}
}
