use tracing::debug;

/// Heading title that empties the stack without being pushed itself
pub const CLEAR_MARKER: &str = "Clear section";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
	pub level: usize,
	pub title: String,
}

/// Nested heading context, strictly increasing in level from bottom to top
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SectionStack {
	sections: Vec<Section>,
}

impl SectionStack {
	pub fn new() -> Self { Self::default() }

	pub fn push(&mut self, level: usize, title: &str) {
		let is_clear = title == CLEAR_MARKER;

		if level <= 2 || is_clear {
			debug!("Clearing all sections (level {}, title {:?})", level, title);
			self.sections.clear();
		} else {
			while self.sections.last().is_some_and(|s| s.level >= level) {
				if let Some(removed) = self.sections.pop() {
					debug!("Removing section: {} (level {})", removed.title, removed.level);
				}
			}
		}

		if !is_clear {
			debug!("Adding section: {} (level {})", title, level);
			self.sections.push(Section { level, title: title.to_string() });
		}
	}

	pub fn is_empty(&self) -> bool { self.sections.is_empty() }

	pub fn sections(&self) -> &[Section] { &self.sections }

	/// Renders the `Section:` / `Sub-section:` label lines, or `None` for an
	/// empty stack.
	pub fn render(&self) -> Option<String> {
		let main = self.sections.iter().position(|s| s.level <= 2);

		let mut lines = Vec::new();
		let deeper = match main {
			Some(idx) => {
				lines.push(format!("Section: {}", self.sections[idx].title));
				&self.sections[idx + 1..]
			}
			None => &self.sections[..],
		};

		let chain = deeper
			.iter()
			.filter(|s| s.level > 2)
			.map(|s| s.title.as_str())
			.collect::<Vec<_>>()
			.join(" > ");
		if !chain.is_empty() {
			lines.push(format!("Sub-section: {}", chain));
		}

		if lines.is_empty() { None } else { Some(lines.join("\n")) }
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn top_level_heading_clears_everything() {
		let mut stack = SectionStack::new();
		stack.push(1, "Intro");
		stack.push(3, "Details");
		stack.push(1, "Again");

		assert_eq!(stack.sections(), &[Section { level: 1, title: "Again".into() }]);
	}

	#[test]
	fn deeper_heading_pops_same_or_deeper_levels() {
		let mut stack = SectionStack::new();
		stack.push(2, "Trees");
		stack.push(3, "Binary");
		stack.push(4, "Balanced");
		stack.push(3, "Heaps");

		let titles: Vec<_> = stack.sections().iter().map(|s| s.title.as_str()).collect();
		assert_eq!(titles, vec!["Trees", "Heaps"]);
	}

	#[test]
	fn clear_marker_is_never_pushed() {
		let mut stack = SectionStack::new();
		stack.push(2, "Trees");
		stack.push(4, CLEAR_MARKER);

		assert!(stack.is_empty());
		assert_eq!(stack.render(), None);
	}

	#[test]
	fn render_joins_sub_sections() {
		let mut stack = SectionStack::new();
		stack.push(2, "Trees");
		stack.push(3, "Binary");
		stack.push(4, "Balanced");

		assert_eq!(
			stack.render().as_deref(),
			Some("Section: Trees\nSub-section: Binary > Balanced")
		);
	}

	#[test]
	fn render_without_main_section() {
		let mut stack = SectionStack::new();
		stack.push(3, "Loose");

		assert_eq!(stack.render().as_deref(), Some("Sub-section: Loose"));
	}
}
