use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::error::{ConvertError, Result};

pub const PLACEHOLDER: &str = "{}";

/// Splits the last parameter on commas and numbers each item as its own cloze
pub const GROUPED_CLOZE: &str = "-{,}-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
	pub name:              String,
	pub body:              String,
	pub has_grouped_cloze: bool,
}

/// Named line templates, collected once from the lines after the deck
/// declaration.
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
	templates: BTreeMap<String, Template>,
}

impl TemplateRegistry {
	pub fn new() -> Self { Self::default() }

	pub fn is_empty(&self) -> bool { self.templates.is_empty() }

	pub fn len(&self) -> usize { self.templates.len() }

	pub fn get(&self, name: &str) -> Option<&Template> { self.templates.get(name) }

	pub fn iter(&self) -> impl Iterator<Item = &Template> { self.templates.values() }

	/// Registers `name: body` when the body has at least one placeholder.
	pub fn parse_definition(&mut self, line: &str) -> bool {
		let Some((name, body)) = line.split_once(':') else {
			return false;
		};

		let name = name.trim();
		let body = body.trim();
		if name.is_empty() || !body.contains(PLACEHOLDER) {
			return false;
		}

		debug!("Registered template {:?}: {:?}", name, body);
		self.templates.insert(name.to_string(), Template {
			name:              name.to_string(),
			body:              body.to_string(),
			has_grouped_cloze: body.contains(GROUPED_CLOZE),
		});
		true
	}

	/// Finds the template a line invokes. The longest name wins when several
	/// are prefixes of the line.
	pub fn match_line(&self, line: &str) -> Option<&str> {
		let line = line.trim();
		self
			.templates
			.keys()
			.filter(|name| {
				line.strip_prefix(name.as_str()).is_some_and(|rest| rest.starts_with(' '))
			})
			.max_by_key(|name| name.len())
			.map(String::as_str)
	}

	/// Whether the trimmed line starts with any registered name followed by a
	/// space.
	pub fn is_invocation(&self, line: &str) -> bool { self.match_line(line).is_some() }

	#[instrument(skip(self))]
	pub fn expand(&self, name: &str, params: &[String]) -> Result<String> {
		let template =
			self.templates.get(name).ok_or_else(|| ConvertError::TemplateNotFound(name.to_string()))?;

		if !template.has_grouped_cloze || params.is_empty() {
			return Ok(fill_placeholders(&template.body, &mut params.iter()));
		}

		let (positional, last) = params.split_at(params.len() - 1);
		let clozes = last[0]
			.split(',')
			.enumerate()
			.map(|(i, item)| format!("{{{{c{}::{}}}}}", i + 1, item.trim()))
			.collect::<Vec<_>>()
			.join(", ");

		let (head, tail) = template.body.split_once(GROUPED_CLOZE).unwrap_or((template.body.as_str(), ""));

		let mut positional = positional.iter();
		let mut result = fill_placeholders(head, &mut positional);
		result.push_str(&clozes);
		result.push_str(&fill_placeholders(tail, &mut positional));
		Ok(result)
	}
}

/// Substitutes placeholders left to right. Missing parameters leave the
/// placeholder in place; extra parameters are dropped.
fn fill_placeholders<'p>(body: &str, params: &mut impl Iterator<Item = &'p String>) -> String {
	let mut parts = body.split(PLACEHOLDER);
	let mut result = parts.next().unwrap_or_default().to_string();

	for part in parts {
		match params.next() {
			Some(param) => result.push_str(param),
			None => result.push_str(PLACEHOLDER),
		}
		result.push_str(part);
	}

	result
}

/// Parameters given on the invocation line itself: everything after the
/// template name, split on `|` when present.
pub fn inline_params(line: &str, name: &str) -> Vec<String> {
	let line = line.trim();
	let content = line.strip_prefix(name).unwrap_or(line).trim();

	if content.contains('|') {
		content.split('|').map(str::trim).filter(|p| !p.is_empty()).map(String::from).collect()
	} else if content.is_empty() {
		Vec::new()
	} else {
		vec![content.to_string()]
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn registry(definitions: &[&str]) -> TemplateRegistry {
		let mut registry = TemplateRegistry::new();
		for definition in definitions {
			assert!(registry.parse_definition(definition), "rejected {definition}");
		}
		registry
	}

	fn params(values: &[&str]) -> Vec<String> { values.iter().map(|v| v.to_string()).collect() }

	#[test]
	fn definition_requires_placeholder() {
		let mut registry = TemplateRegistry::new();
		assert!(!registry.parse_definition("note: nothing to fill"));
		assert!(!registry.parse_definition("no colon {} here"));
		assert!(!registry.parse_definition(": {}"));
		assert!(registry.is_empty());
	}

	#[test]
	fn definition_detects_grouped_cloze() {
		let registry = registry(&["def: What is {}? | {}", "ex: {} examples of {} are -{,}-"]);
		assert!(!registry.get("def").unwrap().has_grouped_cloze);
		assert!(registry.get("ex").unwrap().has_grouped_cloze);
	}

	#[test]
	fn expands_plain_template() {
		let registry = registry(&["def: What is {}? | {}"]);
		let result =
			registry.expand("def", &params(&["Algorithm", "A step-by-step procedure"])).unwrap();
		assert_eq!(result, "What is Algorithm? | A step-by-step procedure");
	}

	#[test]
	fn expands_grouped_cloze_template() {
		let registry = registry(&["ex: {} examples of {} are -{,}-"]);
		let result = registry
			.expand("ex", &params(&["3", "Binary Tree", "BST, AVL Tree, Red-Black Tree"]))
			.unwrap();
		assert_eq!(
			result,
			"3 examples of Binary Tree are {{c1::BST}}, {{c2::AVL Tree}}, {{c3::Red-Black Tree}}"
		);
	}

	#[test]
	fn grouped_token_can_precede_placeholders() {
		let registry = registry(&["rev: -{,}- are examples of {}"]);
		let result = registry.expand("rev", &params(&["trees", "oak, elm"])).unwrap();
		assert_eq!(result, "{{c1::oak}}, {{c2::elm}} are examples of trees");
	}

	#[test]
	fn missing_params_stay_literal_and_extras_are_dropped() {
		let registry = registry(&["pair: {} and {}"]);
		assert_eq!(registry.expand("pair", &params(&["one"])).unwrap(), "one and {}");
		assert_eq!(registry.expand("pair", &params(&["a", "b", "c"])).unwrap(), "a and b");
	}

	#[test]
	fn unknown_template_is_an_error() {
		let registry = TemplateRegistry::new();
		assert!(matches!(registry.expand("nope", &[]), Err(ConvertError::TemplateNotFound(name)) if name == "nope"));
	}

	#[test]
	fn match_requires_trailing_space_and_prefers_longest() {
		let registry = registry(&["d: {}", "def: {}"]);
		assert_eq!(registry.match_line("  def Algorithm"), Some("def"));
		assert_eq!(registry.match_line("d thing"), Some("d"));
		assert_eq!(registry.match_line("define"), None);
	}

	#[test]
	fn inline_params_split_on_pipe() {
		assert_eq!(inline_params("ex 3 | Binary Tree | ", "ex"), params(&["3", "Binary Tree"]));
		assert_eq!(inline_params("def Algorithm", "def"), params(&["Algorithm"]));
		assert!(inline_params("def ", "def").is_empty());
	}
}
