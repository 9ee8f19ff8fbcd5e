//! Message variables: `${Name}` placeholders with per-form cases
//!
//! A variable is declared under the reserved `Vars` key of a document level
//! and referenced as `${Name}` inside message texts. Its argument position
//! (`argth`) is not the declaration order but the order of first textual
//! occurrence; declared variables never referenced in the text are dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{DocValue, Document};
use crate::error::{Error, RenderError};
use crate::fmt::sprintf;
use crate::plural::PluralForm;
use crate::value::Value;

/// Default case format when a variable declares none.
pub const DEFAULT_VAR_FORMAT: &str = "%d";

/// Reserved document key introducing variable declarations.
pub const VARS_KEY: &str = "Vars";

static VAR_TOKEN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("variable token pattern"));

/// A named, positionally-ordered template placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
	pub name: String,
	/// The token as it appears in source text, e.g. `${Houses}`.
	pub literal: String,
	/// Per-plural-form case texts, kept sorted by form priority.
	pub cases: Vec<(PluralForm, String)>,
	/// Format verb applied to the resolved count, default `%d`.
	pub format: String,
	/// 1-based argument position, assigned from first textual occurrence.
	pub argth: usize,
}

impl Var {
	fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			literal: format!("${{{name}}}"),
			cases: Vec::new(),
			format: DEFAULT_VAR_FORMAT.to_string(),
			argth: 1,
		}
	}

	/// Decodes one declaration from the value under a variable's name.
	///
	/// The value must be a map: an optional `format` entry plus case texts
	/// keyed by plural-form tokens. Keys that are neither are skipped.
	fn from_doc(message_key: &str, name: &str, value: &DocValue) -> Result<Self, Error> {
		let map = value.as_map().ok_or_else(|| Error::Variable {
			key: message_key.to_string(),
			name: name.to_string(),
			message: "declaration must be a map".to_string(),
		})?;

		let mut var = Var::new(name);
		for (k, v) in map.iter() {
			if k == "format" {
				var.format = v.as_text().ok_or_else(|| Error::Variable {
					key: message_key.to_string(),
					name: name.to_string(),
					message: "format must be a scalar".to_string(),
				})?;
				continue;
			}

			if let Some(form) = PluralForm::parse(k) {
				let text = v.as_text().ok_or_else(|| Error::Variable {
					key: message_key.to_string(),
					name: name.to_string(),
					message: format!("case '{k}' must be a scalar"),
				})?;
				var.cases.push((form, text));
			}
			// anything else is ignored, declarations are permissive
		}

		var.cases.sort_by(|a, b| a.0.cmp(&b.0));
		Ok(var)
	}

	/// Renders this variable for a resolved count: the first matching case
	/// wins, otherwise the bare format is applied to the count.
	pub fn render(&self, count: i64) -> Result<String, RenderError> {
		let args = [Value::Int(count)];
		for (form, text) in &self.cases {
			if form.match_plural(count) {
				return sprintf(text, &args);
			}
		}
		sprintf(&self.format, &args)
	}
}

/// Decodes a `Vars` value: either a list of single-entry maps (the usual
/// YAML layout) or one map of declarations.
pub fn parse_vars(message_key: &str, value: &DocValue) -> Result<Vec<Var>, Error> {
	let mut vars = Vec::new();
	match value {
		DocValue::Seq(items) => {
			for item in items {
				let map = item.as_map().ok_or_else(|| Error::UnsupportedValue {
					key: format!("{message_key}.{VARS_KEY}"),
				})?;
				for (name, decl) in map.iter() {
					vars.push(Var::from_doc(message_key, name, decl)?);
				}
			}
		}
		DocValue::Map(map) => {
			for (name, decl) in map.iter() {
				vars.push(Var::from_doc(message_key, name, decl)?);
			}
		}
		_ => {
			return Err(Error::UnsupportedValue {
				key: format!("{message_key}.{VARS_KEY}"),
			});
		}
	}
	Ok(vars)
}

/// Consumes and decodes the reserved `Vars` entry of a document level,
/// if present.
pub fn take_vars(message_key: &str, level: &mut Document) -> Result<Vec<Var>, Error> {
	match level.remove(VARS_KEY) {
		Some(value) => parse_vars(message_key, &value),
		None => Ok(Vec::new()),
	}
}

/// Orders `vars` by first occurrence of their token in `text`, assigning
/// 1-based `argth` positions (shifted by one inside plural messages, where
/// the plural count occupies the first position). Unreferenced variables
/// are dropped, duplicate names keep their first assignment.
pub fn sort_vars(text: &str, vars: &[Var], inside_plural: bool) -> Vec<Var> {
	let mut ordered: Vec<Var> = Vec::new();
	let offset = usize::from(inside_plural);

	for captures in VAR_TOKEN.captures_iter(text) {
		let name = &captures[1];
		if ordered.iter().any(|v| v.name == name) {
			continue;
		}
		if let Some(var) = vars.iter().find(|v| v.name == name) {
			let mut var = var.clone();
			var.argth = ordered.len() + 1 + offset;
			ordered.push(var);
		}
	}

	ordered
}

/// Prepends `local` declarations to `shared` ones, de-duplicated by name
/// with the first occurrence winning (message-local declarations shadow
/// locale-shared ones).
pub fn merge_vars(local: Vec<Var>, shared: &[Var]) -> Vec<Var> {
	let mut merged = local;
	for var in shared {
		if !merged.iter().any(|v| v.name == var.name) {
			merged.push(var.clone());
		}
	}
	merged
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::document::doc;
	use rstest::rstest;

	fn declared(names: &[&str]) -> Vec<Var> {
		names.iter().map(|n| Var::new(n)).collect()
	}

	#[rstest]
	fn argth_follows_text_occurrence_not_declaration_order() {
		let vars = declared(&["A", "B"]);
		let sorted = sort_vars("${B} and ${A}", &vars, false);
		assert_eq!(sorted.len(), 2);
		assert_eq!((sorted[0].name.as_str(), sorted[0].argth), ("B", 1));
		assert_eq!((sorted[1].name.as_str(), sorted[1].argth), ("A", 2));
	}

	#[rstest]
	fn unreferenced_vars_are_dropped() {
		let vars = declared(&["A", "B", "C"]);
		let sorted = sort_vars("only ${B} here", &vars, false);
		assert_eq!(sorted.len(), 1);
		assert_eq!(sorted[0].name, "B");
	}

	#[rstest]
	fn duplicate_occurrences_keep_first_assignment() {
		let vars = declared(&["A"]);
		let sorted = sort_vars("${A} then ${A} again", &vars, false);
		assert_eq!(sorted.len(), 1);
		assert_eq!(sorted[0].argth, 1);
	}

	#[rstest]
	fn plural_messages_shift_positions_by_one() {
		let vars = declared(&["N"]);
		let sorted = sort_vars("You have ${N} items", &vars, true);
		assert_eq!(sorted[0].argth, 2);
	}

	#[rstest]
	fn unknown_tokens_are_ignored() {
		let vars = declared(&["A"]);
		let sorted = sort_vars("${Nope} and ${A}", &vars, false);
		assert_eq!(sorted.len(), 1);
		assert_eq!((sorted[0].name.as_str(), sorted[0].argth), ("A", 1));
	}

	#[rstest]
	fn merge_prefers_local_declarations() {
		let mut local = Var::new("N");
		local.format = "%s".to_string();
		let shared = vec![Var::new("N"), Var::new("Site")];

		let merged = merge_vars(vec![local], &shared);
		assert_eq!(merged.len(), 2);
		assert_eq!(merged[0].name, "N");
		assert_eq!(merged[0].format, "%s");
		assert_eq!(merged[1].name, "Site");
	}

	#[rstest]
	fn decodes_declaration_with_cases_and_format() {
		let decl = DocValue::Map(doc([
			("one", "house"),
			("other", "houses"),
			("format", "%d"),
		]));
		let var = Var::from_doc("msg", "Houses", &decl).unwrap();
		assert_eq!(var.literal, "${Houses}");
		assert_eq!(var.cases.len(), 2);
		assert_eq!(var.render(1).unwrap(), "house");
		assert_eq!(var.render(3).unwrap(), "houses");
	}

	#[rstest]
	fn case_text_may_format_the_count() {
		let decl = DocValue::Map(doc([("one", "one dog"), ("other", "%d dogs")]));
		let var = Var::from_doc("msg", "Dogs", &decl).unwrap();
		assert_eq!(var.render(4).unwrap(), "4 dogs");
	}

	#[rstest]
	fn caseless_variable_applies_bare_format() {
		let decl = DocValue::Map(doc([("format", "%d")]));
		let var = Var::from_doc("msg", "N", &decl).unwrap();
		assert_eq!(var.render(7).unwrap(), "7");
	}

	#[rstest]
	fn cases_are_priority_sorted_on_decode() {
		let decl = DocValue::Map(doc([("other", "rest"), ("=0", "none"), ("one", "single")]));
		let var = Var::from_doc("msg", "X", &decl).unwrap();
		let forms: Vec<String> = var.cases.iter().map(|(f, _)| f.to_string()).collect();
		assert_eq!(forms, vec!["=0", "one", "other"]);
		assert_eq!(var.render(0).unwrap(), "none");
	}

	#[rstest]
	fn vars_list_of_single_entry_maps() {
		let value = DocValue::Seq(vec![
			DocValue::Map(doc([(
				"Houses",
				DocValue::Map(doc([("one", "house"), ("other", "houses")])),
			)])),
			DocValue::Map(doc([(
				"Dogs",
				DocValue::Map(doc([("one", "dog"), ("other", "dogs")])),
			)])),
		]);
		let vars = parse_vars("msg", &value).unwrap();
		assert_eq!(vars.len(), 2);
		assert_eq!(vars[0].name, "Houses");
		assert_eq!(vars[1].name, "Dogs");
	}

	#[rstest]
	fn scalar_vars_value_is_rejected() {
		let err = parse_vars("msg", &DocValue::Str("nope".into())).unwrap_err();
		assert!(matches!(err, Error::UnsupportedValue { key } if key == "msg.Vars"));
	}

	#[rstest]
	fn take_vars_consumes_the_reserved_key() {
		let mut level = doc([("greet", "hello")]);
		level.insert(
			VARS_KEY,
			DocValue::Seq(vec![DocValue::Map(doc([(
				"N",
				DocValue::Map(doc([("format", "%d")])),
			)]))]),
		);

		let vars = take_vars("root", &mut level).unwrap();
		assert_eq!(vars.len(), 1);
		assert!(level.get(VARS_KEY).is_none());
		assert!(level.get("greet").is_some());
	}
}
