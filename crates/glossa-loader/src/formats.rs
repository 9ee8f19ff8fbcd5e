//! File-format parsers: extension → parse-function table
//!
//! The table is explicit and passed into each loader so parsing is
//! deterministic and testable in isolation; there is no process-wide
//! format registry.

use std::collections::HashMap;
use std::path::Path;

use glossa_core::{DocValue, Document};

/// Parses one file's bytes into a generic ordered document. Errors are
/// plain messages; the loader attaches the file name.
pub type ParseFn = fn(&[u8]) -> Result<Document, String>;

/// Maps lowercase file extensions (without the dot) to parsers.
#[derive(Clone)]
pub struct FormatTable {
	parsers: HashMap<String, ParseFn>,
}

impl Default for FormatTable {
	/// The built-in set: `json`, `yml`/`yaml`, `toml`/`tml`, `ini`.
	fn default() -> Self {
		let mut table = Self {
			parsers: HashMap::new(),
		};
		table.register("json", parse_json);
		table.register("yml", parse_yaml);
		table.register("yaml", parse_yaml);
		table.register("toml", parse_toml);
		table.register("tml", parse_toml);
		table.register("ini", parse_ini);
		table
	}
}

impl FormatTable {
	/// An empty table; useful when only custom formats are wanted.
	pub fn empty() -> Self {
		Self {
			parsers: HashMap::new(),
		}
	}

	pub fn register(&mut self, extension: &str, parse: ParseFn) {
		self.parsers.insert(extension.to_lowercase(), parse);
	}

	/// The parser responsible for `path`, chosen by extension.
	pub fn for_path(&self, path: &str) -> Option<ParseFn> {
		let extension = Path::new(path).extension()?.to_str()?;
		self.parsers.get(&extension.to_lowercase()).copied()
	}

	pub fn supports(&self, path: &str) -> bool {
		self.for_path(path).is_some()
	}
}

fn parse_json(bytes: &[u8]) -> Result<Document, String> {
	let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
	match json_value(value)? {
		DocValue::Map(document) => Ok(document),
		_ => Err("top-level value must be an object".to_string()),
	}
}

fn json_value(value: serde_json::Value) -> Result<DocValue, String> {
	Ok(match value {
		serde_json::Value::Null => DocValue::Str(String::new()),
		serde_json::Value::Bool(b) => DocValue::Bool(b),
		serde_json::Value::Number(n) => match n.as_i64() {
			Some(i) => DocValue::Int(i),
			None => DocValue::Float(n.as_f64().ok_or("unrepresentable number")?),
		},
		serde_json::Value::String(s) => DocValue::Str(s),
		serde_json::Value::Array(items) => DocValue::Seq(
			items
				.into_iter()
				.map(json_value)
				.collect::<Result<Vec<_>, _>>()?,
		),
		serde_json::Value::Object(map) => {
			let mut document = Document::new();
			for (key, value) in map {
				document.insert(key, json_value(value)?);
			}
			DocValue::Map(document)
		}
	})
}

fn parse_yaml(bytes: &[u8]) -> Result<Document, String> {
	let value: serde_yaml::Value = serde_yaml::from_slice(bytes).map_err(|e| e.to_string())?;
	match yaml_value(value)? {
		DocValue::Map(document) => Ok(document),
		_ => Err("top-level value must be a mapping".to_string()),
	}
}

fn yaml_value(value: serde_yaml::Value) -> Result<DocValue, String> {
	Ok(match value {
		serde_yaml::Value::Null => DocValue::Str(String::new()),
		serde_yaml::Value::Bool(b) => DocValue::Bool(b),
		serde_yaml::Value::Number(n) => match n.as_i64() {
			Some(i) => DocValue::Int(i),
			None => DocValue::Float(n.as_f64().ok_or("unrepresentable number")?),
		},
		serde_yaml::Value::String(s) => DocValue::Str(s),
		serde_yaml::Value::Sequence(items) => DocValue::Seq(
			items
				.into_iter()
				.map(yaml_value)
				.collect::<Result<Vec<_>, _>>()?,
		),
		serde_yaml::Value::Mapping(map) => {
			let mut document = Document::new();
			for (key, value) in map {
				let key = match key {
					serde_yaml::Value::String(s) => s,
					other => return Err(format!("non-string mapping key: {other:?}")),
				};
				document.insert(key, yaml_value(value)?);
			}
			DocValue::Map(document)
		}
		serde_yaml::Value::Tagged(tagged) => return Err(format!("unsupported tag {}", tagged.tag)),
	})
}

fn parse_toml(bytes: &[u8]) -> Result<Document, String> {
	let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
	let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
	toml_table(table)
}

fn toml_table(table: toml::Table) -> Result<Document, String> {
	let mut document = Document::new();
	for (key, value) in table {
		document.insert(key, toml_value(value)?);
	}
	Ok(document)
}

fn toml_value(value: toml::Value) -> Result<DocValue, String> {
	Ok(match value {
		toml::Value::String(s) => DocValue::Str(s),
		toml::Value::Integer(i) => DocValue::Int(i),
		toml::Value::Float(f) => DocValue::Float(f),
		toml::Value::Boolean(b) => DocValue::Bool(b),
		toml::Value::Datetime(d) => DocValue::Str(d.to_string()),
		toml::Value::Array(items) => DocValue::Seq(
			items
				.into_iter()
				.map(toml_value)
				.collect::<Result<Vec<_>, _>>()?,
		),
		toml::Value::Table(table) => DocValue::Map(toml_table(table)?),
	})
}

// Minimal INI dialect: `key = value` lines, `[section]` headers whose
// dotted names nest, `;`/`#` comments, optional surrounding quotes on
// values. Everything parses as a string.
fn parse_ini(bytes: &[u8]) -> Result<Document, String> {
	let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
	let mut root = Document::new();
	let mut section: Vec<String> = Vec::new();

	for (number, raw) in text.lines().enumerate() {
		let line = raw.trim();
		if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
			continue;
		}

		if let Some(header) = line.strip_prefix('[') {
			let name = header
				.strip_suffix(']')
				.ok_or_else(|| format!("line {}: unclosed section header", number + 1))?
				.trim();
			if name.is_empty() || name.split('.').any(|part| part.trim().is_empty()) {
				return Err(format!("line {}: empty section name", number + 1));
			}
			section = name.split('.').map(|part| part.trim().to_string()).collect();
			continue;
		}

		let (key, value) = line
			.split_once('=')
			.ok_or_else(|| format!("line {}: expected key=value", number + 1))?;
		let key = key.trim();
		if key.is_empty() {
			return Err(format!("line {}: empty key", number + 1));
		}
		insert_nested(&mut root, &section, key, unquote(value.trim()));
	}

	Ok(root)
}

fn unquote(value: &str) -> String {
	let stripped = value
		.strip_prefix('"')
		.and_then(|v| v.strip_suffix('"'))
		.or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
	stripped.unwrap_or(value).to_string()
}

fn insert_nested(root: &mut Document, section: &[String], key: &str, value: String) {
	let mut level = root;
	for part in section {
		if !matches!(level.get(part.as_str()), Some(DocValue::Map(_))) {
			level.insert(part.clone(), DocValue::Map(Document::new()));
		}
		level = match level.get_mut(part.as_str()) {
			Some(DocValue::Map(inner)) => inner,
			_ => unreachable!("section level was just inserted"),
		};
	}
	level.insert(key, DocValue::Str(value));
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn json_objects_keep_key_order() {
		let document = parse_json(br#"{"b": "2", "a": "1", "nested": {"x": "y"}}"#).unwrap();
		let keys: Vec<&str> = document.keys().collect();
		assert_eq!(keys, ["b", "a", "nested"]);
		assert_eq!(document.get("a"), Some(&DocValue::Str("1".into())));
	}

	#[rstest]
	fn json_scalars_map_to_doc_values() {
		let document = parse_json(br#"{"i": 3, "f": 1.5, "t": true, "n": null}"#).unwrap();
		assert_eq!(document.get("i"), Some(&DocValue::Int(3)));
		assert_eq!(document.get("f"), Some(&DocValue::Float(1.5)));
		assert_eq!(document.get("t"), Some(&DocValue::Bool(true)));
		assert_eq!(document.get("n"), Some(&DocValue::Str(String::new())));
	}

	#[rstest]
	fn json_top_level_array_is_rejected() {
		assert!(parse_json(br#"["a"]"#).is_err());
	}

	#[rstest]
	fn yaml_nested_mappings_parse() {
		let source = b"hi: hello\nitems:\n  one: one item\n  other: \"%d items\"\n";
		let document = parse_yaml(source).unwrap();
		assert_eq!(document.get("hi"), Some(&DocValue::Str("hello".into())));
		let items = document.get("items").and_then(DocValue::as_map).unwrap();
		assert_eq!(items.get("one"), Some(&DocValue::Str("one item".into())));
	}

	#[rstest]
	fn yaml_vars_sequence_parses() {
		let source = b"Vars:\n  - Minutes:\n      one: minute\n      other: minutes\n";
		let document = parse_yaml(source).unwrap();
		assert!(matches!(document.get("Vars"), Some(DocValue::Seq(items)) if items.len() == 1));
	}

	#[rstest]
	fn toml_tables_nest() {
		let source = b"hi = \"hello\"\n\n[buy]\none = \"buy %d house\"\nother = \"buy %d houses\"\n";
		let document = parse_toml(source).unwrap();
		assert_eq!(document.get("hi"), Some(&DocValue::Str("hello".into())));
		let buy = document.get("buy").and_then(DocValue::as_map).unwrap();
		assert_eq!(buy.get("other"), Some(&DocValue::Str("buy %d houses".into())));
	}

	#[rstest]
	fn ini_sections_nest_by_dots() {
		let source = b"hi = hello\n\n[account.settings]\ntitle = \"Settings\"\n; comment\n# another\n";
		let document = parse_ini(source).unwrap();
		assert_eq!(document.get("hi"), Some(&DocValue::Str("hello".into())));
		let account = document.get("account").and_then(DocValue::as_map).unwrap();
		let settings = account.get("settings").and_then(DocValue::as_map).unwrap();
		assert_eq!(settings.get("title"), Some(&DocValue::Str("Settings".into())));
	}

	#[rstest]
	fn ini_rejects_garbage_lines() {
		assert!(parse_ini(b"no equals sign here\n").is_err());
		assert!(parse_ini(b"[unclosed\n").is_err());
	}

	#[rstest]
	fn format_table_dispatches_by_extension() {
		let table = FormatTable::default();
		assert!(table.supports("locales/en-US/home.yml"));
		assert!(table.supports("EN.JSON"));
		assert!(table.supports("el.tml"));
		assert!(!table.supports("readme.txt"));
		assert!(!table.supports("no_extension"));
	}

	#[rstest]
	fn custom_formats_can_be_registered() {
		fn parse_flat(bytes: &[u8]) -> Result<Document, String> {
			let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
			Ok(text
				.lines()
				.filter_map(|l| l.split_once(':'))
				.map(|(k, v)| (k.to_string(), DocValue::Str(v.to_string())))
				.collect())
		}

		let mut table = FormatTable::empty();
		table.register("flat", parse_flat);
		let parse = table.for_path("en.flat").unwrap();
		let document = parse(b"hi:hello").unwrap();
		assert_eq!(document.get("hi"), Some(&DocValue::Str("hello".into())));
	}
}
