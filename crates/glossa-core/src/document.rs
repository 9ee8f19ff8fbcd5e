//! Generic ordered key/value translation documents
//!
//! Concrete file-format parsers live outside the engine; they only need to
//! produce this shape. Key order is preserved so flattening and variable
//! declaration order stay deterministic across loads.

use indexmap::IndexMap;

/// An ordered map of translation keys to values, one per document level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
	entries: IndexMap<String, DocValue>,
}

/// A single document value.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
	Str(String),
	Int(i64),
	Float(f64),
	Bool(bool),
	Map(Document),
	Seq(Vec<DocValue>),
}

impl Document {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, replacing any previous entry for `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: DocValue) {
		self.entries.insert(key.into(), value);
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut DocValue> {
		self.entries.get_mut(key)
	}

	pub fn get(&self, key: &str) -> Option<&DocValue> {
		self.entries.get(key)
	}

	/// Removes and returns the value for `key`, preserving the order of the
	/// remaining entries.
	pub fn remove(&mut self, key: &str) -> Option<DocValue> {
		self.entries.shift_remove(key)
	}

	pub fn into_entries(self) -> impl Iterator<Item = (String, DocValue)> {
		self.entries.into_iter()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &DocValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Deep-merges `other` into this document.
	///
	/// Map values merge recursively; everything else from `other` replaces
	/// the existing entry. Used when one language is spread across several
	/// files: later files win.
	pub fn merge(&mut self, other: Document) {
		for (key, value) in other.entries {
			match (self.entries.get_mut(&key), value) {
				(Some(DocValue::Map(existing)), DocValue::Map(incoming)) => {
					existing.merge(incoming);
				}
				(_, value) => {
					self.entries.insert(key, value);
				}
			}
		}
	}
}

impl FromIterator<(String, DocValue)> for Document {
	fn from_iter<I: IntoIterator<Item = (String, DocValue)>>(iter: I) -> Self {
		Self {
			entries: IndexMap::from_iter(iter),
		}
	}
}

impl DocValue {
	/// String form for scalar values; `None` for maps and sequences.
	pub fn as_text(&self) -> Option<String> {
		match self {
			DocValue::Str(s) => Some(s.clone()),
			DocValue::Int(n) => Some(n.to_string()),
			DocValue::Float(v) => Some(v.to_string()),
			DocValue::Bool(b) => Some(b.to_string()),
			DocValue::Map(_) | DocValue::Seq(_) => None,
		}
	}

	pub fn as_map(&self) -> Option<&Document> {
		match self {
			DocValue::Map(m) => Some(m),
			_ => None,
		}
	}
}

impl From<&str> for DocValue {
	fn from(s: &str) -> Self {
		DocValue::Str(s.to_string())
	}
}

impl From<String> for DocValue {
	fn from(s: String) -> Self {
		DocValue::Str(s)
	}
}

impl From<Document> for DocValue {
	fn from(d: Document) -> Self {
		DocValue::Map(d)
	}
}

/// Builds a document from key/value pairs, keeping order.
pub fn doc<I, K, V>(pairs: I) -> Document
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<DocValue>,
{
	pairs
		.into_iter()
		.map(|(k, v)| (k.into(), v.into()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn preserves_insertion_order() {
		let d = doc([("b", "2"), ("a", "1"), ("c", "3")]);
		let keys: Vec<&str> = d.keys().collect();
		assert_eq!(keys, vec!["b", "a", "c"]);
	}

	#[rstest]
	fn remove_keeps_remaining_order() {
		let mut d = doc([("a", "1"), ("b", "2"), ("c", "3")]);
		assert_eq!(d.remove("b"), Some(DocValue::Str("2".into())));
		let keys: Vec<&str> = d.keys().collect();
		assert_eq!(keys, vec!["a", "c"]);
	}

	#[rstest]
	fn merge_is_deep_for_maps() {
		let mut base = Document::new();
		base.insert("buttons", DocValue::Map(doc([("ok", "OK"), ("cancel", "Cancel")])));
		base.insert("title", DocValue::from("Home"));

		let mut incoming = Document::new();
		incoming.insert("buttons", DocValue::Map(doc([("cancel", "Abort")])));

		base.merge(incoming);

		let buttons = base.get("buttons").unwrap().as_map().unwrap();
		assert_eq!(buttons.get("ok"), Some(&DocValue::Str("OK".into())));
		assert_eq!(buttons.get("cancel"), Some(&DocValue::Str("Abort".into())));
		assert_eq!(base.get("title"), Some(&DocValue::Str("Home".into())));
	}

	#[rstest]
	fn merge_replaces_scalars() {
		let mut base = doc([("greet", "hello")]);
		base.merge(doc([("greet", "hi")]));
		assert_eq!(base.get("greet"), Some(&DocValue::Str("hi".into())));
	}

	#[rstest]
	fn scalar_text_forms() {
		assert_eq!(DocValue::Int(4).as_text().as_deref(), Some("4"));
		assert_eq!(DocValue::Bool(true).as_text().as_deref(), Some("true"));
		assert_eq!(DocValue::Map(Document::new()).as_text(), None);
	}
}
