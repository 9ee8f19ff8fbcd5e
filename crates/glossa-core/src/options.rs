//! Loader configuration: template delimiters, functions, strictness

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A function callable from templated messages, e.g. `{{ upper .Name }}`.
pub type TemplateFunc = Arc<dyn Fn(&[Value]) -> String + Send + Sync>;

/// Named template functions, checked at template compile time.
pub type FuncMap = HashMap<String, TemplateFunc>;

/// Options controlling how documents are turned into locales.
#[derive(Clone)]
pub struct LoaderConfig {
	/// Left template delimiter, defaults to `{{`.
	pub left: String,
	/// Right template delimiter, defaults to `}}`.
	pub right: String,
	/// Functions available to templated messages, defaults to none.
	pub funcs: FuncMap,
	/// If true, invalid templates abort the load instead of degrading to
	/// plain string messages, and the loader reports when the loaded
	/// locales do not cover the registered languages. Defaults to false.
	pub strict: bool,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			left: "{{".to_string(),
			right: "}}".to_string(),
			funcs: FuncMap::new(),
			strict: false,
		}
	}
}

impl LoaderConfig {
	/// Sets custom template delimiters.
	pub fn delims(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
		self.left = left.into();
		self.right = right.into();
		self
	}

	/// Registers a template function under `name`.
	pub fn func<F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&[Value]) -> String + Send + Sync + 'static,
	{
		self.funcs.insert(name.into(), Arc::new(f));
		self
	}

	/// Enables strict loading.
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}
}

impl fmt::Debug for LoaderConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoaderConfig")
			.field("left", &self.left)
			.field("right", &self.right)
			.field("funcs", &self.funcs.keys().collect::<Vec<_>>())
			.field("strict", &self.strict)
			.finish()
	}
}
