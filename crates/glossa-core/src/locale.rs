//! Locales: one resolved message set per registered language
//!
//! A locale is built once by flattening a translation document and is
//! read-only afterwards. Flattening walks the document depth-first:
//! string leaves become messages at their dotted path, maps whose keys
//! are all plural-form tokens become the plural branches of the message
//! at the parent path, other maps recurse. A reserved `Vars` key at any
//! level declares variables shared by every message below it.

use std::collections::HashMap;

use tracing::warn;

use crate::document::{DocValue, Document};
use crate::error::{Error, RenderError};
use crate::matcher::LanguageTag;
use crate::message::{Message, MessageLookup};
use crate::options::LoaderConfig;
use crate::plural::PluralForm;
use crate::template::{Template, is_template_value};
use crate::value::Value;
use crate::variable::{Var, merge_vars, sort_vars, take_vars};

/// Key suffix under which a templated message registers its variable
/// selectors in the catalog table.
pub const VARS_KEY_SUFFIX: &str = "_vars";

/// One entry of the catalog's shared message table: variable selectors
/// in declaration order, followed by the message text.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorMessage {
	Text(String),
	Var(Var),
}

/// A flattened catalog entry produced while loading one locale, consumed
/// by the owning catalog's message table.
pub type TableEntry = (String, Vec<SelectorMessage>);

/// The renderable entry behind a message key.
pub enum Renderer {
	Message(Message),
	Template(Box<Template>),
}

impl Renderer {
	pub fn render(
		&self,
		lookup: Option<&dyn MessageLookup>,
		args: &[Value],
	) -> Result<String, RenderError> {
		match self {
			Renderer::Message(message) => message.render(args),
			Renderer::Template(template) => template.render_with(lookup, args),
		}
	}
}

/// The full resolved message set for one registered language.
pub struct Locale {
	index: usize,
	id: String,
	tag: LanguageTag,
	messages: HashMap<String, Renderer>,
	/// Root-level `Vars`, shared by every message of this locale.
	vars: Vec<Var>,
	options: LoaderConfig,
}

impl Locale {
	pub fn new(index: usize, tag: LanguageTag, options: LoaderConfig) -> Self {
		Self {
			index,
			id: tag.to_string(),
			tag,
			messages: HashMap::new(),
			vars: Vec::new(),
			options,
		}
	}

	/// Position of this locale in the owning catalog. Kept equal to the
	/// actual position; the catalog's default-swap updates both together.
	pub fn index(&self) -> usize {
		self.index
	}

	pub(crate) fn set_index(&mut self, index: usize) {
		self.index = index;
	}

	pub fn tag(&self) -> &LanguageTag {
		&self.tag
	}

	/// The string form of the tag, e.g. `en-US`.
	pub fn language(&self) -> &str {
		&self.id
	}

	pub fn message_count(&self) -> usize {
		self.messages.len()
	}

	/// Looks up and renders a message.
	///
	/// A missing key renders as the empty string; the caller decides
	/// whether to fall back to another locale. A render failure renders
	/// as the error's text so a missing argument shows up in the output
	/// instead of failing the request.
	pub fn get_message(&self, key: &str, args: &[Value]) -> String {
		match self.messages.get(key) {
			Some(renderer) => match renderer.render(Some(self), args) {
				Ok(text) => text,
				Err(err) => err.to_string(),
			},
			None => String::new(),
		}
	}

	/// Flattens `document` into this locale's messages and returns the
	/// table entries for the owning catalog. Any error aborts the load;
	/// nothing is partially visible to the caller.
	pub fn load(&mut self, mut document: Document) -> Result<Vec<TableEntry>, Error> {
		self.vars = take_vars(&self.id, &mut document)?;
		let shared = self.vars.clone();
		let mut entries = Vec::new();
		self.load_level("", document, &shared, &mut entries)?;
		Ok(entries)
	}

	fn load_level(
		&mut self,
		prefix: &str,
		level: Document,
		inherited: &[Var],
		entries: &mut Vec<TableEntry>,
	) -> Result<(), Error> {
		for (key, value) in level.into_entries() {
			let path = join_key(prefix, &key);
			match value {
				DocValue::Str(text) => {
					self.add_message(&path, &text, inherited, entries)?;
				}
				DocValue::Map(mut inner) => {
					let local = take_vars(&path, &mut inner)?;
					let vars = merge_vars(local, inherited);
					if is_plural_map(&inner) {
						self.add_plural_message(&path, inner, &vars, entries)?;
					} else {
						self.load_level(&path, inner, &vars, entries)?;
					}
				}
				_ => return Err(Error::UnsupportedValue { key: path }),
			}
		}
		Ok(())
	}

	fn add_message(
		&mut self,
		key: &str,
		text: &str,
		vars: &[Var],
		entries: &mut Vec<TableEntry>,
	) -> Result<(), Error> {
		let vars = sort_vars(text, vars, false);

		if is_template_value(text, &self.options.left, &self.options.right) {
			let message = Message::plain(key, text, vars.clone());
			match Template::compile(message, &self.options.left, &self.options.right, &self.options.funcs) {
				Ok(template) => {
					entries.push((
						format!("{key}{VARS_KEY_SUFFIX}"),
						selectors(&vars, text),
					));
					self.messages.insert(key.to_string(), Renderer::Template(Box::new(template)));
					return Ok(());
				}
				Err(source) if self.options.strict => {
					return Err(Error::Template {
						key: key.to_string(),
						value: text.to_string(),
						source,
					});
				}
				Err(source) => {
					warn!(key, error = %source, "template failed to compile, keeping plain text");
				}
			}
		}

		entries.push((key.to_string(), selectors(&vars, text)));
		self.messages
			.insert(key.to_string(), Renderer::Message(Message::plain(key, text, vars)));
		Ok(())
	}

	fn add_plural_message(
		&mut self,
		key: &str,
		branches: Document,
		vars: &[Var],
		entries: &mut Vec<TableEntry>,
	) -> Result<(), Error> {
		let mut message = Message::plain(key, String::new(), Vec::new());

		for (token, value) in branches.into_entries() {
			// is_plural_map vetted every key already
			let Some(form) = PluralForm::parse(&token) else {
				continue;
			};
			let text = value.as_text().ok_or_else(|| Error::UnsupportedValue {
				key: format!("{key}.{token}"),
			})?;

			let branch_vars = sort_vars(&text, vars, true);
			entries.push((format!("{key}.{form}"), selectors(&branch_vars, &text)));
			message.add_plural(form, Message::branch(key, text, branch_vars));
		}

		self.messages.insert(key.to_string(), Renderer::Message(message));
		Ok(())
	}
}

impl MessageLookup for Locale {
	fn message(&self, key: &str, args: &[Value]) -> String {
		self.get_message(key, args)
	}
}

fn join_key(prefix: &str, key: &str) -> String {
	if prefix.is_empty() {
		key.to_string()
	} else {
		format!("{prefix}.{key}")
	}
}

// A map is a set of plural branches only when every key is a form token;
// anything else makes it an ordinary nested level.
fn is_plural_map(map: &Document) -> bool {
	!map.is_empty() && map.keys().all(|k| PluralForm::parse(k).is_some())
}

fn selectors(vars: &[Var], text: &str) -> Vec<SelectorMessage> {
	let mut list: Vec<SelectorMessage> =
		vars.iter().cloned().map(SelectorMessage::Var).collect();
	list.push(SelectorMessage::Text(text.to_string()));
	list
}
