//! The catalog: ordered locales plus the shared message table

use std::collections::HashMap;

use tracing::debug;

use crate::document::Document;
use crate::error::Error;
use crate::locale::{Locale, SelectorMessage};
use crate::matcher::LanguageTag;
use crate::options::LoaderConfig;

/// Read access to loaded locales, as consumed by the [`crate::I18n`]
/// front. Loaders produce one of these.
pub trait Localizer: Send + Sync {
	/// The locale at `index`, or `None` when out of range.
	fn get_locale(&self, index: usize) -> Option<&Locale>;

	/// Moves the locale at `index` to position 0. `false` when `index`
	/// is out of range.
	fn set_default(&mut self, index: usize) -> bool;
}

/// Owns the ordered locales (same order as the matcher's tags) and the
/// flattened message table keyed by `(tag, key)`.
///
/// `locales[i].index() == i` holds at all times; the default-swap
/// updates positions and stored indices together.
pub struct Catalog {
	locales: Vec<Locale>,
	table: HashMap<(String, String), Vec<SelectorMessage>>,
}

impl Catalog {
	/// One empty locale per registered tag, in registration order. The
	/// first tag is the initial default.
	pub fn new(tags: &[LanguageTag], options: &LoaderConfig) -> Self {
		let locales = tags
			.iter()
			.enumerate()
			.map(|(index, tag)| Locale::new(index, tag.clone(), options.clone()))
			.collect();
		Self {
			locales,
			table: HashMap::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.locales.len()
	}

	pub fn is_empty(&self) -> bool {
		self.locales.is_empty()
	}

	pub fn locales(&self) -> &[Locale] {
		&self.locales
	}

	/// Registers selector content for a `(tag, key)` pair in the shared
	/// message table. Re-setting a pair replaces the previous content.
	pub fn set(&mut self, tag: &LanguageTag, key: impl Into<String>, messages: Vec<SelectorMessage>) {
		self.table.insert((tag.to_string(), key.into()), messages);
	}

	/// The registered selector content for a `(tag, key)` pair.
	pub fn selectors(&self, tag: &LanguageTag, key: &str) -> Option<&[SelectorMessage]> {
		self.table
			.get(&(tag.to_string(), key.to_string()))
			.map(Vec::as_slice)
	}

	/// Loads `document` into the locale at `index` and registers every
	/// flattened entry in the message table.
	pub fn store(&mut self, index: usize, document: Document) -> Result<(), Error> {
		let len = self.locales.len();
		let locale = self
			.locales
			.get_mut(index)
			.ok_or(Error::LocaleIndex { index, len })?;

		let tag = locale.tag().clone();
		let entries = locale.load(document)?;
		debug!(language = %tag, index, entries = entries.len(), "locale loaded");

		for (key, messages) in entries {
			self.set(&tag, key, messages);
		}
		Ok(())
	}
}

impl Localizer for Catalog {
	fn get_locale(&self, index: usize) -> Option<&Locale> {
		self.locales.get(index)
	}

	fn set_default(&mut self, index: usize) -> bool {
		if index >= self.locales.len() {
			return false;
		}
		if index == 0 {
			return true;
		}

		self.locales.swap(0, index);
		self.locales[0].set_index(0);
		self.locales[index].set_index(index);
		debug!(language = %self.locales[0].tag(), "default locale changed");
		true
	}
}
