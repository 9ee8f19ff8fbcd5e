//! Translation source loaders: glob, embedded assets and in-memory maps

use std::collections::BTreeMap;
use std::fs;
use std::io;

use tracing::debug;

use glossa_core::error::Error;
use glossa_core::{
	Catalog, Confidence, Document, LanguageTag, Loader, LoaderConfig, Localizer, Matcher,
};

use crate::formats::FormatTable;

/// The conventional on-disk layout: one directory per language under
/// `./locales`, any supported file format inside.
pub const DEFAULT_GLOB_PATTERN: &str = "./locales/*/*";

/// Loads translation files matched by a glob pattern. Each file's
/// language is parsed from its path; several files for the same
/// language deep-merge in name order, later files winning on conflict.
pub struct Glob {
	pattern: String,
	config: LoaderConfig,
	formats: FormatTable,
}

impl Glob {
	pub fn new(pattern: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			config: LoaderConfig::default(),
			formats: FormatTable::default(),
		}
	}

	pub fn with_config(mut self, config: LoaderConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_formats(mut self, formats: FormatTable) -> Self {
		self.formats = formats;
		self
	}
}

impl Default for Glob {
	fn default() -> Self {
		Self::new(DEFAULT_GLOB_PATTERN)
	}
}

impl Loader for Glob {
	fn load(&self, matcher: &mut Matcher) -> Result<Box<dyn Localizer>, Error> {
		let paths = glob::glob(&self.pattern).map_err(|e| Error::Parse {
			file: self.pattern.clone(),
			message: e.to_string(),
		})?;

		let mut names: Vec<String> = paths
			.filter_map(Result::ok)
			.filter(|p| p.is_file())
			.map(|p| p.to_string_lossy().into_owned())
			.collect();
		names.sort();

		load_sources(&names, &|name| fs::read(name), &self.config, &self.formats, matcher)
	}
}

/// Loads translations from a virtual file list plus a reader function,
/// for assets embedded in the binary or served from memory.
pub struct Assets<R> {
	names: Vec<String>,
	read: R,
	config: LoaderConfig,
	formats: FormatTable,
}

impl<R> Assets<R>
where
	R: Fn(&str) -> io::Result<Vec<u8>>,
{
	pub fn new(names: Vec<String>, read: R) -> Self {
		Self {
			names,
			read,
			config: LoaderConfig::default(),
			formats: FormatTable::default(),
		}
	}

	pub fn with_config(mut self, config: LoaderConfig) -> Self {
		self.config = config;
		self
	}

	pub fn with_formats(mut self, formats: FormatTable) -> Self {
		self.formats = formats;
		self
	}
}

impl<R> Loader for Assets<R>
where
	R: Fn(&str) -> io::Result<Vec<u8>>,
{
	fn load(&self, matcher: &mut Matcher) -> Result<Box<dyn Localizer>, Error> {
		let mut names = self.names.clone();
		names.sort();
		load_sources(&names, &self.read, &self.config, &self.formats, matcher)
	}
}

/// Loads already-parsed documents keyed by language code, for programs
/// that carry their translations in memory.
#[derive(Default)]
pub struct Kv {
	documents: Vec<(String, Document)>,
	config: LoaderConfig,
}

impl Kv {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_config(mut self, config: LoaderConfig) -> Self {
		self.config = config;
		self
	}

	/// Adds a document for `lang`. Repeated codes deep-merge in call
	/// order, later documents winning on conflict.
	pub fn set(mut self, lang: impl Into<String>, document: Document) -> Self {
		self.documents.push((lang.into(), document));
		self
	}
}

impl Loader for Kv {
	fn load(&self, matcher: &mut Matcher) -> Result<Box<dyn Localizer>, Error> {
		let mut grouped: BTreeMap<usize, Document> = BTreeMap::new();

		for (lang, document) in &self.documents {
			let tag = LanguageTag::parse(lang)?;
			let (_, index, confidence) = matcher.match_or_add(tag);
			if confidence == Confidence::No {
				debug!(lang, "language not registered, skipping document");
				continue;
			}
			grouped.entry(index).or_default().merge(document.clone());
		}

		install(grouped, matcher, &self.config)
	}
}

fn load_sources(
	names: &[String],
	read: &dyn Fn(&str) -> io::Result<Vec<u8>>,
	config: &LoaderConfig,
	formats: &FormatTable,
	matcher: &mut Matcher,
) -> Result<Box<dyn Localizer>, Error> {
	let names: Vec<String> = names
		.iter()
		.filter(|name| formats.supports(name))
		.cloned()
		.collect();

	let mut grouped: BTreeMap<usize, Document> = BTreeMap::new();
	for (index, files) in matcher.parse_language_files(&names) {
		let merged = grouped.entry(index).or_default();
		for file in files {
			let Some(parse) = formats.for_path(&file) else {
				continue;
			};
			let bytes = read(&file).map_err(|source| Error::Io {
				file: file.clone(),
				source,
			})?;
			let document = parse(&bytes).map_err(|message| Error::Parse {
				file: file.clone(),
				message,
			})?;
			merged.merge(document);
		}
	}

	install(grouped, matcher, config)
}

// Builds the catalog after the matcher has seen every source. An empty
// result or, under strict loading, incomplete language coverage fails
// the whole load; nothing is installed partially.
fn install(
	grouped: BTreeMap<usize, Document>,
	matcher: &Matcher,
	config: &LoaderConfig,
) -> Result<Box<dyn Localizer>, Error> {
	if grouped.is_empty() {
		return Err(Error::NoLocales);
	}

	let languages = matcher.languages().to_vec();
	if config.strict && grouped.len() < languages.len() {
		return Err(Error::MissingLocales {
			expected: languages.len(),
			found: grouped.len(),
		});
	}

	let mut catalog = Catalog::new(&languages, config);
	let found = grouped.len();
	for (index, document) in grouped {
		catalog.store(index, document)?;
	}

	debug!(locales = found, "translation sources loaded");
	Ok(Box::new(catalog))
}
