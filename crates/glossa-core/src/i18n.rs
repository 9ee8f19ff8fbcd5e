//! The engine front: language registration, lookup and fallback

use std::sync::Arc;

use tracing::warn;

use crate::catalog::Localizer;
use crate::error::Error;
use crate::locale::Locale;
use crate::matcher::{Confidence, LanguageTag, Matcher};
use crate::value::Value;

/// Produces a [`Localizer`] for the languages registered on `matcher`.
/// A non-strict matcher (built with no declared languages) may be grown
/// by the loader as it discovers translation sources.
pub trait Loader {
	fn load(&self, matcher: &mut Matcher) -> Result<Box<dyn Localizer>, Error>;
}

impl<F> Loader for F
where
	F: Fn(&mut Matcher) -> Result<Box<dyn Localizer>, Error>,
{
	fn load(&self, matcher: &mut Matcher) -> Result<Box<dyn Localizer>, Error> {
		self(matcher)
	}
}

/// Hook invoked when a key or language misses. Receives the caller's
/// language input, the matched language, the key and the arguments; its
/// return value becomes the rendered text.
pub type MessageFn = Arc<dyn Fn(&str, &str, &str, &[Value]) -> String + Send + Sync>;

/// The message engine: a matcher over registered languages plus the
/// loaded locales, with the lookup fallback policy on top.
///
/// Loading happens once, up front; after that every lookup is a pure
/// read. Changing the default language mutates registry order and must
/// be synchronized by the caller against concurrent lookups.
pub struct I18n {
	localizer: Box<dyn Localizer>,
	matcher: Matcher,
	default_message_fn: Option<MessageFn>,

	/// URL query parameter consulted by request-locale resolvers.
	pub url_parameter: String,
	/// Cookie name consulted by request-locale resolvers, empty disables.
	pub cookie: String,
	/// Whether request-locale resolvers may read the subdomain label.
	pub subdomain: bool,
	/// When set, a message missing from a non-default locale renders as
	/// empty instead of falling back to the default locale.
	pub strict: bool,
	/// Whether the surrounding system may rewrite language path prefixes.
	pub path_redirect: bool,
}

impl I18n {
	/// Builds the engine: registers `languages` (duplicates collapsed,
	/// unparsable codes dropped) and runs the loader. The first language
	/// is the default; an empty list leaves discovery to the loader.
	pub fn new(loader: &dyn Loader, languages: &[&str]) -> Result<Self, Error> {
		let mut matcher = Matcher::new(make_tags(languages));
		let localizer = loader.load(&mut matcher)?;

		Ok(Self {
			localizer,
			matcher,
			default_message_fn: None,
			url_parameter: "lang".to_string(),
			cookie: String::new(),
			subdomain: true,
			strict: false,
			path_redirect: true,
		})
	}

	/// Discards the current locales and reloads. The previous state
	/// stays installed when the loader fails.
	pub fn reset(&mut self, loader: &dyn Loader, languages: &[&str]) -> Result<(), Error> {
		let mut matcher = Matcher::new(make_tags(languages));
		let localizer = loader.load(&mut matcher)?;
		self.matcher = matcher;
		self.localizer = localizer;
		Ok(())
	}

	/// Installs the miss hook, see [`MessageFn`].
	pub fn set_default_message_fn<F>(&mut self, f: F)
	where
		F: Fn(&str, &str, &str, &[Value]) -> String + Send + Sync + 'static,
	{
		self.default_message_fn = Some(Arc::new(f));
	}

	/// The registered language tags, default first.
	pub fn tags(&self) -> &[LanguageTag] {
		self.matcher.languages()
	}

	/// Whether at least one locale is available.
	pub fn loaded(&self) -> bool {
		self.localizer.get_locale(0).is_some()
	}

	/// Matches a language name or `Accept-Language` header against the
	/// registered tags. `None` below high confidence.
	pub fn try_match_string(&self, s: &str) -> Option<(LanguageTag, usize, Confidence)> {
		self.matcher.match_str(s)
	}

	/// Picks the first candidate the matcher resolves, in priority
	/// order. Empty candidates are skipped; no acceptable candidate
	/// means the default locale (index 0).
	pub fn resolve(&self, candidates: &[&str]) -> usize {
		candidates
			.iter()
			.filter(|c| !c.is_empty())
			.find_map(|c| self.try_match_string(c).map(|(_, index, _)| index))
			.unwrap_or(0)
	}

	/// Resolves `lang` and renders `key` for it, with the configured
	/// fallback policy. An unmatchable language uses the default locale.
	pub fn tr(&self, lang: &str, key: &str, args: &[Value]) -> String {
		let index = self
			.try_match_string(lang)
			.map(|(_, index, _)| index)
			.unwrap_or(0);
		self.locale_message(index, lang, key, args)
	}

	/// Renders `key` for an already-resolved locale, with the same
	/// fallback policy as [`I18n::tr`].
	pub fn get_message(&self, locale: &Locale, key: &str, args: &[Value]) -> String {
		self.locale_message(locale.index(), locale.language(), key, args)
	}

	/// The locale at `index`, the default locale when out of range.
	pub fn locale(&self, index: usize) -> Option<&Locale> {
		self.localizer
			.get_locale(index)
			.or_else(|| self.localizer.get_locale(0))
	}

	fn locale_message(&self, index: usize, lang_input: &str, key: &str, args: &[Value]) -> String {
		let mut matched = "";
		let mut message = String::new();

		if let Some(locale) = self.locale(index) {
			matched = locale.language();
			message = locale.get_message(key, args);

			// Not the default language and nothing registered for it:
			// serve the default locale's text unless strict. An installed
			// miss hook takes over instead, so it sees every miss.
			if message.is_empty()
				&& self.default_message_fn.is_none()
				&& !self.strict
				&& locale.index() > 0
				&& let Some(fallback) = self.localizer.get_locale(0)
			{
				message = fallback.get_message(key, args);
			}
		}

		if message.is_empty()
			&& let Some(hook) = &self.default_message_fn
		{
			message = hook(lang_input, matched, key, args);
		}

		message
	}

	/// Moves the language matched by `lang` to the default position.
	/// `false` when `lang` does not resolve to a registered language.
	pub fn set_default(&mut self, lang: &str) -> bool {
		if let Some((_, index, _)) = self.try_match_string(lang)
			&& self.localizer.set_default(index)
		{
			self.matcher.swap(0, index);
			return true;
		}
		false
	}
}

// Parses language codes for registration: order kept, duplicates
// collapsed, unparsable codes dropped with a warning.
fn make_tags(languages: &[&str]) -> Vec<LanguageTag> {
	let mut tags: Vec<LanguageTag> = Vec::with_capacity(languages.len());
	for code in languages {
		match LanguageTag::parse(code) {
			Ok(tag) => {
				if !tags.contains(&tag) {
					tags.push(tag);
				}
			}
			Err(_) => warn!(code, "skipping unparsable language code"),
		}
	}
	tags
}
