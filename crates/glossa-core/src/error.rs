//! Error types for catalog loading and message rendering

/// Errors raised while loading translation documents into a catalog.
///
/// Every variant carries enough context to point at the offending key path
/// or file. A failed load aborts the whole reset attempt; no partially
/// loaded catalog is ever installed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A document leaf held something other than a string or a nested map.
	#[error("unsupported value at key '{key}'")]
	UnsupportedValue { key: String },

	/// A templated message failed to compile.
	#[error("template <{key} = {value}>: {source}")]
	Template {
		key: String,
		value: String,
		#[source]
		source: TemplateError,
	},

	/// A variable declaration could not be decoded.
	#[error("variable '{name}' at key '{key}': {message}")]
	Variable {
		key: String,
		name: String,
		message: String,
	},

	/// A language code did not parse as a BCP-47 tag.
	#[error("invalid language tag '{tag}'")]
	InvalidTag { tag: String },

	/// A language index outside the registered range was addressed.
	#[error("locale index {index} out of range ({len} registered)")]
	LocaleIndex { index: usize, len: usize },

	/// A source file could not be read.
	#[error("read '{file}': {source}")]
	Io {
		file: String,
		#[source]
		source: std::io::Error,
	},

	/// A source file could not be parsed into a document.
	#[error("parse '{file}': {message}")]
	Parse { file: String, message: String },

	/// The loader finished without producing a single locale.
	#[error("no locales were loaded")]
	NoLocales,

	/// Strict loading found fewer locales than registered languages.
	#[error("expected {expected} locales but {found} were loaded")]
	MissingLocales { expected: usize, found: usize },
}

/// Errors raised while compiling a templated message body.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("unclosed '{left}' delimiter at offset {at}")]
	Unclosed { left: String, at: usize },

	#[error("empty action at offset {at}")]
	EmptyAction { at: usize },

	#[error("unknown function '{name}'")]
	UnknownFunc { name: String },

	#[error("malformed action '{action}'")]
	BadAction { action: String },
}

/// Errors raised while rendering a message at request time.
///
/// `Locale::get_message` never surfaces these to its caller; it substitutes
/// the error text as the rendered string so a missing argument shows up in
/// the page instead of failing the request.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	/// A pluralized message was rendered without a resolvable plural count.
	#[error("missing plural count for message '{key}'")]
	MissingPluralCount { key: String },

	/// No registered plural form matched the resolved count.
	#[error("no registered plural for count {count} in message '{key}'")]
	NoPluralForm { key: String, count: i64 },

	/// The format text referenced more arguments than were supplied.
	#[error("format '{format}': missing argument for verb %{verb} at index {index}")]
	MissingFormatArg {
		format: String,
		verb: char,
		index: usize,
	},
}
