//! Message entries: plain text, variable substitution and plural branches

use crate::error::RenderError;
use crate::fmt::sprintf;
use crate::plural::PluralForm;
use crate::value::{Value, resolve_plural_count, resolve_var_count};
use crate::variable::Var;

/// Resolves nested message references. Implemented by locales so that
/// templated messages can call `tr` into their own catalog.
pub trait MessageLookup {
	/// Resolves `key` to rendered text; a miss renders as empty text.
	fn message(&self, key: &str, args: &[Value]) -> String;
}

/// A single localized message: a text body, the variables referenced by
/// it, and optionally a set of plural branches keyed by form.
#[derive(Debug, Clone)]
pub struct Message {
	pub key: String,
	pub value: String,
	/// Variables referenced by the body, in first-occurrence order.
	pub vars: Vec<Var>,
	/// Set on plural branches: the plural count occupies the first
	/// argument position, shifting positional variable lookups by one.
	in_plural: bool,
	/// Plural branches sorted by form priority. Non-empty means the
	/// message renders by count dispatch instead of its own body.
	plurals: Vec<(PluralForm, Message)>,
}

impl Message {
	/// A plain (non-plural) message.
	pub fn plain(key: impl Into<String>, value: impl Into<String>, vars: Vec<Var>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
			vars,
			in_plural: false,
			plurals: Vec::new(),
		}
	}

	/// A plural branch body. Positional variable arguments start after
	/// the count argument.
	pub fn branch(key: impl Into<String>, value: impl Into<String>, vars: Vec<Var>) -> Self {
		Self {
			in_plural: true,
			..Self::plain(key, value, vars)
		}
	}

	/// Installs a plural branch. Re-adding a form replaces the previous
	/// branch; the set stays sorted by form priority so that rendering
	/// can take the first match.
	pub fn add_plural(&mut self, form: PluralForm, message: Message) {
		match self.plurals.iter_mut().find(|(f, _)| *f == form) {
			Some(slot) => slot.1 = message,
			None => {
				self.plurals.push((form, message));
				self.plurals.sort_by(|a, b| a.0.cmp(&b.0));
			}
		}
	}

	pub fn is_plural(&self) -> bool {
		!self.plurals.is_empty()
	}

	/// Renders the message against `args`.
	///
	/// Plural messages resolve a count from the first argument and
	/// dispatch to the first branch whose form matches it. Plain messages
	/// substitute their variables, then apply the body as a format string
	/// over the remaining arguments.
	pub fn render(&self, args: &[Value]) -> Result<String, RenderError> {
		if self.is_plural() {
			return self.render_plural(args);
		}
		self.render_plain(args)
	}

	fn render_plural(&self, args: &[Value]) -> Result<String, RenderError> {
		let count = resolve_plural_count(args).ok_or_else(|| RenderError::MissingPluralCount {
			key: self.key.clone(),
		})?;

		for (form, message) in &self.plurals {
			if form.match_plural(count) {
				return message.render(args);
			}
		}

		Err(RenderError::NoPluralForm {
			key: self.key.clone(),
			count,
		})
	}

	fn render_plain(&self, args: &[Value]) -> Result<String, RenderError> {
		// Format the body first. Variable tokens carry no `%` and pass
		// through, and a `%` inside substituted case text is never
		// re-parsed as a verb. Inside a plural branch the count argument
		// stays in place, so a `%d` in the branch text formats it.
		let mut text = sprintf(&self.value, args)?;

		for var in &self.vars {
			let count = resolve_var_count(&var.name, args)
				.or_else(|| args.get(var.argth - 1).and_then(Value::as_int))
				.or_else(|| {
					if self.in_plural {
						resolve_plural_count(args)
					} else {
						None
					}
				});

			// An unresolvable count leaves the token in place.
			if let Some(count) = count {
				let rendered = var.render(count)?;
				text = text.replace(&var.literal, &rendered);
			}
		}

		Ok(text)
	}
}
