//! Templated message bodies: compilation and rendering
//!
//! A message value is treated as a template when it contains the configured
//! left delimiter with a right delimiter somewhere after it. The body is
//! compiled into segments once at load time; `${Name}` variable tokens pass
//! through the template untouched and are substituted in a second pass
//! after execution.

use std::fmt;

use crate::error::{RenderError, TemplateError};
use crate::message::{Message, MessageLookup};
use crate::options::{FuncMap, TemplateFunc};
use crate::value::{Value, resolve_plural_count, resolve_var_count};

/// Reports whether `value` should be compiled as a template.
pub fn is_template_value(value: &str, left: &str, right: &str) -> bool {
	match value.find(left) {
		Some(left_idx) => match value.find(right) {
			Some(right_idx) => right_idx > left_idx,
			None => false,
		},
		None => false,
	}
}

/// One argument of a template function call.
#[derive(Debug, Clone)]
enum CallArg {
	/// A quoted string literal.
	Literal(String),
	/// A dotted field path into the data argument.
	Field(Vec<String>),
}

enum Segment {
	Text(String),
	/// `{{ .A.B }}`: field lookup into the data argument.
	/// An empty path (`{{ . }}`) renders the whole data value.
	Field(Vec<String>),
	/// `{{ name arg... }}`: a user function from the loader config.
	Call { func: TemplateFunc, args: Vec<CallArg> },
	/// `{{ tr "key" arg... }}`: nested message lookup through the locale.
	Tr { args: Vec<CallArg> },
}

/// A Message wrapped with a compiled template body.
pub struct Template {
	pub message: Message,
	segments: Vec<Segment>,
}

impl Template {
	/// Compiles `message.value` with the given delimiters and functions.
	///
	/// Fails on unclosed delimiters, empty or malformed actions, and
	/// unknown function names, like Go's text/template does at parse time.
	pub fn compile(
		message: Message,
		left: &str,
		right: &str,
		funcs: &FuncMap,
	) -> Result<Self, TemplateError> {
		let segments = parse_segments(&message.value, left, right, funcs)?;
		Ok(Self { message, segments })
	}

	/// Renders the template: executes the body against the first argument,
	/// then substitutes each `${Name}` variable in declaration order.
	///
	/// Variable counts resolve per name through the usual three paths
	/// (counter argument, `<Name>Count` map entry, positional integers
	/// after the data argument).
	pub fn render_with(
		&self,
		lookup: Option<&dyn MessageLookup>,
		args: &[Value],
	) -> Result<String, RenderError> {
		let data = args.first();
		let mut out = String::new();

		for segment in &self.segments {
			match segment {
				Segment::Text(text) => out.push_str(text),
				Segment::Field(path) => {
					if let Some(value) = data.and_then(|d| d.lookup(path)) {
						out.push_str(&value.to_string());
					}
				}
				Segment::Call { func, args: call_args } => {
					let resolved = resolve_call_args(call_args, data);
					out.push_str(&func(&resolved));
				}
				Segment::Tr { args: call_args } => {
					let resolved = resolve_call_args(call_args, data);
					if let (Some(lookup), Some(Value::Str(key))) = (lookup, resolved.first()) {
						out.push_str(&lookup.message(key, &resolved[1..]));
					}
				}
			}
		}

		if !self.message.vars.is_empty() {
			out = self.substitute_vars(out, args);
		}

		Ok(out)
	}

	// Second pass: each variable token is replaced once, in declaration
	// order, by its rendered case.
	fn substitute_vars(&self, mut out: String, args: &[Value]) -> String {
		for var in &self.message.vars {
			let count = resolve_var_count(&var.name, args)
				.or_else(|| args.get(var.argth).and_then(Value::as_int))
				.or_else(|| resolve_plural_count(args));

			if let Some(count) = count
				&& let Ok(rendered) = var.render(count)
			{
				out = out.replace(&var.literal, &rendered);
			}
		}
		out
	}
}

// Segments hold boxed closures, so Debug is written by hand.
impl fmt::Debug for Template {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Template")
			.field("message", &self.message)
			.field("segments", &self.segments.len())
			.finish()
	}
}

fn resolve_call_args(call_args: &[CallArg], data: Option<&Value>) -> Vec<Value> {
	call_args
		.iter()
		.map(|arg| match arg {
			CallArg::Literal(s) => Value::Str(s.clone()),
			CallArg::Field(path) => data
				.and_then(|d| d.lookup(path))
				.cloned()
				.unwrap_or_else(|| Value::Str(String::new())),
		})
		.collect()
}

fn parse_segments(
	value: &str,
	left: &str,
	right: &str,
	funcs: &FuncMap,
) -> Result<Vec<Segment>, TemplateError> {
	let mut segments = Vec::new();
	let mut rest = value;
	let mut offset = 0usize;

	while let Some(left_idx) = rest.find(left) {
		if left_idx > 0 {
			segments.push(Segment::Text(rest[..left_idx].to_string()));
		}
		let after_left = &rest[left_idx + left.len()..];
		let right_idx = after_left.find(right).ok_or(TemplateError::Unclosed {
			left: left.to_string(),
			at: offset + left_idx,
		})?;

		let action = after_left[..right_idx].trim();
		if action.is_empty() {
			return Err(TemplateError::EmptyAction { at: offset + left_idx });
		}
		segments.push(parse_action(action, funcs)?);

		let consumed = left_idx + left.len() + right_idx + right.len();
		offset += consumed;
		rest = &rest[consumed..];
	}

	if !rest.is_empty() {
		segments.push(Segment::Text(rest.to_string()));
	}

	Ok(segments)
}

fn parse_action(action: &str, funcs: &FuncMap) -> Result<Segment, TemplateError> {
	let tokens = tokenize(action).ok_or_else(|| TemplateError::BadAction {
		action: action.to_string(),
	})?;

	match tokens.split_first() {
		Some((Token::Word(word), [])) if word.starts_with('.') => {
			let path = field_path(word).ok_or_else(|| TemplateError::BadAction {
				action: action.to_string(),
			})?;
			Ok(Segment::Field(path))
		}
		// Bare identifiers are function names, never field lookups.
		Some((Token::Word(name), rest)) if !name.starts_with('.') => {
			let args = rest
				.iter()
				.map(|token| match token {
					Token::Quoted(s) => Ok(CallArg::Literal(s.clone())),
					Token::Word(w) => field_path(w)
						.map(CallArg::Field)
						.ok_or_else(|| TemplateError::BadAction {
							action: action.to_string(),
						}),
				})
				.collect::<Result<Vec<_>, _>>()?;

			if name == "tr" {
				return Ok(Segment::Tr { args });
			}
			let func = funcs
				.get(name.as_str())
				.cloned()
				.ok_or_else(|| TemplateError::UnknownFunc { name: name.clone() })?;
			Ok(Segment::Call { func, args })
		}
		_ => Err(TemplateError::BadAction {
			action: action.to_string(),
		}),
	}
}

// `.A.B` to a path; `.` alone is the whole data value.
fn field_path(word: &str) -> Option<Vec<String>> {
	if word == "." {
		return Some(Vec::new());
	}
	let trimmed = word.strip_prefix('.')?;
	if trimmed.is_empty() {
		return None;
	}
	let path: Vec<String> = trimmed.split('.').map(str::to_string).collect();
	if path.iter().any(|segment| {
		segment.is_empty()
			|| !segment
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_')
	}) {
		return None;
	}
	Some(path)
}

#[derive(Debug, Clone)]
enum Token {
	Word(String),
	Quoted(String),
}

fn tokenize(action: &str) -> Option<Vec<Token>> {
	let mut tokens = Vec::new();
	let mut chars = action.chars().peekable();

	while let Some(&ch) = chars.peek() {
		if ch.is_whitespace() {
			chars.next();
		} else if ch == '"' {
			chars.next();
			let mut literal = String::new();
			loop {
				match chars.next()? {
					'"' => break,
					c => literal.push(c),
				}
			}
			tokens.push(Token::Quoted(literal));
		} else {
			let mut word = String::new();
			while let Some(&c) = chars.peek() {
				if c.is_whitespace() {
					break;
				}
				if c == '"' {
					return None;
				}
				word.push(c);
				chars.next();
			}
			tokens.push(Token::Word(word));
		}
	}

	if tokens.is_empty() { None } else { Some(tokens) }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::LoaderConfig;
	use crate::value::value_map;
	use rstest::rstest;

	fn compile(text: &str) -> Template {
		compile_with(text, &LoaderConfig::default())
	}

	fn compile_with(text: &str, config: &LoaderConfig) -> Template {
		let message = Message::plain("key", text, Vec::new());
		Template::compile(message, &config.left, &config.right, &config.funcs).unwrap()
	}

	#[rstest]
	#[case("Hello {{.Name}}", true)]
	#[case("plain text", false)]
	#[case("}} reversed {{", false)]
	#[case("only left {{", false)]
	fn template_detection(#[case] value: &str, #[case] expected: bool) {
		assert_eq!(is_template_value(value, "{{", "}}"), expected);
	}

	#[rstest]
	fn renders_field_from_data_map() {
		let tmpl = compile("Hello {{.Name}}!");
		let data = Value::Map(value_map([("Name", "Ada")]));
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "Hello Ada!");
	}

	#[rstest]
	fn renders_nested_field() {
		let inner = value_map([("Name", "Ada")]);
		let data = Value::Map(value_map([("User", Value::Map(inner))]));
		let tmpl = compile("{{ .User.Name }} is here");
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "Ada is here");
	}

	#[rstest]
	fn missing_field_renders_empty() {
		let tmpl = compile("[{{.Nope}}]");
		let data = Value::Map(value_map([("Name", "Ada")]));
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "[]");
	}

	#[rstest]
	fn dot_renders_whole_data() {
		let tmpl = compile("got {{ . }}");
		assert_eq!(
			tmpl.render_with(None, &[Value::Str("x".into())]).unwrap(),
			"got x"
		);
	}

	#[rstest]
	fn custom_delimiters() {
		let message = Message::plain("key", "Hi <<.Name>>", Vec::new());
		let tmpl = Template::compile(message, "<<", ">>", &FuncMap::new()).unwrap();
		let data = Value::Map(value_map([("Name", "Bo")]));
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "Hi Bo");
	}

	#[rstest]
	fn user_function_is_called() {
		let config = LoaderConfig::default().func("upper", |args: &[Value]| {
			args.first().map(|v| v.to_string().to_uppercase()).unwrap_or_default()
		});
		let tmpl = compile_with("{{ upper .Name }}", &config);
		let data = Value::Map(value_map([("Name", "ada")]));
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "ADA");
	}

	#[rstest]
	fn unknown_function_fails_at_compile() {
		let message = Message::plain("key", "{{ nope .X }}", Vec::new());
		let err = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap_err();
		assert!(matches!(err, TemplateError::UnknownFunc { name } if name == "nope"));
	}

	#[rstest]
	fn bare_identifier_without_arguments_is_not_a_field() {
		let message = Message::plain("key", "oops {{ unknownfn }} here", Vec::new());
		let err = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap_err();
		assert!(matches!(err, TemplateError::UnknownFunc { name } if name == "unknownfn"));
	}

	#[rstest]
	fn dotted_field_with_arguments_is_malformed() {
		let message = Message::plain("key", "{{ .X \"a\" }}", Vec::new());
		let err = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap_err();
		assert!(matches!(err, TemplateError::BadAction { .. }));
	}

	#[rstest]
	fn unclosed_delimiter_fails_at_compile() {
		let message = Message::plain("key", "broken {{ .X", Vec::new());
		let err = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap_err();
		assert!(matches!(err, TemplateError::Unclosed { .. }));
	}

	#[rstest]
	fn empty_action_fails_at_compile() {
		let message = Message::plain("key", "broken {{  }}", Vec::new());
		let err = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap_err();
		assert!(matches!(err, TemplateError::EmptyAction { .. }));
	}

	#[rstest]
	fn variable_tokens_pass_through_then_substitute() {
		use crate::document::{DocValue, doc};
		use crate::variable::{parse_vars, sort_vars};

		let decls = parse_vars(
			"key",
			&DocValue::Seq(vec![DocValue::Map(doc([(
				"Dogs",
				DocValue::Map(doc([("one", "dog"), ("other", "dogs")])),
			)]))]),
		)
		.unwrap();
		let text = "{{.Name}} has ${Dogs}";
		let vars = sort_vars(text, &decls, false);
		let message = Message::plain("key", text, vars);
		let tmpl = Template::compile(message, "{{", "}}", &FuncMap::new()).unwrap();

		let data = Value::Map(value_map([
			("Name", Value::Str("Ada".into())),
			("DogsCount", Value::Int(2)),
		]));
		assert_eq!(tmpl.render_with(None, &[data]).unwrap(), "Ada has dogs");
	}
}
