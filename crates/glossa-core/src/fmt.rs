//! Printf-style text engine for plain message formatting
//!
//! Message texts use a small verb set (`%s`, `%d`, `%v`, `%f`, `%%`).
//! Verbs consume arguments left to right; a verb with no argument left is
//! an error, surplus arguments are ignored (plural counts routinely ride
//! along in the argument list without a matching verb).

use crate::error::RenderError;
use crate::value::Value;

/// Formats `format` against `args`, consuming one argument per verb.
pub fn sprintf(format: &str, args: &[Value]) -> Result<String, RenderError> {
	let mut out = String::with_capacity(format.len());
	let mut arg_index = 0usize;
	let mut chars = format.char_indices().peekable();

	while let Some((_, ch)) = chars.next() {
		if ch != '%' {
			out.push(ch);
			continue;
		}

		// precision, e.g. %.2f
		let mut precision: Option<usize> = None;
		if let Some((_, '.')) = chars.peek() {
			chars.next();
			let mut digits = String::new();
			while let Some((_, d)) = chars.peek() {
				if d.is_ascii_digit() {
					digits.push(*d);
					chars.next();
				} else {
					break;
				}
			}
			precision = digits.parse().ok();
		}

		match chars.next() {
			Some((_, '%')) => out.push('%'),
			Some((_, verb @ ('s' | 'd' | 'v' | 'f'))) => {
				let arg = args.get(arg_index).ok_or_else(|| RenderError::MissingFormatArg {
					format: format.to_string(),
					verb,
					index: arg_index,
				})?;
				arg_index += 1;
				write_verb(&mut out, verb, precision, arg);
			}
			Some((_, other)) => {
				// unknown verb, emit as-is
				out.push('%');
				out.push(other);
			}
			None => out.push('%'),
		}
	}

	Ok(out)
}

fn write_verb(out: &mut String, verb: char, precision: Option<usize>, arg: &Value) {
	match verb {
		'd' => match arg.as_int() {
			Some(n) => out.push_str(&n.to_string()),
			None => out.push_str(&arg.to_string()),
		},
		'f' => {
			let v = match arg {
				Value::Float(v) => *v,
				Value::Int(n) => *n as f64,
				other => {
					out.push_str(&other.to_string());
					return;
				}
			};
			match precision {
				Some(p) => out.push_str(&format!("{v:.p$}")),
				None => out.push_str(&format!("{v}")),
			}
		}
		// %s and %v both fall back to the display form
		_ => out.push_str(&arg.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("%d dogs", &[Value::Int(3)], "3 dogs")]
	#[case("Hi %s", &[Value::Str("Ada".into())], "Hi Ada")]
	#[case("%v!", &[Value::Bool(true)], "true!")]
	#[case("100%%", &[], "100%")]
	#[case("no verbs", &[], "no verbs")]
	fn formats(#[case] format: &str, #[case] args: &[Value], #[case] expected: &str) {
		assert_eq!(sprintf(format, args).unwrap(), expected);
	}

	#[rstest]
	fn float_precision() {
		assert_eq!(sprintf("%.2f", &[Value::Float(1.5)]).unwrap(), "1.50");
	}

	#[rstest]
	fn surplus_arguments_are_ignored() {
		let args = [Value::Int(1), Value::Int(2)];
		assert_eq!(sprintf("%d item", &args).unwrap(), "1 item");
	}

	#[rstest]
	fn missing_argument_is_an_error() {
		let err = sprintf("%s and %s", &[Value::Str("one".into())]).unwrap_err();
		match err {
			RenderError::MissingFormatArg { verb, index, .. } => {
				assert_eq!(verb, 's');
				assert_eq!(index, 1);
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn integer_verb_parses_strings() {
		assert_eq!(sprintf("%d", &[Value::Str("12".into())]).unwrap(), "12");
	}

	#[rstest]
	fn unknown_verb_passes_through() {
		assert_eq!(sprintf("%q", &[]).unwrap(), "%q");
	}
}
