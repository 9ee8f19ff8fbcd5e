//! Runtime argument values passed to message rendering

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Reserved map key carrying the plural count of a message.
pub const PLURAL_COUNT_KEY: &str = "PluralCount";
/// Suffix of the map key carrying a variable's count, e.g. `HousesCount`
/// for `${Houses}`.
pub const VAR_COUNT_SUFFIX: &str = "Count";

/// Resolves plural and per-variable counts for data arguments that are
/// neither maps nor bare integers.
///
/// Implement this on domain types so they can be handed to `tr` directly:
/// `plural_count` drives the plural-form selection of the message itself,
/// `var_count` drives the case selection of each `${Name}` variable.
/// A negative return means "no count available".
pub trait PluralCounter: Send + Sync {
	/// The plural count of the message, or a negative value if this
	/// argument does not carry one.
	fn plural_count(&self) -> i64;

	/// The count for the variable `name`, or a negative value if unknown.
	fn var_count(&self, name: &str) -> i64;
}

/// An ordered string-keyed map of render arguments.
pub type ValueMap = IndexMap<String, Value>;

/// A single render argument.
///
/// Messages receive a slice of these; plural counts and variable counts are
/// resolved from them in the documented preference order (counter argument,
/// map entry, bare integer).
#[derive(Clone)]
pub enum Value {
	Int(i64),
	Float(f64),
	Bool(bool),
	Str(String),
	Map(ValueMap),
	Counter(Arc<dyn PluralCounter>),
}

impl Value {
	/// Returns the integer content of this value, parsing strings if
	/// needed. A counter contributes its plural count, a map its
	/// `PluralCount` entry, so `%d` verbs can format the count argument
	/// of a pluralized message whatever shape it takes.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(n) => Some(*n),
			Value::Str(s) => s.trim().parse().ok(),
			Value::Float(f) => Some(*f as i64),
			Value::Counter(c) => {
				let count = c.plural_count();
				(count >= 0).then_some(count)
			}
			Value::Map(m) => m.get(PLURAL_COUNT_KEY).and_then(Value::as_int),
			Value::Bool(_) => None,
		}
	}

	/// Wraps a counter so it can ride in an argument list.
	pub fn from_counter(counter: impl PluralCounter + 'static) -> Self {
		Value::Counter(Arc::new(counter))
	}

	/// Looks up a dotted path inside a map value.
	pub fn lookup(&self, path: &[String]) -> Option<&Value> {
		let mut current = self;
		for segment in path {
			match current {
				Value::Map(m) => current = m.get(segment)?,
				_ => return None,
			}
		}
		Some(current)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Int(n) => write!(f, "{n}"),
			Value::Float(v) => write!(f, "{v}"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Str(s) => f.write_str(s),
			Value::Map(m) => {
				f.write_str("map[")?;
				for (i, (k, v)) in m.iter().enumerate() {
					if i > 0 {
						f.write_str(" ")?;
					}
					write!(f, "{k}:{v}")?;
				}
				f.write_str("]")
			}
			Value::Counter(_) => f.write_str("<counter>"),
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Int(n) => write!(f, "Int({n})"),
			Value::Float(v) => write!(f, "Float({v})"),
			Value::Bool(b) => write!(f, "Bool({b})"),
			Value::Str(s) => write!(f, "Str({s:?})"),
			Value::Map(m) => f.debug_tuple("Map").field(m).finish(),
			Value::Counter(_) => f.write_str("Counter(..)"),
		}
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Value::Int(n)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Value::Int(n.into())
	}
}

impl From<usize> for Value {
	fn from(n: usize) -> Self {
		Value::Int(n as i64)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl From<ValueMap> for Value {
	fn from(m: ValueMap) -> Self {
		Value::Map(m)
	}
}

/// Builds a [`ValueMap`] from key/value pairs, keeping insertion order.
pub fn value_map<I, K, V>(pairs: I) -> ValueMap
where
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<Value>,
{
	pairs
		.into_iter()
		.map(|(k, v)| (k.into(), v.into()))
		.collect()
}

/// Resolves the plural count of a message from its arguments.
///
/// Preference order: a [`PluralCounter`] argument, a map argument holding a
/// `PluralCount` entry, then a bare integer argument. Only the first
/// argument is inspected, matching the render contract.
pub fn resolve_plural_count(args: &[Value]) -> Option<i64> {
	args.first().and_then(Value::as_int)
}

/// Resolves the count of the variable `name` from data-style arguments.
///
/// Looks for a [`PluralCounter`] or a map entry `<name>Count` in the first
/// argument. Positional integer arguments are handled by the caller, which
/// knows the variable's argument position.
pub fn resolve_var_count(name: &str, args: &[Value]) -> Option<i64> {
	match args.first()? {
		Value::Counter(c) => {
			let count = c.var_count(name);
			(count >= 0).then_some(count)
		}
		Value::Map(m) => {
			let key = format!("{name}{VAR_COUNT_SUFFIX}");
			m.get(&key).and_then(Value::as_int)
		}
		_ => None,
	}
}
