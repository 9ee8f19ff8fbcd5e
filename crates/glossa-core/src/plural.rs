//! Plural form tokens: parsing, priority ordering and count matching
//!
//! The recognized tokens are the CLDR-style keywords `zero`, `one`, `two`,
//! `other` plus the numeric comparison rules `=N`, `<N` and `>N`. Anything
//! else is *not* a plural form; callers must treat such keys as ordinary
//! nested map levels instead of guessing.

use std::cmp::Ordering;
use std::fmt;

/// A single plural-form rule.
///
/// Forms carry a priority ordering so that a message's plural branches can
/// be kept sorted most-specific-first: equality rules (`=N`) come before
/// bound rules (`<N`, `>N`, ordered by their bound), then the keywords
/// `zero`, `one`, `two`, with `other` always last — it is the catch-all and
/// only works as a fallback because evaluation takes the first match.
///
/// # Examples
///
/// ```
/// use glossa_core::plural::PluralForm;
///
/// let eq = PluralForm::parse("=3").unwrap();
/// let other = PluralForm::parse("other").unwrap();
/// assert!(eq < other);
/// assert!(eq.match_plural(3));
/// assert!(other.match_plural(3));
/// assert!(PluralForm::parse("many").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PluralForm {
	Zero,
	One,
	Two,
	Other,
	/// `=N`: matches exactly N.
	Eq(u32),
	/// `<N`: matches counts below N.
	Lt(u32),
	/// `>N`: matches counts above N.
	Gt(u32),
}

impl PluralForm {
	/// Parses a plural-form token, strictly.
	///
	/// Returns `None` for anything outside the recognized set, including
	/// partially numeric tokens like `=1x`.
	pub fn parse(token: &str) -> Option<Self> {
		match token {
			"zero" => return Some(PluralForm::Zero),
			"one" => return Some(PluralForm::One),
			"two" => return Some(PluralForm::Two),
			"other" => return Some(PluralForm::Other),
			_ => {}
		}

		let mut chars = token.chars();
		let op = chars.next()?;
		let rest = chars.as_str();
		if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		let n: u32 = rest.parse().ok()?;

		match op {
			'=' => Some(PluralForm::Eq(n)),
			'<' => Some(PluralForm::Lt(n)),
			'>' => Some(PluralForm::Gt(n)),
			_ => None,
		}
	}

	/// Reports whether this form matches the given plural count.
	///
	/// `other` matches everything; the keywords are equivalent to `=0`,
	/// `=1` and `=2`.
	pub fn match_plural(&self, count: i64) -> bool {
		match self {
			PluralForm::Other => true,
			PluralForm::Zero => count == 0,
			PluralForm::One => count == 1,
			PluralForm::Two => count == 2,
			PluralForm::Eq(n) => count == i64::from(*n),
			PluralForm::Lt(n) => count < i64::from(*n),
			PluralForm::Gt(n) => count > i64::from(*n),
		}
	}

	// Priority class: smaller sorts earlier. Numeric forms carry their
	// bound so =1 < =2 and <3 sorts with its bound against >2.
	fn rank(&self) -> (u8, u32, u8) {
		match self {
			PluralForm::Eq(n) => (0, *n, 0),
			PluralForm::Lt(n) => (1, *n, 0),
			PluralForm::Gt(n) => (1, *n, 1),
			PluralForm::Zero => (2, 0, 0),
			PluralForm::One => (3, 0, 0),
			PluralForm::Two => (4, 0, 0),
			PluralForm::Other => (5, 0, 0),
		}
	}
}

impl PartialOrd for PluralForm {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for PluralForm {
	fn cmp(&self, other: &Self) -> Ordering {
		self.rank().cmp(&other.rank())
	}
}

impl fmt::Display for PluralForm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PluralForm::Zero => f.write_str("zero"),
			PluralForm::One => f.write_str("one"),
			PluralForm::Two => f.write_str("two"),
			PluralForm::Other => f.write_str("other"),
			PluralForm::Eq(n) => write!(f, "={n}"),
			PluralForm::Lt(n) => write!(f, "<{n}"),
			PluralForm::Gt(n) => write!(f, ">{n}"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("zero", PluralForm::Zero)]
	#[case("one", PluralForm::One)]
	#[case("two", PluralForm::Two)]
	#[case("other", PluralForm::Other)]
	#[case("=0", PluralForm::Eq(0))]
	#[case("=12", PluralForm::Eq(12))]
	#[case("<5", PluralForm::Lt(5))]
	#[case(">100", PluralForm::Gt(100))]
	fn parses_recognized_tokens(#[case] token: &str, #[case] expected: PluralForm) {
		assert_eq!(PluralForm::parse(token), Some(expected));
	}

	#[rstest]
	#[case("many")]
	#[case("few")]
	#[case("=")]
	#[case("=1x")]
	#[case("<-1")]
	#[case("")]
	#[case("Other")]
	fn rejects_unrecognized_tokens(#[case] token: &str) {
		assert_eq!(PluralForm::parse(token), None);
	}

	#[rstest]
	#[case(PluralForm::Other, 0, true)]
	#[case(PluralForm::Other, 999, true)]
	#[case(PluralForm::Zero, 0, true)]
	#[case(PluralForm::Zero, 1, false)]
	#[case(PluralForm::One, 1, true)]
	#[case(PluralForm::Two, 2, true)]
	#[case(PluralForm::Eq(0), 0, true)]
	#[case(PluralForm::Eq(5), 5, true)]
	#[case(PluralForm::Eq(5), 4, false)]
	#[case(PluralForm::Lt(5), 4, true)]
	#[case(PluralForm::Lt(5), 5, false)]
	#[case(PluralForm::Gt(5), 6, true)]
	#[case(PluralForm::Gt(5), 5, false)]
	fn matches_counts(#[case] form: PluralForm, #[case] count: i64, #[case] expected: bool) {
		assert_eq!(form.match_plural(count), expected);
	}

	#[rstest]
	fn equality_forms_sort_before_everything_else() {
		let eq = PluralForm::Eq(40);
		for other in [
			PluralForm::Lt(1),
			PluralForm::Gt(0),
			PluralForm::Zero,
			PluralForm::One,
			PluralForm::Two,
			PluralForm::Other,
		] {
			assert!(eq < other, "=40 should sort before {other}");
		}
	}

	#[rstest]
	fn other_sorts_last() {
		for form in [
			PluralForm::Eq(0),
			PluralForm::Lt(100),
			PluralForm::Gt(100),
			PluralForm::Zero,
			PluralForm::One,
			PluralForm::Two,
		] {
			assert!(form < PluralForm::Other, "{form} should sort before other");
		}
	}

	#[rstest]
	fn numeric_bound_orders_within_comparison_forms() {
		assert!(PluralForm::Eq(1) < PluralForm::Eq(2));
		assert!(PluralForm::Lt(2) < PluralForm::Lt(3));
		assert!(PluralForm::Gt(2) < PluralForm::Lt(3));
		assert!(PluralForm::Lt(3) < PluralForm::Gt(3));
	}

	#[rstest]
	fn sorted_evaluation_order_is_most_specific_first() {
		let mut forms = vec![
			PluralForm::Other,
			PluralForm::One,
			PluralForm::Gt(10),
			PluralForm::Eq(0),
		];
		forms.sort();
		assert_eq!(
			forms,
			vec![
				PluralForm::Eq(0),
				PluralForm::Gt(10),
				PluralForm::One,
				PluralForm::Other,
			]
		);
	}

	#[rstest]
	fn display_round_trips() {
		for token in ["zero", "one", "two", "other", "=3", "<7", ">9"] {
			let form = PluralForm::parse(token).unwrap();
			assert_eq!(form.to_string(), token);
		}
	}
}
