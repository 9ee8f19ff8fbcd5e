//! Language tags and the tag matcher
//!
//! Matching is graded: an exact tag hit wins, a primary-language hit with
//! compatible regions ranks high, a primary-language hit with conflicting
//! regions ranks low, anything else falls back to the first registered
//! tag. Non-strict matchers grow on demand: a tag that only matched low
//! is appended as a new supported language and reported as exact.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::warn;
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// A parsed BCP-47 language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(LanguageIdentifier);

impl LanguageTag {
	pub fn parse(tag: &str) -> Result<Self, Error> {
		LanguageIdentifier::from_str(tag)
			.map(Self)
			.map_err(|_| Error::InvalidTag {
				tag: tag.to_string(),
			})
	}

	/// The primary language subtag, e.g. `en` for `en-US`.
	pub fn language(&self) -> &str {
		self.0.language.as_str()
	}

	pub fn region(&self) -> Option<&str> {
		self.0.region.as_ref().map(|r| r.as_str())
	}
}

impl fmt::Display for LanguageTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// How well a desired tag matched a supported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
	/// No supported language shares a primary language with the desired
	/// tag. The match result is the first registered tag.
	No,
	/// Primary languages agree but the regions conflict.
	Low,
	/// Primary languages agree and the regions are compatible (equal, or
	/// one side unspecified).
	High,
	Exact,
}

/// Matches desired language tags against the registered set.
#[derive(Debug, Clone)]
pub struct Matcher {
	languages: Vec<LanguageTag>,
	strict: bool,
}

impl Matcher {
	/// A matcher over `tags`. Strictness is fixed at construction: a
	/// matcher built over an explicit tag set never grows, one built
	/// empty accepts every language it is asked for.
	pub fn new(tags: Vec<LanguageTag>) -> Self {
		let strict = !tags.is_empty();
		Self {
			languages: tags,
			strict,
		}
	}

	pub fn languages(&self) -> &[LanguageTag] {
		&self.languages
	}

	pub fn is_strict(&self) -> bool {
		self.strict
	}

	/// Matches the first acceptable desired tag, in preference order.
	/// Always produces a result: with no usable candidate the first
	/// registered tag is returned with [`Confidence::No`].
	pub fn match_tags(&self, desired: &[LanguageTag]) -> (LanguageTag, usize, Confidence) {
		let mut best: Option<(usize, Confidence)> = None;

		for want in desired {
			// Full scan per desired tag: an exact hit later in the list
			// must beat an earlier same-language match.
			let mut candidate: Option<(usize, Confidence)> = None;
			for (index, have) in self.languages.iter().enumerate() {
				let confidence = grade(want, have);
				if confidence == Confidence::Exact {
					return (have.clone(), index, confidence);
				}
				if confidence > Confidence::No
					&& candidate.is_none_or(|(_, seen)| confidence > seen)
				{
					candidate = Some((index, confidence));
				}
			}
			match candidate {
				Some((index, Confidence::High)) => {
					return (self.languages[index].clone(), index, Confidence::High);
				}
				Some(low) => {
					if best.is_none() {
						best = Some(low);
					}
				}
				None => {}
			}
		}

		match best {
			Some((index, confidence)) => (self.languages[index].clone(), index, confidence),
			None => (
				self.languages.first().cloned().unwrap_or_else(|| {
					LanguageTag::parse("und").expect("undetermined tag")
				}),
				0,
				Confidence::No,
			),
		}
	}

	/// Like [`Matcher::match_tags`] for one tag, but a non-strict matcher
	/// adopts tags it cannot place well: a [`Confidence::Low`] or worse
	/// match appends `desired` as a new supported language and reports it
	/// as exact at its new index.
	pub fn match_or_add(&mut self, desired: LanguageTag) -> (LanguageTag, usize, Confidence) {
		let (tag, index, confidence) = self.match_tags(std::slice::from_ref(&desired));
		if confidence > Confidence::Low || self.strict {
			return (tag, index, confidence);
		}

		self.languages.push(desired.clone());
		(desired, self.languages.len() - 1, Confidence::Exact)
	}

	/// Matches a language name, either a bare tag (`en-US`) or an
	/// `Accept-Language` header. `None` when nothing matched better than
	/// [`Confidence::Low`].
	pub fn match_str(&self, s: &str) -> Option<(LanguageTag, usize, Confidence)> {
		let desired = parse_accept_language(s);
		if desired.is_empty() {
			return None;
		}
		let (tag, index, confidence) = self.match_tags(&desired);
		(confidence > Confidence::Low).then_some((tag, index, confidence))
	}

	/// Groups translation file names by locale index. Each name's tag is
	/// parsed from its path and matched (or, non-strict, adopted); names
	/// with no recognizable or acceptable language are skipped.
	pub fn parse_language_files(&mut self, names: &[String]) -> BTreeMap<usize, Vec<String>> {
		let mut grouped: BTreeMap<usize, Vec<String>> = BTreeMap::new();
		for name in names {
			let Some(tag) = parse_language(name) else {
				warn!(file = %name, "no language tag in file name, skipping");
				continue;
			};
			let (_, index, confidence) = self.match_or_add(tag);
			if confidence <= Confidence::Low {
				warn!(file = %name, "language not registered, skipping");
				continue;
			}
			grouped.entry(index).or_default().push(name.clone());
		}
		grouped
	}

	/// Swaps two registered tags, used when the default locale moves to
	/// the front.
	pub fn swap(&mut self, a: usize, b: usize) {
		if a < self.languages.len() && b < self.languages.len() {
			self.languages.swap(a, b);
		}
	}
}

fn grade(want: &LanguageTag, have: &LanguageTag) -> Confidence {
	if want == have {
		return Confidence::Exact;
	}
	if want.language() != have.language() || want.language() == "und" {
		return Confidence::No;
	}
	match (want.region(), have.region()) {
		(Some(w), Some(h)) if w != h => Confidence::Low,
		_ => Confidence::High,
	}
}

/// Extracts a language tag from a translation file path. The extension
/// is stripped, then path segments are scanned right to left, so
/// `locales/el_GR/home.messages.yml` and `user_el-GR.json` both yield
/// `el-GR`.
pub fn parse_language(path: &str) -> Option<LanguageTag> {
	let stem = match path.rfind('.') {
		Some(idx) if idx > 0 => &path[..idx],
		_ => path,
	};

	let mut segments: Vec<&str> = stem
		.split(['.', '/', '\\'])
		.filter(|s| !s.is_empty())
		.collect();

	segments.reverse();
	segments.into_iter().find_map(tag_from_segment)
}

// Tries a segment like "user_el-GR": underscores count as dashes, and
// prefixes are peeled off until a suffix parses as a tag. Bare subtags
// longer than three letters ("messages", "common") are ordinary words,
// not languages, and are skipped.
fn tag_from_segment(segment: &str) -> Option<LanguageTag> {
	let normalized = segment.replace('_', "-");
	let parts: Vec<&str> = normalized.split('-').filter(|p| !p.is_empty()).collect();

	for start in 0..parts.len() {
		let candidate = parts[start..].join("-");
		if let Ok(tag) = LanguageTag::parse(&candidate)
			&& tag.language() != "und"
			&& (parts.len() - start > 1 || tag.language().len() <= 3)
		{
			return Some(tag);
		}
	}
	None
}

/// Parses an `Accept-Language` header (or a bare tag) into tags ordered
/// by descending quality. Unparsable entries are skipped.
pub fn parse_accept_language(header: &str) -> Vec<LanguageTag> {
	let mut weighted: Vec<(LanguageTag, f32)> = Vec::new();

	for entry in header.split(',') {
		let mut parts = entry.split(';');
		let tag = match parts.next().map(str::trim) {
			Some(tag) if !tag.is_empty() && tag != "*" => tag,
			_ => continue,
		};
		let Ok(tag) = LanguageTag::parse(tag) else {
			continue;
		};

		let quality = parts
			.find_map(|p| p.trim().strip_prefix("q=").map(str::to_string))
			.and_then(|q| q.parse::<f32>().ok())
			.unwrap_or(1.0);
		if quality > 0.0 {
			weighted.push((tag, quality));
		}
	}

	weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
	weighted.into_iter().map(|(tag, _)| tag).collect()
}
