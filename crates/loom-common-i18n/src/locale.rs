// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

/// Errors produced when parsing a locale tag.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocaleError {
	/// The tag was empty or whitespace.
	#[error("locale tag must not be empty")]
	Empty,

	/// The tag contained characters that cannot appear in a language tag.
	#[error("invalid locale tag: {0}")]
	Invalid(String),
}

/// An opaque language tag such as `en` or `pt-BR`.
///
/// Two locales are equal when their tags are equal. No further structure
/// (region, script) is interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
	/// Create a locale from a tag that is known to be valid.
	///
	/// Surrounding whitespace is trimmed. Use [`str::parse`] for untrusted
	/// input.
	pub fn new(tag: impl AsRef<str>) -> Self {
		Self(tag.as_ref().trim().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Primary language subtag: `"fr"` for `"fr-CA"` or `"fr_CA"`.
	pub fn language(&self) -> &str {
		self.0.split(['-', '_']).next().unwrap_or(&self.0)
	}
}

impl Default for Locale {
	fn default() -> Self {
		Self::new(DEFAULT_LOCALE)
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Locale {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl FromStr for Locale {
	type Err = LocaleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let tag = s.trim();
		if tag.is_empty() {
			return Err(LocaleError::Empty);
		}
		if !tag
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		{
			return Err(LocaleError::Invalid(tag.to_string()));
		}
		Ok(Self(tag.to_string()))
	}
}

impl TryFrom<String> for Locale {
	type Error = LocaleError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<Locale> for String {
	fn from(locale: Locale) -> Self {
		locale.0
	}
}

impl From<&str> for Locale {
	fn from(tag: &str) -> Self {
		Self::new(tag)
	}
}

/// Parse an `Accept-Language` header value into locales ordered by quality.
///
/// Entries with `q=0`, wildcards and malformed tags are skipped. Entries with
/// equal quality keep their header order.
///
/// ```
/// use loom_common_i18n::parse_accept_language;
///
/// let locales = parse_accept_language("fr-CH, fr;q=0.9, en;q=0.8, *;q=0.5");
/// let tags: Vec<_> = locales.iter().map(|l| l.as_str()).collect();
/// assert_eq!(tags, ["fr-CH", "fr", "en"]);
/// ```
pub fn parse_accept_language(header: &str) -> Vec<Locale> {
	let mut weighted: Vec<(u16, Locale)> = header
		.split(',')
		.filter_map(|entry| {
			let mut parts = entry.split(';');
			let tag = parts.next()?.trim();
			if tag == "*" {
				return None;
			}
			let locale: Locale = tag.parse().ok()?;
			let quality = parts
				.find_map(|p| p.trim().strip_prefix("q="))
				.map(parse_quality)
				.unwrap_or(Some(1000))?;
			(quality > 0).then_some((quality, locale))
		})
		.collect();

	// Stable sort keeps header order for equal weights.
	weighted.sort_by(|a, b| b.0.cmp(&a.0));
	weighted.into_iter().map(|(_, locale)| locale).collect()
}

/// Quality values are parsed to thousandths to avoid float comparisons.
fn parse_quality(raw: &str) -> Option<u16> {
	let value: f32 = raw.trim().parse().ok()?;
	if !(0.0..=1.0).contains(&value) {
		return None;
	}
	Some((value * 1000.0).round() as u16)
}
