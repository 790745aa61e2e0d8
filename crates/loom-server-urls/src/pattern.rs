// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path templates.
//!
//! A template is a `/`-separated list of segments:
//!
//! - `about` matches the literal segment `about`
//! - `{slug}` captures one non-empty segment as the named argument `slug`
//! - `{}` captures one non-empty segment as a positional argument
//!
//! A trailing slash is significant: `/about/` and `/about` are different
//! templates.

use std::collections::BTreeSet;

use crate::error::PatternError;
use crate::resolver::Kwargs;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Named(String),
	Positional,
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
	raw: String,
	segments: Vec<Segment>,
}

/// Arguments captured by a successful match.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Captures {
	pub args: Vec<String>,
	pub kwargs: Kwargs,
}

impl Pattern {
	pub fn parse(raw: &str) -> Result<Self, PatternError> {
		let Some(rest) = raw.strip_prefix('/') else {
			return Err(PatternError::MissingLeadingSlash(raw.to_string()));
		};

		let mut names = BTreeSet::new();
		let mut segments = Vec::new();
		for part in rest.split('/') {
			let segment = parse_segment(raw, part)?;
			if let Segment::Named(name) = &segment {
				if !names.insert(name.clone()) {
					return Err(PatternError::DuplicateParameter {
						pattern: raw.to_string(),
						name: name.clone(),
					});
				}
			}
			segments.push(segment);
		}

		Ok(Self {
			raw: raw.to_string(),
			segments,
		})
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Match an absolute path, returning the captured arguments.
	pub(crate) fn captures(&self, path: &str) -> Option<Captures> {
		let rest = path.strip_prefix('/')?;
		let parts: Vec<&str> = rest.split('/').collect();
		if parts.len() != self.segments.len() {
			return None;
		}

		let mut captures = Captures::default();
		for (segment, part) in self.segments.iter().zip(parts) {
			match segment {
				Segment::Literal(literal) => {
					if literal != part {
						return None;
					}
				}
				Segment::Named(name) => {
					if part.is_empty() {
						return None;
					}
					captures.kwargs.insert(name.clone(), part.to_string());
				}
				Segment::Positional => {
					if part.is_empty() {
						return None;
					}
					captures.args.push(part.to_string());
				}
			}
		}
		Some(captures)
	}

	/// Build a path from arguments, or `None` if they do not fit.
	///
	/// Positional and named arguments cannot be mixed. Every placeholder must
	/// be filled exactly once and values must be single non-empty segments.
	pub(crate) fn fill(&self, args: &[String], kwargs: &Kwargs) -> Option<String> {
		if !args.is_empty() && !kwargs.is_empty() {
			return None;
		}

		let positional = self
			.segments
			.iter()
			.filter(|s| matches!(s, Segment::Positional))
			.count();
		let named: BTreeSet<&str> = self
			.segments
			.iter()
			.filter_map(|s| match s {
				Segment::Named(name) => Some(name.as_str()),
				_ => None,
			})
			.collect();

		if args.len() != positional || kwargs.len() != named.len() {
			return None;
		}
		if !kwargs.keys().all(|k| named.contains(k.as_str())) {
			return None;
		}
		if !args.iter().chain(kwargs.values()).all(|v| is_segment_value(v)) {
			return None;
		}

		let mut args = args.iter();
		let mut path = String::with_capacity(self.raw.len());
		for segment in &self.segments {
			path.push('/');
			match segment {
				Segment::Literal(literal) => path.push_str(literal),
				Segment::Named(name) => path.push_str(kwargs.get(name)?),
				Segment::Positional => path.push_str(args.next()?),
			}
		}
		Some(path)
	}
}

fn parse_segment(pattern: &str, part: &str) -> Result<Segment, PatternError> {
	let unbalanced = || PatternError::UnbalancedBrace {
		pattern: pattern.to_string(),
		segment: part.to_string(),
	};

	if let Some(inner) = part.strip_prefix('{') {
		let inner = inner.strip_suffix('}').ok_or_else(unbalanced)?;
		if inner.contains(['{', '}']) {
			return Err(unbalanced());
		}
		if inner.is_empty() {
			return Ok(Segment::Positional);
		}
		if !inner.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
			|| inner.starts_with(|c: char| c.is_ascii_digit())
		{
			return Err(PatternError::InvalidParameter {
				pattern: pattern.to_string(),
				name: inner.to_string(),
			});
		}
		return Ok(Segment::Named(inner.to_string()));
	}

	if part.contains(['{', '}']) {
		return Err(unbalanced());
	}
	Ok(Segment::Literal(part.to_string()))
}

fn is_segment_value(value: &str) -> bool {
	!value.is_empty() && !value.contains(['/', '?', '#'])
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn kwargs(pairs: &[(&str, &str)]) -> Kwargs {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_root_pattern() {
		let pattern = Pattern::parse("/").unwrap();
		assert!(pattern.captures("/").is_some());
		assert!(pattern.captures("/x").is_none());
		assert_eq!(pattern.fill(&[], &Kwargs::new()).as_deref(), Some("/"));
	}

	#[test]
	fn test_trailing_slash_is_significant() {
		let pattern = Pattern::parse("/about/").unwrap();
		assert!(pattern.captures("/about/").is_some());
		assert!(pattern.captures("/about").is_none());
	}

	#[test]
	fn test_named_capture() {
		let pattern = Pattern::parse("/articles/{slug}/").unwrap();
		let captures = pattern.captures("/articles/hello-world/").unwrap();
		assert!(captures.args.is_empty());
		assert_eq!(captures.kwargs, kwargs(&[("slug", "hello-world")]));
	}

	#[test]
	fn test_positional_capture_keeps_order() {
		let pattern = Pattern::parse("/archive/{}/{}/").unwrap();
		let captures = pattern.captures("/archive/2024/05/").unwrap();
		assert_eq!(captures.args, vec!["2024".to_string(), "05".to_string()]);
	}

	#[test]
	fn test_empty_segment_does_not_capture() {
		let pattern = Pattern::parse("/articles/{slug}/").unwrap();
		assert!(pattern.captures("/articles//").is_none());
	}

	#[test]
	fn test_fill_named() {
		let pattern = Pattern::parse("/articles/{slug}/").unwrap();
		assert_eq!(
			pattern.fill(&[], &kwargs(&[("slug", "rust")])).as_deref(),
			Some("/articles/rust/")
		);
	}

	#[test]
	fn test_fill_rejects_wrong_arity() {
		let pattern = Pattern::parse("/archive/{}/{}/").unwrap();
		assert!(pattern.fill(&["2024".to_string()], &Kwargs::new()).is_none());
		assert!(pattern
			.fill(&["2024".to_string()], &kwargs(&[("month", "05")]))
			.is_none());
	}

	#[test]
	fn test_fill_rejects_unknown_kwarg() {
		let pattern = Pattern::parse("/articles/{slug}/").unwrap();
		assert!(pattern.fill(&[], &kwargs(&[("id", "3")])).is_none());
	}

	#[test]
	fn test_fill_rejects_values_that_span_segments() {
		let pattern = Pattern::parse("/articles/{slug}/").unwrap();
		assert!(pattern.fill(&[], &kwargs(&[("slug", "a/b")])).is_none());
		assert!(pattern.fill(&[], &kwargs(&[("slug", "")])).is_none());
	}

	#[test]
	fn test_parse_errors() {
		assert!(matches!(
			Pattern::parse("about/"),
			Err(PatternError::MissingLeadingSlash(_))
		));
		assert!(matches!(
			Pattern::parse("/{slug/"),
			Err(PatternError::UnbalancedBrace { .. })
		));
		assert!(matches!(
			Pattern::parse("/a}b/"),
			Err(PatternError::UnbalancedBrace { .. })
		));
		assert!(matches!(
			Pattern::parse("/{my-slug}/"),
			Err(PatternError::InvalidParameter { .. })
		));
		assert!(matches!(
			Pattern::parse("/{id}/{id}/"),
			Err(PatternError::DuplicateParameter { .. })
		));
	}

	proptest! {
		#[test]
		fn prop_filled_path_captures_same_arguments(
			year in "[0-9]{4}",
			slug in "[^/?#]{1,12}",
		) {
			let named = Pattern::parse("/blog/{year}/{slug}/").unwrap();
			let values = kwargs(&[("year", year.as_str()), ("slug", slug.as_str())]);
			let path = named.fill(&[], &values).unwrap();
			let captures = named.captures(&path).unwrap();
			prop_assert!(captures.args.is_empty());
			prop_assert_eq!(captures.kwargs, values);

			let positional = Pattern::parse("/archive/{}/{}/").unwrap();
			let args = vec![year, slug];
			let path = positional.fill(&args, &Kwargs::new()).unwrap();
			prop_assert_eq!(positional.captures(&path).unwrap().args, args);
		}
	}
}
