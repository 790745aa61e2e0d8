// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The route table: an ordered, locale-aware [`UrlResolver`].

use std::collections::HashMap;
use std::sync::Arc;

use loom_common_i18n::{Locale, LocaleContext};
use tracing::trace;

use crate::error::{PatternError, ResolveError, ReverseError};
use crate::pattern::Pattern;
use crate::resolver::{split_view_name, Kwargs, ResolverMatch, UrlResolver};
use crate::route::{Namespace, Route};
use crate::view::View;

/// Whether paths carry a `/<locale>` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalePrefix {
	/// Paths are never prefixed.
	#[default]
	None,
	/// Every path is prefixed with `/<locale>`.
	All,
	/// Every path except those of the table's default locale is prefixed.
	ExceptDefault,
}

struct Entry {
	name: Option<String>,
	namespaces: Vec<String>,
	pattern: Pattern,
	translations: HashMap<Locale, Pattern>,
	view: Arc<dyn View>,
}

impl Entry {
	fn pattern_for(&self, locale: &Locale) -> &Pattern {
		self.translations.get(locale).unwrap_or(&self.pattern)
	}

	fn is_reverse_candidate(&self, namespaces: &[&str], name: &str) -> bool {
		if self.name.as_deref() != Some(name) {
			return false;
		}
		if namespaces.is_empty() {
			return self.namespaces.is_empty();
		}
		// A qualifier only has to name the innermost namespaces.
		self.namespaces.len() >= namespaces.len()
			&& self.namespaces[self.namespaces.len() - namespaces.len()..]
				.iter()
				.zip(namespaces)
				.all(|(have, want)| have.as_str() == *want)
	}
}

/// Ordered routes resolved under the active locale of a [`LocaleContext`].
///
/// Routes are tried in registration order and the first match wins, both for
/// resolution and for reverse lookups.
pub struct RouteTable {
	entries: Vec<Entry>,
	prefix: LocalePrefix,
	default_locale: Locale,
}

enum Item {
	Route(Route),
	Namespace(Namespace),
}

/// Builder for [`RouteTable`].
#[derive(Default)]
pub struct RouteTableBuilder {
	items: Vec<Item>,
	prefix: LocalePrefix,
	default_locale: Locale,
}

impl RouteTableBuilder {
	pub fn route(mut self, route: Route) -> Self {
		self.items.push(Item::Route(route));
		self
	}

	pub fn namespace(mut self, namespace: Namespace) -> Self {
		self.items.push(Item::Namespace(namespace));
		self
	}

	pub fn locale_prefix(mut self, prefix: LocalePrefix) -> Self {
		self.prefix = prefix;
		self
	}

	/// Locale used when a request carries no [`LocaleContext`], and the
	/// unprefixed locale for [`LocalePrefix::ExceptDefault`].
	pub fn default_locale(mut self, locale: Locale) -> Self {
		self.default_locale = locale;
		self
	}

	pub fn build(self) -> Result<RouteTable, PatternError> {
		let mut entries = Vec::new();
		for item in self.items {
			match item {
				Item::Route(route) => entries.push(compile(route, &[])?),
				Item::Namespace(namespace) => flatten(namespace, &mut Vec::new(), &mut entries)?,
			}
		}

		trace!(routes = entries.len(), prefix = ?self.prefix, "route table built");
		Ok(RouteTable {
			entries,
			prefix: self.prefix,
			default_locale: self.default_locale,
		})
	}
}

fn flatten(
	namespace: Namespace,
	chain: &mut Vec<String>,
	entries: &mut Vec<Entry>,
) -> Result<(), PatternError> {
	chain.push(namespace.name);
	for route in namespace.routes {
		entries.push(compile(route, chain)?);
	}
	for child in namespace.children {
		flatten(child, chain, entries)?;
	}
	chain.pop();
	Ok(())
}

fn compile(route: Route, namespaces: &[String]) -> Result<Entry, PatternError> {
	let pattern = Pattern::parse(&route.pattern)?;
	let mut translations = HashMap::new();
	for (locale, raw) in &route.translations {
		translations.insert(locale.parse::<Locale>()?, Pattern::parse(raw)?);
	}

	Ok(Entry {
		name: route.name,
		namespaces: namespaces.to_vec(),
		pattern,
		translations,
		view: route.view,
	})
}

impl RouteTable {
	pub fn builder() -> RouteTableBuilder {
		RouteTableBuilder::default()
	}

	pub fn default_locale(&self) -> &Locale {
		&self.default_locale
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn locale_segment<'a>(&self, locale: &'a Locale) -> Option<&'a str> {
		match self.prefix {
			LocalePrefix::None => None,
			LocalePrefix::All => Some(locale.as_str()),
			LocalePrefix::ExceptDefault if *locale == self.default_locale => None,
			LocalePrefix::ExceptDefault => Some(locale.as_str()),
		}
	}

	/// Strip the locale prefix from `path`, or `None` if it is missing.
	fn local_path<'p>(&self, path: &'p str, locale: &Locale) -> Option<&'p str> {
		match self.locale_segment(locale) {
			None => Some(path),
			Some(segment) => path
				.strip_prefix('/')
				.and_then(|rest| rest.strip_prefix(segment))
				.filter(|rest| rest.starts_with('/')),
		}
	}

	fn prefixed(&self, path: String, locale: &Locale) -> String {
		match self.locale_segment(locale) {
			None => path,
			Some(segment) => format!("/{segment}{path}"),
		}
	}
}

impl UrlResolver for RouteTable {
	fn resolve(&self, path: &str, ctx: &LocaleContext) -> Result<ResolverMatch, ResolveError> {
		if !path.starts_with('/') {
			return Err(ResolveError::InvalidPath {
				path: path.to_string(),
			});
		}

		let locale = ctx.active();
		let not_found = || ResolveError::NotFound {
			path: path.to_string(),
		};
		let local_path = self.local_path(path, locale).ok_or_else(not_found)?;

		for entry in &self.entries {
			let pattern = entry.pattern_for(locale);
			if let Some(captures) = pattern.captures(local_path) {
				trace!(%path, %locale, route = pattern.as_str(), "path resolved");
				return Ok(ResolverMatch {
					view: Arc::clone(&entry.view),
					args: captures.args,
					kwargs: captures.kwargs,
					url_name: entry.name.clone(),
					namespaces: entry.namespaces.clone(),
					route: pattern.as_str().to_string(),
				});
			}
		}

		Err(not_found())
	}

	fn reverse(
		&self,
		view_name: &str,
		args: &[String],
		kwargs: &Kwargs,
		ctx: &LocaleContext,
	) -> Result<String, ReverseError> {
		let (namespaces, name) = split_view_name(view_name);
		let locale = ctx.active();

		let mut candidates = 0usize;
		for entry in self
			.entries
			.iter()
			.filter(|e| e.is_reverse_candidate(&namespaces, name))
		{
			candidates += 1;
			if let Some(path) = entry.pattern_for(locale).fill(args, kwargs) {
				return Ok(self.prefixed(path, locale));
			}
		}

		if candidates == 0 {
			Err(ReverseError::NoReverseMatch {
				view_name: view_name.to_string(),
			})
		} else {
			Err(ReverseError::ArgumentMismatch {
				view_name: view_name.to_string(),
				args: args.len(),
				kwargs: kwargs.len(),
			})
		}
	}
}
