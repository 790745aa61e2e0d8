// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The resolver seam: mapping paths to views and names back to paths.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use loom_common_i18n::LocaleContext;

use crate::error::{ResolveError, ReverseError};
use crate::view::View;

/// Named arguments captured from, or supplied to, a pattern.
pub type Kwargs = BTreeMap<String, String>;

/// Separator between namespaces and the route name in a view name.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Resolves request paths and reverses route names.
///
/// Both operations read the active locale from the supplied
/// [`LocaleContext`]; implementations must not keep locale state of their own.
pub trait UrlResolver: Send + Sync {
	/// Map `path` to a route under the active locale.
	fn resolve(&self, path: &str, ctx: &LocaleContext) -> Result<ResolverMatch, ResolveError>;

	/// Build the path for `view_name` (`name` or `ns:...:name`) under the
	/// active locale.
	fn reverse(
		&self,
		view_name: &str,
		args: &[String],
		kwargs: &Kwargs,
		ctx: &LocaleContext,
	) -> Result<String, ReverseError>;
}

/// The result of a successful [`UrlResolver::resolve`].
#[derive(Clone)]
pub struct ResolverMatch {
	pub view: Arc<dyn View>,
	pub args: Vec<String>,
	pub kwargs: Kwargs,
	pub url_name: Option<String>,
	/// Enclosing namespaces, outermost first.
	pub namespaces: Vec<String>,
	/// The template that matched.
	pub route: String,
}

impl ResolverMatch {
	/// The full namespace chain joined with `:`, if any.
	pub fn namespace(&self) -> Option<String> {
		if self.namespaces.is_empty() {
			None
		} else {
			Some(self.namespaces.join(":"))
		}
	}

	pub fn innermost_namespace(&self) -> Option<&str> {
		self.namespaces.last().map(String::as_str)
	}

	/// `ns1:ns2:name`, or the bare name outside any namespace.
	pub fn view_name(&self) -> Option<String> {
		let name = self.url_name.as_deref()?;
		Some(match self.namespace() {
			Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{name}"),
			None => name.to_string(),
		})
	}
}

impl fmt::Debug for ResolverMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResolverMatch")
			.field("args", &self.args)
			.field("kwargs", &self.kwargs)
			.field("url_name", &self.url_name)
			.field("namespaces", &self.namespaces)
			.field("route", &self.route)
			.finish_non_exhaustive()
	}
}

/// Split `ns1:ns2:name` into `(["ns1", "ns2"], "name")`.
pub(crate) fn split_view_name(view_name: &str) -> (Vec<&str>, &str) {
	let mut parts: Vec<&str> = view_name.split(NAMESPACE_SEPARATOR).collect();
	let name = parts.pop().unwrap_or_default();
	(parts, name)
}
