// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route and namespace declarations.
//!
//! Declarations hold raw templates; they are validated when the
//! [`RouteTable`](crate::RouteTable) is built.

use std::sync::Arc;

use crate::view::View;

/// A single route: a default template, optional per-locale translations, an
/// optional name and a view.
///
/// ```
/// use axum::response::IntoResponse;
/// use loom_server_urls::{view_fn, Route, ViewResponse};
///
/// let about = Route::new("/about/", view_fn(|_| async {
///     Ok(ViewResponse::from("About".into_response()))
/// }))
/// .name("about")
/// .translate("fr", "/a-propos/")
/// .translate("es", "/acerca-de/");
/// # let _ = about;
/// ```
#[derive(Clone)]
pub struct Route {
	pub(crate) pattern: String,
	pub(crate) name: Option<String>,
	pub(crate) translations: Vec<(String, String)>,
	pub(crate) view: Arc<dyn View>,
}

impl Route {
	pub fn new(pattern: impl Into<String>, view: impl View + 'static) -> Self {
		Self::with_view(pattern, Arc::new(view))
	}

	/// Build a route around a view that is shared with other routes.
	pub fn with_view(pattern: impl Into<String>, view: Arc<dyn View>) -> Self {
		Self {
			pattern: pattern.into(),
			name: None,
			translations: Vec::new(),
			view,
		}
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Use `pattern` instead of the default template under `locale`.
	pub fn translate(mut self, locale: impl Into<String>, pattern: impl Into<String>) -> Self {
		self.translations.push((locale.into(), pattern.into()));
		self
	}
}

/// A named group of routes and nested namespaces.
#[derive(Clone)]
pub struct Namespace {
	pub(crate) name: String,
	pub(crate) routes: Vec<Route>,
	pub(crate) children: Vec<Namespace>,
}

impl Namespace {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			routes: Vec::new(),
			children: Vec::new(),
		}
	}

	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	pub fn nest(mut self, namespace: Namespace) -> Self {
		self.children.push(namespace);
		self
	}
}
