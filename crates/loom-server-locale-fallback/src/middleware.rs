// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The locale fallback response processor and its tower layer.
//!
//! # Flow
//!
//! ```text
//! inner service → 404? ─ no ──────────────────────────────→ response unchanged
//!                   │
//!                   yes → resolve path under each configured locale (in order)
//!                           │
//!                           ├── no locale matches ────────→ response unchanged
//!                           └── first match
//!                                 ├── reverse under active locale → 302 redirect
//!                                 ├── reverse fails or targets the same path
//!                                 │     → call view (render deferred)
//!                                 └── view fails → fresh 404
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
	body::Body,
	http::{header::LOCATION, HeaderValue, Request, StatusCode},
	response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use loom_common_i18n::{Locale, LocaleContext};
use loom_server_urls::{
	decode_path, not_found, ResolveError, ResolverMatch, ReverseError, UrlResolver,
	NAMESPACE_SEPARATOR,
};
use tower::{Layer, Service};
use tracing::{debug, info, warn};

use crate::error::FallbackError;
use crate::scoped::resolve_under_locale;
use crate::url_parts::SplitUrl;

/// Retries 404 responses under every configured locale.
///
/// The resolver and the locale list are built once and shared by every
/// request; only the [`LocaleContext`] is per request.
#[derive(Clone)]
pub struct LocaleFallback {
	resolver: Arc<dyn UrlResolver>,
	languages: Arc<[Locale]>,
	default_locale: Locale,
	permanent_redirect: bool,
	enabled: bool,
}

impl LocaleFallback {
	/// Create a fallback trying `languages` in order.
	pub fn new(resolver: Arc<dyn UrlResolver>, languages: impl IntoIterator<Item = Locale>) -> Self {
		let languages: Arc<[Locale]> = languages.into_iter().collect();
		let default_locale = languages.first().cloned().unwrap_or_default();
		Self {
			resolver,
			languages,
			default_locale,
			permanent_redirect: false,
			enabled: true,
		}
	}

	/// Locale used for requests that carry no [`LocaleContext`] extension.
	pub fn default_locale(mut self, locale: Locale) -> Self {
		self.default_locale = locale;
		self
	}

	/// Answer with `301 Moved Permanently` instead of `302 Found`.
	pub fn permanent_redirect(mut self, permanent: bool) -> Self {
		self.permanent_redirect = permanent;
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn languages(&self) -> &[Locale] {
		&self.languages
	}

	pub fn layer(self) -> LocaleFallbackLayer {
		LocaleFallbackLayer::new(self)
	}

	/// Post-process `response` for `request`.
	///
	/// Responses other than 404 are returned untouched, as is a 404 whose path
	/// resolves under none of the configured locales.
	pub async fn process_response(
		&self,
		request: &Request<()>,
		ctx: &mut LocaleContext,
		response: Response,
	) -> Response {
		if !self.enabled || response.status() != StatusCode::NOT_FOUND {
			return response;
		}

		let raw_path = request.uri().path();
		let found = decode_path(raw_path).and_then(|path| self.find_match(&path, ctx));
		match found {
			Ok(Some((locale, matched))) => {
				debug!(path = %raw_path, %locale, route = %matched.route, "404 path resolves under another locale");
				self.handle_match(request, ctx, matched).await
			}
			Ok(None) => response,
			Err(e) => {
				warn!(path = %raw_path, error = %e, "resolver failed while trying locales");
				response
			}
		}
	}

	/// Try the configured locales in order and return the first match.
	pub fn find_match(
		&self,
		path: &str,
		ctx: &mut LocaleContext,
	) -> Result<Option<(Locale, ResolverMatch)>, ResolveError> {
		for locale in self.languages.iter() {
			if let Some(matched) = resolve_under_locale(path, locale, self.resolver.as_ref(), ctx)? {
				return Ok(Some((locale.clone(), matched)));
			}
		}
		Ok(None)
	}

	async fn handle_match(
		&self,
		request: &Request<()>,
		ctx: &LocaleContext,
		matched: ResolverMatch,
	) -> Response {
		let path = request.uri().path();

		let err = match self.redirect_by_reverse(request, ctx, &matched) {
			Ok(response) => return response,
			Err(e) => e,
		};
		debug!(%path, reason = %err, "redirect unavailable, rendering matched view");

		match render_by_view(request, &matched).await {
			Ok(response) => {
				info!(%path, route = %matched.route, status = %response.status(), "rendered view from another locale");
				response
			}
			Err(e) => {
				warn!(%path, route = %matched.route, error = %e, recoverable = e.is_recoverable(), "matched view failed");
				not_found()
			}
		}
	}

	fn redirect_by_reverse(
		&self,
		request: &Request<()>,
		ctx: &LocaleContext,
		matched: &ResolverMatch,
	) -> Result<Response, FallbackError> {
		let view_name = redirect_view_name(matched)?;
		let path = self
			.resolver
			.reverse(&view_name, &matched.args, &matched.kwargs, ctx)?;
		if decode_path(request.uri().path()).is_ok_and(|current| current == path.as_str()) {
			return Err(FallbackError::SelfRedirect(path));
		}

		let target = SplitUrl::from_request(request.uri(), request.headers())
			.map(|split| split.with_path(&path))
			.ok_or_else(|| FallbackError::InvalidLocation(request.uri().to_string()))?;
		let location = HeaderValue::try_from(target.as_str())
			.map_err(|_| FallbackError::InvalidLocation(target.clone()))?;

		let status = if self.permanent_redirect {
			StatusCode::MOVED_PERMANENTLY
		} else {
			StatusCode::FOUND
		};
		info!(from = %request.uri(), to = %target, %view_name, status = status.as_u16(), "redirecting to localized URL");
		Ok((status, [(LOCATION, location)]).into_response())
	}
}

/// `innermost_namespace:name`, or the bare name outside any namespace.
///
/// Unnamed routes cannot be reversed; the error names their template.
fn redirect_view_name(matched: &ResolverMatch) -> Result<String, FallbackError> {
	let Some(name) = matched.url_name.as_deref() else {
		return Err(ReverseError::NoReverseMatch {
			view_name: matched.route.clone(),
		}
		.into());
	};
	Ok(match matched.innermost_namespace() {
		Some(ns) => format!("{ns}{NAMESPACE_SEPARATOR}{name}"),
		None => name.to_string(),
	})
}

async fn render_by_view(
	request: &Request<()>,
	matched: &ResolverMatch,
) -> Result<Response, FallbackError> {
	let response = matched
		.view
		.call(request, &matched.args, &matched.kwargs)
		.await?;
	response.finish().map_err(FallbackError::from)
}

/// Tower layer applying a [`LocaleFallback`] to every response.
///
/// # Example
///
/// ```ignore
/// let fallback = LocaleFallback::new(table.clone(), [Locale::new("en"), Locale::new("fr")]);
/// Router::new()
///     .fallback_service(UrlDispatcher::new(table))
///     .layer(fallback.layer())
/// ```
#[derive(Clone)]
pub struct LocaleFallbackLayer {
	fallback: LocaleFallback,
}

impl LocaleFallbackLayer {
	pub fn new(fallback: LocaleFallback) -> Self {
		Self { fallback }
	}
}

impl<S> Layer<S> for LocaleFallbackLayer {
	type Service = LocaleFallbackService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		LocaleFallbackService {
			inner,
			fallback: self.fallback.clone(),
		}
	}
}

/// Service wrapper for [`LocaleFallbackLayer`].
#[derive(Clone)]
pub struct LocaleFallbackService<S> {
	inner: S,
	fallback: LocaleFallback,
}

impl<S> Service<Request<Body>> for LocaleFallbackService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
	S::Error: Send + 'static,
{
	type Response = Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Response, S::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		// The service that was driven to readiness is the one that must be called.
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		if !self.fallback.enabled {
			return Box::pin(inner.call(req));
		}

		let fallback = self.fallback.clone();
		let mut ctx = req
			.extensions()
			.get::<LocaleContext>()
			.cloned()
			.unwrap_or_else(|| LocaleContext::new(fallback.default_locale.clone()));
		let snapshot = snapshot(&req);

		Box::pin(async move {
			let response = inner.call(req).await?;
			Ok(fallback.process_response(&snapshot, &mut ctx, response).await)
		})
	}
}

/// A body-less copy of the request; the inner service consumes the original.
fn snapshot(req: &Request<Body>) -> Request<()> {
	let mut copy = Request::new(());
	*copy.method_mut() = req.method().clone();
	*copy.uri_mut() = req.uri().clone();
	*copy.version_mut() = req.version();
	*copy.headers_mut() = req.headers().clone();
	copy
}
