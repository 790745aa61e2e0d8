// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server for the localized Loom site.
//!
//! Requests flow through, outermost first:
//!
//! 1. request tracing (`tower-http`);
//! 2. locale detection, which seeds a per-request
//!    [`LocaleContext`](loom_common_i18n::LocaleContext) from `Accept-Language`;
//! 3. the locale fallback layer, which rescues 404s whose path belongs to
//!    another configured language;
//! 4. the router: fixed routes such as `/health`, then the localized
//!    [`RouteTable`](loom_server_urls::RouteTable) as the fallback service.

pub mod locale;
pub mod pages;
pub mod routes;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use loom_server_config::ServerConfig;
use loom_server_locale_fallback::LocaleFallback;
use loom_server_urls::{PatternError, UrlDispatcher};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router from resolved configuration.
///
/// Fails only if a page pattern is malformed.
pub fn create_router(config: &ServerConfig) -> Result<Router, PatternError> {
	let table = Arc::new(pages::build_routes(config.i18n.default_locale.clone())?);
	info!(routes = table.len(), "localized routes loaded");

	let fallback = LocaleFallback::new(table.clone(), config.i18n.languages.clone())
		.default_locale(config.i18n.default_locale.clone())
		.permanent_redirect(config.fallback.permanent_redirect)
		.enabled(config.fallback.enabled);

	let i18n = Arc::new(config.i18n.clone());

	Ok(Router::new()
		.route("/health", get(routes::health::health_check))
		.fallback_service(UrlDispatcher::new(table))
		.layer(fallback.layer())
		.layer(middleware::from_fn_with_state(i18n, locale::detect_locale))
		.layer(TraceLayer::new_for_http()))
}
