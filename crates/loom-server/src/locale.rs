// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request locale detection.

use std::sync::Arc;

use axum::{
	extract::{Request, State},
	http::{
		header::{ACCEPT_LANGUAGE, CONTENT_LANGUAGE, VARY},
		HeaderMap, HeaderValue,
	},
	middleware::Next,
	response::Response,
};
use loom_common_i18n::{parse_accept_language, resolve_locale, Locale, LocaleContext};
use loom_server_config::I18nConfig;
use tracing::trace;

/// Pick the locale for a request from its `Accept-Language` header.
///
/// A regional tag such as `fr-CA` also matches a configured `fr`.
pub fn locale_for(headers: &HeaderMap, i18n: &I18nConfig) -> Locale {
	let preferred: Vec<Locale> = headers
		.get(ACCEPT_LANGUAGE)
		.and_then(|v| v.to_str().ok())
		.map(|header| {
			parse_accept_language(header)
				.into_iter()
				.flat_map(|locale| {
					let base = Locale::new(locale.language());
					[locale, base]
				})
				.collect()
		})
		.unwrap_or_default();
	resolve_locale(&preferred, &i18n.languages, i18n.default_locale.as_str())
}

/// Middleware inserting a [`LocaleContext`] extension for downstream layers.
///
/// The response is tagged with `Content-Language` (unless the handler set one)
/// and `Vary: Accept-Language`.
pub async fn detect_locale(
	State(i18n): State<Arc<I18nConfig>>,
	mut request: Request,
	next: Next,
) -> Response {
	let locale = locale_for(request.headers(), &i18n);
	trace!(path = %request.uri().path(), %locale, "locale detected");

	let content_language = HeaderValue::from_str(locale.as_str()).ok();
	request
		.extensions_mut()
		.insert(LocaleContext::new(locale));

	let mut response = next.run(request).await;
	let headers = response.headers_mut();
	if let Some(value) = content_language {
		headers.entry(CONTENT_LANGUAGE).or_insert(value);
	}
	headers.append(VARY, HeaderValue::from_static("accept-language"));
	response
}
