// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the locale fallback layer.
//!
//! Tests cover:
//! - Pass-through of non-404 responses and of unresolvable 404s
//! - Redirects to the localized URL (scheme, host, query preserved)
//! - Locale priority when several locales resolve the same path
//! - Direct rendering when the match cannot be reversed
//! - Degrading to a fresh 404 when the matched view fails
//! - Percent-encoded request paths and `Location` headers
//! - Resolver errors leaving the original 404 untouched
//! - `translate_url`

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
	body::{to_bytes, Body},
	http::{
		header::{HOST, LOCATION},
		Request, StatusCode,
	},
	response::{IntoResponse, Response},
};
use loom_common_i18n::{Locale, LocaleContext};
use loom_server_locale_fallback::{translate_url, LocaleFallback};
use loom_server_urls::{
	view_fn, Namespace, Route, RouteTable, TemplateResponse, UrlDispatcher, ViewArgs, ViewError,
	ViewResponse,
};
use proptest::prelude::*;
use tower::{service_fn, Layer, ServiceExt};

// ============================================================================
// Fixtures
// ============================================================================

fn text(body: &'static str) -> impl loom_server_urls::View {
	view_fn(move |_| async move { Ok(ViewResponse::from(body.into_response())) })
}

fn site() -> Arc<RouteTable> {
	let table = RouteTable::builder()
		.default_locale(Locale::new("en"))
		.route(
			Route::new("/about/", text("about"))
				.name("about")
				.translate("fr", "/a-propos/")
				.translate("es", "/acerca-de/"),
		)
		.route(
			Route::new("/support/", text("support"))
				.name("support")
				.translate("en", "/contact/"),
		)
		.route(
			Route::new("/kontakt/", text("kontakt"))
				.name("contact")
				.translate("fr", "/contact/"),
		)
		.route(
			Route::new("/products/{id}/", text("product"))
				.name("product")
				.translate("fr", "/produits/{}/"),
		)
		.route(
			Route::new(
				"/unnamed/",
				view_fn(|args: ViewArgs| async move {
					Ok(TemplateResponse::new("<p>rendered {path}</p>")
						.with("path", args.uri.path())
						.into())
				}),
			)
			.translate("fr", "/sans-nom/"),
		)
		.route(
			Route::new(
				"/broken/",
				view_fn(|_| async { Err(ViewError::Failed("secret detail".to_string())) }),
			)
			.translate("fr", "/casse/"),
		)
		.route(
			Route::new(
				"/bad-template/",
				view_fn(|_| async { Ok(TemplateResponse::new("{missing}").into()) }),
			)
			.translate("fr", "/mauvais/"),
		)
		.route(
			Route::new("/team/", text("team"))
				.name("team")
				.translate("de", "/über-uns/"),
		)
		.route(
			Route::new(
				"/retired/",
				view_fn(|_| async {
					Ok(ViewResponse::from(
						(StatusCode::NOT_FOUND, "retired product").into_response(),
					))
				}),
			)
			.name("retired"),
		)
		.namespace(
			Namespace::new("shop").nest(
				Namespace::new("catalog").route(
					Route::new("/catalog/{slug}/", text("catalog"))
						.name("item")
						.translate("fr", "/catalogue/{slug}/"),
				),
			),
		)
		.build()
		.unwrap();
	Arc::new(table)
}

fn locales(tags: &[&str]) -> Vec<Locale> {
	tags.iter().map(Locale::new).collect()
}

fn fallback(tags: &[&str]) -> LocaleFallback {
	LocaleFallback::new(site(), locales(tags)).default_locale(Locale::new("en"))
}

fn get(uri: &str, locale: Option<&str>) -> Request<Body> {
	let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
	if let Some(tag) = locale {
		request
			.extensions_mut()
			.insert(LocaleContext::new(Locale::new(tag)));
	}
	request
}

async fn serve(fallback: LocaleFallback, request: Request<Body>) -> Response {
	fallback
		.layer()
		.layer(UrlDispatcher::new(site()))
		.oneshot(request)
		.await
		.unwrap()
}

async fn body_string(response: Response) -> String {
	let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
	response.headers().get(LOCATION).unwrap().to_str().unwrap()
}

// ============================================================================
// Pass-through
// ============================================================================

#[tokio::test]
async fn test_non_404_is_passed_through() {
	let inner = service_fn(|_req: Request<Body>| async {
		Ok::<_, Infallible>((StatusCode::OK, [("x-origin", "inner")], "hello").into_response())
	});
	let response = fallback(&["en", "fr"])
		.layer()
		.layer(inner)
		.oneshot(get("/a-propos/", None))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers().get("x-origin").unwrap(), "inner");
	assert_eq!(body_string(response).await, "hello");
}

#[tokio::test]
async fn test_unresolvable_404_is_passed_through() {
	let inner = service_fn(|_req: Request<Body>| async {
		Ok::<_, Infallible>(
			(StatusCode::NOT_FOUND, [("x-origin", "inner")], "original 404").into_response(),
		)
	});
	let response = fallback(&["en", "fr", "es"])
		.layer()
		.layer(inner)
		.oneshot(get("/nowhere/", None))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(response.headers().get("x-origin").unwrap(), "inner");
	assert_eq!(body_string(response).await, "original 404");
}

#[tokio::test]
async fn test_disabled_fallback_passes_404_through() {
	let response = serve(fallback(&["en", "fr"]).enabled(false), get("/a-propos/", None)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert!(response.headers().get(LOCATION).is_none());
}

#[tokio::test]
async fn test_routable_path_is_served_directly() {
	let response = serve(fallback(&["en", "fr"]), get("/about/", None)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_string(response).await, "about");
}

#[tokio::test]
async fn test_resolver_error_keeps_original_404() {
	let inner = service_fn(|_req: Request<Body>| async {
		Ok::<_, Infallible>(
			(StatusCode::NOT_FOUND, [("x-origin", "inner")], "original 404").into_response(),
		)
	});
	// An asterisk-form target is not an absolute path, so the table rejects it.
	let response = fallback(&["en", "fr"])
		.layer()
		.layer(inner)
		.oneshot(get("*", None))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(response.headers().get("x-origin").unwrap(), "inner");
	assert!(response.headers().get(LOCATION).is_none());
	assert_eq!(body_string(response).await, "original 404");
}

#[tokio::test]
async fn test_undecodable_path_keeps_original_404() {
	let inner = service_fn(|_req: Request<Body>| async {
		Ok::<_, Infallible>((StatusCode::NOT_FOUND, "original 404").into_response())
	});
	let response = fallback(&["en", "fr"])
		.layer()
		.layer(inner)
		.oneshot(get("/%FF/", None))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert_eq!(body_string(response).await, "original 404");
}

// ============================================================================
// Redirects
// ============================================================================

#[tokio::test]
async fn test_redirects_to_active_locale_url() {
	let response = serve(fallback(&["en", "fr"]), get("/a-propos/", Some("en"))).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/about/");
}

#[tokio::test]
async fn test_redirect_preserves_scheme_host_and_query() {
	let response = serve(
		fallback(&["en", "fr"]),
		get("https://example.com:8443/a-propos/?utm_source=mail&page=2", Some("es")),
	)
	.await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(
		location(&response),
		"https://example.com:8443/acerca-de/?utm_source=mail&page=2"
	);
}

#[tokio::test]
async fn test_redirect_is_absolute_from_host_header() {
	let mut request = get("/a-propos/?page=2", Some("en"));
	request.headers_mut().insert(HOST, "example.com:8080".parse().unwrap());
	request.headers_mut().insert("x-forwarded-proto", "https".parse().unwrap());

	let response = serve(fallback(&["en", "fr"]), request).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "https://example.com:8080/about/?page=2");
}

#[tokio::test]
async fn test_permanent_redirect() {
	let response = serve(
		fallback(&["en", "fr"]).permanent_redirect(true),
		get("/a-propos/", None),
	)
	.await;
	assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
	assert_eq!(location(&response), "/about/");
}

#[tokio::test]
async fn test_redirect_keeps_named_arguments_and_innermost_namespace() {
	let response = serve(fallback(&["en", "fr"]), get("/catalogue/chaise/", None)).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/catalog/chaise/");
}

#[tokio::test]
async fn test_earlier_locale_wins() {
	// `/contact/` is `support` under en and `contact` under fr.
	let response = serve(fallback(&["en", "fr"]), get("/contact/", Some("es"))).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/support/");

	let response = serve(fallback(&["fr", "en"]), get("/contact/", Some("es"))).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/kontakt/");
}

#[tokio::test]
async fn test_percent_encoded_path_resolves_under_other_locale() {
	let response = serve(fallback(&["en", "de"]), get("/%C3%BCber-uns/", Some("en"))).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/team/");
}

#[tokio::test]
async fn test_non_ascii_location_is_percent_encoded() {
	let response = serve(fallback(&["en", "de"]), get("/team/?tab=2", Some("de"))).await;
	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(location(&response), "/%C3%BCber-uns/?tab=2");

	// The encoded target is served under de.
	let response = serve(fallback(&["en", "de"]), get(location(&response), Some("de"))).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_string(response).await, "team");
}

#[tokio::test]
async fn test_unlisted_locale_is_not_tried() {
	let response = serve(fallback(&["en"]), get("/a-propos/", None)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Direct rendering
// ============================================================================

#[tokio::test]
async fn test_unnamed_match_renders_view_directly() {
	let response = serve(fallback(&["en", "fr"]), get("/sans-nom/", None)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert!(response.headers().get(LOCATION).is_none());
	assert_eq!(body_string(response).await, "<p>rendered /sans-nom/</p>");
}

#[tokio::test]
async fn test_argument_mismatch_renders_view_directly() {
	// The fr template captures a positional argument, the en one a named one.
	let response = serve(fallback(&["en", "fr"]), get("/produits/42/", None)).await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_string(response).await, "product");
}

#[tokio::test]
async fn test_view_404_on_own_path_is_not_redirected_to_itself() {
	let response = serve(fallback(&["en", "fr"]), get("/retired/", Some("en"))).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	assert!(response.headers().get(LOCATION).is_none());
	assert_eq!(body_string(response).await, "retired product");
}

#[tokio::test]
async fn test_failing_view_degrades_to_fresh_404() {
	let response = serve(fallback(&["en", "fr"]), get("/casse/", None)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	let body = body_string(response).await;
	assert_eq!(body, "Not Found");
	assert!(!body.contains("secret"));
}

#[tokio::test]
async fn test_failing_deferred_render_degrades_to_fresh_404() {
	let response = serve(fallback(&["en", "fr"]), get("/mauvais/", None)).await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// translate_url
// ============================================================================

#[test]
fn test_translate_url_relative() {
	let table = site();
	let mut ctx = LocaleContext::new(Locale::new("fr"));
	let translated = translate_url("/a-propos/?q=1#team", &Locale::new("es"), table.as_ref(), &mut ctx);
	assert_eq!(translated, "/acerca-de/?q=1#team");
	assert_eq!(ctx.active().as_str(), "fr");
}

#[test]
fn test_translate_url_absolute_with_namespace() {
	let table = site();
	let mut ctx = LocaleContext::new(Locale::new("en"));
	let translated = translate_url(
		"http://example.com/catalog/lamp/",
		&Locale::new("fr"),
		table.as_ref(),
		&mut ctx,
	);
	assert_eq!(translated, "http://example.com/catalogue/lamp/");
}

#[test]
fn test_translate_url_percent_encoded() {
	let table = site();
	let mut ctx = LocaleContext::new(Locale::new("de"));
	let translated = translate_url("/%C3%BCber-uns/", &Locale::new("en"), table.as_ref(), &mut ctx);
	assert_eq!(translated, "/team/");

	let mut ctx = LocaleContext::new(Locale::new("en"));
	let translated = translate_url("/team/#people", &Locale::new("de"), table.as_ref(), &mut ctx);
	assert_eq!(translated, "/%C3%BCber-uns/#people");
}

#[test]
fn test_translate_url_unresolvable_is_unchanged() {
	let table = site();
	let mut ctx = LocaleContext::new(Locale::new("en"));
	let url = "/a-propos/?q=1";
	assert_eq!(translate_url(url, &Locale::new("fr"), table.as_ref(), &mut ctx), url);
}

#[test]
fn test_translate_url_without_reverse_is_unchanged() {
	let table = site();
	let mut ctx = LocaleContext::new(Locale::new("fr"));
	// Positional fr capture cannot be reversed into the named en template.
	let url = "/produits/42/";
	assert_eq!(translate_url(url, &Locale::new("en"), table.as_ref(), &mut ctx), url);
	// Unnamed routes have nothing to reverse.
	let url = "/sans-nom/";
	assert_eq!(translate_url(url, &Locale::new("en"), table.as_ref(), &mut ctx), url);
	assert_eq!(ctx.active().as_str(), "fr");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
	#[test]
	fn prop_non_404_responses_are_untouched(code in 100u16..600, path in "/[a-z-]{0,12}/") {
		let status = StatusCode::from_u16(code).unwrap();
		prop_assume!(status != StatusCode::NOT_FOUND);

		let fallback = fallback(&["en", "fr", "es"]);
		let request = Request::builder().uri(path.as_str()).body(()).unwrap();
		let mut ctx = LocaleContext::new(Locale::new("en"));
		let original = (status, [("x-marker", "kept")]).into_response();

		let response = futures::executor::block_on(
			fallback.process_response(&request, &mut ctx, original),
		);
		prop_assert_eq!(response.status(), status);
		prop_assert_eq!(response.headers().get("x-marker").unwrap(), "kept");
		prop_assert_eq!(ctx.active().as_str(), "en");
	}

	#[test]
	fn prop_active_locale_survives_processing(
		path in prop_oneof![
			Just("/a-propos/"),
			Just("/contact/"),
			Just("/sans-nom/"),
			Just("/casse/"),
			Just("/nowhere/"),
		],
		start in prop_oneof![Just("en"), Just("fr"), Just("es"), Just("de")],
	) {
		let fallback = fallback(&["en", "fr", "es"]);
		let request = Request::builder().uri(path).body(()).unwrap();
		let mut ctx = LocaleContext::new(Locale::new(start));
		let original = StatusCode::NOT_FOUND.into_response();

		let _ = futures::executor::block_on(
			fallback.process_response(&request, &mut ctx, original),
		);
		prop_assert_eq!(ctx.active().as_str(), start);
	}
}
