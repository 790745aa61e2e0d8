// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The localized pages served by loom-server.
//!
//! | name            | en                  | fr                    | es                   |
//! |-----------------|---------------------|-----------------------|----------------------|
//! | `home`          | `/`                 | `/`                   | `/`                  |
//! | `about`         | `/about/`           | `/a-propos/`          | `/acerca-de/`        |
//! | `contact`       | `/contact/`         | `/contactez-nous/`    | `/contacto/`         |
//! | `product`       | `/products/{}/`     | `/produits/{}/`       | `/productos/{}/`     |
//! | `blog:post`     | `/blog/{slug}/`     | `/blogue/{slug}/`     | `/bitacora/{slug}/`  |
//! | *(unnamed)*     | `/press/`           | `/presse/`            | `/prensa/`           |
//!
//! The press page has no name, so the locale fallback renders it in place
//! instead of redirecting.

use axum::http::StatusCode;
use loom_common_i18n::Locale;
use loom_server_urls::{
	view_fn, LocalePrefix, Namespace, PatternError, Route, RouteTable, TemplateResponse, ViewArgs,
	ViewError, ViewResponse,
};

const LAYOUT: &str = "<!doctype html><html><head><title>{title}</title></head>\
<body><h1>{title}</h1>{body}</body></html>";

fn page(pattern: &str, title: &'static str, body: &'static str) -> Route {
	// `body` is trusted markup, so it is spliced in before placeholders are filled.
	let template = LAYOUT.replace("{body}", body);
	Route::new(
		pattern,
		view_fn(move |_| {
			let template = template.clone();
			async move {
				Ok(ViewResponse::from(
					TemplateResponse::new(template).with("title", title),
				))
			}
		}),
	)
}

async fn product(args: ViewArgs) -> Result<ViewResponse, ViewError> {
	let id = args
		.arg(0)
		.ok_or_else(|| ViewError::Failed("product id missing".to_string()))?;
	if !id.chars().all(|c| c.is_ascii_digit()) {
		return Ok(TemplateResponse::new("<p>Unknown product {id}</p>")
			.with("id", id)
			.status(StatusCode::NOT_FOUND)
			.into());
	}
	Ok(TemplateResponse::new("<h1>Product {id}</h1>")
		.with("id", id)
		.into())
}

async fn blog_post(args: ViewArgs) -> Result<ViewResponse, ViewError> {
	let slug = args
		.kwarg("slug")
		.ok_or_else(|| ViewError::Failed("post slug missing".to_string()))?;
	Ok(TemplateResponse::new("<article><h1>{slug}</h1></article>")
		.with("slug", slug)
		.into())
}

/// Build the route table for the site.
///
/// Patterns are never locale-prefixed; the locale only selects which
/// translation of each pattern is live.
pub fn build_routes(default_locale: Locale) -> Result<RouteTable, PatternError> {
	RouteTable::builder()
		.locale_prefix(LocalePrefix::None)
		.default_locale(default_locale)
		.route(page("/", "Loom", "<p>Welcome.</p>").name("home"))
		.route(
			page("/about/", "About", "<p>Who we are.</p>")
				.name("about")
				.translate("fr", "/a-propos/")
				.translate("es", "/acerca-de/"),
		)
		.route(
			page("/contact/", "Contact", "<p>Write to us.</p>")
				.name("contact")
				.translate("fr", "/contactez-nous/")
				.translate("es", "/contacto/"),
		)
		.route(
			Route::new("/products/{}/", view_fn(product))
				.name("product")
				.translate("fr", "/produits/{}/")
				.translate("es", "/productos/{}/"),
		)
		.route(
			page("/press/", "Press", "<p>Press releases.</p>")
				.translate("fr", "/presse/")
				.translate("es", "/prensa/"),
		)
		.namespace(
			Namespace::new("blog").route(
				Route::new("/blog/{slug}/", view_fn(blog_post))
					.name("post")
					.translate("fr", "/blogue/{slug}/")
					.translate("es", "/bitacora/{slug}/"),
			),
		)
		.build()
}
