// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tower service that dispatches requests through a [`RouteTable`].

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
	body::Body,
	http::{Request, StatusCode},
	response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use loom_common_i18n::LocaleContext;
use tower::Service;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::path::decode_path;
use crate::resolver::UrlResolver;
use crate::table::RouteTable;

/// A plain `404 Not Found` response with a generic body.
pub fn not_found() -> Response {
	(StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn internal_error() -> Response {
	(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

impl RouteTable {
	/// Resolve the percent-decoded request path under `ctx`, call the view and
	/// finish its response.
	///
	/// Unroutable paths produce `404`; failing views produce `500` without
	/// leaking the error to the client.
	pub async fn dispatch(&self, request: &Request<()>, ctx: &LocaleContext) -> Response {
		let path = match decode_path(request.uri().path()) {
			Ok(path) => path,
			Err(e) => {
				debug!(error = %e, "rejected request path");
				return not_found();
			}
		};
		let path = path.as_ref();
		let matched = match self.resolve(path, ctx) {
			Ok(matched) => matched,
			Err(ResolveError::NotFound { .. }) => {
				debug!(%path, locale = %ctx.active(), "no route");
				return not_found();
			}
			Err(e @ ResolveError::InvalidPath { .. }) => {
				debug!(error = %e, "rejected request path");
				return not_found();
			}
		};

		let result = matched
			.view
			.call(request, &matched.args, &matched.kwargs)
			.await
			.and_then(|response| response.finish());

		match result {
			Ok(response) => response,
			Err(e) => {
				warn!(%path, route = %matched.route, error = %e, "view failed");
				internal_error()
			}
		}
	}

	/// Wrap the table in a tower service.
	pub fn into_service(self) -> UrlDispatcher {
		UrlDispatcher::new(Arc::new(self))
	}
}

/// Tower service serving requests from a shared [`RouteTable`].
///
/// The active locale comes from a [`LocaleContext`] request extension when an
/// upstream layer inserted one, otherwise from the table's default locale.
#[derive(Clone)]
pub struct UrlDispatcher {
	table: Arc<RouteTable>,
}

impl UrlDispatcher {
	pub fn new(table: Arc<RouteTable>) -> Self {
		Self { table }
	}

	pub fn table(&self) -> &Arc<RouteTable> {
		&self.table
	}
}

impl Service<Request<Body>> for UrlDispatcher {
	type Response = Response;
	type Error = Infallible;
	type Future = BoxFuture<'static, Result<Response, Infallible>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let table = Arc::clone(&self.table);
		let ctx = req
			.extensions()
			.get::<LocaleContext>()
			.cloned()
			.unwrap_or_else(|| LocaleContext::new(table.default_locale().clone()));
		let (parts, _body) = req.into_parts();
		let request = Request::from_parts(parts, ());

		Box::pin(async move { Ok(table.dispatch(&request, &ctx).await) })
	}
}
