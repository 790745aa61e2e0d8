// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Views and deferred responses.

use std::collections::BTreeMap;
use std::future::Future;

use async_trait::async_trait;
use axum::response::{Html, IntoResponse, Response};
use http::{HeaderMap, Method, Request, StatusCode, Uri};

use crate::error::ViewError;
use crate::resolver::Kwargs;

/// A handler bound to a route.
///
/// Views receive a body-less snapshot of the request, so the same view can be
/// called by the dispatcher and again by the locale fallback after the
/// original request body has been consumed.
#[async_trait]
pub trait View: Send + Sync {
	async fn call(
		&self,
		request: &Request<()>,
		args: &[String],
		kwargs: &Kwargs,
	) -> Result<ViewResponse, ViewError>;
}

/// What a view returns.
pub enum ViewResponse {
	/// A finished response.
	Ready(Response),
	/// A response whose body is produced by a later [`DeferredResponse::render`].
	Deferred(Box<dyn DeferredResponse>),
}

impl ViewResponse {
	pub fn deferred(response: impl DeferredResponse + 'static) -> Self {
		Self::Deferred(Box::new(response))
	}

	/// Run the deferred render step if there is one.
	pub fn finish(self) -> Result<Response, ViewError> {
		match self {
			ViewResponse::Ready(response) => Ok(response),
			ViewResponse::Deferred(deferred) => deferred.render(),
		}
	}

	pub fn is_deferred(&self) -> bool {
		matches!(self, ViewResponse::Deferred(_))
	}
}

impl From<Response> for ViewResponse {
	fn from(response: Response) -> Self {
		ViewResponse::Ready(response)
	}
}

impl From<TemplateResponse> for ViewResponse {
	fn from(response: TemplateResponse) -> Self {
		ViewResponse::deferred(response)
	}
}

/// A response that still has to be rendered.
pub trait DeferredResponse: Send {
	fn render(self: Box<Self>) -> Result<Response, ViewError>;
}

/// An HTML template rendered at the last moment.
///
/// `{key}` placeholders are replaced with HTML-escaped values from the
/// context. `{{` and `}}` produce literal braces. A placeholder without a context value fails the
/// render.
#[derive(Debug, Clone)]
pub struct TemplateResponse {
	status: StatusCode,
	template: String,
	context: BTreeMap<String, String>,
}

impl TemplateResponse {
	pub fn new(template: impl Into<String>) -> Self {
		Self {
			status: StatusCode::OK,
			template: template.into(),
			context: BTreeMap::new(),
		}
	}

	pub fn status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.context.insert(key.into(), value.into());
		self
	}

	fn render_body(&self) -> Result<String, ViewError> {
		let mut out = String::with_capacity(self.template.len());
		let mut chars = self.template.chars().peekable();
		while let Some(c) = chars.next() {
			match c {
				'{' if chars.peek() == Some(&'{') => {
					chars.next();
					out.push('{');
				}
				'}' if chars.peek() == Some(&'}') => {
					chars.next();
					out.push('}');
				}
				'{' => {
					let key: String = chars.by_ref().take_while(|c| *c != '}').collect();
					let value = self.context.get(key.trim()).ok_or_else(|| {
						ViewError::Render(format!("missing template variable '{}'", key.trim()))
					})?;
					push_escaped(&mut out, value);
				}
				other => out.push(other),
			}
		}
		Ok(out)
	}
}

fn push_escaped(out: &mut String, value: &str) {
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			other => out.push(other),
		}
	}
}

impl DeferredResponse for TemplateResponse {
	fn render(self: Box<Self>) -> Result<Response, ViewError> {
		let body = self.render_body()?;
		Ok((self.status, Html(body)).into_response())
	}
}

/// Owned request data handed to [`view_fn`] closures.
#[derive(Debug, Clone)]
pub struct ViewArgs {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub args: Vec<String>,
	pub kwargs: Kwargs,
}

impl ViewArgs {
	pub fn arg(&self, index: usize) -> Option<&str> {
		self.args.get(index).map(String::as_str)
	}

	pub fn kwarg(&self, key: &str) -> Option<&str> {
		self.kwargs.get(key).map(String::as_str)
	}
}

/// A [`View`] backed by an async closure.
pub struct FnView<F>(F);

/// Adapt an async closure into a [`View`].
///
/// ```
/// use axum::response::IntoResponse;
/// use loom_server_urls::{view_fn, ViewResponse};
///
/// let about = view_fn(|_args| async { Ok(ViewResponse::from("About us".into_response())) });
/// # let _ = about;
/// ```
pub fn view_fn<F, Fut>(f: F) -> FnView<F>
where
	F: Fn(ViewArgs) -> Fut + Send + Sync,
	Fut: Future<Output = Result<ViewResponse, ViewError>> + Send,
{
	FnView(f)
}

#[async_trait]
impl<F, Fut> View for FnView<F>
where
	F: Fn(ViewArgs) -> Fut + Send + Sync,
	Fut: Future<Output = Result<ViewResponse, ViewError>> + Send,
{
	async fn call(
		&self,
		request: &Request<()>,
		args: &[String],
		kwargs: &Kwargs,
	) -> Result<ViewResponse, ViewError> {
		let view_args = ViewArgs {
			method: request.method().clone(),
			uri: request.uri().clone(),
			headers: request.headers().clone(),
			args: args.to_vec(),
			kwargs: kwargs.clone(),
		};
		(self.0)(view_args).await
	}
}
