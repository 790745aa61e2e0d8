// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Path substitution for absolute and relative URLs.

use http::{header::HOST, uri::Authority, HeaderMap, Uri};
use loom_server_urls::encode_path;
use url::Url;

/// A URL split so that its path can be swapped while everything else is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SplitUrl {
	/// `scheme://host[:port]/path?query#fragment`
	Absolute(Url),
	/// `/path?query#fragment`
	Relative {
		path: String,
		query: Option<String>,
		fragment: Option<String>,
	},
}

impl SplitUrl {
	/// Split `input`, or `None` for URLs without a hierarchical path
	/// (`mailto:`, `data:`, ...).
	pub(crate) fn parse(input: &str) -> Option<Self> {
		match Url::parse(input) {
			Ok(url) if url.cannot_be_a_base() => None,
			Ok(url) => Some(SplitUrl::Absolute(url)),
			Err(url::ParseError::RelativeUrlWithoutBase) => Some(split_relative(input)),
			Err(_) => None,
		}
	}

	/// Split the target of an incoming request into a fully-qualified URL.
	///
	/// Absolute-form targets keep their scheme and authority. Origin-form
	/// targets take the authority from `Host` and the scheme from
	/// `X-Forwarded-Proto` (default `http`). Without a usable `Host` the
	/// target stays relative.
	pub(crate) fn from_request(uri: &Uri, headers: &HeaderMap) -> Option<Self> {
		if uri.scheme().is_some() && uri.authority().is_some() {
			return Self::parse(&uri.to_string());
		}
		if let Some(url) = absolute_from_host(uri, headers) {
			return Some(SplitUrl::Absolute(url));
		}
		Some(SplitUrl::Relative {
			path: uri.path().to_string(),
			query: uri.query().map(str::to_string),
			fragment: None,
		})
	}

	pub(crate) fn path(&self) -> &str {
		match self {
			SplitUrl::Absolute(url) => url.path(),
			SplitUrl::Relative { path, .. } => path,
		}
	}

	/// Render the URL with `path` (decoded form) in place of the current path.
	pub(crate) fn with_path(&self, path: &str) -> String {
		let encoded = encode_path(path);
		match self {
			SplitUrl::Absolute(url) => {
				let mut url = url.clone();
				url.set_path(&encoded);
				url.into()
			}
			SplitUrl::Relative {
				query, fragment, ..
			} => {
				let mut out = encoded;
				if let Some(query) = query {
					out.push('?');
					out.push_str(query);
				}
				if let Some(fragment) = fragment {
					out.push('#');
					out.push_str(fragment);
				}
				out
			}
		}
	}
}

fn absolute_from_host(uri: &Uri, headers: &HeaderMap) -> Option<Url> {
	let host = headers.get(HOST)?.to_str().ok()?;
	let authority: Authority = host.parse().ok()?;
	if authority.as_str().contains('@') {
		return None;
	}
	let scheme = match headers
		.get("x-forwarded-proto")
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.split(',').next())
		.map(str::trim)
	{
		Some("https") => "https",
		_ => "http",
	};
	let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
	Url::parse(&format!("{scheme}://{authority}{target}")).ok()
}

fn split_relative(input: &str) -> SplitUrl {
	let (rest, fragment) = match input.split_once('#') {
		Some((rest, fragment)) => (rest, Some(fragment.to_string())),
		None => (input, None),
	};
	let (path, query) = match rest.split_once('?') {
		Some((path, query)) => (path, Some(query.to_string())),
		None => (rest, None),
	};
	SplitUrl::Relative {
		path: path.to_string(),
		query,
		fragment,
	}
}
