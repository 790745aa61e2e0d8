// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Conversion between request paths on the wire and route paths.
//!
//! Templates, captured arguments and reversed paths are plain UTF-8
//! (`/über-uns/`). Request targets and `Location` headers carry the
//! percent-encoded form (`/%C3%BCber-uns/`).

use std::borrow::Cow;

use crate::error::ResolveError;

/// Percent-decode a request path before resolving it.
///
/// Fails with [`ResolveError::InvalidPath`] if the decoded bytes are not UTF-8.
pub fn decode_path(raw: &str) -> Result<Cow<'_, str>, ResolveError> {
	urlencoding::decode(raw).map_err(|_| ResolveError::InvalidPath {
		path: raw.to_string(),
	})
}

/// Percent-encode a reversed path for use in a URL, segment by segment.
pub fn encode_path(path: &str) -> String {
	path.split('/')
		.map(urlencoding::encode)
		.collect::<Vec<_>>()
		.join("/")
}
