// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the locale fallback.

use loom_server_urls::{ReverseError, ViewError};
use thiserror::Error;

/// Why a matched route could not be served.
///
/// The set is closed: reverse failures and unusable redirect targets fall
/// through to rendering the view directly, view failures end in a plain 404.
#[derive(Debug, Error)]
pub enum FallbackError {
	/// The match has no name that reverses with its arguments.
	#[error(transparent)]
	Reverse(#[from] ReverseError),

	/// The reversed URL cannot be used as a `Location` header.
	#[error("invalid redirect location: {0}")]
	InvalidLocation(String),

	/// The reversed URL is the URL that was requested.
	#[error("redirect would target the requested path {0}")]
	SelfRedirect(String),

	/// The view or its deferred render failed.
	#[error(transparent)]
	View(#[from] ViewError),
}

impl FallbackError {
	/// Whether the next step of the fallback chain should be attempted.
	pub fn is_recoverable(&self) -> bool {
		match self {
			FallbackError::Reverse(_)
			| FallbackError::InvalidLocation(_)
			| FallbackError::SelfRedirect(_) => true,
			FallbackError::View(_) => false,
		}
	}
}
