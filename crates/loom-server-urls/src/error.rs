// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for URL routing.

use thiserror::Error;

/// Errors returned by [`UrlResolver::resolve`](crate::UrlResolver::resolve).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
	/// No route matches the path under the active locale.
	#[error("no route matches path: {path}")]
	NotFound { path: String },

	/// The path is not an absolute path.
	#[error("invalid request path: {path}")]
	InvalidPath { path: String },
}

/// Errors returned by [`UrlResolver::reverse`](crate::UrlResolver::reverse).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReverseError {
	/// No route carries the requested name.
	#[error("no reverse match for '{view_name}'")]
	NoReverseMatch { view_name: String },

	/// Routes carry the name but none accept the supplied arguments.
	#[error("arguments do not fit any pattern named '{view_name}' ({args} positional, {kwargs} named)")]
	ArgumentMismatch {
		view_name: String,
		args: usize,
		kwargs: usize,
	},
}

/// Errors raised while building a route table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
	#[error("pattern must start with '/': {0}")]
	MissingLeadingSlash(String),

	#[error("unbalanced braces in pattern segment '{segment}' of {pattern}")]
	UnbalancedBrace { pattern: String, segment: String },

	#[error("invalid parameter name '{name}' in {pattern}")]
	InvalidParameter { pattern: String, name: String },

	#[error("duplicate parameter '{name}' in {pattern}")]
	DuplicateParameter { pattern: String, name: String },

	#[error("invalid locale in route translation: {0}")]
	InvalidLocale(#[from] loom_common_i18n::LocaleError),
}

/// Errors raised by views and deferred responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewError {
	/// The view itself failed.
	#[error("view failed: {0}")]
	Failed(String),

	/// The deferred render step failed.
	#[error("render failed: {0}")]
	Render(String),
}
