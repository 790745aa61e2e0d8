// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale fallback configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocaleFallbackConfigLayer {
	pub enabled: Option<bool>,
	pub permanent_redirect: Option<bool>,
}

impl LocaleFallbackConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.permanent_redirect.is_some() {
			self.permanent_redirect = other.permanent_redirect;
		}
	}

	pub fn finalize(self) -> LocaleFallbackConfig {
		LocaleFallbackConfig {
			enabled: self.enabled.unwrap_or(true),
			permanent_redirect: self.permanent_redirect.unwrap_or(false),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleFallbackConfig {
	/// Retry 404s under the other configured languages.
	pub enabled: bool,
	/// Use `301` instead of `302` for localized redirects.
	pub permanent_redirect: bool,
}

impl Default for LocaleFallbackConfig {
	fn default() -> Self {
		LocaleFallbackConfigLayer::default().finalize()
	}
}
