// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Language configuration section.

use loom_common_i18n::{Locale, DEFAULT_LOCALE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct I18nConfigLayer {
	/// Supported languages, in fallback priority order.
	pub languages: Option<Vec<Locale>>,
	pub default_locale: Option<Locale>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.languages.is_some() {
			self.languages = other.languages;
		}
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
	}

	/// Missing languages default to `[default_locale]`; a missing default
	/// locale defaults to the first language.
	pub fn finalize(self) -> I18nConfig {
		let default_locale = self
			.default_locale
			.or_else(|| self.languages.as_ref().and_then(|l| l.first().cloned()))
			.unwrap_or_else(|| Locale::new(DEFAULT_LOCALE));
		let languages = self
			.languages
			.unwrap_or_else(|| vec![default_locale.clone()]);
		I18nConfig {
			languages,
			default_locale,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct I18nConfig {
	pub languages: Vec<Locale>,
	pub default_locale: Locale,
}

impl Default for I18nConfig {
	fn default() -> Self {
		I18nConfigLayer::default().finalize()
	}
}
