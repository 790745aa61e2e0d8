// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale resolution logic.

use crate::locale::{Locale, DEFAULT_LOCALE};

/// Resolve the effective locale from preferences and the configured languages.
///
/// Resolution order (highest to lowest priority):
/// 1. First preferred locale that is configured
/// 2. Server default locale (if configured)
/// 3. First configured locale
/// 4. Fallback to English ("en")
///
/// # Arguments
///
/// * `preferred` - Locales the client asked for, best first (may be empty)
/// * `configured` - Ordered list of languages the server supports
/// * `server_default` - Server's default locale from `LOOM_SERVER_DEFAULT_LOCALE`
///
/// # Example
///
/// ```
/// use loom_common_i18n::{resolve_locale, Locale};
///
/// let configured = [Locale::new("en"), Locale::new("es")];
///
/// // Client preference takes priority
/// let preferred = [Locale::new("es")];
/// assert_eq!(resolve_locale(&preferred, &configured, "en").as_str(), "es");
///
/// // Falls back to server default if nothing matches
/// assert_eq!(resolve_locale(&[], &configured, "es").as_str(), "es");
/// ```
pub fn resolve_locale(preferred: &[Locale], configured: &[Locale], server_default: &str) -> Locale {
	if let Some(locale) = preferred.iter().find(|l| configured.contains(l)) {
		return locale.clone();
	}

	let server_default = Locale::new(server_default);
	if configured.contains(&server_default) {
		return server_default;
	}

	configured
		.first()
		.cloned()
		.unwrap_or_else(|| Locale::new(DEFAULT_LOCALE))
}
