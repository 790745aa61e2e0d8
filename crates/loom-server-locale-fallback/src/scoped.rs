// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale-scoped resolution and URL translation.

use loom_common_i18n::{Locale, LocaleContext};
use loom_server_urls::{decode_path, ResolveError, ResolverMatch, UrlResolver};
use tracing::{debug, trace};

use crate::url_parts::SplitUrl;

/// Resolve `path` with `locale` active, restoring the previous locale after.
///
/// A [`ResolveError::NotFound`] becomes `Ok(None)`; other resolver errors are
/// returned unchanged. The active locale of `ctx` is the same before and
/// after the call.
pub fn resolve_under_locale(
	path: &str,
	locale: &Locale,
	resolver: &dyn UrlResolver,
	ctx: &mut LocaleContext,
) -> Result<Option<ResolverMatch>, ResolveError> {
	let scoped = ctx.override_locale(locale.clone());
	match resolver.resolve(path, &scoped) {
		Ok(matched) => {
			trace!(%path, %locale, route = %matched.route, "path resolved under locale");
			Ok(Some(matched))
		}
		Err(ResolveError::NotFound { .. }) => Ok(None),
		Err(e) => Err(e),
	}
}

/// Return the equivalent of `url` under `target`.
///
/// The percent-decoded path of `url` is resolved under the active locale of
/// `ctx` and the match is reversed, with the same name and arguments, under
/// `target`. Only the path is replaced; scheme, host, query and fragment are
/// kept. If the path does not resolve or the match does not reverse, `url` is
/// returned unchanged.
pub fn translate_url(
	url: &str,
	target: &Locale,
	resolver: &dyn UrlResolver,
	ctx: &mut LocaleContext,
) -> String {
	let Some(split) = SplitUrl::parse(url) else {
		return url.to_string();
	};

	let matched = match decode_path(split.path()).and_then(|path| resolver.resolve(&path, ctx)) {
		Ok(matched) => matched,
		Err(e) => {
			trace!(%url, error = %e, "translate_url: path does not resolve");
			return url.to_string();
		}
	};
	let Some(view_name) = matched.view_name() else {
		trace!(%url, "translate_url: match has no name");
		return url.to_string();
	};

	let scoped = ctx.override_locale(target.clone());
	match resolver.reverse(&view_name, &matched.args, &matched.kwargs, &scoped) {
		Ok(path) => split.with_path(&path),
		Err(e) => {
			debug!(%url, %target, error = %e, "translate_url: no reverse match");
			url.to_string()
		}
	}
}
