// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped active locale.

use std::ops::{Deref, DerefMut};

use crate::locale::Locale;

/// The active locale for a single request.
///
/// URL resolution and reverse lookups read the active locale from this value.
/// It is owned by one request and passed explicitly to the code that needs it.
///
/// Temporary switches go through [`LocaleContext::override_locale`], which
/// restores the previous locale when the returned guard is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocaleContext {
	active: Locale,
}

impl LocaleContext {
	pub fn new(locale: Locale) -> Self {
		Self { active: locale }
	}

	/// The locale currently in effect.
	pub fn active(&self) -> &Locale {
		&self.active
	}

	/// Replace the active locale for the rest of the request.
	pub fn activate(&mut self, locale: Locale) {
		self.active = locale;
	}

	/// Activate `locale` until the returned guard is dropped.
	///
	/// The previous locale is restored on drop, including when the scope is
	/// left through `?` or a panic.
	pub fn override_locale(&mut self, locale: Locale) -> LocaleOverride<'_> {
		let previous = std::mem::replace(&mut self.active, locale);
		tracing::trace!(from = %previous, to = %self.active, "locale override");
		LocaleOverride {
			ctx: self,
			previous: Some(previous),
		}
	}
}

/// Guard returned by [`LocaleContext::override_locale`].
#[must_use = "the locale is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LocaleOverride<'a> {
	ctx: &'a mut LocaleContext,
	previous: Option<Locale>,
}

impl Deref for LocaleOverride<'_> {
	type Target = LocaleContext;

	fn deref(&self) -> &Self::Target {
		self.ctx
	}
}

impl DerefMut for LocaleOverride<'_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.ctx
	}
}

impl Drop for LocaleOverride<'_> {
	fn drop(&mut self) {
		if let Some(previous) = self.previous.take() {
			self.ctx.active = previous;
		}
	}
}
