// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale handling for Loom.
//!
//! This crate provides the locale primitives shared by the URL router and the
//! locale fallback layer:
//!
//! - [`Locale`]: an opaque language tag (`en`, `fr`, `pt-BR`, ...)
//! - [`LocaleContext`]: the request-scoped active locale, threaded explicitly
//!   through URL resolution and reverse lookups
//! - [`LocaleOverride`]: a guard that activates a locale for a scope and
//!   restores the previous one when dropped
//!
//! There is no process-wide active locale. Each request owns its own
//! [`LocaleContext`], so concurrent requests never observe each other's locale.
//!
//! # Example
//!
//! ```
//! use loom_common_i18n::{Locale, LocaleContext};
//!
//! let mut ctx = LocaleContext::new(Locale::new("en"));
//! {
//!     let scoped = ctx.override_locale(Locale::new("fr"));
//!     assert_eq!(scoped.active().as_str(), "fr");
//! }
//! assert_eq!(ctx.active().as_str(), "en");
//! ```

mod context;
mod locale;
mod resolve;

pub use context::{LocaleContext, LocaleOverride};
pub use locale::{parse_accept_language, Locale, LocaleError, DEFAULT_LOCALE};
pub use resolve::resolve_locale;
