// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale fallback for unresolved requests.
//!
//! When the wrapped service answers `404 Not Found`, the request path is
//! resolved again under every configured locale, in order. The first locale
//! that resolves it wins:
//!
//! 1. the match is reversed under the request's active locale and the client
//!    is redirected there (scheme, host, query and fragment preserved);
//! 2. if the match cannot be reversed, its view is rendered directly;
//! 3. if the view fails, a plain `404 Not Found` is returned.
//!
//! If no locale resolves the path, the original 404 is passed through.
//!
//! The active locale is never global: each request carries its own
//! [`LocaleContext`](loom_common_i18n::LocaleContext), and every attempt runs
//! inside a scoped override that restores it afterwards.
//!
//! # Example
//!
//! ```ignore
//! use loom_server_locale_fallback::LocaleFallback;
//!
//! let table = Arc::new(build_routes()?);
//! let fallback = LocaleFallback::new(table.clone(), config.i18n.languages.clone())
//!     .default_locale(config.i18n.default_locale.clone());
//!
//! let app = Router::new()
//!     .fallback_service(UrlDispatcher::new(table))
//!     .layer(fallback.layer());
//! ```

mod error;
mod middleware;
mod scoped;
mod url_parts;

pub use error::FallbackError;
pub use middleware::{LocaleFallback, LocaleFallbackLayer, LocaleFallbackService};
pub use scoped::{resolve_under_locale, translate_url};
