// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Localized URL routing for Loom server.
//!
//! This crate provides:
//! - [`RouteTable`]: ordered routes with per-locale translated templates,
//!   namespaces and optional `/<locale>` path prefixes
//! - [`UrlResolver`]: the resolve / reverse seam consumed by the locale
//!   fallback layer
//! - [`View`], [`ViewResponse`] and [`TemplateResponse`]: handlers and
//!   deferred rendering
//! - [`UrlDispatcher`]: a tower service serving requests from a table
//!
//! # Example
//!
//! ```
//! use axum::response::IntoResponse;
//! use loom_common_i18n::{Locale, LocaleContext};
//! use loom_server_urls::{view_fn, Route, RouteTable, UrlResolver, ViewResponse};
//!
//! let table = RouteTable::builder()
//!     .route(
//!         Route::new("/about/", view_fn(|_| async {
//!             Ok(ViewResponse::from("About".into_response()))
//!         }))
//!         .name("about")
//!         .translate("fr", "/a-propos/"),
//!     )
//!     .build()?;
//!
//! let fr = LocaleContext::new(Locale::new("fr"));
//! let matched = table.resolve("/a-propos/", &fr)?;
//! assert_eq!(matched.url_name.as_deref(), Some("about"));
//!
//! let en = LocaleContext::new(Locale::new("en"));
//! assert_eq!(table.reverse("about", &[], &Default::default(), &en)?, "/about/");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod dispatch;
mod error;
mod path;
mod pattern;
mod resolver;
mod route;
mod table;
mod view;

pub use dispatch::{not_found, UrlDispatcher};
pub use error::{PatternError, ResolveError, ReverseError, ViewError};
pub use path::{decode_path, encode_path};
pub use pattern::Pattern;
pub use resolver::{Kwargs, ResolverMatch, UrlResolver, NAMESPACE_SEPARATOR};
pub use route::{Namespace, Route};
pub use table::{LocalePrefix, RouteTable, RouteTableBuilder};
pub use view::{view_fn, DeferredResponse, FnView, TemplateResponse, View, ViewArgs, ViewResponse};
