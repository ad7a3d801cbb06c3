//! # Simple Blog
//!
//! The runtime pieces of a static finance blog that are not HTML templates:
//! an offline cache engine modelled on a browser service worker, in-memory
//! post search, URL slug and image path helpers, form field validation, and
//! sitemap/robots generation.
//!
//! # Offline Cache Engine
//!
//! The [`worker`] module decides, per intercepted request, whether to answer
//! from cache or network and what to fall back to when both fail:
//!
//! ```text
//! request ─▶ Router ─▶ CacheFirst   ─▶ fresh cache ─┬─▶ response
//!                   │                  network ─────┤
//!                   │                  stale cache ─┤
//!                   ├▶ NetworkFirst ─▶ network ─────┤
//!                   │                  any cache ───┤
//!                   │                  offline page ┤
//!                   └▶ NoStrategy (passthrough)     └─▶ offline document / 408
//! ```
//!
//! Cache partitions are versioned (`static-v2`, `images-v2`, `runtime-v2`).
//! Bumping `worker.version` in `config.toml` makes the next activation delete
//! every partition from older versions.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`worker`] | Offline cache engine: routing, strategies, lifecycle, control messages |
//! | [`search`] | Boolean and scored search over posts, query suggestions |
//! | [`content`] | Loads posts from markdown files with TOML front matter |
//! | [`slug`] | Tag and title to URL slug |
//! | [`images`] | Content image path resolution and optimized variant paths |
//! | [`validation`] | String and number field validation for forms |
//! | [`sitemap`] | `sitemap.xml` and `robots.txt` |
//! | [`config`] | `config.toml` loading, validation, and merging over stock defaults |
//! | [`types`] | Shared types (`Post`, `SearchResult`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Seams, Not Browsers
//!
//! The engine never touches a real browser API. It talks to a
//! [`worker::CacheStorage`] and a [`worker::Network`], both async traits.
//! Tests plug in an in-memory store and a scripted network; the `probe`
//! command plugs in `reqwest`. Every fallback path is therefore testable
//! without a headless browser.
//!
//! ## Availability Over Freshness
//!
//! A cached response with no `Date` header never expires, and a stale entry
//! is always served rather than surfacing a network error. Cache write
//! failures are logged, never returned.
//!
//! ## Maud for Generated Markup
//!
//! The offline document and `sitemap.xml` are built with
//! [Maud](https://maud.lambda.xyz/), so post slugs and site URLs are escaped
//! by construction.

pub mod config;
pub mod content;
pub mod images;
pub mod output;
pub mod search;
pub mod sitemap;
pub mod slug;
pub mod types;
pub mod validation;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
