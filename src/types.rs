//! Shared content types.
//!
//! Posts are produced by [`crate::content`] and consumed by [`crate::search`]
//! and [`crate::sitemap`]. They serialize to JSON so the CLI can print search
//! results in a machine-readable form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blog post as seen by search and sitemap generation.
///
/// Only the fields those consumers read are kept; rendering concerns (hero
/// images, reading time, SEO overrides) live with the templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Post {
    /// URL slug, used as `/posts/{slug}/`
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Publication date. Posts without one sort as the oldest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub draft: bool,
}

/// Which post field a search term hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Excerpt,
    Tags,
    Category,
}

/// A post with its relevance score and the fields that matched.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub post: &'a Post,
    pub score: f64,
    pub matches: Vec<MatchField>,
}
