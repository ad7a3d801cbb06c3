//! CLI output formatting.
//!
//! Every command prints entities the same way: a header line with a
//! positional index and the entity's identity, then indented context lines.
//!
//! ## Posts (`check`)
//!
//! ```text
//! Posts
//! 001 Bitcoin halving explained
//!     Slug: bitcoin-halving
//!     Date: 2024-04-19
//!     Category: Crypto
//!     Tags: Bitcoin, Supply
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 Bitcoin halving explained (score 4.0)
//!     Slug: bitcoin-halving
//!     Matched: title, category
//! ```
//!
//! ## Route
//!
//! ```text
//! https://blog.example.com/app.js
//!     Strategy: cache-first
//!     Partition: static-v2
//!     Max age: 30d
//! ```
//!
//! ## Probe
//!
//! ```text
//! Install → static-v2
//!     cached /
//!     failed /favicon.svg: HTTP 404
//! Activate
//!     kept static-v2
//! ```
//!
//! Each `format_*` function is pure and returns lines; `print_*` writes them
//! to stdout.

use crate::types::{MatchField, Post, SearchResult};
use crate::worker::router::Strategy;
use crate::worker::{ActivateReport, InstallReport};
use std::time::Duration;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Shortest whole-unit rendering: `30d`, `1h`, `90s`.
fn format_max_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs > 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs > 0 && secs % 3_600 == 0 {
        format!("{}h", secs / 3_600)
    } else {
        format!("{secs}s")
    }
}

fn match_label(field: MatchField) -> &'static str {
    match field {
        MatchField::Title => "title",
        MatchField::Excerpt => "excerpt",
        MatchField::Tags => "tags",
        MatchField::Category => "category",
    }
}

// ============================================================================
// Posts
// ============================================================================

pub fn format_posts(posts: &[Post]) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    for (i, post) in posts.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!("{}Slug: {}", indent(1), post.slug));
        if let Some(date) = post.date {
            lines.push(format!("{}Date: {}", indent(1), date));
        }
        if !post.category.is_empty() {
            lines.push(format!("{}Category: {}", indent(1), post.category));
        }
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
    }
    if posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines
}

pub fn print_posts(posts: &[Post]) {
    for line in format_posts(posts) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search_results(results: &[SearchResult<'_>]) -> Vec<String> {
    if results.is_empty() {
        return vec!["No matching posts".to_string()];
    }
    let mut lines = Vec::new();
    for (i, r) in results.iter().enumerate() {
        lines.push(format!(
            "{} {} (score {:.1})",
            format_index(i + 1),
            r.post.title,
            r.score
        ));
        lines.push(format!("{}Slug: {}", indent(1), r.post.slug));
        let matched: Vec<&str> = r.matches.iter().copied().map(match_label).collect();
        lines.push(format!("{}Matched: {}", indent(1), matched.join(", ")));
    }
    lines
}

pub fn print_search_results(results: &[SearchResult<'_>]) {
    for line in format_search_results(results) {
        println!("{}", line);
    }
}

// ============================================================================
// Route
// ============================================================================

pub fn format_route(url: &str, strategy: &Strategy) -> Vec<String> {
    let mut lines = vec![url.to_string()];
    match strategy {
        Strategy::NoStrategy => {
            lines.push(format!("{}Strategy: none (passthrough)", indent(1)));
        }
        Strategy::CacheFirst { partition, max_age }
        | Strategy::NetworkFirst { partition, max_age } => {
            let name = if matches!(strategy, Strategy::CacheFirst { .. }) {
                "cache-first"
            } else {
                "network-first"
            };
            lines.push(format!("{}Strategy: {}", indent(1), name));
            lines.push(format!("{}Partition: {}", indent(1), partition));
            lines.push(format!("{}Max age: {}", indent(1), format_max_age(*max_age)));
        }
    }
    lines
}

pub fn print_route(url: &str, strategy: &Strategy) {
    for line in format_route(url, strategy) {
        println!("{}", line);
    }
}

// ============================================================================
// Probe
// ============================================================================

pub fn format_probe(
    partition: &str,
    install: &InstallReport,
    activate: &ActivateReport,
) -> Vec<String> {
    let mut lines = vec![format!("Install → {}", partition)];
    for asset in &install.cached {
        lines.push(format!("{}cached {}", indent(1), asset));
    }
    for (asset, reason) in &install.failed {
        lines.push(format!("{}failed {}: {}", indent(1), asset, reason));
    }
    lines.push("Activate".to_string());
    for name in &activate.kept {
        lines.push(format!("{}kept {}", indent(1), name));
    }
    for name in &activate.deleted {
        lines.push(format!("{}deleted {}", indent(1), name));
    }
    lines
}

pub fn print_probe(partition: &str, install: &InstallReport, activate: &ActivateReport) {
    for line in format_probe(partition, install, activate) {
        println!("{}", line);
    }
}
