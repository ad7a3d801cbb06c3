//! Post collection loading.
//!
//! Walks a posts directory for markdown files and turns each into a
//! [`Post`]. Front matter is TOML between `+++` fences:
//!
//! ```text
//! posts/
//! ├── dividend-etfs.md
//! └── 2024/
//!     └── bitcoin-halving.md
//! ```
//!
//! ```markdown
//! +++
//! title = "Bitcoin halving explained"
//! date = 2024-04-19
//! category = "Crypto"
//! tags = ["Bitcoin", "Supply"]
//! author = "Priya Nair"
//! +++
//!
//! Every four years the block reward halves. ...
//! ```
//!
//! ## Field resolution (first available wins)
//!
//! - **Title**: front matter `title` → first `# ` heading → file stem with
//!   dashes as spaces
//! - **Slug**: front matter `slug` → slugified file stem
//! - **Excerpt**: front matter `excerpt` → `description` → text of the first
//!   markdown paragraph
//!
//! Posts with `draft = true` are skipped. Unknown front-matter keys are
//! ignored since posts carry rendering fields this crate has no use for.
//!
//! Unlike the search and path helpers, loading fails loudly: a broken post is
//! a build error the author needs to see.

use crate::slug::slugify_tag;
use crate::types::Post;
use chrono::NaiveDate;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const FENCE: &str = "+++";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Unterminated front matter in {0}")]
    UnterminatedFrontMatter(PathBuf),
    #[error("Invalid date {value:?} in {path}")]
    InvalidDate { path: PathBuf, value: String },
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Front matter fields read from a post.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FrontMatter {
    title: Option<String>,
    slug: Option<String>,
    /// A TOML date (`2024-04-19`), datetime, or `"YYYY-MM-DD"` string.
    date: Option<toml::Value>,
    category: String,
    tags: Vec<String>,
    author: Option<String>,
    excerpt: Option<String>,
    description: Option<String>,
    draft: bool,
}

/// Load every published post under `dir`, newest first.
///
/// Undated posts come last; ties are ordered by slug.
pub fn load_posts(dir: &Path) -> Result<Vec<Post>, ContentError> {
    let mut posts = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        let is_markdown = entry.file_type().is_file()
            && path
                .extension()
                .map(|e| e.eq_ignore_ascii_case("md"))
                .unwrap_or(false);
        if !is_markdown {
            continue;
        }

        let source = fs::read_to_string(path)?;
        let post = parse_post(path, &source)?;
        if post.draft {
            log::debug!("skipping draft {}", path.display());
            continue;
        }
        posts.push(post);
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    Ok(posts)
}

/// Parse one markdown source into a post. `path` supplies the fallback slug
/// and title.
pub fn parse_post(path: &Path, source: &str) -> Result<Post, ContentError> {
    let (front, body) = split_front_matter(path, source)?;
    let meta: FrontMatter = match front {
        Some(toml_src) => toml::from_str(toml_src).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?,
        None => FrontMatter::default(),
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let title = meta
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            body.lines()
                .find(|line| line.starts_with("# "))
                .map(|line| line.trim_start_matches("# ").trim().to_string())
        })
        .unwrap_or_else(|| stem.replace('-', " "));

    let slug = match meta.slug {
        Some(s) if !s.trim().is_empty() => slugify_tag(&s),
        _ => slugify_tag(&stem),
    };

    let date = meta.date.map(|v| parse_date(path, v)).transpose()?;

    let excerpt = meta
        .excerpt
        .or(meta.description)
        .unwrap_or_else(|| first_paragraph(body));

    Ok(Post {
        slug,
        title,
        excerpt,
        tags: meta.tags,
        category: meta.category,
        author: meta.author,
        date,
        draft: meta.draft,
    })
}

fn parse_date(path: &Path, value: toml::Value) -> Result<NaiveDate, ContentError> {
    let parsed = match &value {
        toml::Value::Datetime(dt) => dt.date.and_then(|d| {
            NaiveDate::from_ymd_opt(d.year.into(), d.month.into(), d.day.into())
        }),
        toml::Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ContentError::InvalidDate {
        path: path.to_path_buf(),
        value: value.to_string(),
    })
}

/// Split `+++`-fenced front matter from the body.
///
/// Returns `(None, source)` when the file does not open with a fence.
fn split_front_matter<'a>(
    path: &Path,
    source: &'a str,
) -> Result<(Option<&'a str>, &'a str), ContentError> {
    let Some(rest) = source.trim_start_matches('\u{feff}').strip_prefix(FENCE) else {
        return Ok((None, source));
    };
    let Some(rest) = rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")) else {
        return Ok((None, source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(front), body));
        }
        offset += line.len();
    }
    Err(ContentError::UnterminatedFrontMatter(path.to_path_buf()))
}

/// Plain text of the first markdown paragraph, soft breaks as spaces.
fn first_paragraph(body: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;
    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) => break,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }
    text.trim().to_string()
}
