//! URL slugs for tags, categories and post filenames.
//!
//! Slugs are lowercase ASCII: letters, digits and single dashes. Accented
//! Latin letters keep their base letter (`Café` → `cafe`); scripts with no
//! ASCII decomposition are dropped entirely, so `हिंदी Text with 中文`
//! becomes `text-with`.
//!
//! Slugification never fails. Inputs that reduce to nothing produce
//! [`FALLBACK_SLUG`] and a warning, since a page with an odd tag URL is
//! better than a page that fails to render.

use unicode_normalization::UnicodeNormalization;

/// Slug used when the input has no usable characters.
pub const FALLBACK_SLUG: &str = "untitled";

/// Slugs longer than this are cut back to the last whole word.
pub const MAX_SLUG_LEN: usize = 100;

/// Create a URL-safe slug.
///
/// - `"Technical Analysis"` → `"technical-analysis"`
/// - `"Stock Market & Investment!"` → `"stock-market-investment"`
/// - `"  --Hello__World--  "` → `"helloworld"`
/// - `""` → `"untitled"`
pub fn slugify_tag(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        log::warn!("slugify_tag: empty value provided");
        return FALLBACK_SLUG.to_string();
    }

    // Keep [a-z0-9], whitespace and dashes; whitespace runs become one dash.
    let mut slug = String::with_capacity(trimmed.len());
    let mut pending_dash = false;
    for c in trimmed
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
    {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        log::warn!("slugify_tag: {value:?} produced an empty slug");
        return FALLBACK_SLUG.to_string();
    }

    if slug.len() > MAX_SLUG_LEN {
        // ASCII only at this point, so byte slicing is char-safe.
        let cut = &slug[..MAX_SLUG_LEN];
        let truncated = match cut.rfind('-') {
            Some(pos) => &cut[..pos],
            None => cut,
        };
        if truncated.is_empty() {
            return FALLBACK_SLUG.to_string();
        }
        return truncated.to_string();
    }

    slug
}
