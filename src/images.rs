//! Image path resolution between the content repository and the public site.
//!
//! Posts live in a separate content repository and reference their images
//! relative to it (`content/uploads/<post>/<file>`). The build copies those
//! uploads to `public/images/uploads/`, and the image optimizer writes
//! width-suffixed WebP variants under `/images/optimized/`.
//!
//! ```text
//! content/uploads/chart/q3.jpg   →  /images/uploads/chart/q3.jpg
//! /images/uploads/chart/q3.jpg   →  /images/optimized/uploads/chart/q3-640.webp
//! ```
//!
//! Both functions are total: bad input maps to a placeholder image and a
//! logged warning, never an error.

/// Served when a content image path is missing.
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.jpg";

/// Served when an optimized variant cannot be derived.
pub const PLACEHOLDER_OPTIMIZED: &str = "/images/placeholder-320.webp";

/// Width used when the caller passes a non-positive one.
pub const DEFAULT_OPTIMIZED_WIDTH: u32 = 640;

const UPLOADS_PUBLIC: &str = "/images/uploads";
const OPTIMIZED_PREFIX: &str = "/images/optimized/";

/// Resolve a content-repository image path to its public URL path.
///
/// - `content/uploads/x/y.jpg` → `/images/uploads/x/y.jpg`
/// - `uploads/x/y.jpg` → `/images/uploads/x/y.jpg`
/// - `/images/authors/a.jpg` → unchanged
/// - `https://cdn.example.com/a.jpg` → unchanged
/// - `legacy/a.jpg` or `/legacy/a.jpg` → `/images/uploads/legacy/a.jpg`
pub fn resolve_content_image_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        log::warn!("resolve_content_image_path: empty path provided");
        return PLACEHOLDER_IMAGE.to_string();
    }

    if let Some(rest) = path.strip_prefix("content/uploads/") {
        return format!("{UPLOADS_PUBLIC}/{rest}");
    }
    if let Some(rest) = path.strip_prefix("uploads/") {
        return format!("{UPLOADS_PUBLIC}/{rest}");
    }
    if path.starts_with("/images/")
        || path.starts_with("http://")
        || path.starts_with("https://")
    {
        return path.to_string();
    }

    // Legacy content written before the uploads/ convention.
    format!("{UPLOADS_PUBLIC}/{}", path.trim_start_matches('/'))
}

/// Path of the optimized WebP variant of `src` at `width` pixels.
///
/// `width` is signed so callers can pass through unvalidated front-matter
/// values; anything below 1 falls back to [`DEFAULT_OPTIMIZED_WIDTH`].
///
/// - `/images/uploads/chart.jpg`, 640 → `/images/optimized/uploads/chart-640.webp`
/// - `authors/avatar.png`, 320 → `/images/optimized/authors/avatar-320.webp`
pub fn optimized_image_path(src: &str, width: i64) -> String {
    let width = match u32::try_from(width) {
        Ok(w) if w > 0 => w,
        _ => {
            log::warn!(
                "optimized_image_path: invalid width {width}, using {DEFAULT_OPTIMIZED_WIDTH}"
            );
            DEFAULT_OPTIMIZED_WIDTH
        }
    };

    let src = src.trim();
    if src.is_empty() {
        log::warn!("optimized_image_path: empty src provided");
        return PLACEHOLDER_OPTIMIZED.to_string();
    }
    if src.contains(OPTIMIZED_PREFIX) {
        return src.to_string();
    }

    let clean = src.strip_prefix('/').unwrap_or(src);
    let clean = clean.strip_prefix("images/").unwrap_or(clean);
    if clean.is_empty() {
        log::warn!("optimized_image_path: no usable path in {src:?}");
        return PLACEHOLDER_OPTIMIZED.to_string();
    }

    format!("{OPTIMIZED_PREFIX}{}-{width}.webp", strip_extension(clean))
}

/// Drop a trailing `.ext`; the dot must be followed by at least one char.
///
/// Matches on the whole string, not the last path segment, so a dotted
/// directory with an extensionless file loses its tail: `a.b/c` → `a`.
fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(pos) if pos + 1 < path.len() => &path[..pos],
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // resolve_content_image_path
    // =========================================================================

    #[test]
    fn content_uploads_become_public() {
        assert_eq!(
            resolve_content_image_path("content/uploads/x/y.jpg"),
            "/images/uploads/x/y.jpg"
        );
    }

    #[test]
    fn bare_uploads_become_public() {
        assert_eq!(
            resolve_content_image_path("uploads/stock-analysis/chart.jpg"),
            "/images/uploads/stock-analysis/chart.jpg"
        );
    }

    #[test]
    fn absolute_images_path_passes_through() {
        assert_eq!(
            resolve_content_image_path("/images/authors/avatar.jpg"),
            "/images/authors/avatar.jpg"
        );
    }

    #[test]
    fn full_urls_pass_through() {
        assert_eq!(
            resolve_content_image_path("https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(
            resolve_content_image_path("http://cdn.example.com/a.png"),
            "http://cdn.example.com/a.png"
        );
    }

    #[test]
    fn legacy_paths_land_in_uploads() {
        assert_eq!(
            resolve_content_image_path("legacy/a.jpg"),
            "/images/uploads/legacy/a.jpg"
        );
        assert_eq!(
            resolve_content_image_path("//legacy/a.jpg"),
            "/images/uploads/legacy/a.jpg"
        );
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(
            resolve_content_image_path("  uploads/a.jpg \n"),
            "/images/uploads/a.jpg"
        );
    }

    #[test]
    fn blank_path_is_placeholder() {
        assert_eq!(resolve_content_image_path(""), PLACEHOLDER_IMAGE);
        assert_eq!(resolve_content_image_path("   "), PLACEHOLDER_IMAGE);
    }

    // =========================================================================
    // optimized_image_path
    // =========================================================================

    #[test]
    fn optimized_from_public_path() {
        assert_eq!(
            optimized_image_path("/images/uploads/chart.jpg", 640),
            "/images/optimized/uploads/chart-640.webp"
        );
    }

    #[test]
    fn optimized_from_relative_path() {
        assert_eq!(
            optimized_image_path("authors/avatar.png", 320),
            "/images/optimized/authors/avatar-320.webp"
        );
    }

    #[test]
    fn already_optimized_unchanged() {
        let p = "/images/optimized/uploads/chart-640.webp";
        assert_eq!(optimized_image_path(p, 1200), p);
    }

    #[test]
    fn invalid_width_defaults() {
        assert_eq!(
            optimized_image_path("uploads/a.jpg", 0),
            "/images/optimized/uploads/a-640.webp"
        );
        assert_eq!(
            optimized_image_path("uploads/a.jpg", -5),
            "/images/optimized/uploads/a-640.webp"
        );
    }

    #[test]
    fn only_last_extension_removed() {
        assert_eq!(
            optimized_image_path("uploads/a.tar.jpg", 100),
            "/images/optimized/uploads/a.tar-100.webp"
        );
    }

    #[test]
    fn extensionless_source() {
        assert_eq!(
            optimized_image_path("uploads/raw", 100),
            "/images/optimized/uploads/raw-100.webp"
        );
    }

    #[test]
    fn empty_after_cleaning_is_placeholder() {
        assert_eq!(optimized_image_path("/images/", 640), PLACEHOLDER_OPTIMIZED);
        assert_eq!(optimized_image_path("", 640), PLACEHOLDER_OPTIMIZED);
    }
}
