//! `sitemap.xml` and `robots.txt` generation.
//!
//! The sitemap lists the configured static pages first, then one entry per
//! published post at `/posts/{slug}/`. All URLs are absolute, built from
//! `site.url`. Markup is produced with Maud so slugs and URLs are escaped.

use crate::config::{RobotsConfig, SiteInfo};
use crate::types::Post;
use maud::{PreEscaped, html};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Absolute URLs listed in the sitemap, in output order.
pub fn sitemap_urls(site: &SiteInfo, static_pages: &[String], posts: &[Post]) -> Vec<String> {
    let base = site.base_url();
    static_pages
        .iter()
        .map(|page| format!("{base}/{}", page.trim_start_matches('/')))
        .chain(
            posts
                .iter()
                .filter(|p| !p.draft)
                .map(|p| format!("{base}/posts/{}/", p.slug)),
        )
        .collect()
}

/// Render `sitemap.xml`.
pub fn sitemap_xml(site: &SiteInfo, static_pages: &[String], posts: &[Post]) -> String {
    let urls = sitemap_urls(site, static_pages, posts);
    html! {
        (PreEscaped(XML_PROLOG))
        "\n"
        urlset xmlns=(SITEMAP_NS) {
            @for loc_url in &urls {
                url { loc { (loc_url) } }
            }
        }
    }
    .into_string()
}

/// Render `robots.txt` pointing crawlers at the absolute sitemap URL.
pub fn robots_txt(site: &SiteInfo, robots: &RobotsConfig) -> String {
    let mut out = format!(
        "User-agent: *\nAllow: /\n\n# Sitemap with absolute URL\nSitemap: {}/sitemap.xml\n",
        site.base_url()
    );
    if robots.crawl_delay > 0 {
        out.push_str(&format!("\nCrawl-delay: {}\n", robots.crawl_delay));
    }
    out.push_str(&format!(
        "\n# Site: {}\n# Description: {}\n",
        site.name, site.description
    ));
    out
}
