//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user config file at the content root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! url = "http://localhost:4321"   # Absolute site URL, used in sitemap/robots
//! name = "My Blog"
//! description = "Notes on markets and money"
//!
//! [worker]
//! version = "v2"                  # Cache partition suffix; bump to purge caches
//! profile = "tiered"              # "tiered" (static/images/runtime) or "single"
//! offline_page = "/offline/"      # Served to navigations when the network is down
//! core_assets = ["/", "/offline/", "/manifest.json", "/favicon.svg",
//!                "/images/logo-light.svg", "/images/logo-dark.svg"]
//!
//! [sitemap]
//! static_pages = ["", "about", "categories", "tags", "contact"]
//!
//! [robots]
//! crawl_delay = 1                 # Seconds; omit the directive with 0
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [worker]
//! version = "v3"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public identity of the site.
    pub site: SiteInfo,
    /// Offline cache engine settings.
    pub worker: WorkerSettings,
    /// Sitemap generation settings.
    pub sitemap: SitemapConfig,
    /// robots.txt settings.
    pub robots: RobotsConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.site.url).map_err(|e| {
            ConfigError::Validation(format!("site.url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "site.url must use http or https".into(),
            ));
        }
        let version_ok = !self.worker.version.is_empty()
            && self
                .worker
                .version
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !version_ok {
            return Err(ConfigError::Validation(
                "worker.version must be non-empty and contain only [A-Za-z0-9._-]".into(),
            ));
        }
        if !self.worker.offline_page.starts_with('/') {
            return Err(ConfigError::Validation(
                "worker.offline_page must be an absolute path".into(),
            ));
        }
        if let Some(bad) = self
            .worker
            .core_assets
            .iter()
            .find(|a| !a.starts_with('/'))
        {
            return Err(ConfigError::Validation(format!(
                "worker.core_assets entries must be absolute paths, got {bad:?}"
            )));
        }
        Ok(())
    }
}

/// Public identity of the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Absolute base URL, without a trailing slash.
    pub url: String,
    pub name: String,
    pub description: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            url: "http://localhost:4321".to_string(),
            name: "My Blog".to_string(),
            description: "Notes on markets and money".to_string(),
        }
    }
}

impl SiteInfo {
    /// The site URL with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Offline cache engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerSettings {
    /// Suffix for every cache partition name (`static-{version}`, ...).
    pub version: String,
    /// Partition layout.
    pub profile: WorkerProfile,
    /// Pre-cached into the static partition on install.
    pub core_assets: Vec<String>,
    /// Cache key of the offline document served to failed navigations.
    pub offline_page: String,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            version: "v2".to_string(),
            profile: WorkerProfile::Tiered,
            core_assets: [
                "/",
                "/offline/",
                "/manifest.json",
                "/favicon.svg",
                "/images/logo-light.svg",
                "/images/logo-dark.svg",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            offline_page: "/offline/".to_string(),
        }
    }
}

/// How the offline cache engine partitions what it stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerProfile {
    /// `static-*` and `images-*` cache-first, `runtime-*` network-first.
    #[default]
    Tiered,
    /// One network-first `blog-pwa-*` partition for every same-origin GET.
    Single,
}

/// Sitemap generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    /// Site-relative paths listed ahead of posts. `""` is the home page.
    pub static_pages: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            static_pages: ["", "about", "categories", "tags", "contact"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// robots.txt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    /// Seconds between crawler requests; `0` omits the directive.
    pub crawl_delay: u32,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self { crawl_delay: 1 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely; arrays are
///   not concatenated.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Blog Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Absolute base URL. Used for sitemap <loc> entries and the robots.txt
# Sitemap line.
url = "http://localhost:4321"
name = "My Blog"
description = "Notes on markets and money"

# ---------------------------------------------------------------------------
# Offline cache engine (service worker)
# ---------------------------------------------------------------------------
[worker]
# Suffix of every cache partition: static-<version>, images-<version>,
# runtime-<version>. Changing it deletes all older partitions on the next
# activation.
version = "v2"

# Partition layout:
#   "tiered" - static assets and images cache-first (30 and 7 days),
#              pages and JSON network-first (1 hour)
#   "single" - one network-first partition for everything
profile = "tiered"

# Cache key of the offline document shown when a page cannot be loaded.
offline_page = "/offline/"

# Fetched into the static partition when the worker installs.
core_assets = [
    "/",
    "/offline/",
    "/manifest.json",
    "/favicon.svg",
    "/images/logo-light.svg",
    "/images/logo-dark.svg",
]

# ---------------------------------------------------------------------------
# Sitemap
# ---------------------------------------------------------------------------
[sitemap]
# Site-relative pages listed before posts. "" is the home page.
static_pages = ["", "about", "categories", "tags", "contact"]

# ---------------------------------------------------------------------------
# robots.txt
# ---------------------------------------------------------------------------
[robots]
# Seconds between crawler requests. 0 omits the Crawl-delay directive.
crawl_delay = 1
"##
}
