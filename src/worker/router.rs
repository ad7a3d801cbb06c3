//! Strategy routing: which caching policy, partition and max-age apply to a
//! request.
//!
//! Rules are tried in declaration order against the URL path; the first
//! match wins. Requests no rule claims fall back to the runtime rule when
//! they look like pages (navigations, or paths ending in `/`). Everything
//! else goes to the network untouched.
//!
//! Only same-origin `GET`s over http(s) are eligible at all. Cross-origin
//! fetches, other methods, and schemes like `chrome-extension:` are never
//! cached.

use super::http::Request;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Max-age of the static (CSS, JS, fonts) partition.
pub const STATIC_MAX_AGE: Duration = DAY.saturating_mul(30);
/// Max-age of the images partition.
pub const IMAGES_MAX_AGE: Duration = DAY.saturating_mul(7);
/// Max-age of the runtime (HTML, JSON) partition.
pub const RUNTIME_MAX_AGE: Duration = HOUR;

static STATIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(css|js|woff2?|ttf|eot|otf)$").expect("static pattern must compile")
});
static IMAGES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(png|jpg|jpeg|gif|webp|svg|ico)$").expect("images pattern must compile")
});
static RUNTIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(html?|json)$").expect("runtime pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    CacheFirst,
    NetworkFirst,
}

/// One row of the routing table. Immutable once built.
#[derive(Debug, Clone)]
pub struct StrategyRule {
    pub pattern: Regex,
    pub partition: String,
    pub max_age: Duration,
    pub policy: Policy,
}

impl StrategyRule {
    fn strategy(&self) -> Strategy {
        match self.policy {
            Policy::CacheFirst => Strategy::CacheFirst {
                partition: self.partition.clone(),
                max_age: self.max_age,
            },
            Policy::NetworkFirst => Strategy::NetworkFirst {
                partition: self.partition.clone(),
                max_age: self.max_age,
            },
        }
    }
}

/// Routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Leave the request to the browser; nothing is cached.
    NoStrategy,
    CacheFirst { partition: String, max_age: Duration },
    NetworkFirst { partition: String, max_age: Duration },
}

/// What eligible requests get when no pattern matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Navigations and `/`-terminated paths use the runtime rule.
    Pages,
    /// Every eligible request uses the runtime rule.
    Everything,
}

#[derive(Debug, Clone)]
pub struct Router {
    origin: Url,
    rules: Vec<StrategyRule>,
    runtime: StrategyRule,
    fallback: Fallback,
}

impl Router {
    pub fn new(
        origin: Url,
        rules: Vec<StrategyRule>,
        runtime: StrategyRule,
        fallback: Fallback,
    ) -> Self {
        Self {
            origin,
            rules,
            runtime,
            fallback,
        }
    }

    /// The three-partition table: static and images cache-first, runtime
    /// network-first.
    pub fn standard(origin: Url, static_: &str, images: &str, runtime: &str) -> Self {
        let rules = vec![
            StrategyRule {
                        pattern: STATIC_PATTERN.clone(),
                partition: static_.to_string(),
                max_age: STATIC_MAX_AGE,
                policy: Policy::CacheFirst,
            },
            StrategyRule {
                        pattern: IMAGES_PATTERN.clone(),
                partition: images.to_string(),
                max_age: IMAGES_MAX_AGE,
                policy: Policy::CacheFirst,
            },
            runtime_rule(runtime),
        ];
        Self::new(origin, rules, runtime_rule(runtime), Fallback::Pages)
    }

    /// A single network-first partition for every eligible request.
    pub fn network_only_partition(origin: Url, partition: &str) -> Self {
        Self::new(
            origin,
            Vec::new(),
            runtime_rule(partition),
            Fallback::Everything,
        )
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Whether the engine may handle this request at all.
    pub fn is_eligible(&self, request: &Request) -> bool {
        matches!(request.url.scheme(), "http" | "https")
            && request.url.origin() == self.origin.origin()
            && request.method.eq_ignore_ascii_case("GET")
    }

    pub fn route(&self, request: &Request) -> Strategy {
        if !self.is_eligible(request) {
            return Strategy::NoStrategy;
        }

        let path = request.url.path();
        if let Some(rule) = self.rules.iter().find(|r| r.pattern.is_match(path)) {
            return rule.strategy();
        }

        let page_like = request.is_navigation() || path.ends_with('/');
        match self.fallback {
            Fallback::Everything => self.runtime.strategy(),
            Fallback::Pages if page_like => self.runtime.strategy(),
            Fallback::Pages => Strategy::NoStrategy,
        }
    }
}

fn runtime_rule(partition: &str) -> StrategyRule {
    StrategyRule {
        pattern: RUNTIME_PATTERN.clone(),
        partition: partition.to_string(),
        max_age: RUNTIME_MAX_AGE,
        policy: Policy::NetworkFirst,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://blog.example.com";

    fn router() -> Router {
        Router::standard(
            Url::parse(ORIGIN).unwrap(),
            "static-v2",
            "images-v2",
            "runtime-v2",
        )
    }

    fn get(path: &str) -> Request {
        Request::get(Url::parse(&format!("{ORIGIN}{path}")).unwrap())
    }

    fn cache_first(partition: &str, max_age: Duration) -> Strategy {
        Strategy::CacheFirst {
            partition: partition.into(),
            max_age,
        }
    }

    fn runtime() -> Strategy {
        Strategy::NetworkFirst {
            partition: "runtime-v2".into(),
            max_age: RUNTIME_MAX_AGE,
        }
    }

    #[test]
    fn max_ages() {
        assert_eq!(STATIC_MAX_AGE.as_millis(), 30 * 24 * 60 * 60 * 1000);
        assert_eq!(IMAGES_MAX_AGE.as_millis(), 7 * 24 * 60 * 60 * 1000);
        assert_eq!(RUNTIME_MAX_AGE.as_millis(), 60 * 60 * 1000);
    }

    #[test]
    fn static_assets_cache_first_30_days() {
        let r = router();
        for path in [
            "/styles/main.css",
            "/app.js",
            "/fonts/inter.woff",
            "/fonts/inter.woff2",
            "/fonts/a.ttf",
            "/fonts/a.eot",
            "/fonts/a.otf",
            "/UPPER.CSS",
        ] {
            assert_eq!(
                r.route(&get(path)),
                cache_first("static-v2", STATIC_MAX_AGE),
                "{path}"
            );
        }
    }

    #[test]
    fn images_cache_first_7_days() {
        let r = router();
        for path in [
            "/images/a.png",
            "/a.jpg",
            "/a.JPEG",
            "/a.gif",
            "/images/optimized/uploads/chart-640.webp",
            "/favicon.svg",
            "/favicon.ico",
        ] {
            assert_eq!(
                r.route(&get(path)),
                cache_first("images-v2", IMAGES_MAX_AGE),
                "{path}"
            );
        }
    }

    #[test]
    fn html_and_json_network_first() {
        let r = router();
        assert_eq!(r.route(&get("/about.html")), runtime());
        assert_eq!(r.route(&get("/manifest.json")), runtime());
        assert_eq!(r.route(&get("/old.htm")), runtime());
    }

    #[test]
    fn pages_default_to_runtime() {
        let r = router();
        assert_eq!(r.route(&get("/")), runtime());
        assert_eq!(r.route(&get("/posts/bitcoin-halving/")), runtime());
        let nav = Request::navigate(Url::parse(&format!("{ORIGIN}/posts/x")).unwrap());
        assert_eq!(r.route(&nav), runtime());
    }

    #[test]
    fn pattern_beats_navigation_default() {
        let r = router();
        let nav = Request::navigate(Url::parse(&format!("{ORIGIN}/feed.css")).unwrap());
        assert_eq!(r.route(&nav), cache_first("static-v2", STATIC_MAX_AGE));
    }

    #[test]
    fn unmatched_subresource_has_no_strategy() {
        let r = router();
        assert_eq!(r.route(&get("/api/posts")), Strategy::NoStrategy);
        assert_eq!(r.route(&get("/rss.xml")), Strategy::NoStrategy);
    }

    #[test]
    fn query_string_does_not_affect_matching() {
        let r = router();
        assert_eq!(
            r.route(&get("/app.js?v=3")),
            cache_first("static-v2", STATIC_MAX_AGE)
        );
    }

    #[test]
    fn cross_origin_bypassed() {
        let r = router();
        let req = Request::get(Url::parse("https://cdn.example.net/app.js").unwrap());
        assert_eq!(r.route(&req), Strategy::NoStrategy);
        let other_port = Request::get(Url::parse("https://blog.example.com:8443/a.css").unwrap());
        assert_eq!(r.route(&other_port), Strategy::NoStrategy);
    }

    #[test]
    fn non_get_bypassed() {
        let r = router();
        assert_eq!(
            r.route(&get("/app.js").with_method("POST")),
            Strategy::NoStrategy
        );
    }

    #[test]
    fn non_http_scheme_bypassed() {
        let r = router();
        let req = Request::get(Url::parse("chrome-extension://abc/app.js").unwrap());
        assert_eq!(r.route(&req), Strategy::NoStrategy);
    }

    #[test]
    fn single_partition_catches_everything() {
        let r = Router::network_only_partition(Url::parse(ORIGIN).unwrap(), "pwa-v1");
        let expected = Strategy::NetworkFirst {
            partition: "pwa-v1".into(),
            max_age: RUNTIME_MAX_AGE,
        };
        assert_eq!(r.route(&get("/app.js")), expected);
        assert_eq!(r.route(&get("/api/posts")), expected);
        assert_eq!(
            r.route(&get("/app.js").with_method("POST")),
            Strategy::NoStrategy
        );
    }
}
