//! In-memory text search over a post collection.
//!
//! Three entry points, all linear scans with no index:
//!
//! | Function | Returns | Match rule |
//! |----------|---------|------------|
//! | [`search_posts`] | posts | every term appears somewhere in the post |
//! | [`search_posts_with_score`] | scored results | any term hits a scored field |
//! | [`search_suggestions`] | strings | tags, categories and title words containing the query |
//!
//! Queries are split on single spaces and lowercased. Matching is plain
//! substring containment: `"inv"` hits `"Investment"`.
//!
//! ## Scoring
//!
//! Each field contributes `weight × number of terms it contains`:
//!
//! ```text
//! title     3.0
//! excerpt   2.0
//! tags      1.5   (a term counts once if it hits any tag)
//! category  1.0
//! ```
//!
//! Author participates in [`search_posts`] but is not scored. Ties are
//! broken by date, newest first.

use crate::types::{MatchField, Post, SearchResult};
use std::cmp::Ordering;

const TITLE_WEIGHT: f64 = 3.0;
const EXCERPT_WEIGHT: f64 = 2.0;
const TAG_WEIGHT: f64 = 1.5;
const CATEGORY_WEIGHT: f64 = 1.0;

/// Suggestion limit used when the caller asks for zero.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Lowercase the query and split it into non-empty terms.
fn search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Posts containing every query term in title, excerpt, tags, category or author.
///
/// A blank query matches nothing.
pub fn search_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let terms = search_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    posts
        .iter()
        .filter(|post| {
            let mut haystack = vec![post.title.as_str(), post.excerpt.as_str()];
            haystack.extend(post.tags.iter().map(String::as_str));
            haystack.push(post.category.as_str());
            haystack.push(post.author.as_deref().unwrap_or(""));
            let text = haystack.join(" ").to_lowercase();
            terms.iter().all(|term| text.contains(term.as_str()))
        })
        .collect()
}

/// Posts with a positive relevance score, best first.
pub fn search_posts_with_score<'a>(posts: &'a [Post], query: &str) -> Vec<SearchResult<'a>> {
    let terms = search_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult<'a>> = posts
        .iter()
        .filter_map(|post| score_post(post, &terms))
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.post.date.cmp(&a.post.date))
    });
    results
}

fn score_post<'a>(post: &'a Post, terms: &[String]) -> Option<SearchResult<'a>> {
    let title = post.title.to_lowercase();
    let excerpt = post.excerpt.to_lowercase();
    let tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
    let category = post.category.to_lowercase();

    let fields = [
        (MatchField::Title, TITLE_WEIGHT, hits(terms, |t| title.contains(t))),
        (MatchField::Excerpt, EXCERPT_WEIGHT, hits(terms, |t| excerpt.contains(t))),
        (
            MatchField::Tags,
            TAG_WEIGHT,
            hits(terms, |t| tags.iter().any(|tag| tag.contains(t))),
        ),
        (
            MatchField::Category,
            CATEGORY_WEIGHT,
            hits(terms, |t| category.contains(t)),
        ),
    ];

    let mut score = 0.0;
    let mut matches = Vec::new();
    for (field, weight, count) in fields {
        if count > 0 {
            score += count as f64 * weight;
            matches.push(field);
        }
    }

    (score > 0.0).then_some(SearchResult {
        post,
        score,
        matches,
    })
}

/// Number of terms satisfying `pred`.
fn hits(terms: &[String], pred: impl Fn(&str) -> bool) -> usize {
    terms.iter().filter(|t| pred(t.as_str())).count()
}

/// Autocomplete suggestions for a partial query.
///
/// Tags and categories are returned in their original casing; title words
/// are lowercased and only offered for queries of three or more characters.
/// Duplicates are dropped, keeping first-seen order.
pub fn search_suggestions(posts: &[Post], query: &str, limit: usize) -> Vec<String> {
    if query.chars().count() < 2 {
        return Vec::new();
    }
    let limit = if limit == 0 {
        DEFAULT_SUGGESTION_LIMIT
    } else {
        limit
    };
    let needle = query.to_lowercase();
    let title_words = query.chars().count() >= 3;

    let mut suggestions: Vec<String> = Vec::new();
    let mut add = |s: &str| {
        if !suggestions.iter().any(|existing| existing == s) {
            suggestions.push(s.to_string());
        }
    };

    for post in posts {
        for tag in &post.tags {
            if !tag.is_empty() && tag.to_lowercase().contains(&needle) {
                add(tag);
            }
        }
        if !post.category.is_empty() && post.category.to_lowercase().contains(&needle) {
            add(&post.category);
        }
        if title_words {
            for word in post.title.to_lowercase().split(' ') {
                if word.chars().count() > 3 && word.contains(&needle) {
                    add(word);
                }
            }
        }
    }

    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{post, sample_posts};
    use chrono::NaiveDate;

    fn slugs(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.slug.clone()).collect()
    }

    // =========================================================================
    // search_posts
    // =========================================================================

    #[test]
    fn blank_query_matches_nothing() {
        let posts = sample_posts();
        assert!(search_posts(&posts, "").is_empty());
        assert!(search_posts(&posts, "    ").is_empty());
    }

    #[test]
    fn all_terms_must_match() {
        let posts = sample_posts();
        let found = search_posts(&posts, "dividend etf");
        assert_eq!(slugs(&found), vec!["dividend-etfs"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let posts = sample_posts();
        let found = search_posts(&posts, "BITCOIN");
        assert_eq!(slugs(&found), vec!["bitcoin-halving"]);
    }

    #[test]
    fn author_participates_in_boolean_search() {
        let posts = sample_posts();
        let found = search_posts(&posts, "priya");
        assert_eq!(slugs(&found), vec!["bitcoin-halving"]);
    }

    #[test]
    fn terms_may_span_fields() {
        let posts = sample_posts();
        // "halving" in title, "crypto" in category
        let found = search_posts(&posts, "halving crypto");
        assert_eq!(slugs(&found), vec!["bitcoin-halving"]);
    }

    // =========================================================================
    // search_posts_with_score
    // =========================================================================

    #[test]
    fn title_match_outranks_tag_match() {
        let posts = vec![
            post("tagged", "Weekly notes", &["options"], "Markets"),
            post("titled", "Options basics", &[], "Markets"),
        ];
        let results = search_posts_with_score(&posts, "options");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].post.slug, "titled");
        assert_eq!(results[1].post.slug, "tagged");
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn field_weights_accumulate() {
        let mut p = post("all", "Gold rally", &["gold"], "gold");
        p.excerpt = "Why gold keeps rising".into();
        let posts = vec![p];
        let results = search_posts_with_score(&posts, "gold");
        assert_eq!(results[0].score, 3.0 + 2.0 + 1.5 + 1.0);
        assert_eq!(
            results[0].matches,
            vec![
                MatchField::Title,
                MatchField::Excerpt,
                MatchField::Tags,
                MatchField::Category
            ]
        );
    }

    #[test]
    fn each_term_counts_once_per_field() {
        let posts = vec![post("p", "Rates and rates", &[], "")];
        let results = search_posts_with_score(&posts, "rates inflation");
        assert_eq!(results[0].score, 3.0);
    }

    #[test]
    fn tag_hit_counts_once_per_term() {
        let posts = vec![post("p", "x", &["rust", "rustacean"], "")];
        let results = search_posts_with_score(&posts, "rust");
        assert_eq!(results[0].score, 1.5);
    }

    #[test]
    fn author_is_not_scored() {
        let mut p = post("p", "Untitled", &[], "");
        p.author = Some("Priya".into());
        let posts = vec![p];
        assert!(search_posts_with_score(&posts, "priya").is_empty());
    }

    #[test]
    fn ties_broken_by_newest_date() {
        let mut older = post("older", "Budget tips", &[], "");
        older.date = NaiveDate::from_ymd_opt(2023, 1, 1);
        let mut newer = post("newer", "Budget tricks", &[], "");
        newer.date = NaiveDate::from_ymd_opt(2024, 6, 1);
        let undated = post("undated", "Budget rules", &[], "");
        let posts = vec![undated, older, newer];

        let results = search_posts_with_score(&posts, "budget");
        let order: Vec<&str> = results.iter().map(|r| r.post.slug.as_str()).collect();
        assert_eq!(order, vec!["newer", "older", "undated"]);
    }

    #[test]
    fn zero_score_posts_excluded() {
        let posts = sample_posts();
        let results = search_posts_with_score(&posts, "zzzz");
        assert!(results.is_empty());
    }

    // =========================================================================
    // search_suggestions
    // =========================================================================

    #[test]
    fn short_query_has_no_suggestions() {
        let posts = sample_posts();
        assert!(search_suggestions(&posts, "e", 5).is_empty());
    }

    #[test]
    fn tags_and_categories_suggested_with_original_case() {
        let posts = sample_posts();
        let s = search_suggestions(&posts, "cr", 10);
        assert!(s.contains(&"Crypto".to_string()), "got {s:?}");
    }

    #[test]
    fn title_words_need_three_char_query() {
        let posts = vec![post("p", "Halving explained", &[], "")];
        assert!(search_suggestions(&posts, "ha", 5).is_empty());
        assert_eq!(search_suggestions(&posts, "hal", 5), vec!["halving"]);
    }

    #[test]
    fn short_title_words_skipped() {
        let posts = vec![post("p", "Tax tips", &[], "")];
        assert!(search_suggestions(&posts, "tax", 5).is_empty());
    }

    #[test]
    fn suggestions_deduplicated_and_limited() {
        let posts = vec![
            post("a", "x", &["Stocks", "Stock picks"], "Stocks"),
            post("b", "x", &["Stocks"], "Stock market"),
        ];
        let s = search_suggestions(&posts, "stock", 2);
        assert_eq!(s, vec!["Stocks", "Stock picks"]);
        let all = search_suggestions(&posts, "stock", 10);
        assert_eq!(all, vec!["Stocks", "Stock picks", "Stock market"]);
    }

    #[test]
    fn zero_limit_uses_default() {
        let tags: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
        let tag_refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let posts = vec![post("p", "x", &tag_refs, "")];
        assert_eq!(
            search_suggestions(&posts, "tag", 0).len(),
            DEFAULT_SUGGESTION_LIMIT
        );
    }
}
